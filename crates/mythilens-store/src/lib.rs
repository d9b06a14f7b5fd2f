//! Storage layer: profile and contribution stores, plus the services that
//! apply gamification and moderation rules against them.

mod error;
pub use error::StoreError;

mod backend;
pub use backend::{
    ContributionBuilder, ContributionStore, ContributionUpdate, ProfileStore, ProfileUpdate,
};

mod snapshot;

mod memory;
pub use memory::MemoryStore;

mod json;
pub use json::JsonStore;

mod desk;
pub use desk::ContributionDesk;

mod gamification;
pub use gamification::Gamification;
