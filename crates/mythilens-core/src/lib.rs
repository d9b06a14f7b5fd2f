//! MythiLens core: site ranking, contribution gating and gamification points.
//!
//! Everything here is a pure function of its inputs. Persistence lives in
//! `mythilens-store`, model calls in `mythilens-ai`.

mod error;
pub use error::CoreError;

pub mod contribution;
pub mod gate;
pub mod geo;
pub mod leaderboard;
pub mod path;
pub mod points;
pub mod profile;
pub mod ranking;
pub mod schema;

pub use contribution::{
    ContributionPayload, ContributionRecord, ContributionStatus, ModerationScores, ReviewOutcome,
};
pub use gate::{GateDecision, decide};
pub use geo::{Coordinate, haversine_km};
pub use leaderboard::{LeaderboardEntry, leaderboard, rank_of};
pub use path::{PathProgress, StepReward};
pub use points::{ActionKind, BadgeSet, award};
pub use profile::UserReputationProfile;
pub use ranking::{DiscoveryConfig, RankedSite, SearchRadius, Site, nearby, rank};
