//! Gamification point table and badge set.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Something a user did that earns points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Scan,
    Translation,
    Contribution,
    ReviewWithoutPhoto,
    ReviewWithPhoto,
    Question,
    HelpfulVote,
    QuizCorrect,
    StepCompletion,
    PathCompletion,
}

impl ActionKind {
    pub const ALL: [ActionKind; 10] = [
        ActionKind::Scan,
        ActionKind::Translation,
        ActionKind::Contribution,
        ActionKind::ReviewWithoutPhoto,
        ActionKind::ReviewWithPhoto,
        ActionKind::Question,
        ActionKind::HelpfulVote,
        ActionKind::QuizCorrect,
        ActionKind::StepCompletion,
        ActionKind::PathCompletion,
    ];

    /// Points earned for this action.
    pub fn points(&self) -> u64 {
        match self {
            Self::Scan => 10,
            Self::Translation => 15,
            Self::Contribution => 25,
            Self::ReviewWithoutPhoto => 15,
            Self::ReviewWithPhoto => 20,
            Self::Question => 5,
            Self::HelpfulVote => 2,
            Self::QuizCorrect => 10,
            Self::StepCompletion => 5,
            Self::PathCompletion => 50,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scan => "scan",
            Self::Translation => "translation",
            Self::Contribution => "contribution",
            Self::ReviewWithoutPhoto => "review_without_photo",
            Self::ReviewWithPhoto => "review_with_photo",
            Self::Question => "question",
            Self::HelpfulVote => "helpful_vote",
            Self::QuizCorrect => "quiz_correct",
            Self::StepCompletion => "step_completion",
            Self::PathCompletion => "path_completion",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionKind::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| CoreError::UnrecognizedAction(s.to_string()))
    }
}

/// Add the points for `action` to a running total.
pub fn award(current_points: u64, action: ActionKind) -> u64 {
    current_points.saturating_add(action.points())
}

/// Award by action name, failing on names outside the point table.
pub fn award_named(current_points: u64, action: &str) -> Result<u64, CoreError> {
    Ok(award(current_points, action.parse()?))
}

/// Earned badges in the order they were earned. Each badge appears once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct BadgeSet(Vec<String>);

impl BadgeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a badge. Returns `false` if it was already held.
    pub fn insert(&mut self, badge: impl Into<String>) -> bool {
        let badge = badge.into();
        if self.contains(&badge) {
            return false;
        }
        self.0.push(badge);
        true
    }

    pub fn contains(&self, badge: &str) -> bool {
        self.0.iter().any(|b| b == badge)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

// Stored badge lists may carry duplicates from older writers; keep the first.
impl From<Vec<String>> for BadgeSet {
    fn from(badges: Vec<String>) -> Self {
        let mut set = BadgeSet::new();
        for b in badges {
            set.insert(b);
        }
        set
    }
}

impl From<BadgeSet> for Vec<String> {
    fn from(set: BadgeSet) -> Self {
        set.0
    }
}
