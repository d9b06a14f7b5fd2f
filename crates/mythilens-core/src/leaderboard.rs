use serde::Serialize;

use crate::profile::UserReputationProfile;

/// Number of entries shown when the caller does not choose.
pub const DEFAULT_LIMIT: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    /// 1-based.
    pub rank: usize,
    pub user_id: String,
    pub points: u64,
    pub reputation_score: f64,
    pub badge_count: usize,
}

/// Top `limit` profiles by points, highest first. Equal points keep input order.
pub fn leaderboard<'a, I>(profiles: I, limit: usize) -> Vec<LeaderboardEntry>
where
    I: IntoIterator<Item = &'a UserReputationProfile>,
{
    by_points(profiles)
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, p)| LeaderboardEntry {
            rank: i + 1,
            user_id: p.user_id().to_string(),
            points: p.points(),
            reputation_score: p.reputation_score(),
            badge_count: p.badges().len(),
        })
        .collect()
}

/// 1-based position of `user_id` on the full, untruncated board.
pub fn rank_of<'a, I>(profiles: I, user_id: &str) -> Option<usize>
where
    I: IntoIterator<Item = &'a UserReputationProfile>,
{
    by_points(profiles)
        .iter()
        .position(|p| p.user_id() == user_id)
        .map(|i| i + 1)
}

fn by_points<'a, I>(profiles: I) -> Vec<&'a UserReputationProfile>
where
    I: IntoIterator<Item = &'a UserReputationProfile>,
{
    let mut sorted: Vec<&UserReputationProfile> = profiles.into_iter().collect();
    sorted.sort_by(|a, b| b.points().cmp(&a.points()));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::points::ActionKind;

    fn profile(user: &str, scans: usize) -> UserReputationProfile {
        let mut p = UserReputationProfile::new(user);
        for _ in 0..scans {
            p.award(ActionKind::Scan);
        }
        p
    }

    #[test]
    fn orders_by_points_and_ranks_from_one() {
        let profiles = vec![profile("a", 1), profile("b", 5), profile("c", 3)];
        let board = leaderboard(&profiles, DEFAULT_LIMIT);
        let users: Vec<_> = board.iter().map(|e| e.user_id.as_str()).collect();
        assert_eq!(users, vec!["b", "c", "a"]);
        assert_eq!(board[0].rank, 1);
        assert_eq!(board[0].points, 50);
    }

    #[test]
    fn truncates_and_keeps_ties_stable() {
        let profiles = vec![profile("x", 2), profile("y", 2), profile("z", 2)];
        let board = leaderboard(&profiles, 2);
        assert_eq!(board.len(), 2);
        assert_eq!(board[0].user_id, "x");
        assert_eq!(board[1].user_id, "y");
    }

    #[test]
    fn rank_of_sees_past_the_limit() {
        let profiles: Vec<_> = (0..60).map(|i| profile(&format!("u{i}"), i)).collect();
        assert_eq!(rank_of(&profiles, "u59"), Some(1));
        assert_eq!(rank_of(&profiles, "u0"), Some(60));
        assert_eq!(rank_of(&profiles, "ghost"), None);
    }
}
