//! Terminal rendering for ranked sites, leaderboards, profiles and contributions.
//!
//! Tabular output goes through Arrow record batches so every table shares one
//! pretty printer; single records render as vertical cards.

use arrow::util::pretty::pretty_format_batches;
use mythilens_core::schema::heritage;
use mythilens_core::{
    ContributionRecord, GateDecision, LeaderboardEntry, RankedSite, UserReputationProfile,
};

const LABEL_WIDTH: usize = 18;

// ── Tables ──

pub fn print_ranked_sites(sites: &[RankedSite]) -> anyhow::Result<()> {
    if sites.is_empty() {
        println!("No placeable sites.");
        return Ok(());
    }
    let batch = heritage::ranked_sites_batch(sites)?;
    println!("{}", pretty_format_batches(&[batch])?);
    Ok(())
}

pub fn print_leaderboard(entries: &[LeaderboardEntry]) -> anyhow::Result<()> {
    if entries.is_empty() {
        println!("No profiles yet.");
        return Ok(());
    }
    let batch = heritage::leaderboard_batch(entries)?;
    println!("{}", pretty_format_batches(&[batch])?);
    Ok(())
}

pub fn print_contributions(records: &[ContributionRecord]) {
    if records.is_empty() {
        println!("No contributions.");
        return;
    }
    for r in records {
        println!(
            "#{:<5} {:<9} {:<24} {} (accuracy {:.1}, sentiment {:.1})",
            r.id,
            r.status.as_str(),
            truncate(&r.payload.title, 24),
            r.submitter,
            r.accuracy_score,
            r.sentiment_score,
        );
    }
}

// ── Cards ──

pub fn print_profile(profile: &UserReputationProfile, rank: Option<usize>) {
    println!("=== {} ===", profile.user_id());
    field("points", profile.points());
    if let Some(rank) = rank {
        field("rank", format!("#{rank}"));
    }
    field("reputation", format!("{:.1}", profile.reputation_score()));
    let badges: Vec<&str> = profile.badges().iter().collect();
    if badges.is_empty() {
        field("badges", "none");
    } else {
        field("badges", badges.join(", "));
    }
}

pub fn print_contribution(record: &ContributionRecord) {
    println!("=== Contribution #{} ===", record.id);
    field("title", &record.payload.title);
    field("kind", &record.payload.kind);
    if let Some(loc) = &record.payload.location_name {
        field("location", loc);
    }
    if let Some(at) = &record.payload.location {
        field("coordinates", format!("{:.4}, {:.4}", at.lat(), at.lng()));
    }
    field("submitter", &record.submitter);
    field("status", record.status);
    field("accuracy", format!("{:.1}", record.accuracy_score));
    field("sentiment", format!("{:.1}", record.sentiment_score));
    if let Some(feedback) = &record.feedback {
        field("feedback", feedback);
    }
    field("created", record.created_at.to_rfc3339());
}

pub fn print_decision(decision: GateDecision) {
    match decision {
        GateDecision::Approved => println!("approved: published immediately"),
        GateDecision::Pending => println!("pending: held for manual review"),
    }
}

fn field(label: &str, value: impl std::fmt::Display) {
    println!("  {label:<width$} {value}", width = LABEL_WIDTH);
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let cut: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{cut}…")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("Kōnārk Sun Temple", 6), "Kōnār…");
        assert_eq!(truncate("Hampi", 24), "Hampi");
    }
}
