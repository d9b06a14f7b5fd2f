mod display;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use mythilens_ai::{HttpModelClient, Interest, ModelConfig, Moderator, Recommender};
use mythilens_core::{
    ActionKind, ContributionPayload, ContributionStatus, Coordinate, DiscoveryConfig,
    ModerationScores, ReviewOutcome, SearchRadius, Site, decide, nearby, rank,
};
use mythilens_store::{ContributionDesk, Gamification, JsonStore};

#[derive(Parser)]
#[command(name = "mythilens", version, about = "Heritage discovery, moderation and gamification")]
struct Cli {
    /// JSON file holding profiles and contributions.
    #[arg(long, env = "MYTHILENS_DATA", default_value = "mythilens.json", global = true)]
    data: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
struct Location {
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,
    #[arg(long, allow_hyphen_values = true)]
    lng: f64,
    /// Search radius in kilometres.
    #[arg(long, default_value_t = 5.0)]
    radius: f64,
}

impl Location {
    fn resolve(&self) -> anyhow::Result<(Coordinate, SearchRadius)> {
        Ok((
            Coordinate::new(self.lat, self.lng)?,
            SearchRadius::new(self.radius)?,
        ))
    }
}

#[derive(clap::Args)]
struct Model {
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    api_key: String,
    #[arg(long, env = "MYTHILENS_MODEL", default_value = ModelConfig::DEFAULT_MODEL)]
    model: String,
    #[arg(long, env = "MYTHILENS_API_URL", default_value = ModelConfig::DEFAULT_BASE_URL)]
    api_url: String,
}

impl Model {
    fn client(&self) -> Arc<HttpModelClient> {
        let mut config = ModelConfig::new(self.api_key.clone());
        config.model = self.model.clone();
        config.base_url = self.api_url.clone();
        Arc::new(HttpModelClient::new(config))
    }
}

#[derive(clap::Args)]
struct Submission {
    #[arg(long)]
    user: String,
    #[arg(long)]
    title: String,
    #[arg(long)]
    description: String,
    /// heritage_site, story, photo, correction, ...
    #[arg(long, default_value = "heritage_site")]
    kind: String,
    #[arg(long)]
    location: Option<String>,
    /// Latitude where the contribution was made; needs --lng.
    #[arg(long, allow_hyphen_values = true, requires = "lng")]
    lat: Option<f64>,
    #[arg(long, allow_hyphen_values = true, requires = "lat")]
    lng: Option<f64>,
}

impl Submission {
    fn payload(&self) -> anyhow::Result<ContributionPayload> {
        let location = match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(Coordinate::new(lat, lng)?),
            _ => None,
        };
        Ok(ContributionPayload {
            kind: self.kind.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            location_name: self.location.clone(),
            location,
        })
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Outcome {
    Approve,
    Reject,
}

#[derive(Clone, Copy, ValueEnum)]
enum Status {
    Pending,
    Approved,
    Rejected,
}

impl From<Status> for ContributionStatus {
    fn from(s: Status) -> Self {
        match s {
            Status::Pending => ContributionStatus::Pending,
            Status::Approved => ContributionStatus::Approved,
            Status::Rejected => ContributionStatus::Rejected,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Rank candidate sites (JSON array) by distance and popularity.
    Rank {
        #[command(flatten)]
        at: Location,
        #[arg(long)]
        candidates: PathBuf,
    },
    /// List sites (JSON array) within the radius, nearest first.
    Nearby {
        #[command(flatten)]
        at: Location,
        #[arg(long)]
        sites: PathBuf,
    },
    /// Ask the model for heritage sites around a location and rank them.
    Discover {
        #[command(flatten)]
        at: Location,
        #[command(flatten)]
        model: Model,
        /// Previously saved site as "title:kind"; repeatable.
        #[arg(long = "interest")]
        interests: Vec<String>,
    },
    /// Evaluate the auto-publish gate for a set of scores.
    Gate {
        #[arg(long)]
        accuracy: f64,
        #[arg(long)]
        sentiment: f64,
        #[arg(long)]
        ai_approve: bool,
        #[arg(long, default_value_t = 50.0)]
        reputation: f64,
    },
    /// Award points for an action.
    Award {
        #[arg(long)]
        user: String,
        /// scan, translation, contribution, review_without_photo, review_with_photo,
        /// question, helpful_vote, quiz_correct, step_completion, path_completion
        #[arg(long)]
        action: String,
    },
    /// Grant a badge.
    Badge {
        #[arg(long)]
        user: String,
        #[arg(long)]
        badge: String,
    },
    /// Set a user's reputation score (0-100).
    Reputation {
        #[arg(long)]
        user: String,
        #[arg(long)]
        score: f64,
    },
    /// Show a user's points, reputation and badges.
    Profile {
        #[arg(long)]
        user: String,
    },
    /// Submit a contribution with externally produced moderation scores.
    Submit {
        #[command(flatten)]
        submission: Submission,
        #[arg(long)]
        accuracy: f64,
        #[arg(long)]
        sentiment: f64,
        #[arg(long)]
        ai_approve: bool,
    },
    /// Score a contribution with the model, then submit it.
    Moderate {
        #[command(flatten)]
        submission: Submission,
        #[command(flatten)]
        model: Model,
    },
    /// Resolve a pending contribution.
    Review {
        #[arg(long)]
        id: u64,
        #[arg(long, value_enum)]
        outcome: Outcome,
    },
    /// List contributions.
    Contributions {
        #[arg(long, value_enum)]
        status: Option<Status>,
    },
    /// Top users by points.
    Leaderboard {
        #[arg(long, default_value_t = mythilens_core::leaderboard::DEFAULT_LIMIT)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();
    tracing::info!("mythilens v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    match cli.command {
        Command::Rank { at, candidates } => {
            let (user, radius) = at.resolve()?;
            let sites = read_sites(&candidates)?;
            display::print_ranked_sites(&rank(user, &sites, radius))?;
        }
        Command::Nearby { at, sites } => {
            let (user, radius) = at.resolve()?;
            let sites = read_sites(&sites)?;
            display::print_ranked_sites(&nearby(user, &sites, radius))?;
        }
        Command::Discover {
            at,
            model,
            interests,
        } => {
            let (user, radius) = at.resolve()?;
            let interests = interests
                .iter()
                .map(|s| parse_interest(s))
                .collect::<Vec<_>>();
            let recommender = Recommender::new(
                model.client(),
                DiscoveryConfig {
                    search_radius: radius,
                },
            );
            let ranked = recommender
                .discover(user, &interests)
                .await
                .context("discovering sites")?;
            display::print_ranked_sites(&ranked)?;
        }
        Command::Gate {
            accuracy,
            sentiment,
            ai_approve,
            reputation,
        } => {
            display::print_decision(decide(accuracy, sentiment, ai_approve, reputation));
        }
        Command::Award { user, action } => {
            let action: ActionKind = action.parse()?;
            let points = gamification(&cli.data).await?.award(&user, action).await?;
            println!("{user}: +{} ({action}) -> {points} points", action.points());
        }
        Command::Badge { user, badge } => {
            if gamification(&cli.data).await?.grant_badge(&user, &badge).await? {
                println!("{user} earned {badge:?}");
            } else {
                println!("{user} already holds {badge:?}");
            }
        }
        Command::Reputation { user, score } => {
            gamification(&cli.data).await?.set_reputation(&user, score).await?;
            println!("{user}: reputation {score:.1}");
        }
        Command::Profile { user } => {
            let gamification = gamification(&cli.data).await?;
            let profile = gamification.profile(&user).await?;
            let rank = gamification.rank_of(&user).await?;
            display::print_profile(&profile, rank);
        }
        Command::Submit {
            submission,
            accuracy,
            sentiment,
            ai_approve,
        } => {
            let scores = ModerationScores::new(accuracy, sentiment, ai_approve, None)?;
            let record = desk(&cli.data)
                .await?
                .submit(&submission.user, submission.payload()?, scores)
                .await?;
            display::print_contribution(&record);
        }
        Command::Moderate { submission, model } => {
            let payload = submission.payload()?;
            let verdict = Moderator::new(model.client())
                .assess(&payload)
                .await
                .context("moderating submission")?;
            if let Some(notes) = &verdict.sentiment_notes {
                tracing::info!(notes = %notes, "sentiment notes");
            }
            if let Some(improvements) = &verdict.improvements {
                tracing::info!(improvements = %improvements, "suggested improvements");
            }
            let record = desk(&cli.data)
                .await?
                .submit(&submission.user, payload, verdict.scores())
                .await?;
            display::print_contribution(&record);
        }
        Command::Review { id, outcome } => {
            let outcome = match outcome {
                Outcome::Approve => ReviewOutcome::Approve,
                Outcome::Reject => ReviewOutcome::Reject,
            };
            let record = desk(&cli.data).await?.review(id, outcome).await?;
            display::print_contribution(&record);
        }
        Command::Contributions { status } => {
            let records = desk(&cli.data).await?.list(status.map(Into::into)).await?;
            display::print_contributions(&records);
        }
        Command::Leaderboard { limit } => {
            let board = gamification(&cli.data).await?.leaderboard(limit).await?;
            display::print_leaderboard(&board)?;
        }
    }
    Ok(())
}

async fn open_store(path: &Path) -> anyhow::Result<Arc<JsonStore>> {
    let store = JsonStore::open(path)
        .await
        .with_context(|| format!("opening store {}", path.display()))?;
    Ok(Arc::new(store))
}

async fn gamification(path: &Path) -> anyhow::Result<Gamification> {
    Ok(Gamification::new(open_store(path).await?))
}

async fn desk(path: &Path) -> anyhow::Result<ContributionDesk> {
    Ok(ContributionDesk::new(open_store(path).await?))
}

fn read_sites(path: &Path) -> anyhow::Result<Vec<Site>> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parsing sites from {}", path.display()))
}

fn parse_interest(s: &str) -> Interest {
    match s.split_once(':') {
        Some((title, kind)) => Interest {
            title: title.trim().to_string(),
            kind: kind.trim().to_string(),
        },
        None => Interest {
            title: s.trim().to_string(),
            kind: "heritage site".to_string(),
        },
    }
}
