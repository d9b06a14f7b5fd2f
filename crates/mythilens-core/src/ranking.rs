//! Proximity/popularity ranking for heritage site discovery.
//!
//! Candidate sites come from an external recommendation source with raw,
//! possibly missing coordinates. Ranking keeps only placeable candidates and
//! orders them by a composite score:
//!
//! ```text
//! score = (distance_km / radius_km) * 0.4 + (10 - popularity) * 0.6
//! ```
//!
//! Lower scores sort first, so a very popular site somewhat farther away can
//! outrank a mediocre one next door. Ties keep input order.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::CoreError;
use crate::geo::Coordinate;

/// Weight of the normalised distance term.
pub const DISTANCE_WEIGHT: f64 = 0.4;
/// Weight of the inverted popularity term.
pub const POPULARITY_WEIGHT: f64 = 0.6;
/// Top of the popularity scale.
pub const MAX_POPULARITY: f64 = 10.0;
/// Popularity at or above which a site is flagged as popular.
pub const POPULAR_THRESHOLD: f64 = 7.0;

/// Search radius used to normalise distances. Finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct SearchRadius(f64);

impl SearchRadius {
    pub fn new(km: f64) -> Result<Self, CoreError> {
        if km.is_finite() && km > 0.0 {
            Ok(Self(km))
        } else {
            Err(CoreError::InvalidRadius(km))
        }
    }

    pub fn km(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for SearchRadius {
    type Error = CoreError;

    fn try_from(km: f64) -> Result<Self, Self::Error> {
        SearchRadius::new(km)
    }
}

impl From<SearchRadius> for f64 {
    fn from(r: SearchRadius) -> f64 {
        r.0
    }
}

/// Discovery defaults shared by callers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    pub search_radius: SearchRadius,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            search_radius: SearchRadius(5.0),
        }
    }
}

/// A candidate heritage site as supplied by an external source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub id: String,
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// 0-10, externally supplied.
    pub popularity: f64,
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub mythology_connection: Option<String>,
    #[serde(default)]
    pub recommended_reason: Option<String>,
}

impl Site {
    /// The site's location, if both components are present and valid.
    pub fn coordinate(&self) -> Option<Coordinate> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Coordinate::new(lat, lng).ok(),
            _ => None,
        }
    }

    pub fn is_popular(&self) -> bool {
        self.popularity >= POPULAR_THRESHOLD
    }
}

/// A placeable site with its derived distance and rank score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedSite {
    pub site: Site,
    pub coordinate: Coordinate,
    pub distance_km: f64,
    pub rank_score: f64,
}

/// Composite rank score. Lower is better.
pub fn rank_score(distance_km: f64, popularity: f64, radius: SearchRadius) -> f64 {
    (distance_km / radius.km()) * DISTANCE_WEIGHT
        + (MAX_POPULARITY - popularity) * POPULARITY_WEIGHT
}

/// Rank candidates by the composite proximity/popularity score.
///
/// Candidates without a valid coordinate, or with a non-finite popularity,
/// are dropped. The sort is stable, so equal scores keep input order.
pub fn rank(user: Coordinate, candidates: &[Site], radius: SearchRadius) -> Vec<RankedSite> {
    let mut ranked = place(user, candidates, radius);
    ranked.sort_by(|a, b| a.rank_score.total_cmp(&b.rank_score));
    ranked
}

/// Sites within `radius` of the user, nearest first.
pub fn nearby(user: Coordinate, sites: &[Site], radius: SearchRadius) -> Vec<RankedSite> {
    let mut within: Vec<RankedSite> = place(user, sites, radius)
        .into_iter()
        .filter(|r| r.distance_km <= radius.km())
        .collect();
    within.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    within
}

fn place(user: Coordinate, candidates: &[Site], radius: SearchRadius) -> Vec<RankedSite> {
    candidates
        .iter()
        .filter_map(|site| {
            let Some(coordinate) = site.coordinate() else {
                debug!(site = %site.id, "dropping candidate without a valid coordinate");
                return None;
            };
            if !site.popularity.is_finite() {
                debug!(site = %site.id, "dropping candidate with non-finite popularity");
                return None;
            }
            let distance_km = user.distance_km(&coordinate);
            Some(RankedSite {
                site: site.clone(),
                coordinate,
                distance_km,
                rank_score: rank_score(distance_km, site.popularity, radius),
            })
        })
        .collect()
}
