/// Arrow schemas and batch builders for tabular output.
pub mod heritage {
    use std::sync::Arc;

    use arrow::array::{ArrayRef, BooleanArray, Float64Array, StringArray, UInt64Array};
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::error::ArrowError;
    use arrow::record_batch::RecordBatch;

    use crate::leaderboard::LeaderboardEntry;
    use crate::ranking::RankedSite;

    /// Schema for ranked or nearby site listings.
    pub fn ranked_site_schema() -> Schema {
        Schema::new(vec![
            Field::new("site_id", DataType::Utf8, false),
            Field::new("name", DataType::Utf8, false),
            Field::new("category", DataType::Utf8, false),
            Field::new("latitude", DataType::Float64, false),
            Field::new("longitude", DataType::Float64, false),
            Field::new("distance_km", DataType::Float64, false),
            Field::new("popularity", DataType::Float64, false),
            Field::new("popular", DataType::Boolean, false),
            Field::new("rank_score", DataType::Float64, false),
            Field::new("recommended_reason", DataType::Utf8, true),
        ])
    }

    /// Schema for the points leaderboard.
    pub fn leaderboard_schema() -> Schema {
        Schema::new(vec![
            Field::new("rank", DataType::UInt64, false),
            Field::new("user_id", DataType::Utf8, false),
            Field::new("points", DataType::UInt64, false),
            Field::new("reputation", DataType::Float64, false),
            Field::new("badges", DataType::UInt64, false),
        ])
    }

    pub fn ranked_sites_batch(sites: &[RankedSite]) -> Result<RecordBatch, ArrowError> {
        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from_iter_values(sites.iter().map(|r| r.site.id.as_str()))),
            Arc::new(StringArray::from_iter_values(sites.iter().map(|r| r.site.name.as_str()))),
            Arc::new(StringArray::from_iter_values(
                sites.iter().map(|r| r.site.category.as_str()),
            )),
            Arc::new(Float64Array::from_iter_values(sites.iter().map(|r| r.coordinate.lat()))),
            Arc::new(Float64Array::from_iter_values(sites.iter().map(|r| r.coordinate.lng()))),
            Arc::new(Float64Array::from_iter_values(sites.iter().map(|r| r.distance_km))),
            Arc::new(Float64Array::from_iter_values(sites.iter().map(|r| r.site.popularity))),
            Arc::new(BooleanArray::from(
                sites.iter().map(|r| r.site.is_popular()).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from_iter_values(sites.iter().map(|r| r.rank_score))),
            Arc::new(StringArray::from(
                sites
                    .iter()
                    .map(|r| r.site.recommended_reason.as_deref())
                    .collect::<Vec<_>>(),
            )),
        ];
        RecordBatch::try_new(Arc::new(ranked_site_schema()), columns)
    }

    pub fn leaderboard_batch(entries: &[LeaderboardEntry]) -> Result<RecordBatch, ArrowError> {
        let columns: Vec<ArrayRef> = vec![
            Arc::new(UInt64Array::from_iter_values(entries.iter().map(|e| e.rank as u64))),
            Arc::new(StringArray::from_iter_values(entries.iter().map(|e| e.user_id.as_str()))),
            Arc::new(UInt64Array::from_iter_values(entries.iter().map(|e| e.points))),
            Arc::new(Float64Array::from_iter_values(
                entries.iter().map(|e| e.reputation_score),
            )),
            Arc::new(UInt64Array::from_iter_values(
                entries.iter().map(|e| e.badge_count as u64),
            )),
        ];
        RecordBatch::try_new(Arc::new(leaderboard_schema()), columns)
    }
}
