use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::league::head_to_head::TeamPairing;
use crate::models::matches::{Match, MatchDetails, MatchScore};

/// Read/write surface the score and card pipelines depend on.
#[async_trait]
pub trait MatchRepository: Send + Sync {
    async fn find_match_by_id(&self, id: Uuid) -> Result<Option<MatchDetails>, sqlx::Error>;

    /// Matches strictly before `before` whose teams equal `pairing` in either
    /// orientation, newest first.
    async fn find_prior_matches(
        &self,
        pairing: &TeamPairing,
        before: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<MatchDetails>, sqlx::Error>;

    /// Returns `None` when no match has this id.
    async fn update_match_score(
        &self,
        id: Uuid,
        score: &MatchScore,
    ) -> Result<Option<Match>, sqlx::Error>;
}
