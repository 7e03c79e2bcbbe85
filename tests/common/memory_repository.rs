use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

use courtside_backend::db::repository::MatchRepository;
use courtside_backend::league::head_to_head::TeamPairing;
use courtside_backend::models::matches::{Match, MatchDetails, MatchScore};

/// `MatchRepository` over a vector, applying the same pairing rule as the
/// Postgres implementation.
#[derive(Default)]
pub struct InMemoryMatchRepository {
    matches: Mutex<Vec<MatchDetails>>,
    fail_prior_lookups: bool,
    id_lookups: AtomicUsize,
}

impl InMemoryMatchRepository {
    pub fn new(matches: Vec<MatchDetails>) -> Self {
        Self {
            matches: Mutex::new(matches),
            fail_prior_lookups: false,
            id_lookups: AtomicUsize::new(0),
        }
    }

    pub fn failing_history(matches: Vec<MatchDetails>) -> Self {
        Self {
            matches: Mutex::new(matches),
            fail_prior_lookups: true,
            id_lookups: AtomicUsize::new(0),
        }
    }

    /// Number of `find_match_by_id` calls so far.
    pub fn id_lookups(&self) -> usize {
        self.id_lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MatchRepository for InMemoryMatchRepository {
    async fn find_match_by_id(&self, id: Uuid) -> Result<Option<MatchDetails>, sqlx::Error> {
        self.id_lookups.fetch_add(1, Ordering::SeqCst);
        let matches = self.matches.lock().unwrap();
        Ok(matches.iter().find(|m| m.record.id == id).cloned())
    }

    async fn find_prior_matches(
        &self,
        pairing: &TeamPairing,
        before: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<MatchDetails>, sqlx::Error> {
        if self.fail_prior_lookups {
            return Err(sqlx::Error::PoolTimedOut);
        }
        let matches = self.matches.lock().unwrap();
        let mut prior: Vec<MatchDetails> = matches
            .iter()
            .filter(|m| m.record.played_at < before)
            .filter(|m| pairing.matches(&TeamPairing::from_slots(m.record.player_slots())))
            .cloned()
            .collect();
        prior.sort_by(|a, b| b.record.played_at.cmp(&a.record.played_at));
        prior.truncate(limit.max(0) as usize);
        Ok(prior)
    }

    async fn update_match_score(
        &self,
        id: Uuid,
        score: &MatchScore,
    ) -> Result<Option<Match>, sqlx::Error> {
        let mut matches = self.matches.lock().unwrap();
        Ok(matches.iter_mut().find(|m| m.record.id == id).map(|m| {
            m.record.games_a = Some(score.games_a);
            m.record.games_b = Some(score.games_b);
            m.record.tiebreak_a = score.tiebreak_a;
            m.record.tiebreak_b = score.tiebreak_b;
            m.record.clone()
        }))
    }
}
