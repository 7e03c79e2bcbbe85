use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::db::repository::MatchRepository;
use crate::models::matches::MatchDetails;
use crate::utils::datetime::format_short_date;

pub const DEFAULT_HEAD_TO_HEAD_LIMIT: i64 = 5;

const EMPTY_TEAM: &str = "—";

/// The two sides of a match as sorted id sets. Slot order inside a team is
/// irrelevant and empty slots are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamPairing {
    pub team_a: Vec<Uuid>,
    pub team_b: Vec<Uuid>,
}

impl TeamPairing {
    pub fn from_slots(slots: [Option<Uuid>; 4]) -> Self {
        let team = |ids: &[Option<Uuid>]| {
            let mut ids: Vec<Uuid> = ids.iter().flatten().copied().collect();
            ids.sort();
            ids
        };
        Self {
            team_a: team(&slots[..2]),
            team_b: team(&slots[2..]),
        }
    }

    /// Same grouping, or the same grouping with sides swapped.
    pub fn matches(&self, other: &TeamPairing) -> bool {
        (self.team_a == other.team_a && self.team_b == other.team_b)
            || (self.team_a == other.team_b && self.team_b == other.team_a)
    }
}

/// One prior meeting, already resolved to display names.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadToHeadEntry {
    pub played_at: DateTime<Utc>,
    pub team_a: Vec<String>,
    pub team_b: Vec<String>,
    pub games: Option<(i32, i32)>,
    pub tiebreak: Option<(i32, i32)>,
    pub super_tiebreak: Option<(i32, i32)>,
}

fn both(a: Option<i32>, b: Option<i32>) -> Option<(i32, i32)> {
    a.zip(b)
}

impl HeadToHeadEntry {
    pub fn from_details(details: &MatchDetails) -> Self {
        let names = |slots: std::ops::Range<usize>| {
            slots
                .filter_map(|slot| details.participant_name(slot))
                .map(str::to_string)
                .collect::<Vec<_>>()
        };
        let record = &details.record;
        Self {
            played_at: record.played_at,
            team_a: names(0..2),
            team_b: names(2..4),
            games: both(record.games_a, record.games_b),
            tiebreak: both(record.tiebreak_a, record.tiebreak_b),
            super_tiebreak: both(record.super_tiebreak_a, record.super_tiebreak_b),
        }
    }

    /// e.g. `Ana/Bia 7x6 (TB 7-5) Carla/Duda - 12/05/2024`
    pub fn display_line(&self) -> String {
        let team = |names: &[String]| {
            if names.is_empty() {
                EMPTY_TEAM.to_string()
            } else {
                names.join("/")
            }
        };

        let mut parts = vec![team(&self.team_a)];
        if let Some((a, b)) = self.games {
            let mut score = format!("{}x{}", a, b);
            if let Some((ta, tb)) = self.tiebreak {
                score.push_str(&format!(" (TB {}-{})", ta, tb));
            }
            if let Some((sa, sb)) = self.super_tiebreak {
                score.push_str(&format!(" (STB {}-{})", sa, sb));
            }
            parts.push(score);
        }
        parts.push(team(&self.team_b));

        format!("{} - {}", parts.join(" "), format_short_date(self.played_at))
    }
}

/// Looks up earlier meetings between the same two teams.
pub struct HeadToHeadFinder<'a, R: MatchRepository + ?Sized> {
    repository: &'a R,
}

impl<'a, R: MatchRepository + ?Sized> HeadToHeadFinder<'a, R> {
    pub fn new(repository: &'a R) -> Self {
        Self { repository }
    }

    /// Most recent first. A missing base match or an empty first team yields
    /// no entries rather than an error.
    #[tracing::instrument(name = "Find head-to-head", skip(self))]
    pub async fn find(
        &self,
        match_id: Uuid,
        limit: i64,
    ) -> Result<Vec<HeadToHeadEntry>, sqlx::Error> {
        let Some(base) = self.repository.find_match_by_id(match_id).await? else {
            tracing::debug!("Base match {} not found, no head-to-head", match_id);
            return Ok(Vec::new());
        };
        self.find_for(&base, limit).await
    }

    /// Same as `find`, for a base match the caller has already loaded.
    pub async fn find_for(
        &self,
        base: &MatchDetails,
        limit: i64,
    ) -> Result<Vec<HeadToHeadEntry>, sqlx::Error> {
        let pairing = TeamPairing::from_slots(base.record.player_slots());
        if pairing.team_a.is_empty() {
            return Ok(Vec::new());
        }

        let prior = self
            .repository
            .find_prior_matches(&pairing, base.record.played_at, limit)
            .await?;

        Ok(prior
            .iter()
            .filter(|m| m.record.id != base.record.id)
            .map(HeadToHeadEntry::from_details)
            .collect())
    }
}
