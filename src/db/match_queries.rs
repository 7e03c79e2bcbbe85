use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::db::repository::MatchRepository;
use crate::league::head_to_head::TeamPairing;
use crate::models::matches::{Match, MatchDetails, MatchDetailsRow, MatchScore, NewMatch};

const MATCH_COLUMNS: &str = r#"
    m.id, m.played_at, m.location,
    m.player1_id, m.player2_id, m.player3_id, m.player4_id,
    m.games_a, m.games_b, m.tiebreak_a, m.tiebreak_b,
    m.super_tiebreak_a, m.super_tiebreak_b,
    m.tournament_id, m.created_at, m.updated_at,
    a1.name AS player1_name, a1.photo_url AS player1_photo_url,
    a2.name AS player2_name, a2.photo_url AS player2_photo_url,
    a3.name AS player3_name, a3.photo_url AS player3_photo_url,
    a4.name AS player4_name, a4.photo_url AS player4_photo_url
"#;

const MATCH_JOINS: &str = r#"
    FROM matches m
    LEFT JOIN athletes a1 ON a1.id = m.player1_id
    LEFT JOIN athletes a2 ON a2.id = m.player2_id
    LEFT JOIN athletes a3 ON a3.id = m.player3_id
    LEFT JOIN athletes a4 ON a4.id = m.player4_id
"#;

/// Sorted non-null ids of two slots, comparable to a sorted `uuid[]` bind.
fn team_array(first: &str, second: &str) -> String {
    format!(
        "ARRAY(SELECT x FROM unnest(ARRAY[{first}, {second}]::uuid[]) AS x WHERE x IS NOT NULL ORDER BY x)"
    )
}

#[derive(Debug, Clone)]
pub struct MatchQueries {
    pool: PgPool,
}

impl MatchQueries {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_match(&self, new_match: &NewMatch) -> Result<Match, sqlx::Error> {
        info!("Creating match at {}", new_match.played_at);
        let score = new_match.score;

        sqlx::query_as::<_, Match>(
            r#"
            INSERT INTO matches (
                id, played_at, location,
                player1_id, player2_id, player3_id, player4_id,
                games_a, games_b, tiebreak_a, tiebreak_b,
                tournament_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new_match.played_at)
        .bind(&new_match.location)
        .bind(new_match.player1_id)
        .bind(new_match.player2_id)
        .bind(new_match.player3_id)
        .bind(new_match.player4_id)
        .bind(score.map(|s| s.games_a))
        .bind(score.map(|s| s.games_b))
        .bind(score.and_then(|s| s.tiebreak_a))
        .bind(score.and_then(|s| s.tiebreak_b))
        .bind(new_match.tournament_id)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn list_matches(&self) -> Result<Vec<MatchDetails>, sqlx::Error> {
        let sql = format!("SELECT {MATCH_COLUMNS} {MATCH_JOINS} ORDER BY m.played_at DESC");
        let rows = sqlx::query_as::<_, MatchDetailsRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(MatchDetails::from).collect())
    }

    pub async fn tournament_exists(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM tournaments WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
    }
}

#[async_trait]
impl MatchRepository for MatchQueries {
    async fn find_match_by_id(&self, id: Uuid) -> Result<Option<MatchDetails>, sqlx::Error> {
        let sql = format!("SELECT {MATCH_COLUMNS} {MATCH_JOINS} WHERE m.id = $1");
        let row = sqlx::query_as::<_, MatchDetailsRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(MatchDetails::from))
    }

    async fn find_prior_matches(
        &self,
        pairing: &TeamPairing,
        before: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<MatchDetails>, sqlx::Error> {
        debug!("Looking up prior matches before {} (limit {})", before, limit);

        let first = team_array("m.player1_id", "m.player2_id");
        let second = team_array("m.player3_id", "m.player4_id");
        let sql = format!(
            r#"
            SELECT {MATCH_COLUMNS} {MATCH_JOINS}
            WHERE m.played_at < $1
              AND (
                    ({first} = $2::uuid[] AND {second} = $3::uuid[])
                 OR ({first} = $3::uuid[] AND {second} = $2::uuid[])
              )
            ORDER BY m.played_at DESC
            LIMIT $4
            "#
        );

        let rows = sqlx::query_as::<_, MatchDetailsRow>(&sql)
            .bind(before)
            .bind(pairing.team_a.as_slice())
            .bind(pairing.team_b.as_slice())
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(MatchDetails::from).collect())
    }

    async fn update_match_score(
        &self,
        id: Uuid,
        score: &MatchScore,
    ) -> Result<Option<Match>, sqlx::Error> {
        info!("Updating score for match {}", id);

        sqlx::query_as::<_, Match>(
            r#"
            UPDATE matches
            SET games_a = $2,
                games_b = $3,
                tiebreak_a = $4,
                tiebreak_b = $5,
                super_tiebreak_a = NULL,
                super_tiebreak_b = NULL,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(score.games_a)
        .bind(score.games_b)
        .bind(score.tiebreak_a)
        .bind(score.tiebreak_b)
        .fetch_optional(&self.pool)
        .await
    }
}
