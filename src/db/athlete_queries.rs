use sqlx::PgPool;
use uuid::Uuid;

use crate::models::athlete::{Athlete, CreateAthleteRequest, UpdateAthleteRequest};

#[derive(Debug, Clone)]
pub struct AthleteQueries {
    pool: PgPool,
}

impl AthleteQueries {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert_athlete(
        &self,
        user_id: Uuid,
        request: &CreateAthleteRequest,
    ) -> Result<Athlete, sqlx::Error> {
        sqlx::query_as::<_, Athlete>(
            r#"
            INSERT INTO athletes (id, user_id, name, birth_date, category, gender, phone, photo_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(request.name.trim())
        .bind(request.birth_date)
        .bind(&request.category)
        .bind(&request.gender)
        .bind(&request.phone)
        .bind(&request.photo_url)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Athlete>, sqlx::Error> {
        sqlx::query_as::<_, Athlete>("SELECT * FROM athletes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// `owner = None` lists every athlete.
    pub async fn list_athletes(&self, owner: Option<Uuid>) -> Result<Vec<Athlete>, sqlx::Error> {
        sqlx::query_as::<_, Athlete>(
            r#"
            SELECT * FROM athletes
            WHERE ($1::uuid IS NULL OR user_id = $1)
            ORDER BY name ASC
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn search_by_name(
        &self,
        search: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Athlete>, sqlx::Error> {
        sqlx::query_as::<_, Athlete>(
            r#"
            SELECT * FROM athletes
            WHERE name ILIKE '%' || $1 || '%'
            ORDER BY name ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(search)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn first_for_user(&self, user_id: Uuid) -> Result<Option<Athlete>, sqlx::Error> {
        sqlx::query_as::<_, Athlete>(
            "SELECT * FROM athletes WHERE user_id = $1 ORDER BY created_at ASC LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn update_athlete(
        &self,
        id: Uuid,
        request: &UpdateAthleteRequest,
    ) -> Result<Option<Athlete>, sqlx::Error> {
        sqlx::query_as::<_, Athlete>(
            r#"
            UPDATE athletes
            SET name = COALESCE($2, name),
                birth_date = COALESCE($3, birth_date),
                category = COALESCE($4, category),
                gender = COALESCE($5, gender),
                phone = COALESCE($6, phone),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.name.as_deref().map(str::trim))
        .bind(request.birth_date)
        .bind(&request.category)
        .bind(&request.gender)
        .bind(&request.phone)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn update_photo(
        &self,
        id: Uuid,
        photo_url: &str,
    ) -> Result<Option<Athlete>, sqlx::Error> {
        sqlx::query_as::<_, Athlete>(
            "UPDATE athletes SET photo_url = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(photo_url)
        .fetch_optional(&self.pool)
        .await
    }

    /// Ids from `ids` with no athlete row.
    pub async fn missing_ids(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, sqlx::Error> {
        sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT requested.id
            FROM unnest($1::uuid[]) AS requested(id)
            LEFT JOIN athletes a ON a.id = requested.id
            WHERE a.id IS NULL
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
    }
}
