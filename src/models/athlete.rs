use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::utils::age::age_on;

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct Athlete {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub birth_date: NaiveDate,
    pub category: Option<String>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Athlete as returned by listings, with the age derived from `birth_date`.
#[derive(Debug, Serialize, Clone)]
pub struct AthleteWithAge {
    #[serde(flatten)]
    pub athlete: Athlete,
    pub age: i32,
}

impl AthleteWithAge {
    pub fn new(athlete: Athlete, today: NaiveDate) -> Self {
        let age = age_on(athlete.birth_date, today);
        Self { athlete, age }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAthleteRequest {
    #[validate(length(min = 1, max = 120, message = "name is required"))]
    pub name: String,
    pub birth_date: NaiveDate,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    #[validate(url(message = "photo_url must be a valid URL"))]
    pub photo_url: Option<String>,
}

#[derive(Debug, Deserialize, Validate, Default)]
pub struct UpdateAthleteRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 120, message = "name cannot be empty"))]
    pub name: Option<String>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePhotoRequest {
    #[validate(url(message = "photo_url must be a valid URL"))]
    pub photo_url: String,
}

#[derive(Debug, Deserialize)]
pub struct AthleteSearchQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
}

impl AthleteSearchQuery {
    const DEFAULT_LIMIT: i64 = 10;
    const MAX_LIMIT: i64 = 100;

    /// Returns `(search, limit, offset)`; bad page/limit values fall back to defaults.
    pub fn normalized(&self) -> (String, i64, i64) {
        let search = self.q.as_deref().unwrap_or("").trim().to_string();
        let page = self.page.filter(|p| *p >= 1).unwrap_or(1);
        let limit = self
            .limit
            .filter(|l| *l >= 1)
            .unwrap_or(Self::DEFAULT_LIMIT)
            .min(Self::MAX_LIMIT);
        (search, limit, (page - 1) * limit)
    }
}
