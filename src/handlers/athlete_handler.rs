use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::auth::Principal;
use crate::db::athlete_queries::AthleteQueries;
use crate::db::helpers::require_record;
use crate::error::{AppError, AppResult};
use crate::models::athlete::{
    Athlete, AthleteSearchQuery, AthleteWithAge, CreateAthleteRequest, UpdateAthleteRequest,
    UpdatePhotoRequest,
};
use crate::models::common::Paginated;

fn with_age(athletes: Vec<Athlete>) -> Vec<AthleteWithAge> {
    let today = Utc::now().date_naive();
    athletes
        .into_iter()
        .map(|athlete| AthleteWithAge::new(athlete, today))
        .collect()
}

/// Owners and admins may edit an athlete; anyone else gets 403.
async fn load_editable_athlete(
    queries: &AthleteQueries,
    athlete_id: Uuid,
    principal: &Principal,
) -> AppResult<Athlete> {
    let athlete = require_record(queries.find_by_id(athlete_id).await, "Athlete not found")?;
    if athlete.user_id != principal.user_id && !principal.is_admin() {
        tracing::warn!(
            "User {} attempted to edit athlete {} owned by {}",
            principal.user_id,
            athlete_id,
            athlete.user_id
        );
        return Err(AppError::Forbidden("Access denied".into()));
    }
    Ok(athlete)
}

#[tracing::instrument(
    name = "Create athlete",
    skip(request, pool, principal),
    fields(user_id = %principal.user_id, name = %request.name)
)]
pub async fn create_athlete(
    request: web::Json<CreateAthleteRequest>,
    pool: web::Data<PgPool>,
    principal: web::ReqData<Principal>,
) -> AppResult<HttpResponse> {
    request
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    if request.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".into()));
    }

    let athlete = AthleteQueries::new(pool.get_ref().clone())
        .insert_athlete(principal.user_id, &request)
        .await?;

    tracing::info!("Athlete {} created", athlete.id);
    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "athlete": athlete
    })))
}

#[tracing::instrument(
    name = "List athletes",
    skip(pool, principal),
    fields(user_id = %principal.user_id, admin = principal.is_admin())
)]
pub async fn list_athletes(
    pool: web::Data<PgPool>,
    principal: web::ReqData<Principal>,
) -> AppResult<HttpResponse> {
    let owner = (!principal.is_admin()).then_some(principal.user_id);
    let athletes = AthleteQueries::new(pool.get_ref().clone())
        .list_athletes(owner)
        .await?;
    let athletes = with_age(athletes);

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": athletes,
        "total_count": athletes.len()
    })))
}

#[tracing::instrument(name = "Search athletes", skip(query, pool), fields(q = ?query.q))]
pub async fn search_athletes(
    query: web::Query<AthleteSearchQuery>,
    pool: web::Data<PgPool>,
) -> AppResult<HttpResponse> {
    let (search, limit, offset) = query.normalized();
    let athletes = AthleteQueries::new(pool.get_ref().clone())
        .search_by_name(&search, limit, offset)
        .await?;

    Ok(HttpResponse::Ok().json(Paginated::new(with_age(athletes), limit, offset)))
}

/// 204 when the caller has no athlete profile yet.
#[tracing::instrument(
    name = "Get own athlete",
    skip(pool, principal),
    fields(user_id = %principal.user_id)
)]
pub async fn get_my_athlete(
    pool: web::Data<PgPool>,
    principal: web::ReqData<Principal>,
) -> AppResult<HttpResponse> {
    let athlete = AthleteQueries::new(pool.get_ref().clone())
        .first_for_user(principal.user_id)
        .await?;

    Ok(match athlete {
        Some(athlete) => {
            let today = Utc::now().date_naive();
            HttpResponse::Ok().json(AthleteWithAge::new(athlete, today))
        }
        None => HttpResponse::NoContent().finish(),
    })
}

#[tracing::instrument(
    name = "Update athlete",
    skip(request, pool, principal),
    fields(user_id = %principal.user_id)
)]
pub async fn update_athlete(
    athlete_id: Uuid,
    request: web::Json<UpdateAthleteRequest>,
    pool: web::Data<PgPool>,
    principal: web::ReqData<Principal>,
) -> AppResult<HttpResponse> {
    request
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let queries = AthleteQueries::new(pool.get_ref().clone());
    load_editable_athlete(&queries, athlete_id, &principal).await?;

    let athlete = require_record(
        queries.update_athlete(athlete_id, &request).await,
        "Athlete not found",
    )?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "athlete": athlete
    })))
}

#[tracing::instrument(
    name = "Update athlete photo",
    skip(request, pool, principal),
    fields(user_id = %principal.user_id)
)]
pub async fn update_athlete_photo(
    athlete_id: Uuid,
    request: web::Json<UpdatePhotoRequest>,
    pool: web::Data<PgPool>,
    principal: web::ReqData<Principal>,
) -> AppResult<HttpResponse> {
    request
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let queries = AthleteQueries::new(pool.get_ref().clone());
    load_editable_athlete(&queries, athlete_id, &principal).await?;

    let athlete = require_record(
        queries.update_photo(athlete_id, request.photo_url.trim()).await,
        "Athlete not found",
    )?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Photo updated",
        "athlete": athlete
    })))
}
