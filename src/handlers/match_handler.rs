use actix_web::{web, HttpResponse};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::Principal;
use crate::db::athlete_queries::AthleteQueries;
use crate::db::helpers::require_record;
use crate::db::match_queries::MatchQueries;
use crate::db::repository::MatchRepository;
use crate::error::{AppError, AppResult};
use crate::league::validation::ScoreValidator;
use crate::models::matches::{CreateMatchRequest, NewMatch, ScoreUpdateRequest};

#[tracing::instrument(
    name = "Create match",
    skip(request, pool, principal),
    fields(user_id = %principal.user_id, played_at = %request.played_at)
)]
pub async fn create_match(
    request: web::Json<CreateMatchRequest>,
    pool: web::Data<PgPool>,
    principal: web::ReqData<Principal>,
) -> AppResult<HttpResponse> {
    let request = request.into_inner();
    let (player1_id, player2_id) = match (request.player1_id, request.player2_id) {
        (Some(p1), Some(p2)) => (p1, p2),
        _ => return Err(AppError::BadRequest("player1_id and player2_id are required".into())),
    };

    let score = if request.score.is_blank() {
        None
    } else {
        Some(ScoreValidator::new().validate_request(&request.score)?)
    };

    let ids: Vec<Uuid> = [
        Some(player1_id),
        Some(player2_id),
        request.player3_id,
        request.player4_id,
    ]
    .into_iter()
    .flatten()
    .collect();
    let missing = AthleteQueries::new(pool.get_ref().clone())
        .missing_ids(&ids)
        .await?;
    if let Some(id) = missing.first() {
        return Err(AppError::BadRequest(format!("Athlete {} not found", id)));
    }

    let matches = MatchQueries::new(pool.get_ref().clone());
    if let Some(tournament_id) = request.tournament_id {
        if !matches.tournament_exists(tournament_id).await? {
            return Err(AppError::BadRequest(format!("Tournament {} not found", tournament_id)));
        }
    }

    let created = matches
        .create_match(&NewMatch {
            played_at: request.played_at,
            location: request.location.map(|l| l.trim().to_string()).filter(|l| !l.is_empty()),
            player1_id,
            player2_id,
            player3_id: request.player3_id,
            player4_id: request.player4_id,
            tournament_id: request.tournament_id,
            score,
        })
        .await?;

    tracing::info!("Match {} created", created.id);
    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "match": created
    })))
}

#[tracing::instrument(name = "List matches", skip(pool))]
pub async fn list_matches(pool: web::Data<PgPool>) -> AppResult<HttpResponse> {
    let matches = MatchQueries::new(pool.get_ref().clone()).list_matches().await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": matches,
        "total_count": matches.len()
    })))
}

/// Validation runs before any database access; a rejected score is never written.
#[tracing::instrument(
    name = "Update match score",
    skip(request, repository, principal),
    fields(user_id = %principal.user_id)
)]
pub async fn update_match_score<R>(
    match_id: Uuid,
    request: web::Json<ScoreUpdateRequest>,
    repository: &R,
    principal: web::ReqData<Principal>,
) -> AppResult<HttpResponse>
where
    R: MatchRepository + ?Sized,
{
    let score = ScoreValidator::new()
        .validate_request(&request)
        .map_err(|e| {
            tracing::info!("Rejected score for match {}: {}", match_id, e);
            e
        })?;

    let updated = require_record(
        repository.update_match_score(match_id, &score).await,
        "Match not found",
    )?;

    tracing::info!(
        "Score for match {} set to {}-{}",
        match_id,
        updated.games_a.unwrap_or_default(),
        updated.games_b.unwrap_or_default()
    );
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "match": updated
    })))
}
