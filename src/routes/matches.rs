use actix_web::{get, post, put, web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::Principal;
use crate::db::match_queries::MatchQueries;
use crate::error::AppResult;
use crate::handlers::match_handler;
use crate::models::matches::{CreateMatchRequest, ScoreUpdateRequest};

#[post("")]
async fn create_match(
    request: web::Json<CreateMatchRequest>,
    pool: web::Data<PgPool>,
    principal: web::ReqData<Principal>,
) -> AppResult<HttpResponse> {
    match_handler::create_match(request, pool, principal).await
}

#[get("")]
async fn list_matches(pool: web::Data<PgPool>) -> AppResult<HttpResponse> {
    match_handler::list_matches(pool).await
}

#[put("/{match_id}/score")]
async fn update_score(
    path: web::Path<Uuid>,
    request: web::Json<ScoreUpdateRequest>,
    pool: web::Data<PgPool>,
    principal: web::ReqData<Principal>,
) -> AppResult<HttpResponse> {
    let repository = MatchQueries::new(pool.get_ref().clone());
    match_handler::update_match_score(path.into_inner(), request, &repository, principal).await
}
