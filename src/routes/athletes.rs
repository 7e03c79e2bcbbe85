use actix_web::{get, post, put, web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::Principal;
use crate::error::AppResult;
use crate::handlers::athlete_handler;
use crate::models::athlete::{
    AthleteSearchQuery, CreateAthleteRequest, UpdateAthleteRequest, UpdatePhotoRequest,
};

#[post("")]
async fn create_athlete(
    request: web::Json<CreateAthleteRequest>,
    pool: web::Data<PgPool>,
    principal: web::ReqData<Principal>,
) -> AppResult<HttpResponse> {
    athlete_handler::create_athlete(request, pool, principal).await
}

#[get("")]
async fn list_athletes(
    pool: web::Data<PgPool>,
    principal: web::ReqData<Principal>,
) -> AppResult<HttpResponse> {
    athlete_handler::list_athletes(pool, principal).await
}

#[get("/search")]
async fn search_athletes(
    query: web::Query<AthleteSearchQuery>,
    pool: web::Data<PgPool>,
) -> AppResult<HttpResponse> {
    athlete_handler::search_athletes(query, pool).await
}

#[get("/me")]
async fn get_my_athlete(
    pool: web::Data<PgPool>,
    principal: web::ReqData<Principal>,
) -> AppResult<HttpResponse> {
    athlete_handler::get_my_athlete(pool, principal).await
}

#[put("/{athlete_id}")]
async fn update_athlete(
    path: web::Path<Uuid>,
    request: web::Json<UpdateAthleteRequest>,
    pool: web::Data<PgPool>,
    principal: web::ReqData<Principal>,
) -> AppResult<HttpResponse> {
    athlete_handler::update_athlete(path.into_inner(), request, pool, principal).await
}

#[put("/{athlete_id}/photo")]
async fn update_athlete_photo(
    path: web::Path<Uuid>,
    request: web::Json<UpdatePhotoRequest>,
    pool: web::Data<PgPool>,
    principal: web::ReqData<Principal>,
) -> AppResult<HttpResponse> {
    athlete_handler::update_athlete_photo(path.into_inner(), request, pool, principal).await
}
