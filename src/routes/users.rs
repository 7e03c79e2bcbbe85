use actix_web::{get, put, web, HttpResponse};
use sqlx::PgPool;

use crate::auth::Principal;
use crate::error::AppResult;
use crate::handlers::user_handler;
use crate::models::user::UpdateProfileRequest;

#[get("/me")]
async fn get_me(
    pool: web::Data<PgPool>,
    principal: web::ReqData<Principal>,
) -> AppResult<HttpResponse> {
    user_handler::get_current_user(pool, principal).await
}

#[put("/profile")]
async fn update_profile(
    request: web::Json<UpdateProfileRequest>,
    pool: web::Data<PgPool>,
    principal: web::ReqData<Principal>,
) -> AppResult<HttpResponse> {
    user_handler::update_profile(request, pool, principal).await
}

/// Admin only; mounted behind `AdminMiddleware`.
pub async fn list_users(pool: web::Data<PgPool>) -> AppResult<HttpResponse> {
    user_handler::list_users(pool).await
}
