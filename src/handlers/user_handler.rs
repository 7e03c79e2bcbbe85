use actix_web::{web, HttpResponse};
use secrecy::ExposeSecret;
use serde_json::json;
use sqlx::PgPool;

use crate::auth::Principal;
use crate::db::helpers::require_record;
use crate::db::user_queries::UserQueries;
use crate::error::{AppError, AppResult};
use crate::models::user::{UpdateProfileRequest, UserResponse};
use crate::utils::password::hash_password;

#[tracing::instrument(
    name = "Get current user",
    skip(pool, principal),
    fields(user_id = %principal.user_id)
)]
pub async fn get_current_user(
    pool: web::Data<PgPool>,
    principal: web::ReqData<Principal>,
) -> AppResult<HttpResponse> {
    let user = require_record(
        UserQueries::new(pool.get_ref().clone()).find_by_id(principal.user_id).await,
        "User not found",
    )?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "user": UserResponse::from(user)
    })))
}

#[tracing::instrument(
    name = "Update profile",
    skip(request, pool, principal),
    fields(user_id = %principal.user_id)
)]
pub async fn update_profile(
    request: web::Json<UpdateProfileRequest>,
    pool: web::Data<PgPool>,
    principal: web::ReqData<Principal>,
) -> AppResult<HttpResponse> {
    let name = request
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());

    let password_hash = match &request.password {
        Some(password) => Some(
            hash_password(password.expose_secret())
                .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?,
        ),
        None => None,
    };

    if name.is_none() && password_hash.is_none() {
        return Err(AppError::BadRequest("Nothing to update".into()));
    }

    let user = require_record(
        UserQueries::new(pool.get_ref().clone())
            .update_profile(principal.user_id, name, password_hash.as_deref())
            .await,
        "User not found",
    )?;

    tracing::info!("Profile updated for user {}", user.id);
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Profile updated",
        "user": UserResponse::from(user)
    })))
}

#[tracing::instrument(name = "List users", skip(pool))]
pub async fn list_users(pool: web::Data<PgPool>) -> AppResult<HttpResponse> {
    let users: Vec<UserResponse> = UserQueries::new(pool.get_ref().clone())
        .list_users()
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": users,
        "total_count": users.len()
    })))
}
