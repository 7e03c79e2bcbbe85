use actix_web::{web, HttpResponse};
use secrecy::ExposeSecret;
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

use crate::auth::Principal;
use crate::db::helpers::ensure_not_exists;
use crate::db::user_queries::UserQueries;
use crate::error::{AppError, AppResult};
use crate::models::user::{
    normalize_email, LoginRequest, RegistrationRequest, UserResponse, UserRole,
};
use crate::utils::password::{hash_password, verify_password};

const REGISTRATION_REJECTED: &str = "Unable to create account";

#[tracing::instrument(
    name = "Adding a new user",
    skip(user_form, pool),
    fields(email = %user_form.email)
)]
pub async fn register_user(
    user_form: web::Json<RegistrationRequest>,
    pool: web::Data<PgPool>,
) -> AppResult<HttpResponse> {
    user_form
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let password = user_form.password.expose_secret();
    if password.is_empty() {
        return Err(AppError::BadRequest("password is required".into()));
    }

    let users = UserQueries::new(pool.get_ref().clone());
    let email = normalize_email(&user_form.email);

    // Duplicates get the same neutral answer as any other refusal
    ensure_not_exists(users.find_by_email(&email).await, REGISTRATION_REJECTED)
        .map_err(|e| match e {
            AppError::Conflict(msg) => AppError::BadRequest(msg),
            other => other,
        })?;

    let password_hash = hash_password(password)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    let role = UserRole::normalize(user_form.role.as_deref());

    let user = users
        .insert_user(user_form.name.trim(), &email, &password_hash, role)
        .await?;

    tracing::info!("User {} registered with role {}", user.id, user.role);
    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "user": UserResponse::from(user)
    })))
}

/// Checks credentials without issuing a token.
#[tracing::instrument(
    name = "Checking user credentials",
    skip(login_form, pool),
    fields(email = %login_form.email)
)]
pub async fn login_user(
    login_form: web::Json<LoginRequest>,
    pool: web::Data<PgPool>,
) -> AppResult<HttpResponse> {
    let email = normalize_email(&login_form.email);
    let password = login_form.password.expose_secret();
    if email.is_empty() || password.is_empty() {
        return Err(AppError::BadRequest("email and password are required".into()));
    }

    let user = UserQueries::new(pool.get_ref().clone())
        .find_by_email(&email)
        .await?
        .filter(|user| verify_password(password, &user.password_hash))
        .ok_or_else(|| AppError::Unauthorized("Invalid email or password".into()))?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "user": UserResponse::from(user)
    })))
}

pub async fn current_principal(principal: web::ReqData<Principal>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "success": true,
        "user": principal.into_inner()
    }))
}
