use actix_web::{get, post, web, HttpResponse};
use sqlx::PgPool;

use crate::auth::Principal;
use crate::error::AppResult;
use crate::handlers::auth_handler;
use crate::models::user::{LoginRequest, RegistrationRequest};

#[post("/auth/register")]
async fn register(
    user_form: web::Json<RegistrationRequest>,
    pool: web::Data<PgPool>,
) -> AppResult<HttpResponse> {
    auth_handler::register_user(user_form, pool).await
}

#[post("/auth/login")]
async fn login(
    login_form: web::Json<LoginRequest>,
    pool: web::Data<PgPool>,
) -> AppResult<HttpResponse> {
    auth_handler::login_user(login_form, pool).await
}

#[get("/me")]
async fn me(principal: web::ReqData<Principal>) -> HttpResponse {
    auth_handler::current_principal(principal).await
}
