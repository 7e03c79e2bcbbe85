use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::{http, web, App, HttpServer};
use sqlx::PgPool;
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

pub mod auth;
pub mod card;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod league;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod telemetry;
pub mod utils;

use crate::auth::Authenticator;
use crate::card::CardRenderer;
use crate::config::card::CardSettings;
use crate::config::jwt::JwtSettings;
use crate::config::settings::AuthMode;
use crate::routes::{init_routes, route_not_found};

pub fn run(
    listener: TcpListener,
    db_pool: PgPool,
    jwt_settings: JwtSettings,
    auth_mode: AuthMode,
    card_settings: CardSettings,
    cors_origins: Vec<String>,
) -> Result<Server, std::io::Error> {
    let authenticator = web::Data::new(Authenticator::from_settings(
        auth_mode,
        jwt_settings,
        db_pool.clone(),
    ));
    let card_renderer = web::Data::new(
        CardRenderer::new(&card_settings).map_err(std::io::Error::other)?,
    );
    // web::Data boils down to an Arc, shared by every worker
    let db_pool_data = web::Data::new(db_pool);

    let server = HttpServer::new(move || {
        let origins = if cors_origins.is_empty() {
            Cors::default().allow_any_origin()
        } else {
            cors_origins
                .iter()
                .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        };
        let cors = origins
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                http::header::AUTHORIZATION,
                http::header::ACCEPT,
                http::header::CONTENT_TYPE,
            ])
            .max_age(3600);

        App::new()
            .wrap(TracingLogger::default())
            .wrap(cors)
            .app_data(db_pool_data.clone())
            .app_data(authenticator.clone())
            .app_data(card_renderer.clone())
            .configure(init_routes)
            .default_service(web::to(route_not_found))
    })
    .listen(listener)?
    .run();

    Ok(server)
}
