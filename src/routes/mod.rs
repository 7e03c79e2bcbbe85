use actix_web::{web, HttpResponse};
use serde_json::json;

pub mod athletes;
pub mod auth;
pub mod backend_health;
pub mod cards;
pub mod matches;
pub mod users;

use crate::middleware::{AdminMiddleware, AuthMiddleware};

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // Public routes, registered ahead of the protected scopes sharing their prefix
    cfg.service(backend_health::backend_health)
        .service(auth::register)
        .service(auth::login)
        .service(cards::match_card);

    cfg.service(
        web::scope("/auth")
            .wrap(AuthMiddleware)
            .service(auth::me)
    );

    cfg.service(
        web::resource("/users")
            .wrap(AdminMiddleware)
            .route(web::get().to(users::list_users))
    );
    cfg.service(
        web::scope("/users")
            .wrap(AuthMiddleware)
            .service(users::get_me)
            .service(users::update_profile)
    );

    cfg.service(
        web::scope("/athletes")
            .wrap(AuthMiddleware)
            .service(athletes::search_athletes)
            .service(athletes::get_my_athlete)
            .service(athletes::create_athlete)
            .service(athletes::list_athletes)
            .service(athletes::update_athlete_photo)
            .service(athletes::update_athlete)
    );

    cfg.service(
        web::scope("/match")
            .wrap(AuthMiddleware)
            .service(matches::create_match)
            .service(matches::list_matches)
            .service(matches::update_score)
    );
}

pub async fn route_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({ "error": "Route not found" }))
}
