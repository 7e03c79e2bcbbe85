pub mod athlete_handler;
pub mod auth_handler;
pub mod backend_health_handler;
pub mod card_handler;
pub mod match_handler;
pub mod user_handler;
