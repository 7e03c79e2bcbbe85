use actix_web::{get, web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use crate::card::CardRenderer;
use crate::db::match_queries::MatchQueries;
use crate::error::AppResult;
use crate::handlers::card_handler;

#[get("/match/{match_id}/card")]
async fn match_card(
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
    renderer: web::Data<CardRenderer>,
) -> AppResult<HttpResponse> {
    let repository = MatchQueries::new(pool.get_ref().clone());
    card_handler::generate_match_card(path.into_inner(), &repository, &renderer).await
}
