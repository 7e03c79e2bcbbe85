use actix_web::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use actix_web::HttpResponse;
use uuid::Uuid;

use crate::card::{CardError, CardRenderer};
use crate::db::repository::MatchRepository;
use crate::error::AppResult;

pub const CARD_CACHE_CONTROL: &str = "public, max-age=60";

/// The body is only written once the whole PNG has been encoded.
#[tracing::instrument(name = "Generate match card", skip(repository, renderer))]
pub async fn generate_match_card<R>(
    match_id: Uuid,
    repository: &R,
    renderer: &CardRenderer,
) -> AppResult<HttpResponse>
where
    R: MatchRepository + ?Sized,
{
    let card = renderer
        .render(repository, match_id)
        .await
        .map_err(|e| {
            match &e {
                CardError::NotFound(_) => tracing::info!("No card for unknown match {}", match_id),
                other => tracing::error!("Card for match {} failed: {}", match_id, other),
            }
            e
        })?;

    Ok(HttpResponse::Ok()
        .insert_header((CONTENT_TYPE, card.content_type))
        .insert_header((CACHE_CONTROL, CARD_CACHE_CONTROL))
        .body(card.bytes))
}
