//! Match card rendering: a 1080x1920 PNG summarizing a match and its recent
//! head-to-head history.

pub mod assets;
pub mod avatar;
pub mod layout;
pub mod renderer;

use uuid::Uuid;

pub use assets::{AssetCache, CardAssets};
pub use avatar::AvatarFetcher;
pub use renderer::{compose_card, CardContent, CardRenderer, CARD_HEIGHT, CARD_WIDTH};

pub const PNG_CONTENT_TYPE: &str = "image/png";

#[derive(Debug, thiserror::Error)]
pub enum CardError {
    #[error("Match {0} not found")]
    NotFound(Uuid),

    #[error("Card rendering failed: {0}")]
    Render(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone)]
pub struct RenderedCard {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
}

impl RenderedCard {
    pub fn png(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            content_type: PNG_CONTENT_TYPE,
        }
    }
}
