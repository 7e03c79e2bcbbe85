use std::path::{Path, PathBuf};
use std::sync::Arc;

use ab_glyph::FontArc;
use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};
use tokio::sync::OnceCell;

use crate::card::renderer::{CARD_HEIGHT, CARD_WIDTH};
use crate::card::CardError;

const BACKGROUND_FILE: &str = "templates/card_base.png";
const DEFAULT_AVATAR_FILE: &str = "avatar.png";
const FONT_FILE: &str = "fonts/DejaVuSans-Bold.ttf";

/// Immutable inputs shared by every render.
pub struct CardAssets {
    /// Already scaled to the card size.
    pub background: RgbaImage,
    pub default_avatar: DynamicImage,
    pub font: FontArc,
}

impl CardAssets {
    pub async fn load(dir: &Path) -> Result<Self, CardError> {
        tracing::info!("Loading card assets from {}", dir.display());

        let background = decode_image(&read_asset(dir, BACKGROUND_FILE).await?, BACKGROUND_FILE)?;
        let background = if background.width() == CARD_WIDTH && background.height() == CARD_HEIGHT {
            background.to_rgba8()
        } else {
            background
                .resize_exact(CARD_WIDTH, CARD_HEIGHT, FilterType::Lanczos3)
                .to_rgba8()
        };

        let avatar_bytes = read_asset(dir, DEFAULT_AVATAR_FILE).await?;
        let default_avatar = decode_image(&avatar_bytes, DEFAULT_AVATAR_FILE)?;

        let font_bytes = read_asset(dir, FONT_FILE).await?;
        let font = FontArc::try_from_vec(font_bytes)
            .map_err(|e| CardError::Render(format!("Invalid font {}: {}", FONT_FILE, e)))?;

        Ok(Self {
            background,
            default_avatar,
            font,
        })
    }
}

async fn read_asset(dir: &Path, name: &str) -> Result<Vec<u8>, CardError> {
    let path = dir.join(name);
    tokio::fs::read(&path)
        .await
        .map_err(|e| CardError::Render(format!("Failed to read {}: {}", path.display(), e)))
}

fn decode_image(bytes: &[u8], name: &str) -> Result<DynamicImage, CardError> {
    image::load_from_memory(bytes)
        .map_err(|e| CardError::Render(format!("Failed to decode {}: {}", name, e)))
}

/// Loads the assets on first use and keeps them for the process lifetime.
/// A failed load is not cached, so the next request retries.
pub struct AssetCache {
    dir: PathBuf,
    cell: OnceCell<Arc<CardAssets>>,
}

impl AssetCache {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            cell: OnceCell::new(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }

    pub async fn get(&self) -> Result<Arc<CardAssets>, CardError> {
        self.cell
            .get_or_try_init(|| async { CardAssets::load(&self.dir).await.map(Arc::new) })
            .await
            .cloned()
    }
}
