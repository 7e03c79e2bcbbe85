use std::io::Cursor;
use std::sync::Arc;

use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::{DynamicImage, ExtendedColorType, ImageEncoder};
use uuid::Uuid;

use crate::card::assets::{AssetCache, CardAssets};
use crate::card::avatar::AvatarFetcher;
use crate::card::layout::{draw_circle_image, draw_text, fit_font_size, wrap_lines, Align};
use crate::card::{CardError, RenderedCard};
use crate::config::card::CardSettings;
use crate::db::repository::MatchRepository;
use crate::league::head_to_head::{HeadToHeadEntry, HeadToHeadFinder};
use crate::models::matches::MatchDetails;
use crate::utils::datetime::format_card_datetime;

pub const CARD_WIDTH: u32 = 1080;
pub const CARD_HEIGHT: u32 = 1920;
pub const AVATAR_SIZE: u32 = 220;

const MISSING_NAME: &str = "—";
const MAX_HEAD_TO_HEAD_LINES: usize = 5;

const AVATAR_MARGIN: i64 = 70;
const AVATAR_ROWS: [i64; 2] = [380, 680];
const NAME_MARGIN: i32 = 100;
const NAME_BASELINES: [i32; 2] = [640, 940];
const NAME_START_SIZE: f32 = 36.0;
const NAME_MIN_SIZE: f32 = 14.0;
const NAME_SIZE_STEP: f32 = 2.0;
const NAME_MAX_WIDTH: u32 = 420;

const TITLE_SIZE: f32 = 44.0;
const TITLE_BASELINE: i32 = 160;
const DATE_SIZE: f32 = 42.0;
const DATE_BASELINE: i32 = 220;
const VENUE_SIZE: f32 = 34.0;
const VENUE_BASELINE: i32 = 270;
const VENUE_MAX_WIDTH: u32 = 800;
const VENUE_LINE_HEIGHT: i32 = 38;
const VENUE_MAX_LINES: usize = 2;
const HEADING_SIZE: f32 = 36.0;
const HEADING_BASELINE: i32 = 980;
const H2H_SIZE: f32 = 30.0;
const H2H_BASELINE: i32 = 1030;
const H2H_LINE_HEIGHT: i32 = 36;

/// Everything drawn on a card, already formatted.
#[derive(Debug, Clone, PartialEq)]
pub struct CardContent {
    pub title: String,
    pub date_line: String,
    pub venue: String,
    pub heading: String,
    pub names: [String; 4],
    pub photo_urls: [Option<String>; 4],
    pub head_to_head: Vec<String>,
}

impl CardContent {
    pub fn from_match(details: &MatchDetails, head_to_head: &[HeadToHeadEntry]) -> Self {
        let record = &details.record;
        let title = if record.tournament_id.is_some() {
            "Tournament Match"
        } else {
            "Friendly Match"
        };
        let venue = record
            .location
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or("Venue TBD");

        Self {
            title: title.to_string(),
            date_line: format_card_datetime(record.played_at),
            venue: venue.to_string(),
            heading: "Recent Head-to-Head".to_string(),
            names: std::array::from_fn(|slot| {
                details
                    .participant_name(slot)
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .unwrap_or(MISSING_NAME)
                    .to_string()
            }),
            photo_urls: std::array::from_fn(|slot| details.photo_url(slot).map(str::to_string)),
            head_to_head: head_to_head
                .iter()
                .take(MAX_HEAD_TO_HEAD_LINES)
                .map(HeadToHeadEntry::display_line)
                .collect(),
        }
    }
}

fn avatar_position(slot: usize) -> (i64, i64) {
    let x = if slot < 2 {
        AVATAR_MARGIN
    } else {
        CARD_WIDTH as i64 - AVATAR_MARGIN - AVATAR_SIZE as i64
    };
    (x, AVATAR_ROWS[slot % 2])
}

fn name_position(slot: usize) -> (i32, i32, Align) {
    if slot < 2 {
        (NAME_MARGIN, NAME_BASELINES[slot % 2], Align::Left)
    } else {
        (CARD_WIDTH as i32 - NAME_MARGIN, NAME_BASELINES[slot % 2], Align::Right)
    }
}

/// Draws the card and encodes it as PNG. Pure: identical inputs give
/// identical bytes. Missing avatars use the default image.
pub fn compose_card(
    assets: &CardAssets,
    content: &CardContent,
    avatars: &[Option<DynamicImage>],
) -> Result<Vec<u8>, CardError> {
    let mut canvas = assets.background.clone();
    let font = &assets.font;
    let center = CARD_WIDTH as i32 / 2;

    for slot in 0..4 {
        let avatar = avatars
            .get(slot)
            .and_then(|a| a.as_ref())
            .unwrap_or(&assets.default_avatar);
        let (x, y) = avatar_position(slot);
        draw_circle_image(&mut canvas, avatar, x, y, AVATAR_SIZE);
    }

    for (slot, name) in content.names.iter().enumerate() {
        let (x, baseline, align) = name_position(slot);
        let size = fit_font_size(
            font,
            name,
            NAME_START_SIZE,
            NAME_SIZE_STEP,
            NAME_MIN_SIZE,
            NAME_MAX_WIDTH,
        );
        draw_text(&mut canvas, font, size, name, x, baseline, align);
    }

    draw_text(
        &mut canvas,
        font,
        TITLE_SIZE,
        &content.title,
        center,
        TITLE_BASELINE,
        Align::Center,
    );
    draw_text(
        &mut canvas,
        font,
        DATE_SIZE,
        &content.date_line,
        center,
        DATE_BASELINE,
        Align::Center,
    );

    let venue_lines = wrap_lines(
        font,
        VENUE_SIZE,
        &content.venue,
        VENUE_MAX_WIDTH,
        VENUE_MAX_LINES,
    );
    for (i, line) in venue_lines.iter().enumerate() {
        let baseline = VENUE_BASELINE + i as i32 * VENUE_LINE_HEIGHT;
        draw_text(&mut canvas, font, VENUE_SIZE, line, center, baseline, Align::Center);
    }

    draw_text(
        &mut canvas,
        font,
        HEADING_SIZE,
        &content.heading,
        center,
        HEADING_BASELINE,
        Align::Center,
    );
    for (i, line) in content.head_to_head.iter().take(MAX_HEAD_TO_HEAD_LINES).enumerate() {
        let baseline = H2H_BASELINE + i as i32 * H2H_LINE_HEIGHT;
        draw_text(&mut canvas, font, H2H_SIZE, line, center, baseline, Align::Center);
    }

    let mut bytes = Vec::new();
    PngEncoder::new_with_quality(
        Cursor::new(&mut bytes),
        CompressionType::Best,
        PngFilter::Adaptive,
    )
    .write_image(canvas.as_raw(), CARD_WIDTH, CARD_HEIGHT, ExtendedColorType::Rgba8)
    .map_err(|e| CardError::Render(format!("PNG encoding failed: {}", e)))?;
    Ok(bytes)
}

/// Builds match cards. Shared across workers through `web::Data`.
pub struct CardRenderer {
    assets: AssetCache,
    avatars: AvatarFetcher,
    head_to_head_limit: i64,
}

impl CardRenderer {
    pub fn new(settings: &CardSettings) -> Result<Self, CardError> {
        Ok(Self {
            assets: AssetCache::new(settings.resolved_assets_dir()),
            avatars: AvatarFetcher::from_settings(settings)?,
            head_to_head_limit: settings.head_to_head_limit,
        })
    }

    pub fn assets(&self) -> &AssetCache {
        &self.assets
    }

    /// Unknown matches fail with `NotFound` before any asset is loaded.
    #[tracing::instrument(name = "Render match card", skip(self, repository))]
    pub async fn render<R>(&self, repository: &R, match_id: Uuid) -> Result<RenderedCard, CardError>
    where
        R: MatchRepository + ?Sized,
    {
        let details = repository
            .find_match_by_id(match_id)
            .await?
            .ok_or(CardError::NotFound(match_id))?;

        let head_to_head = HeadToHeadFinder::new(repository)
            .find_for(&details, self.head_to_head_limit)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!("Head-to-head lookup failed for {}: {:?}", match_id, e);
                Vec::new()
            });

        let content = CardContent::from_match(&details, &head_to_head);
        let assets: Arc<CardAssets> = self.assets.get().await?;

        let urls: [Option<&str>; 4] =
            std::array::from_fn(|slot| content.photo_urls[slot].as_deref());
        let avatars = self.avatars.fetch_all(urls).await;

        let bytes = tokio::task::spawn_blocking(move || compose_card(&assets, &content, &avatars))
            .await
            .map_err(|e| CardError::Render(format!("Render task failed: {}", e)))??;

        tracing::info!("Rendered card for match {} ({} bytes)", match_id, bytes.len());
        Ok(RenderedCard::png(bytes))
    }
}
