use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};

pub const TEXT_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

pub fn text_width(font: &FontArc, size: f32, text: &str) -> u32 {
    text_size(PxScale::from(size), font, text).0
}

/// Shrinks from `start` in `step` decrements until `text` fits `max_width`,
/// never going below `floor`.
pub fn fit_font_size(
    font: &FontArc,
    text: &str,
    start: f32,
    step: f32,
    floor: f32,
    max_width: u32,
) -> f32 {
    let mut size = start;
    while size > floor && text_width(font, size, text) > max_width {
        size = (size - step).max(floor);
    }
    size
}

/// Greedy word wrap. Words are never split; lines beyond `max_lines` are
/// dropped. A single word wider than `max_width` gets a line of its own.
pub fn wrap_lines(
    font: &FontArc,
    size: f32,
    text: &str,
    max_width: u32,
    max_lines: usize,
) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };

        if current.is_empty() || text_width(font, size, &candidate) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
            if lines.len() == max_lines {
                return lines;
            }
        }
    }

    if !current.is_empty() && lines.len() < max_lines {
        lines.push(current);
    }
    lines
}

/// Draws `text` with its baseline at `baseline`, anchored at `x` per `align`.
pub fn draw_text(
    canvas: &mut RgbaImage,
    font: &FontArc,
    size: f32,
    text: &str,
    x: i32,
    baseline: i32,
    align: Align,
) {
    let scale = PxScale::from(size);
    let width = text_width(font, size, text) as i32;
    let left = match align {
        Align::Left => x,
        Align::Center => x - width / 2,
        Align::Right => x - width,
    };
    let ascent = font.as_scaled(scale).ascent().round() as i32;
    draw_text_mut(canvas, TEXT_COLOR, left, baseline - ascent, scale, font, text);
}

/// Scales `source` to cover a `size` square and pastes it clipped to a circle.
pub fn draw_circle_image(canvas: &mut RgbaImage, source: &DynamicImage, x: i64, y: i64, size: u32) {
    let mut avatar = source.resize_to_fill(size, size, FilterType::Lanczos3).to_rgba8();

    let radius = size as f32 / 2.0;
    for (px, py, pixel) in avatar.enumerate_pixels_mut() {
        let dx = px as f32 + 0.5 - radius;
        let dy = py as f32 + 0.5 - radius;
        if dx * dx + dy * dy > radius * radius {
            pixel.0[3] = 0;
        }
    }

    imageops::overlay(canvas, &avatar, x, y);
}
