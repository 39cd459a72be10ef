// SPDX-License-Identifier: GPL-3.0-only

//! Photo overlays
//!
//! Overlays decorate one photo cell after its filter has run, so decorations
//! are never filtered. Every rule is deterministic: textures come from an
//! integer hash of the pixel position, never from a random source.

use crate::errors::CompositeError;
use crate::pipelines::raster;
use image::RgbaImage;
use kurbo::{BezPath, Point};

/// Vignette: fully transparent inside this normalized radius
pub const VIGNETTE_INNER: f32 = 0.45;
/// Vignette: darkening at the cell corners
pub const VIGNETTE_MAX_ALPHA: f32 = 0.6;

/// Heart fill color (straight alpha)
pub const HEART_COLOR: [u8; 4] = [0xff, 0x5c, 0x8a, 0xe6];
/// Heart half-width in pixels
pub const HEART_RADIUS: f64 = 26.0;
/// Heart centers are inset this far from their corner
pub const HEART_INSET: f64 = 48.0;

/// Fraction of sparkle cells that light up
const SPARKLE_THRESHOLD: f32 = 0.985;
/// Sparkle cell size in pixels
const SPARKLE_CELL: u32 = 4;

/// Peak grain offset in 0..1 units
const GRAIN_STRENGTH: f32 = 0.12;

/// Decoration rule applied within a photo cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlayKind {
    #[default]
    None,
    /// Radial darkening toward the cell edges
    Vignette,
    /// Two heart glyphs in opposite corners
    Hearts,
    /// Screen-blended sparkle field
    Sparkle,
    /// Monochrome film grain
    Grain,
}

impl OverlayKind {
    /// CSS layer for the live preview, if the overlay can be expressed as one
    pub fn preview_css(&self) -> Option<String> {
        match self {
            OverlayKind::Vignette => Some(format!(
                "radial-gradient(circle at center, transparent {}%, rgba(0, 0, 0, {}) 100%)",
                (VIGNETTE_INNER * 100.0).round(),
                VIGNETTE_MAX_ALPHA
            )),
            _ => None,
        }
    }

    /// Decorate `cell` in place
    pub fn apply(&self, cell: &mut RgbaImage) -> Result<(), CompositeError> {
        match self {
            OverlayKind::None => {}
            OverlayKind::Vignette => apply_vignette(cell),
            OverlayKind::Hearts => apply_hearts(cell)?,
            OverlayKind::Sparkle => apply_sparkle(cell),
            OverlayKind::Grain => apply_grain(cell),
        }
        Ok(())
    }
}

/// Smoothstep function for gradient falloff
#[inline]
fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Position hash in 0..1, stable across platforms
#[inline]
fn hash(x: u32, y: u32, seed: u32) -> f32 {
    let mut h = x
        .wrapping_mul(0x8da6_b343)
        .wrapping_add(y.wrapping_mul(0xd816_3841))
        .wrapping_add(seed.wrapping_mul(0xcb1a_b31f));
    h ^= h >> 13;
    h = h.wrapping_mul(0x5bd1_e995);
    h ^= h >> 15;
    (h >> 8) as f32 / (1u32 << 24) as f32
}

/// Darkening factor for a vignette at `(x, y)`; 0.0 at the center
pub fn vignette_alpha(x: u32, y: u32, width: u32, height: u32) -> f32 {
    let half_w = width as f32 / 2.0;
    let half_h = height as f32 / 2.0;
    let dx = (x as f32 + 0.5 - half_w) / half_w;
    let dy = (y as f32 + 0.5 - half_h) / half_h;
    // 0 at center, 1 at the corners
    let dist = (dx * dx + dy * dy).sqrt() / std::f32::consts::SQRT_2;
    VIGNETTE_MAX_ALPHA * smoothstep(VIGNETTE_INNER, 1.0, dist)
}

fn apply_vignette(cell: &mut RgbaImage) {
    let (width, height) = cell.dimensions();
    for (x, y, pixel) in cell.enumerate_pixels_mut() {
        let alpha = vignette_alpha(x, y, width, height);
        if alpha <= 0.0 {
            continue;
        }
        let keep = 1.0 - alpha;
        for c in 0..3 {
            pixel[c] = (pixel[c] as f32 * keep).round() as u8;
        }
    }
}

/// Heart outline centered on `center`, point facing down
///
/// Spans `radius` either side horizontally and about the same vertically.
pub fn heart_path(center: Point, radius: f64) -> BezPath {
    let at = |u: f64, v: f64| Point::new(center.x + u * radius, center.y + v * radius);

    let mut path = BezPath::new();
    path.move_to(at(0.0, 1.0));
    path.curve_to(at(-0.25, 0.75), at(-1.0, 0.35), at(-1.0, -0.2));
    path.curve_to(at(-1.0, -0.75), at(-0.3, -1.0), at(0.0, -0.45));
    path.curve_to(at(0.3, -1.0), at(1.0, -0.75), at(1.0, -0.2));
    path.curve_to(at(1.0, 0.35), at(0.25, 0.75), at(0.0, 1.0));
    path.close_path();
    path
}

fn apply_hearts(cell: &mut RgbaImage) -> Result<(), CompositeError> {
    let (width, height) = cell.dimensions();
    let hearts = [
        heart_path(Point::new(HEART_INSET, HEART_INSET), HEART_RADIUS),
        heart_path(
            Point::new(f64::from(width) - HEART_INSET, f64::from(height) - HEART_INSET),
            HEART_RADIUS,
        ),
    ];
    raster::paint(cell, |layer| {
        for heart in &hearts {
            layer.fill_shape(heart, HEART_COLOR);
        }
    })
}

fn apply_sparkle(cell: &mut RgbaImage) {
    for (x, y, pixel) in cell.enumerate_pixels_mut() {
        let n = hash(x / SPARKLE_CELL, y / SPARKLE_CELL, 1);
        if n < SPARKLE_THRESHOLD {
            continue;
        }
        let strength = (n - SPARKLE_THRESHOLD) / (1.0 - SPARKLE_THRESHOLD);
        for c in 0..3 {
            // Screen blend with white at `strength`
            let base = pixel[c] as f32 / 255.0;
            let screened = 1.0 - (1.0 - base) * (1.0 - strength);
            pixel[c] = (screened * 255.0).round() as u8;
        }
    }
}

fn apply_grain(cell: &mut RgbaImage) {
    for (x, y, pixel) in cell.enumerate_pixels_mut() {
        let offset = (hash(x, y, 2) - 0.5) * 2.0 * GRAIN_STRENGTH * 255.0;
        for c in 0..3 {
            pixel[c] = (pixel[c] as f32 + offset).round().clamp(0.0, 255.0) as u8;
        }
    }
}
