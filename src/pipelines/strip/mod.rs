// SPDX-License-Identifier: GPL-3.0-only

//! Photo strip compositor
//!
//! Turns the three stills of a session into one styled strip:
//!
//! ```text
//! ┌──┬────────────┬──┐
//! │▢ │   photo 0  │ ▢│  ← sprockets in the side margins
//! │▢ ├────────────┤ ▢│
//! │▢ │   photo 1  │ ▢│  ← center-crop, resample, filter, overlay
//! │▢ ├────────────┤ ▢│
//! │▢ │   photo 2  │ ▢│
//! │  │   TITLE    │  │  ← footer, drawn after all cells
//! │  │ 2024.06.01 │  │
//! └──┴────────────┴──┘
//! ```
//!
//! Rendering is a pure function of the frames, filter, overlay and date.

pub mod decorations;
pub mod layout;
pub mod text;

pub use layout::{CropRect, StripLayout, center_crop};
pub use text::{TextLine, Typesetter};

use super::StillImage;
use super::raster;
use crate::constants::{SHOTS_PER_SESSION, export, layout as consts};
use crate::effects::{FilterChain, OverlayKind};
use crate::errors::CompositeError;
use chrono::{Local, NaiveDate};
use image::imageops::{self, FilterType};
use image::Rgba;
use std::borrow::Borrow;
use std::sync::Arc;
use tracing::{debug, info};

/// Supplies the footer date
pub trait DateSource: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Local calendar date
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemDate;

impl DateSource for SystemDate {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always the same date
#[derive(Debug, Clone, Copy)]
pub struct FixedDate(pub NaiveDate);

impl DateSource for FixedDate {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Renders strips at a fixed layout
#[derive(Debug, Clone)]
pub struct StripCompositor {
    layout: StripLayout,
    title: String,
}

impl StripCompositor {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            layout: StripLayout::default(),
            title: title.into(),
        }
    }

    /// Compose three frames into a strip
    ///
    /// Accepts owned or shared stills. Frames are read, never modified.
    pub fn render<F: Borrow<StillImage>>(
        &self,
        frames: &[F],
        filter: &FilterChain,
        overlay: OverlayKind,
        date: NaiveDate,
    ) -> Result<StillImage, CompositeError> {
        if frames.len() != SHOTS_PER_SESSION {
            return Err(CompositeError::FrameCount {
                expected: SHOTS_PER_SESSION,
                actual: frames.len(),
            });
        }

        let (width, height) = self.layout.canvas_size();
        info!(width, height, overlay = ?overlay, "Rendering strip");

        let mut canvas = StillImage::from_pixel(width, height, Rgba(consts::BACKGROUND));
        decorations::draw_sprockets(&mut canvas, &self.layout)?;

        for (index, frame) in frames.iter().enumerate() {
            let cell = self.prepare_cell(frame.borrow(), filter, overlay)?;
            let (x, y) = self.layout.cell_origin(index);
            imageops::replace(&mut canvas, &cell, x as i64, y as i64);
        }

        self.draw_footer(&mut canvas, date)?;
        Ok(canvas)
    }

    /// Render on a blocking worker
    pub async fn render_async(
        &self,
        frames: Vec<Arc<StillImage>>,
        filter: FilterChain,
        overlay: OverlayKind,
        date: NaiveDate,
    ) -> Result<StillImage, CompositeError> {
        let compositor = self.clone();
        tokio::task::spawn_blocking(move || compositor.render(&frames, &filter, overlay, date))
            .await
            .map_err(|e| CompositeError::TaskFailed(e.to_string()))?
    }

    /// Crop, resample, filter and decorate one photo at cell size
    pub fn prepare_cell(
        &self,
        frame: &StillImage,
        filter: &FilterChain,
        overlay: OverlayKind,
    ) -> Result<StillImage, CompositeError> {
        let target = (self.layout.photo_width, self.layout.photo_height);
        let rect = center_crop(frame.dimensions(), target);
        debug!(
            source_width = frame.width(),
            source_height = frame.height(),
            crop_x = rect.x,
            crop_y = rect.y,
            crop_width = rect.width,
            crop_height = rect.height,
            "Cropping cell"
        );

        let cropped = imageops::crop_imm(frame, rect.x, rect.y, rect.width, rect.height).to_image();
        let mut cell = if cropped.dimensions() == target {
            cropped
        } else {
            imageops::resize(&cropped, target.0, target.1, FilterType::Triangle)
        };

        filter.apply(&mut cell);
        overlay.apply(&mut cell)?;
        Ok(cell)
    }

    /// Title and date lines centered in the bottom padding
    fn draw_footer(&self, canvas: &mut StillImage, date: NaiveDate) -> Result<(), CompositeError> {
        let mut typesetter = Typesetter::new()?;
        let title = typesetter.line(&self.title, consts::TITLE_SIZE, consts::TITLE_COLOR);
        let date_text = date.format(export::DATE_FORMAT).to_string();
        let date_line = typesetter.line(&date_text, consts::DATE_SIZE, consts::DATE_COLOR);

        let block = title.height() + consts::FOOTER_LINE_GAP + date_line.height();
        let free = (self.layout.bottom_padding as f32 - block).max(0.0);
        let title_y = self.layout.footer_top() as f32 + free / 2.0;
        let date_y = title_y + title.height() + consts::FOOTER_LINE_GAP;
        let canvas_width = canvas.width() as f32;

        raster::paint(canvas, |layer| {
            for (line, y) in [(&title, title_y), (&date_line, date_y)] {
                let x = ((canvas_width - line.width()) / 2.0).round();
                typesetter.draw(layer, line, f64::from(x), f64::from(y.round()));
            }
        })
    }
}

impl Default for StripCompositor {
    fn default() -> Self {
        Self::new(export::DEFAULT_TITLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, rgba: [u8; 4]) -> StillImage {
        StillImage::from_pixel(width, height, Rgba(rgba))
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn test_wrong_frame_count() {
        let compositor = StripCompositor::default();
        let frames = vec![solid(8, 6, [0, 0, 0, 255]); 2];
        let err = compositor
            .render(&frames, &FilterChain::empty(), OverlayKind::None, date())
            .unwrap_err();
        assert_eq!(
            err,
            CompositeError::FrameCount {
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn test_cell_is_cell_sized() {
        let compositor = StripCompositor::default();
        let cell = compositor.prepare_cell(
            &solid(1920, 1080, [10, 20, 30, 255]),
            &FilterChain::empty(),
            OverlayKind::None,
        )
        .unwrap();
        assert_eq!(cell.dimensions(), (600, 450));
    }

    #[test]
    fn test_crop_keeps_center_content() {
        // Left and right quarters red, center blue; a 16:9 source loses the edges
        let frame = StillImage::from_fn(1600, 900, |x, _| {
            if (400..1200).contains(&x) {
                Rgba([0, 0, 255, 255])
            } else {
                Rgba([255, 0, 0, 255])
            }
        });
        let cell = StripCompositor::default().prepare_cell(
            &frame,
            &FilterChain::empty(),
            OverlayKind::None,
        )
        .unwrap();
        assert_eq!(cell.get_pixel(300, 225).0, [0, 0, 255, 255]);
        // 1200-wide crop starts at x=200, so the red band maps to the outer sixth
        assert_eq!(cell.get_pixel(10, 225).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_sprocket_pixels_present() {
        let frames = vec![solid(8, 6, [0, 0, 0, 255]); 3];
        let strip = StripCompositor::default()
            .render(&frames, &FilterChain::empty(), OverlayKind::None, date())
            .unwrap();
        // Center of the first left hole
        assert_eq!(strip.get_pixel(40, 32).0, consts::SPROCKET_COLOR);
        // Margin between holes is background
        assert_eq!(strip.get_pixel(40, 10).0, consts::BACKGROUND);
    }
}
