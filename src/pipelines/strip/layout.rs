// SPDX-License-Identifier: GPL-3.0-only

//! Strip geometry

use crate::constants::{SHOTS_PER_SESSION, layout};

/// Fixed strip layout
///
/// Canvas size is derived from these values on every call, never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripLayout {
    pub photo_width: u32,
    pub photo_height: u32,
    pub gap: u32,
    pub side_padding: u32,
    pub top_padding: u32,
    pub bottom_padding: u32,
}

impl Default for StripLayout {
    fn default() -> Self {
        Self {
            photo_width: layout::PHOTO_WIDTH,
            photo_height: layout::PHOTO_HEIGHT,
            gap: layout::PHOTO_GAP,
            side_padding: layout::SIDE_PADDING,
            top_padding: layout::TOP_PADDING,
            bottom_padding: layout::BOTTOM_PADDING,
        }
    }
}

impl StripLayout {
    /// Total canvas `(width, height)`
    pub fn canvas_size(&self) -> (u32, u32) {
        let shots = SHOTS_PER_SESSION as u32;
        let width = self.photo_width + 2 * self.side_padding;
        let height = self.top_padding
            + shots * self.photo_height
            + (shots - 1) * self.gap
            + self.bottom_padding;
        (width, height)
    }

    /// Top-left corner of cell `index`
    pub fn cell_origin(&self, index: usize) -> (u32, u32) {
        (
            self.side_padding,
            self.top_padding + index as u32 * (self.photo_height + self.gap),
        )
    }

    /// First row of the footer area
    pub fn footer_top(&self) -> u32 {
        let (_, height) = self.canvas_size();
        height - self.bottom_padding
    }
}

/// Source rectangle for a center crop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Largest centered rectangle of `source` with the aspect of `target`
///
/// A wider source loses equal amounts left and right, a taller one loses
/// equal amounts top and bottom.
pub fn center_crop(source: (u32, u32), target: (u32, u32)) -> CropRect {
    let (sw, sh) = (source.0 as u64, source.1 as u64);
    let (tw, th) = (target.0.max(1) as u64, target.1.max(1) as u64);

    if sw * th > sh * tw {
        let width = ((sh * tw + th / 2) / th).clamp(1, sw);
        CropRect {
            x: ((sw - width) / 2) as u32,
            y: 0,
            width: width as u32,
            height: sh as u32,
        }
    } else {
        let height = ((sw * th + tw / 2) / tw).clamp(1, sh.max(1));
        CropRect {
            x: 0,
            y: ((sh - height.min(sh)) / 2) as u32,
            width: sw as u32,
            height: height as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_canvas_size() {
        assert_eq!(StripLayout::default().canvas_size(), (760, 1570));
    }

    #[test]
    fn test_cell_origins() {
        let layout = StripLayout::default();
        assert_eq!(layout.cell_origin(0), (80, 60));
        assert_eq!(layout.cell_origin(1), (80, 540));
        assert_eq!(layout.cell_origin(2), (80, 1020));
        assert_eq!(layout.footer_top(), 1470);
    }

    #[test]
    fn test_wider_source_crops_sides() {
        // 16:9 into 4:3
        let rect = center_crop((1920, 1080), (600, 450));
        assert_eq!(rect, CropRect { x: 240, y: 0, width: 1440, height: 1080 });
    }

    #[test]
    fn test_taller_source_crops_top_and_bottom() {
        let rect = center_crop((600, 800), (600, 450));
        assert_eq!(rect, CropRect { x: 0, y: 175, width: 600, height: 450 });
    }

    #[test]
    fn test_matching_aspect_is_untouched() {
        let rect = center_crop((800, 600), (600, 450));
        assert_eq!(rect, CropRect { x: 0, y: 0, width: 800, height: 600 });
    }

    #[test]
    fn test_crop_aspect_within_rounding() {
        for &(w, h) in &[(1001, 333), (333, 1001), (641, 479), (7, 5)] {
            let rect = center_crop((w, h), (600, 450));
            let crop_aspect = rect.width as f64 / rect.height as f64;
            let tolerance = 1.0 / rect.height.min(rect.width) as f64 + 1e-9;
            assert!(
                (crop_aspect - 600.0 / 450.0).abs() <= tolerance * 2.0,
                "{}x{} -> {:?}",
                w,
                h,
                rect
            );
            // Centered along the cropped axis
            let left = rect.x;
            let right = w - rect.x - rect.width;
            let top = rect.y;
            let bottom = h - rect.y - rect.height;
            assert!(left.abs_diff(right) <= 1);
            assert!(top.abs_diff(bottom) <= 1);
        }
    }
}
