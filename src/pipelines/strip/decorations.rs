// SPDX-License-Identifier: GPL-3.0-only

//! Film sprocket holes along the side margins

use super::layout::StripLayout;
use crate::constants::layout;
use crate::errors::CompositeError;
use crate::pipelines::raster;
use image::RgbaImage;
use kurbo::RoundedRect;

/// Sprocket holes for both margins, top to bottom
///
/// Holes are centered in each margin and repeat at a fixed pitch while they
/// still fit above the bottom edge.
pub fn sprocket_holes(strip: &StripLayout) -> Vec<RoundedRect> {
    let (canvas_width, canvas_height) = strip.canvas_size();
    if strip.side_padding < layout::SPROCKET_WIDTH {
        return Vec::new();
    }

    let inset = (strip.side_padding - layout::SPROCKET_WIDTH) / 2;
    let columns = [inset, canvas_width - strip.side_padding + inset];
    let pitch = layout::SPROCKET_HEIGHT + layout::SPROCKET_GAP;

    let mut holes = Vec::new();
    let mut y = layout::SPROCKET_TOP;
    while y + layout::SPROCKET_HEIGHT <= canvas_height {
        for &x in &columns {
            holes.push(RoundedRect::new(
                f64::from(x),
                f64::from(y),
                f64::from(x + layout::SPROCKET_WIDTH),
                f64::from(y + layout::SPROCKET_HEIGHT),
                f64::from(layout::SPROCKET_RADIUS),
            ));
        }
        y += pitch;
    }
    holes
}

pub fn draw_sprockets(canvas: &mut RgbaImage, strip: &StripLayout) -> Result<(), CompositeError> {
    let holes = sprocket_holes(strip);
    raster::paint(canvas, |layer| {
        for hole in &holes {
            layer.fill_shape(hole, layout::SPROCKET_COLOR);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_holes_stay_in_margins() {
        let strip = StripLayout::default();
        let (width, height) = strip.canvas_size();
        let holes = sprocket_holes(&strip);
        assert!(!holes.is_empty());
        assert_eq!(holes.len() % 2, 0);
        for hole in &holes {
            let rect = hole.rect();
            let in_left = rect.x1 <= f64::from(strip.side_padding);
            let in_right = rect.x0 >= f64::from(width - strip.side_padding);
            assert!(in_left || in_right);
            assert!(rect.y1 <= f64::from(height));
        }
        // Last row reaches near the bottom edge
        let last = holes.last().unwrap().rect();
        let pitch = f64::from(layout::SPROCKET_HEIGHT + layout::SPROCKET_GAP);
        assert!(f64::from(height) - last.y1 < pitch);
    }

    #[test]
    fn test_holes_are_centered() {
        let strip = StripLayout::default();
        let left = sprocket_holes(&strip)[0].rect();
        assert_eq!(left.x0, 22.0);
        assert_eq!(f64::from(strip.side_padding) - left.x1, left.x0);
    }

    #[test]
    fn test_rounded_corners_are_cut() {
        let strip = StripLayout::default();
        let (width, height) = strip.canvas_size();
        let mut canvas = RgbaImage::from_pixel(width, height, Rgba(layout::BACKGROUND));
        draw_sprockets(&mut canvas, &strip).unwrap();

        let hole = sprocket_holes(&strip)[0].rect();
        let (x0, y0) = (hole.x0 as u32, hole.y0 as u32);
        let (x1, y1) = (hole.x1 as u32 - 1, hole.y1 as u32 - 1);
        // Corner pixels fall outside the radius
        assert_eq!(canvas.get_pixel(x0, y0).0, layout::BACKGROUND);
        assert_eq!(canvas.get_pixel(x1, y1).0, layout::BACKGROUND);
        // Edge midpoints and the center are solid
        let (cx, cy) = ((x0 + x1) / 2, (y0 + y1) / 2);
        assert_eq!(canvas.get_pixel(cx, cy).0, layout::SPROCKET_COLOR);
        assert_eq!(canvas.get_pixel(x0, cy).0, layout::SPROCKET_COLOR);
        assert_eq!(canvas.get_pixel(cx, y0).0, layout::SPROCKET_COLOR);
    }
}
