// SPDX-License-Identifier: MPL-2.0

//! Still capture from a live video source
//!
//! Grabs the source's current frame once, mirrors it left-right (the preview
//! is a selfie view, so the photo matches what people saw) and keeps it as
//! an uncompressed RGBA buffer. Compression only ever happens at export.

use super::StillImage;
use crate::backends::camera::{PixelFormat, VideoFrame, VideoSource};
use crate::errors::CaptureError;
use tracing::{debug, info, warn};

/// Produces mirrored stills from a [`VideoSource`]
pub struct FrameCapturer;

impl FrameCapturer {
    /// Capture one still from the source
    ///
    /// The output has exactly the source's current intrinsic size. Fails
    /// without retrying if the source is gone or has not produced a frame.
    pub fn capture(source: &dyn VideoSource) -> Result<StillImage, CaptureError> {
        if !source.is_available() {
            warn!("Capture attempted on unavailable source");
            return Err(CaptureError::SourceUnavailable);
        }

        let (width, height) = source.intrinsic_size();
        if width == 0 || height == 0 {
            warn!("Capture attempted before the source produced a frame");
            return Err(CaptureError::NotReady);
        }

        let frame = source.current_frame().ok_or(CaptureError::NotReady)?;
        if (frame.width, frame.height) != (width, height) {
            return Err(CaptureError::InvalidFrame(format!(
                "frame is {}x{} but source reports {}x{}",
                frame.width, frame.height, width, height
            )));
        }

        let still = Self::mirror_frame(&frame)?;
        info!(width, height, format = ?frame.format, "Captured still");
        Ok(still)
    }

    /// Convert a frame to RGBA, flipped horizontally
    pub fn mirror_frame(frame: &VideoFrame) -> Result<StillImage, CaptureError> {
        frame.validate().map_err(CaptureError::InvalidFrame)?;

        let width = frame.width as usize;
        let height = frame.height as usize;
        let stride = frame.stride as usize;
        let mut out = vec![0u8; width * height * 4];

        match frame.format {
            PixelFormat::RGBA => {
                for y in 0..height {
                    let row = &frame.data[y * stride..y * stride + width * 4];
                    let dst_row = &mut out[y * width * 4..(y + 1) * width * 4];
                    for (x, px) in row.chunks_exact(4).enumerate() {
                        let dst = (width - 1 - x) * 4;
                        dst_row[dst..dst + 4].copy_from_slice(px);
                    }
                }
            }
            PixelFormat::NV12 => {
                let y_plane = &frame.data[..stride * height];
                let uv_plane = &frame.data[stride * height..];
                for y in 0..height {
                    for x in 0..width {
                        let y_val = y_plane[y * stride + x] as f32 / 255.0;
                        let uv_idx = (y / 2) * stride + (x / 2) * 2;
                        let u_val = uv_plane[uv_idx] as f32 / 255.0 - 0.5;
                        let v_val = uv_plane[uv_idx + 1] as f32 / 255.0 - 0.5;
                        let (r, g, b) = yuv_to_rgb(y_val, u_val, v_val);

                        let dst = (y * width + (width - 1 - x)) * 4;
                        out[dst] = (r * 255.0).round() as u8;
                        out[dst + 1] = (g * 255.0).round() as u8;
                        out[dst + 2] = (b * 255.0).round() as u8;
                        out[dst + 3] = 255;
                    }
                }
            }
        }

        debug!(width, height, "Frame mirrored");
        StillImage::from_raw(frame.width, frame.height, out)
            .ok_or_else(|| CaptureError::InvalidFrame("RGBA buffer size mismatch".to_string()))
    }
}

/// YUV to RGB conversion (BT.601, full range)
#[inline]
fn yuv_to_rgb(y: f32, u: f32, v: f32) -> (f32, f32, f32) {
    let r = (y + 1.402 * v).clamp(0.0, 1.0);
    let g = (y - 0.344 * u - 0.714 * v).clamp(0.0, 1.0);
    let b = (y + 1.772 * u).clamp(0.0, 1.0);
    (r, g, b)
}
