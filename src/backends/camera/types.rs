// SPDX-License-Identifier: GPL-3.0-only

//! Shared types for camera backends

use std::sync::Arc;
use std::time::Instant;

/// Pixel format for live frames
///
/// Captures are always normalized to RGBA; NV12 is accepted because it is
/// what most MJPEG decoders hand out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// RGBA - 32-bit with alpha (4 bytes per pixel)
    RGBA,
    /// NV12 - Semi-planar 4:2:0 (Y plane + interleaved UV plane)
    NV12,
}

impl PixelFormat {
    /// Minimum row stride for a frame `width` pixels wide
    ///
    /// NV12 rows must also hold the interleaved UV pairs, which round an odd
    /// width up to the next even byte count.
    pub fn min_stride(&self, width: u32) -> u32 {
        match self {
            Self::RGBA => width * 4,
            Self::NV12 => width.div_ceil(2) * 2,
        }
    }

    /// Minimum buffer length for a frame of this format
    pub fn required_len(&self, stride: u32, height: u32) -> usize {
        match self {
            Self::RGBA => stride as usize * height as usize,
            // Y plane followed by a half-height UV plane with the same stride
            Self::NV12 => stride as usize * (height as usize + height.div_ceil(2) as usize),
        }
    }
}

/// One decoded frame from a live source
#[derive(Debug, Clone)]
pub struct VideoFrame {
    pub width: u32,
    pub height: u32,
    /// RGBA pixels, or the Y plane followed by the UV plane for NV12
    pub data: Arc<[u8]>,
    /// Pixel format of the data
    pub format: PixelFormat,
    /// Row stride in bytes (may include padding)
    pub stride: u32,
    /// Timestamp when the frame was produced (for latency diagnostics)
    pub captured_at: Instant,
}

impl VideoFrame {
    /// Wrap tightly packed RGBA pixels
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data: Arc::from(data.into_boxed_slice()),
            format: PixelFormat::RGBA,
            stride: width * 4,
            captured_at: Instant::now(),
        }
    }

    /// A frame filled with one color
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let data = rgba
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Self::from_rgba(width, height, data)
    }

    /// Check that the buffer is large enough for the declared geometry
    pub fn validate(&self) -> Result<(), String> {
        let min_stride = self.format.min_stride(self.width);
        if self.stride < min_stride {
            return Err(format!(
                "stride {} smaller than row size {}",
                self.stride, min_stride
            ));
        }
        let expected = self.format.required_len(self.stride, self.height);
        if self.data.len() < expected {
            return Err(format!(
                "buffer too small: expected {}, got {}",
                expected,
                self.data.len()
            ));
        }
        Ok(())
    }
}

/// A camera as reported by a provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDevice {
    pub name: String,
    /// Provider-specific identifier (file path, pattern name, node id)
    pub path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_frame_size() {
        let frame = VideoFrame::solid(8, 6, [1, 2, 3, 255]);
        assert_eq!(frame.data.len(), 8 * 6 * 4);
        assert_eq!(&frame.data[4..8], &[1, 2, 3, 255]);
        assert!(frame.validate().is_ok());
    }

    #[test]
    fn test_nv12_required_len() {
        // 4x4 NV12: 16 bytes of Y + 8 bytes of UV
        assert_eq!(PixelFormat::NV12.required_len(4, 4), 24);
        // Odd heights round the chroma plane up
        assert_eq!(PixelFormat::NV12.required_len(4, 3), 20);
    }

    #[test]
    fn test_odd_width_nv12_needs_room_for_chroma() {
        let frame = |stride: u32, len: usize| VideoFrame {
            width: 3,
            height: 2,
            data: Arc::from(vec![128u8; len].into_boxed_slice()),
            format: PixelFormat::NV12,
            stride,
            captured_at: Instant::now(),
        };
        // Stride 3 leaves the last UV pair one byte short
        assert!(frame(3, 9).validate().is_err());
        assert!(frame(3, 64).validate().is_err());
        assert_eq!(PixelFormat::NV12.min_stride(3), 4);
        assert!(frame(4, 12).validate().is_ok());
    }

    #[test]
    fn test_short_buffer_rejected() {
        let mut frame = VideoFrame::solid(4, 4, [0, 0, 0, 255]);
        frame.height = 5;
        assert!(frame.validate().is_err());
    }
}
