// SPDX-License-Identifier: GPL-3.0-only

//! Concrete video sources
//!
//! - [`LiveFeedSource`]: latest frame pushed by a producer thread (device
//!   pipelines, network feeds)
//! - [`ImageFileSource`]: a still image file standing in for a camera
//! - [`PatternSource`]: synthetic solid-color frames for demos and tests

use super::types::{CameraDevice, VideoFrame};
use super::{CameraProvider, VideoSource};
use crate::config::Resolution;
use crate::constants::file_formats;
use crate::errors::DeviceError;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::watch;
use tracing::{debug, info, warn};

// ===== Live feed =====

/// Producer half of a live feed
#[derive(Debug)]
pub struct FeedSender {
    sender: watch::Sender<Option<Arc<VideoFrame>>>,
}

impl FeedSender {
    /// Publish a new frame; returns false once the source has been dropped
    pub fn push(&self, frame: VideoFrame) -> bool {
        self.sender.send(Some(Arc::new(frame))).is_ok()
    }
}

/// Source backed by the most recent frame pushed through a [`FeedSender`]
///
/// Dropping the sender marks the source unavailable.
#[derive(Debug, Clone)]
pub struct LiveFeedSource {
    receiver: watch::Receiver<Option<Arc<VideoFrame>>>,
}

impl LiveFeedSource {
    /// Create a connected sender/source pair with no frame yet
    pub fn channel() -> (FeedSender, LiveFeedSource) {
        let (sender, receiver) = watch::channel(None);
        (FeedSender { sender }, LiveFeedSource { receiver })
    }
}

impl VideoSource for LiveFeedSource {
    fn is_available(&self) -> bool {
        // has_changed only errors once the sender is gone
        self.receiver.has_changed().is_ok()
    }

    fn intrinsic_size(&self) -> (u32, u32) {
        self.receiver
            .borrow()
            .as_ref()
            .map(|f| (f.width, f.height))
            .unwrap_or((0, 0))
    }

    fn current_frame(&self) -> Option<Arc<VideoFrame>> {
        self.receiver.borrow().clone()
    }
}

// ===== Image file =====

/// A still image file presented as a video source
#[derive(Debug, Clone)]
pub struct ImageFileSource {
    frame: Arc<VideoFrame>,
}

impl ImageFileSource {
    /// Load and decode `path` to RGBA
    pub fn load(path: &Path) -> Result<Self, DeviceError> {
        info!(path = %path.display(), "Loading image file");

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        if !file_formats::is_image_extension(&extension) {
            return Err(DeviceError::Unavailable(format!(
                "Unsupported file format: {}",
                extension
            )));
        }

        let img = image::open(path).map_err(|e| {
            DeviceError::Unavailable(format!("Failed to load image '{}': {}", path.display(), e))
        })?;

        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        info!(width, height, "Image loaded successfully");

        Ok(Self {
            frame: Arc::new(VideoFrame::from_rgba(width, height, rgba.into_raw())),
        })
    }
}

impl VideoSource for ImageFileSource {
    fn is_available(&self) -> bool {
        true
    }

    fn intrinsic_size(&self) -> (u32, u32) {
        (self.frame.width, self.frame.height)
    }

    fn current_frame(&self) -> Option<Arc<VideoFrame>> {
        Some(Arc::clone(&self.frame))
    }
}

/// Provider that opens an image file as the camera
#[derive(Debug, Clone)]
pub struct ImageFileCamera {
    path: PathBuf,
}

impl ImageFileCamera {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CameraProvider for ImageFileCamera {
    fn device(&self) -> CameraDevice {
        CameraDevice {
            name: self
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "image".to_string()),
            path: self.path.display().to_string(),
        }
    }

    fn open(&self, ideal: Resolution) -> Result<Box<dyn VideoSource>, DeviceError> {
        if !self.path.exists() {
            return Err(DeviceError::Unavailable(format!(
                "{} does not exist",
                self.path.display()
            )));
        }
        let source = ImageFileSource::load(&self.path)?;
        let (width, height) = source.intrinsic_size();
        if (width, height) != (ideal.width, ideal.height) {
            debug!(
                width,
                height,
                ideal_width = ideal.width,
                ideal_height = ideal.height,
                "Image size differs from requested resolution"
            );
        }
        Ok(Box::new(source))
    }
}

// ===== Synthetic pattern =====

/// Solid-color frames cycling through a palette
///
/// Each call to [`VideoSource::current_frame`] returns the next color, so a
/// three-shot session over red/green/blue yields one color per photo.
#[derive(Debug)]
pub struct PatternSource {
    frames: Vec<Arc<VideoFrame>>,
    next: AtomicUsize,
}

impl PatternSource {
    pub fn new(width: u32, height: u32, colors: &[[u8; 4]]) -> Self {
        let frames = colors
            .iter()
            .map(|&rgba| Arc::new(VideoFrame::solid(width, height, rgba)))
            .collect();
        Self {
            frames,
            next: AtomicUsize::new(0),
        }
    }

    /// Red, green, blue
    pub fn rgb(width: u32, height: u32) -> Self {
        Self::new(
            width,
            height,
            &[[255, 0, 0, 255], [0, 255, 0, 255], [0, 0, 255, 255]],
        )
    }
}

impl VideoSource for PatternSource {
    fn is_available(&self) -> bool {
        !self.frames.is_empty()
    }

    fn intrinsic_size(&self) -> (u32, u32) {
        self.frames
            .first()
            .map(|f| (f.width, f.height))
            .unwrap_or((0, 0))
    }

    fn current_frame(&self) -> Option<Arc<VideoFrame>> {
        if self.frames.is_empty() {
            return None;
        }
        let index = self.next.fetch_add(1, Ordering::Relaxed) % self.frames.len();
        Some(Arc::clone(&self.frames[index]))
    }
}

/// Provider for [`PatternSource`]; opens at exactly the requested resolution
#[derive(Debug, Clone, Default)]
pub struct PatternCamera {
    /// Simulate a refused permission prompt
    pub deny_permission: bool,
}

impl CameraProvider for PatternCamera {
    fn device(&self) -> CameraDevice {
        CameraDevice {
            name: "Test Pattern".to_string(),
            path: "pattern:rgb".to_string(),
        }
    }

    fn open(&self, ideal: Resolution) -> Result<Box<dyn VideoSource>, DeviceError> {
        if self.deny_permission {
            warn!("Test pattern camera refusing access");
            return Err(DeviceError::PermissionDenied(
                "access to the test pattern was denied".to_string(),
            ));
        }
        if ideal.width == 0 || ideal.height == 0 {
            return Err(DeviceError::Unavailable(format!(
                "cannot open at {}x{}",
                ideal.width, ideal.height
            )));
        }
        Ok(Box::new(PatternSource::rgb(ideal.width, ideal.height)))
    }
}
