// SPDX-License-Identifier: MPL-2.0

//! Camera acquisition and live video sources
//!
//! ```text
//! ┌─────────────────────┐
//! │   Booth (AppModel)  │
//! └──────────┬──────────┘
//!            │ open(ideal resolution)
//!            ▼
//! ┌─────────────────────┐
//! │ CameraProvider Trait│  ← may fail once with DeviceError
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │  VideoSource Trait  │  ← current frame, polled at capture time
//! └─────────────────────┘
//! ```

pub mod sources;
pub mod types;

pub use sources::{FeedSender, ImageFileCamera, ImageFileSource, LiveFeedSource, PatternCamera, PatternSource};
pub use types::*;

use crate::config::Resolution;
use crate::errors::DeviceError;
use std::sync::Arc;

/// A live video feed
///
/// Implementations hold whatever frame was decoded most recently. The
/// capturer polls it exactly once per countdown expiry.
pub trait VideoSource: Send + Sync {
    /// False once the underlying device has gone away
    fn is_available(&self) -> bool;

    /// Current intrinsic size; (0, 0) until the first frame arrives
    fn intrinsic_size(&self) -> (u32, u32);

    /// Most recent frame, if any
    fn current_frame(&self) -> Option<Arc<VideoFrame>>;
}

/// Camera device acquisition
pub trait CameraProvider: Send + Sync {
    /// Describe the device this provider opens
    fn device(&self) -> CameraDevice;

    /// Open the camera, asking for `ideal` resolution
    ///
    /// The delivered resolution may differ; capture always uses the source's
    /// actual intrinsic size.
    fn open(&self, ideal: Resolution) -> Result<Box<dyn VideoSource>, DeviceError>;
}

impl<T: VideoSource + ?Sized> VideoSource for Box<T> {
    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn intrinsic_size(&self) -> (u32, u32) {
        (**self).intrinsic_size()
    }

    fn current_frame(&self) -> Option<Arc<VideoFrame>> {
        (**self).current_frame()
    }
}
