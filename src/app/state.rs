// SPDX-License-Identifier: GPL-3.0-only

//! Application state types

use crate::backends::camera::{CameraDevice, VideoSource};
use crate::config::BoothConfig;
use crate::effects::Selection;
use crate::errors::{CaptureError, DeviceError, SequenceError};
use crate::pipelines::{DateSource, StillImage, StripCompositor, StripExporter};
use crate::session::{Phase, SessionEvent, SessionHandle};
use futures::channel::mpsc::UnboundedReceiver;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Camera acquisition outcome
pub enum DeviceState {
    /// Camera open and a session driver running against it
    Ready(ActiveDevice),
    /// Blocking error screen; the only way out is a reload
    Failed(DeviceError),
}

impl DeviceState {
    pub fn is_ready(&self) -> bool {
        matches!(self, DeviceState::Ready(_))
    }

    pub fn error(&self) -> Option<&DeviceError> {
        match self {
            DeviceState::Failed(e) => Some(e),
            DeviceState::Ready(_) => None,
        }
    }
}

/// An opened camera and the driver polling it
pub struct ActiveDevice {
    pub device: CameraDevice,
    pub source: Arc<dyn VideoSource>,
    pub handle: SessionHandle,
    pub events: UnboundedReceiver<SessionEvent>,
    pub driver: JoinHandle<crate::session::SequenceController>,
}

/// What the booth screen shows, mirrored from driver events
#[derive(Debug, Clone, Default)]
pub struct SessionView {
    pub phase: Phase,
    /// Zero-based shot being counted down or just taken
    pub shot: usize,
    pub countdown: Option<u32>,
    /// Prompt text while it should be on screen
    pub prompt: Option<&'static str>,
    pub flash_active: bool,
    /// Shots taken so far this session
    pub captured: usize,
    /// The three stills, present only in review
    pub frames: Vec<Arc<StillImage>>,
    pub capture_error: Option<CaptureError>,
    pub rejected: Option<SequenceError>,
}

/// Main application state
pub struct AppModel {
    pub config: BoothConfig,
    pub device_state: DeviceState,
    pub session: SessionView,
    pub selection: Selection,
    /// Last rendered strip; cleared when the session or selection changes
    pub strip: Option<Arc<StillImage>>,
    pub last_export: Option<PathBuf>,
    pub(crate) provider: Arc<dyn crate::backends::camera::CameraProvider>,
    pub(crate) compositor: StripCompositor,
    pub(crate) exporter: StripExporter,
    pub(crate) dates: Arc<dyn DateSource>,
    /// Resets sent to the driver and not yet acknowledged; events ahead of
    /// the acknowledgement belong to a superseded session
    pub(crate) pending_resets: usize,
}
