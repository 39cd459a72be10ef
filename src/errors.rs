// SPDX-License-Identifier: MPL-2.0

//! Error types for the photo booth
//!
//! Every failure has exactly one handling path:
//! - [`DeviceError`]: camera could not be acquired; the app shows a blocking
//!   error screen and only a full reload recovers.
//! - [`CaptureError`]: the source was not ready when a countdown expired; the
//!   session stays incomplete until the caller resets.
//! - [`CompositeError`]: the compositor was handed the wrong number of frames
//!   or its worker died.
//! - [`SequenceError`]: an operation was requested in the wrong session phase.
//! - [`ExportError`]: encoding or writing the strip failed.
//! - [`ConfigError`]: the config file could not be read or parsed.

use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone)]
pub enum AppError {
    /// Camera acquisition errors
    Device(DeviceError),
    /// Frame capture errors
    Capture(CaptureError),
    /// Strip compositing errors
    Composite(CompositeError),
    /// Session state errors
    Sequence(SequenceError),
    /// Export errors
    Export(ExportError),
    /// Configuration errors
    Config(ConfigError),
}

/// Camera acquisition errors (raised once, at startup or reload)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// User or system refused camera access
    PermissionDenied(String),
    /// No usable camera, or the device is busy
    Unavailable(String),
}

/// Errors capturing a still from the live source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// The video source has gone away
    SourceUnavailable,
    /// The source reports zero intrinsic size (no frame decoded yet)
    NotReady,
    /// The frame buffer does not match its declared geometry
    InvalidFrame(String),
}

/// Strip compositing errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompositeError {
    /// The compositor needs exactly three frames
    FrameCount { expected: usize, actual: usize },
    /// The background render task died
    TaskFailed(String),
    /// A raster target exceeds the rasterizer's 16-bit dimensions
    CanvasTooLarge { width: u32, height: u32 },
    /// The bundled footer font could not be loaded
    Font(String),
}

/// Session phase errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceError {
    /// start() is only valid from idle
    NotIdle,
    /// The session has not reached review yet
    NotInReview,
    /// The session driver is no longer accepting commands
    DriverStopped,
}

/// Strip export errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    /// Encoding to the target format failed
    EncodingFailed(String),
    /// Writing to disk failed
    SaveFailed(String),
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The config file exists but could not be read
    Read(String),
    /// The config file is not valid JSON for [`crate::config::BoothConfig`]
    Parse(String),
    /// The config could not be written back
    Write(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Device(e) => write!(f, "Camera error: {}", e),
            AppError::Capture(e) => write!(f, "Capture error: {}", e),
            AppError::Composite(e) => write!(f, "Composite error: {}", e),
            AppError::Sequence(e) => write!(f, "Session error: {}", e),
            AppError::Export(e) => write!(f, "Export error: {}", e),
            AppError::Config(e) => write!(f, "Configuration error: {}", e),
        }
    }
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceError::PermissionDenied(msg) => write!(f, "Camera permission denied: {}", msg),
            DeviceError::Unavailable(msg) => write!(f, "Camera unavailable: {}", msg),
        }
    }
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::SourceUnavailable => write!(f, "Video source unavailable"),
            CaptureError::NotReady => write!(f, "Video source not ready (zero size)"),
            CaptureError::InvalidFrame(msg) => write!(f, "Invalid frame: {}", msg),
        }
    }
}

impl fmt::Display for CompositeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompositeError::FrameCount { expected, actual } => {
                write!(f, "Expected {} frames, got {}", expected, actual)
            }
            CompositeError::TaskFailed(msg) => write!(f, "Render task failed: {}", msg),
            CompositeError::CanvasTooLarge { width, height } => {
                write!(f, "Raster target {}x{} is too large", width, height)
            }
            CompositeError::Font(msg) => write!(f, "Footer font unavailable: {}", msg),
        }
    }
}

impl fmt::Display for SequenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SequenceError::NotIdle => write!(f, "A session is already running"),
            SequenceError::NotInReview => write!(f, "Session is not complete"),
            SequenceError::DriverStopped => write!(f, "Session driver has stopped"),
        }
    }
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::EncodingFailed(msg) => write!(f, "Encoding failed: {}", msg),
            ExportError::SaveFailed(msg) => write!(f, "Save failed: {}", msg),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read(msg) => write!(f, "Cannot read config: {}", msg),
            ConfigError::Parse(msg) => write!(f, "Invalid config: {}", msg),
            ConfigError::Write(msg) => write!(f, "Cannot write config: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for DeviceError {}
impl std::error::Error for CaptureError {}
impl std::error::Error for CompositeError {}
impl std::error::Error for SequenceError {}
impl std::error::Error for ExportError {}
impl std::error::Error for ConfigError {}

// Conversions from sub-errors to AppError
impl From<DeviceError> for AppError {
    fn from(err: DeviceError) -> Self {
        AppError::Device(err)
    }
}

impl From<CaptureError> for AppError {
    fn from(err: CaptureError) -> Self {
        AppError::Capture(err)
    }
}

impl From<CompositeError> for AppError {
    fn from(err: CompositeError) -> Self {
        AppError::Composite(err)
    }
}

impl From<SequenceError> for AppError {
    fn from(err: SequenceError) -> Self {
        AppError::Sequence(err)
    }
}

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        AppError::Export(err)
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Config(err)
    }
}

// Conversions for I/O errors
impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::SaveFailed(err.to_string())
    }
}

impl From<image::ImageError> for ExportError {
    fn from(err: image::ImageError) -> Self {
        ExportError::EncodingFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes() {
        let err: AppError = CaptureError::NotReady.into();
        assert!(err.to_string().starts_with("Capture error:"));

        let err: AppError = CompositeError::FrameCount {
            expected: 3,
            actual: 2,
        }
        .into();
        assert_eq!(err.to_string(), "Composite error: Expected 3 frames, got 2");
    }

    #[test]
    fn test_io_error_maps_to_save_failed() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        assert!(matches!(ExportError::from(io), ExportError::SaveFailed(_)));
    }
}
