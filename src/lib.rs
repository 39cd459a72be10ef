// SPDX-License-Identifier: MPL-2.0

//! Photo booth - timed three-shot capture sessions composed into a photo strip
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`app`]: Booth application model (device state, session view, strip)
//! - [`backends`]: Camera acquisition and live video sources
//! - [`session`]: Capture sequencing state machine and its async driver
//! - [`effects`]: Filter and overlay catalogs
//! - [`pipelines`]: Still capture, strip compositing and export
//! - [`config`]: User configuration handling
//!
//! # Example
//!
//! ```no_run
//! use photobooth::pipelines::StripCompositor;
//! use photobooth::effects::{FilterCatalog, OverlayKind};
//! use chrono::NaiveDate;
//!
//! let frames = vec![image::RgbaImage::new(800, 600); 3];
//! let filter = FilterCatalog::get("bw").unwrap();
//! let strip = StripCompositor::default()
//!     .render(&frames, &filter.chain, OverlayKind::Vignette, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
//!     .unwrap();
//! assert_eq!(strip.dimensions(), (760, 1570));
//! ```

pub mod app;
pub mod backends;
pub mod config;
pub mod constants;
pub mod effects;
pub mod errors;
pub mod pipelines;
pub mod session;

// Re-export commonly used types
pub use app::AppModel;
pub use config::BoothConfig;
pub use constants::QualityPreset;
pub use effects::{FilterCatalog, OverlayCatalog, Selection};
pub use errors::{AppError, AppResult};
pub use pipelines::{StillImage, StripCompositor, StripExporter};
pub use session::{Phase, SequenceController};
