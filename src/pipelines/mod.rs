// SPDX-License-Identifier: MPL-2.0

//! Image pipelines from live frame to exported strip
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐     ┌──────────┐
//! │ Video source │ ──▶ │   Capture    │ ──▶ │    Strip     │ ──▶ │  Export  │
//! │ (RGBA/NV12)  │     │  - mirror    │     │  - crop      │     │  - PNG   │
//! │              │     │  - to RGBA   │     │  - filter    │     │  - JPEG  │
//! │              │     │              │     │  - overlay   │     │          │
//! │              │     │              │     │  - footer    │     │          │
//! └──────────────┘     └──────────────┘     └──────────────┘     └──────────┘
//! ```
//!
//! Capture is cheap and runs inline when the countdown expires. Rendering and
//! export run on blocking workers so timers keep firing.
//!
//! # Modules
//!
//! - [`capture`]: Mirrored stills from a video source
//! - [`strip`]: Fixed-layout strip compositor
//! - [`export`]: PNG/JPEG encoding and timestamped saving
//! - [`raster`]: Anti-aliased shape and glyph drawing shared by the strip and
//!   overlays

pub mod capture;
pub mod export;
pub mod raster;
pub mod strip;

pub use capture::FrameCapturer;
pub use export::{EncodedStrip, StripExporter};
pub use strip::{DateSource, FixedDate, StripCompositor, StripLayout, SystemDate};

/// Uncompressed RGBA still
pub type StillImage = image::RgbaImage;
