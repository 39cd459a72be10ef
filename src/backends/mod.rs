// SPDX-License-Identifier: MPL-2.0

//! Backend abstraction layer for camera capture
//!
//! The booth never talks to hardware directly. A [`camera::CameraProvider`]
//! opens a device once and hands back a [`camera::VideoSource`] that the
//! capture pipeline polls:
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                  App Layer                   │
//! └────────────────────┬────────────────────────┘
//!                      │
//! ┌────────────────────┴────────────────────────┐
//! │              Backend Layer                   │
//! │  ┌─────────────┐  ┌───────┐  ┌──────────┐  │
//! │  │  Live feed  │  │ Image │  │ Pattern  │  │
//! │  │  (watch)    │  │ file  │  │ (synth)  │  │
//! │  └─────────────┘  └───────┘  └──────────┘  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`camera`]: Device acquisition contract and video sources

pub mod camera;
