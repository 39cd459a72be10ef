// SPDX-License-Identifier: GPL-3.0-only

//! Booth operation handlers
//!
//! Grouped by domain, each adding an `impl AppModel` block.

pub mod session;
pub mod strip;
