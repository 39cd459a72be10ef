// SPDX-License-Identifier: GPL-3.0-only

//! Filter and overlay catalogs
//!
//! Both catalogs are fixed, ordered and keyed by a unique id. The first entry
//! of each is the default. Entries are static configuration: nothing is
//! added or removed at runtime, and the app holds exactly one selected id per
//! catalog.

pub mod filters;
pub mod overlays;

pub use filters::{Adjustment, FilterChain};
pub use overlays::OverlayKind;

use std::sync::LazyLock;

/// Id of the identity filter
pub const DEFAULT_FILTER_ID: &str = "normal";
/// Id of the empty overlay
pub const DEFAULT_OVERLAY_ID: &str = "none";

/// A named color look
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub id: &'static str,
    pub name: &'static str,
    pub chain: FilterChain,
}

/// A named per-photo decoration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overlay {
    pub id: &'static str,
    pub name: &'static str,
    pub kind: OverlayKind,
}

static FILTERS: LazyLock<Vec<Filter>> = LazyLock::new(|| {
    use Adjustment::*;
    let filter = |id, name, steps: &[Adjustment]| Filter {
        id,
        name,
        chain: FilterChain::new(steps.to_vec()),
    };
    vec![
        filter(DEFAULT_FILTER_ID, "Normal", &[]),
        filter("bw", "Black & White", &[Grayscale(1.0), Contrast(1.2)]),
        filter("sepia", "Sepia", &[Sepia(0.8), Contrast(1.1)]),
        filter(
            "vintage",
            "Vintage",
            &[Sepia(0.4), Saturate(0.8), Contrast(0.9), Brightness(1.1)],
        ),
        filter(
            "warm",
            "Warm",
            &[Sepia(0.25), Saturate(1.3), HueRotate(-10.0)],
        ),
        filter("cool", "Cool", &[Saturate(0.9), HueRotate(20.0), Brightness(1.05)]),
        filter("vivid", "Vivid", &[Saturate(1.6), Contrast(1.15)]),
        filter(
            "noir",
            "Noir",
            &[Grayscale(1.0), Contrast(1.8), Brightness(0.9)],
        ),
        filter(
            "fade",
            "Fade",
            &[Contrast(0.8), Brightness(1.1), Saturate(0.7)],
        ),
        filter(
            "dream",
            "Dream",
            &[Brightness(1.15), Saturate(1.2), HueRotate(-25.0), Contrast(0.9)],
        ),
    ]
});

static OVERLAYS: &[Overlay] = &[
    Overlay {
        id: DEFAULT_OVERLAY_ID,
        name: "None",
        kind: OverlayKind::None,
    },
    Overlay {
        id: "vignette",
        name: "Vignette",
        kind: OverlayKind::Vignette,
    },
    Overlay {
        id: "hearts",
        name: "Hearts",
        kind: OverlayKind::Hearts,
    },
    Overlay {
        id: "sparkle",
        name: "Sparkle",
        kind: OverlayKind::Sparkle,
    },
    Overlay {
        id: "grain",
        name: "Film Grain",
        kind: OverlayKind::Grain,
    },
];

/// Ordered filter registry
pub struct FilterCatalog;

impl FilterCatalog {
    pub fn all() -> &'static [Filter] {
        &FILTERS
    }

    pub fn get(id: &str) -> Option<&'static Filter> {
        FILTERS.iter().find(|f| f.id == id)
    }

    pub fn default_filter() -> &'static Filter {
        &FILTERS[0]
    }
}

/// Ordered overlay registry
pub struct OverlayCatalog;

impl OverlayCatalog {
    pub fn all() -> &'static [Overlay] {
        OVERLAYS
    }

    pub fn get(id: &str) -> Option<&'static Overlay> {
        OVERLAYS.iter().find(|o| o.id == id)
    }

    pub fn default_overlay() -> &'static Overlay {
        &OVERLAYS[0]
    }
}

/// The active filter and overlay; choosing replaces the previous choice
#[derive(Debug, Clone, Copy)]
pub struct Selection {
    filter: &'static Filter,
    overlay: &'static Overlay,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            filter: FilterCatalog::default_filter(),
            overlay: OverlayCatalog::default_overlay(),
        }
    }
}

impl Selection {
    /// Build from stored ids, falling back to the defaults for unknown ids
    pub fn from_ids(filter_id: &str, overlay_id: &str) -> Self {
        let mut selection = Self::default();
        if !selection.select_filter(filter_id) {
            tracing::warn!(filter_id, "Unknown filter id, using default");
        }
        if !selection.select_overlay(overlay_id) {
            tracing::warn!(overlay_id, "Unknown overlay id, using default");
        }
        selection
    }

    /// Select a filter by id; unknown ids leave the selection unchanged
    pub fn select_filter(&mut self, id: &str) -> bool {
        match FilterCatalog::get(id) {
            Some(filter) => {
                self.filter = filter;
                true
            }
            None => false,
        }
    }

    /// Select an overlay by id; unknown ids leave the selection unchanged
    pub fn select_overlay(&mut self, id: &str) -> bool {
        match OverlayCatalog::get(id) {
            Some(overlay) => {
                self.overlay = overlay;
                true
            }
            None => false,
        }
    }

    pub fn filter(&self) -> &'static Filter {
        self.filter
    }

    pub fn overlay(&self) -> &'static Overlay {
        self.overlay
    }
}
