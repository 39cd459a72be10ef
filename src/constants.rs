// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use serde::{Deserialize, Serialize};

/// Number of photos in one strip session
pub const SHOTS_PER_SESSION: usize = 3;

/// Export quality presets (only affects JPEG)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QualityPreset {
    /// Smaller files, visible artifacts
    Low,
    /// Balanced quality and file size
    Medium,
    /// Near-lossless (default)
    #[default]
    High,
    /// Minimal compression
    Maximum,
}

impl QualityPreset {
    /// Get JPEG quality value (0-100)
    pub fn jpeg_quality(&self) -> u8 {
        match self {
            QualityPreset::Low => 60,
            QualityPreset::Medium => 80,
            QualityPreset::High => 92,
            QualityPreset::Maximum => 98,
        }
    }
}

/// Session timing defaults
pub mod timing {
    /// Countdown starts at this number for each shot
    pub const COUNTDOWN_SECONDS: u32 = 3;

    /// Interval between countdown ticks
    pub const TICK_MS: u64 = 1000;

    /// How long the capture flash stays visible
    pub const FLASH_MS: u64 = 150;

    /// Pause after a capture before the next countdown begins (includes the flash)
    pub const SETTLE_MS: u64 = 1000;
}

/// Strip geometry (logical pixels)
pub mod layout {
    pub const PHOTO_WIDTH: u32 = 600;
    pub const PHOTO_HEIGHT: u32 = 450;
    pub const PHOTO_GAP: u32 = 30;

    /// Side margins hold the sprocket holes
    pub const SIDE_PADDING: u32 = 80;

    /// Header space above the first photo
    pub const TOP_PADDING: u32 = 60;

    /// Footer space below the last photo (title and date)
    pub const BOTTOM_PADDING: u32 = 100;

    /// Sprocket hole size and spacing
    pub const SPROCKET_WIDTH: u32 = 36;
    pub const SPROCKET_HEIGHT: u32 = 24;
    pub const SPROCKET_GAP: u32 = 20;
    pub const SPROCKET_RADIUS: u32 = 5;
    pub const SPROCKET_TOP: u32 = 20;

    /// Strip background (near black film base)
    pub const BACKGROUND: [u8; 4] = [0x1a, 0x1a, 0x1a, 0xff];

    /// Sprocket hole color
    pub const SPROCKET_COLOR: [u8; 4] = [0xf2, 0xf0, 0xe8, 0xff];

    /// Footer title and date colors
    pub const TITLE_COLOR: [u8; 4] = [0xf5, 0xf5, 0xf5, 0xff];
    pub const DATE_COLOR: [u8; 4] = [0xa8, 0xa8, 0xa8, 0xff];

    /// Footer font sizes in pixels
    pub const TITLE_SIZE: f32 = 30.0;
    pub const DATE_SIZE: f32 = 20.0;
    /// Space between the footer title and date lines
    pub const FOOTER_LINE_GAP: f32 = 8.0;
}

/// Countdown prompts, one picked at random per shot
pub const PROMPTS: &[&str] = &[
    "Strike a pose!",
    "Say cheese!",
    "Make a silly face!",
    "Look surprised!",
    "Show us your best smile!",
    "Act like a superstar!",
    "Give us a wink!",
    "Do your best duck face!",
    "Look over your shoulder!",
    "Pretend you just won the lottery!",
];

/// Default export settings
pub mod export {
    /// Folder created under the user's Pictures directory
    pub const DEFAULT_SAVE_FOLDER: &str = "Photobooth";

    /// Filename prefix, followed by a `%Y%m%d_%H%M%S` timestamp
    pub const FILE_PREFIX: &str = "photo-strip";

    /// Numbered names tried before an export gives up
    pub const MAX_NAME_ATTEMPTS: u32 = 99;

    /// Default footer title
    pub const DEFAULT_TITLE: &str = "PHOTO BOOTH";

    /// Footer date format
    pub const DATE_FORMAT: &str = "%Y.%m.%d";
}

/// Supported file formats for image file sources
pub mod file_formats {
    /// Supported image file extensions
    pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];

    /// Check if a file extension is a supported image format
    pub fn is_image_extension(ext: &str) -> bool {
        IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str())
    }
}

/// Application information utilities
pub mod app_info {
    /// Get the application version from build-time environment
    pub fn version() -> &'static str {
        env!("GIT_VERSION")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_extensions() {
        assert!(file_formats::is_image_extension("PNG"));
        assert!(file_formats::is_image_extension("jpeg"));
        assert!(!file_formats::is_image_extension("mp4"));
    }

    #[test]
    fn test_settle_covers_flash() {
        assert!(timing::SETTLE_MS >= timing::FLASH_MS);
    }
}
