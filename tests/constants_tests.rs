// SPDX-License-Identifier: MPL-2.0

//! Integration tests for constants module

use photobooth::constants::{PROMPTS, QualityPreset, SHOTS_PER_SESSION, layout, timing};

#[test]
fn test_quality_preset_ordering() {
    // Presets are ordered from lowest to highest quality
    let presets = [
        QualityPreset::Low,
        QualityPreset::Medium,
        QualityPreset::High,
        QualityPreset::Maximum,
    ];
    let mut prev = 0u8;
    for preset in presets {
        let quality = preset.jpeg_quality();
        assert!(
            quality > prev,
            "Presets should be ordered from lowest to highest"
        );
        assert!(quality <= 100);
        prev = quality;
    }
}

#[test]
fn test_default_quality_preset() {
    assert_eq!(QualityPreset::default(), QualityPreset::High);
}

#[test]
fn test_session_shape() {
    assert_eq!(SHOTS_PER_SESSION, 3);
    assert_eq!(timing::COUNTDOWN_SECONDS, 3);
    // Flash must finish before the next countdown begins
    assert!(timing::FLASH_MS < timing::SETTLE_MS);
}

#[test]
fn test_strip_layout_constants() {
    let width = layout::PHOTO_WIDTH + 2 * layout::SIDE_PADDING;
    let height = layout::TOP_PADDING
        + 3 * layout::PHOTO_HEIGHT
        + 2 * layout::PHOTO_GAP
        + layout::BOTTOM_PADDING;
    assert_eq!((width, height), (760, 1570));
    // Sprockets fit inside the side margin
    assert!(layout::SPROCKET_WIDTH < layout::SIDE_PADDING);
}

#[test]
fn test_prompts_are_nonempty() {
    assert!(!PROMPTS.is_empty());
    assert!(PROMPTS.iter().all(|p| !p.trim().is_empty()));
}
