// SPDX-License-Identifier: GPL-3.0-only

//! Color filter chains
//!
//! A [`FilterChain`] is the single definition of a look. The live preview
//! gets it as a CSS `filter` string ([`FilterChain::css`]) and the compositor
//! bakes the same chain into pixels ([`FilterChain::apply`]). Both follow the
//! CSS Filter Effects color matrices, evaluated in sRGB with clamping after
//! every step, so what the preview shows is what the strip gets.

use image::RgbaImage;
use std::fmt::Write;

/// One parameterized color adjustment
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Adjustment {
    /// Rotate hue by the given angle in degrees
    HueRotate(f32),
    /// Saturation factor (1.0 = unchanged, 0.0 = gray)
    Saturate(f32),
    /// Contrast factor around mid-gray (1.0 = unchanged)
    Contrast(f32),
    /// Brightness multiplier (1.0 = unchanged)
    Brightness(f32),
    /// Grayscale amount, 0.0..=1.0
    Grayscale(f32),
    /// Sepia amount, 0.0..=1.0
    Sepia(f32),
}

impl Adjustment {
    /// True if this step leaves every pixel untouched
    pub fn is_identity(&self) -> bool {
        match *self {
            Adjustment::HueRotate(deg) => deg.rem_euclid(360.0) == 0.0,
            Adjustment::Saturate(v) | Adjustment::Contrast(v) | Adjustment::Brightness(v) => {
                v == 1.0
            }
            Adjustment::Grayscale(v) | Adjustment::Sepia(v) => v <= 0.0,
        }
    }

    /// Apply to one normalized RGB triple, clamping the result to 0..=1
    fn apply_rgb(&self, rgb: [f32; 3]) -> [f32; 3] {
        let out = match *self {
            Adjustment::Brightness(b) => [rgb[0] * b, rgb[1] * b, rgb[2] * b],
            Adjustment::Contrast(c) => {
                let offset = 0.5 - 0.5 * c;
                [rgb[0] * c + offset, rgb[1] * c + offset, rgb[2] * c + offset]
            }
            Adjustment::Grayscale(amount) => mul(&grayscale_matrix(amount), rgb),
            Adjustment::Sepia(amount) => mul(&sepia_matrix(amount), rgb),
            Adjustment::Saturate(s) => mul(&saturate_matrix(s), rgb),
            Adjustment::HueRotate(deg) => mul(&hue_rotate_matrix(deg), rgb),
        };
        [
            out[0].clamp(0.0, 1.0),
            out[1].clamp(0.0, 1.0),
            out[2].clamp(0.0, 1.0),
        ]
    }

    fn css(&self) -> String {
        match *self {
            Adjustment::HueRotate(deg) => format!("hue-rotate({}deg)", deg),
            Adjustment::Saturate(v) => format!("saturate({})", v),
            Adjustment::Contrast(v) => format!("contrast({})", v),
            Adjustment::Brightness(v) => format!("brightness({})", v),
            Adjustment::Grayscale(v) => format!("grayscale({})", v),
            Adjustment::Sepia(v) => format!("sepia({})", v),
        }
    }
}

type Matrix3 = [[f32; 3]; 3];

#[inline]
fn mul(m: &Matrix3, rgb: [f32; 3]) -> [f32; 3] {
    [
        m[0][0] * rgb[0] + m[0][1] * rgb[1] + m[0][2] * rgb[2],
        m[1][0] * rgb[0] + m[1][1] * rgb[1] + m[1][2] * rgb[2],
        m[2][0] * rgb[0] + m[2][1] * rgb[1] + m[2][2] * rgb[2],
    ]
}

fn grayscale_matrix(amount: f32) -> Matrix3 {
    let a = 1.0 - amount.clamp(0.0, 1.0);
    [
        [0.2126 + 0.7874 * a, 0.7152 - 0.7152 * a, 0.0722 - 0.0722 * a],
        [0.2126 - 0.2126 * a, 0.7152 + 0.2848 * a, 0.0722 - 0.0722 * a],
        [0.2126 - 0.2126 * a, 0.7152 - 0.7152 * a, 0.0722 + 0.9278 * a],
    ]
}

fn sepia_matrix(amount: f32) -> Matrix3 {
    let a = 1.0 - amount.clamp(0.0, 1.0);
    [
        [0.393 + 0.607 * a, 0.769 - 0.769 * a, 0.189 - 0.189 * a],
        [0.349 - 0.349 * a, 0.686 + 0.314 * a, 0.168 - 0.168 * a],
        [0.272 - 0.272 * a, 0.534 - 0.534 * a, 0.131 + 0.869 * a],
    ]
}

fn saturate_matrix(s: f32) -> Matrix3 {
    let s = s.max(0.0);
    [
        [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
    ]
}

fn hue_rotate_matrix(deg: f32) -> Matrix3 {
    let (sin, cos) = deg.to_radians().sin_cos();
    [
        [
            0.213 + cos * 0.787 - sin * 0.213,
            0.715 - cos * 0.715 - sin * 0.715,
            0.072 - cos * 0.072 + sin * 0.928,
        ],
        [
            0.213 - cos * 0.213 + sin * 0.143,
            0.715 + cos * 0.285 + sin * 0.140,
            0.072 - cos * 0.072 - sin * 0.283,
        ],
        [
            0.213 - cos * 0.213 - sin * 0.787,
            0.715 - cos * 0.715 + sin * 0.715,
            0.072 + cos * 0.928 + sin * 0.072,
        ],
    ]
}

/// Ordered list of adjustments, applied first to last
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterChain {
    steps: Vec<Adjustment>,
}

impl FilterChain {
    /// The identity chain
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(steps: impl Into<Vec<Adjustment>>) -> Self {
        Self {
            steps: steps.into(),
        }
    }

    /// Append one adjustment (builder style)
    pub fn then(mut self, step: Adjustment) -> Self {
        self.steps.push(step);
        self
    }

    pub fn steps(&self) -> &[Adjustment] {
        &self.steps
    }

    /// True if applying the chain cannot change any pixel
    pub fn is_identity(&self) -> bool {
        self.steps.iter().all(Adjustment::is_identity)
    }

    /// CSS `filter` property value for the live preview ("none" for identity)
    pub fn css(&self) -> String {
        if self.is_identity() {
            return "none".to_string();
        }
        let mut out = String::new();
        for step in self.steps.iter().filter(|s| !s.is_identity()) {
            if !out.is_empty() {
                out.push(' ');
            }
            let _ = write!(out, "{}", step.css());
        }
        out
    }

    /// Transform a single RGBA pixel; alpha passes through
    pub fn apply_pixel(&self, px: [u8; 4]) -> [u8; 4] {
        let mut rgb = [
            px[0] as f32 / 255.0,
            px[1] as f32 / 255.0,
            px[2] as f32 / 255.0,
        ];
        for step in self.steps.iter().filter(|s| !s.is_identity()) {
            rgb = step.apply_rgb(rgb);
        }
        [
            (rgb[0] * 255.0).round() as u8,
            (rgb[1] * 255.0).round() as u8,
            (rgb[2] * 255.0).round() as u8,
            px[3],
        ]
    }

    /// Apply the chain in place. Identity chains return without touching the buffer.
    pub fn apply(&self, image: &mut RgbaImage) {
        if self.is_identity() {
            return;
        }
        for pixel in image.pixels_mut() {
            pixel.0 = self.apply_pixel(pixel.0);
        }
    }
}
