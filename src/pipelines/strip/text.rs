// SPDX-License-Identifier: GPL-3.0-only

//! Footer typesetting
//!
//! Lines are shaped by `parley` in the bundled DejaVu Sans Mono and filled
//! through a [`VectorLayer`]. System fonts are never consulted, so the footer
//! renders identically on every machine.

use crate::errors::CompositeError;
use crate::pipelines::raster::VectorLayer;
use parley::layout::PositionedLayoutItem;
use parley::style::{FontStack, StyleProperty};
use std::borrow::Cow;
use vello_cpu::peniko::{Blob, FontData};

static FOOTER_FONT: &[u8] = include_bytes!("../../../assets/fonts/DejaVuSansMono.ttf");

/// RGBA8 brush carried through parley layouts
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrush(pub [u8; 4]);

/// One shaped line of text
pub struct TextLine {
    layout: parley::Layout<TextBrush>,
}

impl TextLine {
    pub fn width(&self) -> f32 {
        self.layout.width()
    }

    pub fn height(&self) -> f32 {
        self.layout.height()
    }
}

/// Shapes and draws text in the footer font
pub struct Typesetter {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrush>,
    family: String,
    font: FontData,
}

impl Typesetter {
    pub fn new() -> Result<Self, CompositeError> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(FOOTER_FONT.to_vec()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| CompositeError::Font("no font family registered".to_string()))?;
        let family = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| CompositeError::Font("font family has no name".to_string()))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family,
            font: FontData::new(Blob::from(FOOTER_FONT.to_vec()), 0),
        })
    }

    /// Shape `text` as a single unwrapped line
    pub fn line(&mut self, text: &str, size_px: f32, rgba: [u8; 4]) -> TextLine {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(StyleProperty::FontStack(FontStack::Source(Cow::Owned(
            self.family.clone(),
        ))));
        builder.push_default(StyleProperty::FontSize(size_px));
        builder.push_default(StyleProperty::Brush(TextBrush(rgba)));

        let mut layout: parley::Layout<TextBrush> = builder.build(text);
        layout.break_all_lines(None);
        TextLine { layout }
    }

    /// Draw `line` with its top-left corner at `(x, y)`
    pub fn draw(&self, layer: &mut VectorLayer, line: &TextLine, x: f64, y: f64) {
        for row in line.layout.lines() {
            for item in row.items() {
                let PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let TextBrush(rgba) = run.style().brush;
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                layer.fill_glyphs(&self.font, run.run().font_size(), (x, y), rgba, glyphs);
            }
        }
    }
}
