// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Parley-backed text measurement adapter.
//!
//! This crate implements [`forestplot_text::TextMeasurer`] using Parley, giving
//! the live view shaping-aware widths for auto-sized columns and the label
//! column. Auto-width measurement asks for the same strings over and over
//! (every cell of a column, every layout pass), so single-line results are
//! memoised per `(text, style)`.
//!
//! Fonts that arrive after the first layout pass are picked up by building a
//! fresh measurer (see [`ParleyTextMeasurer::new`]) and handing it to the
//! store's font-ready pass; the cache of the old measurer is dropped with it.

#![no_std]

extern crate alloc;

use alloc::borrow::Cow;
use alloc::string::String;
use alloc::sync::Arc;
use core::cell::RefCell;

use forestplot_text::{FontFamily, FontStyle, TextMeasurer, TextMetrics, TextStyle};
use hashbrown::HashMap;
use parley::style::{FontFamily as ParleyFontFamily, FontStack, GenericFamily, StyleProperty};
use parley::{Alignment, AlignmentOptions, FontContext, FontStyle as ParleyFontStyle, FontWeight};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct CacheKey {
    text: String,
    font_size_bits: u64,
    weight: u16,
    style: u8,
    family: Arc<str>,
}

impl CacheKey {
    fn new(text: &str, style: &TextStyle) -> Self {
        Self {
            text: String::from(text),
            font_size_bits: style.font_size.to_bits(),
            weight: style.font_weight.0,
            style: match style.font_style {
                FontStyle::Normal => 0,
                FontStyle::Italic => 1,
                FontStyle::Oblique => 2,
            },
            family: Arc::from(style.font_family.as_css_family()),
        }
    }
}

/// A [`TextMeasurer`] backed by Parley.
///
/// Measures single lines; multi-line input is truncated to its first line.
pub struct ParleyTextMeasurer {
    font_cx: RefCell<FontContext>,
    layout_cx: RefCell<parley::LayoutContext<()>>,
    cache: RefCell<HashMap<CacheKey, TextMetrics>>,
    display_scale: f32,
    quantize: bool,
}

impl core::fmt::Debug for ParleyTextMeasurer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ParleyTextMeasurer")
            .field("display_scale", &self.display_scale)
            .field("quantize", &self.quantize)
            .field("cached", &self.cache.borrow().len())
            .finish_non_exhaustive()
    }
}

impl ParleyTextMeasurer {
    /// Creates a new Parley-backed text measurer using the system font configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            font_cx: RefCell::new(FontContext::new()),
            layout_cx: RefCell::new(parley::LayoutContext::new()),
            cache: RefCell::new(HashMap::new()),
            display_scale: 1.0,
            quantize: true,
        }
    }

    /// Sets the display scale passed to Parley.
    ///
    /// This is typically a device pixel ratio. Measurements returned by this
    /// measurer are scaled back into logical coordinates (divide by scale).
    #[must_use]
    pub fn with_display_scale(mut self, display_scale: f32) -> Self {
        self.display_scale = display_scale.max(0.0);
        self.cache.get_mut().clear();
        self
    }

    /// Sets whether Parley should quantize layout coordinates to pixel boundaries.
    #[must_use]
    pub fn with_quantize(mut self, quantize: bool) -> Self {
        self.quantize = quantize;
        self.cache.get_mut().clear();
        self
    }

    /// Drops every memoised measurement.
    pub fn clear_cache(&self) {
        self.cache.borrow_mut().clear();
    }

    fn parley_font_stack(family: &FontFamily) -> FontStack<'_> {
        match family {
            FontFamily::Serif => FontStack::from(ParleyFontFamily::Generic(GenericFamily::Serif)),
            FontFamily::SansSerif => {
                FontStack::from(ParleyFontFamily::Generic(GenericFamily::SansSerif))
            }
            FontFamily::Monospace => {
                FontStack::from(ParleyFontFamily::Generic(GenericFamily::Monospace))
            }
            // Named families may be full CSS stacks ("Inter, system-ui, sans-serif").
            FontFamily::Named(name) if name.contains(',') => {
                FontStack::Source(Cow::Borrowed(name.as_ref()))
            }
            FontFamily::Named(name) => {
                FontStack::from(ParleyFontFamily::Named(Cow::Borrowed(name.as_ref())))
            }
        }
    }

    fn parley_font_style(style: FontStyle) -> ParleyFontStyle {
        match style {
            FontStyle::Normal => ParleyFontStyle::Normal,
            FontStyle::Italic => ParleyFontStyle::Italic,
            FontStyle::Oblique => ParleyFontStyle::Oblique(None),
        }
    }

    fn font_size_f32(font_size: f64) -> f32 {
        if !font_size.is_finite() {
            return 0.0;
        }
        let font_size = font_size.max(0.0);
        if font_size >= f64::from(f32::MAX) {
            f32::MAX
        } else {
            #[allow(
                clippy::cast_possible_truncation,
                reason = "Value is clamped to f32::MAX above"
            )]
            {
                font_size as f32
            }
        }
    }

    fn shape(&self, text: &str, style: &TextStyle) -> TextMetrics {
        let scale = self.display_scale.max(1.0e-6);

        let mut font_cx = self.font_cx.borrow_mut();
        let mut layout_cx = self.layout_cx.borrow_mut();

        let mut builder = layout_cx.ranged_builder(&mut font_cx, text, scale, self.quantize);
        builder.push_default(StyleProperty::FontSize(Self::font_size_f32(
            style.font_size,
        )));
        builder.push_default(StyleProperty::FontStack(Self::parley_font_stack(
            &style.font_family,
        )));
        builder.push_default(StyleProperty::FontStyle(Self::parley_font_style(
            style.font_style,
        )));
        builder.push_default(StyleProperty::FontWeight(FontWeight::new(f32::from(
            style.font_weight.0,
        ))));

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);
        layout.align(None, Alignment::Start, AlignmentOptions::default());

        let Some(line) = layout.lines().next() else {
            return TextMetrics::EMPTY;
        };

        let m = line.metrics();
        let scale = f64::from(scale);
        TextMetrics {
            advance_width: f64::from(m.advance) / scale,
            ascent: f64::from(m.ascent) / scale,
            descent: f64::from(m.descent) / scale,
            leading: f64::from(m.leading) / scale,
        }
    }
}

impl Default for ParleyTextMeasurer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextMeasurer for ParleyTextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        let text = text.split('\n').next().unwrap_or("");
        if text.is_empty() {
            return TextMetrics::EMPTY;
        }

        let key = CacheKey::new(text, style);
        if let Some(hit) = self.cache.borrow().get(&key) {
            return *hit;
        }
        let metrics = self.shape(text, style);
        self.cache.borrow_mut().insert(key, metrics);
        metrics
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn parley_measurer_is_nonzero_for_nonempty_text() {
        let m = ParleyTextMeasurer::new();
        let metrics = m.measure("Hello", &TextStyle::new(12.0));
        assert!(metrics.advance_width > 0.0, "expected a positive advance");
        assert!(metrics.ascent > 0.0, "expected a positive ascent");
    }

    #[test]
    fn repeated_measurements_hit_the_cache() {
        let m = ParleyTextMeasurer::new();
        let style = TextStyle::new(12.0);
        let a = m.measure("0.80 (0.70, 0.91)", &style);
        let b = m.measure("0.80 (0.70, 0.91)", &style);
        assert_eq!(a, b, "cached metrics must be identical");
        assert_eq!(m.cache.borrow().len(), 1, "one entry per distinct key");
    }

    #[test]
    fn empty_text_measures_empty() {
        let m = ParleyTextMeasurer::new();
        assert_eq!(m.measure("", &TextStyle::new(12.0)), TextMetrics::EMPTY);
    }
}
