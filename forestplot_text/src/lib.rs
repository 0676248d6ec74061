// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text measurement hooks for forest plot layout.
//!
//! Column widths, the label column and the axis block are all sized from text
//! extents. The live view measures with whatever font engine its host offers;
//! the static exporter frequently runs headless, with no font engine at all.
//! Both go through the tiny [`TextMeasurer`] interface defined here so the
//! layout engine never depends on a particular shaping backend.
//!
//! This crate is intentionally:
//! - small and dependency-free,
//! - `no_std`-friendly (it uses `alloc` for owned font family names), and
//! - renderer-agnostic (shaping engines and web canvas measurement can both
//!   implement the same trait).
//!
//! When no shaping backend exists, [`HeuristicTextMeasurer`] estimates widths
//! from per-glyph-class average advances. It never fails.

#![no_std]

extern crate alloc;

use alloc::sync::Arc;

/// A minimal text measurement interface used by the layout engine.
///
/// Implementations can be:
/// - heuristic (fast, deterministic, approximate),
/// - backed by a shaping engine (e.g. Parley), or
/// - backed by web platform text measurement (e.g. HTML canvas).
pub trait TextMeasurer {
    /// Measure a single line of text.
    ///
    /// `text` is treated as a single line; callers should split on `\n` if they
    /// want multi-line layout.
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics;

    /// Convenience for callers that only need the advance width.
    fn width(&self, text: &str, style: &TextStyle) -> f64 {
        self.measure(text, style).advance_width
    }
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for &T {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        (**self).measure(text, style)
    }
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for Arc<T> {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        (**self).measure(text, style)
    }
}

/// Text styling inputs relevant to measurement.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    /// Font size in the plot’s coordinate system (typically pixels).
    pub font_size: f64,
    /// The preferred font family.
    pub font_family: FontFamily,
    /// Font weight (e.g. `400` for normal, `700` for bold).
    pub font_weight: FontWeight,
    /// Font style (normal/italic/oblique).
    pub font_style: FontStyle,
}

impl TextStyle {
    /// Creates a default `TextStyle` with the given `font_size`.
    #[must_use]
    pub fn new(font_size: f64) -> Self {
        Self {
            font_size,
            font_family: FontFamily::SansSerif,
            font_weight: FontWeight::NORMAL,
            font_style: FontStyle::Normal,
        }
    }

    /// Sets the font family.
    #[must_use]
    pub fn with_family(mut self, font_family: FontFamily) -> Self {
        self.font_family = font_family;
        self
    }

    /// Sets the font weight.
    #[must_use]
    pub fn with_weight(mut self, font_weight: FontWeight) -> Self {
        self.font_weight = font_weight;
        self
    }

    /// Sets the font style.
    #[must_use]
    pub fn with_style(mut self, font_style: FontStyle) -> Self {
        self.font_style = font_style;
        self
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::new(14.0)
    }
}

/// Font family selection for measurement.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FontFamily {
    /// A generic serif family (CSS `serif`).
    Serif,
    /// A generic sans-serif family (CSS `sans-serif`).
    SansSerif,
    /// A generic monospace family (CSS `monospace`).
    Monospace,
    /// A named family or CSS font stack (e.g. `"Inter, system-ui, sans-serif"`).
    Named(Arc<str>),
}

impl FontFamily {
    /// Returns the font family string for CSS-style font declarations.
    #[must_use]
    pub fn as_css_family(&self) -> &str {
        match self {
            Self::Serif => "serif",
            Self::SansSerif => "sans-serif",
            Self::Monospace => "monospace",
            Self::Named(name) => name,
        }
    }

    /// Maps a CSS family string onto a family, recognising the generic keywords.
    #[must_use]
    pub fn from_css(family: &str) -> Self {
        match family.trim() {
            "" | "sans-serif" => Self::SansSerif,
            "serif" => Self::Serif,
            "monospace" => Self::Monospace,
            other => Self::Named(Arc::from(other)),
        }
    }
}

/// CSS-style font weights.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontWeight(pub u16);

impl FontWeight {
    /// Normal weight (`400`).
    pub const NORMAL: Self = Self(400);
    /// Medium weight (`500`).
    pub const MEDIUM: Self = Self(500);
    /// Semi-bold weight (`600`).
    pub const SEMI_BOLD: Self = Self(600);
    /// Bold weight (`700`).
    pub const BOLD: Self = Self(700);
}

/// CSS-style font styles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontStyle {
    /// Normal style.
    Normal,
    /// Italic style.
    Italic,
    /// Oblique style.
    Oblique,
}

/// Measured metrics for a single line of text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextMetrics {
    /// The advance width (useful for horizontal layout).
    pub advance_width: f64,
    /// Distance from baseline to the top of typical glyphs.
    pub ascent: f64,
    /// Distance from baseline to the bottom of typical glyphs.
    pub descent: f64,
    /// Additional line spacing beyond ascent+descent.
    pub leading: f64,
}

impl TextMetrics {
    /// Metrics of the empty string.
    pub const EMPTY: Self = Self {
        advance_width: 0.0,
        ascent: 0.0,
        descent: 0.0,
        leading: 0.0,
    };

    /// Returns `ascent + descent + leading`.
    #[must_use]
    pub fn line_height(&self) -> f64 {
        self.ascent + self.descent + self.leading
    }
}

/// Glyph classes used by [`HeuristicTextMeasurer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GlyphClass {
    /// Thin glyphs: `i`, `l`, punctuation, spaces.
    Narrow,
    /// ASCII digits (tabular in most UI fonts).
    Digit,
    /// Upper-case Latin letters other than the narrow ones.
    Upper,
    /// Wide glyphs: `m`, `w`, `M`, `W`, `@`, `%` and East Asian wide characters.
    Wide,
    /// Everything else.
    Default,
}

impl GlyphClass {
    /// Classifies a single character.
    #[must_use]
    pub fn of(c: char) -> Self {
        match c {
            'i' | 'l' | 'j' | 't' | 'f' | 'r' | 'I' | 'J' | '!' | '.' | ',' | ':' | ';' | '\''
            | '"' | '|' | '(' | ')' | '[' | ']' | '{' | '}' | ' ' | '`' | '-' | '/' | '\\' => {
                Self::Narrow
            }
            '0'..='9' => Self::Digit,
            'm' | 'w' | 'M' | 'W' | '@' | '%' | '&' | '\u{2014}' => Self::Wide,
            'A'..='Z' => Self::Upper,
            c if is_east_asian_wide(c) => Self::Wide,
            _ => Self::Default,
        }
    }

    /// Average advance of this class, in ems.
    #[must_use]
    pub fn em_width(self) -> f64 {
        match self {
            Self::Narrow => 0.3,
            Self::Digit => 0.56,
            Self::Upper => 0.68,
            Self::Wide => 0.86,
            Self::Default => 0.54,
        }
    }
}

fn is_east_asian_wide(c: char) -> bool {
    matches!(
        u32::from(c),
        0x1100..=0x115F | 0x2E80..=0xA4CF | 0xAC00..=0xD7A3 | 0xF900..=0xFAFF | 0xFF00..=0xFF60
    )
}

/// A deterministic glyph-class width estimator.
///
/// Each character contributes the average advance of its [`GlyphClass`];
/// weights of 600 and above widen the result by 6%. Ascent and descent are
/// fixed fractions of the font size (0.8em / 0.2em).
///
/// The estimate is monotonic in string length for strings of a single glyph
/// class, which keeps auto-width columns stable as data grows.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicTextMeasurer;

/// Width multiplier applied to semi-bold and heavier text.
pub const BOLD_WIDTH_FACTOR: f64 = 1.06;

impl TextMeasurer for HeuristicTextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        let font_size = if style.font_size.is_finite() {
            style.font_size.max(0.0)
        } else {
            0.0
        };
        let ems: f64 = text.chars().map(|c| GlyphClass::of(c).em_width()).sum();
        let weight_factor = if style.font_weight >= FontWeight::SEMI_BOLD {
            BOLD_WIDTH_FACTOR
        } else {
            1.0
        };
        TextMetrics {
            advance_width: ems * font_size * weight_factor,
            ascent: 0.8 * font_size,
            descent: 0.2 * font_size,
            leading: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::string::String;

    use super::*;

    #[test]
    fn width_is_monotonic_within_a_glyph_class() {
        let m = HeuristicTextMeasurer;
        let style = TextStyle::new(12.0);
        for sample in ['1', 'a', 'W', 'i', 'Q'] {
            let mut prev = 0.0;
            let mut s = String::new();
            for _ in 0..20 {
                s.push(sample);
                let w = m.width(&s, &style);
                assert!(w > prev, "width did not grow for {s:?}");
                prev = w;
            }
        }
    }

    #[test]
    fn narrow_glyphs_measure_narrower_than_wide_ones() {
        let m = HeuristicTextMeasurer;
        let style = TextStyle::new(14.0);
        assert!(m.width("iiii", &style) < m.width("0000", &style), "narrow glyphs beat digits");
        assert!(m.width("0000", &style) < m.width("MMMM", &style), "digits beat wide capitals");
    }

    #[test]
    fn bold_text_is_wider() {
        let m = HeuristicTextMeasurer;
        let normal = TextStyle::new(14.0);
        let bold = TextStyle::new(14.0).with_weight(FontWeight::BOLD);
        assert!(m.width("Study", &bold) > m.width("Study", &normal), "bold widens the advance");
    }

    #[test]
    fn non_finite_font_size_measures_as_zero() {
        let m = HeuristicTextMeasurer;
        let metrics = m.measure("abc", &TextStyle::new(f64::NAN));
        assert_eq!(metrics.advance_width, 0.0, "NaN size must not leak");
        assert_eq!(metrics.line_height(), 0.0, "NaN size must not leak");
    }

    #[test]
    fn css_family_round_trips_generic_keywords() {
        assert_eq!(FontFamily::from_css("serif"), FontFamily::Serif);
        assert_eq!(FontFamily::from_css(" "), FontFamily::SansSerif);
        assert_eq!(
            FontFamily::from_css("Inter, sans-serif").as_css_family(),
            "Inter, sans-serif"
        );
    }
}
