// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Theme tokens.
//!
//! [`Theme::default`] is the only hard-coded baseline. Every other look is a
//! [`ThemeOverrides`] value applied with [`merge_theme`]; [`ThemePreset`] is a
//! named set of such overrides.

extern crate alloc;

use alloc::string::String;

use forestplot_text::{FontFamily, FontStyle, FontWeight, TextStyle};
use peniko::Color;

use crate::axis::AxisConfig;

/// Color tokens.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct ThemeColors {
    /// Document background.
    #[cfg_attr(feature = "serde", serde(with = "crate::paint::serde_color"))]
    pub background: Color,
    /// Primary text.
    #[cfg_attr(feature = "serde", serde(with = "crate::paint::serde_color"))]
    pub foreground: Color,
    /// Secondary text (subtitles, counts, footnotes).
    #[cfg_attr(feature = "serde", serde(with = "crate::paint::serde_color"))]
    pub muted: Color,
    /// Rules and axis line.
    #[cfg_attr(feature = "serde", serde(with = "crate::paint::serde_color"))]
    pub border: Color,
    /// Interval lines and point markers.
    #[cfg_attr(feature = "serde", serde(with = "crate::paint::serde_color"))]
    pub interval: Color,
    /// Summary diamonds.
    #[cfg_attr(feature = "serde", serde(with = "crate::paint::serde_color"))]
    pub summary: Color,
    /// The vertical line at the null value.
    #[cfg_attr(feature = "serde", serde(with = "crate::paint::serde_color"))]
    pub null_line: Color,
    /// Default reference-line color.
    #[cfg_attr(feature = "serde", serde(with = "crate::paint::serde_color"))]
    pub reference_line: Color,
    /// Alternate row band fill.
    #[cfg_attr(feature = "serde", serde(with = "crate::paint::serde_color"))]
    pub row_band: Color,
    /// Group header row fill.
    #[cfg_attr(feature = "serde", serde(with = "crate::paint::serde_color"))]
    pub group_header: Color,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            background: Color::WHITE,
            foreground: Color::from_rgb8(0x1a, 0x1a, 0x1a),
            muted: Color::from_rgb8(0x6b, 0x72, 0x80),
            border: Color::from_rgb8(0xd1, 0xd5, 0xdb),
            interval: Color::from_rgb8(0x25, 0x63, 0xeb),
            summary: Color::from_rgb8(0x1e, 0x3a, 0x8a),
            null_line: Color::from_rgb8(0x9c, 0xa3, 0xaf),
            reference_line: Color::from_rgb8(0xdc, 0x26, 0x26),
            row_band: Color::from_rgb8(0xf9, 0xfa, 0xfb),
            group_header: Color::from_rgb8(0xf3, 0xf4, 0xf6),
        }
    }
}

/// Typography tokens.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct ThemeTypography {
    /// CSS font family list.
    pub font_family: String,
    /// Small text (group counts, tick labels, footnotes).
    pub font_size_sm: f64,
    /// Body text (labels and cells).
    pub font_size_base: f64,
    /// Subtitle and axis label.
    pub font_size_lg: f64,
    /// Title.
    pub font_size_title: f64,
    /// Column header size relative to body text.
    pub header_font_scale: f64,
    /// Regular weight.
    pub font_weight_normal: u16,
    /// Weight for headers and bold rows.
    pub font_weight_bold: u16,
    /// Line height as a multiple of the font size.
    pub line_height: f64,
}

impl Default for ThemeTypography {
    fn default() -> Self {
        Self {
            font_family: String::from("system-ui, -apple-system, 'Segoe UI', sans-serif"),
            font_size_sm: 12.0,
            font_size_base: 14.0,
            font_size_lg: 16.0,
            font_size_title: 18.0,
            header_font_scale: 1.05,
            font_weight_normal: 400,
            font_weight_bold: 600,
            line_height: 1.5,
        }
    }
}

/// Spacing tokens, in pixels.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct ThemeSpacing {
    /// Height of one data row.
    pub row_height: f64,
    /// Height of one column header tier.
    pub header_height: f64,
    /// Outer document padding.
    pub padding: f64,
    /// Horizontal cell padding (each side).
    pub cell_padding_x: f64,
    /// Vertical cell padding (each side).
    pub cell_padding_y: f64,
    /// Gap between the tables and the forest plot.
    pub column_gap: f64,
    /// Label indentation per group level.
    pub indent_per_level: f64,
    /// Horizontal padding of column group headers (each side).
    pub group_header_padding: f64,
    /// Gap between the plot area and the axis block.
    pub axis_gap: f64,
    /// Gap between stacked text blocks (title, subtitle, caption, footnote).
    pub text_gap: f64,
    /// Gap between the header block and the table, and between the axis block and the footer.
    pub section_gap: f64,
}

impl Default for ThemeSpacing {
    fn default() -> Self {
        Self {
            row_height: 28.0,
            header_height: 36.0,
            padding: 12.0,
            cell_padding_x: 10.0,
            cell_padding_y: 4.0,
            column_gap: 8.0,
            indent_per_level: 16.0,
            group_header_padding: 8.0,
            axis_gap: 8.0,
            text_gap: 4.0,
            section_gap: 12.0,
        }
    }
}

/// Mark shape tokens.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct ThemeShapes {
    /// Point marker size.
    pub point_size: f64,
    /// Full height of summary diamonds.
    pub summary_height: f64,
    /// Interval line width.
    pub line_width: f64,
    /// Full height of whisker caps; 0 draws none.
    pub whisker_height: f64,
    /// Corner radius of badges.
    pub border_radius: f64,
}

impl Default for ThemeShapes {
    fn default() -> Self {
        Self {
            point_size: 8.0,
            summary_height: 10.0,
            line_width: 1.5,
            whisker_height: 6.0,
            border_radius: 4.0,
        }
    }
}

/// A complete theme.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct Theme {
    /// Colors.
    pub colors: ThemeColors,
    /// Typography.
    pub typography: ThemeTypography,
    /// Spacing.
    pub spacing: ThemeSpacing,
    /// Mark shapes.
    pub shapes: ThemeShapes,
    /// X-axis policy.
    pub axis: AxisConfig,
}

impl Theme {
    fn style(&self, size: f64, weight: u16) -> TextStyle {
        TextStyle::new(size)
            .with_family(FontFamily::from_css(&self.typography.font_family))
            .with_weight(FontWeight(weight))
    }

    /// Body text (labels and cells).
    pub fn body_style(&self) -> TextStyle {
        self.style(
            self.typography.font_size_base,
            self.typography.font_weight_normal,
        )
    }

    /// Bold body text (bold rows, group header labels).
    pub fn bold_style(&self) -> TextStyle {
        self.style(
            self.typography.font_size_base,
            self.typography.font_weight_bold,
        )
    }

    /// Italic body text.
    pub fn italic_style(&self) -> TextStyle {
        self.body_style().with_style(FontStyle::Italic)
    }

    /// Column headers: scaled body size, bold.
    pub fn header_style(&self) -> TextStyle {
        let t = &self.typography;
        self.style(t.font_size_base * t.header_font_scale, t.font_weight_bold)
    }

    /// Small text (group counts, tick labels, footnotes).
    pub fn small_style(&self) -> TextStyle {
        self.style(
            self.typography.font_size_sm,
            self.typography.font_weight_normal,
        )
    }

    /// Subtitle and axis label.
    pub fn large_style(&self) -> TextStyle {
        self.style(
            self.typography.font_size_lg,
            self.typography.font_weight_normal,
        )
    }

    /// Title.
    pub fn title_style(&self) -> TextStyle {
        self.style(
            self.typography.font_size_title,
            self.typography.font_weight_bold,
        )
    }
}

/// Partial color overrides.
#[derive(Clone, Debug, Default, PartialEq)]
#[allow(missing_docs, reason = "fields mirror `ThemeColors`")]
pub struct ColorOverrides {
    pub background: Option<Color>,
    pub foreground: Option<Color>,
    pub muted: Option<Color>,
    pub border: Option<Color>,
    pub interval: Option<Color>,
    pub summary: Option<Color>,
    pub null_line: Option<Color>,
    pub reference_line: Option<Color>,
    pub row_band: Option<Color>,
    pub group_header: Option<Color>,
}

/// Partial typography overrides.
#[derive(Clone, Debug, Default, PartialEq)]
#[allow(missing_docs, reason = "fields mirror `ThemeTypography`")]
pub struct TypographyOverrides {
    pub font_family: Option<String>,
    pub font_size_sm: Option<f64>,
    pub font_size_base: Option<f64>,
    pub font_size_lg: Option<f64>,
    pub font_size_title: Option<f64>,
    pub header_font_scale: Option<f64>,
    pub font_weight_normal: Option<u16>,
    pub font_weight_bold: Option<u16>,
    pub line_height: Option<f64>,
}

/// Partial spacing overrides.
#[derive(Clone, Debug, Default, PartialEq)]
#[allow(missing_docs, reason = "fields mirror `ThemeSpacing`")]
pub struct SpacingOverrides {
    pub row_height: Option<f64>,
    pub header_height: Option<f64>,
    pub padding: Option<f64>,
    pub cell_padding_x: Option<f64>,
    pub cell_padding_y: Option<f64>,
    pub column_gap: Option<f64>,
    pub indent_per_level: Option<f64>,
    pub group_header_padding: Option<f64>,
    pub axis_gap: Option<f64>,
    pub text_gap: Option<f64>,
    pub section_gap: Option<f64>,
}

/// Partial shape overrides.
#[derive(Clone, Debug, Default, PartialEq)]
#[allow(missing_docs, reason = "fields mirror `ThemeShapes`")]
pub struct ShapeOverrides {
    pub point_size: Option<f64>,
    pub summary_height: Option<f64>,
    pub line_width: Option<f64>,
    pub whisker_height: Option<f64>,
    pub border_radius: Option<f64>,
}

/// A partial theme. `None` keeps the base value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ThemeOverrides {
    /// Color overrides.
    pub colors: ColorOverrides,
    /// Typography overrides.
    pub typography: TypographyOverrides,
    /// Spacing overrides.
    pub spacing: SpacingOverrides,
    /// Shape overrides.
    pub shapes: ShapeOverrides,
    /// Replacement axis policy.
    pub axis: Option<AxisConfig>,
}

macro_rules! merge_fields {
    ($base:expr, $over:expr; $($field:ident),* $(,)?) => {
        $(
            if let Some(v) = &$over.$field {
                $base.$field = v.clone();
            }
        )*
    };
}

/// Applies `overrides` on top of `base`.
pub fn merge_theme(base: &Theme, overrides: &ThemeOverrides) -> Theme {
    let mut out = base.clone();
    let c = &overrides.colors;
    merge_fields!(out.colors, c;
        background, foreground, muted, border, interval, summary,
        null_line, reference_line, row_band, group_header,
    );
    let t = &overrides.typography;
    merge_fields!(out.typography, t;
        font_family, font_size_sm, font_size_base, font_size_lg, font_size_title,
        header_font_scale, font_weight_normal, font_weight_bold, line_height,
    );
    let s = &overrides.spacing;
    merge_fields!(out.spacing, s;
        row_height, header_height, padding, cell_padding_x, cell_padding_y,
        column_gap, indent_per_level, group_header_padding, axis_gap, text_gap,
        section_gap,
    );
    let sh = &overrides.shapes;
    merge_fields!(out.shapes, sh;
        point_size, summary_height, line_width, whisker_height, border_radius,
    );
    if let Some(axis) = &overrides.axis {
        out.axis = axis.clone();
    }
    out
}

/// Named themes, expressed as overrides of the default theme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum ThemePreset {
    /// The default theme.
    #[default]
    Default,
    /// Journal style: serif type, navy marks, compact rows.
    Lancet,
    /// Journal style: black marks, tight spacing.
    Jama,
    /// Muted greys, thin lines.
    Minimal,
    /// Light text on a dark background.
    Dark,
    /// Large type for slides.
    Presentation,
}

impl ThemePreset {
    /// Every preset, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Default,
        Self::Lancet,
        Self::Jama,
        Self::Minimal,
        Self::Dark,
        Self::Presentation,
    ];

    /// The overrides this preset applies to the default theme.
    pub fn overrides(self) -> ThemeOverrides {
        match self {
            Self::Default => ThemeOverrides::default(),
            Self::Lancet => ThemeOverrides {
                colors: ColorOverrides {
                    interval: Some(Color::from_rgb8(0x00, 0x40, 0x7a)),
                    summary: Some(Color::from_rgb8(0x00, 0x2a, 0x50)),
                    row_band: Some(Color::from_rgb8(0xf4, 0xf6, 0xf9)),
                    ..ColorOverrides::default()
                },
                typography: TypographyOverrides {
                    font_family: Some(String::from("Georgia, 'Times New Roman', serif")),
                    font_size_base: Some(13.0),
                    ..TypographyOverrides::default()
                },
                spacing: SpacingOverrides {
                    row_height: Some(24.0),
                    ..SpacingOverrides::default()
                },
                ..ThemeOverrides::default()
            },
            Self::Jama => ThemeOverrides {
                colors: ColorOverrides {
                    interval: Some(Color::BLACK),
                    summary: Some(Color::BLACK),
                    row_band: Some(Color::WHITE),
                    ..ColorOverrides::default()
                },
                typography: TypographyOverrides {
                    font_family: Some(String::from("Arial, Helvetica, sans-serif")),
                    font_size_base: Some(12.0),
                    font_size_sm: Some(10.0),
                    ..TypographyOverrides::default()
                },
                spacing: SpacingOverrides {
                    row_height: Some(22.0),
                    header_height: Some(30.0),
                    cell_padding_x: Some(6.0),
                    ..SpacingOverrides::default()
                },
                shapes: ShapeOverrides {
                    point_size: Some(6.0),
                    line_width: Some(1.0),
                    ..ShapeOverrides::default()
                },
                ..ThemeOverrides::default()
            },
            Self::Minimal => ThemeOverrides {
                colors: ColorOverrides {
                    interval: Some(Color::from_rgb8(0x37, 0x41, 0x51)),
                    summary: Some(Color::from_rgb8(0x11, 0x18, 0x27)),
                    border: Some(Color::from_rgb8(0xe5, 0xe7, 0xeb)),
                    row_band: Some(Color::WHITE),
                    group_header: Some(Color::WHITE),
                    ..ColorOverrides::default()
                },
                shapes: ShapeOverrides {
                    line_width: Some(1.0),
                    whisker_height: Some(0.0),
                    ..ShapeOverrides::default()
                },
                ..ThemeOverrides::default()
            },
            Self::Dark => ThemeOverrides {
                colors: ColorOverrides {
                    background: Some(Color::from_rgb8(0x11, 0x18, 0x27)),
                    foreground: Some(Color::from_rgb8(0xf9, 0xfa, 0xfb)),
                    muted: Some(Color::from_rgb8(0x9c, 0xa3, 0xaf)),
                    border: Some(Color::from_rgb8(0x37, 0x41, 0x51)),
                    interval: Some(Color::from_rgb8(0x60, 0xa5, 0xfa)),
                    summary: Some(Color::from_rgb8(0x93, 0xc5, 0xfd)),
                    null_line: Some(Color::from_rgb8(0x6b, 0x72, 0x80)),
                    row_band: Some(Color::from_rgb8(0x1f, 0x29, 0x37)),
                    group_header: Some(Color::from_rgb8(0x1f, 0x29, 0x37)),
                    ..ColorOverrides::default()
                },
                ..ThemeOverrides::default()
            },
            Self::Presentation => ThemeOverrides {
                typography: TypographyOverrides {
                    font_size_sm: Some(14.0),
                    font_size_base: Some(18.0),
                    font_size_lg: Some(20.0),
                    font_size_title: Some(26.0),
                    ..TypographyOverrides::default()
                },
                spacing: SpacingOverrides {
                    row_height: Some(36.0),
                    header_height: Some(44.0),
                    padding: Some(20.0),
                    ..SpacingOverrides::default()
                },
                shapes: ShapeOverrides {
                    point_size: Some(11.0),
                    summary_height: Some(14.0),
                    line_width: Some(2.0),
                    whisker_height: Some(8.0),
                    ..ShapeOverrides::default()
                },
                ..ThemeOverrides::default()
            },
        }
    }

    /// The resolved theme.
    pub fn theme(self) -> Theme {
        merge_theme(&Theme::default(), &self.overrides())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_overrides_are_identity() {
        let base = Theme::default();
        assert_eq!(merge_theme(&base, &ThemeOverrides::default()), base);
        assert_eq!(ThemePreset::Default.theme(), base);
    }

    #[test]
    fn overrides_touch_only_named_tokens() {
        let base = Theme::default();
        let merged = merge_theme(
            &base,
            &ThemeOverrides {
                spacing: SpacingOverrides {
                    row_height: Some(40.0),
                    ..SpacingOverrides::default()
                },
                ..ThemeOverrides::default()
            },
        );
        assert_eq!(merged.spacing.row_height, 40.0);
        assert_eq!(merged.spacing.padding, base.spacing.padding);
        assert_eq!(merged.colors, base.colors);
    }

    #[test]
    fn presets_layer_on_the_default() {
        for preset in ThemePreset::ALL {
            let theme = preset.theme();
            assert!(theme.spacing.row_height > 0.0, "{preset:?}");
            assert_eq!(theme.axis, AxisConfig::default(), "{preset:?}");
        }
        let dark = ThemePreset::Dark.theme();
        assert_ne!(dark.colors.background, Theme::default().colors.background);
        assert_eq!(dark.spacing, Theme::default().spacing);
    }

    #[test]
    fn header_style_scales_body() {
        let theme = Theme::default();
        let h = theme.header_style();
        assert!(h.font_size > theme.body_style().font_size, "headers are larger");
        assert_eq!(h.font_weight, FontWeight(600));
    }
}
