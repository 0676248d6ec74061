// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Table columns.
//!
//! Columns are leaves ([`ColumnSpec`]) or header groups ([`ColumnGroup`]) that
//! span their children. Every leaf has a [`ColumnKind`] that decides how a cell
//! is turned into display text (which is also what auto-width measurement
//! measures) and how narrow the column may become.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use crate::format;
use crate::spec::{FieldValue, Row};

/// Declared column width.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ColumnWidth {
    /// Fixed width in pixels.
    Fixed(f64),
    /// Sized from header and content.
    Auto,
}

/// Which side of the forest plot a column sits on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum ColumnPosition {
    /// Between the label column and the plot.
    #[default]
    Left,
    /// After the plot.
    Right,
}

/// Horizontal text alignment within a cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Align {
    /// Start-aligned.
    #[default]
    Left,
    /// Centered.
    Center,
    /// End-aligned.
    Right,
}

/// How a column renders its cells.
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnKind {
    /// Plain text.
    Text,
    /// A number.
    Numeric {
        /// Fixed decimals; integers print bare and others with 2 decimals when `None`.
        decimals: Option<u8>,
        /// Group thousands with `,`.
        thousands: bool,
    },
    /// A percentage.
    Percent {
        /// Decimals after the point.
        decimals: u8,
        /// Multiply the value by 100 first (value is a proportion).
        scale_100: bool,
    },
    /// The row's primary estimate as `point (lower, upper)`.
    Interval {
        /// Decimals for all three numbers.
        decimals: u8,
        /// Separator between the bounds.
        separator: String,
    },
    /// A p-value, printed as `<floor` below the display floor.
    PValue {
        /// Decimals after the point.
        decimals: u8,
    },
    /// Events over a total, as `events/total`.
    Events {
        /// Metadata field holding the total.
        total_field: String,
    },
    /// A horizontal bar with its value.
    Bar {
        /// Value mapped to a full-width bar; the column maximum when `None`.
        max: Option<f64>,
    },
    /// A small line chart of a numeric series.
    Sparkline,
    /// Text inside a pill.
    Badge,
    /// A short glyph or emoji.
    Icon,
    /// A star rating.
    Stars {
        /// Number of stars.
        max: u8,
    },
    /// An image referenced by URL.
    Image,
    /// A `low – high` range from two fields.
    Range {
        /// Metadata field holding the upper end (the column field holds the lower end).
        upper_field: String,
    },
    /// A type this engine does not know. Skipped with a warning.
    Unknown(String),
}

/// Width of one star glyph in a [`ColumnKind::Stars`] column.
pub const STAR_WIDTH: f64 = 14.0;

impl ColumnKind {
    /// Default numeric formatting.
    pub fn numeric() -> Self {
        Self::Numeric {
            decimals: None,
            thousands: true,
        }
    }

    /// Default interval formatting.
    pub fn interval() -> Self {
        Self::Interval {
            decimals: 2,
            separator: String::from(", "),
        }
    }

    /// The type name used in serialized specs.
    pub fn name(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Numeric { .. } => "numeric",
            Self::Percent { .. } => "percent",
            Self::Interval { .. } => "interval",
            Self::PValue { .. } => "pvalue",
            Self::Events { .. } => "events",
            Self::Bar { .. } => "bar",
            Self::Sparkline => "sparkline",
            Self::Badge => "badge",
            Self::Icon => "icon",
            Self::Stars { .. } => "stars",
            Self::Image => "image",
            Self::Range { .. } => "range",
            Self::Unknown(name) => name,
        }
    }

    /// The smallest practical width for this kind, in pixels.
    ///
    /// Visual kinds need room for their graphic even when their text is short.
    pub fn min_width(&self) -> f64 {
        match self {
            Self::Text | Self::Numeric { .. } => 40.0,
            Self::Percent { .. } => 48.0,
            Self::Interval { .. } => 90.0,
            Self::PValue { .. } | Self::Events { .. } | Self::Badge => 56.0,
            Self::Bar { .. } | Self::Sparkline => 80.0,
            Self::Icon => 32.0,
            Self::Stars { max } => STAR_WIDTH * f64::from(*max) + 8.0,
            Self::Image => 48.0,
            Self::Range { .. } => 72.0,
            Self::Unknown(_) => 0.0,
        }
    }

    /// Formats the cell of `column` for `row`.
    ///
    /// Returns the empty string for missing values and for purely graphical kinds.
    pub fn format(&self, row: &Row, column: &ColumnSpec) -> String {
        let value = row.field(&column.field);
        match self {
            Self::Text | Self::Badge | Self::Icon => match value {
                FieldValue::Null | FieldValue::Series(_) => String::new(),
                FieldValue::Text(s) => s,
                FieldValue::Bool(b) => String::from(if b { "Yes" } else { "No" }),
                FieldValue::Number(v) => format::format_number(v, None, false),
            },
            Self::Numeric {
                decimals,
                thousands,
            } => value
                .as_f64()
                .map(|v| format::format_number(v, *decimals, *thousands))
                .unwrap_or_default(),
            Self::Percent {
                decimals,
                scale_100,
            } => value
                .as_f64()
                .map(|v| format::format_percent(v, *decimals, *scale_100))
                .unwrap_or_default(),
            Self::Interval {
                decimals,
                separator,
            } => format::format_interval(row.point, row.lower, row.upper, *decimals, separator),
            Self::PValue { decimals } => value
                .as_f64()
                .map(|v| format::format_pvalue(v, *decimals))
                .unwrap_or_default(),
            Self::Events { total_field } => {
                match (value.as_f64(), row.field(total_field).as_f64()) {
                    (Some(e), Some(t)) => format::format_events(e, t),
                    (Some(e), None) => format::format_number(e, None, true),
                    _ => String::new(),
                }
            }
            Self::Bar { .. } => value
                .as_f64()
                .map(|v| format::format_number(v, Some(1), true))
                .unwrap_or_default(),
            Self::Range { upper_field } => {
                match (value.as_f64(), row.field(upper_field).as_f64()) {
                    (Some(lo), Some(hi)) => format::format_range(lo, hi),
                    _ => String::new(),
                }
            }
            Self::Sparkline | Self::Stars { .. } | Self::Image | Self::Unknown(_) => String::new(),
        }
    }
}

/// A leaf column.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "ColumnRepr", into = "ColumnRepr")
)]
pub struct ColumnSpec {
    /// Column identity (also the key for width overrides).
    pub id: String,
    /// Header text.
    pub header: String,
    /// Row field the cells read.
    pub field: String,
    /// Rendering kind.
    pub kind: ColumnKind,
    /// Declared width; `None` behaves like [`ColumnWidth::Auto`].
    pub width: Option<ColumnWidth>,
    /// Side of the plot.
    pub position: ColumnPosition,
    /// Cell alignment.
    pub align: Align,
}

impl ColumnSpec {
    /// Creates an auto-width, left-positioned column.
    pub fn new(
        id: impl Into<String>,
        header: impl Into<String>,
        field: impl Into<String>,
        kind: ColumnKind,
    ) -> Self {
        let align = match kind {
            ColumnKind::Text | ColumnKind::Badge | ColumnKind::Unknown(_) => Align::Left,
            ColumnKind::Icon | ColumnKind::Stars { .. } | ColumnKind::Image => Align::Center,
            _ => Align::Right,
        };
        Self {
            id: id.into(),
            header: header.into(),
            field: field.into(),
            kind,
            width: None,
            position: ColumnPosition::Left,
            align,
        }
    }

    /// Sets a fixed width.
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(ColumnWidth::Fixed(width));
        self
    }

    /// Requests auto width explicitly.
    pub fn with_auto_width(mut self) -> Self {
        self.width = Some(ColumnWidth::Auto);
        self
    }

    /// Places the column on the given side.
    pub fn with_position(mut self, position: ColumnPosition) -> Self {
        self.position = position;
        self
    }

    /// Sets the cell alignment.
    pub fn with_align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    /// The declared fixed width, if any.
    pub fn fixed_width(&self) -> Option<f64> {
        match self.width {
            Some(ColumnWidth::Fixed(w)) if w.is_finite() && w >= 0.0 => Some(w),
            _ => None,
        }
    }

    /// Display text for `row`.
    pub fn cell_text(&self, row: &Row) -> String {
        self.kind.format(row, self)
    }
}

/// A header spanning several columns.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct ColumnGroup {
    /// Group identity.
    pub id: String,
    /// Header text.
    pub header: String,
    /// Children, in display order.
    pub children: Vec<ColumnDef>,
    /// Side of the plot (applies to every leaf).
    #[cfg_attr(feature = "serde", serde(default))]
    pub position: ColumnPosition,
}

impl ColumnGroup {
    /// Creates a left-positioned group.
    pub fn new(id: impl Into<String>, header: impl Into<String>, children: Vec<ColumnDef>) -> Self {
        Self {
            id: id.into(),
            header: header.into(),
            children,
            position: ColumnPosition::Left,
        }
    }

    /// Places the group on the given side.
    pub fn with_position(mut self, position: ColumnPosition) -> Self {
        self.position = position;
        self
    }
}

/// A column tree node.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum ColumnDef {
    /// A header group.
    Group(ColumnGroup),
    /// A leaf column.
    Column(ColumnSpec),
}

impl From<ColumnSpec> for ColumnDef {
    fn from(value: ColumnSpec) -> Self {
        Self::Column(value)
    }
}

impl From<ColumnGroup> for ColumnDef {
    fn from(value: ColumnGroup) -> Self {
        Self::Group(value)
    }
}

impl ColumnDef {
    /// Node identity.
    pub fn id(&self) -> &str {
        match self {
            Self::Group(g) => &g.id,
            Self::Column(c) => &c.id,
        }
    }

    /// Side of the plot.
    pub fn position(&self) -> ColumnPosition {
        match self {
            Self::Group(g) => g.position,
            Self::Column(c) => c.position,
        }
    }

    /// Depth-first leaves of this node.
    pub fn leaves(&self) -> Vec<&ColumnSpec> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a ColumnSpec>) {
        match self {
            Self::Column(c) => out.push(c),
            Self::Group(g) => {
                for child in &g.children {
                    child.collect_leaves(out);
                }
            }
        }
    }
}

/// Leaves of a column list on one side of the plot, in display order.
///
/// Leaves of a group take the group's position.
pub fn leaves_at(columns: &[ColumnDef], position: ColumnPosition) -> Vec<&ColumnSpec> {
    columns
        .iter()
        .filter(|c| c.position() == position)
        .flat_map(ColumnDef::leaves)
        .collect()
}

/// Whether any column group exists (two-tier header).
pub fn has_groups(columns: &[ColumnDef]) -> bool {
    columns.iter().any(|c| matches!(c, ColumnDef::Group(_)))
}

#[cfg(feature = "serde")]
#[derive(Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct ColumnRepr {
    id: String,
    #[serde(default)]
    header: String,
    field: String,
    #[serde(rename = "type", default = "ColumnRepr::default_type")]
    kind: String,
    #[serde(default)]
    options: ColumnOptions,
    #[serde(default)]
    width: Option<WidthRepr>,
    #[serde(default)]
    position: ColumnPosition,
    #[serde(default)]
    align: Option<Align>,
}

#[cfg(feature = "serde")]
impl ColumnRepr {
    fn default_type() -> String {
        String::from("text")
    }
}

#[cfg(feature = "serde")]
#[derive(Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ColumnOptions {
    decimals: Option<u8>,
    thousands: Option<bool>,
    scale100: Option<bool>,
    separator: Option<String>,
    total_field: Option<String>,
    upper_field: Option<String>,
    max: Option<f64>,
}

#[cfg(feature = "serde")]
#[derive(Clone, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
enum WidthRepr {
    Px(f64),
    Keyword(String),
}

#[cfg(feature = "serde")]
impl From<ColumnRepr> for ColumnSpec {
    fn from(repr: ColumnRepr) -> Self {
        let o = repr.options;
        let kind = match repr.kind.as_str() {
            "text" => ColumnKind::Text,
            "numeric" | "number" => ColumnKind::Numeric {
                decimals: o.decimals,
                thousands: o.thousands.unwrap_or(true),
            },
            "percent" => ColumnKind::Percent {
                decimals: o.decimals.unwrap_or(1),
                scale_100: o.scale100.unwrap_or(true),
            },
            "interval" => ColumnKind::Interval {
                decimals: o.decimals.unwrap_or(2),
                separator: o.separator.unwrap_or_else(|| String::from(", ")),
            },
            "pvalue" => ColumnKind::PValue {
                decimals: o.decimals.unwrap_or(3),
            },
            "events" => ColumnKind::Events {
                total_field: o.total_field.unwrap_or_default(),
            },
            "bar" => ColumnKind::Bar { max: o.max },
            "sparkline" => ColumnKind::Sparkline,
            "badge" => ColumnKind::Badge,
            "icon" => ColumnKind::Icon,
            "stars" => ColumnKind::Stars {
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "clamped to 1..=10 before the cast"
                )]
                max: o.max.map_or(5, |m| m.clamp(1.0, 10.0) as u8),
            },
            "image" => ColumnKind::Image,
            "range" => ColumnKind::Range {
                upper_field: o.upper_field.unwrap_or_default(),
            },
            other => ColumnKind::Unknown(String::from(other)),
        };
        let mut spec = Self::new(repr.id, repr.header, repr.field, kind);
        spec.width = repr.width.map(|w| match w {
            WidthRepr::Px(px) => ColumnWidth::Fixed(px),
            WidthRepr::Keyword(_) => ColumnWidth::Auto,
        });
        spec.position = repr.position;
        if let Some(align) = repr.align {
            spec.align = align;
        }
        spec
    }
}

#[cfg(feature = "serde")]
impl From<ColumnSpec> for ColumnRepr {
    fn from(spec: ColumnSpec) -> Self {
        let mut options = ColumnOptions::default();
        match &spec.kind {
            ColumnKind::Numeric {
                decimals,
                thousands,
            } => {
                options.decimals = *decimals;
                options.thousands = Some(*thousands);
            }
            ColumnKind::Percent {
                decimals,
                scale_100,
            } => {
                options.decimals = Some(*decimals);
                options.scale100 = Some(*scale_100);
            }
            ColumnKind::Interval {
                decimals,
                separator,
            } => {
                options.decimals = Some(*decimals);
                options.separator = Some(separator.clone());
            }
            ColumnKind::PValue { decimals } => options.decimals = Some(*decimals),
            ColumnKind::Events { total_field } => options.total_field = Some(total_field.clone()),
            ColumnKind::Bar { max } => options.max = *max,
            ColumnKind::Stars { max } => options.max = Some(f64::from(*max)),
            ColumnKind::Range { upper_field } => options.upper_field = Some(upper_field.clone()),
            ColumnKind::Text
            | ColumnKind::Sparkline
            | ColumnKind::Badge
            | ColumnKind::Icon
            | ColumnKind::Image
            | ColumnKind::Unknown(_) => {}
        }
        Self {
            kind: String::from(spec.kind.name()),
            id: spec.id,
            header: spec.header,
            field: spec.field,
            options,
            width: spec.width.map(|w| match w {
                ColumnWidth::Fixed(px) => WidthRepr::Px(px),
                ColumnWidth::Auto => WidthRepr::Keyword(String::from("auto")),
            }),
            position: spec.position,
            align: Some(spec.align),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    fn row() -> Row {
        Row::new("s1", "Smith 2019", Some(0.8), Some(0.7), Some(0.91))
            .with_field("n", FieldValue::Number(1234.0))
            .with_field("events", FieldValue::Number(12.0))
            .with_field("total", FieldValue::Number(100.0))
            .with_field("p", FieldValue::Number(0.0004))
    }

    #[test]
    fn kinds_format_their_cells() {
        let r = row();
        let n = ColumnSpec::new("n", "N", "n", ColumnKind::numeric());
        assert_eq!(n.cell_text(&r), "1,234");
        let ci = ColumnSpec::new("ci", "OR (95% CI)", "", ColumnKind::interval());
        assert_eq!(ci.cell_text(&r), "0.80 (0.70, 0.91)");
        let p = ColumnSpec::new("p", "P", "p", ColumnKind::PValue { decimals: 3 });
        assert_eq!(p.cell_text(&r), "<0.001");
        let ev = ColumnSpec::new(
            "ev",
            "Events",
            "events",
            ColumnKind::Events {
                total_field: String::from("total"),
            },
        );
        assert_eq!(ev.cell_text(&r), "12/100");
    }

    #[test]
    fn missing_values_format_empty() {
        let r = Row::new("x", "X", None, None, None);
        let n = ColumnSpec::new("n", "N", "n", ColumnKind::numeric());
        assert_eq!(n.cell_text(&r), "");
        let ci = ColumnSpec::new("ci", "CI", "", ColumnKind::interval());
        assert_eq!(ci.cell_text(&r), "");
    }

    #[test]
    fn group_leaves_take_the_group_position() {
        let cols = vec![
            ColumnDef::from(ColumnSpec::new("a", "A", "a", ColumnKind::Text)),
            ColumnDef::from(
                ColumnGroup::new(
                    "g",
                    "Treatment",
                    vec![
                        ColumnSpec::new("b", "B", "b", ColumnKind::Text)
                            .with_position(ColumnPosition::Left)
                            .into(),
                        ColumnSpec::new("c", "C", "c", ColumnKind::Text).into(),
                    ],
                )
                .with_position(ColumnPosition::Right),
            ),
        ];
        let right: Vec<_> = leaves_at(&cols, ColumnPosition::Right)
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(right, ["b", "c"]);
        assert!(has_groups(&cols), "nested group detected");
    }

    #[test]
    fn visual_kinds_have_larger_minimums() {
        assert!(ColumnKind::Sparkline.min_width() > ColumnKind::Text.min_width(), "rich cells need room");
        assert!(ColumnKind::Stars { max: 5 }.min_width() > ColumnKind::Text.min_width(), "rich cells need room");
        assert!(ColumnKind::Bar { max: None }.min_width() > ColumnKind::Text.min_width(), "rich cells need room");
    }
}
