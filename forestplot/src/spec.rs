// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Forest plot specification types.
//!
//! A [`ForestSpec`] is the fully-resolved input to the layout engine: rows and
//! their group tree, the effects to draw per row, table columns, annotations,
//! text blocks and the theme. Building one from tabular data (and validating it)
//! is the caller's job; every type here is plain data.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;
use peniko::Color;

use crate::axis::LineStyle;
use crate::column::ColumnDef;
use crate::symbol::Symbol;
use crate::theme::Theme;

/// Identity of a [`Group`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct GroupId(pub String);

impl GroupId {
    /// Creates a group id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for GroupId {
    fn from(value: &str) -> Self {
        Self(String::from(value))
    }
}

impl From<String> for GroupId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A metadata value attached to a row.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum FieldValue {
    /// Missing value.
    #[default]
    Null,
    /// A boolean.
    Bool(bool),
    /// A number.
    Number(f64),
    /// A string.
    Text(String),
    /// A numeric series (sparklines).
    Series(Vec<f64>),
}

impl FieldValue {
    /// Returns the value as a finite number, if it is one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) if v.is_finite() => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as text, if it is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// The structural role of a row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum RowKind {
    /// An ordinary study/estimate row.
    #[default]
    Data,
    /// A section header row (label only).
    Header,
    /// A pre-computed summary (drawn as a diamond).
    Summary,
    /// Vertical whitespace (half height).
    Spacer,
}

/// Per-row presentation tags.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct RowStyle {
    /// Structural role.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: RowKind,
    /// Bold label.
    pub bold: bool,
    /// Italic label.
    pub italic: bool,
    /// Extra indentation, in indent levels, on top of the group depth.
    pub indent: u32,
    /// Badge text drawn after the label.
    pub badge: Option<String>,
    /// Marker/label color override.
    #[cfg_attr(feature = "serde", serde(with = "crate::paint::serde_color::option"))]
    pub color: Option<Color>,
}

/// One row of the plot.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Row {
    /// Stable row identity.
    pub id: String,
    /// Text shown in the label column.
    pub label: String,
    /// Primary point estimate.
    #[cfg_attr(feature = "serde", serde(default))]
    pub point: Option<f64>,
    /// Primary lower interval bound.
    #[cfg_attr(feature = "serde", serde(default))]
    pub lower: Option<f64>,
    /// Primary upper interval bound.
    #[cfg_attr(feature = "serde", serde(default))]
    pub upper: Option<f64>,
    /// Owning group, if any.
    #[cfg_attr(feature = "serde", serde(default))]
    pub group: Option<GroupId>,
    /// Presentation tags.
    #[cfg_attr(feature = "serde", serde(default))]
    pub style: RowStyle,
    /// Field-keyed metadata used by columns and secondary effects.
    #[cfg_attr(feature = "serde", serde(default))]
    pub metadata: HashMap<String, FieldValue>,
}

impl Row {
    /// Creates a data row with a primary estimate.
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        point: Option<f64>,
        lower: Option<f64>,
        upper: Option<f64>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            point,
            lower,
            upper,
            group: None,
            style: RowStyle::default(),
            metadata: HashMap::new(),
        }
    }

    /// Creates a label-only row of the given kind.
    pub fn labelled(id: impl Into<String>, label: impl Into<String>, kind: RowKind) -> Self {
        let mut row = Self::new(id, label, None, None, None);
        row.style.kind = kind;
        row
    }

    /// Places the row in a group.
    pub fn in_group(mut self, group: impl Into<GroupId>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Sets the row kind.
    pub fn with_kind(mut self, kind: RowKind) -> Self {
        self.style.kind = kind;
        self
    }

    /// Sets a metadata field.
    pub fn with_field(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.metadata.insert(name.into(), value);
        self
    }

    /// The row's structural role.
    pub fn kind(&self) -> RowKind {
        self.style.kind
    }

    /// Returns a finite numeric value for `field`.
    pub fn number(&self, field: &FieldRef, bound: Bound) -> Option<f64> {
        let v = match field {
            FieldRef::Primary => match bound {
                Bound::Point => self.point,
                Bound::Lower => self.lower,
                Bound::Upper => self.upper,
            },
            FieldRef::Metadata(name) => self.metadata.get(name.as_str())?.as_f64(),
        };
        v.filter(|v| v.is_finite())
    }

    /// Looks up a column field: metadata first, then the built-in names
    /// `label`, `point`, `lower` and `upper`.
    pub fn field(&self, name: &str) -> FieldValue {
        if let Some(v) = self.metadata.get(name) {
            return v.clone();
        }
        let num = |v: Option<f64>| v.map_or(FieldValue::Null, FieldValue::Number);
        match name {
            "label" => FieldValue::Text(self.label.clone()),
            "point" | "estimate" => num(self.point),
            "lower" => num(self.lower),
            "upper" => num(self.upper),
            _ => FieldValue::Null,
        }
    }
}

/// Which of the three interval values to read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Bound {
    /// The point estimate.
    Point,
    /// The lower bound.
    Lower,
    /// The upper bound.
    Upper,
}

/// Where an effect reads a value from.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "Option<String>", into = "Option<String>")
)]
pub enum FieldRef {
    /// The row's own `point`/`lower`/`upper`.
    #[default]
    Primary,
    /// A numeric metadata field.
    Metadata(String),
}

impl From<Option<String>> for FieldRef {
    fn from(value: Option<String>) -> Self {
        match value {
            None => Self::Primary,
            Some(name) => Self::Metadata(name),
        }
    }
}

impl From<FieldRef> for Option<String> {
    fn from(value: FieldRef) -> Self {
        match value {
            FieldRef::Primary => None,
            FieldRef::Metadata(name) => Some(name),
        }
    }
}

/// Point/lower/upper values of one effect on one row.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Estimate {
    /// Point estimate.
    pub point: Option<f64>,
    /// Lower bound.
    pub lower: Option<f64>,
    /// Upper bound.
    pub upper: Option<f64>,
}

/// An interval series drawn on the forest axis.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct Effect {
    /// Effect identity.
    pub id: String,
    /// Legend label.
    pub label: Option<String>,
    /// Point estimate source.
    pub point: FieldRef,
    /// Lower bound source.
    pub lower: FieldRef,
    /// Upper bound source.
    pub upper: FieldRef,
    /// Marker/line color override.
    #[cfg_attr(feature = "serde", serde(with = "crate::paint::serde_color::option"))]
    pub color: Option<Color>,
    /// Marker shape override.
    pub shape: Option<Symbol>,
    /// Opacity override in `[0, 1]`.
    pub opacity: Option<f64>,
}

impl Effect {
    /// The implicit effect reading the row's primary fields.
    pub fn primary() -> Self {
        Self {
            id: String::from("primary"),
            ..Self::default()
        }
    }

    /// An effect reading three metadata fields.
    pub fn from_fields(
        id: impl Into<String>,
        point: impl Into<String>,
        lower: impl Into<String>,
        upper: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            point: FieldRef::Metadata(point.into()),
            lower: FieldRef::Metadata(lower.into()),
            upper: FieldRef::Metadata(upper.into()),
            ..Self::default()
        }
    }

    /// Reads this effect's values from `row`.
    pub fn estimate(&self, row: &Row) -> Estimate {
        Estimate {
            point: row.number(&self.point, Bound::Point),
            lower: row.number(&self.lower, Bound::Lower),
            upper: row.number(&self.upper, Bound::Upper),
        }
    }
}

/// A node of the row group tree.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Group {
    /// Group identity.
    pub id: GroupId,
    /// Header text.
    pub label: String,
    /// Parent group, `None` for roots.
    #[cfg_attr(feature = "serde", serde(default))]
    pub parent: Option<GroupId>,
    /// Initially collapsed.
    #[cfg_attr(feature = "serde", serde(default))]
    pub collapsed: bool,
}

impl Group {
    /// Creates a root group.
    pub fn new(id: impl Into<GroupId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            parent: None,
            collapsed: false,
        }
    }

    /// Sets the parent group.
    pub fn with_parent(mut self, parent: impl Into<GroupId>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Marks the group as collapsed.
    pub fn collapsed(mut self) -> Self {
        self.collapsed = true;
        self
    }
}

/// Axis scale kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum ScaleKind {
    /// Linear (differences, mean differences).
    #[default]
    Linear,
    /// Logarithmic (ratios).
    Log,
}

impl ScaleKind {
    /// The conventional "no effect" value for this scale.
    pub fn default_null_value(self) -> f64 {
        match self {
            Self::Linear => 0.0,
            Self::Log => 1.0,
        }
    }
}

/// Row data and estimate configuration.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct ForestData {
    /// Rows in input order.
    pub rows: Vec<Row>,
    /// Group table.
    #[cfg_attr(feature = "serde", serde(default))]
    pub groups: Vec<Group>,
    /// Effects drawn per row; empty means one primary effect.
    #[cfg_attr(feature = "serde", serde(default))]
    pub effects: Vec<Effect>,
    /// Pooled summary drawn below all rows.
    #[cfg_attr(feature = "serde", serde(default))]
    pub overall_summary: Option<Row>,
    /// Axis scale kind.
    #[cfg_attr(feature = "serde", serde(default))]
    pub scale: ScaleKind,
    /// The "no effect" value; defaults per scale kind.
    #[cfg_attr(feature = "serde", serde(default))]
    pub null_value: Option<f64>,
}

impl ForestData {
    /// Resolved null value.
    pub fn null_value(&self) -> f64 {
        self.null_value
            .filter(|v| v.is_finite())
            .unwrap_or_else(|| self.scale.default_null_value())
    }

    /// Effects to draw; one primary effect when none are configured.
    pub fn effects(&self) -> Vec<Effect> {
        if self.effects.is_empty() {
            alloc::vec![Effect::primary()]
        } else {
            self.effects.clone()
        }
    }
}

/// Text blocks around the plot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct Labels {
    /// Title above the table.
    pub title: Option<String>,
    /// Subtitle below the title.
    pub subtitle: Option<String>,
    /// Caption below the axis.
    pub caption: Option<String>,
    /// Footnote below the caption.
    pub footnote: Option<String>,
    /// Axis label below the tick labels.
    pub axis_label: Option<String>,
}

/// Plot-level layout knobs.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct LayoutConfig {
    /// Header of the label column.
    pub label_header: String,
    /// Header of the forest plot column.
    pub plot_header: String,
    /// Fixed forest plot width; fills the remaining space when `None`.
    pub plot_width: Option<f64>,
    /// Requested document width when the caller gives none.
    pub width: f64,
    /// Alternate row background banding.
    pub banding: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            label_header: String::from("Study"),
            plot_header: String::new(),
            plot_width: None,
            width: 800.0,
            banding: true,
        }
    }
}

/// A plot annotation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "AnnotationRepr", into = "AnnotationRepr")
)]
pub enum Annotation {
    /// A vertical reference line at `x`.
    ReferenceLine {
        /// Axis value.
        x: f64,
        /// Optional label drawn at the top of the line.
        label: Option<String>,
        /// Stroke pattern.
        style: LineStyle,
        /// Color override.
        color: Option<Color>,
    },
    /// An annotation type this engine does not know. Skipped with a warning.
    Unknown(String),
}

#[cfg(feature = "serde")]
#[derive(Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotationRepr {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    x: Option<f64>,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    style: LineStyle,
    #[serde(default, with = "crate::paint::serde_color::option")]
    color: Option<Color>,
}

#[cfg(feature = "serde")]
impl From<AnnotationRepr> for Annotation {
    fn from(repr: AnnotationRepr) -> Self {
        match (repr.kind.as_str(), repr.x) {
            ("refline" | "referenceLine", Some(x)) => Self::ReferenceLine {
                x,
                label: repr.label,
                style: repr.style,
                color: repr.color,
            },
            _ => Self::Unknown(repr.kind),
        }
    }
}

#[cfg(feature = "serde")]
impl From<Annotation> for AnnotationRepr {
    fn from(a: Annotation) -> Self {
        match a {
            Annotation::ReferenceLine {
                x,
                label,
                style,
                color,
            } => Self {
                kind: String::from("refline"),
                x: Some(x),
                label,
                style,
                color,
            },
            Annotation::Unknown(kind) => Self {
                kind,
                x: None,
                label: None,
                style: LineStyle::default(),
                color: None,
            },
        }
    }
}

/// The complete input to the layout engine.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct ForestSpec {
    /// Rows, groups, effects and scale.
    pub data: ForestData,
    /// Table columns (leaves and groups), in display order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub columns: Vec<ColumnDef>,
    /// Reference lines and other annotations.
    #[cfg_attr(feature = "serde", serde(default))]
    pub annotations: Vec<Annotation>,
    /// Title, caption and axis label text.
    #[cfg_attr(feature = "serde", serde(default))]
    pub labels: Labels,
    /// Layout knobs.
    #[cfg_attr(feature = "serde", serde(default))]
    pub layout: LayoutConfig,
    /// Theme tokens.
    pub theme: Theme,
}

impl ForestSpec {
    /// Creates a spec with default theme and no columns.
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            data: ForestData {
                rows,
                ..ForestData::default()
            },
            ..Self::default()
        }
    }

    /// Sets the scale kind.
    pub fn with_scale(mut self, scale: ScaleKind) -> Self {
        self.data.scale = scale;
        self
    }

    /// Sets the null value.
    pub fn with_null_value(mut self, null_value: f64) -> Self {
        self.data.null_value = Some(null_value);
        self
    }

    /// Sets the group table.
    pub fn with_groups(mut self, groups: Vec<Group>) -> Self {
        self.data.groups = groups;
        self
    }

    /// Sets the columns.
    pub fn with_columns(mut self, columns: Vec<ColumnDef>) -> Self {
        self.columns = columns;
        self
    }

    /// Sets the theme.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Sets the pooled summary row.
    pub fn with_overall_summary(mut self, summary: Row) -> Self {
        self.data.overall_summary = Some(summary);
        self
    }
}
