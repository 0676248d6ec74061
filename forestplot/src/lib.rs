// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared layout and axis-scaling engine for forest plots.
//!
//! A forest plot is a table of rows, each pairing a label and tabular columns
//! with a point estimate and interval drawn against one shared x axis. This
//! crate turns a fully resolved [`ForestSpec`] into pixel geometry that an
//! interactive view and a static exporter consume identically:
//!
//! - **Domain and ticks**: [`calculate_domain`], [`nice_domain`] and
//!   [`generate_ticks`] pick the x range and its labelled ticks.
//! - **Column widths**: [`measure_columns`] and [`label_width`] size the
//!   table from measured text ([`TextMeasurer`]).
//! - **Display rows**: [`build_display_rows`] flattens the group hierarchy.
//! - **Clipping**: [`resolve_row`] decides whisker caps, truncation arrows and
//!   marker positions.
//!
//! [`compute_layout`] composes all of these into an immutable [`Layout`], and
//! [`PlotStore`] owns the inputs and republishes a [`PlotContext`] whenever
//! they change.
//!
//! Drawing is out of scope here; see `forestplot_svg` for the static exporter.

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod axis;
mod clip;
mod column;
mod domain;
mod error;
#[cfg(not(feature = "std"))]
mod float;
mod format;
mod group;
mod layout;
mod nice;
mod paint;
mod rows;
mod scale;
#[cfg(test)]
mod scenario_tests;
mod spec;
mod store;
mod symbol;
mod theme;
mod ticks;
mod widths;

pub use axis::{
    AxisConfig, DEFAULT_AXIS_PADDING, DEFAULT_CI_TRUNCATION_THRESHOLD, DEFAULT_MIN_TICK_SPACING,
    LineStyle, Symmetric,
};
pub use clip::{
    ARROW_HALF_HEIGHT_RATIO, ARROW_LENGTH_PER_LINE_WIDTH, ArrowDirection, BoundCap, ClipContext,
    IntervalGeometry, MIN_ARROW_LENGTH, arrow_length, arrow_path, effect_offsets, resolve_row,
};
pub use column::{
    Align, ColumnDef, ColumnGroup, ColumnKind, ColumnPosition, ColumnSpec, ColumnWidth,
    STAR_WIDTH, has_groups, leaves_at,
};
pub use domain::{
    DomainResult, LINEAR_FALLBACK_DOMAIN, LOG_EPSILON, LOG_FALLBACK_DOMAIN, calculate_domain,
};
pub use error::{ForestError, Warning};
pub use format::{
    format_events, format_interval, format_number, format_percent, format_pvalue, format_range,
    format_tick,
};
pub use group::{GroupTable, MAX_GROUP_DEPTH};
pub use layout::{
    ColumnGeometry, HeaderCell, Layout, LayoutOverrides, MIN_FOREST_WIDTH, ReferenceLine,
    RowGeometry, RowSlot, compute_layout, line_box, row_geometry,
};
pub use nice::{NICE_LOG_VALUES, nice_domain, nice_linear, nice_log};
pub use paint::{css_hex, opacity, parse_css_color};
pub use rows::{DisplayRow, build_display_rows, initial_collapsed};
pub use scale::{ForestScale, ScaleLinear, ScaleLog, tick_step};
pub use spec::{
    Annotation, Bound, Effect, Estimate, FieldRef, FieldValue, ForestData, ForestSpec, Group,
    GroupId, Labels, LayoutConfig, Row, RowKind, RowStyle, ScaleKind,
};
pub use store::{PlotContext, PlotStore};
pub use symbol::{Symbol, summary_diamond};
pub use theme::{
    ColorOverrides, ShapeOverrides, SpacingOverrides, Theme, ThemeColors, ThemeOverrides,
    ThemePreset, ThemeShapes, ThemeSpacing, ThemeTypography, TypographyOverrides, merge_theme,
};
pub use ticks::{generate_ticks, tick_hint, tick_labels};
pub use widths::{
    BADGE_GAP, BADGE_PADDING_X, CHEVRON_GAP, CHEVRON_WIDTH, ColumnWidths, LABEL_COLUMN_KEY,
    MAX_COLUMN_WIDTH, MAX_LABEL_WIDTH, MIN_LABEL_WIDTH, SAFETY_BUFFER, badge_width, label_style,
    label_width, leaf_width, measure_columns, measured_rows,
};

pub use forestplot_text::{
    FontFamily, FontStyle, FontWeight, HeuristicTextMeasurer, TextMeasurer, TextMetrics,
    TextStyle,
};
