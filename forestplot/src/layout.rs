// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The layout calculator.
//!
//! Composes domain, ticks, column widths and display rows into one immutable
//! [`Layout`]: every pixel position the renderers need, computed once. The
//! vertical stack is
//!
//! - outer padding,
//! - the header text block (title, subtitle),
//! - the column header (two tiers when column groups exist),
//! - the rows, then the overall summary,
//! - the axis block (ticks, tick labels, axis label),
//! - the footer (caption, footnote),
//! - outer padding.
//!
//! Horizontally: padding, label column, left columns, gap, forest plot, gap,
//! right columns, padding.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use forestplot_text::{TextMeasurer, TextStyle};
use hashbrown::{HashMap, HashSet};
use kurbo::Rect;
use peniko::Color;
use smallvec::SmallVec;

use crate::axis::LineStyle;
use crate::clip::{ClipContext, IntervalGeometry, resolve_row};
use crate::column::{Align, ColumnDef, ColumnKind, ColumnPosition, ColumnSpec, has_groups, leaves_at};
use crate::domain::calculate_domain;
use crate::error::Warning;
use crate::group::GroupTable;
use crate::nice::nice_domain;
use crate::rows::{DisplayRow, build_display_rows};
use crate::scale::ForestScale;
use crate::spec::{Annotation, ForestSpec, RowKind, ScaleKind};
use crate::ticks::{generate_ticks, tick_hint, tick_labels};
use crate::widths::{ColumnWidths, label_width, measure_columns, measured_rows};

/// Narrowest forest plot area, whatever the requested width.
pub const MIN_FOREST_WIDTH: f64 = 200.0;

/// Explicit inputs that bypass measurement.
///
/// A static exporter reuses the values an interactive view computed so both
/// produce identical geometry. Overrides are used verbatim.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayoutOverrides {
    /// Column widths by leaf id; [`crate::LABEL_COLUMN_KEY`] addresses the label column.
    pub column_widths: HashMap<String, f64>,
    /// Forest plot width.
    pub forest_width: Option<f64>,
    /// X domain, used as-is (no nicing). Clip bounds are still derived from the data.
    pub x_domain: Option<(f64, f64)>,
}

impl LayoutOverrides {
    /// Overrides one column width.
    pub fn with_column_width(mut self, id: impl Into<String>, width: f64) -> Self {
        self.column_widths.insert(id.into(), width);
        self
    }

    /// Overrides the forest plot width.
    pub fn with_forest_width(mut self, width: f64) -> Self {
        self.forest_width = Some(width);
        self
    }

    /// Overrides the x domain.
    pub fn with_x_domain(mut self, min: f64, max: f64) -> Self {
        self.x_domain = Some((min, max));
        self
    }

    /// Whether nothing is overridden.
    pub fn is_empty(&self) -> bool {
        self.column_widths.is_empty() && self.forest_width.is_none() && self.x_domain.is_none()
    }
}

/// Vertical extent of one row.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RowSlot {
    /// Top edge.
    pub y: f64,
    /// Height.
    pub height: f64,
}

impl RowSlot {
    /// Vertical center.
    pub fn center(&self) -> f64 {
        self.y + self.height * 0.5
    }
}

/// Horizontal placement of one leaf column.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnGeometry {
    /// Leaf column id.
    pub id: String,
    /// Left edge.
    pub x: f64,
    /// Width.
    pub width: f64,
    /// Side of the plot.
    pub position: ColumnPosition,
    /// Cell alignment.
    pub align: Align,
}

/// A column header cell.
#[derive(Clone, Debug, PartialEq)]
pub struct HeaderCell {
    /// Header text.
    pub text: String,
    /// Cell bounds.
    pub rect: Rect,
    /// Text alignment.
    pub align: Align,
    /// A column group header (top tier).
    pub group: bool,
}

/// A placed reference line.
#[derive(Clone, Debug, PartialEq)]
pub struct ReferenceLine {
    /// Axis value.
    pub value: f64,
    /// Pixel position.
    pub x: f64,
    /// Label at the top of the line.
    pub label: Option<String>,
    /// Stroke pattern.
    pub style: LineStyle,
    /// Stroke color.
    pub color: Color,
}

/// Resolved geometry of one plotted row.
#[derive(Clone, Debug, PartialEq)]
pub struct RowGeometry {
    /// Index into the display rows; `None` for the overall summary.
    pub display_index: Option<usize>,
    /// Interval geometry per effect.
    pub intervals: SmallVec<[IntervalGeometry; 2]>,
}

/// The immutable geometry descriptor.
#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    /// Document width.
    pub width: f64,
    /// Document height.
    pub height: f64,
    /// Outer padding.
    pub padding: f64,
    /// Height of the title/subtitle block (0 without text).
    pub header_text_height: f64,
    /// Top of the column header.
    pub column_header_y: f64,
    /// Column header height (both tiers).
    pub column_header_height: f64,
    /// Top of the first row.
    pub plot_y: f64,
    /// Height of all rows plus the overall summary.
    pub plot_height: f64,
    /// Nominal row height.
    pub row_height: f64,
    /// One slot per display row.
    pub rows: Vec<RowSlot>,
    /// The overall summary row, when present.
    pub overall_summary: Option<RowSlot>,
    /// Top of the axis block.
    pub axis_y: f64,
    /// Axis block height.
    pub axis_height: f64,
    /// Top of the footer.
    pub footer_y: f64,
    /// Footer height (0 without text).
    pub footer_height: f64,
    /// Left edge of the label column.
    pub label_x: f64,
    /// Label column width.
    pub label_width: f64,
    /// Left edge of the forest plot area.
    pub forest_x: f64,
    /// Forest plot width.
    pub forest_width: f64,
    /// Pixel range the scale maps the domain onto (inset by the marker margin).
    pub scale_range: (f64, f64),
    /// Axis scale kind.
    pub scale_kind: ScaleKind,
    /// Display domain.
    pub x_domain: (f64, f64),
    /// Values outside these bounds are truncated.
    pub clip_bounds: (f64, f64),
    /// The domain was mirrored around the null value.
    pub symmetric: bool,
    /// The domain is the no-data fallback.
    pub fallback_domain: bool,
    /// The null value.
    pub null_value: f64,
    /// Pixel position of the null value, when it is inside the domain.
    pub null_x: Option<f64>,
    /// Tick values.
    pub ticks: Vec<f64>,
    /// Tick labels, parallel to `ticks`.
    pub tick_labels: Vec<String>,
    /// Leaf column placement, left columns first.
    pub columns: Vec<ColumnGeometry>,
    /// Column header cells (label, leaves, groups, plot).
    pub header_cells: Vec<HeaderCell>,
    /// Resolved widths, reusable as [`LayoutOverrides::column_widths`].
    pub column_widths: ColumnWidths,
    /// Reference lines inside the domain.
    pub reference_lines: Vec<ReferenceLine>,
    /// Problems found while laying out; the offending elements were skipped.
    pub warnings: Vec<Warning>,
}

impl Layout {
    /// The x scale.
    pub fn scale(&self) -> ForestScale {
        ForestScale::new(self.scale_kind, self.x_domain, self.scale_range)
    }

    /// Clipping inputs for this layout.
    pub fn clip_context(&self, line_width: f64) -> ClipContext {
        ClipContext {
            scale: self.scale(),
            clip_bounds: self.clip_bounds,
            line_width,
        }
    }

    /// The forest plot area, covering all rows.
    pub fn plot_rect(&self) -> Rect {
        Rect::new(
            self.forest_x,
            self.plot_y,
            self.forest_x + self.forest_width,
            self.plot_y + self.plot_height,
        )
    }

    /// Geometry of a leaf column.
    pub fn column(&self, id: &str) -> Option<&ColumnGeometry> {
        self.columns.iter().find(|c| c.id == id)
    }

    /// Widths to feed back as overrides for a pixel-identical re-layout.
    pub fn overrides(&self) -> LayoutOverrides {
        let mut column_widths: HashMap<String, f64> = self
            .columns
            .iter()
            .map(|c| (c.id.clone(), c.width))
            .collect();
        column_widths.insert(String::from(crate::widths::LABEL_COLUMN_KEY), self.label_width);
        LayoutOverrides {
            column_widths,
            forest_width: Some(self.forest_width),
            x_domain: Some(self.x_domain),
        }
    }
}

/// Line box height of `style` under the theme's line height.
pub fn line_box(style: &TextStyle, line_height: f64) -> f64 {
    style.font_size * line_height.max(0.0)
}

/// Computes the layout.
///
/// `display` is the (possibly collapsed, filtered or sorted) display row
/// sequence; column widths are measured over all rows regardless, so they do
/// not change when groups are toggled. `width` is the requested document
/// width, defaulting to the specification's layout width.
pub fn compute_layout(
    spec: &ForestSpec,
    groups: &GroupTable,
    display: &[DisplayRow],
    measurer: &dyn TextMeasurer,
    width: Option<f64>,
    overrides: &LayoutOverrides,
) -> Layout {
    let theme = &spec.theme;
    let sp = &theme.spacing;
    let data = &spec.data;
    let overall = data.overall_summary.as_ref();
    let mut warnings = Vec::new();

    let known_leaves = |position| -> Vec<&ColumnSpec> {
        leaves_at(&spec.columns, position)
            .into_iter()
            .filter(|c| !matches!(c.kind, ColumnKind::Unknown(_)))
            .collect()
    };
    for def in &spec.columns {
        for leaf in def.leaves() {
            if let ColumnKind::Unknown(kind) = &leaf.kind {
                log::warn!("column `{}` has unknown type `{kind}`; skipped", leaf.id);
                warnings.push(Warning::UnknownColumnType {
                    column: leaf.id.clone(),
                    kind: kind.clone(),
                });
            }
        }
    }

    // Widths.
    let cell_rows = measured_rows(data.rows.iter().chain(overall));
    let mut widths = measure_columns(&spec.columns, &cell_rows, theme, measurer);
    let all_rows = build_display_rows(&data.rows, groups, &HashSet::new(), None);
    widths.label = label_width(
        &spec.layout.label_header,
        &data.rows,
        &all_rows,
        overall,
        theme,
        measurer,
    );
    widths.apply_overrides(&overrides.column_widths);

    let left = known_leaves(ColumnPosition::Left);
    let right = known_leaves(ColumnPosition::Right);
    let width_of = |c: &ColumnSpec| widths.columns.get(c.id.as_str()).copied().unwrap_or(0.0);
    let left_table = widths.label + left.iter().map(|c| width_of(c)).sum::<f64>();
    let right_table: f64 = right.iter().map(|c| width_of(c)).sum();

    let padding = sp.padding.max(0.0);
    let gap = sp.column_gap.max(0.0);
    let requested = width
        .filter(|w| w.is_finite() && *w > 0.0)
        .unwrap_or(spec.layout.width);
    let positive = |v: Option<f64>| v.filter(|w| w.is_finite() && *w > 0.0);
    let forest_width = positive(overrides.forest_width)
        .or(positive(spec.layout.plot_width))
        .unwrap_or_else(|| {
            (requested - 2.0 * padding - left_table - right_table - 2.0 * gap)
                .max(MIN_FOREST_WIDTH)
        });
    let content_width = 2.0 * padding + left_table + gap + forest_width + gap + right_table;
    let total_width = requested.max(content_width);

    // Horizontal placement.
    let label_x = padding;
    let mut columns = Vec::with_capacity(left.len() + right.len());
    let mut x = label_x + widths.label;
    for c in &left {
        let w = width_of(c);
        columns.push(geometry(c, x, w, ColumnPosition::Left));
        x += w;
    }
    let forest_x = x + gap;
    let mut x = forest_x + forest_width + gap;
    for c in &right {
        let w = width_of(c);
        columns.push(geometry(c, x, w, ColumnPosition::Right));
        x += w;
    }

    // Vertical stack.
    let lh = theme.typography.line_height;
    let mut header_text_height = 0.0;
    if spec.labels.title.as_deref().is_some_and(|t| !t.is_empty()) {
        header_text_height += line_box(&theme.title_style(), lh);
    }
    if spec.labels.subtitle.as_deref().is_some_and(|t| !t.is_empty()) {
        if header_text_height > 0.0 {
            header_text_height += sp.text_gap;
        }
        header_text_height += line_box(&theme.large_style(), lh);
    }
    if header_text_height > 0.0 {
        header_text_height += sp.section_gap;
    }

    let grouped = has_groups(&spec.columns);
    let column_header_y = padding + header_text_height;
    let column_header_height = sp.header_height * if grouped { 2.0 } else { 1.0 };
    let plot_y = column_header_y + column_header_height;

    let row_height = sp.row_height.max(0.0);
    let mut y = plot_y;
    let rows: Vec<RowSlot> = display
        .iter()
        .map(|d| {
            let spacer = matches!(d, DisplayRow::Data { row, .. }
                if data.rows.get(*row).is_some_and(|r| r.kind() == RowKind::Spacer));
            let height = if spacer { row_height * 0.5 } else { row_height };
            let slot = RowSlot { y, height };
            y += height;
            slot
        })
        .collect();
    let overall_summary = overall.map(|_| {
        let slot = RowSlot {
            y: y + row_height * 0.5,
            height: row_height,
        };
        y += row_height * 1.5;
        slot
    });
    let plot_height = y - plot_y;

    let axis_label = spec
        .labels
        .axis_label
        .as_deref()
        .filter(|t| !t.is_empty());
    let large = theme.large_style();
    let axis_y = plot_y + plot_height;
    let axis_height = sp.axis_gap.max(0.0)
        + theme
            .axis
            .measure_height(measurer, &theme.small_style(), axis_label.map(|t| (t, &large)));

    let mut footer_height = 0.0;
    for text in [&spec.labels.caption, &spec.labels.footnote] {
        if text.as_deref().is_some_and(|t| !t.is_empty()) {
            footer_height += if footer_height > 0.0 { sp.text_gap } else { sp.section_gap };
            footer_height += line_box(&theme.small_style(), lh);
        }
    }
    let footer_y = axis_y + axis_height;
    let total_height = footer_y + footer_height + padding;

    // Domain and ticks.
    let scale_kind = data.scale;
    let null_value = data.null_value();
    let effects = data.effects();
    let axis = &theme.axis;
    let margin = if axis.marker_margin {
        (theme.shapes.point_size.max(0.0) * 0.5).min(forest_width * 0.25)
    } else {
        0.0
    };
    let scale_range = (forest_x + margin, forest_x + forest_width - margin);
    let range_width = scale_range.1 - scale_range.0;

    // Clip bounds always come from the data so that a replayed domain
    // truncates exactly the intervals the original layout truncated.
    let raw = calculate_domain(
        data.rows.iter().chain(overall),
        &effects,
        axis,
        scale_kind,
        null_value,
    );
    let x_domain = match valid_domain(overrides.x_domain, scale_kind) {
        Some(d) => d,
        None => match (axis.range_min.is_some(), axis.range_max.is_some()) {
            (true, true) => raw.domain,
            (pin_min, pin_max) => {
                let hint = tick_hint(axis, range_width);
                let (a, b) = nice_domain(raw.domain, scale_kind, hint);
                (
                    if pin_min { raw.domain.0 } else { a },
                    if pin_max { raw.domain.1 } else { b },
                )
            }
        },
    };
    let (clip_bounds, symmetric, fallback_domain) = (raw.clip_bounds, raw.symmetric, raw.fallback);

    let ticks = generate_ticks(x_domain, scale_kind, axis, range_width, null_value);
    let labels = tick_labels(&ticks, scale_kind);
    let scale = ForestScale::new(scale_kind, x_domain, scale_range);
    let in_domain = |v: f64| {
        v.is_finite()
            && v >= x_domain.0
            && v <= x_domain.1
            && (scale_kind == ScaleKind::Linear || v > 0.0)
    };
    let null_x = in_domain(null_value).then(|| scale.map(null_value));

    let mut reference_lines = Vec::new();
    for (index, a) in spec.annotations.iter().enumerate() {
        match a {
            Annotation::ReferenceLine {
                x,
                label,
                style,
                color,
            } => {
                if in_domain(*x) {
                    reference_lines.push(ReferenceLine {
                        value: *x,
                        x: scale.map(*x),
                        label: label.clone(),
                        style: *style,
                        color: color.unwrap_or(theme.colors.reference_line),
                    });
                } else {
                    log::debug!("reference line at {x} lies outside the domain");
                }
            }
            Annotation::Unknown(kind) => {
                log::warn!("annotation #{index} has unknown type `{kind}`; skipped");
                warnings.push(Warning::UnknownAnnotationType {
                    index,
                    kind: kind.clone(),
                });
            }
        }
    }

    let header_cells = header_cells(
        spec,
        &widths,
        &columns,
        (label_x, column_header_y, column_header_height),
        (forest_x, forest_width),
        grouped,
    );

    log::trace!(
        "layout: {total_width}x{total_height}, forest {forest_width} at {forest_x}, domain {x_domain:?}"
    );

    Layout {
        width: total_width,
        height: total_height,
        padding,
        header_text_height,
        column_header_y,
        column_header_height,
        plot_y,
        plot_height,
        row_height,
        rows,
        overall_summary,
        axis_y,
        axis_height,
        footer_y,
        footer_height,
        label_x,
        label_width: widths.label,
        forest_x,
        forest_width,
        scale_range,
        scale_kind,
        x_domain,
        clip_bounds,
        symmetric,
        fallback_domain,
        null_value,
        null_x,
        ticks,
        tick_labels: labels,
        columns,
        header_cells,
        column_widths: widths,
        reference_lines,
        warnings,
    }
}

/// Resolves interval geometry for every plotted display row and the overall summary.
pub fn row_geometry(spec: &ForestSpec, layout: &Layout, display: &[DisplayRow]) -> Vec<RowGeometry> {
    let ctx = layout.clip_context(spec.theme.shapes.line_width);
    let effects = spec.data.effects();
    let mut out: Vec<RowGeometry> = display
        .iter()
        .zip(&layout.rows)
        .enumerate()
        .filter_map(|(i, (d, slot))| {
            let DisplayRow::Data { row, .. } = d else {
                return None;
            };
            let row = spec.data.rows.get(*row)?;
            let intervals = resolve_row(row, &effects, slot.center(), slot.height, false, &ctx);
            (!intervals.is_empty()).then_some(RowGeometry {
                display_index: Some(i),
                intervals,
            })
        })
        .collect();
    if let (Some(row), Some(slot)) = (&spec.data.overall_summary, layout.overall_summary) {
        let intervals = resolve_row(row, &effects, slot.center(), slot.height, true, &ctx);
        if !intervals.is_empty() {
            out.push(RowGeometry {
                display_index: None,
                intervals,
            });
        }
    }
    out
}

fn geometry(c: &ColumnSpec, x: f64, width: f64, position: ColumnPosition) -> ColumnGeometry {
    ColumnGeometry {
        id: c.id.clone(),
        x,
        width,
        position,
        align: c.align,
    }
}

fn valid_domain(domain: Option<(f64, f64)>, scale: ScaleKind) -> Option<(f64, f64)> {
    let (a, b) = domain?;
    let ok = a.is_finite()
        && b.is_finite()
        && a < b
        && (scale == ScaleKind::Linear || a > 0.0);
    ok.then_some((a, b))
}

fn header_cells(
    spec: &ForestSpec,
    widths: &ColumnWidths,
    columns: &[ColumnGeometry],
    (label_x, y, height): (f64, f64, f64),
    (forest_x, forest_width): (f64, f64),
    grouped: bool,
) -> Vec<HeaderCell> {
    let tier = if grouped { height * 0.5 } else { height };
    let mut cells = Vec::new();
    cells.push(HeaderCell {
        text: spec.layout.label_header.clone(),
        rect: Rect::new(label_x, y, label_x + widths.label, y + height),
        align: Align::Left,
        group: false,
    });
    cells.push(HeaderCell {
        text: spec.layout.plot_header.clone(),
        rect: Rect::new(forest_x, y, forest_x + forest_width, y + height),
        align: Align::Center,
        group: false,
    });

    // Leaves under a group sit in the bottom tier; others span both.
    let mut grouped_leaves: HashSet<&str> = HashSet::new();
    for def in &spec.columns {
        let ColumnDef::Group(group) = def else {
            continue;
        };
        let spanned: Vec<&ColumnGeometry> = def
            .leaves()
            .into_iter()
            .filter_map(|leaf| columns.iter().find(|c| c.id == leaf.id))
            .collect();
        let (Some(first), Some(last)) = (spanned.first(), spanned.last()) else {
            continue;
        };
        grouped_leaves.extend(spanned.iter().map(|c| c.id.as_str()));
        cells.push(HeaderCell {
            text: group.header.clone(),
            rect: Rect::new(first.x, y, last.x + last.width, y + tier),
            align: Align::Center,
            group: true,
        });
    }
    for def in &spec.columns {
        for leaf in def.leaves() {
            let Some(c) = columns.iter().find(|c| c.id == leaf.id) else {
                continue;
            };
            let top = if grouped_leaves.contains(c.id.as_str()) {
                y + tier
            } else {
                y
            };
            cells.push(HeaderCell {
                text: leaf.header.clone(),
                rect: Rect::new(c.x, top, c.x + c.width, y + height),
                align: c.align,
                group: false,
            });
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use forestplot_text::HeuristicTextMeasurer;

    use super::*;
    use crate::column::ColumnGroup;
    use crate::spec::{Group, Labels, Row};

    fn spec() -> ForestSpec {
        ForestSpec::new(vec![
            Row::new("a", "Study A", Some(0.8), Some(0.7), Some(0.9)),
            Row::new("b", "Study B", Some(1.2), Some(0.9), Some(1.6)),
            Row::labelled("s", "", RowKind::Spacer),
        ])
        .with_scale(ScaleKind::Log)
    }

    fn layout(spec: &ForestSpec, width: Option<f64>, overrides: &LayoutOverrides) -> Layout {
        let groups = GroupTable::new(&spec.data.groups);
        let display = build_display_rows(&spec.data.rows, &groups, &HashSet::new(), None);
        compute_layout(spec, &groups, &display, &HeuristicTextMeasurer, width, overrides)
    }

    #[test]
    fn spacer_rows_are_half_height() {
        let s = spec();
        let l = layout(&s, None, &LayoutOverrides::default());
        assert_eq!(l.rows[2].height, l.row_height * 0.5);
        assert_eq!(l.plot_height, l.row_height * 2.5);
    }

    #[test]
    fn overall_summary_adds_a_row_and_a_half() {
        let s = spec().with_overall_summary(
            Row::new("o", "Overall", Some(1.0), Some(0.9), Some(1.1)).with_kind(RowKind::Summary),
        );
        let l = layout(&s, None, &LayoutOverrides::default());
        assert_eq!(l.plot_height, l.row_height * 4.0);
        let o = l.overall_summary.expect("overall slot");
        assert_eq!(o.y, l.plot_y + l.row_height * 3.0);
    }

    #[test]
    fn column_groups_double_the_header() {
        let flat = layout(&spec(), None, &LayoutOverrides::default());
        let grouped = spec().with_columns(vec![
            ColumnGroup::new(
                "g",
                "Group",
                vec![ColumnSpec::new("n", "N", "n", ColumnKind::numeric()).into()],
            )
            .into(),
        ]);
        let l = layout(&grouped, None, &LayoutOverrides::default());
        assert_eq!(l.column_header_height, 2.0 * flat.column_header_height);
        assert!(l.header_cells.iter().any(|c| c.group), "group header cell");
    }

    #[test]
    fn total_width_never_shrinks_content() {
        let l = layout(&spec(), Some(100.0), &LayoutOverrides::default());
        assert_eq!(l.forest_width, MIN_FOREST_WIDTH);
        assert!(l.width > 100.0, "{}", l.width);
        let right_edge = l.forest_x + l.forest_width + l.padding;
        assert!(l.width >= right_edge, "{} < {right_edge}", l.width);
    }

    #[test]
    fn overrides_are_reused_verbatim() {
        let s = spec();
        let first = layout(&s, Some(900.0), &LayoutOverrides::default());
        let again = layout(&s, Some(900.0), &first.overrides());
        assert_eq!(first, again, "replayed overrides reproduce the layout");
        let o = LayoutOverrides::default()
            .with_column_width(crate::widths::LABEL_COLUMN_KEY, 123.0)
            .with_forest_width(321.0)
            .with_x_domain(0.5, 2.0);
        let l = layout(&s, None, &o);
        assert_eq!(
            (l.label_width, l.forest_width, l.x_domain),
            (123.0, 321.0, (0.5, 2.0))
        );
    }

    #[test]
    fn layout_is_deterministic() {
        let mut s = spec().with_groups(vec![Group::new("g", "G")]);
        s.labels = Labels {
            title: Some("Title".into()),
            caption: Some("Caption".into()),
            axis_label: Some("Odds ratio".into()),
            ..Labels::default()
        };
        let a = layout(&s, Some(700.0), &LayoutOverrides::default());
        let b = layout(&s, Some(700.0), &LayoutOverrides::default());
        assert_eq!(a, b);
        assert!(a.header_text_height > 0.0 && a.footer_height > 0.0, "text blocks");
    }

    #[test]
    fn unknown_columns_and_annotations_warn() {
        let mut s = spec().with_columns(vec![
            ColumnSpec::new("x", "X", "x", ColumnKind::Unknown("hologram".into())).into(),
        ]);
        s.annotations = vec![Annotation::Unknown("confetti".into())];
        let l = layout(&s, None, &LayoutOverrides::default());
        assert_eq!(l.warnings.len(), 2, "{:?}", l.warnings);
        assert!(l.columns.is_empty(), "unknown column skipped");
    }
}
