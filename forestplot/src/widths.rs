// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Column width measurement.
//!
//! Auto-width leaves are sized from their header and formatted cells, then
//! column groups whose header is wider than their leaves spread the shortfall
//! over every leaf they span. The label column is measured separately.

extern crate alloc;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use forestplot_text::{TextMeasurer, TextStyle};
use hashbrown::HashMap;

use crate::column::{ColumnDef, ColumnGroup, ColumnKind, ColumnSpec};
use crate::rows::DisplayRow;
use crate::spec::{Row, RowKind};
use crate::theme::Theme;

/// Widest an auto-sized leaf column may become.
pub const MAX_COLUMN_WIDTH: f64 = 600.0;
/// Extra width added to every auto-sized cell so rendering differences never clip text.
pub const SAFETY_BUFFER: f64 = 4.0;
/// Narrowest label column.
pub const MIN_LABEL_WIDTH: f64 = 80.0;
/// Widest label column.
pub const MAX_LABEL_WIDTH: f64 = 800.0;
/// Width of the expand/collapse chevron on group headers.
pub const CHEVRON_WIDTH: f64 = 12.0;
/// Gap on either side of a group header's label.
pub const CHEVRON_GAP: f64 = 6.0;
/// Gap between a row label and its badge.
pub const BADGE_GAP: f64 = 6.0;
/// Horizontal padding inside a badge (each side).
pub const BADGE_PADDING_X: f64 = 6.0;
/// Override key addressing the label column.
pub const LABEL_COLUMN_KEY: &str = "__label__";

/// Measured widths.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColumnWidths {
    /// Label column width.
    pub label: f64,
    /// Leaf widths by column id.
    pub columns: HashMap<String, f64>,
    /// Per-leaf increment applied by each expanding column group, by group id.
    pub group_increments: HashMap<String, f64>,
}

impl ColumnWidths {
    /// Width of the leaf `id`, or of the label column for [`LABEL_COLUMN_KEY`].
    pub fn get(&self, id: &str) -> Option<f64> {
        if id == LABEL_COLUMN_KEY {
            Some(self.label)
        } else {
            self.columns.get(id).copied()
        }
    }

    /// Replaces widths with the given overrides, verbatim.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, f64>) {
        for (id, &w) in overrides {
            if !w.is_finite() || w < 0.0 {
                continue;
            }
            if id == LABEL_COLUMN_KEY {
                self.label = w;
            } else if let Some(slot) = self.columns.get_mut(id.as_str()) {
                *slot = w;
            }
        }
    }
}

/// Rows whose cells count towards auto widths.
pub fn measured_rows<'a>(rows: impl IntoIterator<Item = &'a Row>) -> Vec<&'a Row> {
    rows.into_iter()
        .filter(|r| matches!(r.kind(), RowKind::Data | RowKind::Summary))
        .collect()
}

/// Width of one leaf column.
///
/// Fixed widths are returned as declared. Auto widths are the widest of the
/// header and the formatted cells, plus cell padding and [`SAFETY_BUFFER`],
/// clamped to `[kind minimum, MAX_COLUMN_WIDTH]`.
pub fn leaf_width(
    column: &ColumnSpec,
    rows: &[&Row],
    theme: &Theme,
    measurer: &dyn TextMeasurer,
) -> f64 {
    if let Some(w) = column.fixed_width() {
        return w;
    }
    let header = measurer.width(&column.header, &theme.header_style());
    let body = theme.body_style();
    let content = rows
        .iter()
        .map(|row| measurer.width(&column.cell_text(row), &body))
        .fold(header, f64::max);
    let w = content + 2.0 * theme.spacing.cell_padding_x + SAFETY_BUFFER;
    let min = column.kind.min_width();
    w.clamp(min, MAX_COLUMN_WIDTH.max(min))
}

/// Measures every leaf of `columns`, then applies column-group expansion.
///
/// Leaves of unknown kind are skipped.
pub fn measure_columns(
    columns: &[ColumnDef],
    rows: &[&Row],
    theme: &Theme,
    measurer: &dyn TextMeasurer,
) -> ColumnWidths {
    let mut out = ColumnWidths::default();
    for def in columns {
        for leaf in def.leaves() {
            if matches!(leaf.kind, ColumnKind::Unknown(_)) {
                continue;
            }
            let w = leaf_width(leaf, rows, theme, measurer);
            out.columns.insert(leaf.id.clone(), w);
        }
    }
    for def in columns {
        if let ColumnDef::Group(group) = def {
            expand_group(group, theme, measurer, &mut out);
        }
    }
    out
}

/// Expands `group` (children first) and returns the ids of its measured leaves.
fn expand_group(
    group: &ColumnGroup,
    theme: &Theme,
    measurer: &dyn TextMeasurer,
    out: &mut ColumnWidths,
) -> Vec<String> {
    let mut leaves = Vec::new();
    for child in &group.children {
        match child {
            ColumnDef::Group(g) => leaves.extend(expand_group(g, theme, measurer, out)),
            ColumnDef::Column(c) if out.columns.contains_key(c.id.as_str()) => {
                leaves.push(c.id.clone());
            }
            ColumnDef::Column(_) => {}
        }
    }
    if leaves.is_empty() {
        return leaves;
    }
    let sum: f64 = leaves
        .iter()
        .filter_map(|id| out.columns.get(id.as_str()))
        .sum();
    let needed = measurer.width(&group.header, &theme.header_style())
        + 2.0 * theme.spacing.group_header_padding;
    if needed > sum {
        let inc = (needed - sum) / leaves.len() as f64;
        for id in &leaves {
            if let Some(w) = out.columns.get_mut(id.as_str()) {
                *w += inc;
            }
        }
        log::trace!("column group `{}` widens {} leaves by {inc}", group.id, leaves.len());
        out.group_increments.insert(group.id.clone(), inc);
    }
    leaves
}

/// Width of the label column.
///
/// `display` should be the uncollapsed display rows so that toggling a group
/// does not change the width. Clamped to `[MIN_LABEL_WIDTH, MAX_LABEL_WIDTH]`.
pub fn label_width(
    header: &str,
    rows: &[Row],
    display: &[DisplayRow],
    overall: Option<&Row>,
    theme: &Theme,
    measurer: &dyn TextMeasurer,
) -> f64 {
    let indent = theme.spacing.indent_per_level;
    let pad = 2.0 * theme.spacing.cell_padding_x + SAFETY_BUFFER;
    let mut widest = measurer.width(header, &theme.header_style());

    let row_width = |row: &Row, depth: usize| {
        let levels = depth as f64 + f64::from(row.style.indent);
        let mut w = measurer.width(&row.label, &label_style(row, theme)) + levels * indent;
        if let Some(badge) = row.style.badge.as_deref().filter(|b| !b.is_empty()) {
            w += badge_width(badge, theme, measurer);
        }
        w
    };
    for d in display {
        match d {
            DisplayRow::Data { row, depth } => {
                if let Some(row) = rows.get(*row) {
                    widest = widest.max(row_width(row, *depth));
                }
            }
            DisplayRow::GroupHeader {
                label,
                depth,
                row_count,
                ..
            } => {
                let count = format!("({row_count})");
                let w = *depth as f64 * indent
                    + CHEVRON_WIDTH
                    + CHEVRON_GAP
                    + measurer.width(label, &theme.bold_style())
                    + CHEVRON_GAP
                    + measurer.width(&count, &theme.small_style());
                widest = widest.max(w);
            }
        }
    }
    if let Some(row) = overall {
        widest = widest.max(row_width(row, 0));
    }
    (widest + pad).clamp(MIN_LABEL_WIDTH, MAX_LABEL_WIDTH)
}

/// Width of a badge pill, including its leading gap.
pub fn badge_width(text: &str, theme: &Theme, measurer: &dyn TextMeasurer) -> f64 {
    BADGE_GAP + measurer.width(text, &theme.small_style()) + 2.0 * BADGE_PADDING_X
}

/// Text style of a row label.
pub fn label_style(row: &Row, theme: &Theme) -> TextStyle {
    let bold = row.style.bold || matches!(row.kind(), RowKind::Header | RowKind::Summary);
    let style = if bold {
        theme.bold_style()
    } else {
        theme.body_style()
    };
    if row.style.italic {
        style.with_style(forestplot_text::FontStyle::Italic)
    } else {
        style
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use forestplot_text::HeuristicTextMeasurer;

    use super::*;
    use crate::column::ColumnPosition;
    use crate::spec::FieldValue;

    fn numeric_rows(values: &[f64]) -> Vec<Row> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                Row::new(format!("r{i}"), "", Some(1.0), None, None)
                    .with_field("n", FieldValue::Number(v))
            })
            .collect()
    }

    #[test]
    fn auto_width_is_content_plus_padding() {
        let theme = Theme::default();
        let m = HeuristicTextMeasurer;
        let rows = numeric_rows(&[12.0, 999_999.0]);
        let refs = measured_rows(&rows);
        let col = ColumnSpec::new("n", "N", "n", ColumnKind::numeric());
        let w = leaf_width(&col, &refs, &theme, &m);
        let content = m.width("999,999", &theme.body_style());
        let expected = content + 2.0 * theme.spacing.cell_padding_x + SAFETY_BUFFER;
        assert!((w - expected.clamp(40.0, MAX_COLUMN_WIDTH)).abs() < 1e-9, "{w} vs {expected}");
    }

    #[test]
    fn auto_width_is_capped() {
        let theme = Theme::default();
        let rows = vec![
            Row::new("a", "", None, None, None)
                .with_field("t", FieldValue::Text("x".repeat(500))),
        ];
        let col = ColumnSpec::new("t", "T", "t", ColumnKind::Text);
        let w = leaf_width(&col, &measured_rows(&rows), &theme, &HeuristicTextMeasurer);
        assert_eq!(w, MAX_COLUMN_WIDTH);
    }

    #[test]
    fn group_header_spreads_shortfall_over_all_leaves() {
        let theme = Theme::default();
        let m = HeuristicTextMeasurer;
        let group = ColumnGroup::new(
            "g",
            "A very long treatment group header text",
            vec![
                ColumnSpec::new("a", "A", "a", ColumnKind::Text).with_width(30.0).into(),
                ColumnSpec::new("b", "B", "b", ColumnKind::Text).with_width(30.0).into(),
            ],
        )
        .with_position(ColumnPosition::Right);
        let out = measure_columns(&[group.clone().into()], &[], &theme, &m);
        let needed = m.width(&group.header, &theme.header_style())
            + 2.0 * theme.spacing.group_header_padding;
        let sum = out.columns["a"] + out.columns["b"];
        assert!((sum - needed).abs() < 1e-9, "{sum} vs {needed}");
        assert_eq!(out.columns["a"], out.columns["b"]);
        assert!(out.group_increments["g"] > 0.0, "increment recorded");
    }

    #[test]
    fn label_column_reserves_indentation() {
        let theme = Theme::default();
        let m = HeuristicTextMeasurer;
        let rows = vec![Row::new("a", "A fairly long study label", None, None, None)];
        let flat = [DisplayRow::Data { row: 0, depth: 0 }];
        let deep = [DisplayRow::Data { row: 0, depth: 3 }];
        let w0 = label_width("Study", &rows, &flat, None, &theme, &m);
        let w3 = label_width("Study", &rows, &deep, None, &theme, &m);
        assert!((w3 - w0 - 3.0 * theme.spacing.indent_per_level).abs() < 1e-9, "{w0} {w3}");
    }

    #[test]
    fn label_column_is_clamped() {
        let theme = Theme::default();
        let w = label_width("", &[], &[], None, &theme, &HeuristicTextMeasurer);
        assert_eq!(w, MIN_LABEL_WIDTH);
    }
}
