// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draws a computed [`PlotContext`] as SVG.
//!
//! Every position comes from the shared layout; this module only decides
//! paint order and styling.

use forestplot::{
    BADGE_GAP, BADGE_PADDING_X, BoundCap, CHEVRON_GAP, CHEVRON_WIDTH, ColumnGeometry, ColumnKind,
    ColumnSpec, DisplayRow, FieldValue, ForestSpec, Layout, PlotContext, Row, RowKind, RowSlot,
    STAR_WIDTH, TextMeasurer, Theme, label_style, line_box,
};
use hashbrown::HashMap;
use kurbo::{BezPath, Rect};
use peniko::Color;

use crate::svg::{Anchor, Font, Stroke, SvgWriter};

/// Document size and paint inputs.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Canvas {
    /// Height of the user space (the layout height unless overridden).
    pub(crate) view_height: f64,
    /// Scale from user space to output pixels.
    pub(crate) scale: f64,
    pub(crate) background: Color,
}

pub(crate) fn draw(
    spec: &ForestSpec,
    ctx: &PlotContext,
    measurer: &dyn TextMeasurer,
    canvas: Canvas,
) -> String {
    let l = &ctx.layout;
    let view = Rect::new(0.0, 0.0, l.width, canvas.view_height);
    let mut w = SvgWriter::new(view, l.width * canvas.scale, canvas.view_height * canvas.scale);
    w.rect(view, canvas.background, 0.0);

    let painter = Painter {
        spec,
        theme: &spec.theme,
        layout: l,
        measurer,
        bar_max: bar_maxima(spec),
    };
    painter.titles(&mut w);
    painter.rows(&mut w, ctx);
    painter.headers(&mut w);
    painter.forest(&mut w, ctx);
    painter.axis(&mut w);
    painter.footer(&mut w);
    w.finish()
}

struct Painter<'a> {
    spec: &'a ForestSpec,
    theme: &'a Theme,
    layout: &'a Layout,
    measurer: &'a dyn TextMeasurer,
    bar_max: HashMap<&'a str, f64>,
}

impl Painter<'_> {
    fn content_x(&self) -> (f64, f64) {
        (self.layout.padding, self.layout.width - self.layout.padding)
    }

    fn titles(&self, w: &mut SvgWriter) {
        let t = self.theme;
        let lh = t.typography.line_height;
        let mut y = self.layout.padding;
        let x = self.layout.padding;
        if let Some(title) = self.spec.labels.title.as_deref().filter(|s| !s.is_empty()) {
            let style = t.title_style();
            let h = line_box(&style, lh);
            w.text(x, y + h * 0.5, title, &Font::of(&style), Anchor::Start, t.colors.foreground);
            y += h + t.spacing.text_gap;
        }
        if let Some(sub) = self.spec.labels.subtitle.as_deref().filter(|s| !s.is_empty()) {
            let style = t.large_style();
            let h = line_box(&style, lh);
            w.text(x, y + h * 0.5, sub, &Font::of(&style), Anchor::Start, t.colors.muted);
        }
    }

    fn headers(&self, w: &mut SvgWriter) {
        let t = self.theme;
        let l = self.layout;
        let style = t.header_style();
        let font = Font::of(&style);
        let pad = t.spacing.cell_padding_x;
        let border = Stroke::solid(t.colors.border, 1.0);
        for cell in &l.header_cells {
            let r = cell.rect;
            let x = match Anchor::from(cell.align) {
                Anchor::Start => r.x0 + pad,
                Anchor::Middle => r.center().x,
                Anchor::End => r.x1 - pad,
            };
            w.text(x, r.center().y, &cell.text, &font, cell.align.into(), t.colors.foreground);
            if cell.group {
                let inset = t.spacing.group_header_padding.min(r.width() * 0.5);
                w.line((r.x0 + inset, r.y1), (r.x1 - inset, r.y1), border);
            }
        }
        let (x0, x1) = self.content_x();
        let bottom = l.column_header_y + l.column_header_height;
        w.line((x0, bottom), (x1, bottom), border);
    }

    fn rows(&self, w: &mut SvgWriter, ctx: &PlotContext) {
        let t = self.theme;
        let l = self.layout;
        let (x0, x1) = self.content_x();
        let mut band = 0_usize;
        for (d, slot) in ctx.display_rows.iter().zip(&l.rows) {
            let rect = Rect::new(x0, slot.y, x1, slot.y + slot.height);
            match d {
                DisplayRow::GroupHeader {
                    label,
                    depth,
                    row_count,
                    collapsed,
                    ..
                } => {
                    w.rect(rect, t.colors.group_header, 0.0);
                    self.group_header(w, label, *depth, *row_count, *collapsed, slot);
                    band = 0;
                }
                DisplayRow::Data { row, depth } => {
                    let Some(row) = self.spec.data.rows.get(*row) else {
                        continue;
                    };
                    if row.kind() == RowKind::Spacer {
                        continue;
                    }
                    if self.spec.layout.banding && band % 2 == 1 {
                        w.rect(rect, t.colors.row_band, 0.0);
                    }
                    band += 1;
                    self.data_row(w, row, *depth, slot);
                }
            }
        }
        if let (Some(row), Some(slot)) = (&self.spec.data.overall_summary, l.overall_summary) {
            let top = slot.y - l.row_height * 0.25;
            w.line((x0, top), (x1, top), Stroke::solid(t.colors.border, 1.0));
            self.data_row(w, row, 0, &slot);
        }
    }

    fn group_header(
        &self,
        w: &mut SvgWriter,
        label: &str,
        depth: usize,
        count: usize,
        collapsed: bool,
        slot: &RowSlot,
    ) {
        let t = self.theme;
        let cy = slot.center();
        let x = self.layout.label_x
            + t.spacing.cell_padding_x
            + depth as f64 * t.spacing.indent_per_level;
        w.path(&chevron(x, cy, collapsed), Some(t.colors.muted), None);
        let bold = t.bold_style();
        let lx = x + CHEVRON_WIDTH + CHEVRON_GAP;
        w.text(lx, cy, label, &Font::of(&bold), Anchor::Start, t.colors.foreground);
        let small = t.small_style();
        let cx = lx + self.measurer.width(label, &bold) + CHEVRON_GAP;
        let count = format!("({count})");
        w.text(cx, cy, &count, &Font::of(&small), Anchor::Start, t.colors.muted);
    }

    fn data_row(&self, w: &mut SvgWriter, row: &Row, depth: usize, slot: &RowSlot) {
        let t = self.theme;
        let cy = slot.center();
        let levels = depth as f64 + f64::from(row.style.indent);
        let x = self.layout.label_x + t.spacing.cell_padding_x + levels * t.spacing.indent_per_level;
        let style = label_style(row, t);
        let color = row.style.color.unwrap_or(t.colors.foreground);
        w.text(x, cy, &row.label, &Font::of(&style), Anchor::Start, color);
        if let Some(badge) = row.style.badge.as_deref().filter(|b| !b.is_empty()) {
            let bx = x + self.measurer.width(&row.label, &style) + BADGE_GAP;
            self.pill(w, bx, cy, badge);
        }
        if row.kind() == RowKind::Header {
            return;
        }
        for geom in &self.layout.columns {
            if let Some(column) = self.leaf(&geom.id) {
                self.cell(w, column, geom, row, slot);
            }
        }
    }

    fn leaf(&self, id: &str) -> Option<&ColumnSpec> {
        self.spec
            .columns
            .iter()
            .flat_map(|def| def.leaves())
            .find(|c| c.id == id)
    }

    fn pill(&self, w: &mut SvgWriter, x: f64, cy: f64, text: &str) {
        let t = self.theme;
        let small = t.small_style();
        let width = self.measurer.width(text, &small) + 2.0 * BADGE_PADDING_X;
        let h = line_box(&small, 1.2);
        let r = Rect::new(x, cy - h * 0.5, x + width, cy + h * 0.5);
        w.rect(r, t.colors.border, t.shapes.border_radius);
        let font = Font::of(&small);
        w.text(x + BADGE_PADDING_X, cy, text, &font, Anchor::Start, t.colors.foreground);
    }

    fn cell(
        &self,
        w: &mut SvgWriter,
        column: &ColumnSpec,
        geom: &ColumnGeometry,
        row: &Row,
        slot: &RowSlot,
    ) {
        let t = self.theme;
        let pad = t.spacing.cell_padding_x;
        let cy = slot.center();
        let inner = Rect::new(
            geom.x + pad,
            slot.y + t.spacing.cell_padding_y,
            geom.x + geom.width - pad,
            slot.y + slot.height - t.spacing.cell_padding_y,
        );
        let value = row.field(&column.field);
        match &column.kind {
            ColumnKind::Bar { max } => {
                let Some(v) = value.as_f64() else { return };
                let max = max
                    .filter(|m| *m > 0.0)
                    .or_else(|| self.bar_max.get(column.id.as_str()).copied())
                    .unwrap_or(0.0);
                if max <= 0.0 {
                    return;
                }
                let frac = (v / max).clamp(0.0, 1.0);
                let h = inner.height() * 0.6;
                let x1 = inner.x0 + inner.width() * frac;
                let bar = Rect::new(inner.x0, cy - h * 0.5, x1, cy + h * 0.5);
                w.rect(bar, t.colors.interval, 0.0);
            }
            ColumnKind::Sparkline => {
                if let FieldValue::Series(values) = &value
                    && let Some(path) = sparkline(values, inner)
                {
                    w.path(&path, None, Some(Stroke::solid(t.colors.interval, 1.0)));
                }
            }
            ColumnKind::Stars { max } => {
                let Some(v) = value.as_f64() else { return };
                let filled = v.round().clamp(0.0, f64::from(*max));
                let body = t.body_style();
                let font = Font::of(&body);
                for i in 0..*max {
                    let (glyph, color) = if f64::from(i) < filled {
                        ("★", t.colors.foreground)
                    } else {
                        ("☆", t.colors.muted)
                    };
                    let x = inner.x0 + f64::from(i) * STAR_WIDTH;
                    w.text(x, cy, glyph, &font, Anchor::Start, color);
                }
            }
            ColumnKind::Badge => {
                let text = column.cell_text(row);
                if !text.is_empty() {
                    self.pill(w, inner.x0, cy, &text);
                }
            }
            // No network access while exporting; images are left blank.
            ColumnKind::Image | ColumnKind::Unknown(_) => {}
            _ => {
                let text = column.cell_text(row);
                let x = match Anchor::from(geom.align) {
                    Anchor::Start => inner.x0,
                    Anchor::Middle => inner.center().x,
                    Anchor::End => inner.x1,
                };
                let style = if row.kind() == RowKind::Summary || row.style.bold {
                    t.bold_style()
                } else {
                    t.body_style()
                };
                w.text(x, cy, &text, &Font::of(&style), geom.align.into(), t.colors.foreground);
            }
        }
    }

    fn forest(&self, w: &mut SvgWriter, ctx: &PlotContext) {
        let t = self.theme;
        let l = self.layout;
        let scale = l.scale();
        let (top, bottom) = (l.plot_y, l.plot_y + l.plot_height);

        if t.axis.gridlines {
            let grid = Stroke {
                color: t.colors.border,
                width: 1.0,
                style: t.axis.grid_style,
            };
            for &tick in &l.ticks {
                let x = scale.map(tick);
                w.line((x, top), (x, bottom), grid);
            }
        }
        if let Some(x) = l.null_x {
            w.line((x, top), (x, bottom), Stroke::solid(t.colors.null_line, 1.0));
        }
        let small = t.small_style();
        for r in &l.reference_lines {
            let stroke = Stroke {
                color: r.color,
                width: 1.0,
                style: r.style,
            };
            w.line((r.x, top), (r.x, bottom), stroke);
            if let Some(label) = r.label.as_deref() {
                let y = top + line_box(&small, 1.0) * 0.5;
                w.text(r.x + 4.0, y, label, &Font::of(&small), Anchor::Start, r.color);
            }
        }

        let effects = self.spec.data.effects();
        let s = &t.shapes;
        let lw = s.line_width;
        for g in &ctx.geometry {
            let row = match g.display_index {
                Some(i) => match ctx.display_rows.get(i) {
                    Some(DisplayRow::Data { row, .. }) => self.spec.data.rows.get(*row),
                    _ => None,
                },
                None => self.spec.data.overall_summary.as_ref(),
            };
            for iv in &g.intervals {
                let effect = effects.get(iv.effect);
                let base = if iv.diamond.is_some() {
                    t.colors.summary
                } else {
                    t.colors.interval
                };
                let mut color = effect
                    .and_then(|e| e.color)
                    .or_else(|| row.and_then(|r| r.style.color))
                    .unwrap_or(base);
                if let Some(op) = effect.and_then(|e| e.opacity).filter(|o| o.is_finite()) {
                    #[allow(clippy::cast_possible_truncation, reason = "opacity is in [0, 1]")]
                    {
                        color = color.multiply_alpha(op.clamp(0.0, 1.0) as f32);
                    }
                }
                if let Some(path) = iv.diamond_path(s.summary_height * 0.5) {
                    w.path(&path, Some(color), None);
                    continue;
                }
                let stroke = Stroke::solid(color, lw);
                if let Some((x0, x1)) = iv.line {
                    w.line((x0, iv.y), (x1, iv.y), stroke);
                }
                let half = s.whisker_height * 0.5;
                for cap in [iv.lower, iv.upper] {
                    if let BoundCap::Whisker { x } = cap {
                        w.line((x, iv.y - half), (x, iv.y + half), stroke);
                    }
                }
                for arrow in iv.arrow_paths(lw) {
                    w.path(&arrow, Some(color), None);
                }
                if let Some(x) = iv.marker {
                    let shape = effect.and_then(|e| e.shape).unwrap_or_default();
                    w.path(&shape.path(x, iv.y, s.point_size), Some(color), None);
                }
            }
        }
    }

    fn axis(&self, w: &mut SvgWriter) {
        let t = self.theme;
        let l = self.layout;
        let a = &t.axis;
        let y = l.axis_y;
        let stroke = Stroke::solid(t.colors.foreground, 1.0);
        w.line((l.forest_x, y), (l.forest_x + l.forest_width, y), stroke);

        let scale = l.scale();
        let small = t.small_style();
        let label_h = self.measurer.measure("0.1", &small).line_height();
        let label_y = y + a.tick_size.abs() + a.tick_padding.max(0.0) + label_h * 0.5;
        for (tick, label) in l.ticks.iter().zip(&l.tick_labels) {
            let x = scale.map(*tick);
            w.line((x, y), (x, y + a.tick_size.abs()), stroke);
            w.text(x, label_y, label, &Font::of(&small), Anchor::Middle, t.colors.foreground);
        }
        if let Some(text) = self.spec.labels.axis_label.as_deref().filter(|s| !s.is_empty()) {
            let large = t.large_style();
            let h = self.measurer.measure(text, &large).line_height();
            let ty = label_y + label_h * 0.5 + a.title_offset.max(0.0) + h * 0.5;
            let cx = l.forest_x + l.forest_width * 0.5;
            w.text(cx, ty, text, &Font::of(&large), Anchor::Middle, t.colors.foreground);
        }
    }

    fn footer(&self, w: &mut SvgWriter) {
        let t = self.theme;
        let small = t.small_style();
        let h = line_box(&small, t.typography.line_height);
        let mut y = self.layout.footer_y;
        let mut first = true;
        for text in [&self.spec.labels.caption, &self.spec.labels.footnote] {
            let Some(text) = text.as_deref().filter(|s| !s.is_empty()) else {
                continue;
            };
            y += if first { t.spacing.section_gap } else { t.spacing.text_gap };
            first = false;
            let font = Font::of(&small);
            w.text(self.layout.padding, y + h * 0.5, text, &font, Anchor::Start, t.colors.muted);
            y += h;
        }
    }
}

/// Largest value of every bar column without a declared maximum.
fn bar_maxima(spec: &ForestSpec) -> HashMap<&str, f64> {
    let mut out = HashMap::new();
    for column in spec.columns.iter().flat_map(|d| d.leaves()) {
        if !matches!(column.kind, ColumnKind::Bar { max: None }) {
            continue;
        }
        let max = spec
            .data
            .rows
            .iter()
            .chain(&spec.data.overall_summary)
            .filter_map(|r| r.field(&column.field).as_f64())
            .fold(0.0, f64::max);
        out.insert(column.id.as_str(), max);
    }
    out
}

/// A small filled triangle: pointing right when collapsed, down when expanded.
fn chevron(x: f64, cy: f64, collapsed: bool) -> BezPath {
    let s = CHEVRON_WIDTH;
    let h = s * 0.5;
    let mut p = BezPath::new();
    if collapsed {
        p.move_to((x + s * 0.25, cy - h * 0.8));
        p.line_to((x + s * 0.85, cy));
        p.line_to((x + s * 0.25, cy + h * 0.8));
    } else {
        p.move_to((x + s * 0.1, cy - h * 0.45));
        p.line_to((x + s * 0.9, cy - h * 0.45));
        p.line_to((x + s * 0.5, cy + h * 0.55));
    }
    p.close_path();
    p
}

/// A polyline through `values`, scaled to fill `r`.
fn sparkline(values: &[f64], r: Rect) -> Option<BezPath> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.len() < 2 {
        return None;
    }
    let lo = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = if hi > lo { hi - lo } else { 1.0 };
    let dx = r.width() / (finite.len() - 1) as f64;
    let mut p = BezPath::new();
    for (i, v) in finite.iter().enumerate() {
        let pt = (r.x0 + i as f64 * dx, r.y1 - (v - lo) / span * r.height());
        if i == 0 {
            p.move_to(pt);
        } else {
            p.line_to(pt);
        }
    }
    Some(p)
}

#[cfg(test)]
mod tests {
    use kurbo::Shape;

    use super::*;

    #[test]
    fn sparkline_spans_its_cell() {
        let r = Rect::new(10.0, 0.0, 70.0, 20.0);
        let p = sparkline(&[1.0, f64::NAN, 3.0, 2.0], r).expect("three finite values");
        let b = p.bounding_box();
        assert_eq!((b.x0, b.x1, b.y0, b.y1), (10.0, 70.0, 0.0, 20.0));
        assert!(sparkline(&[1.0], r).is_none(), "one point draws nothing");
    }

    #[test]
    fn chevron_points_by_state() {
        let right = chevron(0.0, 10.0, true).bounding_box();
        let down = chevron(0.0, 10.0, false).bounding_box();
        assert!(right.height() > right.width(), "{right:?}");
        assert!(down.width() > down.height(), "{down:?}");
    }
}
