// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interval clipping and mark geometry.
//!
//! For every plotted row and effect this decides where the interval line
//! starts and ends, whether each bound gets a whisker cap or a truncation
//! arrow, and where the point marker (or summary diamond) sits. All positions
//! are clamped into the scale's range, so nothing is drawn outside the plot.

use kurbo::BezPath;
use smallvec::SmallVec;

use crate::scale::ForestScale;
use crate::spec::{Effect, Row, RowKind};
use crate::symbol::summary_diamond;

/// Shortest truncation arrow.
pub const MIN_ARROW_LENGTH: f64 = 6.0;
/// Arrow length per unit of interval line width.
pub const ARROW_LENGTH_PER_LINE_WIDTH: f64 = 4.0;
/// Arrow half-height as a fraction of its length.
pub const ARROW_HALF_HEIGHT_RATIO: f64 = 0.6;

/// Which way a truncation arrow points.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArrowDirection {
    /// Towards smaller values.
    Left,
    /// Towards larger values.
    Right,
}

/// How one end of an interval is drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BoundCap {
    /// No bound value.
    None,
    /// A vertical whisker cap at `x`.
    Whisker {
        /// Pixel position.
        x: f64,
    },
    /// A truncation arrow whose tip is at `x`.
    Arrow {
        /// Pixel position of the tip.
        x: f64,
        /// Pointing direction.
        direction: ArrowDirection,
    },
}

impl BoundCap {
    /// Whether this end is truncated.
    pub fn is_clipped(&self) -> bool {
        matches!(self, Self::Arrow { .. })
    }
}

/// Resolved geometry of one effect on one row.
#[derive(Clone, Debug, PartialEq)]
pub struct IntervalGeometry {
    /// Index into the plot's effects.
    pub effect: usize,
    /// Vertical center in pixels.
    pub y: f64,
    /// Interval line from `.0` to `.1`, when both bounds exist.
    pub line: Option<(f64, f64)>,
    /// Lower end.
    pub lower: BoundCap,
    /// Upper end.
    pub upper: BoundCap,
    /// Point marker center, clamped into the plot. `None` for diamonds.
    pub marker: Option<f64>,
    /// Summary diamond as `(left, center, right)`, clamped into the plot.
    pub diamond: Option<(f64, f64, f64)>,
}

/// Inputs shared by every row.
#[derive(Clone, Copy, Debug)]
pub struct ClipContext {
    /// The x scale (its range is the visible plot span).
    pub scale: ForestScale,
    /// Values outside these bounds are truncated.
    pub clip_bounds: (f64, f64),
    /// Interval line width, which sizes arrows.
    pub line_width: f64,
}

impl ClipContext {
    fn range(&self) -> (f64, f64) {
        let (d0, d1) = self.scale.domain();
        let a = self.scale.map(d0);
        let b = self.scale.map(d1);
        if a <= b { (a, b) } else { (b, a) }
    }

    fn clamp_px(&self, v: f64) -> f64 {
        let (lo, hi) = self.range();
        self.scale.map(v).clamp(lo, hi)
    }

    /// Visible value window: the intersection of the clip bounds and the domain.
    fn window(&self) -> (f64, f64) {
        let (d0, d1) = ordered(self.scale.domain());
        let (c0, c1) = ordered(self.clip_bounds);
        (c0.max(d0), c1.min(d1))
    }

    /// Where the drawn interval ends for a bound at `v`.
    ///
    /// Off-scale bounds end at the plot edge. Bounds on the axis but past the
    /// clip bounds end at the clip bound, so a truncated line never reaches
    /// its true position.
    fn end_px(&self, v: f64) -> f64 {
        let (d0, d1) = ordered(self.scale.domain());
        if v < d0 || v > d1 {
            return self.clamp_px(v);
        }
        let (w0, w1) = self.window();
        if w0 <= w1 {
            self.clamp_px(v.clamp(w0, w1))
        } else {
            self.clamp_px(v)
        }
    }

    fn cap(&self, v: Option<f64>) -> BoundCap {
        let Some(v) = v else {
            return BoundCap::None;
        };
        let (w0, w1) = self.window();
        let x = self.end_px(v);
        if v < w0 - tolerance(w0) {
            BoundCap::Arrow {
                x,
                direction: ArrowDirection::Left,
            }
        } else if v > w1 + tolerance(w1) {
            BoundCap::Arrow {
                x,
                direction: ArrowDirection::Right,
            }
        } else {
            BoundCap::Whisker { x }
        }
    }
}

/// Vertical offsets of `n` effects within a row of `row_height`, evenly spaced and centered.
pub fn effect_offsets(n: usize, row_height: f64) -> SmallVec<[f64; 4]> {
    let gap = row_height / (n as f64 + 1.0);
    let mid = (n as f64 - 1.0) / 2.0;
    (0..n).map(|i| (i as f64 - mid) * gap).collect()
}

/// Resolves every effect of `row`, centered vertically on `y`.
///
/// Effects without a point estimate are skipped. Summary rows (and the
/// overall summary, with `as_summary`) become diamonds that are never
/// truncated.
pub fn resolve_row(
    row: &Row,
    effects: &[Effect],
    y: f64,
    row_height: f64,
    as_summary: bool,
    ctx: &ClipContext,
) -> SmallVec<[IntervalGeometry; 2]> {
    if matches!(row.kind(), RowKind::Header | RowKind::Spacer) {
        return SmallVec::new();
    }
    let summary = as_summary || row.kind() == RowKind::Summary;
    let offsets = effect_offsets(effects.len(), row_height);
    effects
        .iter()
        .zip(offsets)
        .enumerate()
        .filter_map(|(i, (effect, dy))| {
            let est = effect.estimate(row);
            let point = est.point?;
            let y = y + dy;
            if summary {
                let x0 = ctx.clamp_px(est.lower.unwrap_or(point));
                let cx = ctx.clamp_px(point);
                let x1 = ctx.clamp_px(est.upper.unwrap_or(point));
                return Some(IntervalGeometry {
                    effect: i,
                    y,
                    line: None,
                    lower: BoundCap::None,
                    upper: BoundCap::None,
                    marker: None,
                    diamond: Some((x0.min(cx), cx, x1.max(cx))),
                });
            }
            let lower = ctx.cap(est.lower);
            let upper = ctx.cap(est.upper);
            let line = match (est.lower, est.upper) {
                (Some(lo), Some(hi)) => Some((ctx.end_px(lo), ctx.end_px(hi))),
                _ => None,
            };
            Some(IntervalGeometry {
                effect: i,
                y,
                line,
                lower,
                upper,
                marker: Some(ctx.clamp_px(point)),
                diamond: None,
            })
        })
        .collect()
}

/// Length of truncation arrows for an interval of `line_width`.
pub fn arrow_length(line_width: f64) -> f64 {
    MIN_ARROW_LENGTH.max(ARROW_LENGTH_PER_LINE_WIDTH * line_width)
}

/// A filled arrowhead with its tip at `(x, y)`.
pub fn arrow_path(x: f64, y: f64, direction: ArrowDirection, line_width: f64) -> BezPath {
    let len = arrow_length(line_width);
    let half = len * ARROW_HALF_HEIGHT_RATIO;
    let back = match direction {
        ArrowDirection::Left => x + len,
        ArrowDirection::Right => x - len,
    };
    let mut p = BezPath::new();
    p.move_to((x, y));
    p.line_to((back, y - half));
    p.line_to((back, y + half));
    p.close_path();
    p
}

impl IntervalGeometry {
    /// The summary diamond path, if this is a summary.
    pub fn diamond_path(&self, half_height: f64) -> Option<BezPath> {
        let (x0, cx, x1) = self.diamond?;
        Some(summary_diamond(x0, cx, x1, self.y, half_height))
    }

    /// Arrowhead paths for truncated ends.
    pub fn arrow_paths(&self, line_width: f64) -> SmallVec<[BezPath; 2]> {
        [self.lower, self.upper]
            .into_iter()
            .filter_map(|cap| match cap {
                BoundCap::Arrow { x, direction } => {
                    Some(arrow_path(x, self.y, direction, line_width))
                }
                _ => None,
            })
            .collect()
    }
}

fn ordered((a, b): (f64, f64)) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

fn tolerance(v: f64) -> f64 {
    1e-9 * v.abs().max(1.0)
}

#[cfg(test)]
mod tests {
    use kurbo::Shape;

    use super::*;
    use crate::spec::ScaleKind;

    fn ctx(domain: (f64, f64), clip: (f64, f64)) -> ClipContext {
        ClipContext {
            scale: ForestScale::new(ScaleKind::Linear, domain, (100.0, 300.0)),
            clip_bounds: clip,
            line_width: 1.5,
        }
    }

    #[test]
    fn far_bounds_become_arrows_at_the_edge() {
        let c = ctx((0.0, 1.0), (0.2, 0.8));
        let row = Row::new("a", "A", Some(0.5), Some(0.3), Some(50.0));
        let g = &resolve_row(&row, &[Effect::primary()], 10.0, 20.0, false, &c)[0];
        assert_eq!(g.lower, BoundCap::Whisker { x: 160.0 });
        assert_eq!(
            g.upper,
            BoundCap::Arrow {
                x: 300.0,
                direction: ArrowDirection::Right
            }
        );
        assert_eq!(g.line, Some((160.0, 300.0)));
    }

    #[test]
    fn on_scale_truncation_ends_at_the_clip_bound() {
        let c = ctx((-1.0, 1.0), (-0.5, 1.0));
        let row = Row::new("a", "A", Some(0.0), Some(-0.8), Some(0.5));
        let g = &resolve_row(&row, &[Effect::primary()], 10.0, 20.0, false, &c)[0];
        assert_eq!(
            g.lower,
            BoundCap::Arrow {
                x: 150.0,
                direction: ArrowDirection::Left
            },
            "arrow sits where the visible line stops"
        );
        assert_eq!(g.line, Some((150.0, 250.0)), "line stops at the clip bound");
    }

    #[test]
    fn markers_are_clamped() {
        let c = ctx((0.0, 1.0), (0.0, 1.0));
        let row = Row::new("a", "A", Some(-3.0), Some(-4.0), Some(-2.0));
        let g = &resolve_row(&row, &[Effect::primary()], 10.0, 20.0, false, &c)[0];
        assert_eq!(g.marker, Some(100.0));
        assert!(g.lower.is_clipped() && g.upper.is_clipped(), "{g:?}");
    }

    #[test]
    fn summaries_are_never_clipped() {
        let c = ctx((0.0, 1.0), (0.2, 0.8));
        let row = Row::new("s", "Overall", Some(0.5), Some(-1.0), Some(0.9))
            .with_kind(RowKind::Summary);
        let g = &resolve_row(&row, &[Effect::primary()], 10.0, 20.0, false, &c)[0];
        assert_eq!(g.lower, BoundCap::None);
        assert_eq!(g.diamond, Some((100.0, 200.0, 280.0)));
        assert!(g.arrow_paths(1.5).is_empty(), "no arrows on diamonds");
    }

    #[test]
    fn effects_are_spread_evenly() {
        let o = effect_offsets(3, 40.0);
        assert_eq!(o.as_slice(), [-10.0, 0.0, 10.0]);
        assert_eq!(effect_offsets(1, 40.0).as_slice(), [0.0]);
    }

    #[test]
    fn arrows_scale_with_line_width() {
        assert_eq!(arrow_length(1.0), MIN_ARROW_LENGTH);
        assert_eq!(arrow_length(3.0), 12.0);
        let b = arrow_path(50.0, 10.0, ArrowDirection::Right, 3.0).bounding_box();
        assert_eq!((b.x0, b.x1), (38.0, 50.0));
        assert!((b.height() - 2.0 * 0.6 * 12.0).abs() < 1e-9, "{b:?}");
    }
}
