// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Marker shapes for point estimates.

use kurbo::{BezPath, Circle, Shape};

/// A small set of marker shapes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Symbol {
    /// A square (axis-aligned). The conventional forest-plot marker.
    #[default]
    Square,
    /// A circle.
    Circle,
    /// A diamond (square rotated by 45°).
    Diamond,
    /// An upward-pointing triangle.
    Triangle,
}

impl Symbol {
    /// Returns a path for this symbol centered at `cx, cy`, using `size` as the diameter/side.
    pub fn path(self, cx: f64, cy: f64, size: f64) -> BezPath {
        let size = size.max(0.0);
        match self {
            Self::Square => square_path(cx, cy, size),
            Self::Circle => circle_path(cx, cy, size),
            Self::Diamond => diamond_path(cx, cy, size * 0.5, size * 0.5, size * 0.5),
            Self::Triangle => triangle_path(cx, cy, size),
        }
    }
}

/// A diamond spanning `x0..x1` horizontally, `half_height` above and below `cy`, with its
/// widest point at `cx`.
///
/// Summary rows use this with `cx` at the point estimate and `x0`/`x1` at the interval bounds.
pub fn summary_diamond(x0: f64, cx: f64, x1: f64, cy: f64, half_height: f64) -> BezPath {
    let mut p = BezPath::new();
    p.move_to((x0, cy));
    p.line_to((cx, cy - half_height));
    p.line_to((x1, cy));
    p.line_to((cx, cy + half_height));
    p.close_path();
    p
}

fn square_path(cx: f64, cy: f64, size: f64) -> BezPath {
    let half = size * 0.5;
    let x0 = cx - half;
    let y0 = cy - half;
    let x1 = cx + half;
    let y1 = cy + half;
    let mut p = BezPath::new();
    p.move_to((x0, y0));
    p.line_to((x1, y0));
    p.line_to((x1, y1));
    p.line_to((x0, y1));
    p.close_path();
    p
}

fn circle_path(cx: f64, cy: f64, size: f64) -> BezPath {
    let r = size * 0.5;
    let circle = Circle::new((cx, cy), r);
    let tolerance = 0.1;
    circle.path_elements(tolerance).collect()
}

fn diamond_path(cx: f64, cy: f64, half_w_left: f64, half_w_right: f64, half_h: f64) -> BezPath {
    summary_diamond(cx - half_w_left, cx, cx + half_w_right, cy, half_h)
}

fn triangle_path(cx: f64, cy: f64, size: f64) -> BezPath {
    let half = size * 0.5;
    let mut p = BezPath::new();
    p.move_to((cx, cy - half));
    p.line_to((cx + half, cy + half));
    p.line_to((cx - half, cy + half));
    p.close_path();
    p
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_are_centered_on_the_anchor() {
        for symbol in [
            Symbol::Square,
            Symbol::Circle,
            Symbol::Diamond,
            Symbol::Triangle,
        ] {
            let b = symbol.path(50.0, 20.0, 10.0).bounding_box();
            assert!(
                (b.center().x - 50.0).abs() < 0.05,
                "{symbol:?} not centered: {b:?}"
            );
            assert!((b.width() - 10.0).abs() < 0.05, "{symbol:?} width: {b:?}");
        }
    }

    #[test]
    fn summary_diamond_spans_its_interval() {
        let b = summary_diamond(10.0, 25.0, 60.0, 5.0, 4.0).bounding_box();
        assert!((b.x0 - 10.0).abs() < 1e-9, "left tip: {b:?}");
        assert!((b.x1 - 60.0).abs() < 1e-9, "right tip: {b:?}");
        assert!((b.height() - 8.0).abs() < 1e-9, "height: {b:?}");
    }
}
