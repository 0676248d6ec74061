// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis tick generation.
//!
//! Candidates come from the scale's natural generator (or from explicit tick
//! values) and are thinned by walking outward from the null value on each
//! side, so that resizing the plot grows and shrinks both halves evenly.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use crate::axis::AxisConfig;
use crate::domain::LOG_EPSILON;
use crate::format::format_tick;
use crate::scale::ForestScale;
use crate::spec::ScaleKind;

/// Approximate tick count for a plot `width` pixels wide.
///
/// Uses the configured tick count, else one tick per `min_tick_spacing`.
pub fn tick_hint(axis: &AxisConfig, width: f64) -> usize {
    if let Some(n) = axis.tick_count.filter(|&n| n > 0) {
        return n;
    }
    let spacing = axis.tick_spacing();
    if spacing <= 0.0 || !width.is_finite() || width <= 0.0 {
        return 5;
    }
    let n = (width / spacing).floor().clamp(2.0, 100.0);
    #[allow(clippy::cast_possible_truncation, reason = "clamped to 2..=100")]
    {
        n as usize
    }
}

/// Generates tick values for a niced `domain` drawn `width` pixels wide.
///
/// Always returns at least two ticks for a non-degenerate domain; on log axes
/// every tick is strictly positive.
pub fn generate_ticks(
    domain: (f64, f64),
    scale: ScaleKind,
    axis: &AxisConfig,
    width: f64,
    null_value: f64,
) -> Vec<f64> {
    let (lo, hi) = if domain.0 <= domain.1 {
        domain
    } else {
        (domain.1, domain.0)
    };
    let valid = |v: f64| v.is_finite() && (scale == ScaleKind::Linear || v > 0.0);
    let inside = |v: f64| valid(v) && v >= lo - tolerance(lo, v) && v <= hi + tolerance(hi, v);
    let null_in = inside(null_value);

    let mut ticks: Vec<f64> = if let Some(explicit) = &axis.tick_values {
        let mut out: Vec<f64> = explicit.iter().copied().filter(|&v| inside(v)).collect();
        if axis.null_tick && null_in {
            out.push(null_value);
        }
        out
    } else {
        natural_ticks((lo, hi), scale, axis, width, null_value, null_in, &inside)
    };

    if ticks.len() < 2 {
        for edge in [lo, hi] {
            let edge = if scale == ScaleKind::Log {
                edge.max(LOG_EPSILON)
            } else {
                edge
            };
            if valid(edge) && !ticks.iter().any(|&t| approx_eq(t, edge)) {
                ticks.push(edge);
            }
        }
    }

    ticks.sort_by(f64::total_cmp);
    ticks.dedup_by(|a, b| approx_eq(*a, *b));
    ticks
}

fn natural_ticks(
    (lo, hi): (f64, f64),
    scale: ScaleKind,
    axis: &AxisConfig,
    width: f64,
    null_value: f64,
    null_in: bool,
    inside: &dyn Fn(f64) -> bool,
) -> Vec<f64> {
    let width = if width.is_finite() { width.max(0.0) } else { 0.0 };
    let s = ForestScale::new(scale, (lo, hi), (0.0, width));
    let candidates: Vec<f64> = s
        .candidates(tick_hint(axis, width))
        .into_iter()
        .filter(|&v| inside(v))
        .collect();

    let null_candidate = candidates.iter().any(|&v| approx_eq(v, null_value));
    let keep_null = null_candidate || (axis.include_null && axis.null_tick && null_in);

    // Nearest to null first on each side.
    let mut below: Vec<f64> = candidates
        .iter()
        .copied()
        .filter(|&v| v < null_value && !approx_eq(v, null_value))
        .collect();
    below.reverse();
    let above: Vec<f64> = candidates
        .iter()
        .copied()
        .filter(|&v| v > null_value && !approx_eq(v, null_value))
        .collect();

    let spacing = axis.tick_spacing();
    let anchor = if keep_null {
        Some((s.map(null_value), spacing))
    } else if null_in {
        Some((s.map(null_value), spacing * 0.5))
    } else {
        None
    };

    let mut out = Vec::with_capacity(candidates.len());
    if keep_null {
        out.push(null_value);
    }
    for side in [below, above] {
        walk(&side, &s, anchor, spacing, &mut out);
    }
    out
}

/// Keeps ticks from `side` (nearest first) at least `spacing` pixels apart.
///
/// Without an anchor the first candidate is always kept.
fn walk(
    side: &[f64],
    scale: &ForestScale,
    anchor: Option<(f64, f64)>,
    spacing: f64,
    out: &mut Vec<f64>,
) {
    let mut last = anchor;
    for &v in side {
        let px = scale.map(v);
        let keep = match last {
            None => true,
            Some((last_px, required)) => (px - last_px).abs() >= required - 1e-9,
        };
        if keep {
            out.push(v);
            last = Some((px, spacing));
        }
    }
}

/// Formats tick labels; linear decimals follow the smallest tick gap.
pub fn tick_labels(ticks: &[f64], scale: ScaleKind) -> Vec<String> {
    let step = ticks
        .windows(2)
        .map(|w| w[1] - w[0])
        .filter(|d| *d > 0.0)
        .fold(f64::INFINITY, f64::min);
    let step = if step.is_finite() { step } else { 0.0 };
    ticks.iter().map(|&v| format_tick(v, scale, step)).collect()
}

fn tolerance(a: f64, b: f64) -> f64 {
    1e-9 * a.abs().max(b.abs()) + 1e-12
}

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= tolerance(a, b)
}
