// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! X-axis domain calculation.
//!
//! The raw (not yet niced) domain is derived from point estimates, the null
//! value and those interval bounds that stay within the truncation limit.
//! Truncation and padding work in data units on both scales, with
//! non-positive log results floored to [`LOG_EPSILON`]. Only the symmetric
//! mirror runs in log space, so it is geometric on log axes.

extern crate alloc;

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use crate::axis::{AxisConfig, Symmetric};
use crate::spec::{Effect, Row, ScaleKind};

/// Floor applied to non-positive values on log axes.
pub const LOG_EPSILON: f64 = 0.001;

/// Domain used on linear axes when there is no finite estimate.
pub const LINEAR_FALLBACK_DOMAIN: (f64, f64) = (0.0, 1.0);

/// Domain used on log axes when there is no positive estimate.
pub const LOG_FALLBACK_DOMAIN: (f64, f64) = (0.1, 10.0);

/// The result of domain calculation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DomainResult {
    /// Display domain before nicing, `domain.0 < domain.1`.
    pub domain: (f64, f64),
    /// Values outside these bounds are drawn clipped (arrows).
    pub clip_bounds: (f64, f64),
    /// The domain was mirrored around the null value.
    pub symmetric: bool,
    /// No usable estimate existed; a fixed fallback was used.
    pub fallback: bool,
}

#[derive(Clone, Copy)]
struct Space(ScaleKind);

impl Space {
    /// Whether `v` can be placed on the axis.
    fn plottable(self, v: f64) -> bool {
        v.is_finite() && (self.0 == ScaleKind::Linear || v > 0.0)
    }

    /// Into the space where mirroring is arithmetic. `v` must be plottable.
    fn forward(self, v: f64) -> f64 {
        match self.0 {
            ScaleKind::Linear => v,
            ScaleKind::Log => v.ln(),
        }
    }

    fn back(self, t: f64) -> f64 {
        match self.0 {
            ScaleKind::Linear => t,
            ScaleKind::Log => t.exp(),
        }
    }

    fn pin(self, v: f64) -> f64 {
        match self.0 {
            ScaleKind::Linear => v,
            ScaleKind::Log => v.max(LOG_EPSILON),
        }
    }
}

/// Computes the x domain.
///
/// `rows` should include every row that is plotted (summary rows and the
/// overall summary included); each row is read through every effect.
pub fn calculate_domain<'a>(
    rows: impl IntoIterator<Item = &'a Row>,
    effects: &[Effect],
    axis: &AxisConfig,
    scale: ScaleKind,
    null_value: f64,
) -> DomainResult {
    let space = Space(scale);
    let explicit_min = axis.range_min.filter(|v| v.is_finite()).map(|v| space.pin(v));
    let explicit_max = axis.range_max.filter(|v| v.is_finite()).map(|v| space.pin(v));

    if let (Some(a), Some(b)) = (explicit_min, explicit_max) {
        let domain = if a <= b { (a, b) } else { (b, a) };
        return DomainResult {
            domain,
            clip_bounds: domain,
            symmetric: false,
            fallback: false,
        };
    }

    let mut core: Option<(f64, f64)> = None;
    let mut bounds = Vec::new();
    for row in rows {
        for effect in effects {
            let est = effect.estimate(row);
            if let Some(p) = est.point.filter(|&p| space.plottable(p)) {
                core = Some(core.map_or((p, p), |(lo, hi)| (lo.min(p), hi.max(p))));
            }
            bounds.extend(est.lower.filter(|v| v.is_finite()));
            bounds.extend(est.upper.filter(|v| v.is_finite()));
        }
    }
    let null = Some(null_value).filter(|&n| space.plottable(n));

    let Some((points_min, points_max)) = core else {
        log::debug!("no usable estimates; using the {scale:?} fallback domain");
        let (fa, fb) = match scale {
            ScaleKind::Linear => LINEAR_FALLBACK_DOMAIN,
            ScaleKind::Log => LOG_FALLBACK_DOMAIN,
        };
        let a = explicit_min.filter(|&a| a < fb).unwrap_or(fa);
        let b = explicit_max.filter(|&b| b > a).unwrap_or(fb.max(a + (fb - fa)));
        return DomainResult {
            domain: (a, b),
            clip_bounds: (a, b),
            symmetric: false,
            fallback: true,
        };
    };

    let (mut core_min, mut core_max) = (points_min, points_max);
    if axis.include_null
        && let Some(n) = null
    {
        core_min = core_min.min(n);
        core_max = core_max.max(n);
    }

    // Truncation and padding are measured in data units on both scales.
    let span = core_max - core_min;
    let estimate_range = if span > 0.0 { span } else { 1.0 };
    let limit = estimate_range * axis.truncation_threshold();

    let (mut lo, mut hi) = (core_min, core_max);
    for &v in &bounds {
        if v < core_min && core_min - v <= limit {
            lo = lo.min(v);
        } else if v > core_max && v - core_max <= limit {
            hi = hi.max(v);
        }
    }
    let (lo, hi) = (space.pin(lo), space.pin(hi));
    let pad = estimate_range * axis.padding_fraction();

    let mirror = match (axis.symmetric, null) {
        _ if explicit_min.is_some() || explicit_max.is_some() => None,
        (Symmetric::Forbid, _) | (_, None) => None,
        (Symmetric::Force, Some(n)) => Some(n),
        (Symmetric::Auto, Some(n)) => (points_min < n && points_max > n).then_some(n),
    };

    let (domain, clip_bounds) = if let Some(n) = mirror {
        // Mirroring is geometric on log axes.
        let n = space.forward(n);
        let (core_lo, core_hi) = (space.forward(core_min), space.forward(core_max));
        let d = (core_lo - n).abs().max((core_hi - n).abs());
        let pad_t = match scale {
            ScaleKind::Linear => pad,
            ScaleKind::Log => {
                let span_t = core_hi - core_lo;
                (if span_t > 0.0 { span_t } else { 1.0 }) * axis.padding_fraction()
            }
        };
        let half = d + pad_t;
        let (dom_lo, dom_hi) = (n - half, n + half);
        // Admitted bounds stay visible up to the mirrored domain edge.
        let clip_lo = space.forward(lo).max(dom_lo).min(n - d);
        let clip_hi = space.forward(hi).min(dom_hi).max(n + d);
        (
            (space.back(dom_lo), space.back(dom_hi)),
            (space.back(clip_lo), space.back(clip_hi)),
        )
    } else {
        let mut a = explicit_min.unwrap_or_else(|| space.pin(lo - pad));
        let mut b = explicit_max.unwrap_or(hi + pad);
        if a >= b {
            // A single pinned side landed beyond the data; keep the pin.
            if explicit_min.is_some() {
                b = a + estimate_range;
            } else {
                a = space.pin(b - estimate_range);
                if a >= b {
                    a = b / 10.0;
                }
            }
        }
        ((a, b), (lo, hi))
    };

    DomainResult {
        domain,
        clip_bounds,
        symmetric: mirror.is_some(),
        fallback: false,
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    fn rows(points: &[(f64, f64, f64)]) -> Vec<Row> {
        points
            .iter()
            .enumerate()
            .map(|(i, &(p, l, u))| {
                Row::new(alloc::format!("r{i}"), "", Some(p), Some(l), Some(u))
            })
            .collect()
    }

    fn primary() -> Vec<Effect> {
        vec![Effect::primary()]
    }

    #[test]
    fn explicit_range_is_returned_verbatim() {
        let r = rows(&[(100.0, 90.0, 110.0)]);
        let axis = AxisConfig::default().with_range(0.5, 1.5);
        let out = calculate_domain(&r, &primary(), &axis, ScaleKind::Log, 1.0);
        assert_eq!(out.domain, (0.5, 1.5));
        assert_eq!(out.clip_bounds, (0.5, 1.5));
    }

    #[test]
    fn no_estimates_fall_back() {
        let r = vec![Row::new("a", "", None, None, None)];
        let lin = calculate_domain(&r, &primary(), &AxisConfig::default(), ScaleKind::Linear, 0.0);
        assert!(lin.fallback, "linear fallback flag");
        assert_eq!(lin.domain, LINEAR_FALLBACK_DOMAIN);
        let neg = rows(&[(-1.0, -2.0, 0.5)]);
        let log = calculate_domain(&neg, &primary(), &AxisConfig::default(), ScaleKind::Log, 1.0);
        assert_eq!(log.domain, LOG_FALLBACK_DOMAIN);
    }

    #[test]
    fn far_bounds_are_excluded() {
        let r = rows(&[(0.5, 0.4, 0.6), (0.8, 0.7, 50.0)]);
        let axis = AxisConfig::default().with_include_null(false);
        let out = calculate_domain(&r, &primary(), &axis, ScaleKind::Linear, 0.0);
        assert!(out.domain.1 < 2.0, "domain {:?} chased the outlier", out.domain);
        assert!((out.clip_bounds.0 - 0.4).abs() < 1e-12, "{:?}", out.clip_bounds);
        assert!((out.clip_bounds.1 - 0.8).abs() < 1e-12, "{:?}", out.clip_bounds);
    }

    #[test]
    fn padding_is_skipped_on_a_pinned_side() {
        let r = rows(&[(1.0, 0.5, 1.5)]);
        let axis = AxisConfig::default().with_range_min(-1.0);
        let out = calculate_domain(&r, &primary(), &axis, ScaleKind::Linear, 0.0);
        assert_eq!(out.domain.0, -1.0);
        assert!(out.domain.1 > 1.5, "{:?}", out.domain);
    }

    #[test]
    fn auto_symmetric_needs_points_on_both_sides() {
        let both = rows(&[(-0.5, -0.6, -0.4), (0.2, 0.1, 0.3)]);
        let out = calculate_domain(&both, &primary(), &AxisConfig::default(), ScaleKind::Linear, 0.0);
        assert!(out.symmetric, "points straddle null");
        assert!((out.domain.0 + out.domain.1).abs() < 1e-12, "{:?}", out.domain);

        let one_side = rows(&[(0.5, 0.4, 0.6), (0.2, 0.1, 0.3)]);
        let out =
            calculate_domain(&one_side, &primary(), &AxisConfig::default(), ScaleKind::Linear, 0.0);
        assert!(!out.symmetric, "one-sided points");
    }

    #[test]
    fn log_symmetry_is_geometric() {
        let r = rows(&[(0.5, 0.45, 0.55), (1.5, 1.4, 1.6)]);
        let out = calculate_domain(&r, &primary(), &AxisConfig::default(), ScaleKind::Log, 1.0);
        assert!(out.symmetric, "straddles 1");
        assert!((out.domain.0 * out.domain.1 - 1.0).abs() < 1e-9, "{:?}", out.domain);
    }

    #[test]
    fn mirrored_clip_bounds_reach_the_domain_edge() {
        let r = rows(&[(-0.1, -1.5, 0.0), (1.0, 0.9, 1.1), (0.5, -1.05, 0.6)]);
        let out = calculate_domain(&r, &primary(), &AxisConfig::default(), ScaleKind::Linear, 0.0);
        assert!(out.symmetric, "points straddle null");
        let (c0, c1) = out.clip_bounds;
        assert!(c0 <= -1.05, "on-axis bound truncated by {:?}", out.clip_bounds);
        assert!(c0 >= out.domain.0 && c1 <= out.domain.1, "{out:?}");
        assert!((c1 - 1.1).abs() < 1e-12, "{:?}", out.clip_bounds);
    }

    #[test]
    fn log_truncation_is_measured_in_data_units() {
        let r = rows(&[(0.5, 0.4, 0.6), (2.0, 1.8, 20.0)]);
        let axis = AxisConfig::default().with_symmetric(Symmetric::Forbid);
        let out = calculate_domain(&r, &primary(), &axis, ScaleKind::Log, 1.0);
        // Limit is 1.5 × 2 = 3 above the core maximum of 2.
        assert!((out.clip_bounds.1 - 2.0).abs() < 1e-12, "{:?}", out.clip_bounds);
        assert!((out.clip_bounds.0 - 0.4).abs() < 1e-12, "{:?}", out.clip_bounds);
        assert!((out.domain.0 - 0.25).abs() < 1e-12, "{:?}", out.domain);
        assert!((out.domain.1 - 2.15).abs() < 1e-12, "{:?}", out.domain);
    }

    #[test]
    fn log_padding_below_zero_is_floored() {
        let r = rows(&[(0.1, 0.05, 0.2), (3.0, 2.5, 3.5)]);
        let axis = AxisConfig::default().with_symmetric(Symmetric::Forbid);
        let out = calculate_domain(&r, &primary(), &axis, ScaleKind::Log, 1.0);
        assert_eq!(out.domain.0, LOG_EPSILON, "{:?}", out.domain);
        assert!(out.domain.1 > 3.5, "{:?}", out.domain);
    }

    #[test]
    fn forbid_disables_mirroring() {
        let r = rows(&[(-0.5, -0.6, -0.4), (0.2, 0.1, 0.3)]);
        let axis = AxisConfig::default().with_symmetric(Symmetric::Forbid);
        let out = calculate_domain(&r, &primary(), &axis, ScaleKind::Linear, 0.0);
        assert!(!out.symmetric, "forbidden");
    }
}
