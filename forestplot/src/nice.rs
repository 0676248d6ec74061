// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Nice-domain rounding.
//!
//! Snaps a raw domain outward to round bounds. The result always contains the
//! input: `nice.0 <= min` and `nice.1 >= max`.

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use crate::domain::LOG_EPSILON;
use crate::spec::ScaleKind;

/// Round values used to snap log-scale domains, ascending.
///
/// Dense around 1 where ratio plots spend most of their time.
pub const NICE_LOG_VALUES: &[f64] = &[
    0.001, 0.002, 0.0025, 0.005, 0.01, 0.02, 0.025, 0.05, 0.1, 0.2, 0.25, 0.3, 0.4, 0.5, 0.6, 0.7,
    0.75, 0.8, 0.9, 1.0, 1.1, 1.2, 1.25, 1.5, 2.0, 2.5, 3.0, 4.0, 5.0, 10.0, 20.0, 25.0, 50.0,
    100.0, 200.0, 250.0, 500.0, 1000.0,
];

/// Mantissas of the linear step ladder.
const LINEAR_STEPS: [f64; 5] = [1.0, 2.0, 2.5, 4.0, 5.0];

/// Relative tolerance for treating a quotient as integral.
const NOISE: f64 = 1e-9;

/// Snaps `domain` to nice bounds for `scale`.
///
/// `tick_hint` bounds the number of intervals a linear step may produce
/// (`2..=2 × tick_hint`). Non-finite and zero-span domains pass through; an
/// inverted domain is returned swapped and otherwise untouched.
pub fn nice_domain(domain: (f64, f64), scale: ScaleKind, tick_hint: usize) -> (f64, f64) {
    let (a, b) = domain;
    if !a.is_finite() || !b.is_finite() || a == b {
        return domain;
    }
    if a > b {
        return (b, a);
    }
    match scale {
        ScaleKind::Linear => nice_linear(a, b, tick_hint),
        ScaleKind::Log => nice_log(a, b),
    }
}

/// Snaps a positive log domain to [`NICE_LOG_VALUES`], or to the enclosing
/// power of ten outside the table.
pub fn nice_log(min: f64, max: f64) -> (f64, f64) {
    let min = min.max(LOG_EPSILON);
    let max = max.max(min);
    let lo = NICE_LOG_VALUES
        .iter()
        .rev()
        .copied()
        .find(|&v| v <= min * (1.0 + NOISE))
        .unwrap_or_else(|| 10_f64.powf(min.log10().floor()));
    let hi = NICE_LOG_VALUES
        .iter()
        .copied()
        .find(|&v| v >= max * (1.0 - NOISE))
        .unwrap_or_else(|| 10_f64.powf(max.log10().ceil()));
    (lo.min(min), hi.max(max))
}

/// Snaps a linear domain to multiples of the step that expands it least.
pub fn nice_linear(min: f64, max: f64, tick_hint: usize) -> (f64, f64) {
    let span = max - min;
    if !(span > 0.0) {
        return (min, max);
    }
    let max_intervals = (2 * tick_hint.max(1)) as f64;
    let k_lo = (span / max_intervals).log10().floor() - 1.0;
    let k_hi = (span / 2.0).log10().ceil() + 1.0;

    let mut best: Option<(f64, f64, f64, f64)> = None;
    let mut k = k_lo;
    while k <= k_hi {
        let magnitude = 10_f64.powf(k);
        for mantissa in LINEAR_STEPS {
            let step = mantissa * magnitude;
            let lo = snap_down(min, step);
            let hi = snap_up(max, step);
            let intervals = ((hi - lo) / step).round();
            if !(2.0..=max_intervals.max(2.0)).contains(&intervals) {
                continue;
            }
            let expansion = (hi - lo) - span;
            let better = match best {
                None => true,
                Some((_, _, best_step, best_expansion)) => {
                    let tol = NOISE * span;
                    expansion < best_expansion - tol
                        || ((expansion - best_expansion).abs() <= tol && step > best_step)
                }
            };
            if better {
                best = Some((lo, hi, step, expansion));
            }
        }
        k += 1.0;
    }
    match best {
        Some((lo, hi, _, _)) => (lo.min(min), hi.max(max)),
        None => (min, max),
    }
}

/// `floor(v / step) × step`, treating near-integral quotients as integral.
pub(crate) fn snap_down(v: f64, step: f64) -> f64 {
    let q = v / step;
    let r = q.round();
    let q = if (q - r).abs() < NOISE * r.abs().max(1.0) {
        r
    } else {
        q.floor()
    };
    clean(q * step, step)
}

/// `ceil(v / step) × step`, treating near-integral quotients as integral.
pub(crate) fn snap_up(v: f64, step: f64) -> f64 {
    let q = v / step;
    let r = q.round();
    let q = if (q - r).abs() < NOISE * r.abs().max(1.0) {
        r
    } else {
        q.ceil()
    };
    clean(q * step, step)
}

/// Rounds `v` to the decimals `step` needs, removing accumulated float noise.
pub(crate) fn clean(v: f64, step: f64) -> f64 {
    let d = crate::format::decimals_needed(step);
    if d >= crate::format::MAX_DECIMALS {
        return v;
    }
    let p = 10_f64.powi(i32::from(d));
    let out = (v * p).round() / p;
    // Normalise `-0.0`.
    if out == 0.0 { 0.0 } else { out }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_contains_and_rounds() {
        let (a, b) = nice_linear(-0.37, 1.42, 5);
        assert!(a <= -0.37 && b >= 1.42, "({a}, {b})");
        assert_eq!((a, b), (-0.5, 1.5));
    }

    #[test]
    fn linear_is_exact_on_round_input() {
        assert_eq!(nice_linear(0.0, 10.0, 5), (0.0, 10.0));
        assert_eq!(nice_linear(0.1, 0.3, 5), (0.1, 0.3));
    }

    #[test]
    fn log_snaps_to_table() {
        assert_eq!(nice_log(0.67, 1.12), (0.6, 1.2));
        let (lo, hi) = nice_log(0.0004, 4200.0);
        assert!((lo - 0.0001).abs() < 1e-12, "{lo}");
        assert!((hi - 10_000.0).abs() < 1e-6, "{hi}");
    }

    #[test]
    fn degenerate_inputs_pass_through() {
        assert_eq!(nice_domain((3.0, 3.0), ScaleKind::Linear, 5), (3.0, 3.0));
        assert_eq!(nice_domain((2.0, -1.0), ScaleKind::Linear, 5), (-1.0, 2.0));
        let nan = nice_domain((f64::NAN, 1.0), ScaleKind::Log, 5);
        assert!(nan.0.is_nan() && nan.1 == 1.0, "{nan:?}");
    }
}
