// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! X-axis scales.
//!
//! A scale maps axis values into horizontal pixel positions and knows its
//! natural candidate ticks. Mapping never yields NaN or infinities: zero spans
//! map to the range start and non-positive log inputs are floored.

extern crate alloc;

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use crate::domain::LOG_EPSILON;
use crate::nice::{NICE_LOG_VALUES, clean, snap_down, snap_up};
use crate::spec::ScaleKind;

/// Candidate tick cap, whatever the domain.
const MAX_CANDIDATES: usize = 10_000;

/// A linear mapping from a continuous domain to a continuous range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleLinear {
    domain: (f64, f64),
    range: (f64, f64),
}

impl ScaleLinear {
    /// Creates a new scale mapping `domain` values to `range` values.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Maps a value from domain space into range space.
    pub fn map(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = d1 - d0;
        if denom == 0.0 || !denom.is_finite() || !x.is_finite() {
            return r0;
        }
        let t = (x - d0) / denom;
        r0 + t * (r1 - r0)
    }

    /// Maps a range position back into domain space.
    pub fn invert(&self, px: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = r1 - r0;
        if denom == 0.0 {
            return d0;
        }
        d0 + (px - r0) / denom * (d1 - d0)
    }

    /// The configured domain.
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Nice-step ticks covering the domain, roughly `count` of them.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (lo, hi) = ordered(self.domain);
        let step = tick_step(lo, hi, count);
        if step == 0.0 {
            return alloc::vec![lo];
        }
        let start = snap_up(lo, step);
        let n = ((snap_down(hi, step) - start) / step).round();
        if !(n >= 0.0) {
            return Vec::new();
        }
        #[allow(
            clippy::cast_possible_truncation,
            reason = "guarded by the non-negative check and capped"
        )]
        let n = n.min(MAX_CANDIDATES as f64) as usize;
        (0..=n)
            .map(|i| clean(start + i as f64 * step, step))
            .collect()
    }
}

/// A log mapping from a positive domain to a range.
///
/// The base cancels out of the mapping; natural logs are used throughout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleLog {
    domain: (f64, f64),
    range: (f64, f64),
}

impl ScaleLog {
    /// Creates a new log scale. Non-positive domain ends are floored to [`LOG_EPSILON`].
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            domain: (floor_log(domain.0), floor_log(domain.1)),
            range,
        }
    }

    /// Maps a value from domain space into range space.
    pub fn map(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if !x.is_finite() {
            return r0;
        }
        let ld0 = d0.ln();
        let denom = d1.ln() - ld0;
        if denom == 0.0 || !denom.is_finite() {
            return r0;
        }
        let x = floor_log(x);
        let t = (x.ln() - ld0) / denom;
        r0 + t * (r1 - r0)
    }

    /// Maps a range position back into domain space.
    pub fn invert(&self, px: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = r1 - r0;
        if denom == 0.0 {
            return d0;
        }
        let t = (px - r0) / denom;
        (d0.ln() + t * (d1.ln() - d0.ln())).exp()
    }

    /// The configured domain.
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Natural ticks: [`NICE_LOG_VALUES`] and powers of ten inside the domain.
    pub fn ticks(&self) -> Vec<f64> {
        let (lo, hi) = ordered(self.domain);
        let inside = |v: f64| v >= lo * (1.0 - 1e-9) && v <= hi * (1.0 + 1e-9);
        let mut out: Vec<f64> = NICE_LOG_VALUES.iter().copied().filter(|&v| inside(v)).collect();

        let table_lo = NICE_LOG_VALUES[0];
        let table_hi = NICE_LOG_VALUES[NICE_LOG_VALUES.len() - 1];
        let e_lo = lo.log10().floor().max(-300.0);
        let e_hi = hi.log10().ceil().min(300.0);
        let mut e = e_lo;
        while e <= e_hi && out.len() < MAX_CANDIDATES {
            let v = 10_f64.powf(e);
            if (v < table_lo || v > table_hi) && inside(v) {
                out.push(v);
            }
            e += 1.0;
        }
        out.sort_by(f64::total_cmp);
        out
    }
}

/// The forest plot's x scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ForestScale {
    /// Linear scale.
    Linear(ScaleLinear),
    /// Log scale.
    Log(ScaleLog),
}

impl ForestScale {
    /// Creates a scale of `kind`.
    pub fn new(kind: ScaleKind, domain: (f64, f64), range: (f64, f64)) -> Self {
        match kind {
            ScaleKind::Linear => Self::Linear(ScaleLinear::new(domain, range)),
            ScaleKind::Log => Self::Log(ScaleLog::new(domain, range)),
        }
    }

    /// The scale kind.
    pub fn kind(&self) -> ScaleKind {
        match self {
            Self::Linear(_) => ScaleKind::Linear,
            Self::Log(_) => ScaleKind::Log,
        }
    }

    /// Maps a value from domain space into range space.
    pub fn map(&self, x: f64) -> f64 {
        match self {
            Self::Linear(s) => s.map(x),
            Self::Log(s) => s.map(x),
        }
    }

    /// Maps a range position back into domain space.
    pub fn invert(&self, px: f64) -> f64 {
        match self {
            Self::Linear(s) => s.invert(px),
            Self::Log(s) => s.invert(px),
        }
    }

    /// The configured domain.
    pub fn domain(&self) -> (f64, f64) {
        match self {
            Self::Linear(s) => s.domain(),
            Self::Log(s) => s.domain(),
        }
    }

    /// Candidate ticks from the scale's natural generator.
    pub fn candidates(&self, count: usize) -> Vec<f64> {
        match self {
            Self::Linear(s) => s.ticks(count),
            Self::Log(s) => s.ticks(),
        }
    }
}

/// A 1-2-5 tick step giving roughly `count` intervals over `[min, max]`.
///
/// Returns 0 for empty or degenerate inputs.
pub fn tick_step(min: f64, max: f64, count: usize) -> f64 {
    let span = (max - min).abs();
    if count == 0 || !span.is_finite() || span == 0.0 {
        return 0.0;
    }
    nice_step(span / count as f64)
}

fn nice_step(step: f64) -> f64 {
    if !step.is_finite() || step <= 0.0 {
        return 0.0;
    }
    let power = step.log10().floor();
    let base = 10_f64.powf(power);
    let error = step / base;
    let nice = if error >= 7.5 {
        10.0
    } else if error >= 3.5 {
        5.0
    } else if error >= 1.5 {
        2.0
    } else {
        1.0
    };
    nice * base
}

fn ordered((a, b): (f64, f64)) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

fn floor_log(x: f64) -> f64 {
    if x > 0.0 { x } else { LOG_EPSILON }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_maps_and_inverts() {
        let s = ScaleLinear::new((-1.0, 1.0), (100.0, 300.0));
        assert_eq!(s.map(0.0), 200.0);
        assert!((s.invert(250.0) - 0.5).abs() < 1e-12, "invert");
    }

    #[test]
    fn zero_span_maps_to_range_start() {
        let s = ScaleLinear::new((2.0, 2.0), (10.0, 90.0));
        assert_eq!(s.map(2.0), 10.0);
        assert_eq!(s.map(f64::NAN), 10.0);
    }

    #[test]
    fn log_scale_maps_endpoints_to_range() {
        let s = ScaleLog::new((1.0, 100.0), (0.0, 10.0));
        assert!((s.map(1.0) - 0.0).abs() < 1e-9, "min");
        assert!((s.map(100.0) - 10.0).abs() < 1e-9, "max");
        assert!((s.map(10.0) - 5.0).abs() < 1e-9, "mid");
    }

    #[test]
    fn log_floors_non_positive_inputs() {
        let s = ScaleLog::new((0.0, 10.0), (0.0, 100.0));
        assert!(s.map(-5.0).is_finite(), "non-positive input");
        assert_eq!(s.domain().0, LOG_EPSILON);
    }

    #[test]
    fn linear_ticks_are_clean() {
        let s = ScaleLinear::new((0.0, 1.0), (0.0, 1.0));
        assert_eq!(s.ticks(10)[3], 0.3);
    }

    #[test]
    fn log_ticks_come_from_table_and_decades() {
        let t = ScaleLog::new((0.5, 2.0), (0.0, 1.0)).ticks();
        assert!(t.contains(&1.0) && t.contains(&0.5) && t.contains(&2.0), "{t:?}");
        let wide = ScaleLog::new((1e-5, 1e5), (0.0, 1.0)).ticks();
        assert!(wide.iter().any(|&v| (v - 1e4).abs() < 1e-6), "{wide:?}");
        assert!(wide.iter().all(|&v| v > 0.0), "positivity");
    }
}
