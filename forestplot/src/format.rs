// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Number formatting for cells and tick labels.

extern crate alloc;

use alloc::format;
use alloc::string::String;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use crate::spec::ScaleKind;

/// Largest decimal count any formatter emits.
pub(crate) const MAX_DECIMALS: u8 = 6;

/// Formats `value`.
///
/// With `decimals == None`, integral values print bare and others with two
/// decimals. `thousands` groups the integer part with `,`.
pub fn format_number(value: f64, decimals: Option<u8>, thousands: bool) -> String {
    if !value.is_finite() {
        return String::new();
    }
    let decimals = decimals.unwrap_or(if is_integral(value) { 0 } else { 2 });
    let s = fixed(value, decimals);
    if thousands { group_thousands(&s) } else { s }
}

/// Formats a percentage. `scale_100` treats `value` as a proportion.
pub fn format_percent(value: f64, decimals: u8, scale_100: bool) -> String {
    if !value.is_finite() {
        return String::new();
    }
    let v = if scale_100 { value * 100.0 } else { value };
    format!("{}%", fixed(v, decimals))
}

/// Formats a p-value, printing `<floor` when it rounds below the display floor.
pub fn format_pvalue(value: f64, decimals: u8) -> String {
    if !value.is_finite() || value < 0.0 {
        return String::new();
    }
    let decimals = decimals.clamp(1, MAX_DECIMALS);
    let floor = 10_f64.powi(-i32::from(decimals));
    if value < floor {
        format!("<{}", fixed(floor, decimals))
    } else {
        fixed(value, decimals)
    }
}

/// Formats `point (lower<sep>upper)`; the point alone when a bound is missing.
pub fn format_interval(
    point: Option<f64>,
    lower: Option<f64>,
    upper: Option<f64>,
    decimals: u8,
    separator: &str,
) -> String {
    let finite = |v: Option<f64>| v.filter(|v| v.is_finite());
    let Some(point) = finite(point) else {
        return String::new();
    };
    let p = fixed(point, decimals);
    match (finite(lower), finite(upper)) {
        (Some(lo), Some(hi)) => format!(
            "{p} ({}{separator}{})",
            fixed(lo, decimals),
            fixed(hi, decimals)
        ),
        _ => p,
    }
}

/// Formats `events/total`.
pub fn format_events(events: f64, total: f64) -> String {
    format!(
        "{}/{}",
        format_number(events, None, true),
        format_number(total, None, true)
    )
}

/// Formats `low – high`.
pub fn format_range(low: f64, high: f64) -> String {
    format!(
        "{} \u{2013} {}",
        format_number(low, None, true),
        format_number(high, None, true)
    )
}

/// Formats an axis tick label.
///
/// Linear ticks use as many decimals as the tick `step` needs; log ticks use
/// up to three decimals with trailing zeros trimmed.
pub fn format_tick(value: f64, scale: ScaleKind, step: f64) -> String {
    if !value.is_finite() {
        return String::new();
    }
    match scale {
        ScaleKind::Linear => {
            let d = if step.is_finite() && step > 0.0 {
                decimals_needed(step)
            } else {
                decimals_needed(value).min(3)
            };
            fixed(value, d)
        }
        ScaleKind::Log => trim_zeros(fixed(value, decimals_needed(value).min(3))),
    }
}

/// Smallest decimal count that represents `x` without visible rounding.
pub(crate) fn decimals_needed(x: f64) -> u8 {
    let x = x.abs();
    for d in 0..MAX_DECIMALS {
        let scaled = x * 10_f64.powi(i32::from(d));
        if (scaled - scaled.round()).abs() < 1e-6 * scaled.max(1.0) {
            return d;
        }
    }
    MAX_DECIMALS
}

fn is_integral(v: f64) -> bool {
    v.abs() < 1e15 && v == v.round()
}

fn fixed(value: f64, decimals: u8) -> String {
    let s = format!("{:.*}", usize::from(decimals), value);
    // `-0.00` reads as noise.
    if s.starts_with('-') && s.bytes().all(|b| matches!(b, b'-' | b'0' | b'.')) {
        String::from(&s[1..])
    } else {
        s
    }
}

fn trim_zeros(s: String) -> String {
    if !s.contains('.') {
        return s;
    }
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    String::from(trimmed)
}

fn group_thousands(s: &str) -> String {
    let (sign, rest) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s),
    };
    let (int, frac) = match rest.find('.') {
        Some(i) => rest.split_at(i),
        None => (rest, ""),
    };
    let mut out = String::with_capacity(s.len() + int.len() / 3);
    out.push_str(sign);
    for (i, ch) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.push_str(frac);
    out
}
