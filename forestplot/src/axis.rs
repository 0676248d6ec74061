// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! X-axis configuration.
//!
//! A forest plot has exactly one value axis, below the plot area. [`AxisConfig`]
//! collects every policy knob that feeds domain calculation, tick generation and
//! the axis block's measured height.

extern crate alloc;

use alloc::vec::Vec;

use forestplot_text::{TextMeasurer, TextStyle};

/// Whether the x domain is mirrored around the null value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "Option<bool>", into = "Option<bool>")
)]
pub enum Symmetric {
    /// Mirror only when point estimates lie strictly on both sides of the null value.
    #[default]
    Auto,
    /// Always mirror.
    Force,
    /// Never mirror.
    Forbid,
}

impl From<Option<bool>> for Symmetric {
    fn from(value: Option<bool>) -> Self {
        match value {
            None => Self::Auto,
            Some(true) => Self::Force,
            Some(false) => Self::Forbid,
        }
    }
}

impl From<Symmetric> for Option<bool> {
    fn from(value: Symmetric) -> Self {
        match value {
            Symmetric::Auto => None,
            Symmetric::Force => Some(true),
            Symmetric::Forbid => Some(false),
        }
    }
}

/// Stroke pattern for gridlines and reference lines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum LineStyle {
    /// A continuous line.
    Solid,
    /// Long dashes.
    #[default]
    Dashed,
    /// Dots.
    Dotted,
}

impl LineStyle {
    /// Dash pattern in scene units, or `None` for a solid line.
    pub fn dash_array(self) -> Option<[f64; 2]> {
        match self {
            Self::Solid => None,
            Self::Dashed => Some([4.0, 4.0]),
            Self::Dotted => Some([1.0, 3.0]),
        }
    }
}

/// X-axis policy.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct AxisConfig {
    /// Explicit lower bound. Pins that side of the domain.
    pub range_min: Option<f64>,
    /// Explicit upper bound. Pins that side of the domain.
    pub range_max: Option<f64>,
    /// Explicit tick values; bypasses tick spacing rules.
    pub tick_values: Option<Vec<f64>>,
    /// Approximate number of ticks. Derived from the plot width when `None`.
    pub tick_count: Option<usize>,
    /// Padding added on each unpinned side, as a fraction of the estimate range.
    pub padding: f64,
    /// CI bounds farther than `estimate range × threshold` from the core extent are clipped.
    pub ci_truncation_threshold: f64,
    /// Extend the domain so it contains the null value.
    pub include_null: bool,
    /// Guarantee a tick at the null value when it lies inside the domain.
    pub null_tick: bool,
    /// Symmetric-domain policy.
    pub symmetric: Symmetric,
    /// Inset the scale range by half a marker so edge markers are not cut off.
    pub marker_margin: bool,
    /// Draw vertical gridlines at the ticks.
    pub gridlines: bool,
    /// Gridline stroke pattern.
    pub grid_style: LineStyle,
    /// Minimum horizontal distance between two ticks, in pixels.
    pub min_tick_spacing: f64,
    /// Tick line length.
    pub tick_size: f64,
    /// Gap between tick end and tick label.
    pub tick_padding: f64,
    /// Gap between tick labels and the axis label.
    pub title_offset: f64,
}

/// Default padding fraction.
pub const DEFAULT_AXIS_PADDING: f64 = 0.10;
/// Default CI truncation multiplier.
pub const DEFAULT_CI_TRUNCATION_THRESHOLD: f64 = 2.0;
/// Default minimum tick spacing in pixels.
pub const DEFAULT_MIN_TICK_SPACING: f64 = 50.0;

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            range_min: None,
            range_max: None,
            tick_values: None,
            tick_count: None,
            padding: DEFAULT_AXIS_PADDING,
            ci_truncation_threshold: DEFAULT_CI_TRUNCATION_THRESHOLD,
            include_null: true,
            null_tick: true,
            symmetric: Symmetric::Auto,
            marker_margin: true,
            gridlines: false,
            grid_style: LineStyle::Dashed,
            min_tick_spacing: DEFAULT_MIN_TICK_SPACING,
            tick_size: 5.0,
            tick_padding: 4.0,
            title_offset: 6.0,
        }
    }
}

impl AxisConfig {
    /// Pins both ends of the domain.
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.range_min = Some(min);
        self.range_max = Some(max);
        self
    }

    /// Pins the lower end of the domain.
    pub fn with_range_min(mut self, min: f64) -> Self {
        self.range_min = Some(min);
        self
    }

    /// Pins the upper end of the domain.
    pub fn with_range_max(mut self, max: f64) -> Self {
        self.range_max = Some(max);
        self
    }

    /// Uses explicit tick values.
    pub fn with_tick_values(mut self, ticks: impl Into<Vec<f64>>) -> Self {
        self.tick_values = Some(ticks.into());
        self
    }

    /// Sets the approximate tick count.
    pub fn with_tick_count(mut self, tick_count: usize) -> Self {
        self.tick_count = Some(tick_count);
        self
    }

    /// Sets the padding fraction.
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// Sets the CI truncation multiplier.
    pub fn with_ci_truncation_threshold(mut self, threshold: f64) -> Self {
        self.ci_truncation_threshold = threshold;
        self
    }

    /// Enables or disables extending the domain to the null value.
    pub fn with_include_null(mut self, include_null: bool) -> Self {
        self.include_null = include_null;
        self
    }

    /// Enables or disables the guaranteed null tick.
    pub fn with_null_tick(mut self, null_tick: bool) -> Self {
        self.null_tick = null_tick;
        self
    }

    /// Sets the symmetric-domain policy.
    pub fn with_symmetric(mut self, symmetric: Symmetric) -> Self {
        self.symmetric = symmetric;
        self
    }

    /// Enables or disables the marker margin.
    pub fn with_marker_margin(mut self, marker_margin: bool) -> Self {
        self.marker_margin = marker_margin;
        self
    }

    /// Enables gridlines with the given stroke pattern.
    pub fn with_gridlines(mut self, style: LineStyle) -> Self {
        self.gridlines = true;
        self.grid_style = style;
        self
    }

    /// Returns the explicit range if both ends are set and finite.
    pub fn explicit_range(&self) -> Option<(f64, f64)> {
        match (self.range_min, self.range_max) {
            (Some(a), Some(b)) if a.is_finite() && b.is_finite() => Some((a, b)),
            _ => None,
        }
    }

    /// Sanitised padding fraction (non-negative, finite).
    pub fn padding_fraction(&self) -> f64 {
        if self.padding.is_finite() {
            self.padding.max(0.0)
        } else {
            DEFAULT_AXIS_PADDING
        }
    }

    /// Sanitised CI truncation multiplier (positive, finite).
    pub fn truncation_threshold(&self) -> f64 {
        if self.ci_truncation_threshold.is_finite() && self.ci_truncation_threshold > 0.0 {
            self.ci_truncation_threshold
        } else {
            DEFAULT_CI_TRUNCATION_THRESHOLD
        }
    }

    /// Sanitised minimum tick spacing.
    pub fn tick_spacing(&self) -> f64 {
        if self.min_tick_spacing.is_finite() {
            self.min_tick_spacing.max(0.0)
        } else {
            DEFAULT_MIN_TICK_SPACING
        }
    }

    /// Measure the height of the axis block below the plot.
    ///
    /// The block holds the tick marks, one line of tick labels and, when
    /// `title` is given, the axis label below them.
    pub fn measure_height(
        &self,
        measurer: &dyn TextMeasurer,
        label_style: &TextStyle,
        title: Option<(&str, &TextStyle)>,
    ) -> f64 {
        let tick_extent = self.tick_size.abs();
        let label_h = measurer.measure("0.1", label_style).line_height();
        let mut out = tick_extent + self.tick_padding.max(0.0) + label_h;
        if let Some((text, style)) = title
            && !text.is_empty()
        {
            out += self.title_offset.max(0.0) + measurer.measure(text, style).line_height();
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use forestplot_text::HeuristicTextMeasurer;

    use super::*;

    #[test]
    fn explicit_range_requires_both_ends() {
        assert_eq!(AxisConfig::default().with_range_min(0.5).explicit_range(), None);
        assert_eq!(
            AxisConfig::default().with_range(0.5, 1.5).explicit_range(),
            Some((0.5, 1.5))
        );
    }

    #[test]
    fn axis_label_adds_height() {
        let axis = AxisConfig::default();
        let m = HeuristicTextMeasurer;
        let style = TextStyle::new(12.0);
        let bare = axis.measure_height(&m, &style, None);
        let titled = axis.measure_height(&m, &style, Some(("Odds ratio", &style)));
        assert!((titled - bare - (axis.title_offset + 12.0)).abs() < 1e-9, "{titled} vs {bare}");
    }

    #[test]
    fn invalid_policy_numbers_fall_back_to_defaults() {
        let axis = AxisConfig::default()
            .with_padding(f64::NAN)
            .with_ci_truncation_threshold(-1.0);
        assert_eq!(axis.padding_fraction(), DEFAULT_AXIS_PADDING);
        assert_eq!(axis.truncation_threshold(), DEFAULT_CI_TRUNCATION_THRESHOLD);
    }
}
