// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Static SVG export for forest plots.
//!
//! The exporter runs the same layout engine as interactive views. To make an
//! export match what a live view shows, pass that view's measured widths and
//! domain back in through [`ExportOptions`]; they are reused verbatim.
//!
//! ```
//! use forestplot::{ForestSpec, Row, ScaleKind};
//! use forestplot_svg::{ExportOptions, generate_image};
//!
//! let spec = ForestSpec::new(vec![
//!     Row::new("a", "Study A", Some(0.8), Some(0.6), Some(1.1)),
//!     Row::new("b", "Study B", Some(1.2), Some(0.9), Some(1.7)),
//! ])
//! .with_scale(ScaleKind::Log);
//! let svg = generate_image(&spec, &ExportOptions::default()).unwrap();
//! assert!(svg.starts_with("<svg"));
//! ```

mod json;
mod render;
mod svg;

use forestplot::{
    ForestError, ForestSpec, HeuristicTextMeasurer, Layout, LayoutOverrides, PlotContext,
    TextMeasurer, Warning, initial_collapsed,
};
use hashbrown::HashMap;
use peniko::Color;

pub use json::{parse_spec, validate_spec_json};

/// Export settings.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportOptions {
    /// Requested document width; the specification's width when `None`.
    pub width: Option<f64>,
    /// Document height; the computed layout height when `None`.
    pub height: Option<f64>,
    /// Output pixels per layout unit.
    pub scale: f64,
    /// Background fill; the theme background when `None`.
    pub background: Option<Color>,
    /// Column widths by leaf id (and [`forestplot::LABEL_COLUMN_KEY`]), used verbatim.
    pub column_widths: HashMap<String, f64>,
    /// Forest plot width, used verbatim.
    pub forest_width: Option<f64>,
    /// X domain, used verbatim.
    pub x_domain: Option<(f64, f64)>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            scale: 1.0,
            background: None,
            column_widths: HashMap::new(),
            forest_width: None,
            x_domain: None,
        }
    }
}

impl ExportOptions {
    /// Options reproducing `layout` exactly.
    pub fn matching(layout: &Layout) -> Self {
        let o = layout.overrides();
        Self {
            width: Some(layout.width),
            column_widths: o.column_widths,
            forest_width: o.forest_width,
            x_domain: o.x_domain,
            ..Self::default()
        }
    }

    /// Sets the requested width.
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    /// Sets the document height.
    pub fn with_height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    /// Sets the output scale.
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Sets the background fill.
    pub fn with_background(mut self, background: Color) -> Self {
        self.background = Some(background);
        self
    }

    /// Layout overrides carried by these options.
    pub fn overrides(&self) -> LayoutOverrides {
        LayoutOverrides {
            column_widths: self.column_widths.clone(),
            forest_width: self.forest_width,
            x_domain: self.x_domain,
        }
    }

    fn validate(&self) -> Result<(), ForestError> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if self.width.is_some_and(|w| !positive(w)) {
            return Err(ForestError::invalid("options.width", "must be a positive number"));
        }
        if self.height.is_some_and(|h| !positive(h)) {
            return Err(ForestError::invalid("options.height", "must be a positive number"));
        }
        if !positive(self.scale) {
            return Err(ForestError::invalid("options.scale", "must be a positive number"));
        }
        Ok(())
    }
}

/// A rendered document.
#[derive(Clone, Debug, PartialEq)]
pub struct SvgOutput {
    /// SVG markup.
    pub svg: String,
    /// Elements skipped while laying out.
    pub warnings: Vec<Warning>,
    /// The layout the document was drawn from.
    pub layout: Layout,
}

/// Computes the context an export of `spec` draws from.
///
/// Groups start in their declared collapsed state.
pub fn export_context(
    spec: &ForestSpec,
    options: &ExportOptions,
    measurer: &dyn TextMeasurer,
) -> Result<PlotContext, ForestError> {
    options.validate()?;
    Ok(PlotContext::compute(
        spec,
        measurer,
        options.width,
        &options.overrides(),
        &initial_collapsed(&spec.data.groups),
        None,
    ))
}

/// Renders `spec` to SVG, returning the markup with any warnings.
pub fn render_svg(spec: &ForestSpec, options: &ExportOptions) -> Result<SvgOutput, ForestError> {
    let measurer = HeuristicTextMeasurer;
    let ctx = export_context(spec, options, &measurer)?;
    let canvas = render::Canvas {
        view_height: options.height.unwrap_or(ctx.layout.height),
        scale: options.scale,
        background: options.background.unwrap_or(spec.theme.colors.background),
    };
    log::debug!(
        "exporting {}x{} forest plot ({} rows)",
        ctx.layout.width,
        canvas.view_height,
        ctx.display_rows.len()
    );
    let svg = render::draw(spec, &ctx, &measurer, canvas);
    Ok(SvgOutput {
        svg,
        warnings: ctx.layout.warnings.clone(),
        layout: ctx.layout,
    })
}

/// Renders `spec` to an SVG string.
pub fn generate_image(spec: &ForestSpec, options: &ExportOptions) -> Result<String, ForestError> {
    render_svg(spec, options).map(|out| out.svg)
}

/// Parses, validates and renders a JSON specification.
///
/// Structural problems are reported before anything is drawn.
pub fn generate_image_from_json(json: &str, options: &ExportOptions) -> Result<String, ForestError> {
    let spec = parse_spec(json)?;
    generate_image(&spec, options)
}

#[cfg(test)]
mod tests {
    use forestplot::{
        ColumnGroup, ColumnKind, ColumnPosition, ColumnSpec, FieldValue, Group, GroupId,
        PlotStore, Row, RowKind, ScaleKind,
    };

    use super::*;

    fn spec() -> ForestSpec {
        let rows = vec![
            Row::new("a", "Smith 2019", Some(0.8), Some(0.6), Some(1.05))
                .in_group("g")
                .with_field("n", FieldValue::Number(1_204.0)),
            Row::new("b", "Jones & Lee 2021", Some(1.3), Some(1.0), Some(40.0))
                .in_group("g")
                .with_field("n", FieldValue::Number(310.0)),
            Row::new("c", "Ng 2023", Some(0.95), Some(0.8), Some(1.1))
                .with_field("n", FieldValue::Number(88.0)),
        ];
        let mut s = ForestSpec::new(rows)
            .with_scale(ScaleKind::Log)
            .with_groups(vec![Group::new("g", "Cohort studies")])
            .with_columns(vec![
                ColumnSpec::new("n", "N", "n", ColumnKind::numeric()).into(),
                ColumnGroup::new(
                    "effect",
                    "Effect",
                    vec![ColumnSpec::new("ci", "OR (95% CI)", "point", ColumnKind::interval()).into()],
                )
                .with_position(ColumnPosition::Right)
                .into(),
            ])
            .with_overall_summary(
                Row::new("o", "Overall", Some(1.0), Some(0.9), Some(1.12)).with_kind(RowKind::Summary),
            );
        s.labels.title = Some("Odds of the outcome".into());
        s.labels.axis_label = Some("Odds ratio".into());
        s
    }

    #[test]
    fn renders_a_complete_document() {
        let out = render_svg(&spec(), &ExportOptions::default()).expect("valid options");
        assert!(out.svg.starts_with("<svg"), "{}", out.svg);
        assert!(out.svg.trim_end().ends_with("</svg>"));
        assert!(out.svg.contains("Jones &amp; Lee 2021"), "labels are escaped");
        assert!(out.svg.contains("Cohort studies"), "group header drawn");
        assert!(out.svg.contains("(2)"), "group count drawn");
        assert!(out.svg.contains("1,204"), "numeric cell drawn");
        assert!(out.warnings.is_empty(), "{:?}", out.warnings);
    }

    #[test]
    fn matches_a_live_layout() {
        let mut store = PlotStore::new(spec());
        store.set_width(Some(960.0));
        store.toggle_group(&GroupId::from("g"));
        store.toggle_group(&GroupId::from("g"));
        let live = store.context();
        let out = render_svg(store.spec(), &ExportOptions::matching(&live.layout))
            .expect("valid options");
        assert_eq!(out.layout, live.layout);
    }

    #[test]
    fn overrides_are_used_verbatim() {
        let options = ExportOptions {
            forest_width: Some(333.0),
            x_domain: Some((0.25, 4.0)),
            ..ExportOptions::default()
        };
        let mut widths = HashMap::new();
        widths.insert(String::from(forestplot::LABEL_COLUMN_KEY), 210.0);
        widths.insert(String::from("n"), 77.0);
        let options = ExportOptions {
            column_widths: widths,
            ..options
        };
        let out = render_svg(&spec(), &options).expect("valid options");
        let l = &out.layout;
        assert_eq!((l.forest_width, l.x_domain, l.label_width), (333.0, (0.25, 4.0), 210.0));
        assert_eq!(l.column("n").map(|c| c.width), Some(77.0));
    }

    #[test]
    fn unknown_column_types_warn() {
        let mut s = spec();
        s.columns.push(ColumnSpec::new("x", "X", "x", ColumnKind::Unknown("hologram".into())).into());
        let out = render_svg(&s, &ExportOptions::default()).expect("valid options");
        assert_eq!(
            out.warnings,
            [Warning::UnknownColumnType {
                column: "x".into(),
                kind: "hologram".into()
            }]
        );
    }

    #[test]
    fn invalid_options_fail_fast() {
        for options in [
            ExportOptions::default().with_width(-5.0),
            ExportOptions::default().with_height(f64::NAN),
            ExportOptions::default().with_scale(0.0),
        ] {
            assert!(
                matches!(
                    generate_image(&spec(), &options),
                    Err(ForestError::InvalidSpecification { .. })
                ),
                "{options:?}"
            );
        }
    }

    #[test]
    fn scale_multiplies_the_document_size() {
        let options = ExportOptions::default().with_width(500.0).with_scale(2.0);
        let out = render_svg(&spec(), &options).expect("valid options");
        let expected = format!(r#"width="{}""#, svg::num(out.layout.width * 2.0));
        assert!(out.svg.contains(&expected), "{expected} in {}", &out.svg[..200]);
    }

    #[test]
    fn json_input_is_validated_before_drawing() {
        let err = generate_image_from_json(r#"{"data": {"rows": 3}, "theme": {}}"#, &ExportOptions::default())
            .expect_err("rows is not a list");
        assert_eq!(err, ForestError::invalid("data.rows", "must be a list"));

        let ok = generate_image_from_json(
            r#"{
                "data": {"rows": [{"id": "a", "label": "A", "point": 1.2, "lower": 0.9, "upper": 1.6}], "scale": "log"},
                "columns": [{"id": "x", "header": "X", "field": "x", "type": "hologram"}],
                "theme": {"colors": {}, "typography": {}, "spacing": {}}
            }"#,
            &ExportOptions::default(),
        )
        .expect("valid spec");
        assert!(ok.contains("<path"), "interval drawn");
    }
}
