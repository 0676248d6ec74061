// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end scenarios across domain, ticks, widths, rows and clipping.

extern crate std;

use alloc::format;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use forestplot_text::{HeuristicTextMeasurer, TextMeasurer};
use hashbrown::HashSet;

use crate::{
    AxisConfig, BoundCap, ColumnGroup, ColumnKind, ColumnSpec, ColumnWidth, ArrowDirection,
    DisplayRow, FieldValue, ForestSpec, Group, GroupTable, LayoutOverrides, PlotContext, Row,
    ScaleKind, Theme, build_display_rows, calculate_domain, compute_layout, generate_ticks,
    leaf_width, measure_columns, measured_rows, nice_domain, MAX_COLUMN_WIDTH, SAFETY_BUFFER,
};

fn rows(points: &[f64]) -> Vec<Row> {
    points
        .iter()
        .enumerate()
        .map(|(i, &p)| Row::new(format!("r{i}"), format!("Study {i}"), Some(p), None, None))
        .collect()
}

fn context(spec: &ForestSpec) -> PlotContext {
    PlotContext::compute(
        spec,
        &HeuristicTextMeasurer,
        None,
        &LayoutOverrides::default(),
        &HashSet::new(),
        None,
    )
}

#[test]
fn log_domain_contains_null_and_points() {
    let points = [0.80, 0.74, 0.75, 0.92, 0.90];
    let spec = ForestSpec::new(rows(&points)).with_scale(ScaleKind::Log);
    let ctx = context(&spec);
    let (lo, hi) = ctx.layout.x_domain;
    assert!(lo > 0.0 && lo <= 0.74 && hi >= 1.0, "{lo}..{hi}");
    for p in points {
        assert!(p >= lo && p <= hi, "{p} outside {lo}..{hi}");
    }
    assert!(ctx.layout.ticks.contains(&1.0), "{:?}", ctx.layout.ticks);
    assert!(ctx.layout.null_x.is_some(), "null line drawn");
}

#[test]
fn explicit_range_is_returned_exactly() {
    let mut spec = ForestSpec::new(rows(&[0.1, 3.0, 7.5]));
    spec.theme.axis = AxisConfig::default().with_range(0.5, 1.5);
    let d = calculate_domain(&spec.data.rows, &spec.data.effects(), &spec.theme.axis, ScaleKind::Linear, 0.0);
    assert_eq!(d.domain, (0.5, 1.5));
    assert_eq!(d.clip_bounds, (0.5, 1.5));
    let ctx = context(&spec);
    assert_eq!(ctx.layout.x_domain, (0.5, 1.5));
}

#[test]
fn far_upper_bound_is_truncated_with_an_arrow() {
    let spec = ForestSpec::new(vec![
        Row::new("a", "A", Some(0.8), Some(0.7), Some(0.9)),
        Row::new("b", "B", Some(0.95), Some(0.85), Some(1.05)),
        Row::new("c", "C", Some(1.1), Some(1.0), Some(50.0)),
    ])
    .with_scale(ScaleKind::Log);
    let ctx = context(&spec);
    let (_, hi) = ctx.layout.x_domain;
    assert!(hi < 5.0, "domain stretched to {hi}");

    let c = ctx
        .geometry
        .iter()
        .find(|g| g.display_index == Some(2))
        .expect("row c is plotted");
    let upper = c.intervals[0].upper;
    let right_edge = ctx.layout.scale().map(hi);
    match upper {
        BoundCap::Arrow { x, direction } => {
            assert_eq!(direction, ArrowDirection::Right);
            assert!((x - right_edge).abs() < 1e-9, "{x} vs {right_edge}");
        }
        other => panic!("expected a truncation arrow, got {other:?}"),
    }
    assert!(
        matches!(c.intervals[0].lower, BoundCap::Whisker { .. }),
        "lower bound is visible"
    );
}

#[test]
fn symmetric_axis_keeps_visible_bounds_untruncated() {
    let spec = ForestSpec::new(vec![
        Row::new("a", "A", Some(-0.1), Some(-1.5), Some(0.0)),
        Row::new("b", "B", Some(1.0), Some(0.9), Some(1.1)),
        Row::new("c", "C", Some(0.5), Some(-1.05), Some(0.6)),
    ]);
    let ctx = PlotContext::compute(
        &spec,
        &HeuristicTextMeasurer,
        Some(800.0),
        &LayoutOverrides::default(),
        &HashSet::new(),
        None,
    );
    assert!(ctx.layout.symmetric, "points straddle the null value");
    let (lo, _) = ctx.layout.x_domain;
    assert!(lo <= -1.05, "domain {:?} hides row c", ctx.layout.x_domain);

    let c = ctx
        .geometry
        .iter()
        .find(|g| g.display_index == Some(2))
        .expect("row c is plotted");
    assert!(
        matches!(c.intervals[0].lower, BoundCap::Whisker { .. }),
        "on-axis bound drawn in full: {:?}",
        c.intervals[0].lower
    );

    let a = ctx
        .geometry
        .iter()
        .find(|g| g.display_index == Some(0))
        .expect("row a is plotted");
    let left_edge = ctx.layout.scale().map(lo);
    match a.intervals[0].lower {
        BoundCap::Arrow { x, direction } => {
            assert_eq!(direction, ArrowDirection::Left);
            assert!((x - left_edge).abs() < 1e-9, "{x} vs {left_edge}");
        }
        other => panic!("expected a truncation arrow, got {other:?}"),
    }
}

#[test]
fn long_group_cycles_keep_their_rows() {
    let n = 120;
    let groups: Vec<Group> = (0..n)
        .map(|i| Group::new(format!("g{i}"), format!("G{i}")).with_parent(format!("g{}", (i + 1) % n)))
        .collect();
    let spec = ForestSpec::new(vec![
        Row::new("a", "A", Some(1.0), Some(0.8), Some(1.2)).in_group("g0"),
    ])
    .with_groups(groups);
    let ctx = context(&spec);
    assert!(
        ctx.display_rows
            .iter()
            .any(|r| matches!(r, DisplayRow::Data { row: 0, .. })),
        "row dropped from {} display rows",
        ctx.display_rows.len()
    );
}

#[test]
fn numeric_auto_width_column() {
    let theme = Theme::default();
    let m = HeuristicTextMeasurer;
    let data: Vec<Row> = [12.0, 4_500.0, 999_999.0]
        .iter()
        .enumerate()
        .map(|(i, &n)| {
            Row::new(format!("r{i}"), "", Some(1.0), None, None)
                .with_field("n", FieldValue::Number(n))
        })
        .collect();
    let col = ColumnSpec::new("n", "N", "n", ColumnKind::numeric());
    let w = leaf_width(&col, &measured_rows(&data), &theme, &m);
    let header = m.width("N", &theme.header_style());
    let content = m.width("999,999", &theme.body_style());
    let expected =
        header.max(content) + 2.0 * theme.spacing.cell_padding_x + SAFETY_BUFFER;
    let expected = expected.clamp(col.kind.min_width(), MAX_COLUMN_WIDTH);
    assert!((w - expected).abs() < 1e-9, "{w} vs {expected}");
    assert!(w <= MAX_COLUMN_WIDTH, "{w}");
}

#[test]
fn group_header_counts_descendants() {
    let groups = vec![
        Group::new("top", "Top"),
        Group::new("nested", "Nested").with_parent("top"),
    ];
    let mut data = Vec::new();
    for i in 0..3 {
        data.push(Row::new(format!("t{i}"), "T", Some(1.0), None, None).in_group("top"));
    }
    for i in 0..2 {
        data.push(Row::new(format!("n{i}"), "N", Some(1.0), None, None).in_group("nested"));
    }
    let table = GroupTable::new(&groups);
    let out = build_display_rows(&data, &table, &HashSet::new(), None);
    let DisplayRow::GroupHeader { row_count, .. } = &out[0] else {
        panic!("expected a header first, got {:?}", out[0]);
    };
    assert_eq!(*row_count, 5);
}

#[test]
fn nice_domain_contains_input() {
    let cases = [
        ((0.13, 0.87), ScaleKind::Linear),
        ((-3.7, 12.2), ScaleKind::Linear),
        ((1_234.0, 98_765.0), ScaleKind::Linear),
        ((0.0004, 0.003), ScaleKind::Log),
        ((0.74, 1.02), ScaleKind::Log),
        ((3.3, 4_000.0), ScaleKind::Log),
    ];
    for (hint, ((a, b), scale)) in [3, 5, 10].into_iter().cycle().zip(cases) {
        let (na, nb) = nice_domain((a, b), scale, hint);
        assert!(na <= a && nb >= b, "{scale:?} {a}..{b} -> {na}..{nb}");
        if scale == ScaleKind::Log {
            assert!(na > 0.0, "log bound {na}");
        }
    }
}

#[test]
fn ticks_are_plentiful_positive_and_keep_null() {
    let axis = AxisConfig::default();
    for width in [20.0, 120.0, 400.0, 1_200.0] {
        for (domain, scale, null) in [
            ((-1.0, 3.0), ScaleKind::Linear, 0.0),
            ((5.0, 6.0), ScaleKind::Linear, 0.0),
            ((0.5, 2.0), ScaleKind::Log, 1.0),
            ((0.01, 100.0), ScaleKind::Log, 1.0),
            ((2.0, 3.0), ScaleKind::Log, 1.0),
        ] {
            let ticks = generate_ticks(domain, scale, &axis, width, null);
            assert!(ticks.len() >= 2, "{domain:?} at {width}px: {ticks:?}");
            if scale == ScaleKind::Log {
                assert!(ticks.iter().all(|&t| t > 0.0), "{ticks:?}");
            }
            if null >= domain.0 && null <= domain.1 {
                assert!(ticks.contains(&null), "{domain:?} at {width}px: {ticks:?}");
            }
        }
    }
}

#[test]
fn estimator_is_monotonic_in_length() {
    let m = HeuristicTextMeasurer;
    let style = Theme::default().body_style();
    for glyph in ["i", "a", "M", "8", "漢"] {
        let mut last = -1.0;
        let mut text = String::new();
        for _ in 0..20 {
            text.push_str(glyph);
            let w = m.width(&text, &style);
            assert!(w > last, "{glyph:?} x{}: {w} <= {last}", text.chars().count());
            last = w;
        }
    }
}

#[test]
fn group_expansion_covers_the_header() {
    let theme = Theme::default();
    let m = HeuristicTextMeasurer;
    let group = ColumnGroup::new(
        "outcome",
        "Primary outcome at twelve months",
        vec![
            ColumnSpec::new("e", "Events", "e", ColumnKind::numeric()).into(),
            ColumnSpec::new("n", "N", "n", ColumnKind::numeric())
                .with_width(24.0)
                .into(),
        ],
    );
    let out = measure_columns(&[group.clone().into()], &[], &theme, &m);
    let needed =
        m.width(&group.header, &theme.header_style()) + 2.0 * theme.spacing.group_header_padding;
    let sum = out.columns["e"] + out.columns["n"];
    assert!(sum >= needed - 1e-9, "{sum} < {needed}");
    assert!(
        matches!(group.children[1], crate::ColumnDef::Column(ref c) if c.width == Some(ColumnWidth::Fixed(24.0))),
        "declared widths are untouched"
    );
}

#[test]
fn layout_is_idempotent_with_overrides() {
    let spec = ForestSpec::new(rows(&[0.4, 0.9, 1.7]))
        .with_scale(ScaleKind::Log)
        .with_groups(vec![Group::new("g", "G")]);
    let table = GroupTable::new(&spec.data.groups);
    let display = build_display_rows(&spec.data.rows, &table, &HashSet::new(), None);
    let overrides = LayoutOverrides::default()
        .with_column_width(crate::LABEL_COLUMN_KEY, 150.0)
        .with_forest_width(420.0);
    let a = compute_layout(&spec, &table, &display, &HeuristicTextMeasurer, Some(900.0), &overrides);
    let b = compute_layout(&spec, &table, &display, &HeuristicTextMeasurer, Some(900.0), &overrides);
    assert_eq!(a, b);
    assert_eq!((a.label_width, a.forest_width), (150.0, 420.0));
}

#[test]
fn empty_plot_falls_back() {
    let spec = ForestSpec::new(Vec::new()).with_scale(ScaleKind::Log);
    let ctx = context(&spec);
    assert!(ctx.layout.fallback_domain, "fallback flagged");
    assert_eq!(ctx.layout.x_domain, (0.1, 10.0));
    assert!(ctx.layout.ticks.len() >= 2, "{:?}", ctx.layout.ticks);
    assert!(ctx.layout.width.is_finite() && ctx.layout.height.is_finite(), "finite document size");
}
