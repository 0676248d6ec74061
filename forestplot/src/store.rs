// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The recompute-owning store.
//!
//! [`PlotStore`] owns the inputs of a plot and republishes an immutable
//! [`PlotContext`] whenever one of them changes. Recomputation is whole-plot;
//! renderers hold an `Arc<PlotContext>` and never see a half-updated state.
//!
//! Fonts load asynchronously in interactive hosts, so measurement happens in
//! two phases: the store starts with whatever measurer is available (usually
//! the heuristic one) and [`PlotStore::on_fonts_ready`] swaps in the shaping
//! measurer exactly once.

extern crate alloc;

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use forestplot_text::{HeuristicTextMeasurer, TextMeasurer};
use hashbrown::HashSet;

use crate::group::GroupTable;
use crate::layout::{Layout, LayoutOverrides, RowGeometry, compute_layout, row_geometry};
use crate::rows::{DisplayRow, build_display_rows, initial_collapsed};
use crate::spec::{ForestSpec, GroupId};

/// Everything a renderer needs, computed together.
#[derive(Clone, Debug, PartialEq)]
pub struct PlotContext {
    /// Pixel geometry.
    pub layout: Layout,
    /// Flattened rows, parallel to `layout.rows`.
    pub display_rows: Vec<DisplayRow>,
    /// Interval geometry of every plotted row.
    pub geometry: Vec<RowGeometry>,
}

impl PlotContext {
    /// Computes a context from scratch.
    ///
    /// `order` is an optional filter/sort of row indices.
    pub fn compute(
        spec: &ForestSpec,
        measurer: &dyn TextMeasurer,
        width: Option<f64>,
        overrides: &LayoutOverrides,
        collapsed: &HashSet<GroupId>,
        order: Option<&[usize]>,
    ) -> Self {
        let groups = GroupTable::new(&spec.data.groups);
        Self::compute_with(spec, &groups, measurer, width, overrides, collapsed, order)
    }

    fn compute_with(
        spec: &ForestSpec,
        groups: &GroupTable,
        measurer: &dyn TextMeasurer,
        width: Option<f64>,
        overrides: &LayoutOverrides,
        collapsed: &HashSet<GroupId>,
        order: Option<&[usize]>,
    ) -> Self {
        let display_rows = build_display_rows(&spec.data.rows, groups, collapsed, order);
        let layout = compute_layout(spec, groups, &display_rows, measurer, width, overrides);
        let geometry = row_geometry(spec, &layout, &display_rows);
        Self {
            layout,
            display_rows,
            geometry,
        }
    }
}

/// Owns a plot's inputs and its current [`PlotContext`].
pub struct PlotStore {
    spec: ForestSpec,
    groups: GroupTable,
    measurer: Arc<dyn TextMeasurer>,
    fonts_ready: bool,
    width: Option<f64>,
    overrides: LayoutOverrides,
    collapsed: HashSet<GroupId>,
    order: Option<Vec<usize>>,
    revision: u64,
    context: Arc<PlotContext>,
}

impl fmt::Debug for PlotStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlotStore")
            .field("spec", &self.spec)
            .field("groups", &self.groups)
            .field("fonts_ready", &self.fonts_ready)
            .field("width", &self.width)
            .field("overrides", &self.overrides)
            .field("collapsed", &self.collapsed)
            .field("order", &self.order)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

impl PlotStore {
    /// Creates a store measuring with the heuristic estimator.
    pub fn new(spec: ForestSpec) -> Self {
        Self::with_measurer(spec, Arc::new(HeuristicTextMeasurer))
    }

    /// Creates a store with an initial measurer.
    ///
    /// Groups declared `collapsed` start collapsed.
    pub fn with_measurer(spec: ForestSpec, measurer: Arc<dyn TextMeasurer>) -> Self {
        let groups = GroupTable::new(&spec.data.groups);
        let collapsed = initial_collapsed(&spec.data.groups);
        let overrides = LayoutOverrides::default();
        let context = Arc::new(PlotContext::compute_with(
            &spec, &groups, &*measurer, None, &overrides, &collapsed, None,
        ));
        Self {
            spec,
            groups,
            measurer,
            fonts_ready: false,
            width: None,
            overrides,
            collapsed,
            order: None,
            revision: 0,
            context,
        }
    }

    /// The current context.
    pub fn context(&self) -> Arc<PlotContext> {
        Arc::clone(&self.context)
    }

    /// Number of recomputations since creation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The specification.
    pub fn spec(&self) -> &ForestSpec {
        &self.spec
    }

    /// Whether [`Self::on_fonts_ready`] has run.
    pub fn fonts_ready(&self) -> bool {
        self.fonts_ready
    }

    /// The collapsed groups.
    pub fn collapsed(&self) -> &HashSet<GroupId> {
        &self.collapsed
    }

    /// Replaces the specification.
    ///
    /// The collapsed set is reset to the new groups' declared state.
    pub fn set_spec(&mut self, spec: ForestSpec) {
        self.groups = GroupTable::new(&spec.data.groups);
        self.collapsed = initial_collapsed(&spec.data.groups);
        self.spec = spec;
        self.recompute("spec");
    }

    /// Sets the container width (`None` uses the specification's width).
    pub fn set_width(&mut self, width: Option<f64>) {
        if self.width == width {
            return;
        }
        self.width = width;
        self.recompute("width");
    }

    /// Sets explicit layout overrides.
    pub fn set_overrides(&mut self, overrides: LayoutOverrides) {
        if self.overrides == overrides {
            return;
        }
        self.overrides = overrides;
        self.recompute("overrides");
    }

    /// Collapses or expands `group`. Unknown ids are ignored.
    pub fn toggle_group(&mut self, group: &GroupId) {
        if self.groups.index_of(group).is_none() {
            log::debug!("toggle of unknown group `{}` ignored", group.as_str());
            return;
        }
        if !self.collapsed.remove(group) {
            self.collapsed.insert(group.clone());
        }
        self.recompute("collapse");
    }

    /// Replaces the collapsed set.
    pub fn set_collapsed(&mut self, collapsed: HashSet<GroupId>) {
        if self.collapsed == collapsed {
            return;
        }
        self.collapsed = collapsed;
        self.recompute("collapse");
    }

    /// Shows only the given rows, in the given order (`None` shows all in input order).
    pub fn set_row_order(&mut self, order: Option<Vec<usize>>) {
        if self.order == order {
            return;
        }
        self.order = order;
        self.recompute("row order");
    }

    /// Swaps in the measurer backed by loaded fonts and recomputes.
    ///
    /// Runs once; later calls are ignored and return `false`.
    pub fn on_fonts_ready(&mut self, measurer: Arc<dyn TextMeasurer>) -> bool {
        if self.fonts_ready {
            log::debug!("fonts already ready; measurer unchanged");
            return false;
        }
        self.fonts_ready = true;
        self.measurer = measurer;
        self.recompute("fonts ready");
        true
    }

    fn recompute(&mut self, reason: &str) {
        self.revision += 1;
        log::debug!("recomputing plot context (revision {}): {reason}", self.revision);
        self.context = Arc::new(PlotContext::compute_with(
            &self.spec,
            &self.groups,
            &*self.measurer,
            self.width,
            &self.overrides,
            &self.collapsed,
            self.order.as_deref(),
        ));
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use forestplot_text::{TextMetrics, TextStyle};

    use super::*;
    use crate::spec::{Group, Row};

    /// Measures everything twice as wide as the heuristic.
    #[derive(Debug)]
    struct WideMeasurer;

    impl TextMeasurer for WideMeasurer {
        fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
            let mut m = HeuristicTextMeasurer.measure(text, style);
            m.advance_width *= 2.0;
            m
        }
    }

    fn spec() -> ForestSpec {
        ForestSpec::new(vec![
            Row::new("a", "A study with a rather long label", Some(0.8), Some(0.6), Some(1.1))
                .in_group("g"),
            Row::new("b", "B", Some(1.3), Some(1.0), Some(1.7)).in_group("g"),
            Row::new("c", "C", Some(1.0), Some(0.8), Some(1.2)),
        ])
        .with_groups(vec![Group::new("g", "Group")])
    }

    #[test]
    fn toggling_a_group_keeps_the_label_width() {
        let mut store = PlotStore::new(spec());
        let before = store.context();
        store.toggle_group(&GroupId::from("g"));
        let after = store.context();
        assert_eq!(after.display_rows.len(), 2, "{:?}", after.display_rows);
        assert_eq!(before.display_rows.len(), 4);
        assert_eq!(before.layout.label_width, after.layout.label_width);
        assert!(after.layout.height < before.layout.height, "fewer rows");
        store.toggle_group(&GroupId::from("g"));
        assert_eq!(*store.context(), *before, "expanding restores the layout");
    }

    #[test]
    fn unchanged_inputs_do_not_recompute() {
        let mut store = PlotStore::new(spec());
        let first = store.context();
        store.set_width(None);
        store.set_overrides(LayoutOverrides::default());
        store.toggle_group(&GroupId::from("missing"));
        assert!(Arc::ptr_eq(&first, &store.context()), "context republished");
        assert_eq!(store.revision(), 0);
        store.set_width(Some(1200.0));
        assert_eq!(store.revision(), 1);
        assert_eq!(store.context().layout.width, 1200.0);
    }

    #[test]
    fn fonts_ready_runs_once() {
        let mut store = PlotStore::new(spec());
        let heuristic = store.context().layout.label_width;
        assert!(store.on_fonts_ready(Arc::new(WideMeasurer)), "first pass applies");
        let shaped = store.context();
        assert!(shaped.layout.label_width > heuristic, "{heuristic}");
        assert!(!store.on_fonts_ready(Arc::new(HeuristicTextMeasurer)), "replay ignored");
        assert!(Arc::ptr_eq(&shaped, &store.context()), "context kept");
        assert!(store.fonts_ready(), "font pass recorded");
    }

    #[test]
    fn declared_collapsed_groups_start_collapsed() {
        let mut s = spec();
        s.data.groups = vec![Group::new("g", "Group").collapsed()];
        let store = PlotStore::new(s);
        assert!(store.collapsed().contains(&GroupId::from("g")));
        assert_eq!(store.context().display_rows.len(), 2);
    }

    #[test]
    fn row_order_filters_rows() {
        let mut store = PlotStore::new(spec());
        store.set_row_order(Some(vec![2]));
        let ctx = store.context();
        assert_eq!(ctx.display_rows, [DisplayRow::Data { row: 2, depth: 0 }]);
        assert_eq!(ctx.geometry.len(), 1);
    }
}
