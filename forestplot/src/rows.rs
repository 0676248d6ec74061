// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Display-row flattening.
//!
//! Turns rows and the group tree into the linear sequence the renderers walk:
//! group headers interleaved with data rows, each annotated with its depth.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashSet;

use crate::group::GroupTable;
use crate::spec::{Group, GroupId, Row};

/// One line of the rendered table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DisplayRow {
    /// A group header.
    GroupHeader {
        /// Group id.
        group: GroupId,
        /// Header text.
        label: String,
        /// Group depth (roots are 0).
        depth: usize,
        /// Visible rows in this group and all its descendants.
        row_count: usize,
        /// The group is collapsed (its descendants are not listed).
        collapsed: bool,
    },
    /// A row of the specification.
    Data {
        /// Index into the specification's rows.
        row: usize,
        /// Indentation depth.
        depth: usize,
    },
}

impl DisplayRow {
    /// Indentation depth.
    pub fn depth(&self) -> usize {
        match self {
            Self::GroupHeader { depth, .. } | Self::Data { depth, .. } => *depth,
        }
    }
}

/// The collapsed set implied by the groups' declared `collapsed` flags.
pub fn initial_collapsed(groups: &[Group]) -> HashSet<GroupId> {
    groups
        .iter()
        .filter(|g| g.collapsed)
        .map(|g| g.id.clone())
        .collect()
}

/// Flattens `rows` into display order.
///
/// `order` lists the row indices to show, in order (a filter and/or sort);
/// `None` shows every row in input order. Ungrouped rows come first at depth 0.
/// Each group with visible rows then appears in pre-order from the roots: its
/// header, its child groups, then its own rows. Descendants of a collapsed
/// group are omitted but its header stays. Rows naming an unknown group are
/// treated as ungrouped.
pub fn build_display_rows(
    rows: &[Row],
    groups: &GroupTable,
    collapsed: &HashSet<GroupId>,
    order: Option<&[usize]>,
) -> Vec<DisplayRow> {
    let mut ungrouped = Vec::new();
    let mut direct: Vec<Vec<usize>> = alloc::vec![Vec::new(); groups.len()];
    let mut visit = |i: usize| {
        let Some(row) = rows.get(i) else {
            return;
        };
        match row.group.as_ref().and_then(|g| groups.index_of(g)) {
            Some(g) => direct[g].push(i),
            None => ungrouped.push(i),
        }
    };
    match order {
        Some(order) => order.iter().copied().for_each(&mut visit),
        None => (0..rows.len()).for_each(&mut visit),
    }

    let mut counts = alloc::vec![0_usize; groups.len()];
    for &root in groups.roots() {
        count_rows(root, groups, &direct, &mut counts);
    }

    let mut out: Vec<DisplayRow> = ungrouped
        .into_iter()
        .map(|row| DisplayRow::Data { row, depth: 0 })
        .collect();
    for &root in groups.roots() {
        emit(root, groups, &direct, &counts, collapsed, &mut out);
    }
    out
}

fn count_rows(g: usize, groups: &GroupTable, direct: &[Vec<usize>], counts: &mut [usize]) -> usize {
    let mut n = direct[g].len();
    for &child in groups.children(g) {
        n += count_rows(child, groups, direct, counts);
    }
    counts[g] = n;
    n
}

fn emit(
    g: usize,
    groups: &GroupTable,
    direct: &[Vec<usize>],
    counts: &[usize],
    collapsed: &HashSet<GroupId>,
    out: &mut Vec<DisplayRow>,
) {
    if counts[g] == 0 {
        return;
    }
    let Some(group) = groups.get(g) else {
        return;
    };
    let depth = groups.depth(g);
    let is_collapsed = collapsed.contains(&group.id);
    out.push(DisplayRow::GroupHeader {
        group: group.id.clone(),
        label: group.label.clone(),
        depth,
        row_count: counts[g],
        collapsed: is_collapsed,
    });
    if is_collapsed {
        return;
    }
    for &child in groups.children(g) {
        emit(child, groups, direct, counts, collapsed, out);
    }
    out.extend(
        direct[g]
            .iter()
            .map(|&row| DisplayRow::Data {
                row,
                depth: depth + 1,
            }),
    );
}
