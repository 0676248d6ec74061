// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flat group table with memoised depths.

extern crate alloc;

use alloc::vec::Vec;

use hashbrown::{HashMap, HashSet};

use crate::spec::{Group, GroupId};

/// Upper bound on parent hops when computing a depth.
pub const MAX_GROUP_DEPTH: usize = 100;

/// Groups indexed by id, with depth and children resolved once.
///
/// Depths are computed by a parent walk capped at [`MAX_GROUP_DEPTH`]: a
/// cycle or a dangling parent ends the walk and the depth reached so far is
/// kept. Every member of a cycle becomes a root. After construction the
/// table is authoritative.
#[derive(Clone, Debug, Default)]
pub struct GroupTable {
    groups: Vec<Group>,
    index: HashMap<GroupId, usize>,
    depth: Vec<usize>,
    children: Vec<Vec<usize>>,
    roots: Vec<usize>,
}

impl GroupTable {
    /// Builds the table. Later duplicates of an id are ignored.
    pub fn new(groups: &[Group]) -> Self {
        let mut table = Self::default();
        for g in groups {
            if table.index.contains_key(&g.id) {
                log::warn!("duplicate group id `{}` ignored", g.id.as_str());
                continue;
            }
            table.index.insert(g.id.clone(), table.groups.len());
            table.groups.push(g.clone());
        }

        let n = table.groups.len();
        let walks: Vec<(usize, bool)> = (0..n).map(|i| table.walk_depth(i)).collect();
        table.depth = walks.iter().map(|&(d, _)| d).collect();
        table.children = alloc::vec![Vec::new(); n];
        for (i, &(_, cyclic)) in walks.iter().enumerate() {
            match table.parent_index(i) {
                // Members of a parent cycle are promoted to roots.
                Some(p) if !cyclic => table.children[p].push(i),
                _ => table.roots.push(i),
            }
        }
        table
    }

    /// Returns the depth of `start` and whether its parent chain loops back to it.
    ///
    /// The walk follows the chain until it ends or repeats, so cycles of any
    /// length are detected. The reported depth is capped at [`MAX_GROUP_DEPTH`].
    fn walk_depth(&self, start: usize) -> (usize, bool) {
        let mut seen = HashSet::new();
        seen.insert(start);
        let mut hops = 0;
        let mut cur = start;
        while let Some(p) = self.parent_index(cur) {
            if p == start {
                log::warn!(
                    "group `{}` is part of a parent cycle",
                    self.groups[start].id.as_str()
                );
                return (hops.min(MAX_GROUP_DEPTH), true);
            }
            // A chain that runs into some other cycle.
            if !seen.insert(p) {
                break;
            }
            hops += 1;
            cur = p;
        }
        (hops.min(MAX_GROUP_DEPTH), false)
    }

    fn parent_index(&self, i: usize) -> Option<usize> {
        let parent = self.groups[i].parent.as_ref()?;
        self.index.get(parent).copied()
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Index of `id`.
    pub fn index_of(&self, id: &GroupId) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Group at `index`.
    pub fn get(&self, index: usize) -> Option<&Group> {
        self.groups.get(index)
    }

    /// Depth of the group at `index` (roots are 0).
    pub fn depth(&self, index: usize) -> usize {
        self.depth.get(index).copied().unwrap_or(0)
    }

    /// Depth of the group `id`, if known.
    pub fn depth_of(&self, id: &GroupId) -> Option<usize> {
        self.index_of(id).map(|i| self.depth(i))
    }

    /// Parent index of the group at `index`.
    ///
    /// Groups promoted to roots report no parent.
    pub fn parent(&self, index: usize) -> Option<usize> {
        if self.roots.contains(&index) {
            return None;
        }
        self.parent_index(index)
    }

    /// Children of the group at `index`, in declaration order.
    pub fn children(&self, index: usize) -> &[usize] {
        self.children.get(index).map_or(&[], Vec::as_slice)
    }

    /// Root groups, in declaration order.
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    /// Ancestors of `index`, nearest first, bounded like the depth walk.
    pub fn ancestors(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        let mut cur = index;
        let mut hops = 0;
        core::iter::from_fn(move || {
            if hops >= MAX_GROUP_DEPTH {
                return None;
            }
            let p = self.parent(cur).filter(|&p| p != index)?;
            hops += 1;
            cur = p;
            Some(p)
        })
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    #[test]
    fn depths_follow_parents() {
        let table = GroupTable::new(&[
            Group::new("a", "A"),
            Group::new("b", "B").with_parent("a"),
            Group::new("c", "C").with_parent("b"),
            Group::new("d", "D"),
        ]);
        assert_eq!(table.depth_of(&"c".into()), Some(2));
        assert_eq!(table.depth_of(&"d".into()), Some(0));
        assert_eq!(table.roots(), [0, 3]);
        assert_eq!(table.children(0), [1]);
        let up: Vec<_> = table.ancestors(2).collect();
        assert_eq!(up, vec![1, 0]);
    }

    #[test]
    fn cycles_and_dangling_parents_terminate() {
        let table = GroupTable::new(&[
            Group::new("x", "X").with_parent("y"),
            Group::new("y", "Y").with_parent("x"),
            Group::new("z", "Z").with_parent("missing"),
        ]);
        assert!(table.depth(0) <= MAX_GROUP_DEPTH, "depth stays capped");
        assert_eq!(table.depth_of(&"z".into()), Some(0));
        assert_eq!(table.roots(), [0, 1, 2], "cycle members become roots");
        assert_eq!(table.ancestors(0).count(), 0);
    }

    #[test]
    fn cycles_longer_than_the_hop_cap_are_found() {
        let n = MAX_GROUP_DEPTH + 20;
        let groups: Vec<Group> = (0..n)
            .map(|i| {
                Group::new(alloc::format!("g{i}"), "")
                    .with_parent(alloc::format!("g{}", (i + 1) % n))
            })
            .collect();
        let table = GroupTable::new(&groups);
        assert_eq!(table.roots().len(), n, "every cycle member is a root");
        assert!(
            (0..n).all(|i| table.depth(i) <= MAX_GROUP_DEPTH),
            "depths stay capped"
        );
    }

    #[test]
    fn chains_into_a_cycle_hang_off_it() {
        let table = GroupTable::new(&[
            Group::new("x", "X").with_parent("y"),
            Group::new("y", "Y").with_parent("x"),
            Group::new("t", "T").with_parent("x"),
        ]);
        assert_eq!(table.roots(), [0, 1], "only cycle members are promoted");
        assert_eq!(table.children(0), [2]);
    }
}
