// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The versioned parent → occupied-space mapping.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::HashMap;

use crate::space::OccupiedSpace;

/// Source of occupied spaces for one parent — the widget-store query seam.
///
/// The external widget store implements this so the index can be rebuilt per
/// parent whenever the store signals a widget-set change. The visit order
/// becomes the index's iteration order for that parent.
pub trait SpaceSource<W> {
    /// Visit the occupied spaces of every direct child of `parent`.
    fn visit_spaces<F: FnMut(OccupiedSpace<W>)>(&self, parent: W, f: F);
}

#[derive(Clone)]
struct ParentSpaces<W> {
    spaces: Vec<OccupiedSpace<W>>,
    by_id: HashMap<W, usize>,
}

impl<W> Default for ParentSpaces<W> {
    fn default() -> Self {
        Self {
            spaces: Vec::new(),
            by_id: HashMap::new(),
        }
    }
}

/// Mapping from parent-widget id to the ordered occupied spaces of its
/// direct children.
///
/// The index is read-mostly shared state: the drag engine only reads it, and
/// reads the latest snapshot on every evaluation. Every mutation bumps
/// [`version`][Self::version] so consumers can tell whether the occupancy
/// changed between two pointer-move evaluations.
pub struct OccupancyIndex<W> {
    parents: HashMap<W, ParentSpaces<W>>,
    version: u64,
}

impl<W> Debug for OccupancyIndex<W> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total: usize = self.parents.values().map(|p| p.spaces.len()).sum();
        f.debug_struct("OccupancyIndex")
            .field("parents", &self.parents.len())
            .field("spaces", &total)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

impl<W> Default for OccupancyIndex<W>
where
    W: Copy + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<W> OccupancyIndex<W>
where
    W: Copy + Eq + Hash,
{
    /// Create an empty index.
    pub fn new() -> Self {
        Self {
            parents: HashMap::new(),
            version: 0,
        }
    }

    /// The snapshot version. Bumped by every mutation.
    #[inline]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Replace the occupied spaces of one parent.
    ///
    /// Malformed spaces (no area) and duplicate widget ids are skipped; the
    /// first space wins on a duplicate. Returns the number of spaces kept.
    pub fn replace_parent(
        &mut self,
        parent: W,
        spaces: impl IntoIterator<Item = OccupiedSpace<W>>,
    ) -> usize {
        let entry = self.parents.entry(parent).or_default();
        entry.spaces.clear();
        entry.by_id.clear();
        for space in spaces {
            if !space.is_valid() {
                continue;
            }
            if entry.by_id.contains_key(&space.id) {
                debug_assert!(false, "duplicate widget id in occupied spaces");
                continue;
            }
            entry.by_id.insert(space.id, entry.spaces.len());
            entry.spaces.push(space);
        }
        self.version += 1;
        entry.spaces.len()
    }

    /// Rebuild one parent's list from a [`SpaceSource`].
    pub fn rebuild_parent<S: SpaceSource<W>>(&mut self, parent: W, source: &S) -> usize {
        let mut collected = Vec::new();
        source.visit_spaces(parent, |space| collected.push(space));
        self.replace_parent(parent, collected)
    }

    /// Forget a parent entirely (for example, a deleted container).
    pub fn remove_parent(&mut self, parent: &W) {
        if self.parents.remove(parent).is_some() {
            self.version += 1;
        }
    }

    /// The ordered occupied spaces of `parent`'s direct children.
    ///
    /// An unknown parent yields an empty slice.
    pub fn spaces(&self, parent: &W) -> &[OccupiedSpace<W>] {
        self.parents
            .get(parent)
            .map(|p| p.spaces.as_slice())
            .unwrap_or(&[])
    }

    /// The space of one widget within a parent, if present.
    pub fn space_by_id(&self, parent: &W, id: &W) -> Option<&OccupiedSpace<W>> {
        let entry = self.parents.get(parent)?;
        entry.by_id.get(id).map(|&i| &entry.spaces[i])
    }

    /// The spaces of `parent`'s children whose ids are not in `excluded`.
    ///
    /// This is the collision-validator view: the widgets being dragged are
    /// excluded so a selection never collides with itself. `excluded` is
    /// expected to be small (the current selection), so a linear scan of it
    /// per space is cheaper than building a set.
    pub fn spaces_excluding<'a>(
        &'a self,
        parent: &W,
        excluded: &'a [W],
    ) -> impl Iterator<Item = &'a OccupiedSpace<W>> {
        self.spaces(parent)
            .iter()
            .filter(move |space| !excluded.contains(&space.id))
    }
}
