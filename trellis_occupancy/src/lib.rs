// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=trellis_occupancy --heading-base-level=0

//! Trellis Occupancy: the per-parent occupied-space index of a widget canvas.
//!
//! Each widget on a canvas reserves a rectangle of grid cells inside its
//! parent container — its [`OccupiedSpace`]. This crate indexes those
//! rectangles per parent so a drag gesture can ask, cheaply and on every
//! pointer move:
//!
//! - which spaces exist under a given parent, in a stable order,
//! - the space of one widget by id (O(1) within a parent),
//! - all spaces *except* a set of widget ids (the widgets being dragged,
//!   which must not collide with themselves).
//!
//! The index is read-only to the drag engine. The external widget store is
//! the sole writer: when its widget set changes it replaces the affected
//! parent's list (directly or through a [`SpaceSource`]), which bumps the
//! index [version][`OccupancyIndex::version`] so consumers can tell
//! snapshots apart. Malformed spaces — zero or negative spans — are skipped
//! at build time and never reach queries.
//!
//! # Example
//!
//! ```rust
//! use trellis_occupancy::{OccupancyIndex, OccupiedSpace};
//! use trellis_grid::CellRect;
//!
//! let mut index: OccupancyIndex<u32> = OccupancyIndex::new();
//! index.replace_parent(
//!     0,
//!     [
//!         OccupiedSpace::new(1, CellRect::new(0, 0, 4, 2)),
//!         OccupiedSpace::new(2, CellRect::new(4, 0, 8, 3)),
//!     ],
//! );
//!
//! assert_eq!(index.spaces(&0).len(), 2);
//! assert_eq!(index.space_by_id(&0, &2).unwrap().top, 0);
//!
//! // Widget 1 is being dragged: only widget 2 participates in collision.
//! let others: Vec<_> = index.spaces_excluding(&0, &[1]).collect();
//! assert_eq!(others.len(), 1);
//! assert_eq!(others[0].id, 2);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod index;
mod space;

pub use index::{OccupancyIndex, SpaceSource};
pub use space::OccupiedSpace;
