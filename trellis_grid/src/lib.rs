// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=trellis_grid --heading-base-level=0

//! Trellis Grid: snap-grid coordinate math for canvas editors.
//!
//! Trellis Grid is the pixel/cell boundary of a drag-and-drop canvas: it owns
//! the transform between continuous pixel space (pointer input, rendered
//! blocks) and discrete grid space (widget placement).
//!
//! - [`SnapGrid`] converts pixel points to [`GridCell`] coordinates and back,
//!   accounting for container padding.
//! - [`CellRect`] is an integer rectangle in cell units with *strict* overlap
//!   semantics: rectangles sharing only an edge do not overlap.
//!
//! Conversion rounds toward negative infinity, so a pointer exactly on a cell
//! boundary maps to the lower cell, and the same input always produces the
//! same cell.
//!
//! # Example
//!
//! ```rust
//! use kurbo::Point;
//! use trellis_grid::{CellRect, GridCell, SnapGrid};
//!
//! let grid = SnapGrid::new(10.0, 10.0, 4.0);
//!
//! // A pointer at (27, 45) lands in cell (2, 4) once padding is removed.
//! assert_eq!(grid.cell_at(Point::new(27.0, 45.0)), GridCell::new(2, 4));
//!
//! // Cell origins convert back to padded pixel space.
//! assert_eq!(grid.cell_origin(GridCell::new(2, 4)), Point::new(24.0, 44.0));
//!
//! // Cell rectangles sharing an edge do not overlap.
//! let a = CellRect::new(0, 0, 2, 2);
//! let b = CellRect::new(2, 0, 4, 2);
//! assert!(!a.overlaps(&b));
//! ```
//!
//! This crate is `no_std`.

#![no_std]

mod cell;
mod snap;

pub use cell::{CellRect, GridCell};
pub use snap::SnapGrid;
