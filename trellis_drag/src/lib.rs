// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=trellis_drag --heading-base-level=0

//! Trellis Drag: the grid drag-projection engine of a canvas editor.
//!
//! ## Overview
//!
//! This crate turns a stream of pointer events into validated widget
//! placements on a snap grid. It does not render, persist, or own widgets.
//! Instead, feed a [`DragSession`] the pointer positions of a gesture along
//! with the latest [`trellis_occupancy::OccupancyIndex`] snapshot, and it
//! emits deterministic, typed outputs you can apply:
//!
//! - a [`Projection`] on every move — pixel-space
//!   [`DraggingBlock`]s for live feedback, each tagged with
//!   `is_not_colliding`, plus an optional [`RowRequest`] when the drag
//!   approaches the canvas bottom;
//! - a [`DropOutcome`] on drop — ordered [`PlacementCommand`]s for the
//!   external widget store, or nothing at all if any block collides
//!   (atomic accept/reject).
//!
//! ## Gestures
//!
//! A gesture is [`DragMode::NewWidget`] (a palette widget not yet on the
//! canvas, one optimistic block) or [`DragMode::ExistingSelection`] (one
//! block per selected child of the target parent, moving rigidly with the
//! pointer). Blocks are ordered by ascending widget id, so the same inputs
//! always produce the same projection and the same commit order.
//!
//! Failure is never fatal: malformed spans are excluded, stale widget ids
//! vanish from the projection silently, a missing drag center falls back to
//! a default anchor, and a blocked drop is simply a no-op surfaced through
//! the collision flags. Cancellation discards all transient state without
//! emitting anything.
//!
//! ## Workflow
//!
//! 1) Build a [`DragSession`] with the [`trellis_grid::SnapGrid`], the
//!    target parent, the root container, and the parent's row count.
//! 2) On drag start, call [`DragSession::on_start`] with a [`DragMode`].
//! 3) On every pointer move, call [`DragSession::on_move`] with the latest
//!    occupancy snapshot; render the returned blocks and forward any
//!    [`RowRequest`] to the container.
//! 4) On drop, call [`DragSession::on_drop`] with a [`WidgetStore`] and
//!    apply the returned commands in order. On cancel, call
//!    [`DragSession::on_cancel`].
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod mode;
mod session;
mod types;

pub use mode::{DragCenter, DragMode, NewWidgetDescriptor};
pub use session::{DEFAULT_EXTENSION_OFFSET, DragSession, DropOutcome, Projection};
pub use types::{
    DraggingBlock, PlacementCommand, PlacementOp, RowRequest, WidgetFlags, WidgetRecord,
    WidgetStore,
};
