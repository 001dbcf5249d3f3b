// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The tagged shape of a drag gesture.
//!
//! A gesture is either a *new widget* pulled from the palette (not yet part
//! of any parent) or an *existing selection* of widgets already on the
//! canvas. Making the two an explicit variant keeps the projection paths
//! exhaustive and independently testable.

use alloc::vec::Vec;

use crate::types::WidgetFlags;

/// Descriptor for a palette widget being dragged onto the canvas.
///
/// The widget does not exist in the occupancy index yet; its id and spans
/// come from the palette entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct NewWidgetDescriptor<W> {
    /// The id the widget will be created with.
    pub id: W,
    /// Declared horizontal span in grid columns.
    pub columns: i32,
    /// Declared vertical span in grid rows.
    pub rows: i32,
    /// Behavior flags of the widget type.
    pub flags: WidgetFlags,
}

/// The logical center of a group drag — what the pointer grabbed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DragCenter<W> {
    /// The pointer went down on this widget.
    Widget(W),
    /// The pointer went down on the selection box; the anchor is an explicit
    /// cell position.
    SelectionBox {
        /// Anchor row.
        top: i32,
        /// Anchor column.
        left: i32,
    },
}

/// What a drag gesture is carrying.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DragMode<W> {
    /// A palette widget, not yet in any parent.
    NewWidget(NewWidgetDescriptor<W>),
    /// One or more widgets already on the canvas.
    ExistingSelection {
        /// The selected widget ids. Order does not matter; the projector
        /// orders blocks by ascending id.
        selection: Vec<W>,
        /// The drag's logical center, establishing the anchor offset.
        center: DragCenter<W>,
    },
}
