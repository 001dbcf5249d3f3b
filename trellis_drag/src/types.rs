// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Widget records, dragging blocks, and the typed outputs of a gesture.

use kurbo::Point;

bitflags::bitflags! {
    /// Behavior flags on a widget record.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct WidgetFlags: u8 {
        /// The widget never participates in its visual drop target's layout;
        /// a drop always reparents it to the root container.
        const DETACH_FROM_LAYOUT = 0b0000_0001;
    }
}

/// The slice of a widget record the drag engine needs: spans and behavior
/// flags. Everything else about a widget (properties, rendering, children)
/// stays in the external store.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WidgetRecord<W> {
    /// The widget id.
    pub id: W,
    /// Horizontal span in grid columns.
    pub column_span: i32,
    /// Vertical span in grid rows.
    pub row_span: i32,
    /// Behavior flags.
    pub flags: WidgetFlags,
}

/// Widget-by-id lookup — the widget-store collaborator consulted at commit
/// time.
pub trait WidgetStore<W> {
    /// The record for `id`, or `None` if the widget no longer exists.
    fn widget_by_id(&self, id: W) -> Option<WidgetRecord<W>>;
}

/// The pixel-space projection of one dragged widget, rebuilt on every
/// pointer move and never persisted.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DraggingBlock<W> {
    /// The widget this block projects.
    pub widget_id: W,
    /// Pixel y of the block's top edge.
    pub top: f64,
    /// Pixel x of the block's left edge.
    pub left: f64,
    /// Pixel width.
    pub width: f64,
    /// Pixel height.
    pub height: f64,
    /// Horizontal span in grid columns.
    pub column_span: i32,
    /// Vertical span in grid rows.
    pub row_span: i32,
    /// `false` once the validator finds a non-zero-area overlap with a
    /// sibling; drives render feedback and gates the drop.
    pub is_not_colliding: bool,
}

impl<W> DraggingBlock<W> {
    /// The block's pixel origin.
    #[inline]
    pub const fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Pixel y of the block's bottom edge.
    #[inline]
    pub const fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Which mutation the external store should apply for a committed block.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlacementOp {
    /// Position changed; span is unchanged.
    Move,
    /// Span changed (with or without a position change).
    Resize,
}

/// One position/size mutation for the external widget store.
///
/// Commands are emitted in commit order (lowest bottom edge first) and are
/// the engine's only write path to the store.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PlacementCommand<W> {
    /// The mutation kind.
    pub operation: PlacementOp,
    /// The widget to mutate.
    pub widget_id: W,
    /// The parent to (re)attach the widget to.
    pub parent_id: W,
    /// Target top row.
    pub top_row: i32,
    /// Target left column.
    pub left_column: i32,
    /// Vertical span in rows.
    pub row_span: i32,
    /// Horizontal span in columns.
    pub column_span: i32,
}

impl<W: Copy> PlacementCommand<W> {
    /// The bottom row the widget will occupy after this command.
    #[inline]
    pub const fn bottom_row(&self) -> i32 {
        self.top_row + self.row_span
    }
}

/// A request to grow a parent container's row count.
///
/// Emitted by the dynamic row extender while dragging toward the canvas
/// bottom, and by the committer when a drop lands below the current floor.
/// Requests within one gesture never shrink.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RowRequest<W> {
    /// The container whose row count should grow.
    pub parent_id: W,
    /// The minimum row count the container should have.
    pub min_rows: i32,
}
