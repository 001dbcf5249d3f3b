// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-gesture drag state machine.
//!
//! A [`DragSession`] lives for the duration of a canvas's drag interactions
//! and owns exactly one gesture at a time. Its surface mirrors the pointer
//! stream: [`on_start`](DragSession::on_start),
//! [`on_move`](DragSession::on_move), [`on_drop`](DragSession::on_drop),
//! [`on_cancel`](DragSession::on_cancel).
//!
//! Every `on_move` rebuilds the projection from scratch against the caller's
//! occupancy snapshot: blocks are positioned, validated for collision, and
//! the dynamic row extender is given a chance to grow the canvas. Nothing is
//! cached across events, so a snapshot that changed between two moves (an
//! undo, another session's mutation) is simply picked up on the next event.
//!
//! A drop either commits every block or none: one colliding block rejects
//! the whole gesture, and rejection is pure state discard — no compensating
//! commands, no partial placement.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use kurbo::{Point, Vec2};
use smallvec::SmallVec;

use trellis_grid::{CellRect, GridCell, SnapGrid};
use trellis_occupancy::OccupancyIndex;

use crate::mode::{DragCenter, DragMode};
use crate::types::{
    DraggingBlock, PlacementCommand, PlacementOp, RowRequest, WidgetFlags, WidgetRecord,
    WidgetStore,
};

/// Safety margin, in rows, between a dragged block's bottom edge and the
/// canvas's lower bound before the canvas is asked to grow.
pub const DEFAULT_EXTENSION_OFFSET: i32 = 2;

/// Anchor reported when a group drag has no resolvable center.
const DEFAULT_HANDLE: Point = Point::new(20.0, 20.0);

/// The per-move output of a gesture: blocks for rendering, the anchor the
/// drag handle should follow, and an optional canvas-growth request.
#[derive(Clone, Debug, PartialEq)]
pub struct Projection<W> {
    /// One block per projected widget, ordered by ascending widget id.
    /// Rendering feedback only — never persisted.
    pub blocks: Vec<DraggingBlock<W>>,
    /// Pixel position of the drag's logical center.
    pub anchor: Point,
    /// Set when the dragged blocks approached the canvas bottom and the
    /// parent's row count should grow.
    pub row_request: Option<RowRequest<W>>,
}

impl<W> Projection<W> {
    const fn idle() -> Self {
        Self {
            blocks: Vec::new(),
            anchor: DEFAULT_HANDLE,
            row_request: None,
        }
    }

    /// Whether a drop at this projection would commit: at least one block,
    /// and every block free of collisions.
    pub fn is_droppable(&self) -> bool {
        !self.blocks.is_empty() && self.blocks.iter().all(|b| b.is_not_colliding)
    }
}

/// The outcome of a drop: the ordered mutation commands for the external
/// store, plus the row floor the placement established.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DropOutcome<W> {
    /// Position/size mutations in commit order (lowest bottom edge first).
    /// Empty when the drop was rejected or the gesture had nothing to place.
    pub commands: Vec<PlacementCommand<W>>,
    /// Set when the committed widgets extend below the session's current row
    /// count, so the parent can grow before the store round-trips.
    pub row_request: Option<RowRequest<W>>,
}

impl<W> DropOutcome<W> {
    const fn rejected() -> Self {
        Self {
            commands: Vec::new(),
            row_request: None,
        }
    }

    /// Whether the drop emitted any commands.
    pub fn committed(&self) -> bool {
        !self.commands.is_empty()
    }
}

impl<W> Default for DropOutcome<W> {
    fn default() -> Self {
        Self::rejected()
    }
}

struct Gesture<W> {
    mode: DragMode<W>,
    start: Point,
    /// Sorted, deduplicated selection; empty in new-widget mode. Doubles as
    /// the collision-exclusion set.
    selection: SmallVec<[W; 8]>,
}

/// Drag state machine for one drop-target parent.
///
/// Constructed with the grid geometry, the target parent, the root
/// container, and the parent's current row count — all fixed for the
/// session except the row count, which only the dynamic row extender (and
/// the committer's persist hook) raises while a gesture is active.
pub struct DragSession<W> {
    grid: SnapGrid,
    parent: W,
    root: W,
    extension_offset: i32,
    current_rows: i32,
    gesture: Option<Gesture<W>>,
}

impl<W: Debug> Debug for DragSession<W> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DragSession")
            .field("parent", &self.parent)
            .field("root", &self.root)
            .field("current_rows", &self.current_rows)
            .field("dragging", &self.gesture.is_some())
            .finish_non_exhaustive()
    }
}

impl<W> DragSession<W>
where
    W: Copy + Eq + Ord + Hash + Debug,
{
    /// Create a session with the default extension offset.
    pub fn new(grid: SnapGrid, parent: W, root: W, rows: i32) -> Self {
        Self::with_extension_offset(grid, parent, root, rows, DEFAULT_EXTENSION_OFFSET)
    }

    /// Create a session with a custom row-extension safety margin.
    pub fn with_extension_offset(
        grid: SnapGrid,
        parent: W,
        root: W,
        rows: i32,
        extension_offset: i32,
    ) -> Self {
        debug_assert!(
            extension_offset >= 0,
            "extension offset must be non-negative"
        );
        Self {
            grid,
            parent,
            root,
            extension_offset,
            current_rows: rows,
            gesture: None,
        }
    }

    /// Whether a gesture is active.
    #[inline]
    pub const fn is_dragging(&self) -> bool {
        self.gesture.is_some()
    }

    /// The parent's row count as this session knows it.
    #[inline]
    pub const fn rows(&self) -> i32 {
        self.current_rows
    }

    /// Resynchronize the row count from the external store.
    ///
    /// Meant for between gestures; within one gesture the count only grows.
    pub fn set_rows(&mut self, rows: i32) {
        self.current_rows = rows;
    }

    /// Begin a gesture at the given pointer position.
    ///
    /// Starting while another gesture is active discards the old one — the
    /// equivalent of a cancel followed by a start.
    pub fn on_start(&mut self, mode: DragMode<W>, position: Point) {
        let mut selection: SmallVec<[W; 8]> = match &mode {
            DragMode::NewWidget(_) => SmallVec::new(),
            DragMode::ExistingSelection { selection, .. } => selection.iter().copied().collect(),
        };
        selection.sort_unstable();
        selection.dedup();
        self.gesture = Some(Gesture {
            mode,
            start: position,
            selection,
        });
    }

    /// Project and validate the gesture at a new pointer position.
    ///
    /// Reads the occupancy snapshot fresh — never cached across events — and
    /// returns an idle projection when no gesture is active.
    pub fn on_move(&mut self, position: Point, index: &OccupancyIndex<W>) -> Projection<W> {
        let (blocks, anchor) = match &self.gesture {
            Some(gesture) => {
                let mut blocks = self.project_blocks(gesture, position, index);
                self.validate(gesture, &mut blocks, index);
                (blocks, self.anchor_of(gesture, position, index))
            }
            None => return Projection::idle(),
        };
        let row_request = self.extend_rows(&blocks);
        Projection {
            blocks,
            anchor,
            row_request,
        }
    }

    /// Drop the gesture at the given pointer position.
    ///
    /// Recomputes the projection against the latest snapshot, and commits
    /// only if every block is collision-free: commands are emitted lowest
    /// bottom edge first, detached widgets reparent to the root container,
    /// and the committed row floor is reported back. Any rejection — no
    /// gesture, nothing to place, or a collision — is a no-op that discards
    /// the transient state.
    pub fn on_drop(
        &mut self,
        position: Point,
        index: &OccupancyIndex<W>,
        store: &impl WidgetStore<W>,
    ) -> DropOutcome<W> {
        let Some(gesture) = self.gesture.take() else {
            return DropOutcome::rejected();
        };

        let mut blocks = self.project_blocks(&gesture, position, index);
        self.validate(&gesture, &mut blocks, index);
        if blocks.is_empty() || !blocks.iter().all(|b| b.is_not_colliding) {
            return DropOutcome::rejected();
        }

        // Reposition widgets lower in the canvas first so a store applying
        // mutations one at a time never sees transient overlap.
        blocks.sort_by(|a, b| a.bottom().total_cmp(&b.bottom()));

        let mut commands = Vec::with_capacity(blocks.len());
        let mut floor = self.current_rows;
        for block in &blocks {
            let record = match &gesture.mode {
                DragMode::NewWidget(desc) => WidgetRecord {
                    id: desc.id,
                    column_span: desc.columns,
                    row_span: desc.rows,
                    flags: desc.flags,
                },
                DragMode::ExistingSelection { .. } => {
                    match store.widget_by_id(block.widget_id) {
                        Some(record) => record,
                        // Deleted between projection and drop; skip it and
                        // keep committing the rest.
                        None => continue,
                    }
                }
            };

            let cell = self.grid.cell_at(block.origin());
            let parent_id = if record.flags.contains(WidgetFlags::DETACH_FROM_LAYOUT) {
                self.root
            } else {
                self.parent
            };
            let operation =
                if block.column_span == record.column_span && block.row_span == record.row_span {
                    PlacementOp::Move
                } else {
                    PlacementOp::Resize
                };

            let command = PlacementCommand {
                operation,
                widget_id: block.widget_id,
                parent_id,
                top_row: cell.row,
                left_column: cell.column,
                row_span: block.row_span,
                column_span: block.column_span,
            };
            floor = floor.max(command.bottom_row());
            commands.push(command);
        }

        // Persist hook: the parent's minimum row count reflects the
        // just-placed widgets before the store round-trips.
        let row_request = if floor > self.current_rows {
            self.current_rows = floor;
            Some(RowRequest {
                parent_id: self.parent,
                min_rows: floor,
            })
        } else {
            None
        };

        DropOutcome {
            commands,
            row_request,
        }
    }

    /// Abandon the gesture, discarding all transient state.
    ///
    /// Pure discard: no commands, no compensating actions. A subsequent drop
    /// without a new start is a no-op.
    pub fn on_cancel(&mut self) {
        self.gesture = None;
    }

    fn project_blocks(
        &self,
        gesture: &Gesture<W>,
        position: Point,
        index: &OccupancyIndex<W>,
    ) -> Vec<DraggingBlock<W>> {
        let delta = position - gesture.start;
        match &gesture.mode {
            DragMode::NewWidget(desc) => {
                // A malformed descriptor is excluded rather than failing the
                // gesture; the projection is simply empty.
                if desc.columns <= 0 || desc.rows <= 0 {
                    return Vec::new();
                }
                let size = self.grid.span_size(desc.columns, desc.rows);
                let mut blocks = Vec::with_capacity(1);
                blocks.push(DraggingBlock {
                    widget_id: desc.id,
                    top: position.y,
                    left: position.x,
                    width: size.width,
                    height: size.height,
                    column_span: desc.columns,
                    row_span: desc.rows,
                    is_not_colliding: true,
                });
                blocks
            }
            DragMode::ExistingSelection { .. } => {
                let mut blocks = Vec::with_capacity(gesture.selection.len());
                // The selection is sorted, so the block order is ascending
                // by widget id and the projection is deterministic.
                for &id in &gesture.selection {
                    let Some(space) = index.space_by_id(&self.parent, &id) else {
                        // Stale id (deleted mid-drag): dropped silently.
                        continue;
                    };
                    if !space.is_valid() {
                        continue;
                    }
                    let base = self
                        .grid
                        .cell_origin(GridCell::new(space.left, space.top));
                    let origin = base + delta;
                    let size = self.grid.span_size(space.column_span(), space.row_span());
                    blocks.push(DraggingBlock {
                        widget_id: id,
                        top: origin.y,
                        left: origin.x,
                        width: size.width,
                        height: size.height,
                        column_span: space.column_span(),
                        row_span: space.row_span(),
                        is_not_colliding: true,
                    });
                }
                blocks
            }
        }
    }

    fn validate(
        &self,
        gesture: &Gesture<W>,
        blocks: &mut [DraggingBlock<W>],
        index: &OccupancyIndex<W>,
    ) {
        for block in blocks {
            let cell = self.grid.cell_at(block.origin());
            let rect = CellRect::from_origin_span(cell, block.column_span, block.row_span);
            block.is_not_colliding = !index
                .spaces_excluding(&self.parent, &gesture.selection)
                .any(|space| space.rect().overlaps(&rect));
        }
    }

    fn anchor_of(
        &self,
        gesture: &Gesture<W>,
        position: Point,
        index: &OccupancyIndex<W>,
    ) -> Point {
        let delta: Vec2 = position - gesture.start;
        match &gesture.mode {
            DragMode::NewWidget(_) => position,
            DragMode::ExistingSelection { center, .. } => match center {
                DragCenter::Widget(id) => match index.space_by_id(&self.parent, id) {
                    Some(space) => {
                        self.grid.cell_origin(GridCell::new(space.left, space.top)) + delta
                    }
                    // No resolvable anchor: fall back rather than fail.
                    None => DEFAULT_HANDLE,
                },
                DragCenter::SelectionBox { top, left } => {
                    self.grid.cell_origin(GridCell::new(*left, *top)) + delta
                }
            },
        }
    }

    fn extend_rows(&mut self, blocks: &[DraggingBlock<W>]) -> Option<RowRequest<W>> {
        let bottom = blocks
            .iter()
            .map(DraggingBlock::bottom)
            .fold(f64::NEG_INFINITY, f64::max);
        if !bottom.is_finite() {
            return None;
        }
        let bottom_row = self.grid.row_at(bottom);
        if bottom_row <= self.current_rows - self.extension_offset {
            return None;
        }
        let needed = bottom_row.saturating_add(self.extension_offset);
        // Growth is monotonic within a gesture; never request a shrink.
        if needed <= self.current_rows {
            return None;
        }
        self.current_rows = needed;
        Some(RowRequest {
            parent_id: self.parent,
            min_rows: needed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_HANDLE, DragSession, Projection};
    use crate::mode::{DragCenter, DragMode, NewWidgetDescriptor};
    use crate::types::{PlacementOp, RowRequest, WidgetFlags, WidgetRecord, WidgetStore};
    use alloc::collections::BTreeMap;
    use alloc::vec;
    use alloc::vec::Vec;
    use kurbo::Point;
    use trellis_grid::{CellRect, SnapGrid};
    use trellis_occupancy::{OccupancyIndex, OccupiedSpace};

    const PARENT: u32 = 7;
    const ROOT: u32 = 0;

    /// 10×10 pixel cells, no padding, 20 rows.
    fn session() -> DragSession<u32> {
        DragSession::new(SnapGrid::new(10.0, 10.0, 0.0), PARENT, ROOT, 20)
    }

    fn space(id: u32, left: i32, top: i32, right: i32, bottom: i32) -> OccupiedSpace<u32> {
        OccupiedSpace::new(id, CellRect::new(left, top, right, bottom))
    }

    fn index_with(spaces: Vec<OccupiedSpace<u32>>) -> OccupancyIndex<u32> {
        let mut index = OccupancyIndex::new();
        index.replace_parent(PARENT, spaces);
        index
    }

    #[derive(Default)]
    struct Store(BTreeMap<u32, WidgetRecord<u32>>);

    impl Store {
        fn with(records: Vec<WidgetRecord<u32>>) -> Self {
            Self(records.into_iter().map(|r| (r.id, r)).collect())
        }
    }

    impl WidgetStore<u32> for Store {
        fn widget_by_id(&self, id: u32) -> Option<WidgetRecord<u32>> {
            self.0.get(&id).copied()
        }
    }

    fn record(id: u32, column_span: i32, row_span: i32) -> WidgetRecord<u32> {
        WidgetRecord {
            id,
            column_span,
            row_span,
            flags: WidgetFlags::empty(),
        }
    }

    fn new_widget(id: u32, columns: i32, rows: i32) -> DragMode<u32> {
        DragMode::NewWidget(NewWidgetDescriptor {
            id,
            columns,
            rows,
            flags: WidgetFlags::empty(),
        })
    }

    fn selection_of(ids: Vec<u32>, center: u32) -> DragMode<u32> {
        DragMode::ExistingSelection {
            selection: ids,
            center: DragCenter::Widget(center),
        }
    }

    #[test]
    fn new_widget_on_empty_canvas_commits_at_origin() {
        let mut session = session();
        let index = index_with(vec![]);
        let store = Store::default();

        session.on_start(new_widget(10, 2, 1), Point::new(0.0, 0.0));
        let projection = session.on_move(Point::new(0.0, 0.0), &index);

        assert_eq!(projection.blocks.len(), 1);
        let block = &projection.blocks[0];
        assert!(block.is_not_colliding);
        assert_eq!(block.width, 20.0);
        assert_eq!(block.height, 10.0);
        assert!(projection.is_droppable());

        let outcome = session.on_drop(Point::new(0.0, 0.0), &index, &store);
        assert_eq!(outcome.commands.len(), 1);
        let command = &outcome.commands[0];
        assert_eq!(command.operation, PlacementOp::Move);
        assert_eq!(command.widget_id, 10);
        assert_eq!(command.top_row, 0);
        assert_eq!(command.left_column, 0);
        assert_eq!(command.column_span, 2);
        assert_eq!(command.row_span, 1);
        assert!(!session.is_dragging());
    }

    #[test]
    fn overlap_marks_block_and_rejects_drop() {
        let mut session = session();
        let index = index_with(vec![space(1, 0, 0, 4, 4)]);
        let store = Store::default();

        session.on_start(new_widget(10, 2, 2), Point::new(0.0, 0.0));
        let projection = session.on_move(Point::new(10.0, 10.0), &index);
        assert!(!projection.blocks[0].is_not_colliding);
        assert!(!projection.is_droppable());

        let outcome = session.on_drop(Point::new(10.0, 10.0), &index, &store);
        assert!(!outcome.committed());
    }

    #[test]
    fn touching_edges_do_not_collide() {
        let mut session = session();
        let index = index_with(vec![space(1, 0, 0, 2, 2)]);
        let store = Store::default();

        // Flush against the occupied space's right edge.
        session.on_start(new_widget(10, 2, 2), Point::new(20.0, 0.0));
        let projection = session.on_move(Point::new(20.0, 0.0), &index);
        assert!(projection.blocks[0].is_not_colliding);

        let outcome = session.on_drop(Point::new(20.0, 0.0), &index, &store);
        assert_eq!(outcome.commands.len(), 1);
        assert_eq!(outcome.commands[0].left_column, 2);
    }

    #[test]
    fn selection_moves_rigidly_and_in_id_order() {
        let mut session = session();
        let index = index_with(vec![space(2, 4, 0, 6, 2), space(1, 0, 0, 2, 2)]);

        // Selection order does not matter; blocks come back ascending by id.
        session.on_start(selection_of(vec![2, 1], 1), Point::new(5.0, 5.0));
        let projection = session.on_move(Point::new(30.0, 18.0), &index);

        assert_eq!(projection.blocks.len(), 2);
        assert_eq!(projection.blocks[0].widget_id, 1);
        assert_eq!(projection.blocks[1].widget_id, 2);

        // Both blocks moved by the same (25, 13) pixel delta.
        assert_eq!(projection.blocks[0].origin(), Point::new(25.0, 13.0));
        assert_eq!(projection.blocks[1].origin(), Point::new(65.0, 13.0));
    }

    #[test]
    fn selection_does_not_collide_with_itself() {
        let mut session = session();
        let index = index_with(vec![space(1, 0, 0, 2, 2), space(2, 2, 0, 4, 2)]);

        // A one-cell nudge overlaps widget 2's old space with widget 1's new
        // position; both are part of the gesture, so neither collides.
        session.on_start(selection_of(vec![1, 2], 1), Point::new(0.0, 0.0));
        let projection = session.on_move(Point::new(10.0, 0.0), &index);
        assert!(projection.is_droppable());
    }

    #[test]
    fn stale_selection_id_is_dropped_silently() {
        let mut session = session();
        let index = index_with(vec![space(1, 0, 0, 2, 2)]);

        session.on_start(selection_of(vec![1, 99], 1), Point::new(0.0, 0.0));
        let projection = session.on_move(Point::new(0.0, 0.0), &index);

        assert_eq!(projection.blocks.len(), 1);
        assert_eq!(projection.blocks[0].widget_id, 1);
    }

    #[test]
    fn one_colliding_block_rejects_the_whole_group() {
        let mut session = session();
        // Widget 3 sits at columns 6..8; moving the pair {1, 2} right by
        // three cells lands widget 2 on top of it while widget 1 stays clear.
        let index = index_with(vec![
            space(1, 0, 0, 2, 2),
            space(2, 2, 0, 4, 2),
            space(3, 6, 0, 8, 2),
        ]);
        let store = Store::with(vec![record(1, 2, 2), record(2, 2, 2)]);

        session.on_start(selection_of(vec![1, 2], 1), Point::new(0.0, 0.0));
        let projection = session.on_move(Point::new(30.0, 0.0), &index);

        let by_id: BTreeMap<u32, bool> = projection
            .blocks
            .iter()
            .map(|b| (b.widget_id, b.is_not_colliding))
            .collect();
        assert!(by_id[&1]);
        assert!(!by_id[&2]);

        // Atomic reject: zero commands.
        let outcome = session.on_drop(Point::new(30.0, 0.0), &index, &store);
        assert!(outcome.commands.is_empty());
    }

    #[test]
    fn commit_order_is_bottom_edge_first() {
        let mut session = session();
        // Widget 1's bottom lands on row 5, widget 2's on row 2.
        let index = index_with(vec![space(1, 0, 3, 2, 5), space(2, 4, 1, 6, 2)]);
        let store = Store::with(vec![record(1, 2, 2), record(2, 2, 1)]);

        session.on_start(selection_of(vec![1, 2], 1), Point::new(0.0, 0.0));
        let outcome = session.on_drop(Point::new(0.0, 0.0), &index, &store);

        let ids: Vec<u32> = outcome.commands.iter().map(|c| c.widget_id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn detach_from_layout_reparents_to_root() {
        let mut session = session();
        let index = index_with(vec![space(1, 0, 0, 2, 2), space(2, 4, 0, 6, 2)]);
        let store = Store::with(vec![
            WidgetRecord {
                flags: WidgetFlags::DETACH_FROM_LAYOUT,
                ..record(1, 2, 2)
            },
            record(2, 2, 2),
        ]);

        session.on_start(selection_of(vec![1, 2], 1), Point::new(0.0, 0.0));
        let outcome = session.on_drop(Point::new(0.0, 20.0), &index, &store);

        assert_eq!(outcome.commands.len(), 2);
        for command in &outcome.commands {
            let expected = if command.widget_id == 1 { ROOT } else { PARENT };
            assert_eq!(command.parent_id, expected);
        }
    }

    #[test]
    fn row_extension_triggers_near_the_bottom() {
        let mut session = session();
        let index = index_with(vec![]);

        session.on_start(new_widget(10, 1, 1), Point::new(0.0, 0.0));

        // Bottom edge at pixel 195 maps to row 19; 19 > 20 - 2 triggers a
        // request for 19 + 2 rows.
        let projection = session.on_move(Point::new(0.0, 185.0), &index);
        assert_eq!(
            projection.row_request,
            Some(RowRequest {
                parent_id: PARENT,
                min_rows: 21
            })
        );
        assert_eq!(session.rows(), 21);
    }

    #[test]
    fn row_extension_quiet_away_from_the_bottom() {
        let mut session = session();
        let index = index_with(vec![]);

        session.on_start(new_widget(10, 1, 1), Point::new(0.0, 0.0));

        // Bottom edge on row 10 is well above the threshold.
        let projection = session.on_move(Point::new(0.0, 95.0), &index);
        assert_eq!(projection.row_request, None);
        assert_eq!(session.rows(), 20);
    }

    #[test]
    fn row_extension_is_monotonic_within_a_gesture() {
        let mut session = session();
        let index = index_with(vec![]);

        session.on_start(new_widget(10, 1, 1), Point::new(0.0, 0.0));

        let down = session.on_move(Point::new(0.0, 185.0), &index);
        assert_eq!(down.row_request.unwrap().min_rows, 21);

        // Deeper: grows again.
        let deeper = session.on_move(Point::new(0.0, 225.0), &index);
        assert_eq!(deeper.row_request.unwrap().min_rows, 25);

        // Back up: no shrink request, floor stays.
        let back = session.on_move(Point::new(0.0, 95.0), &index);
        assert_eq!(back.row_request, None);
        assert_eq!(session.rows(), 25);
    }

    #[test]
    fn drop_reports_row_floor_of_placed_widgets() {
        let mut session = DragSession::new(SnapGrid::new(10.0, 10.0, 0.0), PARENT, ROOT, 5);
        let index = index_with(vec![]);
        let store = Store::default();

        session.on_start(new_widget(10, 2, 3), Point::new(0.0, 0.0));
        let outcome = session.on_drop(Point::new(0.0, 50.0), &index, &store);

        // Placed at rows 5..8: the parent must grow to at least 8 rows.
        assert_eq!(outcome.commands[0].top_row, 5);
        assert_eq!(
            outcome.row_request,
            Some(RowRequest {
                parent_id: PARENT,
                min_rows: 8
            })
        );
        assert_eq!(session.rows(), 8);
    }

    #[test]
    fn cancel_then_drop_emits_nothing() {
        let mut session = session();
        let index = index_with(vec![]);
        let store = Store::default();

        session.on_start(new_widget(10, 2, 1), Point::new(0.0, 0.0));
        let _ = session.on_move(Point::new(30.0, 30.0), &index);
        session.on_cancel();

        assert!(!session.is_dragging());
        let outcome = session.on_drop(Point::new(30.0, 30.0), &index, &store);
        assert!(outcome.commands.is_empty());
        assert_eq!(outcome.row_request, None);
    }

    #[test]
    fn move_and_drop_without_start_are_noops() {
        let mut session = session();
        let index = index_with(vec![space(1, 0, 0, 2, 2)]);
        let store = Store::default();

        assert_eq!(
            session.on_move(Point::new(5.0, 5.0), &index),
            Projection::idle()
        );
        assert!(!session.on_drop(Point::new(5.0, 5.0), &index, &store).committed());
    }

    #[test]
    fn accepted_drop_leaves_no_overlap() {
        let mut session = session();
        let mut index = index_with(vec![space(1, 0, 0, 2, 2), space(2, 4, 0, 6, 2)]);
        let store = Store::with(vec![record(1, 2, 2)]);

        session.on_start(selection_of(vec![1], 1), Point::new(0.0, 0.0));
        let outcome = session.on_drop(Point::new(0.0, 40.0), &index, &store);
        assert_eq!(outcome.commands.len(), 1);

        // Apply the commands back to the store's occupancy and rebuild.
        let command = &outcome.commands[0];
        index.replace_parent(
            PARENT,
            vec![
                space(
                    command.widget_id,
                    command.left_column,
                    command.top_row,
                    command.left_column + command.column_span,
                    command.top_row + command.row_span,
                ),
                space(2, 4, 0, 6, 2),
            ],
        );

        let spaces = index.spaces(&PARENT);
        for (i, a) in spaces.iter().enumerate() {
            for b in &spaces[i + 1..] {
                assert!(
                    !a.rect().overlaps(&b.rect()),
                    "post-commit overlap between {a:?} and {b:?}"
                );
            }
        }
    }

    #[test]
    fn invalid_new_widget_descriptor_projects_nothing() {
        let mut session = session();
        let index = index_with(vec![]);
        let store = Store::default();

        session.on_start(new_widget(10, 0, 3), Point::new(0.0, 0.0));
        let projection = session.on_move(Point::new(0.0, 0.0), &index);
        assert!(projection.blocks.is_empty());
        assert!(!projection.is_droppable());

        let outcome = session.on_drop(Point::new(0.0, 0.0), &index, &store);
        assert!(outcome.commands.is_empty());
    }

    #[test]
    fn stale_record_at_commit_is_skipped() {
        let mut session = session();
        let index = index_with(vec![space(1, 0, 0, 2, 2), space(2, 4, 0, 6, 2)]);
        // Widget 2 vanished from the store between projection and drop.
        let store = Store::with(vec![record(1, 2, 2)]);

        session.on_start(selection_of(vec![1, 2], 1), Point::new(0.0, 0.0));
        let outcome = session.on_drop(Point::new(0.0, 30.0), &index, &store);

        assert_eq!(outcome.commands.len(), 1);
        assert_eq!(outcome.commands[0].widget_id, 1);
    }

    #[test]
    fn span_change_commits_as_resize() {
        let mut session = session();
        // The occupied space says 2×3, the store record says 2×2: the store
        // must receive a resize, not a move.
        let index = index_with(vec![space(1, 0, 0, 2, 3)]);
        let store = Store::with(vec![record(1, 2, 2)]);

        session.on_start(selection_of(vec![1], 1), Point::new(0.0, 0.0));
        let outcome = session.on_drop(Point::new(0.0, 50.0), &index, &store);

        assert_eq!(outcome.commands[0].operation, PlacementOp::Resize);
        assert_eq!(outcome.commands[0].row_span, 3);
    }

    #[test]
    fn anchor_follows_the_center_widget() {
        let mut session = session();
        let index = index_with(vec![space(1, 2, 1, 4, 3)]);

        session.on_start(selection_of(vec![1], 1), Point::new(25.0, 15.0));
        let projection = session.on_move(Point::new(31.0, 22.0), &index);

        // Center space origin (20, 10) plus the (6, 7) pointer delta.
        assert_eq!(projection.anchor, Point::new(26.0, 17.0));
    }

    #[test]
    fn selection_box_center_is_an_explicit_anchor() {
        let mut session = session();
        let index = index_with(vec![space(1, 0, 0, 2, 2)]);

        session.on_start(
            DragMode::ExistingSelection {
                selection: vec![1],
                center: DragCenter::SelectionBox { top: 3, left: 2 },
            },
            Point::new(0.0, 0.0),
        );
        let projection = session.on_move(Point::new(4.0, 6.0), &index);
        assert_eq!(projection.anchor, Point::new(24.0, 36.0));
    }

    #[test]
    fn unresolvable_center_falls_back_to_default_handle() {
        let mut session = session();
        let index = index_with(vec![space(1, 0, 0, 2, 2)]);

        // The center widget is not in the index; the gesture continues with
        // the fixed default anchor.
        session.on_start(selection_of(vec![1], 99), Point::new(0.0, 0.0));
        let projection = session.on_move(Point::new(50.0, 50.0), &index);

        assert_eq!(projection.anchor, DEFAULT_HANDLE);
        assert_eq!(projection.blocks.len(), 1);
    }

    #[test]
    fn padding_offsets_blocks_and_commits() {
        let grid = SnapGrid::new(10.0, 10.0, 4.0);
        let mut session = DragSession::new(grid, PARENT, ROOT, 20);
        let index = index_with(vec![space(1, 0, 0, 2, 2)]);
        let store = Store::with(vec![record(1, 2, 2)]);

        session.on_start(selection_of(vec![1], 1), Point::new(0.0, 0.0));

        // At zero delta the block sits at the padded pixel origin.
        let projection = session.on_move(Point::new(0.0, 0.0), &index);
        assert_eq!(projection.blocks[0].origin(), Point::new(4.0, 4.0));

        // Moving right by three cells commits to column 3.
        let outcome = session.on_drop(Point::new(30.0, 0.0), &index, &store);
        assert_eq!(outcome.commands[0].left_column, 3);
        assert_eq!(outcome.commands[0].top_row, 0);
    }

    #[test]
    fn snapshot_is_read_fresh_on_every_move() {
        let mut session = session();
        let mut index = index_with(vec![space(1, 0, 0, 2, 2), space(2, 4, 0, 6, 2)]);

        session.on_start(selection_of(vec![1], 1), Point::new(0.0, 0.0));
        let before = session.on_move(Point::new(40.0, 0.0), &index);
        assert!(!before.blocks[0].is_not_colliding);

        // Another actor moves widget 2 out of the way between two events.
        index.replace_parent(PARENT, vec![space(1, 0, 0, 2, 2), space(2, 4, 8, 6, 10)]);
        let after = session.on_move(Point::new(40.0, 0.0), &index);
        assert!(after.blocks[0].is_not_colliding);
    }
}
