// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A full drag gesture against an in-memory widget store.
//!
//! This example shows how to combine:
//! - `trellis_occupancy` for the per-parent occupied-space index,
//! - `trellis_drag` for projection, collision feedback, and commit,
//! - `trellis_grid` for the pixel/cell transform.
//!
//! Run:
//! - `cargo run -p trellis_demos --example drag_drop`

use std::collections::HashMap;

use kurbo::Point;
use trellis_drag::{
    DragCenter, DragMode, DragSession, PlacementCommand, WidgetFlags, WidgetRecord, WidgetStore,
};
use trellis_grid::{CellRect, SnapGrid};
use trellis_occupancy::{OccupancyIndex, OccupiedSpace, SpaceSource};

const ROOT: u32 = 0;
const CANVAS: u32 = 1;

/// A toy widget store: records plus their current placement per parent.
#[derive(Default)]
struct Store {
    records: HashMap<u32, WidgetRecord<u32>>,
    placements: HashMap<u32, (u32, CellRect)>,
}

impl Store {
    fn add(&mut self, id: u32, parent: u32, rect: CellRect) {
        self.records.insert(
            id,
            WidgetRecord {
                id,
                column_span: rect.column_span(),
                row_span: rect.row_span(),
                flags: WidgetFlags::empty(),
            },
        );
        self.placements.insert(id, (parent, rect));
    }

    /// Apply one mutation command, the way a real store would.
    fn apply(&mut self, command: &PlacementCommand<u32>) {
        let rect = CellRect::new(
            command.left_column,
            command.top_row,
            command.left_column + command.column_span,
            command.top_row + command.row_span,
        );
        self.records
            .entry(command.widget_id)
            .or_insert(WidgetRecord {
                id: command.widget_id,
                column_span: command.column_span,
                row_span: command.row_span,
                flags: WidgetFlags::empty(),
            });
        self.placements.insert(command.widget_id, (command.parent_id, rect));
    }
}

impl SpaceSource<u32> for Store {
    fn visit_spaces<F: FnMut(OccupiedSpace<u32>)>(&self, parent: u32, mut f: F) {
        for (&id, &(p, rect)) in &self.placements {
            if p == parent {
                f(OccupiedSpace::new(id, rect));
            }
        }
    }
}

impl WidgetStore<u32> for Store {
    fn widget_by_id(&self, id: u32) -> Option<WidgetRecord<u32>> {
        self.records.get(&id).copied()
    }
}

fn main() {
    // A canvas with 10×10 pixel cells, 4 px padding, 20 rows.
    let grid = SnapGrid::new(10.0, 10.0, 4.0);
    let mut session = DragSession::new(grid, CANVAS, ROOT, 20);

    // Two widgets already on the canvas.
    let mut store = Store::default();
    store.add(11, CANVAS, CellRect::new(0, 0, 4, 2));
    store.add(12, CANVAS, CellRect::new(6, 0, 10, 3));

    let mut index = OccupancyIndex::new();
    index.rebuild_parent(CANVAS, &store);

    // Grab widget 11 and start dragging.
    session.on_start(
        DragMode::ExistingSelection {
            selection: vec![11],
            center: DragCenter::Widget(11),
        },
        Point::new(10.0, 10.0),
    );

    // First move: straight onto widget 12 — live feedback flags the overlap.
    let blocked = session.on_move(Point::new(75.0, 15.0), &index);
    println!("over widget 12: droppable = {}", blocked.is_droppable());
    assert!(!blocked.is_droppable());

    // Second move: down toward a free area below.
    let clear = session.on_move(Point::new(15.0, 65.0), &index);
    println!("over free cells: droppable = {}", clear.is_droppable());
    for block in &clear.blocks {
        println!(
            "  block {} at ({:.0}, {:.0}) {}x{} px",
            block.widget_id, block.left, block.top, block.width, block.height
        );
    }
    assert!(clear.is_droppable());

    // Drop and apply the resulting commands back to the store.
    let outcome = session.on_drop(Point::new(15.0, 65.0), &index, &store);
    for command in &outcome.commands {
        println!(
            "commit: {:?} widget {} -> parent {} cell ({}, {}) span {}x{}",
            command.operation,
            command.widget_id,
            command.parent_id,
            command.left_column,
            command.top_row,
            command.column_span,
            command.row_span,
        );
        store.apply(command);
    }
    if let Some(request) = outcome.row_request {
        println!("grow parent {} to {} rows", request.parent_id, request.min_rows);
    }

    // The refreshed index reflects the committed placement.
    index.rebuild_parent(CANVAS, &store);
    let spaces = index.spaces(&CANVAS);
    println!("canvas now holds {} widgets:", spaces.len());
    for space in spaces {
        println!(
            "  widget {} at ({}, {}) span {}x{}",
            space.id,
            space.left,
            space.top,
            space.column_span(),
            space.row_span()
        );
    }
}
