// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The pixel/cell transform.

use kurbo::{Point, Rect, Size};

use crate::cell::{CellRect, GridCell};

/// The pixel geometry of a snap grid, fixed for the duration of a drag
/// session.
///
/// `padding` is the container's inner padding in pixels: cell `(0, 0)` has
/// its pixel origin at `(padding, padding)`. All conversions remove the
/// padding before dividing and add it back when producing pixel positions,
/// so `cell_at(cell_origin(c)) == c` for any cell.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SnapGrid {
    column_width: f64,
    row_height: f64,
    padding: f64,
}

impl SnapGrid {
    /// Create a snap grid from cell pixel dimensions and container padding.
    ///
    /// Both dimensions must be strictly positive.
    pub fn new(column_width: f64, row_height: f64, padding: f64) -> Self {
        debug_assert!(
            column_width > 0.0 && row_height > 0.0,
            "snap grid cell dimensions must be strictly positive"
        );
        Self {
            column_width,
            row_height,
            padding,
        }
    }

    /// The pixel width of one column.
    #[inline]
    pub const fn column_width(&self) -> f64 {
        self.column_width
    }

    /// The pixel height of one row.
    #[inline]
    pub const fn row_height(&self) -> f64 {
        self.row_height
    }

    /// The container padding in pixels.
    #[inline]
    pub const fn padding(&self) -> f64 {
        self.padding
    }

    /// The grid cell containing the pixel point.
    ///
    /// Rounds toward negative infinity on both axes, so a point exactly on a
    /// cell boundary maps to the lower cell and the mapping is stable.
    #[inline]
    pub fn cell_at(&self, p: Point) -> GridCell {
        GridCell {
            column: floor_div(p.x - self.padding, self.column_width),
            row: floor_div(p.y - self.padding, self.row_height),
        }
    }

    /// The grid row containing the pixel y coordinate.
    #[inline]
    pub fn row_at(&self, y: f64) -> i32 {
        floor_div(y - self.padding, self.row_height)
    }

    /// The pixel origin of a grid cell, padding included.
    #[inline]
    pub fn cell_origin(&self, cell: GridCell) -> Point {
        Point::new(
            f64::from(cell.column) * self.column_width + self.padding,
            f64::from(cell.row) * self.row_height + self.padding,
        )
    }

    /// The pixel size of a column/row span.
    #[inline]
    pub fn span_size(&self, columns: i32, rows: i32) -> Size {
        Size::new(
            f64::from(columns) * self.column_width,
            f64::from(rows) * self.row_height,
        )
    }

    /// The pixel rectangle covered by a cell rectangle, padding included.
    pub fn pixel_rect(&self, rect: &CellRect) -> Rect {
        let origin = self.cell_origin(GridCell::new(rect.left, rect.top));
        Rect::from_origin_size(origin, self.span_size(rect.column_span(), rect.row_span()))
    }
}

/// Map a pixel distance to a cell index, rounding toward negative infinity.
#[allow(
    clippy::cast_possible_truncation,
    reason = "Cell indices are intentionally i32; float casts saturate out-of-range values."
)]
#[inline]
fn floor_div(value: f64, size: f64) -> i32 {
    debug_assert!(size > 0.0, "snap grid division by non-positive cell size");
    let t = value / size;
    let cell = t as i32;

    // Round towards -∞ (the cast above has already truncated).
    if t < 0.0 && f64::from(cell) > t {
        cell.saturating_sub(1)
    } else {
        cell
    }
}
