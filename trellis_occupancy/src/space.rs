// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The grid-cell rectangle a widget reserves within its parent.

use trellis_grid::CellRect;

/// A widget's reserved rectangle inside its parent, in grid cell units.
///
/// For widgets not currently being dragged, spaces under one parent never
/// overlap each other; that invariant is owned by the external widget store.
/// A space overlapping a *dragged* widget is expected and is what the
/// collision validator detects.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OccupiedSpace<W> {
    /// The widget this space belongs to.
    pub id: W,
    /// Minimum row (inclusive).
    pub top: i32,
    /// Minimum column (inclusive).
    pub left: i32,
    /// Maximum row (exclusive).
    pub bottom: i32,
    /// Maximum column (exclusive).
    pub right: i32,
}

impl<W> OccupiedSpace<W> {
    /// Create a space from a widget id and its cell rectangle.
    #[inline]
    pub const fn new(id: W, rect: CellRect) -> Self {
        Self {
            id,
            top: rect.top,
            left: rect.left,
            bottom: rect.bottom,
            right: rect.right,
        }
    }

    /// The space as a cell rectangle.
    #[inline]
    pub const fn rect(&self) -> CellRect {
        CellRect::new(self.left, self.top, self.right, self.bottom)
    }

    /// The number of columns this space spans.
    #[inline]
    pub const fn column_span(&self) -> i32 {
        self.right - self.left
    }

    /// The number of rows this space spans.
    #[inline]
    pub const fn row_span(&self) -> i32 {
        self.bottom - self.top
    }

    /// Whether the space has positive area on both axes.
    ///
    /// Malformed spaces are excluded from the index rather than failing the
    /// gesture that reads them.
    #[inline]
    pub const fn is_valid(&self) -> bool {
        !self.rect().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::OccupiedSpace;
    use trellis_grid::CellRect;

    #[test]
    fn rect_round_trip() {
        let space = OccupiedSpace::new(7_u32, CellRect::new(2, 1, 6, 4));
        assert_eq!(space.rect(), CellRect::new(2, 1, 6, 4));
        assert_eq!(space.column_span(), 4);
        assert_eq!(space.row_span(), 3);
        assert!(space.is_valid());
    }

    #[test]
    fn degenerate_spans_are_invalid() {
        assert!(!OccupiedSpace::new(1_u32, CellRect::new(2, 2, 2, 4)).is_valid());
        assert!(!OccupiedSpace::new(1_u32, CellRect::new(2, 2, 4, 2)).is_valid());
        assert!(!OccupiedSpace::new(1_u32, CellRect::new(5, 2, 4, 4)).is_valid());
    }
}
