use grid_util::grid::{BoolGrid, Grid, SimpleGrid};
use grid_util::point::Point;

use crate::grid::SearchGrid;

/// Tentative distance of a cell no relaxation has reached yet.
pub const UNREACHABLE: u32 = u32::MAX;

/// Per-run scratch overlay for a search: one tentative distance, visited flag
/// and predecessor link per cell. A fresh instance is allocated for every run
/// and never shared between runs.
#[derive(Clone, Debug)]
pub struct SearchState {
    distance: SimpleGrid<u32>,
    visited: BoolGrid,
    predecessor: Vec<Option<Point>>,
}

impl SearchState {
    /// Allocates the overlay for `grid` with every cell at [UNREACHABLE],
    /// unvisited and without a predecessor.
    pub fn new(grid: &SearchGrid) -> SearchState {
        let (w, h) = (grid.width(), grid.height());
        SearchState {
            distance: SimpleGrid::new(w, h, UNREACHABLE),
            visited: BoolGrid::new(w, h, false),
            predecessor: vec![None; w * h],
        }
    }

    pub fn distance(&self, cell: Point) -> u32 {
        self.distance.get_point(cell)
    }

    pub fn set_distance(&mut self, cell: Point, value: u32) {
        self.distance.set_point(cell, value);
    }

    pub fn is_visited(&self, cell: Point) -> bool {
        self.visited.get_point(cell)
    }

    pub fn mark_visited(&mut self, cell: Point) {
        self.visited.set_point(cell, true);
    }

    pub fn predecessor(&self, cell: Point) -> Option<Point> {
        self.predecessor[self.visited.get_ix_point(&cell)]
    }

    pub fn set_predecessor(&mut self, cell: Point, from: Point) {
        let ix = self.visited.get_ix_point(&cell);
        self.predecessor[ix] = Some(from);
    }
}
