use core::fmt;

use grid_util::grid::{BoolGrid, Grid};
use grid_util::point::Point;
use log::info;
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;

use crate::error::SearchError;
use crate::event::SearchResult;
use crate::search::DijkstraSearch;

/// [SearchGrid] owns the static topology searched by [DijkstraSearch]: a
/// [BoolGrid] of blocked flags ([true] is blocked) plus a [UnionFind]
/// structure tracking 4-connected components, used to answer reachability
/// queries without flood-filling. Cell identity is a [Point] with `x` as the
/// column and `y` as the row; cells are only created at construction and only
/// their blocked flag ever changes.
#[derive(Clone, Debug)]
pub struct SearchGrid {
    cells: BoolGrid,
    components: UnionFind<usize>,
    components_dirty: bool,
}

impl SearchGrid {
    /// Creates a grid with all cells free. Zero-sized grids are rejected.
    pub fn new(width: usize, height: usize) -> Result<SearchGrid, SearchError> {
        if width == 0 || height == 0 {
            return Err(SearchError::InvalidInput(format!(
                "grid dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        let mut grid = SearchGrid {
            cells: BoolGrid::new(width, height, false),
            components: UnionFind::new(width * height),
            components_dirty: false,
        };
        grid.generate_components();
        Ok(grid)
    }

    pub fn width(&self) -> usize {
        self.cells.width()
    }

    pub fn height(&self) -> usize {
        self.cells.height()
    }

    pub fn in_bounds(&self, cell: Point) -> bool {
        cell.x >= 0 && cell.y >= 0 && self.cells.index_in_bounds(cell.x as usize, cell.y as usize)
    }

    /// Out-of-bounds references count as blocked.
    pub fn is_blocked(&self, cell: Point) -> bool {
        !self.in_bounds(cell) || self.cells.get(cell.x as usize, cell.y as usize)
    }

    /// Flat index of an in-bounds cell.
    pub(crate) fn ix(&self, cell: Point) -> usize {
        self.cells.get_ix(cell.x as usize, cell.y as usize)
    }

    /// Updates a cell's blocked flag. Joins newly connected components and
    /// flags the components as dirty if components are (potentially) broken
    /// apart into multiple.
    pub fn set_blocked(&mut self, cell: Point, blocked: bool) -> Result<(), SearchError> {
        if !self.in_bounds(cell) {
            return Err(SearchError::InvalidCoordinate(cell));
        }
        let (x, y) = (cell.x as usize, cell.y as usize);
        if self.cells.get(x, y) == blocked {
            return Ok(());
        }
        if blocked {
            self.components_dirty = true;
        } else {
            // Unblocking can only join components, so the union-find is
            // patched in place instead of regenerated.
            let cell_ix = self.cells.get_ix(x, y);
            for n in self.free_neighbours(cell) {
                self.components.union(cell_ix, self.ix(n));
            }
        }
        self.cells.set(x, y, blocked);
        Ok(())
    }

    /// The in-bounds 4-neighbourhood of a cell in down, up, right, left
    /// order. The order is fixed so event sequences are reproducible; blocked
    /// neighbours are included.
    pub fn neighbours(&self, cell: Point) -> SmallVec<[Point; 4]> {
        [
            Point::new(cell.x, cell.y + 1),
            Point::new(cell.x, cell.y - 1),
            Point::new(cell.x + 1, cell.y),
            Point::new(cell.x - 1, cell.y),
        ]
        .into_iter()
        .filter(|p| self.in_bounds(*p))
        .collect::<SmallVec<[Point; 4]>>()
    }

    fn free_neighbours(&self, cell: Point) -> SmallVec<[Point; 4]> {
        self.neighbours(cell)
            .into_iter()
            .filter(|p| !self.is_blocked(*p))
            .collect::<SmallVec<[Point; 4]>>()
    }

    /// Retrieves the component id a given [Point] belongs to.
    pub fn get_component(&self, cell: &Point) -> usize {
        self.components.find(self.ix(*cell))
    }

    /// Checks if start and target are on the same component.
    pub fn reachable(&self, start: &Point, target: &Point) -> bool {
        !self.unreachable(start, target)
    }

    /// Checks if start and target are not on the same component.
    pub fn unreachable(&self, start: &Point, target: &Point) -> bool {
        if self.in_bounds(*start) && self.in_bounds(*target) {
            let start_ix = self.ix(*start);
            let target_ix = self.ix(*target);
            !self.components.equiv(start_ix, target_ix)
        } else {
            true
        }
    }

    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            info!("Components are dirty: regenerating components");
            self.generate_components();
        }
    }

    /// Generates a new [UnionFind] structure and links up free 4-grid
    /// neighbours to the same components.
    pub fn generate_components(&mut self) {
        let w = self.cells.width;
        let h = self.cells.height;
        self.components = UnionFind::new(w * h);
        self.components_dirty = false;
        for x in 0..w {
            for y in 0..h {
                if !self.cells.get(x, y) {
                    let cell = Point::new(x as i32, y as i32);
                    let cell_ix = self.cells.get_ix(x, y);
                    for n in [
                        Point::new(cell.x, cell.y + 1),
                        Point::new(cell.x + 1, cell.y),
                    ] {
                        if self.in_bounds(n) && !self.is_blocked(n) {
                            self.components.union(cell_ix, self.ix(n));
                        }
                    }
                }
            }
        }
    }

    /// Computes the shortest path from start to target, refreshing components
    /// first and returning [SearchResult::NotFound] without searching when
    /// the endpoints are on different components. The step-wise API in
    /// [DijkstraSearch] never takes this shortcut since its event stream is
    /// the product.
    pub fn shortest_path(
        &mut self,
        start: Point,
        target: Point,
    ) -> Result<SearchResult, SearchError> {
        self.update();
        crate::search::check_endpoints(self, start, target)?;
        if self.unreachable(&start, &target) {
            info!("{} is not reachable from {}", target, start);
            return Ok(SearchResult::NotFound);
        }
        Ok(DijkstraSearch::new(self, start, target)?.run())
    }
}

impl fmt::Display for SearchGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Grid:")?;
        for y in 0..self.cells.height {
            let values = (0..self.cells.width)
                .map(|x| self.cells.get(x, y) as i32)
                .collect::<Vec<i32>>();
            writeln!(f, "{:?}", values)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests whether cells are correctly mapped to different connected
    /// components by a full-height wall.
    #[test]
    fn test_component_generation() {
        // Corresponds to the following 3x2 grid:
        //  ___
        // | # |
        // | # |
        //  ___
        let mut grid = SearchGrid::new(3, 2).unwrap();
        grid.set_blocked(Point::new(1, 0), true).unwrap();
        grid.set_blocked(Point::new(1, 1), true).unwrap();
        grid.generate_components();
        let p1 = Point::new(0, 0);
        let p2 = Point::new(0, 1);
        let p3 = Point::new(2, 0);
        assert_eq!(grid.get_component(&p1), grid.get_component(&p2));
        assert!(grid.unreachable(&p1, &p3));
        assert!(grid.reachable(&p1, &p2));
    }

    #[test]
    fn unblocking_rejoins_components() {
        let mut grid = SearchGrid::new(3, 1).unwrap();
        grid.set_blocked(Point::new(1, 0), true).unwrap();
        grid.update();
        assert!(grid.unreachable(&Point::new(0, 0), &Point::new(2, 0)));
        grid.set_blocked(Point::new(1, 0), false).unwrap();
        grid.update();
        assert!(grid.reachable(&Point::new(0, 0), &Point::new(2, 0)));
    }

    #[test]
    fn redundant_blocking_keeps_components_separate() {
        let mut grid = SearchGrid::new(3, 1).unwrap();
        grid.set_blocked(Point::new(1, 0), true).unwrap();
        grid.update();
        assert!(grid.unreachable(&Point::new(0, 0), &Point::new(2, 0)));
        // Re-blocking the wall cell is a no-op and must not union the wall
        // with its free neighbours.
        grid.set_blocked(Point::new(1, 0), true).unwrap();
        grid.update();
        assert!(grid.unreachable(&Point::new(0, 0), &Point::new(2, 0)));
        // Same for redundantly clearing an already-free cell.
        grid.set_blocked(Point::new(0, 0), false).unwrap();
        grid.update();
        assert!(grid.unreachable(&Point::new(0, 0), &Point::new(2, 0)));
    }

    #[test]
    fn neighbour_order_is_down_up_right_left() {
        let grid = SearchGrid::new(3, 3).unwrap();
        let ns = grid.neighbours(Point::new(1, 1));
        assert_eq!(
            ns.as_slice(),
            &[
                Point::new(1, 2),
                Point::new(1, 0),
                Point::new(2, 1),
                Point::new(0, 1),
            ]
        );
        // Corner cells keep the same relative order with the out-of-bounds
        // entries dropped.
        let corner = grid.neighbours(Point::new(0, 0));
        assert_eq!(corner.as_slice(), &[Point::new(0, 1), Point::new(1, 0)]);
    }

    #[test]
    fn zero_dimension_is_rejected() {
        assert!(matches!(
            SearchGrid::new(0, 4),
            Err(SearchError::InvalidInput(_))
        ));
        assert!(matches!(
            SearchGrid::new(4, 0),
            Err(SearchError::InvalidInput(_))
        ));
    }

    #[test]
    fn out_of_bounds_set_blocked_fails() {
        let mut grid = SearchGrid::new(2, 2).unwrap();
        let outside = Point::new(2, 0);
        assert_eq!(
            grid.set_blocked(outside, true),
            Err(SearchError::InvalidCoordinate(outside))
        );
    }
}
