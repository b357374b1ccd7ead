use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

use grid_util::point::Point;
use log::info;

use crate::error::SearchError;
use crate::event::{CellRole, SearchEvent, SearchResult};
use crate::grid::SearchGrid;
use crate::state::SearchState;

/// Heap entry pairing a tentative distance with the cell it was pushed for.
/// `seq` is a monotonically increasing insertion number.
#[derive(Clone, Debug)]
struct QueueEntry {
    distance: u32,
    seq: u64,
    cell: Point,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.distance == other.distance && self.seq == other.seq
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Orders by distance first so the BinaryHeap acts as a min-heap,
        // then by insertion sequence so equal distances pop in FIFO order.
        // This makes the event sequence deterministic for a fixed input.
        match other.distance.cmp(&self.distance) {
            Ordering::Equal => other.seq.cmp(&self.seq),
            s => s,
        }
    }
}

pub(crate) fn check_endpoints(
    grid: &SearchGrid,
    start: Point,
    target: Point,
) -> Result<(), SearchError> {
    for cell in [start, target] {
        if !grid.in_bounds(cell) {
            return Err(SearchError::InvalidCoordinate(cell));
        }
    }
    if grid.is_blocked(start) {
        return Err(SearchError::InvalidInput(format!(
            "start cell {} is blocked",
            start
        )));
    }
    if grid.is_blocked(target) {
        return Err(SearchError::InvalidInput(format!(
            "target cell {} is blocked",
            target
        )));
    }
    Ok(())
}

/// A single Dijkstra run over a [SearchGrid], specialized to uniform edge
/// weight 1. The run borrows the grid immutably for its whole lifetime, so
/// blocked flags cannot change mid-search.
///
/// The engine is driven through [step](Self::step), which yields one
/// [SearchEvent] per call until the run terminates, or through
/// [run](Self::run)/[run_with](Self::run_with) which drive it to completion.
/// Abandoning a run is just dropping the value.
#[derive(Debug)]
pub struct DijkstraSearch<'a> {
    grid: &'a SearchGrid,
    state: SearchState,
    queue: BinaryHeap<QueueEntry>,
    pending: VecDeque<SearchEvent>,
    start: Point,
    target: Point,
    seq: u64,
    outcome: Option<SearchResult>,
}

impl<'a> DijkstraSearch<'a> {
    /// Sets up a run from `start` to `target`. Endpoints must be in bounds
    /// and free; `start == target` is accepted and resolves to a single-cell
    /// path without entering the search loop.
    pub fn new(
        grid: &'a SearchGrid,
        start: Point,
        target: Point,
    ) -> Result<DijkstraSearch<'a>, SearchError> {
        check_endpoints(grid, start, target)?;
        let mut search = DijkstraSearch {
            grid,
            state: SearchState::new(grid),
            queue: BinaryHeap::new(),
            pending: VecDeque::new(),
            start,
            target,
            seq: 0,
            outcome: None,
        };
        search.state.set_distance(start, 0);
        if start == target {
            let result = SearchResult::Found(vec![start]);
            search.pending.push_back(SearchEvent::PathStep { cell: start });
            search
                .pending
                .push_back(SearchEvent::SearchFinished(result.clone()));
            search.outcome = Some(result);
        } else {
            search.queue.push(QueueEntry {
                distance: 0,
                seq: 0,
                cell: start,
            });
        }
        Ok(search)
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn target(&self) -> Point {
        self.target
    }

    /// Terminal result, available once the run has reached it. Events queued
    /// by the terminal step may still be pending in [step](Self::step).
    pub fn outcome(&self) -> Option<&SearchResult> {
        self.outcome.as_ref()
    }

    /// The per-run overlay, exposed so hosts and tests can inspect finalized
    /// distances.
    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// Advances the run and yields the next event, or [None] once the run
    /// has terminated and all events have been drained. Events buffered by an
    /// earlier queue pop are drained one per call before the next pop.
    pub fn step(&mut self) -> Option<SearchEvent> {
        if let Some(event) = self.pending.pop_front() {
            return Some(event);
        }
        if self.outcome.is_some() {
            return None;
        }
        while let Some(QueueEntry { distance, cell, .. }) = self.queue.pop() {
            // The heap has no decrease-key, so a cell relaxed more than once
            // leaves stale duplicates behind. Skip them.
            if self.state.is_visited(cell) {
                continue;
            }
            self.state.mark_visited(cell);
            self.pending.push_back(SearchEvent::Visited {
                cell,
                role: self.role_of(cell),
            });
            if cell == self.target {
                return self.finish_found();
            }
            self.relax_neighbours(cell, distance);
            self.pending.push_back(SearchEvent::StepComplete);
            return self.pending.pop_front();
        }
        info!("Queue exhausted without reaching {}", self.target);
        self.outcome = Some(SearchResult::NotFound);
        Some(SearchEvent::SearchFinished(SearchResult::NotFound))
    }

    /// Drives the run to completion, discarding events.
    pub fn run(self) -> SearchResult {
        self.run_with(|_| {})
    }

    /// Drives the run to completion, forwarding every event to `sink`. The
    /// engine never waits for the sink; pacing is the host's concern.
    pub fn run_with(mut self, mut sink: impl FnMut(SearchEvent)) -> SearchResult {
        while let Some(event) = self.step() {
            sink(event);
        }
        self.outcome.unwrap_or(SearchResult::NotFound)
    }

    fn role_of(&self, cell: Point) -> CellRole {
        if cell == self.start {
            CellRole::Start
        } else if cell == self.target {
            CellRole::Target
        } else {
            CellRole::Intermediate
        }
    }

    fn relax_neighbours(&mut self, cell: Point, distance: u32) {
        for n in self.grid.neighbours(cell) {
            if self.grid.is_blocked(n) {
                continue;
            }
            let candidate = distance + 1;
            if candidate < self.state.distance(n) {
                self.state.set_distance(n, candidate);
                self.state.set_predecessor(n, cell);
                self.seq += 1;
                self.queue.push(QueueEntry {
                    distance: candidate,
                    seq: self.seq,
                    cell: n,
                });
                // The target keeps its own display role, so it never shows
                // up as a frontier cell.
                if n != self.target {
                    self.pending.push_back(SearchEvent::FrontierUpdated { cell: n });
                }
            }
        }
    }

    /// Reconstructs the path by walking predecessor links back from the
    /// target, queues one [SearchEvent::PathStep] per cell in that walking
    /// order and finishes the run.
    fn finish_found(&mut self) -> Option<SearchEvent> {
        let mut path: Vec<Point> = itertools::unfold(Some(self.target), |cursor| {
            cursor.map(|cell| {
                *cursor = self.state.predecessor(cell);
                cell
            })
        })
        .collect();
        for cell in &path {
            self.pending.push_back(SearchEvent::PathStep { cell: *cell });
        }
        path.reverse();
        info!(
            "Found a path of {} steps from {} to {}",
            path.len() - 1,
            self.start,
            self.target
        );
        let result = SearchResult::Found(path);
        self.pending
            .push_back(SearchEvent::SearchFinished(result.clone()));
        self.outcome = Some(result);
        self.pending.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_equals_target_skips_the_loop() {
        let grid = SearchGrid::new(4, 4).unwrap();
        let p = Point::new(2, 2);
        let mut search = DijkstraSearch::new(&grid, p, p).unwrap();
        assert_eq!(search.step(), Some(SearchEvent::PathStep { cell: p }));
        assert_eq!(
            search.step(),
            Some(SearchEvent::SearchFinished(SearchResult::Found(vec![p])))
        );
        assert_eq!(search.step(), None);
    }

    #[test]
    fn equal_distances_pop_in_insertion_order() {
        let mut heap = BinaryHeap::new();
        for (seq, cell) in [(1, Point::new(0, 1)), (2, Point::new(1, 0))] {
            heap.push(QueueEntry {
                distance: 1,
                seq,
                cell,
            });
        }
        heap.push(QueueEntry {
            distance: 0,
            seq: 3,
            cell: Point::new(0, 0),
        });
        let order: Vec<Point> = std::iter::from_fn(|| heap.pop().map(|e| e.cell)).collect();
        assert_eq!(
            order,
            vec![Point::new(0, 0), Point::new(0, 1), Point::new(1, 0)]
        );
    }

    #[test]
    fn blocked_endpoints_are_rejected() {
        let mut grid = SearchGrid::new(3, 3).unwrap();
        grid.set_blocked(Point::new(0, 0), true).unwrap();
        let err = DijkstraSearch::new(&grid, Point::new(0, 0), Point::new(2, 2)).unwrap_err();
        assert!(matches!(err, SearchError::InvalidInput(_)));
        let err = DijkstraSearch::new(&grid, Point::new(2, 2), Point::new(0, 0)).unwrap_err();
        assert!(matches!(err, SearchError::InvalidInput(_)));
    }

    #[test]
    fn out_of_bounds_endpoint_is_rejected() {
        let grid = SearchGrid::new(3, 3).unwrap();
        let outside = Point::new(3, 1);
        assert_eq!(
            DijkstraSearch::new(&grid, outside, Point::new(0, 0)).unwrap_err(),
            SearchError::InvalidCoordinate(outside)
        );
    }
}
