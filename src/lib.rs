//! # grid_dijkstra
//!
//! A grid-based shortest-path engine. Implements
//! [Dijkstra's algorithm](https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm)
//! on a uniform-cost 4-connected grid, driven step by step so a host can
//! interleave rendering between queue pops. Note that with unit edge weights
//! the search visits cells in breadth-first order; the priority queue keeps
//! the finalization invariants explicit. A
//! [union-find](https://en.wikipedia.org/wiki/Component_(graph_theory))
//! over connected components answers "is there any path at all" cheaply, so
//! hosts can skip a doomed search instead of flood-filling the whole grid.
//!
//! The engine emits a lazy sequence of [SearchEvent] values describing cell
//! visits, frontier updates and path reconstruction; a renderer consumes
//! these at its own pace. The engine itself has no notion of real time.

pub mod error;
pub mod event;
pub mod grid;
pub mod search;
pub mod state;

pub use error::SearchError;
pub use event::{CellRole, SearchEvent, SearchResult};
pub use grid::SearchGrid;
pub use search::DijkstraSearch;
pub use state::{SearchState, UNREACHABLE};
