use grid_util::point::Point;
use thiserror::Error;

/// Errors reported synchronously at call time. These indicate caller mistakes
/// rather than transient faults: a search that starts with valid input always
/// terminates in [Found](crate::SearchResult::Found) or
/// [NotFound](crate::SearchResult::NotFound).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    /// A cell reference lies outside the grid bounds.
    #[error("coordinate {0} is outside the grid bounds")]
    InvalidCoordinate(Point),
    /// The inputs themselves are unusable, e.g. a blocked endpoint or a grid
    /// with a zero dimension.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
