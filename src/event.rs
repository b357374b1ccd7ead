use grid_util::point::Point;

/// Display role of a visited cell. The engine never stores presentation
/// state; it only tags events so a renderer can colour endpoints differently.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellRole {
    Start,
    Target,
    Intermediate,
}

/// Terminal result of a search run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchResult {
    /// Shortest path in start to target order, both endpoints included.
    Found(Vec<Point>),
    NotFound,
}

impl SearchResult {
    pub fn is_found(&self) -> bool {
        matches!(self, SearchResult::Found(_))
    }

    /// Number of steps along the path, i.e. path length minus one. Paths
    /// produced by a search always hold at least the start cell; an empty
    /// hand-built path counts as zero steps.
    pub fn step_count(&self) -> Option<usize> {
        match self {
            SearchResult::Found(path) => Some(path.len().saturating_sub(1)),
            SearchResult::NotFound => None,
        }
    }
}

/// State-change events emitted during a search, in emission order. The
/// sequence is finite and non-restartable; the engine never blocks waiting
/// for a consumer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchEvent {
    /// A cell was popped from the queue and its distance finalized.
    Visited { cell: Point, role: CellRole },
    /// A cell got a smaller tentative distance and entered the frontier.
    /// Never emitted for the target, which keeps its own display role.
    FrontierUpdated { cell: Point },
    /// All neighbours of the current cell have been relaxed. Hosts use this
    /// to pace visualization between queue pops.
    StepComplete,
    /// One cell of the reconstructed path, emitted in target to start order.
    PathStep { cell: Point },
    /// The run reached a terminal state; no further events follow.
    SearchFinished(SearchResult),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_count_is_total() {
        let p = Point::new(0, 0);
        assert_eq!(SearchResult::Found(vec![p]).step_count(), Some(0));
        assert_eq!(
            SearchResult::Found(vec![p, Point::new(0, 1)]).step_count(),
            Some(1)
        );
        assert_eq!(SearchResult::Found(vec![]).step_count(), Some(0));
        assert_eq!(SearchResult::NotFound.step_count(), None);
    }
}
