use grid_dijkstra::{DijkstraSearch, SearchEvent, SearchGrid, SearchResult};
use grid_util::point::Point;

// In this example a path is found on an 8x8 grid with a partial wall:
//  ________
// |S       |
// |  ##### |
// |      # |
// |      # |
// |      # |
// |        |
// |       E|
//  ________
// The search is driven step by step, the way a renderer would drain one
// event per animation frame, and the event tally plus the found path are
// printed at the end.

fn main() {
    let mut grid = SearchGrid::new(8, 8).unwrap();
    for x in 2..7 {
        grid.set_blocked(Point::new(x, 1), true).unwrap();
    }
    for y in 2..5 {
        grid.set_blocked(Point::new(6, y), true).unwrap();
    }
    println!("{}", grid);

    let start = Point::new(0, 0);
    let target = Point::new(7, 6);
    let mut search = DijkstraSearch::new(&grid, start, target).unwrap();
    let mut frames = 0;
    while let Some(event) = search.step() {
        // A real host would render here and sleep until the next frame.
        match event {
            SearchEvent::Visited { cell, role } => println!("visit {:?} ({:?})", cell, role),
            SearchEvent::FrontierUpdated { cell } => println!("  frontier {:?}", cell),
            SearchEvent::StepComplete => frames += 1,
            SearchEvent::PathStep { cell } => println!("path {:?}", cell),
            SearchEvent::SearchFinished(result) => println!("finished: {:?}", result),
        }
    }
    println!("{} animation frames", frames);

    if let Some(SearchResult::Found(path)) = search.outcome() {
        println!("Path ({} steps):", path.len() - 1);
        for p in path {
            println!("{:?}", p);
        }
    }
}
