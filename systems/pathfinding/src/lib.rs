#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shortest-path search over a board snapshot.
//!
//! The search is a breadth-first walk that keeps whole partial paths on its
//! frontier, so the first path to reach the goal is also a shortest path by
//! step count. Visited cells are stamped as walls in a private copy of the
//! board; the caller's board is never mutated.

use std::collections::VecDeque;

use maze_chase_core::{Direction, Grid, GridPos, Tile};

/// Computes a shortest route between two cells, or `None` when the goal is
/// unreachable.
///
/// The returned path starts at `start` and ends at `goal`, with consecutive
/// entries one orthogonal step apart. Neighbors are expanded in a fixed
/// order (down, right, up, left), which fixes the tie-break among
/// equal-length paths. Cells outside the interior band and wall cells are
/// impassable; the goal itself is tested before the passability check.
#[must_use]
pub fn find_path(grid: &Grid, start: GridPos, goal: GridPos) -> Option<Vec<GridPos>> {
    let mut scratch = grid.clone();
    let mut frontier: VecDeque<Vec<GridPos>> = VecDeque::new();
    frontier.push_back(vec![start]);

    while let Some(path) = frontier.pop_front() {
        let Some(&pos) = path.last() else {
            continue;
        };

        for neighbor in expansion_neighbors(pos) {
            if neighbor == goal {
                let mut found = path.clone();
                found.push(goal);
                return Some(found);
            }

            if !scratch.interior_contains(neighbor) || scratch.tile_at(neighbor) == Tile::Wall {
                continue;
            }

            // Visited marker, confined to the private copy.
            scratch.set_tile(neighbor, Tile::Wall);

            let mut extended = path.clone();
            extended.push(neighbor);
            frontier.push_back(extended);
        }
    }

    None
}

/// Converts a path into the direction tokens that replay it.
///
/// One token is produced per consecutive pair; pairs that are not one
/// orthogonal step apart produce no token.
#[must_use]
pub fn path_to_directions(path: &[GridPos]) -> Vec<Direction> {
    let mut directions = Vec::with_capacity(path.len().saturating_sub(1));
    for pair in path.windows(2) {
        if let Some(direction) = direction_between(pair[0], pair[1]) {
            directions.push(direction);
        }
    }
    directions
}

fn direction_between(from: GridPos, to: GridPos) -> Option<Direction> {
    let row_diff = from.row().abs_diff(to.row());
    let col_diff = from.col().abs_diff(to.col());
    if row_diff + col_diff != 1 {
        return None;
    }

    if row_diff == 1 {
        if to.row() > from.row() {
            Some(Direction::Down)
        } else {
            Some(Direction::Up)
        }
    } else if to.col() > from.col() {
        Some(Direction::Right)
    } else {
        Some(Direction::Left)
    }
}

/// Fixed expansion order: down, right, up, left.
fn expansion_neighbors(pos: GridPos) -> impl Iterator<Item = GridPos> {
    let mut candidates = [None; 4];
    candidates[0] = Some(GridPos::new(pos.row() + 1, pos.col()));
    candidates[1] = Some(GridPos::new(pos.row(), pos.col() + 1));
    candidates[2] = pos
        .row()
        .checked_sub(1)
        .map(|row| GridPos::new(row, pos.col()));
    candidates[3] = pos
        .col()
        .checked_sub(1)
        .map(|col| GridPos::new(pos.row(), col));
    candidates.into_iter().flatten()
}

#[cfg(test)]
mod tests {
    use super::{direction_between, find_path, path_to_directions};
    use maze_chase_core::{Direction, Grid, GridPos, GridSize, Tile};

    fn bordered_grid(size: u32) -> Grid {
        let mut grid = Grid::new_filled(GridSize::new(size), Tile::Wall);
        for row in 1..size - 1 {
            for col in 1..size - 1 {
                grid.set_tile(GridPos::new(row, col), Tile::Open);
            }
        }
        grid
    }

    /// Reference flood-fill distances over the same passability rules.
    fn flood_distances(grid: &Grid, start: GridPos) -> Vec<Option<u32>> {
        let size = grid.size() as usize;
        let mut distances: Vec<Option<u32>> = vec![None; size * size];
        let index = |pos: GridPos| pos.row() as usize * size + pos.col() as usize;
        distances[index(start)] = Some(0);

        let mut frontier = std::collections::VecDeque::new();
        frontier.push_back(start);
        while let Some(pos) = frontier.pop_front() {
            let here = distances[index(pos)].expect("frontier cells carry distances");
            let neighbors = [
                GridPos::new(pos.row() + 1, pos.col()),
                GridPos::new(pos.row(), pos.col() + 1),
                GridPos::new(pos.row().wrapping_sub(1), pos.col()),
                GridPos::new(pos.row(), pos.col().wrapping_sub(1)),
            ];
            for neighbor in neighbors {
                if !grid.interior_contains(neighbor)
                    || grid.tile_at(neighbor) == Tile::Wall
                    || distances[index(neighbor)].is_some()
                {
                    continue;
                }
                distances[index(neighbor)] = Some(here + 1);
                frontier.push_back(neighbor);
            }
        }
        distances
    }

    #[test]
    fn routes_around_a_blocking_wall() {
        let mut grid = bordered_grid(5);
        grid.set_tile(GridPos::new(2, 2), Tile::Wall);
        grid.set_tile(GridPos::new(3, 3), Tile::Token);

        let path = find_path(&grid, GridPos::new(1, 1), GridPos::new(3, 3))
            .expect("token should be reachable");

        assert_eq!(path.len(), 5, "expected a four step route");
        assert_eq!(path.first(), Some(&GridPos::new(1, 1)));
        assert_eq!(path.last(), Some(&GridPos::new(3, 3)));
        assert!(!path.contains(&GridPos::new(2, 2)));

        let directions = path_to_directions(&path);
        assert_eq!(
            directions,
            vec![
                Direction::Down,
                Direction::Down,
                Direction::Right,
                Direction::Right
            ]
        );
    }

    #[test]
    fn walled_off_goal_yields_absence() {
        let mut grid = bordered_grid(7);
        for row in 1..6 {
            grid.set_tile(GridPos::new(row, 3), Tile::Wall);
        }

        assert!(find_path(&grid, GridPos::new(2, 1), GridPos::new(2, 5)).is_none());
    }

    #[test]
    fn path_length_matches_reference_distances() {
        let mut grid = bordered_grid(9);
        grid.set_tile(GridPos::new(2, 2), Tile::Wall);
        grid.set_tile(GridPos::new(3, 2), Tile::Wall);
        grid.set_tile(GridPos::new(4, 2), Tile::Wall);
        grid.set_tile(GridPos::new(4, 3), Tile::Wall);
        grid.set_tile(GridPos::new(4, 4), Tile::Wall);
        grid.set_tile(GridPos::new(6, 6), Tile::Wall);

        let start = GridPos::new(1, 1);
        let distances = flood_distances(&grid, start);

        for row in 1..8 {
            for col in 1..8 {
                let goal = GridPos::new(row, col);
                if goal == start || grid.tile_at(goal) == Tile::Wall {
                    continue;
                }
                let reference = distances[row as usize * 9 + col as usize];
                match find_path(&grid, start, goal) {
                    Some(path) => {
                        let steps = (path.len() - 1) as u32;
                        assert_eq!(
                            Some(steps),
                            reference,
                            "path to ({row}, {col}) is not minimal"
                        );
                    }
                    None => {
                        assert!(
                            reference.is_none(),
                            "missed reachable goal ({row}, {col})"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn directions_replay_to_the_original_path() {
        let mut grid = bordered_grid(9);
        grid.set_tile(GridPos::new(3, 3), Tile::Wall);
        grid.set_tile(GridPos::new(3, 4), Tile::Wall);
        grid.set_tile(GridPos::new(5, 2), Tile::Wall);

        let start = GridPos::new(1, 1);
        for goal in [GridPos::new(7, 7), GridPos::new(2, 6), GridPos::new(6, 1)] {
            let path = find_path(&grid, start, goal).expect("goal should be reachable");
            let directions = path_to_directions(&path);
            assert_eq!(directions.len(), path.len() - 1);

            let mut replayed = vec![start];
            let mut cursor = start;
            for direction in &directions {
                cursor = cursor.step(*direction).expect("replay stays on the board");
                replayed.push(cursor);
            }
            assert_eq!(replayed, path);
        }
    }

    #[test]
    fn adjacent_goal_yields_single_step() {
        let grid = bordered_grid(5);
        let path = find_path(&grid, GridPos::new(1, 1), GridPos::new(1, 2))
            .expect("adjacent goal should be reachable");
        assert_eq!(path, vec![GridPos::new(1, 1), GridPos::new(1, 2)]);
        assert_eq!(path_to_directions(&path), vec![Direction::Right]);
    }

    #[test]
    fn direction_between_neighbors() {
        let origin = GridPos::new(3, 3);
        assert_eq!(
            direction_between(origin, GridPos::new(2, 3)),
            Some(Direction::Up)
        );
        assert_eq!(
            direction_between(origin, GridPos::new(3, 2)),
            Some(Direction::Left)
        );
        assert_eq!(
            direction_between(origin, GridPos::new(4, 3)),
            Some(Direction::Down)
        );
        assert_eq!(
            direction_between(origin, GridPos::new(3, 4)),
            Some(Direction::Right)
        );
        assert_eq!(direction_between(origin, origin), None);
        assert_eq!(direction_between(origin, GridPos::new(4, 4)), None);
    }
}
