use std::collections::{HashMap, HashSet, VecDeque};

use super::game_state::SnakeGameState;
use super::types::{Direction, FieldSize, Point};

/// Picks the next direction for automated play.
pub struct PathPlanner;

impl PathPlanner {
    /// Chooses a safe direction that shortens the path to food.
    ///
    /// Candidates are tried in `Direction::ALL` order. A candidate is unsafe
    /// when it leaves the board or lands on any segment other than the current
    /// head. Among safe candidates the one with the strictly shortest BFS path
    /// to food wins; without a reachable food cell the first safe candidate is
    /// used, and with no safe candidate the current direction is kept.
    pub fn choose_direction(state: &SnakeGameState) -> Direction {
        let snake = state.snake();
        let current = state.direction();
        let blocked = snake.body_without_head();

        let candidates = Self::safe_candidates(state, &blocked);

        let Some(&(first_direction, _)) = candidates.first() else {
            return current;
        };

        let Some(food) = state.food() else {
            return first_direction;
        };

        // The tail is still treated as blocked even though it may move away.
        let mut best: Option<(Direction, usize)> = None;
        for &(direction, cell) in &candidates {
            let Some(path) = bfs(&state.field_size, cell, food, &blocked) else {
                continue;
            };
            let is_better = match best {
                Some((_, best_len)) => path.len() < best_len,
                None => true,
            };
            if is_better {
                best = Some((direction, path.len()));
            }
        }

        best.map(|(direction, _)| direction).unwrap_or(first_direction)
    }

    fn safe_candidates(state: &SnakeGameState, blocked: &HashSet<Point>) -> Vec<(Direction, Point)> {
        let snake = state.snake();
        let head = snake.head();
        let current = state.direction();

        Direction::ALL
            .into_iter()
            .filter(|d| !(snake.len() > 1 && d.is_opposite(&current)))
            .map(|d| (d, head.offset(d)))
            .filter(|(_, cell)| state.is_inside(cell.x, cell.y) && !blocked.contains(cell))
            .collect()
    }
}

/// Shortest 4-connected path from `start` to `goal` avoiding `blocked`,
/// returned start-to-goal inclusive.
pub fn bfs(field: &FieldSize, start: Point, goal: Point, blocked: &HashSet<Point>) -> Option<Vec<Point>> {
    let mut queue = VecDeque::from([start]);
    let mut visited = HashSet::from([start]);
    let mut came_from: HashMap<Point, Point> = HashMap::new();

    while let Some(current) = queue.pop_front() {
        if current == goal {
            return Some(reconstruct_path(&came_from, start, goal));
        }

        for next in field.neighbors(current) {
            if blocked.contains(&next) || !visited.insert(next) {
                continue;
            }
            came_from.insert(next, current);
            queue.push_back(next);
        }
    }

    None
}

fn reconstruct_path(came_from: &HashMap<Point, Point>, start: Point, goal: Point) -> Vec<Point> {
    let mut path = vec![goal];
    let mut current = goal;
    while current != start {
        match came_from.get(&current) {
            Some(&previous) => {
                path.push(previous);
                current = previous;
            }
            None => break,
        }
    }
    path.reverse();
    path
}
