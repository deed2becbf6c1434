use std::collections::{HashSet, VecDeque};

use super::types::Point;

/// Snake body stored tail-first: `body.front()` is the tail, `body.back()` the head.
#[derive(Clone, Debug)]
pub struct Snake {
    body: VecDeque<Point>,
    body_set: HashSet<Point>,
}

impl Snake {
    /// Builds a snake from tail-first segments. Duplicate segments are dropped.
    pub fn from_segments(segments: impl IntoIterator<Item = Point>) -> Self {
        let mut body = VecDeque::new();
        let mut body_set = HashSet::new();
        for segment in segments {
            if body_set.insert(segment) {
                body.push_back(segment);
            }
        }
        Self { body, body_set }
    }

    /// Three horizontal segments ending at `head`, heading right.
    pub fn horizontal(head: Point) -> Self {
        Self::from_segments([
            Point::new(head.x - 2, head.y),
            Point::new(head.x - 1, head.y),
            head,
        ])
    }

    pub fn head(&self) -> Point {
        *self.body.back().expect("Snake body should never be empty")
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn contains(&self, point: &Point) -> bool {
        self.body_set.contains(point)
    }

    pub fn segments(&self) -> impl Iterator<Item = &Point> {
        self.body.iter()
    }

    /// All segments except the current head.
    pub fn body_without_head(&self) -> HashSet<Point> {
        let mut cells = self.body_set.clone();
        if let Some(head) = self.body.back() {
            cells.remove(head);
        }
        cells
    }

    /// Pushes a new head; the tail is released unless the snake grows.
    pub fn advance(&mut self, new_head: Point, grow: bool) {
        self.body.push_back(new_head);
        self.body_set.insert(new_head);

        if !grow && let Some(tail) = self.body.pop_front() {
            self.body_set.remove(&tail);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizontal_layout_is_tail_first() {
        let snake = Snake::horizontal(Point::new(5, 3));
        let cells: Vec<Point> = snake.segments().copied().collect();
        assert_eq!(cells, vec![Point::new(3, 3), Point::new(4, 3), Point::new(5, 3)]);
        assert_eq!(snake.head(), Point::new(5, 3));
    }

    #[test]
    fn test_advance_without_growth_keeps_length() {
        let mut snake = Snake::horizontal(Point::new(5, 3));
        snake.advance(Point::new(6, 3), false);
        assert_eq!(snake.len(), 3);
        assert!(!snake.contains(&Point::new(3, 3)));
        assert!(snake.contains(&Point::new(6, 3)));
    }

    #[test]
    fn test_advance_with_growth_keeps_tail() {
        let mut snake = Snake::horizontal(Point::new(5, 3));
        snake.advance(Point::new(6, 3), true);
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.segments().next(), Some(&Point::new(3, 3)));
    }

    #[test]
    fn test_body_without_head_excludes_only_head() {
        let snake = Snake::horizontal(Point::new(5, 3));
        let body = snake.body_without_head();
        assert_eq!(body.len(), 2);
        assert!(!body.contains(&Point::new(5, 3)));
        assert!(body.contains(&Point::new(3, 3)));
    }
}
