use crate::log;
use crate::games::SessionRng;
use super::snake::Snake;
use super::types::{Direction, FieldSize, GameOverReason, Point, StepOutcome};

/// Read-only copy of everything a renderer or score label needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnakeSnapshot {
    /// Tail-first, head-last.
    pub snake: Vec<Point>,
    pub food: Option<Point>,
    pub score: u32,
    pub game_over: bool,
    pub direction: Direction,
}

const MIN_FIELD_WIDTH: usize = 3;
const MIN_FIELD_HEIGHT: usize = 1;

#[derive(Clone, Debug)]
pub struct SnakeGameState {
    pub field_size: FieldSize,
    snake: Snake,
    food: Option<Point>,
    direction: Direction,
    pending_direction: Direction,
    direction_locked: bool,
    score: u32,
    game_over_reason: Option<GameOverReason>,
}

impl SnakeGameState {
    /// Fresh game: a three-cell snake centred on the board heading right, plus food.
    ///
    /// Fields narrower than three cells or with no rows are widened to
    /// `MIN_FIELD_WIDTH` x `MIN_FIELD_HEIGHT` so the starting snake fits.
    pub fn new(field_size: FieldSize, rng: &mut SessionRng) -> Self {
        let field_size = FieldSize::new(
            field_size.width.max(MIN_FIELD_WIDTH),
            field_size.height.max(MIN_FIELD_HEIGHT),
        );

        let mut state = Self {
            field_size,
            snake: Self::start_snake(&field_size),
            food: None,
            direction: Direction::Right,
            pending_direction: Direction::Right,
            direction_locked: false,
            score: 0,
            game_over_reason: None,
        };
        state.place_food(rng);
        state
    }

    /// Builds a state from explicit parts. Segments are tail-first.
    pub fn from_parts(
        field_size: FieldSize,
        segments: Vec<Point>,
        direction: Direction,
        food: Option<Point>,
    ) -> Result<Self, String> {
        if segments.is_empty() {
            return Err("Snake needs at least one segment".to_string());
        }
        if let Some(outside) = segments.iter().find(|p| !field_size.contains_point(**p)) {
            return Err(format!("Segment ({}, {}) lies outside the field", outside.x, outside.y));
        }

        let segment_count = segments.len();
        let snake = Snake::from_segments(segments);
        if snake.len() != segment_count {
            return Err("Snake segments must be distinct".to_string());
        }
        if let Some(food) = food
            && (!field_size.contains_point(food) || snake.contains(&food))
        {
            return Err(format!("Food ({}, {}) must be a free cell inside the field", food.x, food.y));
        }

        Ok(Self {
            field_size,
            snake,
            food,
            direction,
            pending_direction: direction,
            direction_locked: false,
            score: 0,
            game_over_reason: None,
        })
    }

    fn start_snake(field_size: &FieldSize) -> Snake {
        let center_x = (field_size.width / 2) as i32;
        let center_y = (field_size.height / 2) as i32;
        Snake::horizontal(Point::new(center_x + 1, center_y))
    }

    /// Reinitialises every field on the same board.
    pub fn reset(&mut self, rng: &mut SessionRng) {
        *self = Self::new(self.field_size, rng);
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Option<Point> {
        self.food
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn pending_direction(&self) -> Direction {
        self.pending_direction
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over_reason.is_some()
    }

    pub fn game_over_reason(&self) -> Option<GameOverReason> {
        self.game_over_reason
    }

    pub fn is_inside(&self, x: i32, y: i32) -> bool {
        self.field_size.contains(x, y)
    }

    /// Queues a turn for the next tick. Reversals and any request after the
    /// first accepted one in the same tick are dropped silently.
    pub fn request_direction(&mut self, direction: Direction) {
        if !direction.is_opposite(&self.direction) && !self.direction_locked {
            self.pending_direction = direction;
            self.direction_locked = true;
        }
    }

    /// Overwrites the queued direction without consulting the per-tick lock.
    /// Used by automated control, which decides once per tick right before `step`.
    pub fn set_pending_direction(&mut self, direction: Direction) {
        self.pending_direction = direction;
    }

    pub fn step(&mut self, rng: &mut SessionRng) -> StepOutcome {
        if self.is_game_over() {
            return StepOutcome::Idle;
        }

        self.direction = self.pending_direction;
        self.direction_locked = false;

        let new_head = self.snake.head().offset(self.direction);

        if !self.is_inside(new_head.x, new_head.y) {
            return self.end_game(GameOverReason::WallCollision);
        }
        if self.snake.contains(&new_head) {
            return self.end_game(GameOverReason::SelfCollision);
        }

        let ate = self.food == Some(new_head);
        self.snake.advance(new_head, ate);

        if !ate {
            return StepOutcome::Moved;
        }

        self.score += 1;
        log!("Ate food at ({}, {}). Score: {}", new_head.x, new_head.y, self.score);
        self.place_food(rng);

        match self.game_over_reason {
            Some(reason) => StepOutcome::GameOver(reason),
            None => StepOutcome::Ate,
        }
    }

    /// Moves food to a uniformly chosen free cell, or ends the game when none is left.
    pub fn place_food(&mut self, rng: &mut SessionRng) {
        let free: Vec<Point> = self
            .field_size
            .cells()
            .filter(|p| !self.snake.contains(p))
            .collect();

        match rng.choose(&free) {
            Some(&pos) => {
                self.food = Some(pos);
                log!("Food spawned at ({}, {})", pos.x, pos.y);
            }
            None => {
                self.end_game(GameOverReason::BoardFull);
            }
        }
    }

    fn end_game(&mut self, reason: GameOverReason) -> StepOutcome {
        log!(
            "Game over: {:?} with head at ({}, {}), score {}",
            reason,
            self.snake.head().x,
            self.snake.head().y,
            self.score
        );
        self.game_over_reason = Some(reason);
        StepOutcome::GameOver(reason)
    }

    pub fn snapshot(&self) -> SnakeSnapshot {
        SnakeSnapshot {
            snake: self.snake.segments().copied().collect(),
            food: self.food,
            score: self.score,
            game_over: self.is_game_over(),
            direction: self.direction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn create_state(width: usize, height: usize) -> (SnakeGameState, SessionRng) {
        let mut rng = SessionRng::new(42);
        let state = SnakeGameState::new(FieldSize::new(width, height), &mut rng);
        (state, rng)
    }

    fn segments(state: &SnakeGameState) -> Vec<Point> {
        state.snake().segments().copied().collect()
    }

    fn assert_distinct(state: &SnakeGameState) {
        let cells = segments(state);
        let unique: HashSet<Point> = cells.iter().copied().collect();
        assert_eq!(unique.len(), cells.len());
    }

    #[test]
    fn test_new_snake_is_centered_heading_right() {
        let (state, _) = create_state(30, 20);
        assert_eq!(
            segments(&state),
            vec![Point::new(14, 10), Point::new(15, 10), Point::new(16, 10)]
        );
        assert_eq!(state.direction(), Direction::Right);
        assert_eq!(state.pending_direction(), Direction::Right);
        assert_eq!(state.score(), 0);
        assert!(!state.is_game_over());

        let food = state.food().unwrap();
        assert!(state.is_inside(food.x, food.y));
        assert!(!state.snake().contains(&food));
    }

    #[test]
    fn test_new_widens_field_too_small_for_starting_snake() {
        let (state, _) = create_state(1, 0);
        assert_eq!(state.field_size, FieldSize::new(MIN_FIELD_WIDTH, MIN_FIELD_HEIGHT));
        assert_eq!(
            segments(&state),
            vec![Point::new(0, 0), Point::new(1, 0), Point::new(2, 0)]
        );
        assert!(segments(&state).iter().all(|p| state.is_inside(p.x, p.y)));
        assert_eq!(state.food(), None);
        assert!(state.is_game_over());
    }

    #[test]
    fn test_is_inside_bounds() {
        let (state, _) = create_state(30, 20);
        assert!(state.is_inside(0, 0));
        assert!(state.is_inside(29, 19));
        assert!(!state.is_inside(-1, 0));
        assert!(!state.is_inside(0, -1));
        assert!(!state.is_inside(30, 0));
        assert!(!state.is_inside(0, 20));
    }

    #[test]
    fn test_cannot_reverse_direction() {
        let (mut state, _) = create_state(30, 20);
        state.request_direction(Direction::Left);
        assert_eq!(state.pending_direction(), Direction::Right);
    }

    #[test]
    fn test_rejected_reversal_does_not_lock_the_tick() {
        let (mut state, _) = create_state(30, 20);
        state.request_direction(Direction::Left);
        state.request_direction(Direction::Down);
        assert_eq!(state.pending_direction(), Direction::Down);
    }

    #[test]
    fn test_only_first_direction_change_per_tick() {
        let (mut state, _) = create_state(30, 20);
        state.request_direction(Direction::Up);
        state.request_direction(Direction::Down);
        assert_eq!(state.pending_direction(), Direction::Up);
    }

    #[test]
    fn test_step_unlocks_direction_changes() {
        let (mut state, mut rng) = create_state(30, 20);
        state.food = Some(Point::new(0, 0));
        state.request_direction(Direction::Up);
        assert_eq!(state.step(&mut rng), StepOutcome::Moved);
        assert_eq!(state.direction(), Direction::Up);

        state.request_direction(Direction::Left);
        assert_eq!(state.pending_direction(), Direction::Left);
    }

    #[test]
    fn test_move_keeps_length() {
        let (mut state, mut rng) = create_state(30, 20);
        state.food = Some(Point::new(0, 0));
        assert_eq!(state.step(&mut rng), StepOutcome::Moved);
        assert_eq!(
            segments(&state),
            vec![Point::new(15, 10), Point::new(16, 10), Point::new(17, 10)]
        );
    }

    #[test]
    fn test_snake_grows_on_food() {
        let (mut state, mut rng) = create_state(30, 20);
        state.food = Some(Point::new(17, 10));

        assert_eq!(state.step(&mut rng), StepOutcome::Ate);
        assert_eq!(state.snake().len(), 4);
        assert_eq!(state.score(), 1);
        assert_eq!(state.snake().head(), Point::new(17, 10));

        let food = state.food().unwrap();
        assert!(!state.snake().contains(&food));
    }

    #[test]
    fn test_game_over_on_wall_collision_leaves_snake_untouched() {
        let field = FieldSize::new(10, 10);
        let body = vec![Point::new(7, 5), Point::new(8, 5), Point::new(9, 5)];
        let mut state = SnakeGameState::from_parts(field, body.clone(), Direction::Right, Some(Point::new(0, 0))).unwrap();
        let mut rng = SessionRng::new(1);

        assert_eq!(state.step(&mut rng), StepOutcome::GameOver(GameOverReason::WallCollision));
        assert!(state.is_game_over());
        assert_eq!(segments(&state), body);
    }

    #[test]
    fn test_game_over_on_top_wall() {
        let field = FieldSize::new(10, 10);
        let body = vec![Point::new(3, 1), Point::new(3, 0)];
        let mut state = SnakeGameState::from_parts(field, body, Direction::Up, None).unwrap();
        let mut rng = SessionRng::new(1);

        assert_eq!(state.step(&mut rng), StepOutcome::GameOver(GameOverReason::WallCollision));
    }

    #[test]
    fn test_game_over_on_self_collision() {
        let field = FieldSize::new(20, 15);
        let body = vec![
            Point::new(5, 5),
            Point::new(6, 5),
            Point::new(7, 5),
            Point::new(7, 6),
            Point::new(6, 6),
        ];
        let mut state = SnakeGameState::from_parts(field, body.clone(), Direction::Left, Some(Point::new(0, 0))).unwrap();
        let mut rng = SessionRng::new(1);

        state.set_pending_direction(Direction::Up);
        assert_eq!(state.step(&mut rng), StepOutcome::GameOver(GameOverReason::SelfCollision));
        assert_eq!(segments(&state), body);
    }

    #[test]
    fn test_moving_into_tail_cell_is_collision() {
        let field = FieldSize::new(10, 10);
        let body = vec![
            Point::new(4, 4),
            Point::new(5, 4),
            Point::new(5, 5),
            Point::new(4, 5),
        ];
        let mut state = SnakeGameState::from_parts(field, body, Direction::Left, Some(Point::new(0, 0))).unwrap();
        let mut rng = SessionRng::new(1);

        state.set_pending_direction(Direction::Up);
        assert_eq!(state.step(&mut rng), StepOutcome::GameOver(GameOverReason::SelfCollision));
    }

    #[test]
    fn test_step_after_game_over_is_noop() {
        let field = FieldSize::new(5, 5);
        let mut state = SnakeGameState::from_parts(field, vec![Point::new(4, 0)], Direction::Right, None).unwrap();
        let mut rng = SessionRng::new(1);

        state.step(&mut rng);
        assert!(state.is_game_over());
        let before = state.snapshot();
        assert_eq!(state.step(&mut rng), StepOutcome::Idle);
        assert_eq!(state.snapshot(), before);
    }

    #[test]
    fn test_place_food_on_empty_board() {
        let field = FieldSize::new(30, 20);
        let mut state = SnakeGameState::from_parts(field, vec![Point::new(5, 5)], Direction::Right, None).unwrap();
        let mut rng = SessionRng::new(3);

        state.place_food(&mut rng);
        let food = state.food().unwrap();
        assert_ne!(food, Point::new(5, 5));
        assert!(!state.is_game_over());
    }

    #[test]
    fn test_place_food_picks_only_free_cell() {
        let field = FieldSize::new(3, 1);
        let body = vec![Point::new(0, 0), Point::new(1, 0)];
        let mut state = SnakeGameState::from_parts(field, body, Direction::Right, None).unwrap();
        let mut rng = SessionRng::new(11);

        state.place_food(&mut rng);
        assert_eq!(state.food(), Some(Point::new(2, 0)));
    }

    #[test]
    fn test_place_food_full_board_ends_game_and_keeps_food() {
        let field = FieldSize::new(3, 2);
        let body = vec![
            Point::new(0, 0),
            Point::new(1, 0),
            Point::new(2, 0),
            Point::new(2, 1),
            Point::new(1, 1),
            Point::new(0, 1),
        ];
        let mut state = SnakeGameState::from_parts(field, body, Direction::Left, None).unwrap();
        let mut rng = SessionRng::new(5);

        state.place_food(&mut rng);
        assert_eq!(state.game_over_reason(), Some(GameOverReason::BoardFull));
        assert_eq!(state.food(), None);
    }

    #[test]
    fn test_eating_last_free_cell_fills_board() {
        let field = FieldSize::new(2, 2);
        let body = vec![Point::new(0, 1), Point::new(0, 0), Point::new(1, 0)];
        let mut state = SnakeGameState::from_parts(field, body, Direction::Right, Some(Point::new(1, 1))).unwrap();
        let mut rng = SessionRng::new(5);

        state.set_pending_direction(Direction::Down);
        assert_eq!(state.step(&mut rng), StepOutcome::GameOver(GameOverReason::BoardFull));
        assert_eq!(state.score(), 1);
        assert_eq!(state.snake().len(), 4);
        assert_eq!(state.food(), Some(Point::new(1, 1)));
    }

    #[test]
    fn test_restart_after_game_over() {
        let (mut state, mut rng) = create_state(10, 10);
        state.set_pending_direction(Direction::Up);
        while !state.is_game_over() {
            state.step(&mut rng);
        }

        state.reset(&mut rng);
        assert!(!state.is_game_over());
        assert_eq!(state.snake().len(), 3);
        assert_eq!(state.score(), 0);
        assert_eq!(state.direction(), Direction::Right);
    }

    #[test]
    fn test_random_play_keeps_segments_distinct() {
        let (mut state, mut rng) = create_state(8, 8);
        let mut turns = SessionRng::new(2024);

        for _ in 0..500 {
            if state.is_game_over() {
                state.reset(&mut rng);
            }
            let idx = turns.random_range(0..Direction::ALL.len());
            state.request_direction(Direction::ALL[idx]);
            state.step(&mut rng);
            assert_distinct(&state);
            if let Some(food) = state.food()
                && !state.is_game_over()
            {
                assert!(!state.snake().contains(&food));
            }
        }
    }

    #[test]
    fn test_same_seed_same_food() {
        let (a, _) = create_state(30, 20);
        let (b, _) = create_state(30, 20);
        assert_eq!(a.food(), b.food());
    }

    #[test]
    fn test_from_parts_rejects_bad_input() {
        let field = FieldSize::new(5, 5);
        assert!(SnakeGameState::from_parts(field, vec![], Direction::Right, None).is_err());
        assert!(SnakeGameState::from_parts(field, vec![Point::new(5, 0)], Direction::Right, None).is_err());
        assert!(
            SnakeGameState::from_parts(field, vec![Point::new(1, 1), Point::new(1, 1)], Direction::Right, None)
                .is_err()
        );
        assert!(
            SnakeGameState::from_parts(field, vec![Point::new(1, 1)], Direction::Right, Some(Point::new(1, 1)))
                .is_err()
        );
    }
}
