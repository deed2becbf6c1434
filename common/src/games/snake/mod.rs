mod game_state;
mod planner;
mod session;
mod settings;
mod snake;
mod types;

pub use game_state::{SnakeGameState, SnakeSnapshot};
pub use planner::{PathPlanner, bfs};
pub use session::{GameOverSummary, SessionCommand, SnakeSession, SnakeSessionState};
pub use settings::SnakeSessionSettings;
pub use snake::Snake;
pub use types::{ControlMode, Direction, FieldSize, GameOverReason, Point, SessionPhase, StepOutcome};
