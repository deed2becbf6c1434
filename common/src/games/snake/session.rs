use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{MissedTickBehavior, interval};

use crate::log;
use crate::games::SessionRng;
use super::game_state::{SnakeGameState, SnakeSnapshot};
use super::planner::PathPlanner;
use super::settings::SnakeSessionSettings;
use super::types::{ControlMode, Direction, GameOverReason, SessionPhase, StepOutcome};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionCommand {
    SelectMode(ControlMode),
    Turn(Direction),
    Restart,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameOverSummary {
    pub score: u32,
    pub ticks: u64,
    pub snake_length: usize,
    /// `None` when the round was stopped by the tick limit.
    pub reason: Option<GameOverReason>,
}

struct SessionInner {
    game_state: SnakeGameState,
    rng: SessionRng,
    phase: SessionPhase,
    control_mode: ControlMode,
    tick: u64,
    last_reason: Option<GameOverReason>,
}

impl SessionInner {
    fn start_round(&mut self) {
        self.game_state.reset(&mut self.rng);
        self.tick = 0;
        self.last_reason = None;
        self.phase = SessionPhase::Playing;
    }

    fn summary(&self) -> GameOverSummary {
        GameOverSummary {
            score: self.game_state.score(),
            ticks: self.tick,
            snake_length: self.game_state.snake().len(),
            reason: self.last_reason,
        }
    }
}

/// Shared handle to one session. The single writer is the tick driver plus
/// `handle_command`; every access goes through the same lock.
#[derive(Clone)]
pub struct SnakeSessionState {
    inner: Arc<Mutex<SessionInner>>,
    pub tick_interval: Duration,
    pub max_ticks: Option<u64>,
}

impl SnakeSessionState {
    pub fn create(settings: &SnakeSessionSettings, seed: u64) -> Self {
        let mut rng = SessionRng::new(seed);
        let game_state = SnakeGameState::new(settings.field_size, &mut rng);

        Self {
            inner: Arc::new(Mutex::new(SessionInner {
                game_state,
                rng,
                phase: SessionPhase::Selecting,
                control_mode: settings.control_mode,
                tick: 0,
                last_reason: None,
            })),
            tick_interval: settings.tick_interval,
            max_ticks: settings.max_ticks,
        }
    }

    pub async fn snapshot(&self) -> SnakeSnapshot {
        self.inner.lock().await.game_state.snapshot()
    }

    pub async fn phase(&self) -> SessionPhase {
        self.inner.lock().await.phase
    }

    pub async fn control_mode(&self) -> ControlMode {
        self.inner.lock().await.control_mode
    }

    pub async fn tick(&self) -> u64 {
        self.inner.lock().await.tick
    }
}

pub struct SnakeSession;

impl SnakeSession {
    /// Drives ticks until the current round ends and reports it.
    ///
    /// Ticks while the mode has not been selected yet do nothing.
    pub async fn run(session_state: &SnakeSessionState) -> GameOverSummary {
        let mut tick_interval_timer = interval(session_state.tick_interval);
        tick_interval_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tick_interval_timer.tick().await;
            Self::advance(session_state).await;

            let inner = session_state.inner.lock().await;
            if inner.phase == SessionPhase::GameOver {
                return inner.summary();
            }
        }
    }

    /// Runs one tick: plans in AI mode, then steps the grid.
    pub async fn advance(session_state: &SnakeSessionState) -> StepOutcome {
        let mut guard = session_state.inner.lock().await;
        let inner = &mut *guard;

        if inner.phase != SessionPhase::Playing {
            return StepOutcome::Idle;
        }

        if inner.control_mode == ControlMode::Ai {
            let direction = PathPlanner::choose_direction(&inner.game_state);
            inner.game_state.set_pending_direction(direction);
        }

        let outcome = inner.game_state.step(&mut inner.rng);
        inner.tick += 1;

        if let StepOutcome::GameOver(reason) = outcome {
            inner.last_reason = Some(reason);
            inner.phase = SessionPhase::GameOver;
            log!(
                "Round over after {} ticks: {:?}, score {}",
                inner.tick,
                reason,
                inner.game_state.score()
            );
        } else if let Some(max_ticks) = session_state.max_ticks
            && inner.tick >= max_ticks
        {
            inner.phase = SessionPhase::GameOver;
            log!(
                "Round stopped at tick limit {}, score {}",
                max_ticks,
                inner.game_state.score()
            );
        }

        outcome
    }

    pub async fn handle_command(session_state: &SnakeSessionState, command: SessionCommand) {
        let mut inner = session_state.inner.lock().await;

        match command {
            SessionCommand::SelectMode(mode) => {
                if inner.phase != SessionPhase::Selecting {
                    return;
                }
                inner.control_mode = mode;
                inner.start_round();
                log!("Mode selected: {:?} (seed {})", mode, inner.rng.seed());
            }
            SessionCommand::Turn(direction) => {
                if inner.phase == SessionPhase::Playing && inner.control_mode == ControlMode::Human {
                    inner.game_state.request_direction(direction);
                }
            }
            SessionCommand::Restart => {
                if inner.phase != SessionPhase::GameOver {
                    return;
                }
                inner.start_round();
                log!("Restarted");
            }
        }
    }
}
