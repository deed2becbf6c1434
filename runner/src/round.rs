use tokio::task::{JoinError, JoinHandle};

use snake_common::games::snake::{
    GameOverSummary, SessionCommand, SessionPhase, SnakeSession, SnakeSessionState,
};
use snake_common::log;

/// Tick task of the current human round plus the bookkeeping needed to start the next one.
pub struct HumanRounds {
    session_state: SnakeSessionState,
    game: u32,
    game_handle: JoinHandle<GameOverSummary>,
    finished: bool,
}

impl HumanRounds {
    pub fn start(session_state: &SnakeSessionState) -> Self {
        Self {
            session_state: session_state.clone(),
            game: 1,
            game_handle: spawn_round(session_state),
            finished: false,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Waits for the running round and logs its summary. Cancel safe; must not
    /// be called again once the round has been joined.
    pub async fn join(&mut self) -> Result<GameOverSummary, JoinError> {
        let summary = (&mut self.game_handle).await?;
        self.finished = true;
        log_summary(self.game, &summary);
        Ok(summary)
    }

    /// Forwards a player command. A restart is only honoured once the round is
    /// over; if the tick task has stopped but was not joined yet it is joined
    /// first, and its summary is returned.
    pub async fn handle_command(
        &mut self,
        command: SessionCommand,
    ) -> Result<Option<GameOverSummary>, JoinError> {
        if command != SessionCommand::Restart {
            SnakeSession::handle_command(&self.session_state, command).await;
            return Ok(None);
        }

        let mut ended = None;
        if !self.finished {
            // The tick task returns as soon as it records game over.
            if self.session_state.phase().await != SessionPhase::GameOver {
                return Ok(None);
            }
            ended = Some(self.join().await?);
        }

        SnakeSession::handle_command(&self.session_state, SessionCommand::Restart).await;
        self.game += 1;
        self.game_handle = spawn_round(&self.session_state);
        self.finished = false;
        Ok(ended)
    }

    pub fn abort(&self) {
        if !self.finished {
            self.game_handle.abort();
        }
    }
}

fn spawn_round(session_state: &SnakeSessionState) -> JoinHandle<GameOverSummary> {
    let session_state = session_state.clone();
    tokio::spawn(async move { SnakeSession::run(&session_state).await })
}

pub fn log_summary(game: u32, summary: &GameOverSummary) {
    match summary.reason {
        Some(reason) => log!(
            "Game {} over after {} ticks: {:?}. Score {}, length {}",
            game,
            summary.ticks,
            reason,
            summary.score,
            summary.snake_length
        ),
        None => log!(
            "Game {} stopped at tick limit ({} ticks). Score {}, length {}",
            game,
            summary.ticks,
            summary.score,
            summary.snake_length
        ),
    }
}
