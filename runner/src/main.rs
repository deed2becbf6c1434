mod config;
mod input;
mod round;

use std::path::PathBuf;

use clap::Parser;
use snake_common::games::snake::{
    ControlMode, SessionCommand, SnakeSession, SnakeSessionSettings, SnakeSessionState,
};
use snake_common::{log, logger};

use crate::round::{HumanRounds, log_summary};

#[derive(Parser)]
#[command(name = "snake_runner", about = "Headless tick driver for the snake game")]
struct Args {
    /// YAML config file; defaults to snake_runner_config.yaml next to the binary
    #[arg(long)]
    config: Option<PathBuf>,

    /// Rounds to play back to back in AI mode
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    games: u32,

    /// Overrides the seed from the config file
    #[arg(long)]
    seed: Option<u64>,

    /// Play from stdin instead of letting the planner steer
    #[arg(long)]
    human: bool,

    #[arg(long)]
    use_log_prefix: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Runner".to_string())
    } else {
        None
    };
    logger::init_logger(prefix);

    let game_config = config::get_config_manager(args.config).get_config()?;
    let mut settings = SnakeSessionSettings::from(&game_config);
    if args.human {
        settings.control_mode = ControlMode::Human;
    }

    let seed = args.seed.or(settings.seed).unwrap_or_else(rand::random);
    let session_state = SnakeSessionState::create(&settings, seed);

    log!(
        "Starting {:?} session on {}x{} board, tick {} ms, seed {}",
        settings.control_mode,
        settings.field_size.width,
        settings.field_size.height,
        settings.tick_interval.as_millis(),
        seed
    );

    SnakeSession::handle_command(&session_state, SessionCommand::SelectMode(settings.control_mode)).await;

    match settings.control_mode {
        ControlMode::Ai => run_ai_games(&session_state, args.games).await,
        ControlMode::Human => run_human_game(&session_state).await,
    }

    log!("Runner shut down");
    Ok(())
}

async fn run_ai_games(session_state: &SnakeSessionState, games: u32) {
    let mut scores: Vec<u32> = Vec::new();

    for game in 1..=games {
        if game > 1 {
            SnakeSession::handle_command(session_state, SessionCommand::Restart).await;
        }

        let summary = tokio::select! {
            summary = SnakeSession::run(session_state) => summary,
            _ = tokio::signal::ctrl_c() => {
                log!("Interrupted during game {}", game);
                break;
            }
        };

        log_summary(game, &summary);
        scores.push(summary.score);
    }

    if let Some(best) = scores.iter().max() {
        let average = scores.iter().sum::<u32>() as f64 / scores.len() as f64;
        log!("Played {} game(s): best {}, average {:.2}", scores.len(), best, average);
    }
}

async fn run_human_game(session_state: &SnakeSessionState) {
    let mut command_rx = input::spawn_stdin_reader();
    log!("Steer with up/down/left/right (or w/s/a/d) followed by Enter; Enter alone restarts after game over");

    let mut rounds = HumanRounds::start(session_state);
    let mut stdin_open = true;

    loop {
        tokio::select! {
            result = rounds.join(), if !rounds.is_finished() => {
                if let Err(e) = result {
                    log!("Game task failed: {}", e);
                    break;
                }
                if !stdin_open {
                    break;
                }
                log!("Press Enter to play again");
            }
            command = command_rx.recv(), if stdin_open => {
                let Some(command) = command else {
                    stdin_open = false;
                    if rounds.is_finished() {
                        break;
                    }
                    continue;
                };

                if let Err(e) = rounds.handle_command(command).await {
                    log!("Game task failed: {}", e);
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                log!("Shutdown signal received");
                break;
            }
        }
    }

    rounds.abort();
}
