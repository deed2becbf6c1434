use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use snake_common::games::snake::{Direction, SessionCommand};
use snake_common::log;

pub fn parse_command(line: &str) -> Option<SessionCommand> {
    match line.trim().to_ascii_lowercase().as_str() {
        "up" | "w" => Some(SessionCommand::Turn(Direction::Up)),
        "down" | "s" => Some(SessionCommand::Turn(Direction::Down)),
        "left" | "a" => Some(SessionCommand::Turn(Direction::Left)),
        "right" | "d" => Some(SessionCommand::Turn(Direction::Right)),
        "restart" | "r" | "" => Some(SessionCommand::Restart),
        _ => None,
    }
}

/// Forwards stdin lines as session commands until stdin closes.
pub fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<SessionCommand> {
    let (command_tx, command_rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => match parse_command(&line) {
                    Some(command) => {
                        if command_tx.send(command).is_err() {
                            break;
                        }
                    }
                    None => log!("Unknown command: {}", line.trim()),
                },
                Ok(None) => break,
                Err(e) => {
                    log!("Failed to read stdin: {}", e);
                    break;
                }
            }
        }
    });

    command_rx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_directions() {
        assert_eq!(parse_command("up"), Some(SessionCommand::Turn(Direction::Up)));
        assert_eq!(parse_command(" D \n"), Some(SessionCommand::Turn(Direction::Right)));
        assert_eq!(parse_command("Left"), Some(SessionCommand::Turn(Direction::Left)));
    }

    #[test]
    fn test_empty_line_restarts() {
        assert_eq!(parse_command(""), Some(SessionCommand::Restart));
        assert_eq!(parse_command("restart"), Some(SessionCommand::Restart));
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(parse_command("jump"), None);
    }
}
