//! Trainer that asks the person at the terminal.

use std::io;

use dlm_core::Category;
use dlm_engine::Trainer;
use owo_colors::OwoColorize;
use tracing::warn;

use crate::prompt;

#[derive(Debug, Default)]
pub struct TerminalTrainer;

impl Trainer for TerminalTrainer {
    fn confirm(&mut self, rendered: &str) -> bool {
        println!("{} {}", "dlm:".bright_magenta().bold(), rendered);
        match prompt::confirm("Is this the answer you expected?") {
            Ok(accepted) => accepted,
            Err(e) => {
                warn!("failed to read confirmation: {}", e);
                true
            }
        }
    }

    fn expected_answer(&mut self) -> Option<String> {
        match prompt::ask("What answer did you expect? (leave blank to skip): ") {
            Ok(answer) => Some(answer),
            Err(e) => {
                warn!("failed to read expected answer: {}", e);
                None
            }
        }
    }

    fn category(&mut self, attempt: usize) -> Option<String> {
        if attempt > 0 {
            println!("{}", "That is not one of the categories.".yellow());
        }
        let label = format!("Category ({}): ", Category::choices());
        category_reply(prompt::ask(&label))
    }
}

/// Every line read is a candidate name, so invalid ones are asked again.
/// Only a closed or broken stdin ends the prompt.
fn category_reply(input: io::Result<String>) -> Option<String> {
    match input {
        Ok(name) => Some(name),
        Err(e) => {
            warn!("failed to read category: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_line_is_a_category_candidate() {
        assert_eq!(category_reply(Ok("deadline".to_string())), Some("deadline".to_string()));
        assert_eq!(category_reply(Ok("skip".to_string())), Some("skip".to_string()));
        assert_eq!(category_reply(Ok(String::new())), Some(String::new()));
    }

    #[test]
    fn test_closed_stdin_ends_the_prompt() {
        let closed = io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed");
        assert_eq!(category_reply(Err(closed)), None);
    }
}
