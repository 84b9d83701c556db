//! The interactive part: mode selection, the learn-mode gate, the category
//! briefing and the question loop.

use std::io;
use std::time::Duration;

use dlm_core::{Category, Mode};
use dlm_engine::{DlmEngine, Reply, Turn};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tracing::{error, info, warn};

use crate::prompt;
use crate::trainer::TerminalTrainer;

/// Ask until a valid mode name is given.
pub fn choose_mode() -> io::Result<Mode> {
    println!("\n╔════════════════════════════════════╗");
    println!("║              dlm                   ║");
    println!("╠════════════════════════════════════╣");
    println!("║  learn    answer, and learn misses ║");
    println!("║  recall   answer from memory only  ║");
    println!("║  compute  solve math word problems ║");
    println!("╚════════════════════════════════════╝");

    loop {
        let input = prompt::ask("\nMode [learn/recall/compute]: ")?;
        match input.parse::<Mode>() {
            Ok(mode) => return Ok(mode),
            Err(e) => println!("{}", e.to_string().yellow()),
        }
    }
}

/// Learn mode needs the training password; "stop" drops to recall mode.
pub fn unlock_learn_mode(password: Option<&str>) -> io::Result<Mode> {
    let Some(expected) = password else {
        warn!("DLM_TRAINING_PASSWORD is not set, learn mode is open");
        return Ok(Mode::Learn);
    };

    loop {
        let attempt = prompt::ask("Training password (or 'stop' to use recall mode): ")?;
        if attempt.eq_ignore_ascii_case("stop") {
            println!("Switching to recall mode.");
            return Ok(Mode::Recall);
        }
        if attempt == expected {
            info!("learn mode unlocked");
            return Ok(Mode::Learn);
        }
        println!("{}", "Incorrect password.".red());
    }
}

/// Answer formats per category; trainers must acknowledge with "Y".
pub fn category_briefing() -> io::Result<()> {
    println!("\n=== Answer formats ===\n");
    for category in Category::ALL {
        println!("  {:<12} {}", category.as_str().bold(), category.training_hint());
    }
    println!();

    loop {
        let input = prompt::ask("Type Y once you have read the formats: ")?;
        if input.eq_ignore_ascii_case("y") {
            return Ok(());
        }
    }
}

/// Question loop. Returns when the user declines to continue.
pub async fn run(engine: &DlmEngine, mode: Mode, show_reasoning: bool) -> io::Result<()> {
    let mut trainer = TerminalTrainer;
    println!("\nMode: {}\n", mode.as_str().bright_green());

    loop {
        let query = prompt::ask(&format!("{} ", "you:".bright_cyan().bold()))?;
        if query.is_empty() {
            continue;
        }

        // Learn mode prompts mid-turn, which a spinner would draw over.
        let spinner = (mode != Mode::Learn).then(thinking_spinner);
        let result = engine.process(&query, mode, show_reasoning, &mut trainer).await;
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }

        match result {
            Ok(turn) => print_turn(&turn),
            Err(e) => {
                error!("query failed: {}", e);
                eprintln!("{} {}", "Error:".red(), e);
            }
        }

        if !prompt::confirm("\nAsk another question?")? {
            println!("Goodbye!");
            return Ok(());
        }
    }
}

fn thinking_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template("{spinner:.magenta} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.set_message("dlm (thinking)...");
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

fn print_turn(turn: &Turn) {
    if !turn.reasoning.is_empty() {
        println!("{}", "reasoning:".dimmed());
        for line in &turn.reasoning {
            println!("  {}", line.dimmed());
        }
    }

    let text = turn.reply.text();
    let label = "dlm:";
    let label = label.bright_magenta();
    let label = label.bold();
    match &turn.reply {
        Reply::Learned { .. } | Reply::Confirmed(_) => println!("{} {}", label, text.green()),
        Reply::NoMatch(_) | Reply::NothingLearned | Reply::AlreadyKnown => {
            println!("{} {}", label, text.yellow())
        }
        Reply::Answer(_) | Reply::Computed { .. } => println!("{} {}", label, text),
    }
}
