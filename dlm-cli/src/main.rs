use std::path::Path;

use dlm_core::{Config, Mode, load_dotenv};
use dlm_engine::DlmEngine;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod prompt;
mod session;
mod trainer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    load_dotenv();
    let config = Config::load()?;

    // Logs go to stderr so they never interleave with answers
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.settings.logging.level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let engine = DlmEngine::open(&config.settings).await?;
    info!("Knowledge store ready");

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [] => {}
        [command, path] if command == "import" => {
            let summary = engine.import_legacy(Path::new(path)).await?;
            println!(
                "Imported {} entries ({} already known, {} malformed lines skipped).",
                summary.imported, summary.duplicates, summary.malformed
            );
            return Ok(());
        }
        _ => {
            eprintln!("Usage: dlm [import <question>>answer file>]");
            return Ok(());
        }
    }

    let mut mode = session::choose_mode()?;
    if mode == Mode::Learn {
        mode = session::unlock_learn_mode(config.training_password())?;
    }
    if mode == Mode::Learn {
        session::category_briefing()?;
    }
    let show_reasoning = prompt::confirm("Show reasoning?")?;

    session::run(&engine, mode, show_reasoning).await?;
    Ok(())
}
