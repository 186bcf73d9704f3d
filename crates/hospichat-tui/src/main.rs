use std::path::PathBuf;
use anyhow::Result;
use clap::Parser;
use hospichat_core::{ChatClient, Config, ErrorPolicy};

mod app;
mod handler;
mod logging;
mod tui;
mod ui;

use app::App;
use tui::{EventHandler, Tui};

#[derive(Parser)]
#[command(name = "hospichat")]
#[command(about = "Terminal chat client for the hospital assistant", version)]
struct Cli {
    /// Base URL of the assistant (POST <endpoint>/chat)
    #[arg(short, long)]
    endpoint: Option<String>,
    /// Show exchange errors in the status line instead of only logging them
    #[arg(long)]
    surface_errors: bool,
    /// Log file path
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_result = Config::load();
    let config = config_result.as_ref().cloned().unwrap_or_else(|_| Config::new());

    let log_path = cli
        .log_file
        .clone()
        .or_else(|| config.log_file.as_ref().map(PathBuf::from))
        .unwrap_or_else(logging::default_log_path);
    logging::init(&log_path)?;

    if let Err(e) = &config_result {
        tracing::warn!(error = %e, "could not read config, using defaults");
    }

    let endpoint = config.resolve_endpoint(cli.endpoint.as_deref());
    let error_policy = if cli.surface_errors {
        ErrorPolicy::Surfaced
    } else {
        config.error_policy()
    };
    tracing::info!(%endpoint, policy = error_policy.as_str(), "starting hospichat");

    let mut app = App::new(ChatClient::new(&endpoint), error_policy);

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = EventHandler::new();

    let result = run(&mut terminal, &mut app, &mut events).await;

    tui::restore()?;
    if let Err(e) = &result {
        tracing::error!(error = %e, "exited with error");
    }
    result
}

async fn run(terminal: &mut Tui, app: &mut App, events: &mut EventHandler) -> Result<()> {
    let tx = events.sender();
    terminal.draw(|frame| ui::render(app, frame))?;

    while !app.should_quit {
        let Some(event) = events.next().await else {
            break;
        };
        handler::handle_event(app, event, &tx);
        terminal.draw(|frame| ui::render(app, frame))?;
    }

    tracing::info!(messages = app.state.conversation().len(), "session ended");
    Ok(())
}
