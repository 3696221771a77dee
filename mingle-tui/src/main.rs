// Module declarations
#[macro_use]
mod logging;

mod api;
mod app;
mod config;
mod form;
mod session;
mod terminal;
mod ui;

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{self, Event};
use dotenv::dotenv;

use crate::app::App;
use crate::config::ConfigManager;
use crate::logging::{init_logging, LogConfig};
use crate::session::SessionStore;
use crate::terminal::Tui;

#[derive(Parser, Debug)]
#[command(
    name = "mingle",
    version,
    about = "Terminal client for the Mingle social platform"
)]
struct Cli {
    /// Server URL to connect to (overrides saved config)
    #[arg(long, short, env = "MINGLE_SERVER_URL")]
    server: Option<String>,

    /// Enable verbose debug logging
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let cli = Cli::parse();

    let log_config = if cli.verbose {
        LogConfig::verbose()
    } else {
        LogConfig::default()
    };
    init_logging(&log_config)?;

    log::info!("Starting Mingle");

    let config_manager = ConfigManager::new()?;
    let server_url = config_manager.determine_server_url(cli.server)?;
    log::info!("Using server: {}", server_url);

    let mut app = App::with_server_url(server_url);
    app.log_config = log_config;

    match SessionStore::new() {
        Ok(store) => {
            match store.load() {
                Ok(Some(session)) => {
                    log::info!("Restored session for {}", session.user.email);
                    app.restore_session(session);
                }
                Ok(None) => {}
                Err(e) => log::warn!("Could not load saved session: {}", e),
            }
            app.session_store = Some(store);
        }
        Err(e) => log::warn!("Session persistence unavailable: {}", e),
    }

    let mut tui = terminal::init()?;
    let result = run_app(&mut tui, app).await;
    terminal::restore()?;

    if let Err(ref e) = result {
        eprintln!("Error: {}", e);
    }

    result
}

async fn run_app(tui: &mut Tui, mut app: App) -> Result<()> {
    while app.running {
        app.clear_expired_notice();

        tui.draw(|frame| ui::render(&mut app, frame))?;

        // Submissions queued by the key handler run after the frame above
        // has shown the in-flight state
        if app.pending_submission.is_some() {
            app.process_pending_submission().await?;
        }

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key_event) => app.handle_key_event(key_event)?,
                _ => {}
            }
        }
    }

    Ok(())
}
