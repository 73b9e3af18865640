mod app;
mod catalog;
mod clipboard;
mod config;
mod constants;
mod error;
mod input;
mod store;
mod ui;
mod youtube;

use anyhow::{Context, Result};
use clap::Parser;
use ratatui::{
  DefaultTerminal,
  crossterm::event::{self, Event, KeyEventKind},
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use app::App;
use clipboard::{ClipboardSink, SystemClipboard};
use config::{Config, Settings};
use constants::constants;
use input::{handle_intent, key_intent};
use store::JsonStore;
use youtube::{MetadataSource, OEmbedClient};

const DEFAULT_LOG_FILTER: &str = "info,reqwest=warn,hyper=warn,hyper_util=warn";

// --- CLI ---

#[derive(Parser, Debug)]
#[command(
  author,
  version = env!("CARGO_PKG_VERSION"),
  about = "Keep a personal catalog of YouTube bookmarks",
  long_about = None
)]
struct Args {
  /// Catalog file (JSON array of videos). Defaults to ./videos.json
  #[arg(short, long, value_name = "PATH")]
  data_file: Option<PathBuf>,

  /// Upper bound in seconds for a metadata request
  #[arg(short, long, value_name = "SECS")]
  timeout_secs: Option<u64>,
}

// --- Logging ---

/// Log to a file in the user data dir; the terminal belongs to the UI.
fn init_logging() -> Result<WorkerGuard> {
  let log_dir = config::log_dir();
  std::fs::create_dir_all(&log_dir).with_context(|| format!("Failed to create log dir {}", log_dir.display()))?;

  let file_appender = tracing_appender::rolling::never(&log_dir, &constants().log_file_name);
  let (writer, guard) = tracing_appender::non_blocking(file_appender);
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
  // A subscriber may already be installed (e.g. by a test harness); keep going without ours.
  let _ = tracing_subscriber::fmt().with_writer(writer).with_env_filter(filter).with_ansi(false).try_init();
  Ok(guard)
}

// --- Main ---

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();
  let _log_guard = init_logging()?;
  info!(version = env!("CARGO_PKG_VERSION"), "vidamrr starting");

  let settings = Settings::resolve(args.data_file, args.timeout_secs, Config::load());
  info!(data_file = %settings.data_file.display(), timeout = ?settings.fetch_timeout, "settings resolved");

  let metadata = OEmbedClient::new(&constants().oembed_endpoint, settings.fetch_timeout)?;
  let mut app = App::new(JsonStore::new(&settings.data_file), metadata, SystemClipboard);

  let default_hook = std::panic::take_hook();
  std::panic::set_hook(Box::new(move |info| {
    ratatui::restore();
    default_hook(info);
  }));

  let mut terminal = ratatui::init();
  let result = run(&mut terminal, &mut app);
  ratatui::restore();
  info!("vidamrr exiting");
  result
}

/// Event loop: apply finished workflows, draw, then handle at most one key.
/// In-flight tasks are abandoned when the loop exits.
fn run<M: MetadataSource, C: ClipboardSink>(terminal: &mut DefaultTerminal, app: &mut App<M, C>) -> Result<()> {
  let poll_interval = Duration::from_millis(constants().poll_interval_ms);

  loop {
    app.check_pending();

    terminal.draw(|frame| ui::ui(frame, &app.state, &app.catalog))?;

    if event::poll(poll_interval)?
      && let Event::Key(key) = event::read()?
      && key.kind == KeyEventKind::Press
      && let Some(intent) = key_intent(key)
    {
      handle_intent(app, intent);
    }

    if app.should_quit {
      break;
    }
  }
  Ok(())
}
