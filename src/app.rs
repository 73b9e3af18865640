use reqwest::Url;
use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};

use crate::catalog::{Catalog, ComponentRow, VideoRecord};
use crate::clipboard::ClipboardSink;
use crate::error::{SessionError, SessionResult};
use crate::store::JsonStore;
use crate::youtube::{MetadataSource, VideoMeta, normalize_url};

pub const WELCOME_STATUS: &str = "Type /new or /view. /help lists commands.";
pub const HELP_STATUS: &str = "Commands: /new [url], /view, /help, /quit";

// --- Session state ---

/// Which screen of the view mode is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewScreen {
  List,
  Components,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
  /// Free-text slash-command entry.
  Command,
  /// Waiting for a URL after a bare `/new`.
  PromptUrl,
  View(ViewScreen),
}

/// Everything the renderer needs besides the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
  pub mode: AppMode,
  pub command_input: String,
  pub url_input: String,
  /// Meaningful only while the catalog is non-empty.
  pub selected_video: usize,
  pub selected_component: usize,
  /// Single-flight guard for registration and clipboard export.
  pub busy: bool,
  pub status: String,
}

impl Default for SessionState {
  fn default() -> Self {
    Self {
      mode: AppMode::Command,
      command_input: String::new(),
      url_input: String::new(),
      selected_video: 0,
      selected_component: 0,
      busy: false,
      status: WELCOME_STATUS.to_string(),
    }
  }
}

impl SessionState {
  /// The text buffer that printable keys edit in the current mode.
  pub fn active_input_mut(&mut self) -> &mut String {
    match self.mode {
      AppMode::PromptUrl => &mut self.url_input,
      AppMode::Command | AppMode::View(_) => &mut self.command_input,
    }
  }
}

// --- Async tasks ---

struct PendingRegistration {
  url: Url,
  rx: oneshot::Receiver<SessionResult<VideoMeta>>,
}

struct PendingCopy {
  label: &'static str,
  rx: oneshot::Receiver<SessionResult<()>>,
}

/// In-flight async task receivers. At most one is set at a time (see `SessionState::busy`).
#[derive(Default)]
struct AsyncTasks {
  register: Option<PendingRegistration>,
  copy: Option<PendingCopy>,
}

// --- App ---

/// The interactive session controller.
///
/// Key intents mutate `state` synchronously. Submits that need the network or the
/// clipboard spawn a task and set `busy`; the event loop calls `check_pending` every
/// tick to apply finished results, so rendering continues while a task is in flight.
pub struct App<M: MetadataSource, C: ClipboardSink> {
  pub state: SessionState,
  pub catalog: Catalog,
  pub should_quit: bool,
  store: JsonStore,
  metadata: M,
  clipboard: C,
  tasks: AsyncTasks,
}

impl<M: MetadataSource, C: ClipboardSink> App<M, C> {
  /// Load the catalog from `store` and start in command mode.
  pub fn new(store: JsonStore, metadata: M, clipboard: C) -> Self {
    let catalog = Catalog::new(store.load());
    info!(videos = catalog.len(), path = %store.path().display(), "session: started");
    Self {
      state: SessionState::default(),
      catalog,
      should_quit: false,
      store,
      metadata,
      clipboard,
      tasks: AsyncTasks::default(),
    }
  }

  pub fn selected_record(&self) -> Option<&VideoRecord> {
    self.catalog.get(self.state.selected_video)
  }

  pub fn component_rows(&self) -> Vec<ComponentRow> {
    self.selected_record().map(Catalog::component_rows_for).unwrap_or_default()
  }

  fn set_status(&mut self, msg: impl Into<String>) {
    self.state.status = msg.into();
  }

  fn report(&mut self, err: &SessionError) {
    warn!(err = ?err, "session: workflow failed");
    self.set_status(err.to_string());
  }

  /// Clamp both indices to the current catalog and row count.
  fn clamp_selection(&mut self) {
    self.state.selected_video = self.state.selected_video.min(self.catalog.len().saturating_sub(1));
    let rows = self.component_rows().len();
    self.state.selected_component = self.state.selected_component.min(rows.saturating_sub(1));
  }

  // --- Buffer editing ---

  pub fn push_char(&mut self, c: char) {
    self.state.active_input_mut().push(c);
  }

  pub fn backspace(&mut self) {
    self.state.active_input_mut().pop();
  }

  // --- Navigation ---

  /// Move the selection of the current view screen by `delta`, clamped at both ends.
  pub fn move_selection(&mut self, delta: isize) {
    let AppMode::View(screen) = self.state.mode else { return };
    match screen {
      ViewScreen::List => {
        if self.catalog.is_empty() {
          return;
        }
        self.state.selected_video = step(self.state.selected_video, delta, self.catalog.len());
      }
      ViewScreen::Components => {
        let rows = self.component_rows().len();
        if rows == 0 {
          return;
        }
        self.state.selected_component = step(self.state.selected_component, delta, rows);
      }
    }
  }

  /// Escape, or `q` while viewing: step one level back towards command mode.
  pub fn cancel(&mut self) {
    match self.state.mode {
      AppMode::View(ViewScreen::Components) => {
        self.state.mode = AppMode::View(ViewScreen::List);
        self.set_status("Back to the video list.");
      }
      AppMode::View(ViewScreen::List) => {
        self.state.mode = AppMode::Command;
        self.set_status("Command mode.");
      }
      AppMode::PromptUrl => {
        self.state.url_input.clear();
        self.state.mode = AppMode::Command;
        self.set_status("Command mode.");
      }
      AppMode::Command => {
        self.state.command_input.clear();
      }
    }
  }

  // --- Submit ---

  /// Enter. Ignored entirely while a workflow is in flight.
  pub fn submit(&mut self) {
    if self.state.busy {
      debug!(mode = ?self.state.mode, "session: submit ignored while busy");
      return;
    }
    match self.state.mode {
      AppMode::Command => {
        let raw = std::mem::take(&mut self.state.command_input);
        self.execute_command(&raw);
      }
      AppMode::PromptUrl => {
        let raw = std::mem::take(&mut self.state.url_input);
        self.state.mode = AppMode::Command;
        self.trigger_register(&raw);
      }
      AppMode::View(ViewScreen::List) => self.open_components(),
      AppMode::View(ViewScreen::Components) => self.trigger_copy(),
    }
  }

  fn execute_command(&mut self, raw: &str) {
    let input = raw.trim();
    if input.is_empty() {
      self.set_status("Type a command.");
      return;
    }
    let (command, rest) = input.split_once(char::is_whitespace).unwrap_or((input, ""));
    let arg = rest.trim();
    debug!(command, "session: command");

    match command {
      "/help" => self.set_status(HELP_STATUS),
      "/quit" | "/exit" => {
        info!("session: quit requested");
        self.should_quit = true;
      }
      "/view" => {
        self.state.mode = AppMode::View(ViewScreen::List);
        self.state.selected_component = 0;
        self.clamp_selection();
        let msg = format!("Showing {} video(s).", self.catalog.len());
        self.set_status(msg);
      }
      "/new" if arg.is_empty() => {
        self.state.mode = AppMode::PromptUrl;
        self.state.url_input.clear();
        self.set_status("Paste a YouTube URL and press Enter.");
      }
      "/new" => self.trigger_register(arg),
      other => {
        let msg = format!("Unknown command: {other}");
        self.set_status(msg);
      }
    }
  }

  fn open_components(&mut self) {
    let Some(title) = self.selected_record().map(|r| r.title.clone()) else {
      self.set_status("Nothing to open: the catalog is empty.");
      return;
    };
    self.state.mode = AppMode::View(ViewScreen::Components);
    self.state.selected_component = 0;
    self.set_status(format!("Components of \"{title}\". Enter copies the selected row."));
  }

  // --- Registration ---

  /// Validate `raw` and, if acceptable, spawn the metadata fetch.
  pub fn trigger_register(&mut self, raw: &str) {
    let url = match normalize_url(raw) {
      Ok(url) => url,
      Err(e) => {
        info!(input = %raw.trim(), "register: rejected url");
        self.report(&e);
        return;
      }
    };
    if self.catalog.contains(url.as_str()) {
      info!(url = %url, "register: duplicate, skipping fetch");
      self.report(&SessionError::DuplicateVideo);
      return;
    }

    info!(url = %url, "register: fetching metadata");
    self.state.busy = true;
    self.set_status("Fetching metadata…");

    let (tx, rx) = oneshot::channel();
    let source = self.metadata.clone();
    let task_url = url.clone();
    tokio::spawn(async move {
      let _ = tx.send(source.fetch(&task_url).await);
    });
    self.tasks.register = Some(PendingRegistration { url, rx });
  }

  /// Apply a finished fetch. `None` means the task died without answering.
  fn finish_registration(&mut self, url: Url, outcome: Option<SessionResult<VideoMeta>>) {
    self.state.busy = false;
    let Some(result) = outcome else {
      error!(url = %url, "register: fetch task vanished");
      self.set_status("Registration task failed.");
      return;
    };
    if let Err(e) = result.and_then(|meta| self.commit_registration(&url, meta)) {
      self.report(&e);
    }
  }

  fn commit_registration(&mut self, url: &Url, meta: VideoMeta) -> SessionResult<()> {
    if self.catalog.contains(url.as_str()) {
      return Err(SessionError::DuplicateVideo);
    }
    let record = VideoRecord::new(url.to_string(), meta.title, meta.thumbnail);
    self.store.save(&self.catalog.with_appended(&record))?;

    info!(url = %url, id = %record.id, "register: video added");
    let index = self.catalog.append(record);
    self.state.selected_video = index;
    self.state.selected_component = 0;
    self.state.mode = AppMode::View(ViewScreen::List);
    self.set_status("Video registered.");
    Ok(())
  }

  // --- Clipboard ---

  /// Copy the selected component row of the selected record.
  pub fn trigger_copy(&mut self) {
    let rows = self.component_rows();
    let Some(row) = rows.into_iter().nth(self.state.selected_component) else {
      self.set_status("No component selected.");
      return;
    };

    let label = row.label();
    info!(component = label, "clipboard: copying");
    self.state.busy = true;
    self.set_status(format!("Copying {label}…"));

    let (tx, rx) = oneshot::channel();
    let sink = self.clipboard.clone();
    tokio::spawn(async move {
      let _ = tx.send(sink.copy(row.value).await);
    });
    self.tasks.copy = Some(PendingCopy { label, rx });
  }

  fn finish_copy(&mut self, label: &'static str, outcome: Option<SessionResult<()>>) {
    self.state.busy = false;
    match outcome {
      Some(Ok(())) => {
        info!(component = label, "clipboard: copied");
        self.set_status(format!("{label} copied to clipboard."));
      }
      Some(Err(e)) => self.report(&e),
      None => {
        error!(component = label, "clipboard: task vanished");
        self.set_status("Clipboard task failed.");
      }
    }
  }

  // --- Polling ---

  /// Apply any finished workflow. Called once per event-loop tick.
  pub fn check_pending(&mut self) {
    if let Some(mut pending) = self.tasks.register.take() {
      match pending.rx.try_recv() {
        Ok(result) => self.finish_registration(pending.url, Some(result)),
        Err(oneshot::error::TryRecvError::Empty) => self.tasks.register = Some(pending),
        Err(oneshot::error::TryRecvError::Closed) => self.finish_registration(pending.url, None),
      }
    }

    if let Some(mut pending) = self.tasks.copy.take() {
      match pending.rx.try_recv() {
        Ok(result) => self.finish_copy(pending.label, Some(result)),
        Err(oneshot::error::TryRecvError::Empty) => self.tasks.copy = Some(pending),
        Err(oneshot::error::TryRecvError::Closed) => self.finish_copy(pending.label, None),
      }
    }
  }

  /// Wait for any in-flight workflow and apply it.
  #[cfg(test)]
  pub async fn settle(&mut self) {
    if let Some(pending) = self.tasks.register.take() {
      let outcome = pending.rx.await.ok();
      self.finish_registration(pending.url, outcome);
    }
    if let Some(pending) = self.tasks.copy.take() {
      let outcome = pending.rx.await.ok();
      self.finish_copy(pending.label, outcome);
    }
  }
}

/// `index + delta` clamped to `[0, len - 1]`. `len` must be non-zero.
fn step(index: usize, delta: isize, len: usize) -> usize {
  index.saturating_add_signed(delta).min(len - 1)
}
