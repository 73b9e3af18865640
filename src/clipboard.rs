use std::future::Future;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{SessionError, SessionResult};

/// Destination for exported component values.
pub trait ClipboardSink: Clone + Send + Sync + 'static {
  fn copy(&self, value: String) -> impl Future<Output = SessionResult<()>> + Send;
}

/// External clipboard program for the host OS: `(program, args)`.
pub fn clipboard_command() -> (&'static str, &'static [&'static str]) {
  if cfg!(target_os = "macos") {
    return ("pbcopy", &[]);
  }
  if cfg!(target_os = "windows") {
    return ("clip", &[]);
  }
  ("xclip", &["-selection", "clipboard"])
}

/// Pipes values into the platform clipboard program.
#[derive(Debug, Clone, Default)]
pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
  async fn copy(&self, value: String) -> SessionResult<()> {
    let (program, args) = clipboard_command();
    pipe_to(program, args, value).await
  }
}

/// Spawn `program`, write `value` to its stdin, and wait for it to exit.
pub async fn pipe_to(program: &str, args: &[&str], value: String) -> SessionResult<()> {
  debug!(program, bytes = value.len(), "clipboard: spawning");
  let mut child = Command::new(program)
    .args(args)
    .stdin(Stdio::piped())
    .stdout(Stdio::null())
    .stderr(Stdio::null())
    .kill_on_drop(true)
    .spawn()
    .map_err(|e| {
      warn!(program, err = %e, "clipboard: failed to spawn");
      if e.kind() == std::io::ErrorKind::NotFound {
        SessionError::ClipboardUnavailable(format!("{program} not found"))
      } else {
        SessionError::ClipboardUnavailable(e.to_string())
      }
    })?;

  if let Some(mut stdin) = child.stdin.take() {
    stdin.write_all(value.as_bytes()).await.map_err(|e| SessionError::ClipboardUnavailable(e.to_string()))?;
    // Dropping stdin closes the pipe so the program sees EOF.
  }

  let status = child.wait().await.map_err(|e| SessionError::ClipboardUnavailable(e.to_string()))?;
  if !status.success() {
    warn!(program, code = ?status.code(), "clipboard: non-zero exit");
    return Err(SessionError::ClipboardUnavailable(format!("{program} exited with {status}")));
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn command_matches_host_platform() {
    let (program, args) = clipboard_command();
    if cfg!(target_os = "macos") {
      assert_eq!(program, "pbcopy");
    } else if cfg!(target_os = "windows") {
      assert_eq!(program, "clip");
    } else {
      assert_eq!((program, args), ("xclip", &["-selection", "clipboard"][..]));
    }
  }

  #[tokio::test]
  async fn missing_program_is_clipboard_unavailable() {
    let err = pipe_to("vidamrr-no-such-clipboard-tool", &[], "x".into()).await.unwrap_err();
    assert_eq!(err, SessionError::ClipboardUnavailable("vidamrr-no-such-clipboard-tool not found".into()));
  }

  #[cfg(unix)]
  #[tokio::test]
  async fn consuming_program_succeeds() {
    assert_eq!(pipe_to("sh", &["-c", "cat > /dev/null"], "My Video".into()).await, Ok(()));
  }

  #[cfg(unix)]
  #[tokio::test]
  async fn non_zero_exit_is_clipboard_unavailable() {
    let err = pipe_to("sh", &["-c", "cat > /dev/null; exit 3"], "x".into()).await.unwrap_err();
    assert!(matches!(err, SessionError::ClipboardUnavailable(_)));
  }
}
