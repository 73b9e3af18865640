use thiserror::Error;

/// Failures of the registration and clipboard workflows.
///
/// The `Display` text of each variant is what lands on the status line, so it is
/// written for the user rather than for the log.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
  #[error("Invalid URL: must be a YouTube link.")]
  InvalidUrl,

  #[error("Could not fetch video metadata ({0}).")]
  MetadataFetchFailed(String),

  #[error("Incomplete metadata response from YouTube.")]
  IncompleteMetadata,

  #[error("That video is already in the list.")]
  DuplicateVideo,

  #[error("Clipboard unavailable ({0}).")]
  ClipboardUnavailable(String),

  #[error("Could not save the catalog ({0}).")]
  PersistenceFailure(String),
}

pub type SessionResult<T> = std::result::Result<T, SessionError>;
