//! JSON file persistence for the catalog.
//!
//! The file holds a single pretty-printed array of records. Every save rewrites the
//! whole array through a sibling temp file and a rename, so readers only ever see the
//! previous or the next full catalog.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::catalog::VideoRecord;
use crate::error::{SessionError, SessionResult};

#[derive(Debug, Clone)]
pub struct JsonStore {
  path: PathBuf,
}

impl JsonStore {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Read the catalog. An absent or unparseable file is an empty catalog.
  pub fn load(&self) -> Vec<VideoRecord> {
    let raw = match std::fs::read_to_string(&self.path) {
      Ok(raw) => raw,
      Err(e) if e.kind() == ErrorKind::NotFound => {
        debug!(path = %self.path.display(), "store: no catalog file yet");
        return Vec::new();
      }
      Err(e) => {
        warn!(path = %self.path.display(), err = %e, "store: unreadable catalog, starting empty");
        return Vec::new();
      }
    };
    match serde_json::from_str::<Vec<VideoRecord>>(&raw) {
      Ok(videos) => {
        info!(path = %self.path.display(), count = videos.len(), "store: catalog loaded");
        videos
      }
      Err(e) => {
        warn!(path = %self.path.display(), err = %e, "store: corrupt catalog, starting empty");
        Vec::new()
      }
    }
  }

  /// Replace the file contents with `videos`.
  pub fn save(&self, videos: &[VideoRecord]) -> SessionResult<()> {
    let json = serde_json::to_string_pretty(videos).map_err(|e| SessionError::PersistenceFailure(e.to_string()))?;

    if let Some(parent) = self.path.parent()
      && !parent.as_os_str().is_empty()
    {
      std::fs::create_dir_all(parent).map_err(|e| SessionError::PersistenceFailure(e.to_string()))?;
    }

    // Sibling temp file, then rename over the target.
    let tmp_path = self.path.with_extension("json.part");
    std::fs::write(&tmp_path, json).map_err(|e| SessionError::PersistenceFailure(e.to_string()))?;
    if let Err(e) = std::fs::rename(&tmp_path, &self.path) {
      let _ = std::fs::remove_file(&tmp_path);
      return Err(SessionError::PersistenceFailure(e.to_string()));
    }

    info!(path = %self.path.display(), count = videos.len(), "store: catalog saved");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  fn sample() -> Vec<VideoRecord> {
    vec![
      VideoRecord::new("https://youtu.be/a".into(), "A".into(), "http://x/a.jpg".into()),
      VideoRecord::new("https://www.youtube.com/watch?v=b".into(), "B".into(), "http://x/b.jpg".into()),
    ]
  }

  #[test]
  fn absent_file_is_empty_catalog() {
    let dir = TempDir::new().unwrap();
    let store = JsonStore::new(dir.path().join("videos.json"));
    assert!(store.load().is_empty());
  }

  #[test]
  fn corrupt_file_is_empty_catalog() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("videos.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(JsonStore::new(&path).load().is_empty());
  }

  #[test]
  fn non_array_document_is_empty_catalog() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("videos.json");
    std::fs::write(&path, r#"{"id": "x"}"#).unwrap();
    assert!(JsonStore::new(&path).load().is_empty());
  }

  #[test]
  fn save_then_load_reproduces_sequence() {
    let dir = TempDir::new().unwrap();
    let store = JsonStore::new(dir.path().join("videos.json"));
    let videos = sample();
    store.save(&videos).unwrap();
    assert_eq!(store.load(), videos);
  }

  #[test]
  fn saved_file_uses_camel_case_pretty_json() {
    let dir = TempDir::new().unwrap();
    let store = JsonStore::new(dir.path().join("videos.json"));
    store.save(&sample()).unwrap();
    let raw = std::fs::read_to_string(store.path()).unwrap();
    assert!(raw.starts_with("[\n"));
    assert!(raw.contains("\"createdAt\""));
    assert!(!raw.contains("created_at"));
  }

  #[test]
  fn save_creates_missing_parent_and_leaves_no_temp_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("videos.json");
    let store = JsonStore::new(&path);
    store.save(&sample()).unwrap();
    assert!(path.exists());
    assert!(!path.with_extension("json.part").exists());
  }

  #[test]
  fn save_into_a_directory_path_is_persistence_failure() {
    let dir = TempDir::new().unwrap();
    let store = JsonStore::new(dir.path());
    assert!(matches!(store.save(&sample()), Err(SessionError::PersistenceFailure(_))));
  }

  #[test]
  fn loads_hand_written_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("videos.json");
    std::fs::write(
      &path,
      r#"[{"id":"lq3k9z","url":"https://youtu.be/abc123","title":"T",
          "thumbnail":"http://x/thumb.jpg","createdAt":"2025-01-02T03:04:05.678Z"}]"#,
    )
    .unwrap();
    let videos = JsonStore::new(&path).load();
    assert_eq!(videos.len(), 1);
    assert_eq!(videos[0].id, "lq3k9z");
    assert_eq!(videos[0].url, "https://youtu.be/abc123");
  }
}
