use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// --- Records ---

/// One bookmarked video. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
  pub id: String,
  pub url: String,
  pub title: String,
  pub thumbnail: String,
  pub created_at: DateTime<Utc>,
}

impl VideoRecord {
  /// Build a fresh record stamped with a new id and the current time.
  pub fn new(url: String, title: String, thumbnail: String) -> Self {
    Self { id: uuid::Uuid::new_v4().simple().to_string(), url, title, thumbnail, created_at: Utc::now() }
  }
}

/// Structural facets of a record exposed for individual export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
  Title,
  Thumbnail,
  Url,
  Record,
}

impl ComponentKind {
  pub const ALL: [ComponentKind; 4] =
    [ComponentKind::Title, ComponentKind::Thumbnail, ComponentKind::Url, ComponentKind::Record];

  pub fn label(self) -> &'static str {
    match self {
      ComponentKind::Title => "Title",
      ComponentKind::Thumbnail => "Thumbnail",
      ComponentKind::Url => "URL",
      ComponentKind::Record => "Record",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentRow {
  pub kind: ComponentKind,
  pub value: String,
}

impl ComponentRow {
  pub fn label(&self) -> &'static str {
    self.kind.label()
  }
}

// --- Catalog ---

/// Ordered list of records. Insertion order is display order and persisted order.
#[derive(Debug, Default, Clone)]
pub struct Catalog {
  videos: Vec<VideoRecord>,
}

impl Catalog {
  pub fn new(videos: Vec<VideoRecord>) -> Self {
    Self { videos }
  }

  pub fn all(&self) -> &[VideoRecord] {
    &self.videos
  }

  pub fn len(&self) -> usize {
    self.videos.len()
  }

  pub fn is_empty(&self) -> bool {
    self.videos.is_empty()
  }

  pub fn get(&self, index: usize) -> Option<&VideoRecord> {
    self.videos.get(index)
  }

  /// Exact-match membership on the normalized URL.
  pub fn contains(&self, url: &str) -> bool {
    self.videos.iter().any(|v| v.url == url)
  }

  /// Append a record and return its index.
  pub fn append(&mut self, record: VideoRecord) -> usize {
    self.videos.push(record);
    self.videos.len() - 1
  }

  /// The catalog as it would look after appending `record`, without mutating it.
  /// Used to persist before committing in memory.
  pub fn with_appended(&self, record: &VideoRecord) -> Vec<VideoRecord> {
    let mut next = Vec::with_capacity(self.videos.len() + 1);
    next.extend_from_slice(&self.videos);
    next.push(record.clone());
    next
  }

  /// Derived rows for `record`, computed fresh on every call.
  pub fn component_rows_for(record: &VideoRecord) -> Vec<ComponentRow> {
    ComponentKind::ALL
      .iter()
      .map(|&kind| {
        let value = match kind {
          ComponentKind::Title => record.title.clone(),
          ComponentKind::Thumbnail => record.thumbnail.clone(),
          ComponentKind::Url => record.url.clone(),
          ComponentKind::Record => serde_json::to_string_pretty(record).unwrap_or_default(),
        };
        ComponentRow { kind, value }
      })
      .collect()
  }
}
