//! Application constants loaded from `constants.ron` at compile time.
//!
//! The RON file is embedded via `include_str!`, so the defaults never depend on
//! runtime file I/O. Parsed once on first access via `LazyLock`.

use serde::Deserialize;
use std::sync::LazyLock;

/// Built-in defaults. User config and CLI flags override a subset of these.
#[derive(Debug, Deserialize)]
pub struct Constants {
  pub app_name: String,

  // Catalog
  pub data_file_name: String,
  pub log_file_name: String,

  // oEmbed metadata
  pub oembed_endpoint: String,
  pub fetch_timeout_secs: u64,
  pub allowed_hosts: Vec<String>,

  // Event loop
  pub poll_interval_ms: u64,
}

static CONSTANTS: LazyLock<Constants> = LazyLock::new(|| {
  ron::from_str(include_str!("../constants.ron")).expect("embedded constants.ron is valid")
});

/// Returns a reference to the parsed application constants.
pub fn constants() -> &'static Constants {
  &CONSTANTS
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn embedded_constants_parse() {
    let c = constants();
    assert_eq!(c.fetch_timeout_secs, 8);
    assert_eq!(c.data_file_name, "videos.json");
    assert!(c.oembed_endpoint.starts_with("https://"));
  }

  #[test]
  fn allow_list_covers_short_and_mobile_hosts() {
    let hosts = &constants().allowed_hosts;
    for host in ["youtube.com", "www.youtube.com", "m.youtube.com", "youtu.be"] {
      assert!(hosts.iter().any(|h| h == host), "missing {host}");
    }
  }
}
