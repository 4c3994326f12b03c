//! Loading of the JSON batch file.
//!
//! The file maps a source video path to its screenshot settings:
//!
//! ```json
//! {
//!   "a.mp4": { "name": "shot1", "resolution": "640x480", "timestamp": "2000" }
//! }
//! ```
//!
//! Only the presence and JSON types of the settings are checked here; their
//! values are checked by [`Validator`](crate::validate::Validator).

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Error, Result};

/// One configuration entry, exactly as written in the batch file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenshotSpec {
  pub source: PathBuf,
  pub name: String,
  pub resolution: String,
  pub timestamp: String,
}

/// Entries in the order they appear in the batch file.
pub type Batch = Vec<ScreenshotSpec>;

#[derive(Deserialize)]
struct Settings {
  name: Option<String>,
  resolution: Option<String>,
  timestamp: Option<TimestampValue>,
}

/// Timestamps may be written either as a string or as a bare JSON number.
#[derive(Deserialize)]
#[serde(untagged)]
enum TimestampValue {
  Text(String),
  Number(serde_json::Number),
}

impl TimestampValue {
  fn into_string(self) -> String {
    match self {
      Self::Text(s) => s,
      Self::Number(n) => n.to_string(),
    }
  }
}

/// Reads and parses the batch file at `path`.
pub fn load_batch(path: impl AsRef<Path>) -> Result<Batch> {
  let path = path.as_ref();
  let contents = fs::read_to_string(path).map_err(|source| Error::ConfigUnavailable {
    path: path.to_path_buf(),
    source,
  })?;

  parse_batch(&contents, path)
}

/// Parses batch file contents. `path` is only used for error messages.
pub fn parse_batch(contents: &str, path: &Path) -> Result<Batch> {
  let root: Value = serde_json::from_str(contents).map_err(|e| Error::InvalidConfigSyntax {
    path: path.to_path_buf(),
    reason: e.to_string(),
  })?;

  let Value::Object(entries) = root else {
    return Err(Error::InvalidConfigSyntax {
      path: path.to_path_buf(),
      reason: "top level value must be an object".to_owned(),
    });
  };

  let batch = entries_to_batch(entries)?;
  debug!("loaded {} entries from {:?}", batch.len(), path);

  Ok(batch)
}

fn entries_to_batch(entries: Map<String, Value>) -> Result<Batch> {
  entries
    .into_iter()
    .map(|(source, value)| {
      let settings = Settings::deserialize(value).map_err(|e| Error::InvalidEntry {
        source_path: source.clone(),
        reason: e.to_string(),
      })?;

      let missing: Vec<&'static str> = [
        ("name", settings.name.is_none()),
        ("resolution", settings.resolution.is_none()),
        ("timestamp", settings.timestamp.is_none()),
      ]
      .into_iter()
      .filter_map(|(key, absent)| absent.then_some(key))
      .collect();

      match (settings.name, settings.resolution, settings.timestamp) {
        (Some(name), Some(resolution), Some(timestamp)) => Ok(ScreenshotSpec {
          source: PathBuf::from(source),
          name,
          resolution,
          timestamp: timestamp.into_string(),
        }),
        _ => Err(Error::MissingRequiredFields {
          source_path: source,
          missing,
        }),
      }
    })
    .collect()
}
