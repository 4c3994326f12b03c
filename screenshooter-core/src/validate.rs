//! Checks a [`Batch`] against the files it names before anything is captured.

use std::collections::{HashMap, HashSet};
use std::fmt::{self, Display, Formatter};
use std::fs::File;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::{Batch, ScreenshotSpec};
use crate::error::{Error, Result};
use crate::probe::{ProbedMedia, Prober};
use crate::regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
  pub width: u64,
  pub height: u64,
}

impl Resolution {
  /// Parses `WIDTHxHEIGHT`, digits only.
  pub fn parse(s: &str) -> Option<Self> {
    let caps = regex!(r"^(\d+)x(\d+)$").captures(s)?;

    Some(Self {
      width: caps[1].parse().ok()?,
      height: caps[2].parse().ok()?,
    })
  }

  pub fn pixel_count(self) -> u64 {
    self.width.saturating_mul(self.height)
  }
}

impl Display for Resolution {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{}x{}", self.width, self.height)
  }
}

/// An entry that passed every check, ready to be captured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedShot {
  pub source: PathBuf,
  pub name: String,
  pub resolution: Resolution,
  pub timestamp_ms: u64,
}

impl ValidatedShot {
  pub fn output_file_name(&self) -> String {
    format!("{}.jpg", self.name)
  }
}

/// Validates batch entries in order, stopping at the first violation.
///
/// Screenshot names must be unique within one call to [`Validator::validate`].
/// Probe results are kept for the lifetime of the validator, so each source
/// file is probed at most once.
pub struct Validator<P> {
  prober: P,
  used_names: HashSet<String>,
  probed: HashMap<PathBuf, ProbedMedia>,
}

impl<P: Prober> Validator<P> {
  pub fn new(prober: P) -> Self {
    Self {
      prober,
      used_names: HashSet::new(),
      probed: HashMap::new(),
    }
  }

  pub fn validate(&mut self, batch: &Batch) -> Result<Vec<ValidatedShot>> {
    self.used_names.clear();
    batch.iter().map(|spec| self.validate_entry(spec)).collect()
  }

  fn validate_entry(&mut self, spec: &ScreenshotSpec) -> Result<ValidatedShot> {
    let source = &spec.source;

    if !is_readable_file(source) {
      return Err(Error::SourceFileUnavailable {
        path: source.clone(),
      });
    }

    let missing: Vec<&'static str> = [
      ("name", spec.name.trim().is_empty()),
      ("resolution", spec.resolution.is_empty()),
      ("timestamp", spec.timestamp.is_empty()),
    ]
    .into_iter()
    .filter_map(|(key, absent)| absent.then_some(key))
    .collect();
    if !missing.is_empty() {
      return Err(Error::MissingRequiredFields {
        source_path: source.to_string_lossy().into_owned(),
        missing,
      });
    }

    if !self.used_names.insert(spec.name.clone()) {
      return Err(Error::DuplicateScreenshotName {
        name: spec.name.clone(),
      });
    }

    let resolution =
      Resolution::parse(&spec.resolution).ok_or_else(|| Error::InvalidResolutionFormat {
        source_path: source.clone(),
        resolution: spec.resolution.clone(),
      })?;
    let media = self.probe(source)?;
    if resolution.pixel_count() > media.pixel_count {
      return Err(Error::ResolutionTooLarge {
        source_path: source.clone(),
        requested: spec.resolution.clone(),
        actual: media.label.clone(),
      });
    }

    let timestamp_ms = parse_timestamp(&spec.timestamp).ok_or_else(|| {
      Error::InvalidTimestampFormat {
        source_path: source.clone(),
        timestamp: spec.timestamp.clone(),
      }
    })?;
    if timestamp_ms > media.duration_ms {
      return Err(Error::TimestampOutOfRange {
        source_path: source.clone(),
        timestamp_ms,
        duration_ms: media.duration_ms,
      });
    }

    debug!("{:?} -> {}.jpg validated", source, spec.name);

    Ok(ValidatedShot {
      source: source.clone(),
      name: spec.name.clone(),
      resolution,
      timestamp_ms,
    })
  }

  fn probe(&mut self, path: &Path) -> Result<&ProbedMedia> {
    if !self.probed.contains_key(path) {
      let media = self.prober.probe(path)?;
      self.probed.insert(path.to_path_buf(), media);
    }

    Ok(&self.probed[path])
  }
}

/// Non-negative integer milliseconds, digits only.
fn parse_timestamp(s: &str) -> Option<u64> {
  if regex!(r"^\d+$").is_match(s) {
    s.parse().ok()
  } else {
    None
  }
}

fn is_readable_file(path: &Path) -> bool {
  path.is_file() && File::open(path).is_ok()
}
