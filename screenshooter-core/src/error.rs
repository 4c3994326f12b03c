//! Errors that abort a screenshot batch.
//!
//! Every variant is terminal: the batch stops at the first one raised.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

use crate::util::StringOrBytes;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
  /// The configuration file is missing or cannot be read.
  #[error("Cannot open configuration file: {path:?}")]
  ConfigUnavailable {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
  /// The configuration file is not a well-formed JSON object.
  #[error("Invalid JSON syntax in {path:?}: {reason}")]
  InvalidConfigSyntax { path: PathBuf, reason: String },
  /// A settings section has the wrong shape (not an object, or a field of an unusable type).
  #[error("{source_path:?} configuration section is invalid: {reason}")]
  InvalidEntry { source_path: String, reason: String },
  /// A settings section lacks one or more of `name`, `resolution` and `timestamp`.
  #[error(
    "{source_path:?} configuration section does not contain all of the required params - name, resolution and timestamp (missing: {})",
    .missing.join(", ")
  )]
  MissingRequiredFields {
    source_path: String,
    missing: Vec<&'static str>,
  },
  #[error("duplicate entry of screenshot name {name:?}")]
  DuplicateScreenshotName { name: String },
  #[error("wrong resolution format {resolution:?} for {source_path:?}, expected WIDTHxHEIGHT")]
  InvalidResolutionFormat {
    source_path: PathBuf,
    resolution: String,
  },
  #[error("{requested} is bigger than actual resolution of {source_path:?} - {actual}")]
  ResolutionTooLarge {
    source_path: PathBuf,
    requested: String,
    actual: String,
  },
  #[error(
    "incorrect timestamp {timestamp:?} for {source_path:?}. Timestamp must be an integer in milliseconds"
  )]
  InvalidTimestampFormat {
    source_path: PathBuf,
    timestamp: String,
  },
  #[error(
    "timestamp {timestamp_ms}ms is bigger than actual duration ({duration_ms}ms) of {source_path:?}"
  )]
  TimestampOutOfRange {
    source_path: PathBuf,
    timestamp_ms: u64,
    duration_ms: u64,
  },
  #[error("{path:?} does not exist or is not readable")]
  SourceFileUnavailable { path: PathBuf },
  /// ffprobe could not be started, exited abnormally, or reported no usable streams.
  #[error("failed to probe {path:?}: {reason}")]
  ProbeFailed {
    path: PathBuf,
    reason: String,
    output: StringOrBytes,
  },
  /// ffmpeg could not be started or exited with a non-zero status.
  #[error(transparent)]
  CaptureFailed(#[from] Box<CaptureCrash>),
  /// Progress lines could not be written to the console.
  #[error("failed to write report: {0}")]
  Report(#[from] io::Error),
}

/// Diagnostic context for a failed frame capture.
#[derive(Error, Debug)]
pub struct CaptureCrash {
  pub name: String,
  pub exit_status: Option<ExitStatus>,
  pub last_line: String,
  pub stderr: StringOrBytes,
}

impl std::fmt::Display for CaptureCrash {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self.exit_status {
      Some(status) => write!(
        f,
        "capturing {:?} failed ({}): {}",
        self.name, status, self.last_line
      ),
      None => write!(f, "capturing {:?} failed: {}", self.name, self.last_line),
    }
  }
}

impl Error {
  /// Raw output of the external tool behind a failed probe or capture.
  pub fn tool_output(&self) -> Option<&StringOrBytes> {
    let output = match self {
      Self::ProbeFailed { output, .. } => output,
      Self::CaptureFailed(crash) => &crash.stderr,
      _ => return None,
    };

    (!output.is_empty()).then_some(output)
  }
}
