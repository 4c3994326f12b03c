//! Media facts needed for validation, obtained from ffprobe.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::ffmpeg::{compose_probe_cmd, ToolCommand};
use crate::parse::{parse_probe_duration, parse_probe_resolution};
use crate::util::{last_non_empty_line, StringOrBytes};

/// What a source file reports about itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbedMedia {
  /// Width times height of the reported video stream.
  pub pixel_count: u64,
  /// `WIDTHxHEIGHT`
  pub label: String,
  /// Longest stream duration, in milliseconds.
  pub duration_ms: u64,
}

/// Source of [`ProbedMedia`] for a file.
pub trait Prober {
  fn probe(&mut self, path: &Path) -> Result<ProbedMedia>;
}

impl<P: Prober + ?Sized> Prober for &mut P {
  fn probe(&mut self, path: &Path) -> Result<ProbedMedia> {
    (**self).probe(path)
  }
}

/// [`Prober`] running `ffprobe -show_streams` and scraping its output.
#[derive(Debug, Clone)]
pub struct Ffprobe {
  tool: ToolCommand,
}

impl Default for Ffprobe {
  fn default() -> Self {
    Self::new(ToolCommand::ffprobe())
  }
}

impl Ffprobe {
  pub fn new(tool: ToolCommand) -> Self {
    Self { tool }
  }

  /// Pixel count and `WxH` label of `path`.
  pub fn resolution(&self, path: &Path) -> Result<(u64, String)> {
    let output = self.show_streams(path)?;
    parse_probe_resolution(&output.to_text())
      .ok_or_else(|| probe_failed(path, "no width/height reported", output))
  }

  /// Longest stream duration of `path` in milliseconds.
  pub fn duration(&self, path: &Path) -> Result<u64> {
    let output = self.show_streams(path)?;
    parse_probe_duration(&output.to_text())
      .ok_or_else(|| probe_failed(path, "no stream duration reported", output))
  }

  /// Runs ffprobe once, returning stdout followed by stderr.
  fn show_streams(&self, path: &Path) -> Result<StringOrBytes> {
    let mut cmd = Command::new(self.tool.program());
    cmd.args(compose_probe_cmd(&self.tool, path));
    cmd.stdin(Stdio::null());

    debug!("probing with {:?}", cmd);

    let out = cmd.output().map_err(|e| Error::ProbeFailed {
      path: path.to_path_buf(),
      reason: format!("could not run {:?}: {e}", self.tool.program()),
      output: StringOrBytes::from(String::new()),
    })?;

    let mut merged = out.stdout;
    merged.extend_from_slice(&out.stderr);
    let merged = StringOrBytes::from(merged);

    if !out.status.success() {
      let reason = match last_non_empty_line(&merged.to_text()) {
        Some(line) => format!("ffprobe exited with {}: {line}", out.status),
        None => format!("ffprobe exited with {}", out.status),
      };
      return Err(probe_failed(path, &reason, merged));
    }

    Ok(merged)
  }
}

impl Prober for Ffprobe {
  fn probe(&mut self, path: &Path) -> Result<ProbedMedia> {
    let output = self.show_streams(path)?;
    let text = output.to_text();

    let Some((pixel_count, label)) = parse_probe_resolution(&text) else {
      return Err(probe_failed(path, "no width/height reported", output.clone()));
    };
    let Some(duration_ms) = parse_probe_duration(&text) else {
      return Err(probe_failed(path, "no stream duration reported", output.clone()));
    };

    if duration_ms == 0 {
      warn!("{:?} reports a duration of 0ms", path);
    }

    let media = ProbedMedia {
      pixel_count,
      label,
      duration_ms,
    };
    debug!("probed {:?}: {:?}", path, media);

    Ok(media)
  }
}

fn probe_failed(path: &Path, reason: &str, output: StringOrBytes) -> Error {
  Error::ProbeFailed {
    path: PathBuf::from(path),
    reason: reason.to_owned(),
    output,
  }
}
