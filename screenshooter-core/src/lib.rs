#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

use std::io::Write;
use std::path::PathBuf;

use tracing::info;

use crate::capture::Capturer;
use crate::config::Batch;
use crate::probe::Prober;
use crate::progress_bar::{finish_progress_bar, init_progress_bar, update_progress_bar};
use crate::report::Reporter;
use crate::validate::Validator;

pub mod capture;
pub mod config;
pub mod error;
pub mod ffmpeg;
pub mod parse;
pub mod probe;
pub mod progress_bar;
pub mod report;
pub mod util;
pub mod validate;

pub use crate::error::{CaptureCrash, Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
  Verbose,
  #[default]
  Normal,
  Quiet,
}

/// Validates the whole `batch`, then captures every entry in order.
///
/// Nothing is captured unless every entry validates. The first error of
/// either phase stops the run and is returned. Returns the written image
/// paths in batch order.
pub fn run_batch<P, C, W>(
  batch: &Batch,
  validator: &mut Validator<P>,
  capturer: &mut C,
  reporter: &mut Reporter<W>,
  verbosity: Verbosity,
) -> Result<Vec<PathBuf>>
where
  P: Prober,
  C: Capturer,
  W: Write,
{
  let shots = validator.validate(batch)?;
  info!("validated {} entries", shots.len());

  if shots.is_empty() {
    reporter.nothing_to_do()?;
    return Ok(Vec::new());
  }

  reporter.started()?;

  let mut written = Vec::with_capacity(shots.len());
  for (ordinal, shot) in (1..).zip(&shots) {
    let file_name = shot.output_file_name();

    if verbosity != Verbosity::Quiet {
      init_progress_bar(file_name.clone());
    }
    let result = capturer.capture(shot, &mut update_progress_bar);
    finish_progress_bar();

    written.push(result?);
    reporter.captured(ordinal, &file_name)?;
  }

  reporter.finished()?;
  info!("captured {} screenshots", written.len());

  Ok(written)
}
