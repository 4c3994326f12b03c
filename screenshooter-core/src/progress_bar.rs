use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use once_cell::sync::OnceCell;

use crate::capture::CaptureProgress;

const PROGRESS_CHARS: &str = "█▉▊▋▌▍▎▏  ";

const INDICATIF_PROGRESS_TEMPLATE: &str = if cfg!(windows) {
  // Do not use a spinner on Windows since the default console cannot display
  // the characters used for the spinner
  "{elapsed_precise:.bold} ▕{wide_bar:.blue/white.dim}▏ {percent:>3.bold}% {msg}"
} else {
  "{spinner:.green.bold} {elapsed_precise:.bold} ▕{wide_bar:.blue/white.dim}▏ {percent:>3.bold}% {msg}"
};

static PROGRESS_BAR: OnceCell<ProgressBar> = OnceCell::new();

fn pretty_progress_style() -> ProgressStyle {
  ProgressStyle::default_bar()
    .template(INDICATIF_PROGRESS_TEMPLATE)
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars(PROGRESS_CHARS)
}

/// Initialize progress bar for one capture, resetting it if it was already
/// used for a previous one.
/// Enables steady 100 ms tick
pub fn init_progress_bar(message: String) {
  let pb = PROGRESS_BAR.get_or_init(|| ProgressBar::new(100).with_style(pretty_progress_style()));
  pb.set_draw_target(ProgressDrawTarget::stderr());
  pb.enable_steady_tick(Duration::from_millis(100));
  pb.reset();
  pb.set_position(0);
  pb.set_message(message);
}

pub fn update_progress_bar(progress: CaptureProgress) {
  if let (Some(pb), Some(percent)) = (PROGRESS_BAR.get(), progress.percent) {
    pb.set_position(u64::from(percent));
  }
}

/// Removes the bar so that the next console line starts clean.
pub fn finish_progress_bar() {
  if let Some(pb) = PROGRESS_BAR.get() {
    pb.finish_and_clear();
  }
}
