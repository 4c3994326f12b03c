use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

use ansi_term::Colour::Red;
use anyhow::{anyhow, ensure};
use clap::Parser;
use screenshooter_core::capture::FfmpegCapture;
use screenshooter_core::config::load_batch;
use screenshooter_core::ffmpeg::ToolCommand;
use screenshooter_core::probe::Ffprobe;
use screenshooter_core::report::Reporter;
use screenshooter_core::validate::Validator;
use screenshooter_core::{run_batch, Verbosity};
use tracing::{debug, info};

pub mod logging;

use crate::logging::init_logging;

/// Batch screenshot extraction from video files
///
/// Reads a JSON file mapping video paths to screenshot settings, checks every
/// entry against what ffprobe reports, then writes one JPEG per entry with
/// ffmpeg.
#[derive(Parser, Debug)]
#[clap(name = "screenshooter", version)]
pub struct CliOpts {
  /// Batch configuration file
  #[clap(default_value = "config.json")]
  pub config: PathBuf,

  /// Directory to write screenshots to
  #[clap(short, long, default_value = ".")]
  pub output_dir: PathBuf,

  /// Disable printing progress to the terminal
  #[clap(short, long, conflicts_with = "verbose")]
  pub quiet: bool,

  /// Print debug logging to the terminal
  #[clap(long)]
  pub verbose: bool,

  /// Also write logs to this file
  #[clap(short, long)]
  pub log_file: Option<PathBuf>,

  /// FFmpeg command line, for example "nice -n 10 /opt/ffmpeg/bin/ffmpeg"
  #[clap(long, default_value = "ffmpeg")]
  pub ffmpeg: String,

  /// FFprobe command line
  #[clap(long, default_value = "ffprobe")]
  pub ffprobe: String,
}

impl CliOpts {
  pub fn verbosity(&self) -> Verbosity {
    if self.quiet {
      Verbosity::Quiet
    } else if self.verbose {
      Verbosity::Verbose
    } else {
      Verbosity::Normal
    }
  }
}

/// Splits a tool command line with shell quoting rules.
pub fn parse_tool(cmd: &str, what: &str) -> anyhow::Result<ToolCommand> {
  shlex::split(cmd)
    .and_then(ToolCommand::new)
    .ok_or_else(|| anyhow!("Failed to split {} command {:?}", what, cmd))
}

/// Parses the command line and runs the batch, printing any error.
pub fn run() -> ExitCode {
  let args = CliOpts::parse();

  let _guard = match init_logging(args.verbosity(), args.log_file.as_deref()) {
    Ok(guard) => guard,
    Err(e) => {
      print_error(&e);
      return ExitCode::FAILURE;
    }
  };

  match screenshot_batch(&args) {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      print_error(&e);
      ExitCode::FAILURE
    }
  }
}

pub fn screenshot_batch(args: &CliOpts) -> anyhow::Result<()> {
  let ffmpeg = parse_tool(&args.ffmpeg, "ffmpeg")?;
  let ffprobe = parse_tool(&args.ffprobe, "ffprobe")?;
  ensure!(
    args.output_dir.is_dir(),
    "Output directory {:?} does not exist",
    args.output_dir
  );

  let batch = load_batch(&args.config)?;
  info!("{} entries in {:?}", batch.len(), args.config);

  let mut validator = Validator::new(Ffprobe::new(ffprobe));
  let mut capturer = FfmpegCapture::new(ffmpeg, &args.output_dir);
  let mut reporter = Reporter::new(io::stdout().lock(), &args.config);

  run_batch(
    &batch,
    &mut validator,
    &mut capturer,
    &mut reporter,
    args.verbosity(),
  )?;

  Ok(())
}

/// Prints `err` as a single `Error:` line on stderr.
///
/// The raw output of a failed ffprobe/ffmpeg run is only logged, at debug
/// level.
pub fn print_error(err: &anyhow::Error) {
  if let Some(output) = err
    .downcast_ref::<screenshooter_core::Error>()
    .and_then(screenshooter_core::Error::tool_output)
  {
    debug!("tool output:\n{:#?}", output);
  }

  if io::stderr().is_terminal() {
    eprintln!("{} {:#}", Red.bold().paint("Error:"), err);
  } else {
    eprintln!("Error: {err:#}");
  }
}
