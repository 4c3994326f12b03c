use std::io;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::{debug, trace, warn};

use crate::error::{CaptureCrash, Result};
use crate::ffmpeg::{compose_capture_cmd, ToolCommand};
use crate::parse::{parse_ffmpeg_duration, parse_ffmpeg_time, progress_percent};
use crate::util::{last_non_empty_line, StringOrBytes};
use crate::validate::ValidatedShot;

/// Progress of a running capture, as scraped from ffmpeg's status lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureProgress {
  pub elapsed_secs: f64,
  pub duration_secs: Option<f64>,
  pub percent: Option<u8>,
}

/// Writes the screenshot for a validated entry.
pub trait Capturer {
  /// Captures `shot`, returning the path of the written image.
  fn capture(
    &mut self,
    shot: &ValidatedShot,
    on_progress: &mut dyn FnMut(CaptureProgress),
  ) -> Result<PathBuf>;
}

impl<C: Capturer + ?Sized> Capturer for &mut C {
  fn capture(
    &mut self,
    shot: &ValidatedShot,
    on_progress: &mut dyn FnMut(CaptureProgress),
  ) -> Result<PathBuf> {
    (**self).capture(shot, on_progress)
  }
}

/// Accumulates duration and progress across ffmpeg output chunks.
#[derive(Debug, Default)]
pub struct ProgressTracker {
  duration_secs: Option<f64>,
}

impl ProgressTracker {
  /// Feeds one `\r`-delimited chunk of output, returning new progress if the
  /// chunk contained a status line.
  pub fn update(&mut self, chunk: &str) -> Option<CaptureProgress> {
    if self.duration_secs.is_none() {
      self.duration_secs = parse_ffmpeg_duration(chunk);
    }

    let elapsed_secs = parse_ffmpeg_time(chunk)?;

    Some(CaptureProgress {
      elapsed_secs,
      duration_secs: self.duration_secs,
      percent: self
        .duration_secs
        .and_then(|duration| progress_percent(elapsed_secs, duration)),
    })
  }
}

/// [`Capturer`] extracting a single frame with ffmpeg.
#[derive(Debug, Clone)]
pub struct FfmpegCapture {
  tool: ToolCommand,
  output_dir: PathBuf,
}

impl Default for FfmpegCapture {
  fn default() -> Self {
    Self::new(ToolCommand::ffmpeg(), ".")
  }
}

impl FfmpegCapture {
  pub fn new(tool: ToolCommand, output_dir: impl Into<PathBuf>) -> Self {
    Self {
      tool,
      output_dir: output_dir.into(),
    }
  }

  pub fn output_path(&self, shot: &ValidatedShot) -> PathBuf {
    self.output_dir.join(shot.output_file_name())
  }

  fn run(
    &self,
    shot: &ValidatedShot,
    output: &Path,
    on_progress: &mut dyn FnMut(CaptureProgress),
  ) -> io::Result<(ExitStatus, Vec<u8>, Vec<u8>)> {
    let args = compose_capture_cmd(&self.tool, shot.timestamp_ms, &shot.source, output);

    let rt = tokio::runtime::Builder::new_current_thread()
      .enable_io()
      .build()?;

    rt.block_on(async {
      let mut cmd = tokio::process::Command::new(self.tool.program());
      cmd
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

      debug!("capturing with {:?}", cmd);

      let mut pipe = cmd.spawn()?;
      let mut stdout = OutputPipe::new(not_captured(pipe.stdout.take(), "stdout")?);
      let mut stderr = OutputPipe::new(not_captured(pipe.stderr.take(), "stderr")?);

      let mut tracker = ProgressTracker::default();
      let mut on_chunk = |chunk: &[u8]| {
        if let Ok(chunk) = simdutf8::basic::from_utf8(chunk) {
          trace!("ffmpeg: {}", chunk.trim_end());
          if let Some(progress) = tracker.update(chunk) {
            on_progress(progress);
          }
        }
      };

      while !(stdout.closed && stderr.closed) {
        tokio::select! {
          read = stdout.fill(), if !stdout.closed => stdout.finish_read(read, &mut on_chunk)?,
          read = stderr.fill(), if !stderr.closed => stderr.finish_read(read, &mut on_chunk)?,
        }
      }

      let status = pipe.wait().await?;

      Ok::<_, io::Error>((status, stdout.received, stderr.received))
    })
  }
}

fn not_captured<T>(pipe: Option<T>, name: &str) -> io::Result<T> {
  pipe.ok_or_else(|| {
    io::Error::new(
      io::ErrorKind::Other,
      format!("ffmpeg {name} was not captured"),
    )
  })
}

/// One of ffmpeg's output pipes, read in `\r`-delimited chunks.
///
/// Both pipes are drained together, so neither can fill up while the other
/// is being waited on. A read interrupted by `select!` leaves its partial
/// chunk in `chunk`, and the next [`OutputPipe::fill`] continues it.
struct OutputPipe<R> {
  reader: BufReader<R>,
  chunk: Vec<u8>,
  received: Vec<u8>,
  closed: bool,
}

impl<R: AsyncRead + Unpin> OutputPipe<R> {
  fn new(pipe: R) -> Self {
    Self {
      reader: BufReader::new(pipe),
      chunk: Vec::with_capacity(128),
      received: Vec::new(),
      closed: false,
    }
  }

  async fn fill(&mut self) -> io::Result<usize> {
    self.reader.read_until(b'\r', &mut self.chunk).await
  }

  /// Hands a completed chunk to `on_chunk`. Read errors are returned, never
  /// treated as end of output.
  fn finish_read(
    &mut self,
    read: io::Result<usize>,
    on_chunk: &mut impl FnMut(&[u8]),
  ) -> io::Result<()> {
    let read = read.map_err(|e| {
      warn!("reading ffmpeg output failed: {e}");
      io::Error::new(e.kind(), format!("lost ffmpeg output: {e}"))
    })?;

    if !self.chunk.is_empty() {
      on_chunk(&self.chunk);
      self.received.extend_from_slice(&self.chunk);
      self.chunk.clear();
    }
    if read == 0 {
      self.closed = true;
    }

    Ok(())
  }
}

impl Capturer for FfmpegCapture {
  fn capture(
    &mut self,
    shot: &ValidatedShot,
    on_progress: &mut dyn FnMut(CaptureProgress),
  ) -> Result<PathBuf> {
    let output = self.output_path(shot);

    let (status, stdout, stderr) = self.run(shot, &output, on_progress).map_err(|e| {
      Box::new(CaptureCrash {
        name: shot.name.clone(),
        exit_status: None,
        last_line: format!("could not run {:?}: {e}", self.tool.program()),
        stderr: StringOrBytes::from(String::new()),
      })
    })?;

    if !status.success() {
      let stderr = StringOrBytes::from(stderr);
      let stdout = StringOrBytes::from(stdout);
      let last_line = {
        let (stderr_text, stdout_text) = (stderr.to_text(), stdout.to_text());
        last_non_empty_line(&stderr_text)
          .or_else(|| last_non_empty_line(&stdout_text))
          .unwrap_or_default()
          .to_owned()
      };

      return Err(
        Box::new(CaptureCrash {
          name: shot.name.clone(),
          exit_status: Some(status),
          last_line,
          stderr,
        })
        .into(),
      );
    }

    debug!("wrote {:?}", output);

    Ok(output)
  }
}
