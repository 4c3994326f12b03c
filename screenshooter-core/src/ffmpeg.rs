use std::ffi::OsString;
use std::path::Path;

use crate::into_vec;

/// Program and leading arguments used to invoke an external tool.
///
/// The first element is the program; any further elements are passed before
/// the arguments composed here (e.g. `["nice", "-n", "10", "ffmpeg"]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand(Vec<String>);

impl ToolCommand {
  /// Returns `None` if `parts` is empty.
  pub fn new(parts: Vec<String>) -> Option<Self> {
    if parts.is_empty() {
      None
    } else {
      Some(Self(parts))
    }
  }

  pub fn ffmpeg() -> Self {
    Self(into_vec!["ffmpeg"])
  }

  pub fn ffprobe() -> Self {
    Self(into_vec!["ffprobe"])
  }

  pub fn program(&self) -> &str {
    &self.0[0]
  }

  pub fn leading_args(&self) -> &[String] {
    &self.0[1..]
  }
}

/// Arguments (after the program) for listing every stream of `source`.
pub fn compose_probe_cmd(tool: &ToolCommand, source: &Path) -> Vec<OsString> {
  let mut p: Vec<OsString> = tool.leading_args().iter().map(Into::into).collect();

  p.extend(["-hide_banner", "-show_streams"].map(OsString::from));
  p.push(source.as_os_str().to_owned());

  p
}

/// Arguments (after the program) for writing the frame at `timestamp_ms` of
/// `source` to `output` as a JPEG, overwriting `output` if it exists.
pub fn compose_capture_cmd(
  tool: &ToolCommand,
  timestamp_ms: u64,
  source: &Path,
  output: &Path,
) -> Vec<OsString> {
  let mut p: Vec<OsString> = tool.leading_args().iter().map(Into::into).collect();

  let input: Vec<OsString> = into_vec![
    "-hide_banner",
    "-nostdin",
    "-ss",
    seek_seconds(timestamp_ms),
    "-i",
    source.as_os_str(),
  ];
  p.extend(input);
  p.extend(["-y", "-f", "image2", "-vcodec", "mjpeg", "-vframes", "1"].map(OsString::from));
  p.push(output.as_os_str().to_owned());

  p
}

/// Formats a millisecond offset as the seconds value ffmpeg's `-ss` takes.
pub fn seek_seconds(timestamp_ms: u64) -> String {
  format!("{}.{:03}", timestamp_ms / 1000, timestamp_ms % 1000)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn strings(args: Vec<OsString>) -> Vec<String> {
    args
      .into_iter()
      .map(|a| a.to_string_lossy().into_owned())
      .collect()
  }

  #[test]
  fn seek_keeps_millisecond_precision() {
    assert_eq!(seek_seconds(0), "0.000");
    assert_eq!(seek_seconds(2000), "2.000");
    assert_eq!(seek_seconds(61_005), "61.005");
  }

  #[test]
  fn capture_command_layout() {
    let cmd = compose_capture_cmd(
      &ToolCommand::ffmpeg(),
      2500,
      Path::new("in put.mp4"),
      Path::new("out/shot1.jpg"),
    );

    assert_eq!(
      strings(cmd),
      [
        "-hide_banner",
        "-nostdin",
        "-ss",
        "2.500",
        "-i",
        "in put.mp4",
        "-y",
        "-f",
        "image2",
        "-vcodec",
        "mjpeg",
        "-vframes",
        "1",
        "out/shot1.jpg"
      ]
    );
  }

  #[test]
  fn leading_args_come_first() {
    let tool = ToolCommand::new(into_vec!["nice", "-n", "10", "ffprobe"]).unwrap();
    assert_eq!(tool.program(), "nice");
    assert_eq!(
      strings(compose_probe_cmd(&tool, Path::new("a.mp4"))),
      ["-n", "10", "ffprobe", "-hide_banner", "-show_streams", "a.mp4"]
    );
  }

  #[test]
  fn empty_tool_command_is_rejected() {
    assert_eq!(ToolCommand::new(Vec::new()), None);
  }
}
