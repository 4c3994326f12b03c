//! Functions for scraping values out of ffprobe and ffmpeg text output.
//!
//! None of this parses the tools' structured formats; it pattern-matches the
//! same `key=value` and progress lines a person would read. Anything
//! unrecognized is skipped.

use crate::regex;

/// Pixel count and `WxH` label from `ffprobe -show_streams` output.
///
/// The last `width=` and the last `height=` seen win, so with several video
/// streams the values may come from the last one reported. Keys are matched
/// at the start of a line, which keeps `coded_width=`/`coded_height=` out.
/// The pixel count saturates at `u64::MAX`.
pub fn parse_probe_resolution(output: &str) -> Option<(u64, String)> {
  let width = last_u64(output, regex!(r"(?m)^width=(\d+)"))?;
  let height = last_u64(output, regex!(r"(?m)^height=(\d+)"))?;

  Some((width.saturating_mul(height), format!("{width}x{height}")))
}

/// Longest stream duration in whole milliseconds from `ffprobe -show_streams`
/// output.
///
/// Audio and video streams of one container often disagree by a few
/// milliseconds; the longest one is taken as the media length. Streams
/// reporting `duration=N/A` are skipped.
pub fn parse_probe_duration(output: &str) -> Option<u64> {
  regex!(r"(?m)^duration=(\d+(?:\.\d+)?)")
    .captures_iter(output)
    .filter_map(|caps| caps[1].parse::<f64>().ok())
    .fold(None, |max: Option<f64>, d| Some(max.map_or(d, |m| m.max(d))))
    .map(|secs| (secs * 1000.0).round() as u64)
}

/// Media duration in seconds from the `Duration: HH:MM:SS.ff` line ffmpeg
/// prints for each input.
pub fn parse_ffmpeg_duration(s: &str) -> Option<f64> {
  let caps = regex!(r"Duration:\s*(\d+):(\d{2}):(\d{2}(?:\.\d+)?)").captures(s)?;
  hms_to_secs(&caps[1], &caps[2], &caps[3])
}

/// Elapsed output time in seconds from an ffmpeg progress line such as
///
/// ```text
/// frame=    1 fps=0.0 q=3.1 Lsize=N/A time=00:00:02.04 bitrate=N/A speed=12.1x
/// ```
///
/// The last progress line in `s` wins, since ffmpeg may flush several at once.
pub fn parse_ffmpeg_time(s: &str) -> Option<f64> {
  let caps = regex!(r"(?m)^frame=.*?time=(\d+):(\d{2}):(\d{2}(?:\.\d+)?)")
    .captures_iter(s)
    .last()?;
  hms_to_secs(&caps[1], &caps[2], &caps[3])
}

/// Completion percentage of `elapsed` out of `duration`, rounded and capped
/// at 100. `None` when the duration is unknown or zero.
pub fn progress_percent(elapsed: f64, duration: f64) -> Option<u8> {
  if duration <= 0.0 || !duration.is_finite() {
    return None;
  }

  Some(((elapsed / duration) * 100.0).round().clamp(0.0, 100.0) as u8)
}

fn hms_to_secs(h: &str, m: &str, s: &str) -> Option<f64> {
  let h: f64 = h.parse().ok()?;
  let m: f64 = m.parse().ok()?;
  let s: f64 = s.parse().ok()?;

  Some(h * 3600.0 + m * 60.0 + s)
}

fn last_u64(s: &str, re: &regex::Regex) -> Option<u64> {
  re.captures_iter(s)
    .filter_map(|caps| caps[1].parse().ok())
    .last()
}

#[cfg(test)]
mod tests;
