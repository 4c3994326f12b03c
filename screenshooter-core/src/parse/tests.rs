use quickcheck_macros::quickcheck;

use crate::parse::*;

const FFPROBE_H264_AAC: &str = "\
[STREAM]
index=0
codec_name=h264
codec_type=video
width=1920
height=1080
coded_width=1920
coded_height=1088
r_frame_rate=24000/1001
duration_ts=1309307
duration=10.500000
[/STREAM]
[STREAM]
index=1
codec_name=aac
codec_type=audio
sample_rate=48000
duration_ts=588000
duration=12.250000
[/STREAM]
";

#[test]
fn probe_resolution_ignores_coded_dimensions() {
  assert_eq!(
    parse_probe_resolution(FFPROBE_H264_AAC),
    Some((1920 * 1080, "1920x1080".to_owned()))
  );
}

#[test]
fn probe_resolution_last_stream_wins() {
  let output = "width=1280\nheight=720\nwidth=640\nheight=360\n";
  assert_eq!(
    parse_probe_resolution(output),
    Some((640 * 360, "640x360".to_owned()))
  );
}

#[test]
fn probe_resolution_needs_both_keys() {
  assert_eq!(parse_probe_resolution("width=1280\n"), None);
  assert_eq!(parse_probe_resolution("codec_type=audio\n"), None);
}

#[test]
fn probe_resolution_saturates_pixel_count() {
  let output = "width=9999999999999\nheight=9999999999999\n";
  assert_eq!(
    parse_probe_resolution(output),
    Some((u64::MAX, "9999999999999x9999999999999".to_owned()))
  );
}

#[test]
fn probe_duration_takes_longest_stream() {
  assert_eq!(parse_probe_duration(FFPROBE_H264_AAC), Some(12250));
}

#[test]
fn probe_duration_skips_unknown_values() {
  let output = "duration=N/A\nduration_ts=99999\nduration=4.999600\n";
  assert_eq!(parse_probe_duration(output), Some(5000));
  assert_eq!(parse_probe_duration("duration=N/A\n"), None);
}

#[test]
fn probe_duration_handles_crlf() {
  assert_eq!(parse_probe_duration("duration=3.000000\r\n"), Some(3000));
}

#[test]
fn ffmpeg_duration_parsing() {
  let test_cases = [
    (
      "  Duration: 00:00:10.00, start: 0.000000, bitrate: 1205 kb/s",
      Some(10.0),
    ),
    ("  Duration: 01:02:03.50, start: 0.000000", Some(3723.5)),
    ("  Duration: 00:00:05.125, start: 0.000000", Some(5.125)),
    ("  Duration: 100:00:00.00, start: 0.000000", Some(360_000.0)),
    ("  Duration: N/A, start: 0.000000, bitrate: N/A", None),
    ("invalid", None),
  ];

  for (s, ans) in test_cases {
    assert_eq!(parse_ffmpeg_duration(s), ans, "input: {s:?}");
  }
}

#[test]
fn ffmpeg_time_parsing() {
  let test_cases = [
    (
      "frame=    1 fps=0.0 q=3.1 Lsize=N/A time=00:00:05.00 bitrate=N/A speed=12.1x",
      Some(5.0),
    ),
    (
      "frame=    1 fps=0.0 q=3.1 size=N/A time=00:00:05.040 bitrate=N/A",
      Some(5.04),
    ),
    ("size=N/A time=00:00:05.00 bitrate=N/A", None),
    ("frame=    0 fps=0.0 q=0.0 size=N/A time=N/A bitrate=N/A", None),
    ("frame=    0 fps=0.0 q=0.0 size=N/A time=-00:00:00.04", None),
  ];

  for (s, ans) in test_cases {
    assert_eq!(parse_ffmpeg_time(s), ans, "input: {s:?}");
  }
}

#[test]
fn ffmpeg_time_after_header_lines() {
  let chunk = "Stream mapping:\n  Stream #0:0 -> #0:0 (h264 (native) -> mjpeg (native))\n\
    frame=    0 fps=0.0 q=0.0 size=N/A time=00:00:01.00\n\
    frame=    1 fps=0.0 q=3.1 Lsize=N/A time=00:00:02.00 bitrate=N/A";
  assert_eq!(parse_ffmpeg_time(chunk), Some(2.0));
}

#[test]
fn percent_is_rounded() {
  assert_eq!(progress_percent(5.0, 10.0), Some(50));
  assert_eq!(progress_percent(1.0, 3.0), Some(33));
  assert_eq!(progress_percent(2.0, 3.0), Some(67));
  assert_eq!(progress_percent(12.0, 10.0), Some(100));
  assert_eq!(progress_percent(1.0, 0.0), None);
}

#[quickcheck]
fn probe_duration_is_max_of_streams(millis: Vec<u32>) -> bool {
  let output: String = millis
    .iter()
    .map(|ms| format!("[STREAM]\nduration={}.{:03}\n[/STREAM]\n", ms / 1000, ms % 1000))
    .collect();

  parse_probe_duration(&output) == millis.iter().max().map(|&ms| u64::from(ms))
}

#[quickcheck]
fn percent_never_exceeds_100(elapsed: u32, duration: u32) -> bool {
  match progress_percent(f64::from(elapsed), f64::from(duration)) {
    Some(p) => duration > 0 && p <= 100,
    None => duration == 0,
  }
}
