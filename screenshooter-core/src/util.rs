use std::fmt::Debug;

#[macro_export]
macro_rules! regex {
  ($re:literal $(,)?) => {{
    static RE: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    RE.get_or_init(|| regex::Regex::new($re).unwrap())
  }};
}

#[macro_export]
macro_rules! into_vec {
  ($($x:expr),* $(,)?) => {
    vec![
      $(
        $x.into(),
      )*
    ]
  };
}

/// Output captured from a child process, kept as raw bytes when it
/// is not valid UTF-8.
#[derive(Clone, PartialEq, Eq)]
pub enum StringOrBytes {
  String(String),
  Bytes(Vec<u8>),
}

impl Debug for StringOrBytes {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::String(s) => {
        if f.alternate() {
          f.write_str(&textwrap::indent(s, /* 8 spaces */ "        "))?;
        } else {
          f.write_str(s)?;
        }
      }
      Self::Bytes(b) => write!(f, "raw bytes: {b:?}")?,
    }

    Ok(())
  }
}

impl From<Vec<u8>> for StringOrBytes {
  fn from(bytes: Vec<u8>) -> Self {
    match simdutf8::basic::from_utf8(&bytes) {
      Ok(s) => Self::String(s.to_owned()),
      Err(_) => Self::Bytes(bytes),
    }
  }
}

impl From<String> for StringOrBytes {
  fn from(s: String) -> Self {
    Self::String(s)
  }
}

impl StringOrBytes {
  pub fn as_bytes(&self) -> &[u8] {
    match self {
      Self::String(s) => s.as_bytes(),
      Self::Bytes(b) => b,
    }
  }

  /// Lossy text view, used for scanning tool output with regexes.
  pub fn to_text(&self) -> std::borrow::Cow<'_, str> {
    match self {
      Self::String(s) => std::borrow::Cow::Borrowed(s),
      Self::Bytes(b) => String::from_utf8_lossy(b),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.as_bytes().is_empty()
  }
}

/// Returns the last line of `text` that is not blank, trimmed. Carriage
/// returns end a line, as in ffmpeg's progress output.
pub fn last_non_empty_line(text: &str) -> Option<&str> {
  text
    .split(|c| c == '\r' || c == '\n')
    .map(str::trim)
    .filter(|line| !line.is_empty())
    .last()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn invalid_utf8_is_kept_as_bytes() {
    let out = StringOrBytes::from(vec![0x66, 0xff, 0x6f]);
    assert_eq!(out, StringOrBytes::Bytes(vec![0x66, 0xff, 0x6f]));
    assert_eq!(out.to_text(), "f\u{fffd}o");
  }

  #[test]
  fn alternate_debug_indents_text() {
    let out = StringOrBytes::from("a\nb".to_owned());
    assert_eq!(format!("{out:#?}"), "        a\n        b");
  }

  #[test]
  fn last_line_skips_trailing_blank_lines() {
    assert_eq!(
      last_non_empty_line("first\nsecond  \n\n  \n"),
      Some("second")
    );
    assert_eq!(
      last_non_empty_line("frame=1 time=00:00:01.00\rerror: bad input\r\n"),
      Some("error: bad input")
    );
    assert_eq!(last_non_empty_line(" \n"), None);
  }
}
