use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Console lines describing a batch run.
pub struct Reporter<W> {
  out: W,
  config: PathBuf,
}

impl<W: Write> Reporter<W> {
  /// `config` is only named in the nothing-to-do message.
  pub fn new(out: W, config: impl AsRef<Path>) -> Self {
    Self {
      out,
      config: config.as_ref().to_path_buf(),
    }
  }

  pub fn started(&mut self) -> io::Result<()> {
    writeln!(self.out, "[+] Starting screenshot capturing...")
  }

  pub fn captured(&mut self, ordinal: usize, file_name: &str) -> io::Result<()> {
    writeln!(self.out, "{ordinal}) {file_name}")
  }

  pub fn finished(&mut self) -> io::Result<()> {
    writeln!(self.out, "[+] Done!")?;
    self.out.flush()
  }

  pub fn nothing_to_do(&mut self) -> io::Result<()> {
    writeln!(
      self.out,
      "Nothing to convert! Check your '{}' file please",
      self.config.display()
    )
  }

  pub fn into_inner(self) -> W {
    self.out
  }
}
