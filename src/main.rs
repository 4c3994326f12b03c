use std::panic;
use std::process::{self, ExitCode};

use screenshooter_cli::run;

fn main() -> ExitCode {
  let orig_hook = panic::take_hook();
  // Any panic exits with status 1
  panic::set_hook(Box::new(move |panic_info| {
    orig_hook(panic_info);
    process::exit(1);
  }));
  run()
}
