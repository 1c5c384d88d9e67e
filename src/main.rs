//! `favsync` - export, import and roll back navigation favorites.
//!
//! One-shot commands, no daemon: every run reads its inputs, does one linear
//! pass and exits.

use favsync::error::exit_code;
use favsync::run;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(exit_code(&e));
    }
}
