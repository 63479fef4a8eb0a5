//! Vitrine showcase binary.
//!
//! Usage: `vitrine [options.toml]`. Without an argument the built-in
//! defaults are used.

use std::path::Path;
use std::process::ExitCode;

use vitrine::{Options, Viewer};

fn main() -> ExitCode {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();

    let options = match std::env::args().nth(1) {
        Some(path) => match Options::load(Path::new(&path)) {
            Ok(opts) => {
                log::info!("loaded options from {path}");
                opts
            }
            Err(e) => {
                log::error!("failed to load {path}: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => Options::default(),
    };

    match Viewer::builder().with_options(options).build().run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
