//! binaural - terminal binaural beat generator
//!
//! Run with: cargo run --bin binaural
//!
//! Set `RUST_LOG` (e.g. `RUST_LOG=debug`) to write engine logs to
//! `binaural.log`; the terminal itself belongs to the UI.

mod app;
mod presets;
mod ui;

use std::fs::File;

use app::App;
use binaural_dsp::{Engine, EngineConfig};
use color_eyre::eyre::{Result as EyreResult, WrapErr};

/// Used when the default device will not report its preferred rate.
const FALLBACK_SAMPLE_RATE: u32 = 48_000;

const LOG_FILE: &str = "binaural.log";

fn init_logging() -> EyreResult<()> {
    if std::env::var_os("RUST_LOG").is_none() {
        return Ok(());
    }
    let file = File::create(LOG_FILE).wrap_err_with(|| format!("failed to create {LOG_FILE}"))?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    init_logging()?;

    // Match the device's native rate so the backend does not resample.
    let (sample_rate, note) = match Engine::default_output_sample_rate() {
        Ok(rate) => (rate, None),
        Err(err) => {
            log::warn!("{err}; falling back to {FALLBACK_SAMPLE_RATE} Hz");
            (
                FALLBACK_SAMPLE_RATE,
                Some(format!("{err}; using {FALLBACK_SAMPLE_RATE} Hz")),
            )
        }
    };
    let config = EngineConfig::default().with_sample_rate(sample_rate);
    log::info!("starting at {sample_rate} Hz");

    let terminal = ratatui::init();
    let res = App::new(config, note).run(terminal);
    ratatui::restore();
    res
}
