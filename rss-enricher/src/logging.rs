//! Tracing subscriber setup.
//!
//! Logs go to stdout, as plain text or JSON (`LOG_FORMAT=json`). When
//! `LOG_DIR` is set they are also appended to `<LOG_DIR>/YYYY-MM-DD.log`,
//! dated by the local day the process started.

use chrono::{Local, NaiveDate};
use std::env;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

use crate::EnricherError;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Path of the log file for `date` inside `dir`.
pub fn log_file_path(dir: &Path, date: NaiveDate) -> PathBuf {
    dir.join(format!("{}.log", date.format("%Y-%m-%d")))
}

/// Create `dir` if needed and open the log file for `date` in append mode.
pub fn open_log_file(dir: &Path, date: NaiveDate) -> Result<File, EnricherError> {
    fs::create_dir_all(dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path(dir, date))?;
    Ok(file)
}

/// Install the global subscriber. `RUST_LOG` selects levels, default `info`.
pub fn init_tracing() -> Result<(), EnricherError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let mut layers: Vec<BoxedLayer> = Vec::new();

    if env::var("LOG_FORMAT").as_deref() == Ok("json") {
        layers.push(fmt::layer().json().boxed());
    } else {
        layers.push(fmt::layer().boxed());
    }

    if let Ok(dir) = env::var("LOG_DIR") {
        let file = open_log_file(Path::new(&dir), Local::now().date_naive())?;
        layers.push(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .boxed(),
        );
    }

    Registry::default()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| EnricherError::config(format!("Failed to install logger: {}", e)))
}
