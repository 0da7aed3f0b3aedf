use chrono::{Local, SecondsFormat};
use env_logger::{Builder, Env, Target, WriteStyle};
use photosift_lib::{PhotosiftError, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Sends every log record to `log_file`, one line each, truncating it first.
///
/// `RUST_LOG` takes precedence over the verbosity flag.
pub fn init_logging(log_file: &Path, verbose: bool) -> Result<()> {
    if let Some(parent) = log_file.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(log_file)?;
    let default_level = if verbose { "debug" } else { "info" };

    Builder::from_env(Env::default().default_filter_or(default_level))
        .target(Target::Pipe(Box::new(file)))
        .write_style(WriteStyle::Never)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} {} {}",
                Local::now().to_rfc3339_opts(SecondsFormat::Millis, false),
                record.level(),
                record.args()
            )
        })
        .try_init()
        .map_err(|e| PhotosiftError::Config(format!("Failed to initialize logging: {}", e)))
}
