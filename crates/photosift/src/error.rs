use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PhotosiftError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config file parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Metadata error for {}: {message}", path.display())]
    Metadata { path: PathBuf, message: String },

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error("User input error: {0}")]
    UserInput(String),
}

impl From<dialoguer::Error> for PhotosiftError {
    fn from(err: dialoguer::Error) -> Self {
        PhotosiftError::UserInput(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PhotosiftError>;

/// Whether a failed filesystem step ends the pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Fatal,
    Recoverable,
}

/// The filesystem step that failed while applying an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Remove,
    Rename,
    Copy,
    CreateDir,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Remove => "remove",
            Step::Rename => "rename",
            Step::Copy => "copy",
            Step::CreateDir => "create directory",
        };
        f.write_str(name)
    }
}

/// A failed filesystem mutation, tagged with whether the pass may continue.
#[derive(Error, Debug)]
#[error("{step} failed for {}: {source}", path.display())]
pub struct ExecutionError {
    pub step: Step,
    pub path: PathBuf,
    pub severity: Severity,
    #[source]
    pub source: std::io::Error,
}

impl ExecutionError {
    pub fn fatal(step: Step, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self {
            step,
            path: path.into(),
            severity: Severity::Fatal,
            source,
        }
    }

    pub fn recoverable(step: Step, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self {
            step,
            path: path.into(),
            severity: Severity::Recoverable,
            source,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity == Severity::Fatal
    }
}
