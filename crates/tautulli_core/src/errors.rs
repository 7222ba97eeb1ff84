use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TautulliError {
    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("{0}\nBase URL invalid, please try again")]
    Connection(#[source] reqwest::Error),
    #[error("Response is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("{0}\nAPI key invalid, please try again")]
    InvalidCredential(String),
    #[error("{0}\nIndex error, please check your configuration and try again")]
    Shape(String),
    #[error("Failed to write file: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("Encoding conversion failed: {0}")]
    Encoding(String),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Core(#[from] TautulliError),
    #[error("{0}\nInvalid user, please check your configuration and try again")]
    InvalidUser(String),
    #[error("Exporting movies to {} has been halted.", csv_path.display())]
    Interrupted { csv_path: PathBuf },
    #[error("Failed to start async runtime: {0}")]
    Runtime(String),
}

impl ExportError {
    pub fn is_interrupted(&self) -> bool {
        matches!(self, ExportError::Interrupted { .. })
    }
}
