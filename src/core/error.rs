use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WardenError {
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
    #[error("Corrupt state record: {0}")]
    CorruptState(String),
    #[error("Settings error: {0}")]
    SettingsError(String),
}
