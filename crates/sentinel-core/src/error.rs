//! Error types for the sentinel exit engine.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Position error: {0}")]
    Position(String),
}

pub type Result<T> = std::result::Result<T, Error>;
