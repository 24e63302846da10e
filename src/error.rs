// src/error.rs
//! Error types for GPSU decoding

use std::fmt;

pub type Result<T> = std::result::Result<T, GpsuError>;

#[derive(Debug)]
pub enum GpsuError {
    /// The field was not exactly 16 bytes; carries the observed length
    InvalidLength(usize),
    /// The field was 16 bytes but did not decode to a valid date-time
    Format(String),
    /// An input line ran past the longest accepted encoding; carries the limit
    LineTooLong(usize),
    Io(std::io::Error),
    Json(serde_json::Error),
    Hex(hex::FromHexError),
    Config(String),
    Other(String),
}

impl GpsuError {
    pub fn is_invalid_length(&self) -> bool {
        matches!(self, GpsuError::InvalidLength(_))
    }

    pub fn is_format(&self) -> bool {
        matches!(self, GpsuError::Format(_))
    }
}

impl fmt::Display for GpsuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpsuError::InvalidLength(len) => {
                write!(f, "Invalid length GPSU field: expected 16 bytes, got {}", len)
            }
            GpsuError::Format(msg) => write!(f, "Format error: {}", msg),
            GpsuError::LineTooLong(limit) => {
                write!(f, "Input line longer than {} bytes", limit)
            }
            GpsuError::Io(e) => write!(f, "IO error: {}", e),
            GpsuError::Json(e) => write!(f, "JSON error: {}", e),
            GpsuError::Hex(e) => write!(f, "Hex error: {}", e),
            GpsuError::Config(msg) => write!(f, "Config error: {}", msg),
            GpsuError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for GpsuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpsuError::Io(e) => Some(e),
            GpsuError::Json(e) => Some(e),
            GpsuError::Hex(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for GpsuError {
    fn from(error: std::io::Error) -> Self {
        GpsuError::Io(error)
    }
}

impl From<serde_json::Error> for GpsuError {
    fn from(error: serde_json::Error) -> Self {
        GpsuError::Json(error)
    }
}

impl From<hex::FromHexError> for GpsuError {
    fn from(error: hex::FromHexError) -> Self {
        GpsuError::Hex(error)
    }
}

impl From<anyhow::Error> for GpsuError {
    fn from(error: anyhow::Error) -> Self {
        GpsuError::Other(error.to_string())
    }
}
