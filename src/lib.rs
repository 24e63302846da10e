// src/lib.rs
//! GPSU Decode Library
//!
//! Decodes the 16-byte GPS-acquired timestamp (GPSU) field found in camera
//! telemetry into a UTC date-time.

pub mod config;
pub mod error;
pub mod gpsu;
pub mod stream;

// Re-export main types for convenience
pub use error::{GpsuError, Result};
pub use gpsu::{parse_gpsu_field, Gpsu, CENTURY_PIVOT, GPSU_FIELD_LEN};
pub use stream::{decode_field, decode_lines, DecodeSummary, DecodedField};
