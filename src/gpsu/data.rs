// src/gpsu/data.rs
//! GPSU value object

use super::parse::parse_gpsu_field;
use crate::error::GpsuError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// GPS-acquired timestamp
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Gpsu {
    pub time: DateTime<Utc>,
}

impl Gpsu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a raw 16-byte field into this holder.
    ///
    /// On error the current value is left untouched.
    pub fn parse(&mut self, bytes: &[u8]) -> Result<(), GpsuError> {
        self.time = parse_gpsu_field(bytes)?;
        Ok(())
    }

    /// Sub-second part of the timestamp in milliseconds
    pub fn milliseconds(&self) -> u32 {
        self.time.timestamp_subsec_millis()
    }

    /// Format the timestamp for display
    pub fn format_time(&self) -> String {
        self.time.format("%Y-%m-%d %H:%M:%S%.3f UTC").to_string()
    }
}

impl TryFrom<&[u8]> for Gpsu {
    type Error = GpsuError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let mut gpsu = Gpsu::new();
        gpsu.parse(bytes)?;
        Ok(gpsu)
    }
}

impl FromStr for Gpsu {
    type Err = GpsuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gpsu::try_from(s.as_bytes())
    }
}

impl From<Gpsu> for DateTime<Utc> {
    fn from(gpsu: Gpsu) -> Self {
        gpsu.time
    }
}

impl fmt::Display for Gpsu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_time())
    }
}
