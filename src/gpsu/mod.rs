// src/gpsu/mod.rs
//! GPSU timestamp holder and field decoding

pub mod data;
pub mod parse;

pub use data::Gpsu;
pub use parse::{parse_gpsu_field, CENTURY_PIVOT, GPSU_FIELD_LEN};
