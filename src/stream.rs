// src/stream.rs
//! Batch decoding of newline-delimited GPSU fields

use crate::{
    config::{InputEncoding, OutputFormat},
    error::{GpsuError, Result},
    gpsu::{Gpsu, GPSU_FIELD_LEN},
};
use chrono::{DateTime, SecondsFormat, Utc};
use log::{debug, trace};
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

/// Longest line content accepted, with room to spare over the hex encoding
pub const MAX_LINE_LEN: usize = 4 * GPSU_FIELD_LEN;

/// Outcome of decoding one input line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedField {
    pub line: usize,
    pub raw: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DecodedField {
    pub fn from_result(line: usize, raw: String, result: Result<Gpsu>) -> Self {
        match result {
            Ok(gpsu) => {
                trace!("line {}: {} -> {}", line, raw, gpsu);
                Self {
                    line,
                    raw,
                    time: Some(gpsu.time),
                    error: None,
                }
            }
            Err(e) => {
                debug!("line {}: {:?} rejected: {}", line, raw, e);
                Self {
                    line,
                    raw,
                    time: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Render one output line: the RFC 3339 time (millisecond precision) or
    /// `line N: <error>` as text, or the whole record as a JSON object
    pub fn render(&self, output: OutputFormat) -> Result<String> {
        match output {
            OutputFormat::Json => Ok(serde_json::to_string(self)?),
            OutputFormat::Text => Ok(match (&self.time, &self.error) {
                (Some(time), None) => time.to_rfc3339_opts(SecondsFormat::Millis, true),
                (_, error) => format!("line {}: {}", self.line, error.as_deref().unwrap_or("")),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DecodeSummary {
    pub decoded: usize,
    pub invalid_length: usize,
    pub format_errors: usize,
    /// Lines whose hex encoding could not be read, or that were too long
    pub malformed_input: usize,
}

impl DecodeSummary {
    pub fn failures(&self) -> usize {
        self.invalid_length + self.format_errors + self.malformed_input
    }

    pub fn total(&self) -> usize {
        self.decoded + self.failures()
    }

    pub fn record(&mut self, result: &Result<Gpsu>) {
        match result {
            Ok(_) => self.decoded += 1,
            Err(GpsuError::InvalidLength(_)) => self.invalid_length += 1,
            Err(GpsuError::Format(_)) => self.format_errors += 1,
            Err(_) => self.malformed_input += 1,
        }
    }
}

/// Decode a single field given in the configured input encoding
pub fn decode_field(raw: &[u8], encoding: InputEncoding) -> Result<Gpsu> {
    match encoding {
        InputEncoding::Ascii => Gpsu::try_from(raw),
        InputEncoding::Hex => {
            let bytes = hex::decode(raw)?;
            Gpsu::try_from(bytes.as_slice())
        }
    }
}

/// Decode every non-blank line of `reader`, handing each result to `sink`.
///
/// Only the line terminator is stripped; spaces are field bytes. Read errors
/// abort the batch, decode errors are reported per line and counted.
pub async fn decode_lines<R, F>(
    mut reader: R,
    encoding: InputEncoding,
    mut sink: F,
) -> Result<DecodeSummary>
where
    R: AsyncBufRead + Unpin,
    F: FnMut(DecodedField),
{
    let mut summary = DecodeSummary::default();
    let mut buf = Vec::new();
    let mut line = 0;

    loop {
        buf.clear();
        let limit = (MAX_LINE_LEN + 2) as u64;
        if (&mut reader).take(limit).read_until(b'\n', &mut buf).await? == 0 {
            break; // EOF
        }
        line += 1;

        let truncated = buf.len() as u64 == limit && !buf.ends_with(b"\n");
        if truncated {
            skip_line(&mut reader).await?;
        }

        let raw = strip_line_ending(&buf);
        if raw.is_empty() {
            continue;
        }

        let result = if truncated || raw.len() > MAX_LINE_LEN {
            Err(GpsuError::LineTooLong(MAX_LINE_LEN))
        } else {
            decode_field(raw, encoding)
        };
        summary.record(&result);

        let raw = String::from_utf8_lossy(raw).into_owned();
        let field = DecodedField::from_result(line, raw, result);
        sink(field);
    }

    debug!(
        "decoded {} of {} field(s)",
        summary.decoded,
        summary.total()
    );

    Ok(summary)
}

/// Discard the rest of the current line, including its terminator
async fn skip_line<R>(reader: &mut R) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        let (used, done) = {
            let available = reader.fill_buf().await?;
            if available.is_empty() {
                return Ok(());
            }
            match available.iter().position(|&b| b == b'\n') {
                Some(i) => (i + 1, true),
                None => (available.len(), false),
            }
        };
        reader.consume(used);
        if done {
            return Ok(());
        }
    }
}

fn strip_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
