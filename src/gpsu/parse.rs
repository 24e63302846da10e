// src/gpsu/parse.rs
//! GPSU field decoding
//!
//! A GPSU field is 16 ASCII bytes: `yymmddhhmmss` followed by a four byte
//! sub-second tail. Cameras emit the tail as `.sss` (`160429163209.555`);
//! four bare digits (`2106151230450000`) are read as ten-thousandths.

use crate::error::{GpsuError, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

/// Exact size of a GPSU field in bytes
pub const GPSU_FIELD_LEN: usize = 16;

/// Two-digit years at or above the pivot land in the 1900s, the rest in the 2000s
pub const CENTURY_PIVOT: u32 = 69;

/// Decode a raw GPSU field into a UTC timestamp
pub fn parse_gpsu_field(bytes: &[u8]) -> Result<DateTime<Utc>> {
    if bytes.len() != GPSU_FIELD_LEN {
        return Err(GpsuError::InvalidLength(bytes.len()));
    }

    let value = std::str::from_utf8(bytes)
        .map_err(|e| GpsuError::Format(format!("field is not valid text: {}", e)))?
        .as_bytes();

    let yy = two_digits(value, 0, "year")?;
    let month = two_digits(value, 2, "month")?;
    let day = two_digits(value, 4, "day")?;
    let hour = two_digits(value, 6, "hour")?;
    let minute = two_digits(value, 8, "minute")?;
    let second = two_digits(value, 10, "second")?;
    let nanos = sub_second(&value[12..])?;

    if !(1..=12).contains(&month) {
        return Err(out_of_range("month", month));
    }
    let date = NaiveDate::from_ymd_opt(expand_year(yy), month, day)
        .ok_or_else(|| out_of_range("day", day))?;

    if hour > 23 {
        return Err(out_of_range("hour", hour));
    }
    if minute > 59 {
        return Err(out_of_range("minute", minute));
    }
    if second > 59 {
        return Err(out_of_range("second", second));
    }
    let time = NaiveTime::from_hms_nano_opt(hour, minute, second, nanos)
        .ok_or_else(|| GpsuError::Format(format!("invalid time of day in {:?}", lossy(value))))?;

    Ok(Utc.from_utc_datetime(&date.and_time(time)))
}

/// Map a two-digit year onto 1969..=2068
fn expand_year(yy: u32) -> i32 {
    let year = if yy >= CENTURY_PIVOT { 1900 + yy } else { 2000 + yy };
    year as i32
}

fn two_digits(value: &[u8], pos: usize, name: &str) -> Result<u32> {
    match &value[pos..pos + 2] {
        [tens @ b'0'..=b'9', ones @ b'0'..=b'9'] => {
            Ok(u32::from(*tens - b'0') * 10 + u32::from(*ones - b'0'))
        }
        other => Err(GpsuError::Format(format!(
            "cannot parse {:?} as {}",
            lossy(other),
            name
        ))),
    }
}

/// Returns the tail as nanoseconds
fn sub_second(tail: &[u8]) -> Result<u32> {
    let (digits, scale) = match tail {
        [b'.' | b',', rest @ ..] => (rest, 1_000_000),
        _ => (tail, 100_000),
    };

    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return Err(GpsuError::Format(format!(
            "cannot parse {:?} as fractional second",
            lossy(tail)
        )));
    }

    let value = digits
        .iter()
        .fold(0u32, |acc, d| acc * 10 + u32::from(d - b'0'));
    Ok(value * scale)
}

fn out_of_range(name: &str, value: u32) -> GpsuError {
    GpsuError::Format(format!("{} out of range: {:02}", name, value))
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_bare_digit_tail() {
        let t = parse_gpsu_field(b"2106151230450000").unwrap();

        assert_eq!(t, Utc.with_ymd_and_hms(2021, 6, 15, 12, 30, 45).unwrap());
        assert_eq!(t.nanosecond(), 0);
    }

    #[test]
    fn test_dotted_millisecond_tail() {
        let t = parse_gpsu_field(b"160429163209.555").unwrap();

        assert_eq!(t.year(), 2016);
        assert_eq!(t.month(), 4);
        assert_eq!(t.day(), 29);
        assert_eq!(t.hour(), 16);
        assert_eq!(t.minute(), 32);
        assert_eq!(t.second(), 9);
        assert_eq!(t.timestamp_subsec_millis(), 555);
    }

    #[test]
    fn test_comma_separator_tail() {
        let t = parse_gpsu_field(b"160429163209,250").unwrap();
        assert_eq!(t.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn test_bare_digit_tail_is_ten_thousandths() {
        let t = parse_gpsu_field(b"2106151230451234").unwrap();
        assert_eq!(t.nanosecond(), 123_400_000);
    }

    // The four trailing bytes are validated as a sub-second field rather than
    // ignored, so garbage after the seconds is rejected.
    #[test]
    fn test_non_numeric_tail_rejected() {
        let err = parse_gpsu_field(b"210615123045ABCD").unwrap_err();
        assert!(err.is_format());
        assert!(err.to_string().contains("fractional second"));

        assert!(parse_gpsu_field(b"210615123045.5x5").unwrap_err().is_format());
        assert!(parse_gpsu_field(b"210615123045 555").unwrap_err().is_format());
    }

    #[test]
    fn test_invalid_lengths() {
        let inputs: [&[u8]; 4] = [b"", b"210615123045", b"21061512304500000", b"160429163209.55"];
        for input in inputs {
            match parse_gpsu_field(input) {
                Err(GpsuError::InvalidLength(len)) => assert_eq!(len, input.len()),
                other => panic!("expected InvalidLength for {:?}, got {:?}", input, other),
            }
        }
    }

    #[test]
    fn test_length_checked_before_content() {
        let err = parse_gpsu_field(b"not a gpsu field at all").unwrap_err();
        assert!(err.is_invalid_length());
    }

    #[test]
    fn test_non_digit_in_date() {
        let err = parse_gpsu_field(b"21O615123045.000").unwrap_err();
        assert!(err.is_format());
        assert!(err.to_string().contains("month"));

        assert!(parse_gpsu_field(b"2106151230-5.000").unwrap_err().is_format());
        assert!(parse_gpsu_field(b"+10615123045.000").unwrap_err().is_format());
    }

    #[test]
    fn test_out_of_range_fields() {
        let cases: [(&[u8], &str); 7] = [
            (b"211315123045.000", "month"),
            (b"210015123045.000", "month"),
            (b"210632123045.000", "day"),
            (b"210600123045.000", "day"),
            (b"210615253045.000", "hour"),
            (b"210615126045.000", "minute"),
            (b"210615123060.000", "second"),
        ];

        for (input, field) in cases {
            let err = parse_gpsu_field(input).unwrap_err();
            assert!(err.is_format(), "{:?}", err);
            assert!(err.to_string().contains(field), "{} missing from {}", field, err);
        }
    }

    #[test]
    fn test_leap_day() {
        assert!(parse_gpsu_field(b"240229000000.000").is_ok());
        assert!(parse_gpsu_field(b"230229000000.000").unwrap_err().is_format());
        // 2000 is a leap year
        assert!(parse_gpsu_field(b"000229000000.000").is_ok());
    }

    #[test]
    fn test_century_pivot() {
        assert_eq!(parse_gpsu_field(b"690101000000.000").unwrap().year(), 1969);
        assert_eq!(parse_gpsu_field(b"991231235959.999").unwrap().year(), 1999);
        assert_eq!(parse_gpsu_field(b"000101000000.000").unwrap().year(), 2000);
        assert_eq!(parse_gpsu_field(b"680101000000.000").unwrap().year(), 2068);
    }

    #[test]
    fn test_non_utf8_bytes() {
        let mut raw = *b"160429163209.555";
        raw[3] = 0xff;
        assert!(parse_gpsu_field(&raw).unwrap_err().is_format());
    }

    #[test]
    fn test_multibyte_text_does_not_panic() {
        // 16 bytes, but 'é' spans two of them
        let raw = "1604é916320.555".as_bytes();
        assert_eq!(raw.len(), 16);
        assert!(parse_gpsu_field(raw).unwrap_err().is_format());
    }
}
