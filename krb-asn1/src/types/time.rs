//! UTCTime and GeneralizedTime content octets
//!
//! Both types are ASCII. Encoders always emit the canonical DER form
//! (seconds present, `Z` suffix); decoders accept the relaxed BER forms
//! (missing seconds, `±HHMM` offsets) unless DER is in force.
//!
//! UTCTime carries a two-digit year: `YY >= 50` is 19YY, otherwise 20YY.

use crate::policy::EncodingRules;
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc};

/// `YYMMDDHHMMSSZ`
pub fn encode_utc_time(time: &DateTime<Utc>) -> Result<Vec<u8>, String> {
    let year = time.year();
    if !(1950..=2049).contains(&year) {
        return Err(format!("year {} cannot be represented as UTCTime", year));
    }
    if time.nanosecond() != 0 {
        return Err("UTCTime cannot carry fractional seconds".to_string());
    }
    Ok(format!(
        "{:02}{:02}{:02}{:02}{:02}{:02}Z",
        year % 100,
        time.month(),
        time.day(),
        time.hour(),
        time.minute(),
        time.second()
    )
    .into_bytes())
}

pub fn decode_utc_time(content: &[u8], rules: EncodingRules) -> Result<DateTime<Utc>, String> {
    let mut reader = TimeReader::new(content)?;

    let yy = reader.digits(2)?;
    let year = if yy >= 50 { 1900 + yy } else { 2000 + yy };
    let month = reader.digits(2)?;
    let day = reader.digits(2)?;
    let hour = reader.digits(2)?;
    let minute = reader.digits(2)?;
    let second = if reader.next_is_digit() {
        reader.digits(2)?
    } else if rules == EncodingRules::Der {
        return Err("UTCTime without seconds is not allowed under DER".to_string());
    } else {
        0
    };

    let offset = reader.zone(rules)?;
    reader.finish()?;

    assemble(year as i32, month, day, hour, minute, second, 0, offset)
}

/// `YYYYMMDDHHMMSS[.fff]Z`, fraction without trailing zeros
pub fn encode_generalized_time(time: &DateTime<Utc>) -> Result<Vec<u8>, String> {
    let year = time.year();
    if !(0..=9999).contains(&year) {
        return Err(format!("year {} cannot be represented as GeneralizedTime", year));
    }
    let mut text = format!(
        "{:04}{:02}{:02}{:02}{:02}{:02}",
        year,
        time.month(),
        time.day(),
        time.hour(),
        time.minute(),
        time.second()
    );
    let nanos = time.nanosecond();
    if nanos > 999_999_999 {
        return Err("leap second cannot be represented as GeneralizedTime".to_string());
    }
    if nanos > 0 {
        let fraction = format!("{:09}", nanos);
        text.push('.');
        text.push_str(fraction.trim_end_matches('0'));
    }
    text.push('Z');
    Ok(text.into_bytes())
}

pub fn decode_generalized_time(content: &[u8], rules: EncodingRules) -> Result<DateTime<Utc>, String> {
    let der = rules == EncodingRules::Der;
    let mut reader = TimeReader::new(content)?;

    let year = reader.digits(4)?;
    let month = reader.digits(2)?;
    let day = reader.digits(2)?;
    let hour = reader.digits(2)?;

    let (minute, second) = if reader.next_is_digit() {
        let minute = reader.digits(2)?;
        let second = if reader.next_is_digit() { Some(reader.digits(2)?) } else { None };
        (minute, second)
    } else {
        (0, None)
    };
    if der && second.is_none() {
        return Err("GeneralizedTime without seconds is not allowed under DER".to_string());
    }

    let mut nanos = 0;
    if let Some(separator) = reader.take_if(|b| b == b'.' || b == b',') {
        if second.is_none() {
            return Err("fractional part requires seconds".to_string());
        }
        if der && separator == b',' {
            return Err("DER requires '.' as the decimal separator".to_string());
        }
        let fraction = reader.digit_run();
        if fraction.is_empty() {
            return Err("empty fractional seconds".to_string());
        }
        if der && fraction.ends_with('0') {
            return Err("fractional seconds have trailing zeros".to_string());
        }
        let mut padded: String = fraction.chars().take(9).collect();
        while padded.len() < 9 {
            padded.push('0');
        }
        nanos = padded
            .parse::<u32>()
            .map_err(|_| "invalid fractional seconds".to_string())?;
    }

    let offset = reader.zone(rules)?;
    reader.finish()?;

    assemble(year as i32, month, day, hour, minute, second.unwrap_or(0), nanos, offset)
}

#[allow(clippy::too_many_arguments)]
fn assemble(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
    nanos: u32,
    offset_minutes: i64,
) -> Result<DateTime<Utc>, String> {
    let date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| format!("invalid date {:04}-{:02}-{:02}", year, month, day))?;
    let time = NaiveTime::from_hms_nano_opt(hour, minute, second, nanos)
        .ok_or_else(|| format!("invalid time {:02}:{:02}:{:02}", hour, minute, second))?;
    let local = Utc.from_utc_datetime(&NaiveDateTime::new(date, time));
    Ok(local - Duration::minutes(offset_minutes))
}

/// Cursor over the ASCII content of a time value
struct TimeReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> TimeReader<'a> {
    fn new(content: &'a [u8]) -> Result<Self, String> {
        if !content.is_ascii() {
            return Err("time value is not ASCII".to_string());
        }
        Ok(Self {
            bytes: content,
            pos: 0,
        })
    }

    fn next_is_digit(&self) -> bool {
        self.bytes.get(self.pos).is_some_and(|b| b.is_ascii_digit())
    }

    fn digits(&mut self, count: usize) -> Result<u32, String> {
        let end = self.pos + count;
        let Some(slice) = self.bytes.get(self.pos..end) else {
            return Err(format!("time value truncated at position {}", self.pos));
        };
        if !slice.iter().all(u8::is_ascii_digit) {
            return Err(format!("expected {} digits at position {}", count, self.pos));
        }
        self.pos = end;
        Ok(slice.iter().fold(0, |acc, b| acc * 10 + (b - b'0') as u32))
    }

    fn digit_run(&mut self) -> &'a str {
        let start = self.pos;
        while self.next_is_digit() {
            self.pos += 1;
        }
        // ASCII was checked in new()
        std::str::from_utf8(&self.bytes[start..self.pos]).unwrap_or_default()
    }

    fn take_if(&mut self, pred: impl Fn(u8) -> bool) -> Option<u8> {
        let byte = *self.bytes.get(self.pos)?;
        if pred(byte) {
            self.pos += 1;
            Some(byte)
        } else {
            None
        }
    }

    /// `Z` or, under BER, `+HHMM` / `-HHMM`; returns the offset in minutes
    fn zone(&mut self, rules: EncodingRules) -> Result<i64, String> {
        match self.take_if(|b| matches!(b, b'Z' | b'+' | b'-')) {
            Some(b'Z') => Ok(0),
            Some(sign) => {
                if rules == EncodingRules::Der {
                    return Err("DER time values must end in 'Z'".to_string());
                }
                let hours = self.digits(2)?;
                let minutes = self.digits(2)?;
                if hours > 23 || minutes > 59 {
                    return Err(format!("invalid zone offset {:02}{:02}", hours, minutes));
                }
                let total = (hours * 60 + minutes) as i64;
                Ok(if sign == b'-' { -total } else { total })
            }
            None => Err("time value has no 'Z' or zone offset".to_string()),
        }
    }

    fn finish(&self) -> Result<(), String> {
        if self.pos != self.bytes.len() {
            return Err(format!("unexpected characters at position {}", self.pos));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_utc_time_encode() {
        let encoded = encode_utc_time(&utc(2003, 7, 4, 11, 33, 28)).unwrap();
        assert_eq!(encoded, b"030704113328Z");
    }

    #[test]
    fn test_utc_time_rejects_fraction() {
        let time = utc(2003, 7, 4, 11, 33, 28) + Duration::milliseconds(250);
        assert!(encode_utc_time(&time).is_err());
    }

    #[rstest]
    #[case(b"491231235959Z", 2049)]
    #[case(b"500101000000Z", 1950)]
    #[case(b"991231235959Z", 1999)]
    #[case(b"000101000000Z", 2000)]
    fn test_utc_time_year_pivot(#[case] text: &[u8], #[case] year: i32) {
        let decoded = decode_utc_time(text, EncodingRules::Der).unwrap();
        assert_eq!(decoded.year(), year);
    }

    #[test]
    fn test_utc_time_out_of_range() {
        assert!(encode_utc_time(&utc(2050, 1, 1, 0, 0, 0)).is_err());
        assert!(encode_utc_time(&utc(1949, 12, 31, 23, 59, 59)).is_err());
    }

    #[test]
    fn test_utc_time_ber_forms() {
        let expected = utc(2003, 7, 4, 11, 33, 0);
        assert_eq!(decode_utc_time(b"0307041133Z", EncodingRules::Ber).unwrap(), expected);
        assert_eq!(decode_utc_time(b"0307041333+0200", EncodingRules::Ber).unwrap(), expected);
        assert_eq!(decode_utc_time(b"0307040933-0200", EncodingRules::Ber).unwrap(), expected);

        assert!(decode_utc_time(b"0307041133Z", EncodingRules::Der).is_err());
        assert!(decode_utc_time(b"030704113300+0000", EncodingRules::Der).is_err());
    }

    #[test]
    fn test_utc_time_malformed() {
        assert!(decode_utc_time(b"030704113328", EncodingRules::Ber).is_err());
        assert!(decode_utc_time(b"031304113328Z", EncodingRules::Ber).is_err());
        assert!(decode_utc_time(b"030704113328ZZ", EncodingRules::Ber).is_err());
        assert!(decode_utc_time(b"0307", EncodingRules::Ber).is_err());
    }

    #[test]
    fn test_generalized_time_kerberos_form() {
        let time = utc(2024, 2, 29, 23, 59, 59);
        let encoded = encode_generalized_time(&time).unwrap();
        assert_eq!(encoded, b"20240229235959Z");
        assert_eq!(decode_generalized_time(&encoded, EncodingRules::Der).unwrap(), time);
    }

    #[test]
    fn test_generalized_time_fraction() {
        let time = utc(1992, 5, 21, 0, 0, 0) + Duration::milliseconds(250);
        let encoded = encode_generalized_time(&time).unwrap();
        assert_eq!(encoded, b"19920521000000.25Z");
        assert_eq!(decode_generalized_time(&encoded, EncodingRules::Der).unwrap(), time);

        assert!(decode_generalized_time(b"19920521000000.250Z", EncodingRules::Der).is_err());
        assert!(decode_generalized_time(b"19920521000000,25Z", EncodingRules::Der).is_err());
        assert_eq!(
            decode_generalized_time(b"19920521000000,250Z", EncodingRules::Ber).unwrap(),
            time
        );
    }

    #[test]
    fn test_generalized_time_rejects_leap_second() {
        let leap = NaiveDate::from_ymd_opt(2016, 12, 31)
            .and_then(|date| date.and_hms_nano_opt(23, 59, 59, 1_500_000_000))
            .unwrap();
        assert!(encode_generalized_time(&Utc.from_utc_datetime(&leap)).is_err());
    }

    #[test]
    fn test_generalized_time_ber_offsets() {
        let expected = utc(1992, 5, 21, 0, 0, 0);
        assert_eq!(
            decode_generalized_time(b"1992052100Z", EncodingRules::Ber).unwrap(),
            expected
        );
        assert_eq!(
            decode_generalized_time(b"199205210100+0100", EncodingRules::Ber).unwrap(),
            expected
        );
        assert!(decode_generalized_time(b"19920521000000", EncodingRules::Ber).is_err());
        assert!(decode_generalized_time(b"1992052100Z", EncodingRules::Der).is_err());
    }
}
