/*!
 * Time literal codec for the supported subtitle formats.
 *
 * All times are carried as milliseconds. Each format has its own literal:
 * - SRT: `HH:MM:SS,mmm`
 * - WebVTT: `HH:MM:SS.mmm`, hours optional on read
 * - ASS: `H:MM:SS.cc` with centisecond precision and an unpadded hour
 */

use std::fmt;

use crate::errors::{SubtitleError, SubtitleResult};

const MS_PER_HOUR: u64 = 3_600_000;
const MS_PER_MINUTE: u64 = 60_000;
const MS_PER_SECOND: u64 = 1_000;

/// Time literal syntax of a subtitle format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeFormat {
    /// `HH:MM:SS,mmm`
    Srt,
    /// `HH:MM:SS.mmm` or `MM:SS.mmm`
    Vtt,
    /// `H:MM:SS.cc`
    Ass,
}

impl TimeFormat {
    /// Human readable format name used in error messages
    pub fn name(&self) -> &'static str {
        match self {
            Self::Srt => "SRT",
            Self::Vtt => "WebVTT",
            Self::Ass => "ASS",
        }
    }
}

impl fmt::Display for TimeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parse a time literal into milliseconds.
///
/// Either `,` or `.` is accepted before the fraction, and a missing fraction
/// reads as zero. The fraction is a decimal part of a second, so `.5` is 500ms
/// and digits past the millisecond are dropped.
pub fn parse_time(text: &str, format: TimeFormat) -> SubtitleResult<u64> {
    let literal = text.trim();
    let invalid = || SubtitleError::InvalidTimestamp {
        format: format.name(),
        value: literal.to_string(),
    };

    let (clock, fraction) = match literal.rfind([',', '.']) {
        Some(pos) => (&literal[..pos], &literal[pos + 1..]),
        None => (literal, ""),
    };

    let parts: Vec<&str> = clock.split(':').collect();
    let (hours, minutes, seconds) = match parts.as_slice() {
        [h, m, s] => (*h, *m, *s),
        // Only WebVTT allows dropping the hour component
        [m, s] if format == TimeFormat::Vtt => ("0", *m, *s),
        _ => return Err(invalid()),
    };

    let hours = parse_component(hours).ok_or_else(invalid)?;
    let minutes = parse_component(minutes).ok_or_else(invalid)?;
    let seconds = parse_component(seconds).ok_or_else(invalid)?;
    if minutes >= 60 || seconds >= 60 {
        return Err(invalid());
    }

    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let digits = fraction.as_bytes();
    let millis = (0..3).fold(0u64, |acc, i| {
        acc * 10 + digits.get(i).map_or(0, |d| u64::from(d - b'0'))
    });

    // Minutes and seconds are bounded above, only the hour can overflow
    hours
        .checked_mul(MS_PER_HOUR)
        .and_then(|ms| ms.checked_add(minutes * MS_PER_MINUTE + seconds * MS_PER_SECOND + millis))
        .ok_or_else(invalid)
}

/// Format milliseconds as a time literal.
///
/// ASS output truncates to the centisecond below.
pub fn format_time(ms: u64, format: TimeFormat) -> String {
    let hours = ms / MS_PER_HOUR;
    let minutes = (ms % MS_PER_HOUR) / MS_PER_MINUTE;
    let seconds = (ms % MS_PER_MINUTE) / MS_PER_SECOND;
    let millis = ms % MS_PER_SECOND;

    match format {
        TimeFormat::Srt => format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis),
        TimeFormat::Vtt => format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis),
        TimeFormat::Ass => format!("{}:{:02}:{:02}.{:02}", hours, minutes, seconds, millis / 10),
    }
}

fn parse_component(part: &str) -> Option<u64> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}
