/*!
 * Supported subtitle formats.
 *
 * The format set is closed: every parser and writer is reached through a
 * `SubtitleFormat` match, so adding a format means adding a variant here and
 * letting the compiler point at every dispatch site.
 *
 * - `srt`: sequential index/timing/text blocks
 * - `vtt`: WebVTT header + cue blocks
 * - `ass`: Advanced SubStation Alpha scripts with styles and dialogue events
 * - `txt`: one subtitle per line, synthesized timing
 */

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{SubtitleError, SubtitleResult};
use crate::subtitle_processor::SubtitleEntry;
use crate::theme::Theme;

pub mod ass;
pub mod srt;
pub mod txt;
pub mod vtt;

/// A subtitle file format this crate can read and write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubtitleFormat {
    /// SubRip
    Srt,
    /// WebVTT
    WebVtt,
    /// Advanced SubStation Alpha
    Ass,
    /// Plain text, one subtitle per line
    PlainText,
}

impl SubtitleFormat {
    /// Every supported format
    pub const ALL: [SubtitleFormat; 4] = [Self::Srt, Self::WebVtt, Self::Ass, Self::PlainText];

    // @returns: Canonical lowercase name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Srt => "srt",
            Self::WebVtt => "vtt",
            Self::Ass => "ass",
            Self::PlainText => "txt",
        }
    }

    // @returns: File extension written for this format
    pub fn extension(&self) -> &'static str {
        self.name()
    }

    /// Look up a format by user-facing name, case-insensitively
    pub fn from_name(name: &str) -> SubtitleResult<Self> {
        match name.trim().to_lowercase().as_str() {
            "srt" | "subrip" => Ok(Self::Srt),
            "vtt" | "webvtt" => Ok(Self::WebVtt),
            "ass" | "ssa" => Ok(Self::Ass),
            "txt" | "text" => Ok(Self::PlainText),
            _ => Err(SubtitleError::UnsupportedFormat(name.to_string())),
        }
    }

    /// Map a file extension (without the dot) to a format
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "srt" => Some(Self::Srt),
            "vtt" => Some(Self::WebVtt),
            "ass" | "ssa" => Some(Self::Ass),
            "txt" => Some(Self::PlainText),
            _ => None,
        }
    }

    /// Detect the format of a file from its extension
    pub fn from_path(path: &Path) -> SubtitleResult<Self> {
        path.extension()
            .and_then(|ext| Self::from_extension(&ext.to_string_lossy()))
            .ok_or_else(|| SubtitleError::UnsupportedFormat(path.display().to_string()))
    }

    /// Whether the format carries style definitions
    pub fn is_styled(&self) -> bool {
        matches!(self, Self::Ass)
    }

    /// Parse raw content into canonical entries
    pub fn parse(&self, content: &str) -> SubtitleResult<Vec<SubtitleEntry>> {
        let content = strip_bom(content);
        match self {
            Self::Srt => srt::parse(content),
            Self::WebVtt => vtt::parse(content),
            Self::Ass => ass::parse(content),
            Self::PlainText => txt::parse(content),
        }
    }

    /// Parse the style definitions of a styled format; empty otherwise
    pub fn parse_styles(&self, content: &str) -> Vec<Theme> {
        match self {
            Self::Ass => ass::parse_styles(strip_bom(content)),
            _ => Vec::new(),
        }
    }

    /// Serialize entries; `styles` is only used by styled formats
    pub fn write(&self, entries: &[SubtitleEntry], styles: &[Theme]) -> String {
        match self {
            Self::Srt => srt::write(entries),
            Self::WebVtt => vtt::write(entries),
            Self::Ass => ass::write(entries, styles),
            Self::PlainText => txt::write(entries),
        }
    }
}

impl fmt::Display for SubtitleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SubtitleFormat {
    type Err = SubtitleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

// @const: `start --> end [settings]` timing line
static TIMING_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\S+)\s*-->\s*(\S+)(?:\s+(.*))?$").unwrap()
});

/// Split a timing line into its start literal, end literal and trailing cue settings
pub(crate) fn split_timing_line(line: &str) -> Option<(&str, &str, &str)> {
    let caps = TIMING_LINE_REGEX.captures(line)?;
    let start = caps.get(1)?.as_str();
    let end = caps.get(2)?.as_str();
    let settings = caps.get(3).map_or("", |m| m.as_str());
    Some((start, end, settings))
}

/// Drop a leading UTF-8 byte order mark
pub(crate) fn strip_bom(content: &str) -> &str {
    content.strip_prefix('\u{feff}').unwrap_or(content)
}
