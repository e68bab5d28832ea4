//! Plain text parser and writer.
//!
//! Every non-blank line is one subtitle. The format has no timing, so each
//! entry gets a fixed window starting where the previous one ended.

use crate::errors::SubtitleResult;
use crate::subtitle_processor::SubtitleEntry;

/// Display window given to each plain text line
pub const PLAIN_TEXT_CUE_DURATION_MS: u64 = 3_000;

/// Parse plain text, one entry per non-blank line
pub fn parse(content: &str) -> SubtitleResult<Vec<SubtitleEntry>> {
    let entries = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(i, line)| {
            let start = i as u64 * PLAIN_TEXT_CUE_DURATION_MS;
            SubtitleEntry::new(i + 1, start, start + PLAIN_TEXT_CUE_DURATION_MS, line.to_string())
        })
        .collect();

    Ok(entries)
}

/// Write one line per entry; multi-line text is joined with spaces
pub fn write(entries: &[SubtitleEntry]) -> String {
    let mut output = String::new();

    for entry in entries {
        let line = entry
            .text
            .lines()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if line.is_empty() {
            continue;
        }
        output.push_str(&line);
        output.push('\n');
    }

    output
}
