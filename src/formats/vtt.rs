//! WebVTT (`.vtt`) parser and writer.
//!
//! The file must open with the `WEBVTT` signature. Cue identifiers, cue
//! settings and `NOTE`/`STYLE`/`REGION` blocks are read past and not kept.

use log::{debug, warn};

use super::split_timing_line;
use crate::errors::{SubtitleError, SubtitleResult};
use crate::subtitle_processor::SubtitleEntry;
use crate::timing::{self, TimeFormat};

/// WebVTT file signature
pub const WEBVTT_HEADER: &str = "WEBVTT";

const SKIPPED_BLOCKS: [&str; 3] = ["NOTE", "STYLE", "REGION"];

/// Parse WebVTT content into subtitle entries
pub fn parse(content: &str) -> SubtitleResult<Vec<SubtitleEntry>> {
    let mut lines = content.lines().enumerate().peekable();

    let has_signature = lines
        .next()
        .map(|(_, first)| is_signature(first.trim()))
        .unwrap_or(false);
    if !has_signature {
        return Err(SubtitleError::MissingSignature {
            format: "WebVTT",
            expected: WEBVTT_HEADER,
        });
    }

    // Header metadata runs until the first blank line or the first timing line
    while let Some((_, line)) = lines.next_if(|(_, line)| !line.contains("-->")) {
        if line.trim().is_empty() {
            break;
        }
    }

    let mut entries = Vec::new();
    let mut block: Vec<(usize, &str)> = Vec::new();
    while let Some((idx, raw_line)) = lines.next() {
        let line = raw_line.trim();
        if !line.is_empty() {
            block.push((idx + 1, line));
        }
        if line.is_empty() || lines.peek().is_none() {
            if let Some(entry) = parse_block(&block, entries.len() + 1)? {
                entries.push(entry);
            }
            block.clear();
        }
    }

    Ok(entries)
}

fn is_signature(line: &str) -> bool {
    match line.strip_prefix(WEBVTT_HEADER) {
        Some(rest) => rest.is_empty() || rest.starts_with([' ', '\t']),
        None => false,
    }
}

/// Turn one blank-line separated block into a cue, if it is one
fn parse_block(block: &[(usize, &str)], seq_num: usize) -> SubtitleResult<Option<SubtitleEntry>> {
    let Some(&(first_line_no, first)) = block.first() else {
        return Ok(None);
    };

    let keyword = first.split_whitespace().next().unwrap_or("");
    if SKIPPED_BLOCKS.contains(&keyword) {
        debug!("Skipping {} block at line {}", keyword, first_line_no);
        return Ok(None);
    }

    let Some(timing_pos) = block.iter().position(|(_, line)| line.contains("-->")) else {
        warn!("Ignoring block without a timing line at line {}", first_line_no);
        return Ok(None);
    };

    let (line_no, timing_line) = block[timing_pos];
    let Some((start, end, _settings)) = split_timing_line(timing_line) else {
        return Err(SubtitleError::Malformed {
            format: "WebVTT",
            line: line_no,
            message: format!("unreadable timing line '{}'", timing_line),
        });
    };
    let start_ms = timing::parse_time(start, TimeFormat::Vtt)?;
    let end_ms = timing::parse_time(end, TimeFormat::Vtt)?;

    let text_lines: Vec<&str> = block[timing_pos + 1..]
        .iter()
        .map(|(_, line)| *line)
        .filter(|line| split_timing_line(line).is_none())
        .collect();
    if text_lines.is_empty() {
        debug!("Dropping cue without text at line {}", line_no);
        return Ok(None);
    }

    SubtitleEntry::new_validated(seq_num, start_ms, end_ms, text_lines.join("\n"), line_no).map(Some)
}

/// Write entries as WebVTT
pub fn write(entries: &[SubtitleEntry]) -> String {
    let mut output = String::from(WEBVTT_HEADER);
    output.push_str("\n\n");

    for entry in entries {
        output.push_str(&format!(
            "{} --> {}\n",
            entry.format_start_time(TimeFormat::Vtt),
            entry.format_end_time(TimeFormat::Vtt)
        ));
        super::srt::push_text_lines(&mut output, &entry.text);
        output.push('\n');
    }

    output
}
