//! SubRip (`.srt`) parser and writer.
//!
//! Blocks of `index`, `start --> end` and one or more text lines, separated
//! by blank lines. Parsing is permissive: stray lines where an index is
//! expected are skipped, and a trailing block without text is dropped.

use log::{debug, warn};

use super::split_timing_line;
use crate::errors::SubtitleResult;
use crate::subtitle_processor::SubtitleEntry;
use crate::timing::{self, TimeFormat};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    ExpectIndex,
    ExpectTiming,
    Text,
}

/// Timing of the block being assembled
struct PendingCue {
    seq_num: usize,
    start_ms: u64,
    end_ms: u64,
    line: usize,
}

/// Parse SRT content into subtitle entries
pub fn parse(content: &str) -> SubtitleResult<Vec<SubtitleEntry>> {
    let mut entries = Vec::new();
    let mut state = ParseState::ExpectIndex;
    let mut seq_num = 0;
    let mut pending: Option<PendingCue> = None;
    let mut text_lines: Vec<&str> = Vec::new();

    for (idx, raw_line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();

        match state {
            ParseState::ExpectIndex => {
                if line.is_empty() {
                    continue;
                }
                match line.parse::<usize>() {
                    Ok(num) => {
                        seq_num = num;
                        state = ParseState::ExpectTiming;
                    }
                    Err(_) => warn!("Ignoring line {} while looking for an index: {}", line_no, line),
                }
            }
            ParseState::ExpectTiming => {
                if let Some((start, end, _)) = split_timing_line(line) {
                    pending = Some(PendingCue {
                        seq_num,
                        start_ms: timing::parse_time(start, TimeFormat::Srt)?,
                        end_ms: timing::parse_time(end, TimeFormat::Srt)?,
                        line: line_no,
                    });
                    state = ParseState::Text;
                } else if let Ok(num) = line.parse::<usize>() {
                    // A second number in a row replaces the index we were holding
                    seq_num = num;
                } else {
                    warn!("Dropping index {}: expected a timing line at line {}", seq_num, line_no);
                    state = ParseState::ExpectIndex;
                }
            }
            ParseState::Text => {
                if line.is_empty() {
                    if let Some(cue) = pending.take() {
                        push_entry(&mut entries, cue, &text_lines)?;
                    }
                    text_lines.clear();
                    state = ParseState::ExpectIndex;
                } else {
                    text_lines.push(line);
                }
            }
        }
    }

    if let Some(cue) = pending.take() {
        push_entry(&mut entries, cue, &text_lines)?;
    }
    if state == ParseState::ExpectTiming {
        warn!("Dropping trailing index {} without a timing line", seq_num);
    }

    Ok(entries)
}

fn push_entry(entries: &mut Vec<SubtitleEntry>, cue: PendingCue, text_lines: &[&str]) -> SubtitleResult<()> {
    if text_lines.is_empty() {
        debug!("Skipping subtitle {} without text", cue.seq_num);
        return Ok(());
    }

    let entry = SubtitleEntry::new_validated(
        cue.seq_num,
        cue.start_ms,
        cue.end_ms,
        text_lines.join("\n"),
        cue.line,
    )?;
    entries.push(entry);
    Ok(())
}

/// Write entries as SRT, numbering them from 1
pub fn write(entries: &[SubtitleEntry]) -> String {
    let mut output = String::new();

    for (i, entry) in entries.iter().enumerate() {
        output.push_str(&format!("{}\n", i + 1));
        output.push_str(&format!(
            "{} --> {}\n",
            entry.format_start_time(TimeFormat::Srt),
            entry.format_end_time(TimeFormat::Srt)
        ));
        push_text_lines(&mut output, &entry.text);
        output.push('\n');
    }

    output
}

/// Append text one line at a time, skipping empty lines that would end the block early
pub(crate) fn push_text_lines(output: &mut String, text: &str) {
    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        output.push_str(line);
        output.push('\n');
    }
}
