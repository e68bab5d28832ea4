//! Advanced SubStation Alpha (`.ass`/`.ssa`) parser and writer.
//!
//! Only `Dialogue:` rows carry entries. Their text is the tenth field and
//! keeps any commas it contains; override blocks such as `{\b1}` are
//! stripped and `\N` becomes a line break. Rows left without text are
//! dropped. Style rows are read separately by `parse_styles` so a script
//! converted to itself keeps its styles.

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{SubtitleError, SubtitleResult};
use crate::subtitle_processor::SubtitleEntry;
use crate::theme::{Color, Theme};
use crate::timing::{self, TimeFormat};

/// Style name events fall back to
pub const DEFAULT_STYLE_NAME: &str = "Default";

/// Section holding style rows
pub const STYLES_SECTION: &str = "[V4+ Styles]";

/// Section holding dialogue rows
pub const EVENTS_SECTION: &str = "[Events]";

/// Column order of every style row written.
///
/// This is the 23-column V4+ layout players expect, Name through Encoding.
/// Older 21-column descriptions predate it and are only supported on read,
/// through each script's own `Format:` line.
pub const STYLE_FORMAT_LINE: &str = "Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding";

/// Column order of every dialogue row written
pub const EVENT_FORMAT_LINE: &str = "Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text";

const DIALOGUE_PREFIX: &str = "Dialogue:";
const DIALOGUE_FIELD_COUNT: usize = 10;

// @const: Override tag blocks like {\an8\b1}
static OVERRIDE_BLOCK_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{[^}]*\}").unwrap());

/// Parse the dialogue events of an ASS script into subtitle entries
pub fn parse(content: &str) -> SubtitleResult<Vec<SubtitleEntry>> {
    let mut entries = Vec::new();

    for (idx, raw_line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let Some(row) = raw_line.trim_start().strip_prefix(DIALOGUE_PREFIX) else {
            continue;
        };

        let fields: Vec<&str> = row.splitn(DIALOGUE_FIELD_COUNT, ',').collect();
        if fields.len() < DIALOGUE_FIELD_COUNT {
            return Err(SubtitleError::Malformed {
                format: "ASS",
                line: line_no,
                message: format!(
                    "dialogue row has {} fields, expected {}",
                    fields.len(),
                    DIALOGUE_FIELD_COUNT
                ),
            });
        }

        let start_ms = timing::parse_time(fields[1], TimeFormat::Ass)?;
        let end_ms = timing::parse_time(fields[2], TimeFormat::Ass)?;
        let mut entry = SubtitleEntry::new_validated(
            entries.len() + 1,
            start_ms,
            end_ms,
            clean_text(fields[9]),
            line_no,
        )?;
        // Drawing-only rows such as {\pos(10,10)} have nothing to carry to other formats
        if entry.text.trim().is_empty() {
            debug!("Dropping dialogue without text at line {}", line_no);
            continue;
        }

        let style = fields[3].trim();
        if !style.is_empty() {
            entry = entry.with_style(style);
        }
        entries.push(entry);
    }

    Ok(entries)
}

/// Strip override blocks and turn ASS escapes into plain text
pub fn clean_text(raw: &str) -> String {
    OVERRIDE_BLOCK_REGEX
        .replace_all(raw.trim(), "")
        .replace("\\N", "\n")
        .replace("\\n", "\n")
        .replace("\\h", " ")
}

/// Read the style rows of every style section.
///
/// Columns are located through the section's `Format:` line; rows that
/// cannot be read are skipped with a warning.
pub fn parse_styles(content: &str) -> Vec<Theme> {
    let mut styles = Vec::new();
    let mut in_styles = false;
    let mut columns: Vec<String> = column_names(STYLE_FORMAT_LINE);

    for (idx, raw_line) in content.lines().enumerate() {
        let line = raw_line.trim();
        if is_section_header(line) {
            in_styles = is_styles_header(line);
            continue;
        }
        if !in_styles {
            continue;
        }

        if line.starts_with("Format:") {
            columns = column_names(line);
        } else if let Some(row) = line.strip_prefix("Style:") {
            match parse_style_row(row, &columns) {
                Some(theme) => styles.push(theme),
                None => warn!("Skipping unreadable style row at line {}", idx + 1),
            }
        }
    }

    debug!("Found {} style definitions", styles.len());
    styles
}

/// Whether a trimmed line opens a `[...]` section
pub fn is_section_header(line: &str) -> bool {
    line.starts_with('[') && line.ends_with(']')
}

/// Whether a trimmed line opens a style section (`[V4+ Styles]` or SSA's `[V4 Styles]`)
pub fn is_styles_header(line: &str) -> bool {
    let lower = line.to_lowercase();
    lower == "[v4+ styles]" || lower == "[v4 styles]"
}

fn column_names(format_line: &str) -> Vec<String> {
    format_line
        .trim_start_matches("Format:")
        .split(',')
        .map(|name| name.trim().to_lowercase())
        .collect()
}

fn parse_style_row(row: &str, columns: &[String]) -> Option<Theme> {
    let values: Vec<&str> = row.split(',').map(str::trim).collect();
    if values.len() < columns.len() {
        return None;
    }

    let field = |name: &str| -> Option<&str> {
        columns
            .iter()
            .position(|column| column == name)
            .and_then(|i| values.get(i).copied())
    };
    let colour = |name: &str, fallback: Color| -> Color {
        field(name)
            .and_then(|value| Color::parse_ass(value).ok())
            .unwrap_or(fallback)
    };
    let flag = |name: &str| -> bool { matches!(field(name), Some("-1") | Some("1")) };

    let defaults = Theme::default();
    Some(Theme {
        name: field("name")?.to_string(),
        font_name: field("fontname").unwrap_or(defaults.font_name.as_str()).to_string(),
        font_size: field("fontsize")
            .and_then(|v| v.parse::<f32>().ok())
            .map(|size| size.round() as u32)
            .unwrap_or(defaults.font_size),
        primary_colour: colour("primarycolour", defaults.primary_colour),
        secondary_colour: colour("secondarycolour", defaults.secondary_colour),
        outline_colour: colour("outlinecolour", colour("tertiarycolour", defaults.outline_colour)),
        back_colour: colour("backcolour", defaults.back_colour),
        bold: flag("bold"),
        italic: flag("italic"),
        border_style: field("borderstyle")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.border_style),
        outline: field("outline").and_then(|v| v.parse().ok()).unwrap_or(defaults.outline),
        shadow: field("shadow").and_then(|v| v.parse().ok()).unwrap_or(defaults.shadow),
        alignment: field("alignment")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.alignment),
        margin_l: field("marginl").and_then(|v| v.parse().ok()).unwrap_or(defaults.margin_l),
        margin_r: field("marginr").and_then(|v| v.parse().ok()).unwrap_or(defaults.margin_r),
        margin_v: field("marginv").and_then(|v| v.parse().ok()).unwrap_or(defaults.margin_v),
    })
}

/// Format a theme as a `Style:` row in `STYLE_FORMAT_LINE` column order
pub fn format_style_row(theme: &Theme) -> String {
    let flag = |on: bool| if on { "-1" } else { "0" };

    format!(
        "Style: {},{},{},{},{},{},{},{},{},0,0,100,100,0,0,{},{},{},{},{},{},{},1",
        theme.name,
        theme.font_name,
        theme.font_size,
        theme.primary_colour,
        theme.secondary_colour,
        theme.outline_colour,
        theme.back_colour,
        flag(theme.bold),
        flag(theme.italic),
        theme.border_style,
        theme.outline,
        theme.shadow,
        theme.alignment,
        theme.margin_l,
        theme.margin_r,
        theme.margin_v
    )
}

/// Write a complete ASS script: script info, styles and events.
///
/// With no styles the default theme is written as the `Default` style.
pub fn write(entries: &[SubtitleEntry], styles: &[Theme]) -> String {
    let fallback = [Theme::default().renamed(DEFAULT_STYLE_NAME)];
    let styles = if styles.is_empty() { &fallback[..] } else { styles };

    let mut output = String::new();
    output.push_str("[Script Info]\n");
    output.push_str("; Script generated by subforge\n");
    output.push_str("ScriptType: v4.00+\n");
    output.push_str("PlayResX: 384\n");
    output.push_str("PlayResY: 288\n");
    output.push_str("WrapStyle: 0\n");
    output.push_str("ScaledBorderAndShadow: yes\n");
    output.push('\n');

    output.push_str(STYLES_SECTION);
    output.push('\n');
    output.push_str(STYLE_FORMAT_LINE);
    output.push('\n');
    for style in styles {
        output.push_str(&format_style_row(style));
        output.push('\n');
    }
    output.push('\n');

    output.push_str(EVENTS_SECTION);
    output.push('\n');
    output.push_str(EVENT_FORMAT_LINE);
    output.push('\n');
    for entry in entries {
        output.push_str(&format_dialogue_row(entry));
        output.push('\n');
    }

    output
}

fn format_dialogue_row(entry: &SubtitleEntry) -> String {
    let style = entry.style_ref.as_deref().unwrap_or(DEFAULT_STYLE_NAME);
    let text = entry
        .text
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\\N");

    format!(
        "Dialogue: 0,{},{},{},,0,0,0,,{}",
        entry.format_start_time(TimeFormat::Ass),
        entry.format_end_time(TimeFormat::Ass),
        style,
        text
    )
}
