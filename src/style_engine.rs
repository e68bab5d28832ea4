/*!
 * Theme application for styled subtitle output.
 *
 * Two paths produce an ASS script:
 * - `style_from_plain` parses an unstyled document and writes a fresh script
 *   whose only style is the theme
 * - `restyle` rewrites the style section of an existing script in place and
 *   copies every other line through unchanged
 */

use std::collections::HashMap;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::errors::{SubtitleError, SubtitleResult};
use crate::formats::SubtitleFormat;
use crate::formats::ass::{
    self, DEFAULT_STYLE_NAME, EVENTS_SECTION, STYLE_FORMAT_LINE, STYLES_SECTION,
};
use crate::theme::{DEFAULT_THEME_NAME, Theme, ThemeRegistry, VerticalPosition};

/// Styling request: which theme to use and which of its fields to override
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleOptions {
    /// Theme name; the default theme when absent
    #[serde(default)]
    pub theme: Option<String>,

    /// Font size replacing the theme's
    #[serde(default)]
    pub font_size: Option<u32>,

    /// Vertical position replacing the theme's alignment
    #[serde(default)]
    pub position: Option<VerticalPosition>,

    /// Draw a translucent box behind the text; unset keeps the configured default
    #[serde(default)]
    pub add_background: Option<bool>,
}

impl StyleOptions {
    /// Build options from a loosely typed key/value map.
    ///
    /// Recognized keys are `theme`, `font_size`, `position` and
    /// `add_background`; anything else is ignored.
    pub fn from_option_map(options: &HashMap<String, String>) -> SubtitleResult<Self> {
        let mut parsed = Self::default();

        for (key, value) in options {
            match key.as_str() {
                "theme" => {
                    if value.trim().is_empty() {
                        return Err(SubtitleError::InvalidArgument("theme name is empty".to_string()));
                    }
                    parsed.theme = Some(value.trim().to_string());
                }
                "font_size" => {
                    let size = value.trim().parse::<u32>().map_err(|_| {
                        SubtitleError::InvalidArgument(format!("invalid font_size '{}'", value))
                    })?;
                    parsed.font_size = Some(size);
                }
                "position" => parsed.position = Some(value.parse()?),
                "add_background" => parsed.add_background = Some(parse_flag(value)?),
                _ => debug!("Ignoring unknown style option '{}'", key),
            }
        }

        Ok(parsed)
    }

    /// Resolve the theme and apply the overrides to a copy of it
    pub fn resolve_theme(&self, registry: &ThemeRegistry) -> SubtitleResult<Theme> {
        let name = self.theme.as_deref().unwrap_or(DEFAULT_THEME_NAME);
        let mut theme = registry.get(name)?.clone();

        if let Some(size) = self.font_size {
            if size == 0 {
                return Err(SubtitleError::InvalidArgument("font_size must be positive".to_string()));
            }
            theme = theme.with_font_size(size);
        }
        if let Some(position) = self.position {
            theme = theme.with_position(position);
        }
        if self.add_background == Some(true) {
            theme = theme.with_background();
        }

        Ok(theme)
    }
}

fn parse_flag(value: &str) -> SubtitleResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" | "" => Ok(false),
        _ => Err(SubtitleError::InvalidArgument(format!(
            "invalid add_background '{}'",
            value
        ))),
    }
}

/// Style `content` of the given format with `theme`, choosing the path by format
pub fn apply_theme(content: &str, format: SubtitleFormat, theme: &Theme) -> SubtitleResult<String> {
    if format.is_styled() {
        restyle(content, theme)
    } else {
        style_from_plain(content, format, theme)
    }
}

/// Parse an unstyled document and write it as an ASS script styled by `theme`
pub fn style_from_plain(content: &str, format: SubtitleFormat, theme: &Theme) -> SubtitleResult<String> {
    theme.validate()?;
    let entries: Vec<_> = format
        .parse(content)?
        .into_iter()
        .map(|entry| entry.with_style(DEFAULT_STYLE_NAME))
        .collect();

    info!(
        "Styling {} {} entries with theme '{}'",
        entries.len(),
        format,
        theme.name
    );
    Ok(ass::write(&entries, &[theme.renamed(DEFAULT_STYLE_NAME)]))
}

/// Replace the style rows of an ASS script with a single row for `theme`.
///
/// The section ends at the next `[...]` header whether or not a blank line
/// precedes it. All lines outside the section, including every event, are
/// copied byte for byte. A script without a style section gets one inserted
/// before `[Events]`.
pub fn restyle(content: &str, theme: &Theme) -> SubtitleResult<String> {
    theme.validate()?;
    let newline = if content.contains("\r\n") { "\r\n" } else { "\n" };
    let row_theme = theme.renamed(DEFAULT_STYLE_NAME);

    let mut output = String::with_capacity(content.len() + 256);
    let mut in_styles = false;
    let mut style_written = false;
    let mut dropped_rows = 0;

    for raw_line in content.split_inclusive('\n') {
        let line = raw_line.trim().trim_start_matches('\u{feff}');

        if ass::is_section_header(line) {
            if ass::is_styles_header(line) {
                push_line(&mut output, raw_line, newline);
                if !style_written {
                    push_style_rows(&mut output, &row_theme, newline);
                    style_written = true;
                }
                in_styles = true;
                continue;
            }

            if !style_written && line.eq_ignore_ascii_case(EVENTS_SECTION) {
                debug!("No style section found, inserting one before {}", EVENTS_SECTION);
                output.push_str(STYLES_SECTION);
                output.push_str(newline);
                push_style_rows(&mut output, &row_theme, newline);
                output.push_str(newline);
                style_written = true;
            }
            in_styles = false;
            output.push_str(raw_line);
            continue;
        }

        if in_styles && (line.starts_with("Style:") || line.starts_with("Format:")) {
            if line.starts_with("Style:") {
                dropped_rows += 1;
            }
            continue;
        }
        output.push_str(raw_line);
    }

    if !style_written {
        return Err(SubtitleError::MissingSignature {
            format: "ASS",
            expected: STYLES_SECTION,
        });
    }

    debug!("Replaced {} style rows with theme '{}'", dropped_rows, theme.name);
    Ok(output)
}

/// Push a line, terminating it if it was the unterminated last line of the input
fn push_line(output: &mut String, raw_line: &str, newline: &str) {
    output.push_str(raw_line);
    if !raw_line.ends_with('\n') {
        output.push_str(newline);
    }
}

fn push_style_rows(output: &mut String, theme: &Theme, newline: &str) {
    output.push_str(STYLE_FORMAT_LINE);
    output.push_str(newline);
    output.push_str(&ass::format_style_row(theme));
    output.push_str(newline);
}
