use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::errors::{SubtitleError, SubtitleResult};
use crate::file_utils::FileManager;
use crate::formats::SubtitleFormat;
use crate::theme::Theme;
use crate::timing::{self, TimeFormat};

// @module: Canonical timed-text model shared by every parser and writer

// @struct: Single subtitle entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleEntry {
    // @field: 1-based sequence number, reassigned on write
    pub seq_num: usize,

    // @field: Start time in ms
    pub start_time_ms: u64,

    // @field: End time in ms
    pub end_time_ms: u64,

    // @field: Subtitle text, line breaks as '\n'
    pub text: String,

    // @field: Name of the bound style, if the source format has styles
    pub style_ref: Option<String>,
}

impl SubtitleEntry {
    /// Creates a new unstyled subtitle entry
    pub fn new(seq_num: usize, start_time_ms: u64, end_time_ms: u64, text: String) -> Self {
        SubtitleEntry {
            seq_num,
            start_time_ms,
            end_time_ms,
            text,
            style_ref: None,
        }
    }

    // @creates: Entry checked against start <= end
    // @param line: Timing line number reported on failure
    pub fn new_validated(
        seq_num: usize,
        start_time_ms: u64,
        end_time_ms: u64,
        text: String,
        line: usize,
    ) -> SubtitleResult<Self> {
        if end_time_ms < start_time_ms {
            return Err(SubtitleError::InvalidTimeRange {
                line,
                start_ms: start_time_ms,
                end_ms: end_time_ms,
            });
        }

        Ok(Self::new(seq_num, start_time_ms, end_time_ms, text))
    }

    /// Bind this entry to a named style
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style_ref = Some(style.into());
        self
    }

    /// Length of the display window
    pub fn duration_ms(&self) -> u64 {
        self.end_time_ms - self.start_time_ms
    }

    /// Start time as a literal of the given format
    pub fn format_start_time(&self, format: TimeFormat) -> String {
        timing::format_time(self.start_time_ms, format)
    }

    /// End time as a literal of the given format
    pub fn format_end_time(&self, format: TimeFormat) -> String {
        timing::format_time(self.end_time_ms, format)
    }
}

/// Parsed subtitle document with the metadata needed to write it back out
#[derive(Debug, Clone)]
pub struct SubtitleCollection {
    /// File the collection was loaded from, if any
    pub source_file: Option<PathBuf>,

    /// Format the entries were parsed from
    pub format: SubtitleFormat,

    /// Entries in display order
    pub entries: Vec<SubtitleEntry>,

    /// Style definitions carried by the source; empty for unstyled formats
    pub styles: Vec<Theme>,
}

impl SubtitleCollection {
    /// Create an empty collection
    pub fn new(format: SubtitleFormat) -> Self {
        SubtitleCollection {
            source_file: None,
            format,
            entries: Vec::new(),
            styles: Vec::new(),
        }
    }

    /// Parse in-memory content of a known format
    pub fn parse(content: &str, format: SubtitleFormat) -> SubtitleResult<Self> {
        let entries = format.parse(content)?;
        let styles = format.parse_styles(content);
        debug!(
            "Parsed {} {} entries and {} styles",
            entries.len(),
            format,
            styles.len()
        );

        Ok(SubtitleCollection {
            source_file: None,
            format,
            entries,
            styles,
        })
    }

    /// Load and parse a file, picking the parser from its extension
    pub fn from_file<P: AsRef<Path>>(path: P) -> SubtitleResult<Self> {
        let path = path.as_ref();
        let format = FileManager::detect_format(path)?;
        let content = FileManager::read_to_string(path)?;

        let mut collection = Self::parse(&content, format)?;
        collection.source_file = Some(path.to_path_buf());
        Ok(collection)
    }

    /// Serialize into the given format
    pub fn to_format_string(&self, target: SubtitleFormat) -> String {
        target.write(&self.entries, &self.styles)
    }

    /// Serialize into the given format and write it atomically
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P, target: SubtitleFormat) -> SubtitleResult<()> {
        let path = path.as_ref();
        let content = self.to_format_string(target);
        FileManager::write_atomically(path, &content)?;

        info!(
            "Wrote {} {} entries to {}",
            self.entries.len(),
            target,
            path.display()
        );
        Ok(())
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the collection has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
