use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::debug;
use tempfile::NamedTempFile;
use walkdir::WalkDir;

use crate::errors::{SubtitleError, SubtitleResult};
use crate::formats::SubtitleFormat;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> SubtitleResult<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path).map_err(|e| SubtitleError::io(path, e))?;
        }
        Ok(())
    }

    /// Detect the subtitle format of a file from its extension
    pub fn detect_format<P: AsRef<Path>>(path: P) -> SubtitleResult<SubtitleFormat> {
        SubtitleFormat::from_path(path.as_ref())
    }

    // @generates: Output path for a converted subtitle
    // @params: input_file, output_dir, target format
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
        format: SubtitleFormat,
    ) -> PathBuf {
        let stem = input_file.as_ref().file_stem().unwrap_or_default();

        let mut output_filename = stem.to_string_lossy().to_string();
        output_filename.push('.');
        output_filename.push_str(format.extension());

        output_dir.as_ref().join(output_filename)
    }

    /// Find every file under `dir` whose extension maps to a known subtitle format
    pub fn find_subtitle_files<P: AsRef<Path>>(dir: P) -> SubtitleResult<Vec<PathBuf>> {
        let dir = dir.as_ref();
        let mut result = Vec::new();

        for entry in WalkDir::new(dir).follow_links(true) {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(dir).to_path_buf();
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("directory walk failed"));
                SubtitleError::io(path, source)
            })?;

            let path = entry.path();
            if path.is_file() && SubtitleFormat::from_path(path).is_ok() {
                result.push(path.to_path_buf());
            }
        }

        result.sort();
        debug!("Found {} subtitle files in {}", result.len(), dir.display());
        Ok(result)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> SubtitleResult<String> {
        let path = path.as_ref();
        fs::read_to_string(path).map_err(|e| SubtitleError::io(path, e))
    }

    /// Write a string to a file through a temporary file in the same directory.
    ///
    /// The target only appears once the full content is on disk; on failure
    /// the temporary file is removed and any existing target is left as it was.
    pub fn write_atomically<P: AsRef<Path>>(path: P, content: &str) -> SubtitleResult<()> {
        let path = path.as_ref();
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        Self::ensure_dir(parent)?;

        let mut temp = NamedTempFile::new_in(parent).map_err(|e| SubtitleError::io(parent, e))?;
        if let Err(e) = temp.write_all(content.as_bytes()).and_then(|_| temp.flush()) {
            return Err(SubtitleError::io(temp.path(), e));
        }
        temp.persist(path).map_err(|e| SubtitleError::io(path, e.error))?;

        Ok(())
    }
}
