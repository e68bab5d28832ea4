/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use std::fs;
use std::path::Path;

use subforge::errors::{ErrorKind, SubtitleError};
use subforge::file_utils::FileManager;
use subforge::formats::SubtitleFormat;

use crate::common;

/// Test file existence checks
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file_path = common::create_test_file(temp_dir.path(), "test.srt", "content")?;

    assert!(FileManager::file_exists(&file_path));
    assert!(!FileManager::file_exists(temp_dir.path().join("missing.srt")));
    assert!(!FileManager::file_exists(temp_dir.path()));
    assert!(FileManager::dir_exists(temp_dir.path()));
    Ok(())
}

#[test]
fn test_ensure_dir_withNestedPath_shouldCreateParents() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("a").join("b");

    FileManager::ensure_dir(&nested)?;
    FileManager::ensure_dir(&nested)?;

    assert!(nested.is_dir());
    Ok(())
}

#[test]
fn test_detect_format_withKnownExtensions_shouldMapEach() {
    assert_eq!(FileManager::detect_format("a.srt").unwrap(), SubtitleFormat::Srt);
    assert_eq!(FileManager::detect_format("a.VTT").unwrap(), SubtitleFormat::WebVtt);
    assert_eq!(FileManager::detect_format("a.ssa").unwrap(), SubtitleFormat::Ass);
    assert_eq!(FileManager::detect_format("a.txt").unwrap(), SubtitleFormat::PlainText);
    assert!(FileManager::detect_format("noext").is_err());
}

#[test]
fn test_generate_output_path_withTargetFormat_shouldSwapExtension() {
    let output = FileManager::generate_output_path("/subs/movie.en.srt", "/out", SubtitleFormat::WebVtt);
    assert_eq!(output, Path::new("/out/movie.en.vtt"));
}

#[test]
fn test_find_subtitle_files_withMixedTree_shouldReturnSortedSubtitles() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "b.vtt", "WEBVTT\n")?;
    common::create_test_file(temp_dir.path(), "a.srt", common::SAMPLE_SRT)?;
    common::create_test_file(temp_dir.path(), "video.mkv", "binary")?;
    common::create_test_file(temp_dir.path(), "season1/c.ass", common::SAMPLE_ASS)?;

    let files = FileManager::find_subtitle_files(temp_dir.path())?;
    let names: Vec<String> = files
        .iter()
        .map(|p| p.strip_prefix(temp_dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
        .collect();

    assert_eq!(names, vec!["a.srt", "b.vtt", "season1/c.ass"]);
    Ok(())
}

#[test]
fn test_read_to_string_withMissingFile_shouldReturnIoErrorWithPath() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let missing = temp_dir.path().join("missing.srt");

    let err = FileManager::read_to_string(&missing).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    match err {
        SubtitleError::Io { path, source } => {
            assert_eq!(path, missing);
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("unexpected error: {:?}", other),
    }
    Ok(())
}

#[test]
fn test_write_atomically_withExistingFile_shouldReplaceContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "out.srt", "old")?;

    FileManager::write_atomically(&path, "new content")?;

    assert_eq!(fs::read_to_string(&path)?, "new content");
    let leftovers = fs::read_dir(temp_dir.path())?.count();
    assert_eq!(leftovers, 1, "temporary file should not be left behind");
    Ok(())
}

#[test]
fn test_write_atomically_withMissingParent_shouldCreateIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("deep").join("out.vtt");

    FileManager::write_atomically(&path, "WEBVTT\n\n")?;

    assert_eq!(fs::read_to_string(&path)?, "WEBVTT\n\n");
    Ok(())
}
