/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use std::path::Path;

use subgen::file_utils::{FileManager, FileType};
use subgen::formats::SubtitleFormat;

use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_fileExists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "exists.srt", "content")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::file_exists(temp_dir.path()));
    Ok(())
}

#[test]
fn test_dirExists_withNonExistentDir_shouldReturnFalse() {
    assert!(!FileManager::dir_exists("./non_existent_directory_12345"));
}

#[test]
fn test_generateOutputPath_withValidInputs_shouldCreateCorrectPath() {
    let output_path = FileManager::generate_output_path(
        Path::new("/tmp/input/video.srt"),
        Path::new("/tmp/output"),
        Some("fr"),
        SubtitleFormat::Ass,
    );

    assert_eq!(output_path, Path::new("/tmp/output/video.fr.ass"));
}

#[test]
fn test_subtitleFormat_withMediaFile_shouldFail() {
    assert_eq!(FileManager::detect_file_type("clip.MKV"), FileType::Media);
    assert!(FileManager::subtitle_format("clip.mkv").is_err());
    assert_eq!(FileManager::subtitle_format("clip.vtt").unwrap(), SubtitleFormat::Vtt);
}

#[test]
fn test_writeToFile_shouldCreateParentDirectories() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("a").join("b").join("out.vtt");

    FileManager::write_to_file(&path, "WEBVTT\n")?;

    assert_eq!(FileManager::read_to_string(&path)?, "WEBVTT\n");
    Ok(())
}

#[test]
fn test_findSubtitleFiles_shouldReturnSortedPaths() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_subtitle(temp_dir.path(), "b.srt")?;
    common::create_test_subtitle(temp_dir.path(), "a.srt")?;
    common::create_test_file(temp_dir.path(), "movie.mp4", "")?;

    let files = FileManager::find_subtitle_files(temp_dir.path(), None)?;

    assert_eq!(
        files,
        vec![temp_dir.path().join("a.srt"), temp_dir.path().join("b.srt")]
    );
    Ok(())
}
