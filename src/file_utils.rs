use anyhow::{anyhow, Context, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::formats::SubtitleFormat;

// @module: File and directory utilities

/// Kinds of files the CLI handles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// Subtitle file in a supported format
    Subtitle(SubtitleFormat),
    /// Video or audio file that could be transcribed
    Media,
    /// Unknown file type
    Unknown,
}

const MEDIA_EXTENSIONS: [&str; 18] = [
    "mp4", "mkv", "avi", "mov", "wmv", "flv", "webm", "m4v", "mpg", "mpeg", "ogv", "ts",
    "mp3", "wav", "m4a", "aac", "flac", "ogg",
];

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
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    /// Classify a path by its extension
    pub fn detect_file_type<P: AsRef<Path>>(path: P) -> FileType {
        let Some(ext) = path.as_ref().extension() else {
            return FileType::Unknown;
        };
        let ext = ext.to_string_lossy().to_lowercase();

        if let Some(format) = SubtitleFormat::from_extension(&ext) {
            return FileType::Subtitle(format);
        }
        if MEDIA_EXTENSIONS.contains(&ext.as_str()) {
            return FileType::Media;
        }
        FileType::Unknown
    }

    /// Subtitle format of a file, from its extension
    pub fn subtitle_format<P: AsRef<Path>>(path: P) -> Result<SubtitleFormat> {
        match Self::detect_file_type(&path) {
            FileType::Subtitle(format) => Ok(format),
            _ => Err(anyhow!("Not a subtitle file: {:?}", path.as_ref())),
        }
    }

    // @generates: Output path for a converted subtitle
    // @params: input_file, output_dir, optional language tag, format
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
        language: Option<&str>,
        format: SubtitleFormat,
    ) -> PathBuf {
        let stem = input_file.as_ref().file_stem().unwrap_or_default();

        let mut output_filename = stem.to_string_lossy().to_string();
        if let Some(language) = language {
            output_filename.push('.');
            output_filename.push_str(language);
        }
        output_filename.push('.');
        output_filename.push_str(format.extension());

        output_dir.as_ref().join(output_filename)
    }

    /// Find subtitle files in a directory tree, optionally excluding one format
    pub fn find_subtitle_files<P: AsRef<Path>>(
        dir: P,
        exclude: Option<SubtitleFormat>,
    ) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true).sort_by_file_name() {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            if let FileType::Subtitle(format) = Self::detect_file_type(path) {
                if Some(format) != exclude {
                    result.push(path.to_path_buf());
                }
            }
        }

        debug!("Found {} subtitle files under {:?}", result.len(), dir.as_ref());
        Ok(result)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))
    }
}
