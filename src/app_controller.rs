use anyhow::{anyhow, Context, Result};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app_config::Config;
use crate::errors::ProviderFailure;
use crate::file_utils::FileManager;
use crate::formats::{self, ImportOutcome, ImportWarning, SubtitleFormat};
use crate::language_utils;
use crate::project::{JsonFileProjectStore, Project, ProjectStore};
use crate::providers::fallback;
use crate::providers::{
    MediaSource, TranscriptionProvider, TranscriptionRequest, TranslationProvider,
    TranslationRequest,
};
use crate::subtitle::SubtitleDocument;

// @module: Application controller for subtitle conversion and projects

/// Outcome of converting one file
#[derive(Debug, Clone)]
pub struct ConversionReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub cue_count: usize,
    /// Blocks skipped while reading the input
    pub warnings: Vec<ImportWarning>,
    /// True when the output already existed and was left alone
    pub skipped: bool,
}

/// Summary of a subtitle file, as shown by `subgen info`
#[derive(Debug, Clone)]
pub struct DocumentSummary {
    pub format: SubtitleFormat,
    pub cue_count: usize,
    /// End of the last cue, in seconds
    pub duration: f64,
    pub speakers: Vec<String>,
    pub language: Option<String>,
    pub import_warnings: Vec<ImportWarning>,
    /// Cues that start before the cue preceding them
    pub out_of_order: usize,
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Project persistence
    store: Arc<dyn ProjectStore>,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    /// and an in-memory project store
    pub fn new_for_test() -> Result<Self> {
        Ok(Self::with_store(
            Config::default(),
            Arc::new(crate::project::MemoryProjectStore::new()),
        ))
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let store = match &config.store.path {
            Some(path) => JsonFileProjectStore::new(path),
            None => JsonFileProjectStore::new_default()?,
        };
        debug!("Using project store at {}", store.path().display());
        Ok(Self::with_store(config, Arc::new(store)))
    }

    pub fn with_store(config: Config, store: Arc<dyn ProjectStore>) -> Self {
        Self { config, store }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read and import a subtitle file, applying configured document options.
    /// SRT and VTT carry no style, so they get the configured style.
    pub fn load_document(&self, input_file: &Path) -> Result<(SubtitleFormat, ImportOutcome)> {
        let format = FileManager::subtitle_format(input_file)?;
        let content = FileManager::read_to_string(input_file)?;

        let mut outcome = formats::import(&content, format);
        if format != SubtitleFormat::Ass {
            outcome.document.set_style(self.config.style.clone());
        }
        outcome.document.set_options(self.config.document.options());

        Ok((format, outcome))
    }

    fn output_dir_for(&self, input_file: &Path, output_dir: Option<&Path>) -> PathBuf {
        output_dir
            .map(Path::to_path_buf)
            .or_else(|| self.config.export.output_dir.clone())
            .or_else(|| input_file.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Convert one subtitle file to another format
    pub fn convert_file(
        &self,
        input_file: &Path,
        output_dir: Option<&Path>,
        to: SubtitleFormat,
        force_overwrite: bool,
    ) -> Result<ConversionReport> {
        if !input_file.is_file() {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        let output_dir = self.output_dir_for(input_file, output_dir);
        let output_path = FileManager::generate_output_path(input_file, &output_dir, None, to);
        if output_path == input_file {
            return Err(anyhow!(
                "Refusing to overwrite the input file {:?}; choose another format or output directory",
                input_file
            ));
        }

        let force_overwrite = force_overwrite || self.config.export.force_overwrite;
        if output_path.exists() && !force_overwrite {
            warn!("Skipping {:?}, output already exists (use -f to force overwrite)", output_path);
            return Ok(ConversionReport {
                input: input_file.to_path_buf(),
                output: output_path,
                cue_count: 0,
                warnings: Vec::new(),
                skipped: true,
            });
        }

        let (from, outcome) = self
            .load_document(input_file)
            .with_context(|| format!("Failed to load {:?}", input_file))?;
        let rendered = formats::export(&outcome.document, to);
        FileManager::write_to_file(&output_path, &rendered)?;

        info!(
            "Converted {:?} ({} -> {}, {} cues)",
            output_path.file_name().unwrap_or_default(),
            from,
            to,
            outcome.document.len()
        );

        Ok(ConversionReport {
            input: input_file.to_path_buf(),
            output: output_path,
            cue_count: outcome.document.len(),
            warnings: outcome.warnings,
            skipped: false,
        })
    }

    /// Convert every subtitle file under a directory. Files already in the
    /// target format are left out; failures are logged and do not stop the run.
    pub fn convert_folder(
        &self,
        input_dir: &Path,
        to: SubtitleFormat,
        force_overwrite: bool,
    ) -> Result<Vec<ConversionReport>> {
        if !input_dir.is_dir() {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let files = FileManager::find_subtitle_files(input_dir, Some(to))?;
        if files.is_empty() {
            warn!("No subtitle files to convert in {:?}", input_dir);
            return Ok(Vec::new());
        }

        info!("Converting {} files to {}", files.len(), to);
        let mut reports = Vec::with_capacity(files.len());
        for file in files {
            match self.convert_file(&file, None, to, force_overwrite) {
                Ok(report) => reports.push(report),
                Err(e) => error!("Error converting {:?}: {:#}", file, e),
            }
        }

        let converted = reports.iter().filter(|r| !r.skipped).count();
        info!("Finished: {} converted, {} skipped", converted, reports.len() - converted);
        Ok(reports)
    }

    /// Inspect a subtitle file
    pub fn describe_file(&self, input_file: &Path) -> Result<DocumentSummary> {
        let (format, outcome) = self.load_document(input_file)?;
        let document = &outcome.document;

        let mut speakers: Vec<String> = Vec::new();
        for speaker in document.iter().filter_map(|c| c.speaker()) {
            if !speakers.iter().any(|s| s == speaker) {
                speakers.push(speaker.to_string());
            }
        }

        Ok(DocumentSummary {
            format,
            cue_count: document.len(),
            duration: document.duration(),
            speakers,
            language: document.language().map(str::to_string),
            out_of_order: document.ordering_warnings().len(),
            import_warnings: outcome.warnings,
        })
    }

    /// Transcribe media with the configured language hint, preset and fallback
    pub async fn transcribe(
        &self,
        provider: &dyn TranscriptionProvider,
        media: MediaSource,
    ) -> Result<SubtitleDocument, ProviderFailure> {
        let settings = &self.config.transcription;
        let request = TranscriptionRequest {
            media,
            language_hint: settings.language_hint.clone(),
            preset: settings.preset,
        };

        let mut document =
            fallback::transcribe_or_fallback(provider, &request, settings.fallback).await?;
        if document.language().is_none() {
            document.set_language(settings.language_hint.clone());
        }
        document.set_style(self.config.style.clone());
        document.set_options(self.config.document.options());
        Ok(document)
    }

    /// Translate a document to the configured target language. A document
    /// already in the target language is returned as is.
    pub async fn translate(
        &self,
        provider: &dyn TranslationProvider,
        document: &SubtitleDocument,
    ) -> Result<SubtitleDocument, ProviderFailure> {
        let settings = &self.config.translation;
        if let Some(language) = document.language() {
            if language_utils::language_codes_match(language, &settings.target_language) {
                info!("Document is already in {}, skipping translation", settings.target_language);
                return Ok(document.clone());
            }
        }

        let request = TranslationRequest {
            document: document.clone(),
            target_language: settings.target_language.clone(),
            mode: settings.mode,
        };
        fallback::translate_or_fallback(provider, &request, settings.fallback).await
    }

    /// All stored projects, newest first as stored
    pub fn projects(&self) -> Result<Vec<Project>> {
        self.store
            .load_all()
            .context("Failed to load projects")
    }

    pub fn save_project(&self, project: Project) -> Result<()> {
        self.store
            .save(project)
            .context("Failed to save project")
    }

    /// Export a stored project's document next to `output_dir`
    pub fn export_project(
        &self,
        project_id: &str,
        format: SubtitleFormat,
        output_dir: &Path,
        force_overwrite: bool,
    ) -> Result<PathBuf> {
        let project = self
            .store
            .get(project_id)
            .with_context(|| format!("Failed to load project {}", project_id))?;

        let file_name = format!("{}.{}", sanitize_file_stem(&project.name), format.extension());
        let output_path = output_dir.join(file_name);
        if output_path.exists() && !(force_overwrite || self.config.export.force_overwrite) {
            return Err(anyhow!(
                "Output file already exists: {:?}. Use -f to force overwrite.",
                output_path
            ));
        }

        FileManager::write_to_file(&output_path, &formats::export(&project.document, format))?;
        info!("Exported project '{}' to {:?}", project.name, output_path);
        Ok(output_path)
    }
}

/// Project names are free text; keep file names portable
fn sanitize_file_stem(name: &str) -> String {
    let stem: String = name
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if stem.is_empty() {
        "project".to_string()
    } else {
        stem
    }
}
