use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::errors::{SubtitleError, SubtitleResult};
use crate::file_utils::FileManager;
use crate::formats::SubtitleFormat;
use crate::style_engine::{self, StyleOptions};
use crate::subtitle_processor::SubtitleCollection;
use crate::theme::{Theme, ThemeRegistry};

// @module: Application controller for subtitle conversion and styling

/// Outcome of a folder conversion
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Files written
    pub converted: usize,
    /// Files left alone because the output already existed or equals the input
    pub skipped: usize,
    /// Files that failed, with the reason
    pub failed: Vec<(PathBuf, String)>,
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Built-in plus configured themes
    registry: ThemeRegistry,
}

impl Controller {
    /// Create a new controller with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        let registry = config.theme_registry()?;

        Ok(Self { config, registry })
    }

    /// Configuration in use
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Themes available to `style_file`
    pub fn registry(&self) -> &ThemeRegistry {
        &self.registry
    }

    /// Register a theme for later styling calls, shadowing any theme of the same name
    pub fn register_theme(&mut self, theme: Theme) -> Result<()> {
        let name = theme.name.clone();
        self.registry
            .register(theme)
            .with_context(|| format!("Failed to register theme '{}'", name))
    }

    /// Convert `input` into `target` format at `output`
    pub fn convert_file(&self, input: &Path, output: &Path, target: SubtitleFormat) -> Result<()> {
        Self::convert_path(input, output, target)
            .with_context(|| format!("Failed to convert {} to {}", input.display(), target))
    }

    fn convert_path(input: &Path, output: &Path, target: SubtitleFormat) -> SubtitleResult<()> {
        ensure_input_exists(input)?;

        let collection = SubtitleCollection::from_file(input)?;
        collection.write_to_file(output, target)?;

        info!(
            "Converted {} ({} entries) to {}",
            input.display(),
            collection.len(),
            output.display()
        );
        Ok(())
    }

    /// Write a styled ASS version of `input` to `output`.
    ///
    /// Unset options fall back to the configured style defaults. The theme is
    /// resolved before anything is read, so an unknown theme leaves no output.
    pub fn style_file(&self, input: &Path, output: &Path, options: &StyleOptions) -> Result<()> {
        let options = self.config.style.merge_into(options);
        let theme = options
            .resolve_theme(&self.registry)
            .context("Failed to resolve theme")?;

        self.style_with_theme(input, output, &theme)
            .with_context(|| format!("Failed to style {}", input.display()))?;

        info!(
            "Styled {} with theme '{}' into {}",
            input.display(),
            theme.name,
            output.display()
        );
        Ok(())
    }

    fn style_with_theme(&self, input: &Path, output: &Path, theme: &Theme) -> SubtitleResult<()> {
        ensure_input_exists(input)?;

        let format = FileManager::detect_format(input)?;
        let content = FileManager::read_to_string(input)?;
        let styled = style_engine::apply_theme(&content, format, theme)?;

        FileManager::write_atomically(output, &styled)
    }

    /// Conversion entry point taking loosely typed arguments.
    ///
    /// No conversion options are recognized yet; any given are logged and ignored.
    pub fn convert_with_options(
        &self,
        input: &str,
        output: &str,
        target_format: &str,
        options: &HashMap<String, String>,
    ) -> Result<()> {
        require_argument("input path", input)?;
        require_argument("output path", output)?;
        require_argument("target format", target_format)?;

        let target = SubtitleFormat::from_name(target_format)?;
        for key in options.keys() {
            debug!("Ignoring conversion option '{}'", key);
        }

        self.convert_file(Path::new(input), Path::new(output), target)
    }

    /// Styling entry point taking loosely typed arguments
    pub fn style_with_options(
        &self,
        input: &str,
        output: &str,
        options: &HashMap<String, String>,
    ) -> Result<()> {
        require_argument("input path", input)?;
        require_argument("output path", output)?;

        let options = StyleOptions::from_option_map(options)?;
        self.style_file(Path::new(input), Path::new(output), &options)
    }

    /// Convert every subtitle file under `input_dir` into `output_dir`.
    ///
    /// Conversions run on the blocking pool, at most `batch.concurrent_files`
    /// at a time. A failing file is recorded and does not stop the others.
    pub async fn run_folder(
        &self,
        input_dir: PathBuf,
        output_dir: PathBuf,
        target: SubtitleFormat,
        force_overwrite: bool,
    ) -> Result<BatchSummary> {
        if !FileManager::dir_exists(&input_dir) {
            return Err(SubtitleError::io(
                &input_dir,
                std::io::Error::new(std::io::ErrorKind::NotFound, "input directory does not exist"),
            )
            .into());
        }

        let files = FileManager::find_subtitle_files(&input_dir)?;
        FileManager::ensure_dir(&output_dir)?;

        let mut summary = BatchSummary::default();
        let mut jobs = Vec::with_capacity(files.len());
        for input in files {
            let output = FileManager::generate_output_path(&input, &output_dir, target);
            if output == input {
                debug!("Skipping {}, already in {} format", input.display(), target);
                summary.skipped += 1;
            } else if output.exists() && !force_overwrite {
                warn!("Skipping {}, output already exists (use -f to force overwrite)", output.display());
                summary.skipped += 1;
            } else {
                jobs.push((input, output));
            }
        }

        let progress = ProgressBar::new(jobs.len() as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress.set_style(style.progress_chars("#>-"));
        progress.set_message(format!("Converting to {}", target));

        let concurrency = self.config.batch.concurrent_files.max(1);
        let task_progress = progress.clone();
        let results: Vec<(PathBuf, Result<(), String>)> = stream::iter(jobs)
            .map(move |(input, output)| {
                let progress = task_progress.clone();
                async move {
                    let task_input = input.clone();
                    let joined = tokio::task::spawn_blocking(move || {
                        Self::convert_path(&task_input, &output, target)
                    })
                    .await;
                    progress.inc(1);

                    let outcome = match joined {
                        Ok(Ok(())) => Ok(()),
                        Ok(Err(e)) => Err(e.to_string()),
                        Err(e) => Err(format!("conversion task failed: {}", e)),
                    };
                    (input, outcome)
                }
            })
            .buffer_unordered(concurrency)
            .collect()
            .await;
        progress.finish_and_clear();

        for (input, outcome) in results {
            match outcome {
                Ok(()) => summary.converted += 1,
                Err(reason) => {
                    error!("Failed to convert {}: {}", input.display(), reason);
                    summary.failed.push((input, reason));
                }
            }
        }

        info!(
            "Folder conversion finished: {} converted, {} skipped, {} failed",
            summary.converted,
            summary.skipped,
            summary.failed.len()
        );
        Ok(summary)
    }
}

fn ensure_input_exists(input: &Path) -> SubtitleResult<()> {
    if FileManager::file_exists(input) {
        return Ok(());
    }
    Err(SubtitleError::io(
        input,
        std::io::Error::new(std::io::ErrorKind::NotFound, "input file does not exist"),
    ))
}

fn require_argument(name: &str, value: &str) -> SubtitleResult<()> {
    if value.trim().is_empty() {
        return Err(SubtitleError::InvalidArgument(format!("{} is empty", name)));
    }
    Ok(())
}
