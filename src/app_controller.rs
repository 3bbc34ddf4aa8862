use anyhow::Result;
use log::{error, warn, info, debug};
use std::path::{Path, PathBuf};
use indicatif::{ProgressBar, ProgressStyle};

use crate::app_config::{Config, ToolKind};
use crate::errors::AppError;
use crate::farasa_tool::FarasaTool;
use crate::file_utils::FileManager;
use crate::pos_tagger::{self, TagOptions};
use crate::segmenter::{self, SegmentOptions};

// @module: Application controller for single-file and folder processing

/// Operation requested on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    // @op: Word segmentation
    Segment,
    // @op: Part-of-speech tagging
    PosTag,
}

impl Operation {
    // @returns: Canonical command-line name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Segment => "segment",
            Self::PosTag => "POS_tag",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Operation {
    type Err = AppError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "segment" => Ok(Self::Segment),
            "POS_tag" | "pos_tag" | "tag" => Ok(Self::PosTag),
            other => Err(AppError::UnknownFunction(other.to_string())),
        }
    }
}

/// A flow together with its options, applied to one input/output pair at a time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    /// Segmentation flow
    Segment(SegmentOptions),
    /// Tagging flow
    Tag(TagOptions),
}

impl Task {
    /// Operation this task performs
    pub fn operation(&self) -> Operation {
        match self {
            Self::Segment(_) => Operation::Segment,
            Self::Tag(_) => Operation::PosTag,
        }
    }
}

/// Outcome of a folder run
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Input/output pairs that were processed successfully
    pub processed: Vec<(PathBuf, PathBuf)>,
    /// Inputs that failed, with the error message
    pub failed: Vec<(PathBuf, String)>,
}

impl BatchReport {
    /// Number of files that were attempted
    pub fn total(&self) -> usize {
        self.processed.len() + self.failed.len()
    }
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Segmenter executable
    segmenter: FarasaTool,
    // @field: Tagger executable
    pos_tagger: FarasaTool,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()
            .map_err(|e| AppError::Config(e.to_string()))?;

        let segmenter = FarasaTool::from_config(ToolKind::Segmenter, config.tool(ToolKind::Segmenter));
        let pos_tagger = FarasaTool::from_config(ToolKind::PosTagger, config.tool(ToolKind::PosTagger));

        Ok(Self {
            config,
            segmenter,
            pos_tagger,
        })
    }

    /// Configuration in use
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run `task` on a file, or on every file of a folder
    ///
    /// For a folder, `output` is the output folder. For a file it is the
    /// output file, and the report holds that single pair.
    pub async fn run(&self, task: &Task, input: PathBuf, output: PathBuf) -> Result<BatchReport> {
        if FileManager::dir_exists(&input) {
            self.run_folder(task, &input, &output).await
        } else if FileManager::file_exists(&input) {
            self.process_file(task, &input, &output).await?;
            info!("Success: {}", output.display());
            Ok(BatchReport {
                processed: vec![(input, output)],
                failed: Vec::new(),
            })
        } else {
            Err(AppError::InputNotFound(input.display().to_string()).into())
        }
    }

    /// Apply `task` to a single input/output pair
    pub async fn process_file(&self, task: &Task, input: &Path, output: &Path) -> Result<()> {
        match task {
            Task::Segment(options) => {
                segmenter::segment(&self.segmenter, input, output, options).await
            }
            Task::Tag(options) => {
                pos_tagger::pos_tag(
                    &self.pos_tagger,
                    input,
                    output,
                    options,
                    self.config.temp_dir.as_deref(),
                ).await
            }
        }
    }

    /// Run the task on every file directly inside `input_dir`
    ///
    /// Each output keeps its input's file name. Files are handled one at a
    /// time; the first failure stops the run unless `continue_on_error` is set.
    pub async fn run_folder(&self, task: &Task, input_dir: &Path, output_dir: &Path) -> Result<BatchReport> {
        let start_time = std::time::Instant::now();

        if !FileManager::dir_exists(input_dir) {
            return Err(AppError::InputNotFound(input_dir.display().to_string()).into());
        }
        FileManager::ensure_dir(output_dir)?;

        let files = FileManager::list_files(input_dir)?;
        if files.is_empty() {
            warn!("No files found in directory: {:?}", input_dir);
            return Ok(BatchReport::default());
        }
        info!("{}: {} file(s) in {}", task.operation(), files.len(), input_dir.display());

        let folder_pb = ProgressBar::new(files.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));

        let mut report = BatchReport::default();

        for input_file in files {
            let file_name = input_file.file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(file_name.clone());

            let output_file = FileManager::output_path_for(&input_file, output_dir)?;
            debug!("{} -> {}", input_file.display(), output_file.display());

            match self.process_file(task, &input_file, &output_file).await {
                Ok(()) => {
                    info!("{}", file_name);
                    report.processed.push((input_file, output_file));
                }
                Err(e) if self.config.continue_on_error => {
                    error!("Error processing file {}: {:#}", file_name, e);
                    report.failed.push((input_file, format!("{:#}", e)));
                }
                Err(e) => {
                    folder_pb.abandon_with_message(format!("Failed on {}", file_name));
                    return Err(e.context(format!("Batch aborted at {}", file_name)));
                }
            }

            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Folder processing complete");

        info!(
            "Folder processing completed: {} processed, {} errors in {}",
            report.processed.len(),
            report.failed.len(),
            Self::format_duration(start_time.elapsed())
        );

        Ok(report)
    }

    // Format duration in a human-readable format (HH:MM:SS)
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
