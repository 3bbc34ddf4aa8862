use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Farasa segmenter invocation
    #[serde(default = "ToolConfig::segmenter", deserialize_with = "deserialize_segmenter")]
    pub segmenter: ToolConfig,

    /// Farasa POS tagger invocation
    #[serde(default = "ToolConfig::pos_tagger", deserialize_with = "deserialize_pos_tagger")]
    pub pos_tagger: ToolConfig,

    /// Directory for intermediate files (system temp dir when unset)
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,

    /// Keep processing the remaining files of a folder after a failure
    #[serde(default)]
    pub continue_on_error: bool,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Which of the two Farasa tools a configuration refers to
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    // @tool: Word segmenter
    Segmenter,
    // @tool: Part-of-speech tagger
    PosTagger,
}

impl ToolKind {
    // @returns: Human readable tool name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Segmenter => "Farasa segmenter",
            Self::PosTagger => "Farasa POS tagger",
        }
    }
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// How to launch one external tool
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ToolConfig {
    // @field: Executable to run (the JVM by default)
    #[serde(default = "default_program")]
    pub program: String,

    // @field: Path to the jar handed to `-jar`; empty means run `program` directly
    #[serde(default)]
    pub jar: String,

    // @field: Text encoding forced on the tool
    #[serde(default = "default_encoding")]
    pub encoding: String,

    // @field: Extra arguments placed before `-i`
    #[serde(default)]
    pub extra_args: Vec<String>,

    // @field: Timeout seconds, none waits forever
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl ToolConfig {
    /// Default segmenter configuration
    pub fn segmenter() -> Self {
        Self {
            program: default_program(),
            jar: default_segmenter_jar(),
            encoding: default_encoding(),
            extra_args: Vec::new(),
            timeout_secs: None,
        }
    }

    /// Default POS tagger configuration
    pub fn pos_tagger() -> Self {
        Self {
            program: default_program(),
            jar: default_pos_tagger_jar(),
            encoding: default_encoding(),
            extra_args: Vec::new(),
            timeout_secs: None,
        }
    }

    /// Arguments placed between the program and `-i <input>`
    ///
    /// For a jar this is `-Dfile.encoding=<enc> -jar <jar>` followed by any
    /// extra arguments; without a jar only the extra arguments are passed.
    pub fn base_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if !self.jar.is_empty() {
            args.push(format!("-Dfile.encoding={}", self.encoding));
            args.push("-jar".to_string());
            args.push(self.jar.clone());
        }
        args.extend(self.extra_args.iter().cloned());
        args
    }

    fn validate(&self, kind: ToolKind) -> Result<()> {
        if self.program.trim().is_empty() {
            return Err(anyhow!("{}: program must not be empty", kind));
        }
        if !self.jar.is_empty() && self.encoding.trim().is_empty() {
            return Err(anyhow!("{}: encoding must not be empty", kind));
        }
        if self.timeout_secs == Some(0) {
            return Err(anyhow!("{}: timeout_secs must be greater than zero", kind));
        }
        Ok(())
    }
}

/// Fields of a tool section as written in the file; unset fields keep the
/// defaults of that tool, so a section holding only `timeout_secs` still
/// points at the right jar
#[derive(Debug, Deserialize)]
struct ToolConfigOverrides {
    program: Option<String>,
    jar: Option<String>,
    encoding: Option<String>,
    extra_args: Option<Vec<String>>,
    timeout_secs: Option<u64>,
}

impl ToolConfigOverrides {
    fn apply_to(self, mut config: ToolConfig) -> ToolConfig {
        if let Some(program) = self.program {
            config.program = program;
        }
        if let Some(jar) = self.jar {
            config.jar = jar;
        }
        if let Some(encoding) = self.encoding {
            config.encoding = encoding;
        }
        if let Some(extra_args) = self.extra_args {
            config.extra_args = extra_args;
        }
        if self.timeout_secs.is_some() {
            config.timeout_secs = self.timeout_secs;
        }
        config
    }
}

fn deserialize_segmenter<'de, D>(deserializer: D) -> std::result::Result<ToolConfig, D::Error>
where
    D: Deserializer<'de>,
{
    ToolConfigOverrides::deserialize(deserializer).map(|o| o.apply_to(ToolConfig::segmenter()))
}

fn deserialize_pos_tagger<'de, D>(deserializer: D) -> std::result::Result<ToolConfig, D::Error>
where
    D: Deserializer<'de>,
{
    ToolConfigOverrides::deserialize(deserializer).map(|o| o.apply_to(ToolConfig::pos_tagger()))
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching filter for the `log` facade
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_program() -> String {
    "java".to_string()
}

fn default_encoding() -> String {
    "UTF-8".to_string()
}

fn default_segmenter_jar() -> String {
    "dist/FarasaSegmenterJar.jar".to_string()
}

fn default_pos_tagger_jar() -> String {
    "dist/FarasaPOSJar.jar".to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        self.segmenter.validate(ToolKind::Segmenter)?;
        self.pos_tagger.validate(ToolKind::PosTagger)?;

        if let Some(dir) = &self.temp_dir {
            if dir.as_os_str().is_empty() {
                return Err(anyhow!("temp_dir must not be an empty path"));
            }
        }

        Ok(())
    }

    /// Tool configuration for the given kind
    pub fn tool(&self, kind: ToolKind) -> &ToolConfig {
        match kind {
            ToolKind::Segmenter => &self.segmenter,
            ToolKind::PosTagger => &self.pos_tagger,
        }
    }

    /// Load a configuration file, writing a default one first if it does not exist
    ///
    /// Returns the configuration and whether it was freshly created.
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<(Self, bool)> {
        let path = path.as_ref();
        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok((config, false));
        }

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write default config to file: {}", path.display()))?;

        Ok((config, true))
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            segmenter: ToolConfig::segmenter(),
            pos_tagger: ToolConfig::pos_tagger(),
            temp_dir: None,
            continue_on_error: false,
            log_level: LogLevel::default(),
        }
    }
}
