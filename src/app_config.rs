use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;
use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::subset::{CharacterMap, GeneratorOptions, ResolverOptions};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Font used in place of fonts that cannot be found
    #[serde(default = "default_fallback_font")]
    pub fallback_font: String,

    /// Directories searched for fonts; platform defaults when empty
    #[serde(default)]
    pub font_dirs: Vec<PathBuf>,

    /// File extensions skipped while scanning font directories
    #[serde(default = "default_ignored_extensions")]
    pub ignored_extensions: Vec<String>,

    /// Custom replacement alphabet; the built-in one when absent
    #[serde(default)]
    pub character_map: Option<String>,

    /// Font engine config
    #[serde(default)]
    pub engine: EngineConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Font-editing engine configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EngineConfig {
    /// FontForge executable
    #[serde(default = "default_executable")]
    pub executable: String,

    /// Engine timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Em size every subset is scaled to before merging
    #[serde(default = "default_em_size")]
    pub em_size: u32,

    /// First private-use code point used for staging during the remap
    #[serde(default = "default_staging_base")]
    pub staging_base: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            executable: default_executable(),
            timeout_secs: default_timeout_secs(),
            em_size: default_em_size(),
            staging_base: default_staging_base(),
        }
    }
}

impl EngineConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn generator_options(&self) -> GeneratorOptions {
        GeneratorOptions {
            em_size: self.em_size,
            staging_base: self.staging_base,
        }
    }
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
    pub fn to_level_filter(&self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn default_fallback_font() -> String {
    "Arial".to_string()
}

fn default_ignored_extensions() -> Vec<String> {
    ["bak", "dat", "ini", "fon", "xml", "CompositeFont"]
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

fn default_executable() -> String {
    "fontforge".to_string()
}

fn default_timeout_secs() -> u64 {
    300 // large CJK fonts take a while to subset
}

fn default_em_size() -> u32 {
    1024
}

fn default_staging_base() -> u32 {
    0xF100
}

fn is_private_use(code: u32) -> bool {
    matches!(code, 0xE000..=0xF8FF | 0xF0000..=0xFFFFD | 0x100000..=0x10FFFD)
}

impl Config {
    /// Load a configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(|e| AppError::Config(format!("Failed to parse config file {:?}: {}", path, e)))
    }

    /// Save the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), AppError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| AppError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), AppError> {
        if self.fallback_font.trim().is_empty() {
            return Err(AppError::Config("Fallback font name must not be empty".to_string()));
        }

        if self.engine.executable.trim().is_empty() {
            return Err(AppError::Config("Font engine executable must not be empty".to_string()));
        }

        if self.engine.timeout_secs == 0 {
            return Err(AppError::Config("Font engine timeout must be at least one second".to_string()));
        }

        if self.engine.em_size < 16 || self.engine.em_size > 16384 {
            return Err(AppError::Config(format!("Em size {} is out of range (16-16384)", self.engine.em_size)));
        }

        if !is_private_use(self.engine.staging_base) {
            return Err(AppError::Config(format!(
                "Staging base U+{:04X} is not a private-use code point",
                self.engine.staging_base
            )));
        }

        self.character_map()?;
        Ok(())
    }

    /// The replacement alphabet to use
    pub fn character_map(&self) -> Result<CharacterMap, AppError> {
        match &self.character_map {
            Some(alphabet) => CharacterMap::from_alphabet(alphabet),
            None => Ok(CharacterMap::default()),
        }
    }

    pub fn resolver_options(&self) -> ResolverOptions {
        ResolverOptions {
            fallback_font: self.fallback_font.clone(),
            ignored_extensions: self.ignored_extensions.clone(),
        }
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            fallback_font: default_fallback_font(),
            font_dirs: Vec::new(),
            ignored_extensions: default_ignored_extensions(),
            character_map: None,
            engine: EngineConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
