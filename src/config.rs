use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Temperatures at or above this are flagged in the extremes table.
pub const DEFAULT_HIGH_TEMP_THRESHOLD: f64 = 31.0;

/// Runtime settings.
///
/// Resolved in increasing precedence from built-in defaults, an optional JSON
/// file, and environment variables (including a `.env` file):
/// ```json
/// {
///   "log_file_path": "logs/office_temp_monitor.log",
///   "output_dir": "output",
///   "font_path": "/usr/share/fonts/truetype/nanum/NanumGothic.ttf",
///   "high_temp_threshold": 31.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub log_file_path: PathBuf,
    pub output_dir: PathBuf,
    pub font_path: Option<PathBuf>,
    pub high_temp_threshold: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_file_path: PathBuf::from("logs/office_temp_monitor.log"),
            output_dir: PathBuf::from("output"),
            font_path: None,
            high_temp_threshold: DEFAULT_HIGH_TEMP_THRESHOLD,
        }
    }
}

impl Settings {
    /// Loads settings from an optional JSON file, then applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        base.with_env(|key| std::env::var(key).ok())
    }

    /// Parses a JSON settings file; missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let settings = serde_json::from_str(&content)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(settings)
    }

    fn with_env(mut self, var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(v) = var("LOG_FILE_PATH") {
            self.log_file_path = v.into();
        }
        if let Some(v) = var("OUTPUT_DIR") {
            self.output_dir = v.into();
        }
        if let Some(v) = var("FONT_PATH") {
            self.font_path = Some(v.into());
        }
        if let Some(v) = var("HIGH_TEMP_THRESHOLD") {
            self.high_temp_threshold = v
                .trim()
                .parse()
                .with_context(|| format!("HIGH_TEMP_THRESHOLD must be a number, got `{v}`"))?;
        }
        Ok(self)
    }
}
