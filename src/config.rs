use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_UPLOAD_BASE_URL: &str = "https://apis.roblox.com";

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub classification: ClassificationConfig,
    pub overrides: Vec<OverrideRule>,
    pub stroke: StrokeThresholds,
    pub upload: UploadConfig,
    pub text: TextConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    /// Name substring that forces a node to be rasterized whole.
    pub flatten_marker: String,
    /// Regexes matched against node names to decide click targets.
    pub interactive_patterns: Vec<String>,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            flatten_marker: "[flatten]".to_string(),
            interactive_patterns: vec![
                r"(?i)button".to_string(),
                r"(?i)\bbtn\b".to_string(),
                r"(?i)toggle".to_string(),
                r"(?i)checkbox".to_string(),
                r"(?i)\btab\b".to_string(),
                r"(?i)close".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Exact,
    Contains,
    Regex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverrideAction {
    /// Stretch on both axes regardless of declared constraints.
    Stretch,
    /// Center-align text children of the matched node.
    CenterText,
    /// Keep only the first of identical text children.
    DedupeTextChildren,
    /// Rasterize the matched node whole.
    Flatten,
    /// Always give the matched node a click target.
    Interactive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverrideRule {
    #[serde(rename = "match")]
    pub match_kind: MatchKind,
    pub name: String,
    pub action: OverrideAction,
}

/// Stroke-simulation detection thresholds, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrokeThresholds {
    pub cluster_radius: f64,
    pub max_spread: f64,
    pub min_group: usize,
}

impl Default for StrokeThresholds {
    fn default() -> Self {
        Self {
            cluster_radius: 6.0,
            max_spread: 8.0,
            min_group: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Creator {
    UserId(String),
    GroupId(String),
}

impl Creator {
    pub fn from_env() -> Option<Self> {
        if let Ok(id) = std::env::var("ROBLOX_CREATOR_ID") {
            if !id.is_empty() {
                return Some(Self::UserId(id));
            }
        }
        if let Ok(id) = std::env::var("ROBLOX_GROUP_ID") {
            if !id.is_empty() {
                return Some(Self::GroupId(id));
            }
        }
        None
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub base_url: String,
    pub asset_type: String,
    pub creator: Option<Creator>,
    #[serde(with = "humantime_serde")]
    pub poll_interval: Duration,
    pub max_poll_attempts: u32,
    #[serde(with = "humantime_serde")]
    pub inter_upload_delay: Duration,
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_UPLOAD_BASE_URL.to_string(),
            asset_type: "Decal".to_string(),
            creator: None,
            poll_interval: Duration::from_secs(2),
            max_poll_attempts: 30,
            inter_upload_delay: Duration::from_millis(500),
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextExportMode {
    /// Plain `Text`; decorations are dropped.
    #[default]
    Plain,
    /// `RichText` markup for underline/strikethrough.
    Rich,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    pub mode: TextExportMode,
    /// Built-in family used when a design font has no mapping.
    pub default_font: String,
    /// Extra design family → engine family mappings, checked before the built-ins.
    pub fonts: BTreeMap<String, String>,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            mode: TextExportMode::default(),
            default_font: "BuilderSans".to_string(),
            fonts: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Load from an explicit path, the central config, or fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigLoadError> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        match Self::central_config_path() {
            Some(central) if central.exists() => Self::from_file(&central),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigLoadError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    pub fn central_config_path() -> Option<PathBuf> {
        std::env::var_os("HOME").map(|home| {
            PathBuf::from(home)
                .join(".config")
                .join("figrbx")
                .join("config.toml")
        })
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.stroke.cluster_radius <= 0.0 {
            return Err("stroke.cluster_radius must be greater than zero".into());
        }
        if self.stroke.max_spread < 0.0 {
            return Err("stroke.max_spread must not be negative".into());
        }
        if self.stroke.min_group < 2 {
            return Err("stroke.min_group must be at least 2".into());
        }
        if self.upload.max_poll_attempts == 0 {
            return Err("upload.max_poll_attempts must be at least 1".into());
        }
        if self.upload.asset_type.trim().is_empty() {
            return Err("upload.asset_type must not be empty".into());
        }
        if self.text.default_font.trim().is_empty() {
            return Err("text.default_font must not be empty".into());
        }
        crate::overrides::RuleSet::from_config(self).map_err(|e| e.to_string())?;
        Ok(())
    }
}
