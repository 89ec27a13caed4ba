use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    lint::LintRules,
    matcher::{DEFAULT_MATCH_THRESHOLD, DEFAULT_MATCH_WINDOW, FuzzyMatcher},
    model::DEFAULT_NARRATION_SECONDS,
    sync::{DEFAULT_FADE_IN_SECONDS, DEFAULT_SETTLE_SECONDS, SyncSettings},
    wrap::{DEFAULT_BREAK_SEARCH_RADIUS, DEFAULT_SUBTITLE_MAX_CHARS},
};

pub const CONFIG_FILE_NAME: &str = "subsync.config.toml";
pub const CONFIG_PATH_ENV: &str = "SUBSYNC_CONFIG_PATH";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub manifest: ManifestConfig,
    pub sync: SyncConfig,
    pub subtitle: SubtitleConfig,
    pub lint: LintRules,
    pub diagnostics: DiagnosticsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestConfig {
    pub path: PathBuf,
    pub audio_root: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub window: usize,
    pub threshold: f64,
    pub default_duration: f64,
    pub fade_in_seconds: f64,
    pub settle_seconds: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SubtitleConfig {
    pub max_chars: usize,
    pub search_radius: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    pub log_filter: String,
    pub file_prefix: String,
    /// Write a JSON log file per session under `--log-dir`.
    pub json_file: bool,
    pub show_targets: bool,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("media/audio/audio_map.json"),
            audio_root: PathBuf::from("."),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_MATCH_WINDOW,
            threshold: DEFAULT_MATCH_THRESHOLD,
            default_duration: DEFAULT_NARRATION_SECONDS,
            fade_in_seconds: DEFAULT_FADE_IN_SECONDS,
            settle_seconds: DEFAULT_SETTLE_SECONDS,
        }
    }
}

impl Default for SubtitleConfig {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_SUBTITLE_MAX_CHARS,
            search_radius: DEFAULT_BREAK_SEARCH_RADIUS,
        }
    }
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            log_filter: "info,subsync_core=debug".to_string(),
            file_prefix: "subsync".to_string(),
            json_file: true,
            show_targets: false,
        }
    }
}

impl AppConfig {
    /// Reads `explicit` when given, otherwise the discovered config file; with no
    /// config file anywhere the defaults are used.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config_path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => discover_config_path()?,
        };
        let Some(config_path) = config_path else {
            debug!("no config file found, using defaults");
            return Ok(Self::default());
        };

        Self::from_file(&config_path)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: AppConfig = toml::from_str(&content)
            .with_context(|| format!("failed to parse config TOML from {}", path.display()))?;
        Ok(config)
    }

    #[must_use]
    pub fn sync_settings(&self) -> SyncSettings {
        SyncSettings {
            matcher: FuzzyMatcher::new(self.sync.window, self.sync.threshold),
            default_duration: self.sync.default_duration,
            fade_in_seconds: self.sync.fade_in_seconds,
            settle_seconds: self.sync.settle_seconds,
            max_chars: self.subtitle.max_chars,
            search_radius: self.subtitle.search_radius,
            audio_root: self.manifest.audio_root.clone(),
        }
    }
}

fn discover_config_path() -> Result<Option<PathBuf>> {
    if let Some(path) = env::var_os(CONFIG_PATH_ENV) {
        let path = PathBuf::from(path);
        if path.is_file() {
            return Ok(Some(path));
        }
    }

    let cwd = env::current_dir().context("failed to resolve current directory")?;
    let candidates = [
        cwd.join(CONFIG_FILE_NAME),
        cwd.join("..").join(CONFIG_FILE_NAME),
    ];
    Ok(candidates.into_iter().find(|path| path.is_file()))
}
