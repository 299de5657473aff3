use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::playback::AutoplayPolicy;

const DEFAULT_ENV_PREFIX: &str = "REELS_TUI";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub panel: PanelConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub ui: UIConfig,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum AutoplayMode {
    Immediate,
    AfterInteraction,
}

impl From<AutoplayMode> for AutoplayPolicy {
    fn from(mode: AutoplayMode) -> Self {
        match mode {
            AutoplayMode::Immediate => AutoplayPolicy::Immediate,
            AutoplayMode::AfterInteraction => AutoplayPolicy::AfterInteraction,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerConfig {
    #[serde(default = "default_volume")]
    pub volume: f32,
    #[serde(default)]
    pub muted: bool,
    #[serde(default = "default_autoplay")]
    pub autoplay: AutoplayMode,
    #[serde(default = "default_video_command")]
    pub video_command: Vec<String>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            volume: default_volume(),
            muted: false,
            autoplay: default_autoplay(),
            video_command: default_video_command(),
        }
    }
}

fn default_volume() -> f32 {
    0.8
}

fn default_autoplay() -> AutoplayMode {
    AutoplayMode::AfterInteraction
}

fn default_video_command() -> Vec<String> {
    vec!["mpv".into(), "%URL%".into()]
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PanelConfig {
    #[serde(default = "default_open_duration", with = "humantime_serde")]
    pub open_duration: Duration,
    #[serde(default = "default_close_duration", with = "humantime_serde")]
    pub close_duration: Duration,
    #[serde(default = "default_close_threshold")]
    pub close_threshold_px: f32,
    #[serde(default = "default_drag_min")]
    pub drag_min_px: f32,
    #[serde(default = "default_dim_opacity")]
    pub dim_opacity: f32,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            open_duration: default_open_duration(),
            close_duration: default_close_duration(),
            close_threshold_px: default_close_threshold(),
            drag_min_px: default_drag_min(),
            dim_opacity: default_dim_opacity(),
        }
    }
}

fn default_open_duration() -> Duration {
    Duration::from_millis(300)
}

fn default_close_duration() -> Duration {
    Duration::from_millis(250)
}

fn default_close_threshold() -> f32 {
    100.0
}

fn default_drag_min() -> f32 {
    10.0
}

fn default_dim_opacity() -> f32 {
    0.5
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedConfig {
    #[serde(default = "default_fade_duration", with = "humantime_serde")]
    pub fade_duration: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            fade_duration: default_fade_duration(),
        }
    }
}

fn default_fade_duration() -> Duration {
    Duration::from_millis(300)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UIConfig {
    #[serde(default = "default_theme")]
    pub theme: String,
}

impl Default for UIConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
        }
    }
}

fn default_theme() -> String {
    "default".into()
}

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub config_file: Option<PathBuf>,
    pub env_prefix: Option<String>,
}

pub fn load(options: LoadOptions) -> Result<Config> {
    let mut cfg = Config::default();

    if let Some(path) = options.config_file.as_ref() {
        if path.exists() {
            cfg = read_config_file(path)?;
        }
    } else if let Some(default_path) = default_config_path() {
        if default_path.exists() {
            cfg = read_config_file(&default_path)?;
        }
    }

    let prefix = options.env_prefix.as_deref().unwrap_or(DEFAULT_ENV_PREFIX);
    apply_env(&mut cfg, prefix);

    Ok(cfg)
}

fn read_config_file(path: &Path) -> Result<Config> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file at {}", path.display()))?;
    let config: Config = serde_yaml::from_str(&data)
        .with_context(|| format!("Failed to parse config file at {}", path.display()))?;
    Ok(config)
}

fn apply_env(cfg: &mut Config, prefix: &str) {
    let upper_prefix = format!("{}_", prefix.to_uppercase());
    for (key, value) in env::vars() {
        if let Some(stripped) = key.strip_prefix(&upper_prefix) {
            let normalized = stripped.to_ascii_lowercase().replace("__", ".");
            apply_env_value(cfg, &normalized, value);
        }
    }
}

fn apply_env_value(cfg: &mut Config, key: &str, value: String) {
    match key {
        "player.volume" => {
            if let Ok(parsed) = value.parse::<f32>() {
                cfg.player.volume = parsed.clamp(0.0, 1.0);
            }
        }
        "player.muted" => {
            cfg.player.muted = matches!(value.as_str(), "1" | "true" | "TRUE" | "True");
        }
        "player.autoplay" => match value.as_str() {
            "immediate" => cfg.player.autoplay = AutoplayMode::Immediate,
            "after-interaction" => cfg.player.autoplay = AutoplayMode::AfterInteraction,
            _ => {}
        },
        "player.video_command" => {
            cfg.player.video_command = value
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        "panel.open_duration" => {
            if let Ok(duration) = humantime::parse_duration(&value) {
                cfg.panel.open_duration = duration;
            }
        }
        "panel.close_duration" => {
            if let Ok(duration) = humantime::parse_duration(&value) {
                cfg.panel.close_duration = duration;
            }
        }
        "panel.close_threshold_px" => {
            if let Ok(parsed) = value.parse::<f32>() {
                cfg.panel.close_threshold_px = parsed;
            }
        }
        "panel.drag_min_px" => {
            if let Ok(parsed) = value.parse::<f32>() {
                cfg.panel.drag_min_px = parsed;
            }
        }
        "panel.dim_opacity" => {
            if let Ok(parsed) = value.parse::<f32>() {
                cfg.panel.dim_opacity = parsed.clamp(0.0, 1.0);
            }
        }
        "feed.fade_duration" => {
            if let Ok(duration) = humantime::parse_duration(&value) {
                cfg.feed.fade_duration = duration;
            }
        }
        "ui.theme" => cfg.ui.theme = value,
        _ => {}
    }
}

pub fn default_path() -> Option<PathBuf> {
    default_config_path()
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("reels-tui").join("config.yaml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn load_defaults_without_files() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("config.yaml");
        let cfg = load(LoadOptions {
            config_file: Some(missing),
            env_prefix: Some("REELS_TUI_TEST_NONE".into()),
        })
        .unwrap();
        assert_eq!(cfg.ui.theme, "default");
        assert_eq!(cfg.player.volume, 0.8);
        assert_eq!(cfg.player.autoplay, AutoplayMode::AfterInteraction);
        assert_eq!(cfg.panel.close_threshold_px, 100.0);
    }

    #[test]
    fn reads_partial_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "player:\n  volume: 0.25\n  autoplay: immediate").unwrap();
        let cfg = load(LoadOptions {
            config_file: Some(path),
            env_prefix: Some("REELS_TUI_TEST_NONE".into()),
        })
        .unwrap();
        assert_eq!(cfg.player.volume, 0.25);
        assert_eq!(cfg.player.autoplay, AutoplayMode::Immediate);
        assert_eq!(cfg.panel.open_duration, Duration::from_millis(300));
    }

    #[test]
    fn env_overrides() {
        env::set_var("REELS_TUI_TEST_A_PLAYER__VOLUME", "0.3");
        env::set_var("REELS_TUI_TEST_A_PANEL__OPEN_DURATION", "450ms");
        let cfg = load(LoadOptions {
            config_file: Some(PathBuf::from("/nonexistent/reels.yaml")),
            env_prefix: Some("REELS_TUI_TEST_A".into()),
        })
        .unwrap();
        assert_eq!(cfg.player.volume, 0.3);
        assert_eq!(cfg.panel.open_duration, Duration::from_millis(450));
        env::remove_var("REELS_TUI_TEST_A_PLAYER__VOLUME");
        env::remove_var("REELS_TUI_TEST_A_PANEL__OPEN_DURATION");
    }

    #[test]
    fn video_command_env_splits_on_commas() {
        env::set_var("REELS_TUI_TEST_B_PLAYER__VIDEO_COMMAND", "mpv,--fs,%URL%");
        let cfg = load(LoadOptions {
            config_file: Some(PathBuf::from("/nonexistent/reels.yaml")),
            env_prefix: Some("REELS_TUI_TEST_B".into()),
        })
        .unwrap();
        assert_eq!(cfg.player.video_command, vec!["mpv", "--fs", "%URL%"]);
        env::remove_var("REELS_TUI_TEST_B_PLAYER__VIDEO_COMMAND");
    }
}
