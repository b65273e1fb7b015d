use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: Logging,
    pub player: Player,
    pub navigation: Navigation,
    pub display: Display,
    pub merge: Merge,
    pub formats: Formats,
}

impl Config {
    pub fn load(path_opt: Option<&Path>) -> Result<Self> {
        let default_path = Path::new("config.toml");
        let path = if let Some(p) = path_opt {
            Some(p)
        } else if default_path.exists() {
            Some(default_path)
        } else {
            None
        };

        let mut cfg = Config::default();

        if let Some(path) = path {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed reading config file: {}", path.display()))?;
            let parsed: Config = toml::from_str(&raw)
                .with_context(|| format!("failed parsing TOML config: {}", path.display()))?;
            cfg = parsed;
        }

        Ok(cfg)
    }

    pub fn to_toml_pretty(&self) -> Result<String> {
        let s = toml::to_string_pretty(self).context("failed serializing config as TOML")?;
        Ok(s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Logging {
    pub level: String,
    pub format: String,
    pub debug_cue_samples: usize,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            debug_cue_samples: 20,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Player {
    /// Media source the surface is pointed at on startup.
    pub default_media: String,
    /// Subtitle file loaded when there is no saved session.
    pub default_subtitles: String,
    /// Directory both defaults and `load` names resolve against.
    pub media_dir: String,
    pub state_dir: String,
    pub storage_key: String,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            default_media: "gump.mp4".to_string(),
            default_subtitles: "gump.srt".to_string(),
            media_dir: ".".to_string(),
            state_dir: ".srtplay".to_string(),
            storage_key: "srtPlayerState".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Navigation {
    pub swipe_threshold: f64,
    pub swipe_cooldown_ms: u64,
}

impl Default for Navigation {
    fn default() -> Self {
        Self {
            swipe_threshold: 40.0,
            swipe_cooldown_ms: 400,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Display {
    pub wrap_width: usize,
}

impl Default for Display {
    fn default() -> Self {
        Self { wrap_width: 72 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Merge {
    /// A cue ending in any of these characters closes a sentence.
    pub terminators: String,
}

impl Default for Merge {
    fn default() -> Self {
        Self {
            terminators: ".?!:,”".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Formats {
    pub json: JsonCfg,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonCfg {
    /// Wrap cue lists in a `{schema, version, cues}` document.
    pub wrapped: bool,
}

impl Default for JsonCfg {
    fn default() -> Self {
        Self { wrapped: true }
    }
}

pub fn init_tracing(logging: &Logging, cli_override_level: Option<&str>) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt};

    let level = cli_override_level.unwrap_or(logging.level.as_str());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let is_json = logging.format.to_lowercase() == "json";

    // stdout belongs to the player view.
    if is_json {
        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .event_format(fmt::format().json())
            .with_target(true)
            .init();
    } else {
        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .pretty()
            .init();
    }

    tracing::info!(
        level = level,
        format = logging.format.as_str(),
        "logging initialized"
    );

    Ok(())
}
