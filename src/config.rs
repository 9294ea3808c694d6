use anyhow::{Context, Result};
use clap::Parser;
use directories::ProjectDirs;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

#[derive(Parser, Debug, Default)]
#[command(name = "fishtank")]
#[command(about = "Fish, bubbles and swaying weeds drawn in braille", long_about = None)]
pub(crate) struct Args {
    /// number of fish
    #[arg(long)]
    pub(crate) fish: Option<usize>,

    /// number of weed strands
    #[arg(long)]
    pub(crate) weeds: Option<usize>,

    /// RNG seed (random when omitted)
    #[arg(long)]
    pub(crate) seed: Option<u64>,

    /// render rate cap
    #[arg(long)]
    pub(crate) fps: Option<u32>,

    /// ms between fish decisions
    #[arg(long)]
    pub(crate) update_ms: Option<u64>,

    /// logical pixels per braille dot (bigger = smaller fish)
    #[arg(long)]
    pub(crate) scale: Option<f64>,

    /// settings file (JSON); defaults to the user config dir
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,

    /// append logs to this file instead of stderr
    #[arg(long)]
    pub(crate) log_file: Option<PathBuf>,

    /// start with the status line hidden
    #[arg(long, default_value_t = false)]
    pub(crate) no_hud: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub(crate) fish: usize,
    pub(crate) weeds: usize,
    pub(crate) seed: Option<u64>,
    pub(crate) fps: u32,
    pub(crate) update_ms: u64,
    pub(crate) scale: f64,
    pub(crate) hud: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fish: 5,
            weeds: 20,
            seed: None,
            fps: 60,
            update_ms: 300,
            scale: 3.0,
            hud: true,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub(crate) enum ConfigError {
    #[error("fps must be at least 1")]
    ZeroFps,
    #[error("update interval must be at least 1 ms")]
    ZeroUpdateInterval,
    #[error("scale must be a positive number, got {0}")]
    BadScale(f64),
}

impl Settings {
    /// Flags given on the command line win over the file.
    pub(crate) fn with_args(mut self, args: &Args) -> Self {
        if let Some(v) = args.fish {
            self.fish = v;
        }
        if let Some(v) = args.weeds {
            self.weeds = v;
        }
        if args.seed.is_some() {
            self.seed = args.seed;
        }
        if let Some(v) = args.fps {
            self.fps = v;
        }
        if let Some(v) = args.update_ms {
            self.update_ms = v;
        }
        if let Some(v) = args.scale {
            self.scale = v;
        }
        if args.no_hud {
            self.hud = false;
        }
        self
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.fps == 0 {
            return Err(ConfigError::ZeroFps);
        }
        if self.update_ms == 0 {
            return Err(ConfigError::ZeroUpdateInterval);
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(ConfigError::BadScale(self.scale));
        }
        Ok(())
    }

    pub(crate) fn update_interval(&self) -> Duration {
        Duration::from_millis(self.update_ms)
    }

    pub(crate) fn frame_time(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps as f64)
    }
}

pub(crate) fn default_settings_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "fishtank", "Fishtank").map(|p| p.config_dir().join("settings.json"))
}

fn read_settings(path: &Path) -> Result<Settings> {
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let v = serde_json::from_str::<Settings>(&s).with_context(|| format!("parse {}", path.display()))?;
    Ok(v)
}

/// Defaults, then the settings file, then flags. A file named with
/// `--config` must load; the default location is best-effort.
pub(crate) fn load(args: &Args) -> Result<Settings> {
    let file = match &args.config {
        Some(path) => read_settings(path)?,
        None => match default_settings_path() {
            Some(path) if path.exists() => match read_settings(&path) {
                Ok(s) => {
                    info!("loaded settings from {}", path.display());
                    s
                }
                Err(e) => {
                    warn!("ignoring settings file: {e:#}");
                    Settings::default()
                }
            },
            _ => Settings::default(),
        },
    };

    let settings = file.with_args(args);
    settings.validate()?;
    Ok(settings)
}
