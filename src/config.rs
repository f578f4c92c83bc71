//! Configuration loading for redub.

use crate::defaults;
use crate::error::{RedubError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub dubbing: DubbingConfig,
    pub engines: EnginesConfig,
}

/// Dubbing behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DubbingConfig {
    /// Language code requests default to when none is given.
    pub target_language: String,
    /// Gain applied to the background stem in the final mix.
    pub background_gain: f32,
    /// Root for per-request scratch directories; system temp dir when unset.
    pub scratch_dir: Option<PathBuf>,
}

/// External engine commands, each an argv vector (program first).
///
/// Separation, diarization, transcription, and synthesis are required to
/// build the engine set. Classification is optional — the heuristic
/// classifier takes over when it is unset. Translation is optional at load
/// time and rejected when a dub is actually requested.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct EnginesConfig {
    pub separation: Option<Vec<String>>,
    pub diarization: Option<Vec<String>>,
    pub classification: Option<Vec<String>>,
    pub transcription: Option<Vec<String>>,
    pub translation: Option<Vec<String>>,
    pub synthesis: Option<Vec<String>>,
}

impl Default for DubbingConfig {
    fn default() -> Self {
        Self {
            target_language: defaults::DEFAULT_TARGET_LANGUAGE.to_string(),
            background_gain: defaults::BACKGROUND_GAIN,
            scratch_dir: None,
        }
    }
}

/// Starter configuration written by `redub config init`.
const CONFIG_TEMPLATE: &str = r#"# redub configuration

[dubbing]
# Default target language for dubs
target_language = "hi"
# Background attenuation in the final mix
background_gain = 0.8
# Scratch directory root (defaults to the system temp dir)
# scratch_dir = "/var/tmp/redub"

[engines]
# Each engine is an argv vector: program first, fixed arguments after.
# separation   = ["demucs-wrapper"]            # <in.wav> <vocals.wav> <background.wav>
# diarization  = ["pyannote-wrapper"]          # <vocals.wav> -> JSON turns on stdout
# classification = ["singing-detector"]        # <turn.wav> -> "speech" | "singing"
# transcription = ["whisper-wrapper"]          # <vocals.wav> -> JSON fragments on stdout
# translation  = ["translate-wrapper"]         # <lang>, text on stdin -> text on stdout
# synthesis    = ["tts-wrapper"]               # <lang> <out.wav>, text on stdin
"#;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Missing fields use default values.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RedubError::ConfigFileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                RedubError::Io(e)
            }
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Load configuration from a file, or return defaults if the file does
    /// not exist. Invalid TOML is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(RedubError::ConfigFileNotFound { .. }) => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - REDUB_LANGUAGE → dubbing.target_language
    /// - REDUB_SCRATCH_DIR → dubbing.scratch_dir
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(language) = std::env::var("REDUB_LANGUAGE")
            && !language.is_empty()
        {
            self.dubbing.target_language = language;
        }
        if let Ok(dir) = std::env::var("REDUB_SCRATCH_DIR")
            && !dir.is_empty()
        {
            self.dubbing.scratch_dir = Some(PathBuf::from(dir));
        }
        self
    }

    /// Root directory for scratch artifacts.
    pub fn scratch_root(&self) -> PathBuf {
        self.dubbing
            .scratch_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }

    /// Default config file location: `$XDG_CONFIG_HOME/redub/config.toml`.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("redub")
            .join("config.toml")
    }

    /// Write the commented starter configuration to `path`.
    ///
    /// Refuses to overwrite an existing file unless `force` is set.
    pub fn write_template(path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            return Err(RedubError::Other(format!(
                "{} already exists (use --force to overwrite)",
                path.display()
            )));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, CONFIG_TEMPLATE)?;
        Ok(())
    }
}
