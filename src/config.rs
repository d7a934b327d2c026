// File: src/config.rs
use crate::codec::Codec;
use crate::error::{Result, TrainerError};
use crate::persistence::SAVED_WORDS_KEY;
use crate::practice::DEFAULT_CHOICE_TARGET;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "vocab-trainer";

/// Runtime settings. Every field may be omitted from the TOML file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainerConfig {
    /// Directory the saved words live in.
    pub data_dir: PathBuf,
    pub storage_key: String,
    pub codec: Codec,
    /// How many choices a round aims to show.
    pub choice_target: usize,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            storage_key: SAVED_WORDS_KEY.to_string(),
            codec: Codec::default(),
            choice_target: DEFAULT_CHOICE_TARGET,
        }
    }
}

impl TrainerConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: TrainerConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Loads `path` when given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.choice_target == 0 {
            return Err(TrainerError::Config("choice_target must be at least 1".into()));
        }
        if self.storage_key.is_empty() {
            return Err(TrainerError::Config("storage_key must not be empty".into()));
        }
        Ok(())
    }
}

fn default_data_dir() -> PathBuf {
    data_dir_under(dirs::data_local_dir())
}

/// `<base>/vocab-trainer`, or `./vocab-trainer` when the platform has no data directory.
fn data_dir_under(base: Option<PathBuf>) -> PathBuf {
    base.unwrap_or_else(|| PathBuf::from(".")).join(APP_DIR_NAME)
}
