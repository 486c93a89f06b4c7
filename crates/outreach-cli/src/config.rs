//! CLI settings: optional TOML file, then flag overrides

use std::path::{Path, PathBuf};

use outreach_core::logging_facility::Profile;
use outreach_store::db::DEFAULT_BUSY_TIMEOUT_MS;
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "outreach.toml";
pub const DEFAULT_DATABASE_PATH: &str = ".outreach/outreach.db";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub database_path: PathBuf,
    /// Acting user for commands that need one
    pub user_id: Option<String>,
    pub log_profile: Profile,
    pub busy_timeout_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            user_id: None,
            log_profile: Profile::Development,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

/// Flag values that win over the file
#[derive(Debug, Default)]
pub struct Overrides {
    pub database_path: Option<PathBuf>,
    pub user_id: Option<String>,
    pub log_profile: Option<Profile>,
}

impl Settings {
    /// Read `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::parse(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(format!("cannot read config {}: {}", path.display(), e).into()),
        }
    }

    pub fn parse(text: &str) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(toml::from_str(text)?)
    }

    pub fn apply(mut self, overrides: Overrides) -> Self {
        if let Some(path) = overrides.database_path {
            self.database_path = path;
        }
        if overrides.user_id.is_some() {
            self.user_id = overrides.user_id;
        }
        if let Some(profile) = overrides.log_profile {
            self.log_profile = profile;
        }
        self
    }
}
