use std::fmt;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::GalleryError;

pub const DEFAULT_CONFIG_FILE: &str = "config.json";

#[derive(Clone, Deserialize, Serialize)]
pub struct Config {
    pub metadata_url: String,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("metadata_url", &self.metadata_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn resolve(path: Option<&str>) -> Result<Config, GalleryError> {
        let config_path = match path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };

        if path.is_none() && !config_path.exists() {
            return Err(GalleryError::MissingConfig);
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|_| GalleryError::ConfigRead(config_path.clone()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Config, GalleryError> {
        serde_json::from_str(content).map_err(|err| GalleryError::ConfigParse(err.to_string()))
    }
}
