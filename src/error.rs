use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum GalleryError {
    #[error("missing config file config.json in current directory")]
    MissingConfig,

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("request to {url} failed: {message}")]
    Http { url: String, message: String },

    #[error("server denied access to {url}")]
    AccessDenied { url: String },

    #[error("server returned status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("failed to decode metadata: {0}")]
    MetadataDecode(String),

    #[error("cannot derive archive file name from url: {0}")]
    InvalidArchiveUrl(String),

    #[error("failed to transfer archive {url}: {message}")]
    Transfer { url: String, message: String },

    #[error("invalid archive {path}: {message}")]
    Archive { path: String, message: String },

    #[error("filesystem error: {0}")]
    Filesystem(String),
}

impl GalleryError {
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            GalleryError::MissingConfig | GalleryError::ConfigRead(_) | GalleryError::ConfigParse(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_are_flagged() {
        assert!(GalleryError::MissingConfig.is_configuration());
        assert!(GalleryError::ConfigParse("eof".to_string()).is_configuration());
        assert!(!GalleryError::MetadataDecode("eof".to_string()).is_configuration());
    }

    #[test]
    fn access_denied_message_names_url() {
        let err = GalleryError::AccessDenied {
            url: "https://example.org/meta.json".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "server denied access to https://example.org/meta.json"
        );
    }
}
