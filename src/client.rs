use std::fs::File;
use std::path::Path;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

use crate::config::Config;
use crate::domain::Metadata;
use crate::error::GalleryError;

pub const GALLERY_USER_AGENT: &str = "gallery-downloader";

pub trait GalleryClient: Send + Sync {
    fn fetch_metadata(&self, url: &str) -> Result<Metadata, GalleryError>;

    /// Streams the archive at `url` into `destination` and returns the number
    /// of bytes written. The file is created before the request is sent, so a
    /// failed transfer may leave an empty or truncated file behind.
    fn download_archive(&self, url: &str, destination: &Path) -> Result<u64, GalleryError>;
}

#[derive(Clone)]
pub struct GalleryHttpClient {
    client: Client,
    username: String,
    password: String,
}

impl GalleryHttpClient {
    pub fn new(config: &Config) -> Result<Self, GalleryError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(GALLERY_USER_AGENT));

        // no deadline: a silent server stalls the run
        let client = Client::builder()
            .default_headers(headers)
            .timeout(None::<Duration>)
            .build()
            .map_err(|err| GalleryError::Http {
                url: config.metadata_url.clone(),
                message: err.to_string(),
            })?;

        Ok(Self {
            client,
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    fn get(&self, url: &str) -> Result<Response, GalleryError> {
        let response = self
            .client
            .get(url)
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .map_err(|err| GalleryError::Http {
                url: url.to_string(),
                message: err.to_string(),
            })?;
        Self::handle_status(url, response)
    }

    fn handle_status(url: &str, response: Response) -> Result<Response, GalleryError> {
        match response.status() {
            StatusCode::OK => Ok(response),
            StatusCode::UNAUTHORIZED => Err(GalleryError::AccessDenied {
                url: url.to_string(),
            }),
            status => Err(GalleryError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            }),
        }
    }
}

impl GalleryClient for GalleryHttpClient {
    fn fetch_metadata(&self, url: &str) -> Result<Metadata, GalleryError> {
        let response = self.get(url)?;
        let body = response.text().map_err(|err| GalleryError::Transfer {
            url: url.to_string(),
            message: err.to_string(),
        })?;
        serde_json::from_str(&body).map_err(|err| GalleryError::MetadataDecode(err.to_string()))
    }

    fn download_archive(&self, url: &str, destination: &Path) -> Result<u64, GalleryError> {
        let mut file = File::create(destination).map_err(|err| {
            GalleryError::Filesystem(format!("create {}: {err}", destination.display()))
        })?;
        let mut response = self.get(url)?;
        std::io::copy(&mut response, &mut file).map_err(|err| GalleryError::Transfer {
            url: url.to_string(),
            message: err.to_string(),
        })
    }
}
