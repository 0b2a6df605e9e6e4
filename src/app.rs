use std::time::Duration;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::client::GalleryClient;
use crate::domain::{Album, Metadata};
use crate::error::GalleryError;
use crate::extract::extract_archive;
use crate::store::Store;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlbumAction {
    NotOwned,
    Present,
    Extracted,
    ExtractionFailed,
    FetchFailed,
}

impl AlbumAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlbumAction::NotOwned => "not-owned",
            AlbumAction::Present => "present",
            AlbumAction::Extracted => "extracted",
            AlbumAction::ExtractionFailed => "extraction-failed",
            AlbumAction::FetchFailed => "fetch-failed",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AlbumOutcome {
    pub year: String,
    pub name: String,
    pub action: AlbumAction,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub items: Vec<AlbumOutcome>,
    pub aborted: bool,
    pub downloaded_bytes: u64,
    pub catalog_error: Option<String>,
    pub finished_at: String,
}

impl SyncReport {
    pub fn count(&self, action: AlbumAction) -> usize {
        self.items.iter().filter(|item| item.action == action).count()
    }
}

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub message: String,
    pub elapsed: Option<Duration>,
}

pub trait ProgressSink {
    fn event(&self, event: ProgressEvent);
}

/// Forwards progress events to the tracing subscriber.
pub struct LogSink;

impl ProgressSink for LogSink {
    fn event(&self, event: ProgressEvent) {
        match event.elapsed {
            Some(elapsed) => info!(elapsed_ms = elapsed.as_millis() as u64, "{}", event.message),
            None => info!("{}", event.message),
        }
    }
}

enum Step {
    Continue(AlbumOutcome, u64),
    Abort(AlbumOutcome),
}

pub struct App<C: GalleryClient> {
    store: Store,
    client: C,
    username: String,
}

impl<C: GalleryClient> App<C> {
    pub fn new(store: Store, client: C, username: impl Into<String>) -> Self {
        Self {
            store,
            client,
            username: username.into(),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// One pass over the catalog at `metadata_url`.
    ///
    /// A failed download stops the whole run; a failed extraction is recorded
    /// and the run moves on to the next album.
    pub fn sync(&self, metadata_url: &str, sink: &dyn ProgressSink) -> SyncReport {
        sink.event(ProgressEvent {
            message: "phase=Resolve; looking for new albums".to_string(),
            elapsed: None,
        });

        let (metadata, catalog_error) = match self.client.fetch_metadata(metadata_url) {
            Ok(metadata) => (metadata, None),
            Err(err) => {
                error!("metadata unavailable: {err}");
                (Metadata::default(), Some(err.to_string()))
            }
        };

        let mut items = Vec::new();
        let mut aborted = false;
        let mut downloaded_bytes = 0u64;
        for album in &metadata.albums {
            match self.sync_album(&metadata, album, sink) {
                Step::Continue(outcome, bytes) => {
                    downloaded_bytes += bytes;
                    items.push(outcome);
                }
                Step::Abort(outcome) => {
                    items.push(outcome);
                    aborted = true;
                    break;
                }
            }
        }

        sink.event(ProgressEvent {
            message: "phase=Done; finished".to_string(),
            elapsed: None,
        });
        SyncReport {
            items,
            aborted,
            downloaded_bytes,
            catalog_error,
            finished_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    fn sync_album(&self, metadata: &Metadata, album: &Album, sink: &dyn ProgressSink) -> Step {
        if !album.is_owned_by(&self.username) {
            return Step::Continue(outcome(album, AlbumAction::NotOwned, None), 0);
        }
        if self.store.album_exists(album) {
            sink.event(ProgressEvent {
                message: format!("phase=Store; album already present: {}", album.label()),
                elapsed: None,
            });
            return Step::Continue(outcome(album, AlbumAction::Present, None), 0);
        }

        sink.event(ProgressEvent {
            message: format!("phase=Fetch; new album found: {}", album.label()),
            elapsed: None,
        });
        let url = metadata.archive_url(album);
        let start = std::time::Instant::now();
        let (archive, bytes) = match self.download(&url) {
            Ok(downloaded) => downloaded,
            Err(err) => {
                error!("download of {url} failed, stopping run: {err}");
                return Step::Abort(outcome(
                    album,
                    AlbumAction::FetchFailed,
                    Some(err.to_string()),
                ));
            }
        };
        sink.event(ProgressEvent {
            message: format!("phase=Fetch; {bytes} bytes downloaded"),
            elapsed: Some(start.elapsed()),
        });

        sink.event(ProgressEvent {
            message: format!("phase=Extract; unpacking {archive}"),
            elapsed: None,
        });
        let year_dir = self.store.year_dir(&album.year);
        let result = extract_archive(archive.as_std_path(), year_dir.as_std_path());
        if let Err(err) = self.store.remove_archive(&archive) {
            warn!("{err}");
        }

        match result {
            Ok(entries) => {
                info!(entries = entries as u64, "extracted {}", album.label());
                Step::Continue(outcome(album, AlbumAction::Extracted, None), bytes)
            }
            Err(err) => {
                error!("extraction of {} failed: {err}", album.label());
                Step::Continue(
                    outcome(album, AlbumAction::ExtractionFailed, Some(err.to_string())),
                    bytes,
                )
            }
        }
    }

    fn download(&self, url: &str) -> Result<(camino::Utf8PathBuf, u64), GalleryError> {
        let destination = self.store.archive_path(url)?;
        info!("downloading {url} to {destination}");
        let bytes = self
            .client
            .download_archive(url, destination.as_std_path())?;
        Ok((destination, bytes))
    }
}

fn outcome(album: &Album, action: AlbumAction, error: Option<String>) -> AlbumOutcome {
    AlbumOutcome {
        year: album.year.clone(),
        name: album.name.clone(),
        action,
        error,
    }
}
