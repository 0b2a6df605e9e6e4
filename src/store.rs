use std::fs;

use camino::{Utf8Path, Utf8PathBuf};

use crate::domain::{Album, archive_file_name};
use crate::error::GalleryError;

/// Working directory holding materialized albums (`<root>/<year>/<name>`)
/// and, transiently, downloaded archives (`<root>/<file name>`).
#[derive(Debug, Clone)]
pub struct Store {
    root: Utf8PathBuf,
}

impl Store {
    pub fn new() -> Result<Self, GalleryError> {
        let cwd = std::env::current_dir().map_err(|err| GalleryError::Filesystem(err.to_string()))?;
        let root = Utf8PathBuf::from_path_buf(cwd)
            .map_err(|_| GalleryError::Filesystem("invalid working directory path".to_string()))?;
        Ok(Self { root })
    }

    pub fn new_with_root(root: Utf8PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub fn year_dir(&self, year: &str) -> Utf8PathBuf {
        self.root.join(year)
    }

    pub fn album_dir(&self, album: &Album) -> Utf8PathBuf {
        album.destination(&self.root)
    }

    /// Any stat failure, including permission errors, counts as absent.
    pub fn album_exists(&self, album: &Album) -> bool {
        fs::metadata(self.album_dir(album).as_std_path()).is_ok()
    }

    pub fn archive_path(&self, url: &str) -> Result<Utf8PathBuf, GalleryError> {
        Ok(self.root.join(archive_file_name(url)?))
    }

    pub fn ensure_root(&self) -> Result<(), GalleryError> {
        fs::create_dir_all(self.root.as_std_path())
            .map_err(|err| GalleryError::Filesystem(err.to_string()))
    }

    pub fn remove_archive(&self, path: &Utf8Path) -> Result<(), GalleryError> {
        fs::remove_file(path.as_std_path())
            .map_err(|err| GalleryError::Filesystem(format!("remove {path}: {err}")))
    }
}
