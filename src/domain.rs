use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::GalleryError;

/// User list sentinel granting an album to every identity.
pub const ALL_USERS: &str = "all";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Album {
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub users: Vec<String>,
}

impl Album {
    /// Only the first listed user decides ownership; later entries are never
    /// consulted. An album with no users belongs to nobody.
    pub fn is_owned_by(&self, user: &str) -> bool {
        match self.users.first() {
            Some(first) => first == user || first == ALL_USERS,
            None => false,
        }
    }

    /// `<root>/<year>/<name>`, the album's on-disk identity.
    pub fn destination(&self, root: &Utf8Path) -> Utf8PathBuf {
        root.join(&self.year).join(&self.name)
    }

    pub fn label(&self) -> String {
        format!("{}/{}", self.year, self.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Metadata {
    #[serde(default)]
    pub albums: Vec<Album>,
    #[serde(default)]
    pub url: String,
}

impl Metadata {
    pub fn archive_url(&self, album: &Album) -> String {
        format!("{}/{}", self.url, album.file)
    }
}

/// Local file name for a downloaded archive: the last `/`-separated segment
/// of its url.
pub fn archive_file_name(url: &str) -> Result<&str, GalleryError> {
    let name = url.rsplit('/').next().unwrap_or_default();
    if name.is_empty() || name == "." || name == ".." {
        return Err(GalleryError::InvalidArchiveUrl(url.to_string()));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn album(users: &[&str]) -> Album {
        Album {
            file: "2019-summer.zip".to_string(),
            name: "Summer".to_string(),
            year: "2019".to_string(),
            users: users.iter().map(|u| u.to_string()).collect(),
        }
    }

    #[test]
    fn first_user_decides() {
        assert!(album(&["anna", "ben"]).is_owned_by("anna"));
        assert!(!album(&["anna", "ben"]).is_owned_by("ben"));
        assert!(album(&["all"]).is_owned_by("anyone"));
        assert!(!album(&[]).is_owned_by("anna"));
    }

    #[test]
    fn file_name_is_last_segment() {
        assert_eq!(
            archive_file_name("https://host/albums/2019-summer.zip").unwrap(),
            "2019-summer.zip"
        );
        assert!(archive_file_name("https://host/albums/").is_err());
    }
}
