use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;

use tracing::debug;
use zip::ZipArchive;

use crate::error::GalleryError;

const DEFAULT_DIR_MODE: u32 = 0o755;
const DEFAULT_FILE_MODE: u32 = 0o644;

/// Unpacks `archive_path` under `target_dir`, entry by entry in archive order.
///
/// Stops at the first entry that cannot be opened or written; whatever was
/// written before that stays on disk. Returns the number of entries written.
pub fn extract_archive(archive_path: &Path, target_dir: &Path) -> Result<usize, GalleryError> {
    let archive_err = |message: String| GalleryError::Archive {
        path: archive_path.display().to_string(),
        message,
    };

    let file = File::open(archive_path).map_err(|err| archive_err(format!("open: {err}")))?;
    let mut archive = ZipArchive::new(file).map_err(|err| archive_err(err.to_string()))?;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|err| archive_err(err.to_string()))?;
        let entry_path = match entry.enclosed_name() {
            Some(path) => target_dir.join(path),
            None => {
                return Err(archive_err(format!(
                    "entry {} escapes the destination",
                    entry.name()
                )));
            }
        };
        let mode = entry.unix_mode().map(|mode| mode & 0o7777);

        if entry.is_dir() {
            debug!(path = %entry_path.display(), "creating directory");
            create_dir(&entry_path, mode.unwrap_or(DEFAULT_DIR_MODE))?;
            continue;
        }

        debug!(path = %entry_path.display(), "creating file");
        if let Some(parent) = entry_path.parent() {
            create_dir(parent, DEFAULT_DIR_MODE)?;
        }
        let mut outfile = create_file(&entry_path, mode.unwrap_or(DEFAULT_FILE_MODE))?;
        io::copy(&mut entry, &mut outfile).map_err(|err| {
            GalleryError::Filesystem(format!("write {}: {err}", entry_path.display()))
        })?;
    }
    Ok(archive.len())
}

fn create_dir(path: &Path, mode: u32) -> Result<(), GalleryError> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;
    builder
        .create(path)
        .map_err(|err| GalleryError::Filesystem(format!("mkdir {}: {err}", path.display())))
}

fn create_file(path: &Path, mode: u32) -> Result<File, GalleryError> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;
    options
        .open(path)
        .map_err(|err| GalleryError::Filesystem(format!("create {}: {err}", path.display())))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use zip::write::SimpleFileOptions;

    use super::*;

    #[test]
    fn extracts_nested_entries() {
        let temp = tempfile::tempdir().unwrap();
        let archive_path = temp.path().join("album.zip");
        let mut writer = zip::ZipWriter::new(File::create(&archive_path).unwrap());
        writer
            .add_directory("Summer/", SimpleFileOptions::default())
            .unwrap();
        writer
            .start_file("Summer/beach.jpg", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"jpeg").unwrap();
        writer.finish().unwrap();

        let written = extract_archive(&archive_path, &temp.path().join("2019")).unwrap();
        assert_eq!(written, 2);
        assert_eq!(
            fs::read(temp.path().join("2019/Summer/beach.jpg")).unwrap(),
            b"jpeg"
        );
    }
}
