use std::fs;

use camino::Utf8PathBuf;

use gallery_downloader::domain::Album;
use gallery_downloader::store::Store;

fn store() -> (tempfile::TempDir, Store) {
    let temp = tempfile::tempdir().unwrap();
    let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
    (temp, Store::new_with_root(root))
}

fn album() -> Album {
    Album {
        file: "summer.zip".to_string(),
        name: "Summer".to_string(),
        year: "2019".to_string(),
        users: vec!["all".to_string()],
    }
}

#[test]
fn album_presence_follows_directory() {
    let (_temp, store) = store();
    let album = album();
    assert!(!store.album_exists(&album));

    fs::create_dir_all(store.album_dir(&album).as_std_path()).unwrap();
    assert!(store.album_exists(&album));
}

#[test]
fn plain_file_counts_as_present() {
    let (_temp, store) = store();
    let album = album();
    fs::create_dir_all(store.year_dir("2019").as_std_path()).unwrap();
    fs::write(store.album_dir(&album).as_std_path(), b"").unwrap();
    assert!(store.album_exists(&album));
}

#[test]
fn archive_staged_at_root() {
    let (_temp, store) = store();
    let path = store
        .archive_path("https://gallery.example/files/summer.zip")
        .unwrap();
    assert_eq!(path, store.root().join("summer.zip"));

    fs::write(path.as_std_path(), b"zip").unwrap();
    store.remove_archive(&path).unwrap();
    assert!(!path.as_std_path().exists());
    assert!(store.remove_archive(&path).is_err());
}
