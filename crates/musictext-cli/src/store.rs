//! Directory-backed store of rendered songs.
//!
//! Each song lives in its own directory named by the hex SHA-256 of its
//! notation text:
//!
//! ```text
//! <root>/<key>/song.txt
//! <root>/<key>/song.wav
//! ```

use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const NOTATION_FILE: &str = "song.txt";
const AUDIO_FILE: &str = "song.wav";

/// Errors from store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure at `path`.
    #[error("store I/O error at '{path}': {source}")]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The key is not a 64-character lowercase hex digest.
    #[error("invalid song key '{0}'")]
    InvalidKey(String),
}

impl StoreError {
    fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Rendered songs keyed by the hash of their notation.
#[derive(Debug, Clone)]
pub struct SongStore {
    root: PathBuf,
}

impl SongStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| StoreError::io(&root, e))?;
        Ok(Self { root })
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Key for a notation text: lowercase hex SHA-256.
    pub fn key_for(text: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        hex::encode(hasher.finalize())
    }

    fn song_dir(&self, key: &str) -> Result<PathBuf> {
        let valid = key.len() == 64
            && key
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(key))
    }

    /// Insert or replace the song under `key`.
    ///
    /// Writing the same key twice leaves the store as if it had been
    /// written once with the second contents.
    pub fn put(&self, key: &str, text: &str, wav: &[u8]) -> Result<PathBuf> {
        let dir = self.song_dir(key)?;
        fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;

        write_replacing(&dir.join(NOTATION_FILE), text.as_bytes())?;
        let audio = dir.join(AUDIO_FILE);
        write_replacing(&audio, wav)?;

        tracing::debug!(key, bytes = wav.len(), "stored song");
        Ok(audio)
    }

    /// WAV bytes stored under `key`, if any.
    pub fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        read_optional(&self.song_dir(key)?.join(AUDIO_FILE))
    }

    /// Notation text stored under `key`, if any.
    pub fn notation(&self, key: &str) -> Result<Option<String>> {
        let bytes = read_optional(&self.song_dir(key)?.join(NOTATION_FILE))?;
        Ok(bytes.map(|b| String::from_utf8_lossy(&b).into_owned()))
    }

    /// Keys of every stored song, sorted.
    pub fn list(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.root).map_err(|e| StoreError::io(&self.root, e))?;

        let mut keys: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().join(AUDIO_FILE).is_file())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| self.song_dir(name).is_ok())
            .collect();
        keys.sort();
        Ok(keys)
    }
}

/// Write through a sibling temp file so readers never see a partial song.
fn write_replacing(path: &Path, contents: &[u8]) -> Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, contents).map_err(|e| StoreError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| StoreError::io(path, e))
}

fn read_optional(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StoreError::io(path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, SongStore) {
        let dir = TempDir::new().unwrap();
        let store = SongStore::open(dir.path().join("songs")).unwrap();
        (dir, store)
    }

    #[test]
    fn key_is_sha256_hex() {
        assert_eq!(
            SongStore::key_for(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(SongStore::key_for("c d e").len(), 64);
        assert_ne!(SongStore::key_for("c d e"), SongStore::key_for("c d f"));
    }

    #[test]
    fn put_then_get() {
        let (_dir, store) = store();
        let key = SongStore::key_for("c' e'");
        store.put(&key, "c' e'", b"RIFFdata").unwrap();

        assert_eq!(store.get(&key).unwrap().as_deref(), Some(&b"RIFFdata"[..]));
        assert_eq!(store.notation(&key).unwrap().as_deref(), Some("c' e'"));
        assert_eq!(store.list().unwrap(), vec![key]);
    }

    #[test]
    fn put_is_idempotent_upsert() {
        let (_dir, store) = store();
        let key = SongStore::key_for("r");
        store.put(&key, "r", b"first").unwrap();
        store.put(&key, "r", b"second").unwrap();

        assert_eq!(store.get(&key).unwrap().as_deref(), Some(&b"second"[..]));
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn missing_key_is_none() {
        let (_dir, store) = store();
        let key = SongStore::key_for("never stored");
        assert!(store.get(&key).unwrap().is_none());
        assert!(store.notation(&key).unwrap().is_none());
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn rejects_path_like_keys() {
        let (_dir, store) = store();
        for key in ["../etc", "ABC", "", "g".repeat(64).as_str()] {
            assert!(matches!(
                store.get(key),
                Err(StoreError::InvalidKey(_))
            ));
        }
    }

    #[test]
    fn list_skips_foreign_entries() {
        let (_dir, store) = store();
        fs::create_dir_all(store.root().join("not-a-key")).unwrap();
        fs::write(store.root().join("stray.txt"), "x").unwrap();
        let key = SongStore::key_for("c");
        store.put(&key, "c", b"wav").unwrap();
        assert_eq!(store.list().unwrap(), vec![key]);
    }
}
