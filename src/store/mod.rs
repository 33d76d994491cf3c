//! Durable flashcard collection.
//!
//! The whole collection lives in one JSON array (`cards.json`). Every append
//! reads the full document, pushes the new card and atomically replaces the
//! file, so a reader never sees a half-written array and a failed write leaves
//! the previous collection in place.

pub mod ids;
pub mod models;

use std::fmt;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use chrono::{DateTime, Utc};

use crate::config::STORE_FILE_NAME;
use crate::error::{FlashcardError, Result};
use crate::utils::fs::write_atomic;

pub use ids::{generate_id, next_created_at, ID_FORMAT};
pub use models::Flashcard;

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

type DocumentWriter = fn(&Path, &[u8]) -> io::Result<()>;

/// Handle to `cards.json`. Clones share one write lock, so appends made
/// through any of them are applied one after another.
#[derive(Clone)]
pub struct FlashcardStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
    writer: DocumentWriter,
}

impl fmt::Debug for FlashcardStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlashcardStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl FlashcardStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
            writer: write_atomic,
        }
    }

    /// Store at `<dir>/cards.json`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(STORE_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the data directory and an empty collection if either is
    /// missing. An existing document is left untouched.
    pub fn ensure(&self) -> Result<()> {
        let _guard = self.lock();
        if self.path.is_file() {
            return Ok(());
        }
        if self.path.exists() {
            return Err(FlashcardError::write_failed(
                &self.path,
                io::Error::other("path exists but is not a regular file"),
            ));
        }
        (self.writer)(&self.path, b"[]")
            .map_err(|err| FlashcardError::write_failed(&self.path, err))?;
        log_info!("Created empty flashcard store at {}", self.path.display());
        Ok(())
    }

    /// Every card in creation order. A missing document is an empty
    /// collection; a malformed one is an error, never a partial list.
    pub fn load_all(&self) -> Result<Vec<Flashcard>> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(FlashcardError::read_failed(&self.path, err)),
        };

        serde_json::from_slice(&raw).map_err(|source| FlashcardError::CorruptStore {
            path: self.path.clone(),
            source,
        })
    }

    pub fn append(&self, card: Flashcard) -> Result<()> {
        let _guard = self.lock();
        let cards = self.load_all()?;
        self.append_to(cards, card)
    }

    /// Builds a card stamped `now` (nudged past the newest card if the clock
    /// did not advance) and appends it.
    pub fn create(&self, image: String, text: String, now: DateTime<Utc>) -> Result<Flashcard> {
        let _guard = self.lock();
        let cards = self.load_all()?;
        let created_at = next_created_at(now, &cards);
        let card = Flashcard {
            id: generate_id(created_at, &cards),
            image,
            text,
            created_at,
        };
        self.append_to(cards, card.clone())?;
        Ok(card)
    }

    /// Held from reading the document until its replacement is in place.
    fn lock(&self) -> MutexGuard<'_, ()> {
        match self.write_lock.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Caller holds the write lock.
    fn append_to(&self, mut cards: Vec<Flashcard>, card: Flashcard) -> Result<()> {
        if cards.iter().any(|existing| existing.id == card.id) {
            return Err(FlashcardError::DuplicateId(card.id));
        }

        let start = Instant::now();
        let id = card.id.clone();
        cards.push(card);

        let document = serde_json::to_vec_pretty(&cards).map_err(|err| {
            FlashcardError::Codec(format!("failed to serialise flashcards: {err}"))
        })?;
        (self.writer)(&self.path, &document)
            .map_err(|err| FlashcardError::write_failed(&self.path, err))?;

        log_debug!("Store rewrite of {} bytes", document.len());
        log_info!(
            "Saved flashcard {} ({} total) in {}ms",
            id,
            cards.len(),
            start.elapsed().as_millis()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind as FlashcardErrorKind;
    use chrono::TimeZone;

    fn at(s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, s).unwrap()
    }

    fn card(id: &str, text: &str) -> Flashcard {
        Flashcard {
            id: id.into(),
            image: "aGk=".into(),
            text: text.into(),
            created_at: at(0),
        }
    }

    #[test]
    fn ensure_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FlashcardStore::in_dir(dir.path().join("data"));

        store.ensure().unwrap();
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "[]");
        assert!(store.load_all().unwrap().is_empty());

        store.append(card("a", "one")).unwrap();
        store.ensure().unwrap();
        assert_eq!(store.load_all().unwrap().len(), 1);
    }

    #[test]
    fn missing_document_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FlashcardStore::in_dir(dir.path());
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn appends_preserve_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = FlashcardStore::in_dir(dir.path());
        store.ensure().unwrap();

        for i in 0..10 {
            store.create("aGk=".into(), format!("card {i}"), at(i / 3)).unwrap();
        }

        let cards = store.load_all().unwrap();
        let texts: Vec<_> = cards.iter().map(|c| c.text.as_str()).collect();
        let expected: Vec<String> = (0..10).map(|i| format!("card {i}")).collect();
        assert_eq!(texts, expected);
        assert!(cards.windows(2).all(|w| w[0].created_at < w[1].created_at));
        assert!(cards.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[test]
    fn duplicate_id_is_rejected_and_store_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store = FlashcardStore::in_dir(dir.path());
        store.append(card("x", "first")).unwrap();

        let err = store.append(card("x", "second")).unwrap_err();
        assert_eq!(err.kind(), FlashcardErrorKind::DuplicateId);
        let cards = store.load_all().unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].text, "first");
    }

    #[test]
    fn malformed_document_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let store = FlashcardStore::in_dir(dir.path());
        fs::write(store.path(), "[{\"id\": \"a\", \"image\": ").unwrap();

        let err = store.load_all().unwrap_err();
        assert_eq!(err.kind(), FlashcardErrorKind::CorruptStore);
        assert!(err.to_string().contains("cards.json"));

        // Appending on top of a corrupt document must not overwrite it.
        assert!(store.append(card("b", "new")).is_err());
        assert_eq!(
            fs::read_to_string(store.path()).unwrap(),
            "[{\"id\": \"a\", \"image\": "
        );
    }

    #[test]
    fn wrong_shape_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let store = FlashcardStore::in_dir(dir.path());
        fs::write(store.path(), "{\"cards\": []}").unwrap();
        assert_eq!(
            store.load_all().unwrap_err().kind(),
            FlashcardErrorKind::CorruptStore
        );
    }

    fn disk_full(_path: &Path, _contents: &[u8]) -> io::Result<()> {
        Err(io::Error::other("no space left on device"))
    }

    #[test]
    fn failed_write_keeps_previous_collection() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FlashcardStore::in_dir(dir.path());
        for i in 0..3 {
            store.create("aGk=".into(), format!("card {i}"), at(i)).unwrap();
        }
        let before = store.load_all().unwrap();

        store.writer = disk_full;
        let err = store.create("aGk=".into(), "lost".into(), at(10)).unwrap_err();
        assert_eq!(err.kind(), FlashcardErrorKind::StoreWriteError);
        assert!(err.to_string().contains("no space left"));
        let err = store.append(card("x", "lost too")).unwrap_err();
        assert_eq!(err.kind(), FlashcardErrorKind::StoreWriteError);

        let after = store.load_all().unwrap();
        assert_eq!(after.len(), 3);
        assert_eq!(after, before);
    }

    #[test]
    fn concurrent_creates_all_land() {
        let dir = tempfile::tempdir().unwrap();
        let store = FlashcardStore::in_dir(dir.path());
        store.ensure().unwrap();

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    store.create("aGk=".into(), format!("card {i}"), Utc::now()).unwrap()
                })
            })
            .collect();
        let created: Vec<Flashcard> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        let cards = store.load_all().unwrap();
        assert_eq!(cards.len(), 16);
        for card in &created {
            assert!(cards.contains(card));
        }
        assert!(cards.windows(2).all(|w| w[0].created_at < w[1].created_at));
        assert!(cards.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[test]
    fn ensure_rejects_a_directory_in_place_of_the_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = FlashcardStore::in_dir(dir.path());
        fs::create_dir(store.path()).unwrap();
        assert_eq!(
            store.ensure().unwrap_err().kind(),
            FlashcardErrorKind::StoreWriteError
        );
    }

    #[test]
    fn unwritable_parent_is_a_write_error() {
        let dir = tempfile::tempdir().unwrap();
        // The store's parent is a regular file, so nothing can be created under it.
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"not a directory").unwrap();
        let store = FlashcardStore::in_dir(&blocker);

        assert_eq!(
            store.ensure().unwrap_err().kind(),
            FlashcardErrorKind::StoreWriteError
        );
        assert!(store.append(card("a", "one")).is_err());
        assert_eq!(fs::read(&blocker).unwrap(), b"not a directory");
    }

    #[test]
    fn unreadable_document_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the document should be.
        let store = FlashcardStore::in_dir(dir.path());
        fs::create_dir(store.path()).unwrap();
        assert_eq!(
            store.load_all().unwrap_err().kind(),
            FlashcardErrorKind::StoreReadError
        );
    }

    #[test]
    fn leftover_temp_files_do_not_affect_loading() {
        let dir = tempfile::tempdir().unwrap();
        let store = FlashcardStore::in_dir(dir.path());
        store.append(card("a", "one")).unwrap();
        fs::write(dir.path().join(".tmpXYZ123"), b"[{\"partial").unwrap();

        let cards = store.load_all().unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].id, "a");
    }
}
