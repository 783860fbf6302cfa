use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use super::loader::load_csv;
use super::model::AuctionDataset;
use crate::error::{LoadError, Result};

// ---------------------------------------------------------------------------
// DatasetCache – load once, reuse until the source changes
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct Entry {
    dataset: Arc<AuctionDataset>,
    modified: Option<SystemTime>,
}

impl Entry {
    /// Without mtime support both sides are `None` and the entry stays valid
    /// until cleared.
    fn is_current(&self, modified: Option<SystemTime>) -> bool {
        self.modified == modified
    }
}

/// Owns the loaded dataset for one source file.
///
/// The entry is reused until [`DatasetCache::clear`] is called or the file's
/// modification time no longer matches the one seen at load time.
#[derive(Debug)]
pub struct DatasetCache {
    path: PathBuf,
    entry: Option<Entry>,
    loads: usize,
}

impl DatasetCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entry: None,
            loads: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return the cached dataset, reading the source first if needed.
    pub fn get(&mut self) -> Result<Arc<AuctionDataset>> {
        let modified = std::fs::metadata(&self.path)
            .map_err(|e| LoadError::from_io(&self.path, e))?
            .modified()
            .ok();

        if let Some(entry) = &self.entry {
            if entry.is_current(modified) {
                log::trace!("dataset cache hit for {}", self.path.display());
                return Ok(Arc::clone(&entry.dataset));
            }
            log::info!("{} changed on disk, reloading", self.path.display());
        }

        // Drop the stale entry first so a failed reload leaves nothing behind.
        self.entry = None;
        let dataset = Arc::new(load_csv(&self.path)?);
        self.loads += 1;
        self.entry = Some(Entry {
            dataset: Arc::clone(&dataset),
            modified,
        });
        Ok(dataset)
    }

    /// Forget the cached dataset; the next [`get`](Self::get) re-reads the file.
    pub fn clear(&mut self) {
        if self.entry.take().is_some() {
            log::debug!("dataset cache cleared for {}", self.path.display());
        }
    }

    /// How many times the source file has actually been read.
    pub fn load_count(&self) -> usize {
        self.loads
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::data::loader::test_files::write_fixture;

    const CSV: &str = "region,parsed_timestamp,adjudication_price\n\
                       ile-de-france,2005-03-01,100\n";

    #[test]
    fn second_get_reuses_the_same_dataset() {
        let path = write_fixture("cache-hit", CSV);
        let mut cache = DatasetCache::new(&path);

        let a = cache.get().unwrap();
        let b = cache.get().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(*a, *b);
        assert_eq!(cache.load_count(), 1);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn clear_forces_a_reload() {
        let path = write_fixture("cache-clear", CSV);
        let mut cache = DatasetCache::new(&path);

        let a = cache.get().unwrap();
        cache.clear();
        let b = cache.get().unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(*a, *b);
        assert_eq!(cache.load_count(), 2);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn modified_file_is_reloaded() {
        let path = write_fixture("cache-mtime", CSV);
        let mut cache = DatasetCache::new(&path);
        assert_eq!(cache.get().unwrap().len(), 1);

        std::fs::write(
            &path,
            format!("{CSV}bretagne-grand-ouest,2010-01-01,200\n"),
        )
        .unwrap();
        let later = SystemTime::now() + Duration::from_secs(60);
        std::fs::File::options()
            .write(true)
            .open(&path)
            .and_then(|f| f.set_modified(later))
            .unwrap();

        assert_eq!(cache.get().unwrap().len(), 2);
        assert_eq!(cache.load_count(), 2);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn entry_without_mtime_stays_current() {
        let entry = Entry {
            dataset: Arc::new(crate::data::model::fixtures::scenario()),
            modified: None,
        };
        assert!(entry.is_current(None));
        assert!(!entry.is_current(Some(SystemTime::now())));

        let stamped = Entry {
            modified: Some(SystemTime::UNIX_EPOCH),
            ..entry
        };
        assert!(stamped.is_current(Some(SystemTime::UNIX_EPOCH)));
        assert!(!stamped.is_current(None));
    }

    #[test]
    fn missing_source_is_not_cached() {
        let path = std::env::temp_dir().join("oction-dashboard-cache-missing.csv");
        let mut cache = DatasetCache::new(&path);
        assert!(matches!(cache.get(), Err(LoadError::NotFound { .. })));
        assert_eq!(cache.load_count(), 0);
    }
}
