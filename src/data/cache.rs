use std::io::Read;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use super::loader::{load_file, LoadError};
use super::model::Dataset;

// ---------------------------------------------------------------------------
// DatasetCache – parse-once memoization keyed by file content
// ---------------------------------------------------------------------------

/// Hex-encoded SHA-256 of a file's bytes.
pub fn file_sha256(path: &Path) -> std::io::Result<String> {
    let mut file = std::fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

#[derive(Debug)]
struct CacheEntry {
    path: PathBuf,
    content_hash: String,
    dataset: Dataset,
}

/// Memoizes the most recently loaded dataset. Re-parsing happens only when
/// the input file's content hash changes; re-opening the same (unchanged)
/// file is a cache hit.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entry: Option<CacheEntry>,
    hits: u64,
    misses: u64,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `path`, returning the cached dataset when the content is
    /// unchanged since the previous load.
    pub fn load(&mut self, path: &Path) -> Result<&Dataset, LoadError> {
        let hash = file_sha256(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let entry = match self.entry.take() {
            Some(entry) if entry.content_hash == hash => {
                log::debug!("cache hit for {}", path.display());
                self.hits += 1;
                entry
            }
            _ => {
                let dataset = load_file(path)?;
                log::info!(
                    "parsed {} ({} records, hash {})",
                    path.display(),
                    dataset.len(),
                    &hash[..12]
                );
                self.misses += 1;
                CacheEntry {
                    path: path.to_path_buf(),
                    content_hash: hash,
                    dataset,
                }
            }
        };

        Ok(&self.entry.insert(entry).dataset)
    }

    /// The currently cached dataset, if any.
    pub fn dataset(&self) -> Option<&Dataset> {
        self.entry.as_ref().map(|e| &e.dataset)
    }

    /// Path of the cached dataset, if any.
    pub fn source_path(&self) -> Option<&Path> {
        self.entry.as_ref().map(|e| e.path.as_path())
    }

    /// Drop the cached dataset.
    pub fn clear(&mut self) {
        self.entry = None;
    }

    /// (hits, misses) counters since creation.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CSV: &str = "\
Country,Region,Year,GDP (Billion USD),Economic Growth (%),Inflation (%),Unemployment Rate (%),Population (Millions),Manufacturing Output (Million Units),Energy Consumption (GWh),Digital Adoption Index (0-1),Carbon Emission (MT)
India,Asia,2020,2000,6.5,5.0,7.0,1380,420,1500,0.45,2400
";

    #[test]
    fn repeated_loads_hit_the_cache() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("data.csv");
        std::fs::write(&path, CSV).expect("write");

        let mut cache = DatasetCache::new();
        assert_eq!(cache.load(&path).expect("first load").len(), 1);
        assert_eq!(cache.load(&path).expect("second load").len(), 1);
        assert_eq!(cache.stats(), (1, 1));
    }

    #[test]
    fn changed_content_invalidates() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("data.csv");
        std::fs::write(&path, CSV).expect("write");

        let mut cache = DatasetCache::new();
        cache.load(&path).expect("first load");

        let extra = format!("{CSV}USA,Americas,2020,20000,2.1,1.8,4.0,331,600,4000,0.85,5000\n");
        let mut f = std::fs::File::create(&path).expect("rewrite");
        f.write_all(extra.as_bytes()).expect("write");
        drop(f);

        assert_eq!(cache.load(&path).expect("reload").len(), 2);
        assert_eq!(cache.stats(), (0, 2));
    }

    #[test]
    fn missing_file_propagates_io_error() {
        let mut cache = DatasetCache::new();
        let err = cache.load(Path::new("/nonexistent/data.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
