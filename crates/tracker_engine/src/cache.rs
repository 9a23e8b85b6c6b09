use sha2::{Digest, Sha256};
use tracker_core::Catalog;
use tracker_logging::tracker_debug;

use crate::{parse_catalog, SourceFormat, UploadError};

type ContentDigest = [u8; 32];

struct CacheEntry {
    digest: ContentDigest,
    format: SourceFormat,
    catalog: Catalog,
}

/// Remembers the catalog of the most recent upload, keyed by a SHA-256 of
/// its bytes, so re-submitting identical content skips parsing.
///
/// Holds a single entry: any upload with different content (or a failed
/// upload) evicts it.
#[derive(Default)]
pub struct CatalogCache {
    entry: Option<CacheEntry>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, bytes: &[u8], filename: &str) -> Result<Catalog, UploadError> {
        let format = match SourceFormat::from_filename(filename) {
            Ok(format) => format,
            Err(err) => {
                self.invalidate();
                return Err(err);
            }
        };
        let digest = content_digest(bytes);
        if let Some(entry) = &self.entry {
            if entry.digest == digest && entry.format == format {
                tracker_debug!("Catalog cache hit for {}", filename);
                return Ok(entry.catalog.clone());
            }
        }

        self.invalidate();
        let catalog = parse_catalog(bytes, format)?;
        self.entry = Some(CacheEntry {
            digest,
            format,
            catalog: catalog.clone(),
        });
        Ok(catalog)
    }

    pub fn is_cached(&self, bytes: &[u8], filename: &str) -> bool {
        let Ok(format) = SourceFormat::from_filename(filename) else {
            return false;
        };
        self.entry
            .as_ref()
            .is_some_and(|entry| entry.format == format && entry.digest == content_digest(bytes))
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}

fn content_digest(bytes: &[u8]) -> ContentDigest {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}
