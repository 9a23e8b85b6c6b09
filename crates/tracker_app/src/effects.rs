use tracker_core::{Catalog, Effect, Msg};
use tracker_engine::{CatalogCache, PersistError, ProgressStore, UploadError};
use tracker_logging::{tracker_info, tracker_warn};

/// Result of running one effect.
#[derive(Debug)]
pub enum EffectOutcome {
    Parsed {
        filename: String,
        result: Result<Catalog, UploadError>,
    },
    Persisted(Result<(), PersistError>),
}

impl EffectOutcome {
    /// Message that reports this outcome back to the state machine.
    pub fn follow_up(&self) -> Option<Msg> {
        match self {
            EffectOutcome::Parsed { filename, result } => Some(parsed_msg(filename, result)),
            EffectOutcome::Persisted(Ok(())) => None,
            EffectOutcome::Persisted(Err(err)) => Some(Msg::PersistFailed {
                message: err.to_string(),
            }),
        }
    }

    pub fn into_persist_error(self) -> Option<PersistError> {
        match self {
            EffectOutcome::Persisted(Err(err)) => Some(err),
            _ => None,
        }
    }
}

/// Reports a parse result to the state machine.
pub(crate) fn parsed_msg(filename: &str, result: &Result<Catalog, UploadError>) -> Msg {
    match result {
        Ok(catalog) => Msg::CatalogLoaded {
            filename: filename.to_string(),
            catalog: catalog.clone(),
        },
        Err(err) => Msg::UploadRejected {
            filename: filename.to_string(),
            failure: err.failure(),
        },
    }
}

/// Executes core effects against the catalog cache and the progress store.
pub struct EffectRunner {
    store: ProgressStore,
    cache: CatalogCache,
}

impl EffectRunner {
    pub fn new(store: ProgressStore) -> Self {
        Self {
            store,
            cache: CatalogCache::new(),
        }
    }

    pub fn store(&self) -> &ProgressStore {
        &self.store
    }

    pub fn run(&mut self, effect: Effect) -> EffectOutcome {
        match effect {
            Effect::ParseCatalog { filename, bytes } => {
                let result = self.parse(&bytes, &filename);
                EffectOutcome::Parsed { filename, result }
            }
            Effect::PersistCompletion { url, complete } => {
                EffectOutcome::Persisted(self.store.toggle(&url, complete))
            }
            Effect::ResetProgress => {
                tracker_info!("Resetting progress at {:?}", self.store.path());
                EffectOutcome::Persisted(self.store.reset())
            }
        }
    }

    pub fn parse(&mut self, bytes: &[u8], filename: &str) -> Result<Catalog, UploadError> {
        let result = self.cache.load(bytes, filename);
        if let Err(err) = &result {
            tracker_warn!("Upload {} rejected: {}", filename, err);
        }
        result
    }
}
