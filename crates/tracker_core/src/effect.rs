#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Parse uploaded bytes into a catalog.
    ParseCatalog { filename: String, bytes: Vec<u8> },
    /// Write one completion change through to durable storage.
    PersistCompletion { url: String, complete: bool },
    /// Clear durable storage.
    ResetProgress,
}
