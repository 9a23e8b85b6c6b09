//! Tracker engine: catalog ingestion and durable progress storage.
mod cache;
mod csv_source;
mod decode;
mod error;
mod format;
mod normalize;
mod persist;
mod progress_store;
mod table;
mod xlsx_source;

pub use cache::CatalogCache;
pub use csv_source::read_csv;
pub use decode::{decode_text, DecodeError, DecodedText};
pub use error::UploadError;
pub use format::SourceFormat;
pub use normalize::{
    load_catalog, normalize_table, parse_catalog, resolve_columns, ColumnMap, LogicalColumn,
    NormalizeReport,
};
pub use persist::{ensure_parent_dir, AtomicFileWriter, PersistError};
pub use progress_store::{ProgressStore, DEFAULT_PROGRESS_FILE};
pub use table::RawTable;
pub use xlsx_source::read_xlsx;
