//! Core domain logic for notedesk.
//! This crate is the single source of truth for note invariants and the
//! notes file format.

pub mod codec;
pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
pub mod store;

pub use codec::line_format::{
    deserialize, deserialize_bytes_with_capacity, deserialize_with_capacity, serialize,
    CodecError, Decoded, RecordError, SkippedRecord,
};
pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_from_config, init_logging, logging_status};
pub use model::category::Category;
pub use model::note::{Note, NoteValidationError};
pub use repo::note_file::{NoteFile, RepoError, RepoResult};
pub use search::pattern::{KeywordPattern, SearchError, SearchQuery, SearchResult};
pub use service::note_service::{LoadSummary, NoteEdit, NoteService, ServiceError, ServiceResult};
pub use store::note_store::{NoteHit, NoteStore, StoreError, StoreResult, MAX_NOTES};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
