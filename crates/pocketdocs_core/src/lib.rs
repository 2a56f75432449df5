//! Core domain logic for PocketDocs.
//! Profiles own a folder/file hierarchy and alarms; this crate holds the
//! record store, the hierarchy engine and the services over both.

pub mod db;
pub mod hierarchy;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{open_db, open_db_in_memory, DbError};
pub use hierarchy::{build_tree, build_tree_with, search, OrphanPolicy, TreeOptions};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::alarm::{Alarm, AlarmDraft, AlarmId, AlarmTime};
pub use model::change::{ProfileVersion, TreeChange};
pub use model::document::{
    DocumentId, DocumentKind, DocumentNode, DocumentRecord, NewDocument, UploadDescriptor,
};
pub use model::profile::{Profile, ProfileId, UserId};
pub use repo::alarm_repo::{AlarmRepository, SqliteAlarmRepository};
pub use repo::document_repo::{DocumentFilter, DocumentRepository, SqliteDocumentRepository};
pub use repo::error::{RepoError, RepoResult};
pub use repo::profile_repo::{ProfileRepository, SqliteProfileRepository};
pub use service::access::Caller;
pub use service::alarm_service::AlarmService;
pub use service::document_service::{DocumentService, ProfileTree};
pub use service::error::{ErrorKind, ServiceError};
pub use service::profile_service::ProfileService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
