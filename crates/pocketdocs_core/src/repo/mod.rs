//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the record-store contracts consumed by the services.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repositories only accept fully migrated connections (`try_new`).
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod alarm_repo;
pub mod document_repo;
pub mod error;
pub mod profile_repo;
pub(crate) mod schema;
