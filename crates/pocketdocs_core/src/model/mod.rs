//! Domain model for profiles, their document hierarchy and alarms.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep name/time validation next to the types they guard.
//!
//! # Invariants
//! - Every object is identified by a stable UUID.
//! - Documents and alarms always belong to exactly one profile.

pub mod alarm;
pub mod change;
pub mod document;
pub mod name;
pub mod profile;
