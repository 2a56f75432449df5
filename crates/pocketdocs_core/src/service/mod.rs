//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Authorize every call against the caller's profiles.
//! - Keep request/route layers decoupled from storage details.

pub mod access;
pub mod alarm_service;
pub mod document_service;
pub mod error;
pub mod profile_service;
