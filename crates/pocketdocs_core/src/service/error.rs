//! Service-level error taxonomy.
//!
//! # Invariants
//! - A referenced id that does not exist and one that exists in another
//!   profile produce the same `*NotFound` variant.
//! - `Forbidden` is reserved for naming a profile the caller does not hold.

use crate::model::alarm::{AlarmId, AlarmTimeError};
use crate::model::document::DocumentId;
use crate::model::name::NameValidationError;
use crate::model::profile::ProfileId;
use crate::repo::error::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Coarse classification used by request handlers to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Forbidden,
    Invalid,
    Storage,
}

/// Errors from service operations.
#[derive(Debug)]
pub enum ServiceError {
    /// Caller does not hold the named profile.
    Forbidden(ProfileId),
    /// Document does not resolve in the caller's profile scope.
    DocumentNotFound(DocumentId),
    /// Parent/destination folder does not resolve in the target profile.
    ParentNotFound(DocumentId),
    /// Profile does not exist.
    ProfileNotFound(ProfileId),
    /// Alarm does not resolve in the caller's profile scope.
    AlarmNotFound(AlarmId),
    /// Parent exists but is not a folder.
    ParentMustBeFolder(DocumentId),
    /// Move would place a document inside itself or its own subtree.
    CycleDetected {
        document_id: DocumentId,
        parent_id: DocumentId,
    },
    /// Name rejected by normalization or length rules.
    InvalidName(NameValidationError),
    /// Alarm time is not a valid `HH:mm` value.
    InvalidAlarmTime(AlarmTimeError),
    /// Repository-level failure.
    Repo(RepoError),
}

impl ServiceError {
    /// Classifies this error for the request layer.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::DocumentNotFound(_)
            | Self::ParentNotFound(_)
            | Self::ProfileNotFound(_)
            | Self::AlarmNotFound(_) => ErrorKind::NotFound,
            Self::ParentMustBeFolder(_)
            | Self::CycleDetected { .. }
            | Self::InvalidName(_)
            | Self::InvalidAlarmTime(_) => ErrorKind::Invalid,
            Self::Repo(_) => ErrorKind::Storage,
        }
    }

    /// Stable code used in structured log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Forbidden(_) => "forbidden",
            Self::DocumentNotFound(_) => "document_not_found",
            Self::ParentNotFound(_) => "parent_not_found",
            Self::ProfileNotFound(_) => "profile_not_found",
            Self::AlarmNotFound(_) => "alarm_not_found",
            Self::ParentMustBeFolder(_) => "parent_not_folder",
            Self::CycleDetected { .. } => "cycle_detected",
            Self::InvalidName(_) => "invalid_name",
            Self::InvalidAlarmTime(_) => "invalid_alarm_time",
            Self::Repo(_) => "storage_error",
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Forbidden(id) => write!(f, "access to profile {id} is not allowed"),
            Self::DocumentNotFound(id) => write!(f, "document not found: {id}"),
            Self::ParentNotFound(id) => write!(f, "destination folder not found: {id}"),
            Self::ProfileNotFound(id) => write!(f, "profile not found: {id}"),
            Self::AlarmNotFound(id) => write!(f, "alarm not found: {id}"),
            Self::ParentMustBeFolder(id) => write!(f, "parent must be a folder: {id}"),
            Self::CycleDetected {
                document_id,
                parent_id,
            } => write!(
                f,
                "move would create cycle: document {document_id} under parent {parent_id}"
            ),
            Self::InvalidName(err) => write!(f, "{err}"),
            Self::InvalidAlarmTime(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidName(err) => Some(err),
            Self::InvalidAlarmTime(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound {
                entity: "document",
                id,
            } => Self::DocumentNotFound(id),
            RepoError::NotFound {
                entity: "profile",
                id,
            } => Self::ProfileNotFound(id),
            RepoError::NotFound { entity: "alarm", id } => Self::AlarmNotFound(id),
            RepoError::NotFound {
                entity: "parent",
                id,
            } => Self::ParentNotFound(id),
            RepoError::ParentNotFolder(id) => Self::ParentMustBeFolder(id),
            RepoError::CycleDetected {
                document_id,
                parent_id,
            } => Self::CycleDetected {
                document_id,
                parent_id,
            },
            other => Self::Repo(other),
        }
    }
}

impl From<NameValidationError> for ServiceError {
    fn from(value: NameValidationError) -> Self {
        Self::InvalidName(value)
    }
}

impl From<AlarmTimeError> for ServiceError {
    fn from(value: AlarmTimeError) -> Self {
        Self::InvalidAlarmTime(value)
    }
}
