//! Explicit change signal returned by every document mutation.
//!
//! Callers refresh derived views (the profile-wide tree) when a version they
//! hold differs from the one reported here.

use crate::model::profile::ProfileId;
use serde::{Deserialize, Serialize};

/// Tree version of one profile after a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileVersion {
    pub profile_id: ProfileId,
    pub version: u64,
}

/// Mutation result: the changed value plus the new tree version of every
/// affected profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeChange<T> {
    pub value: T,
    pub versions: Vec<ProfileVersion>,
}

impl<T> TreeChange<T> {
    pub fn new(value: T, versions: Vec<ProfileVersion>) -> Self {
        Self { value, versions }
    }

    /// Version reported for `profile_id`, if the mutation touched it.
    pub fn version_of(&self, profile_id: ProfileId) -> Option<u64> {
        self.versions
            .iter()
            .find(|entry| entry.profile_id == profile_id)
            .map(|entry| entry.version)
    }
}
