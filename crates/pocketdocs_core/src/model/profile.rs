//! Profile domain model.
//!
//! A profile is the ownership boundary for documents and alarms. One user
//! may hold several profiles.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable profile identifier.
pub type ProfileId = Uuid;

/// Authenticated user identifier, issued outside this crate.
pub type UserId = Uuid;

/// Persisted profile row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: ProfileId,
    pub user_id: UserId,
    pub name: String,
    /// Epoch ms creation timestamp.
    pub created_at: i64,
    /// Increments on every document mutation touching this profile.
    pub tree_version: u64,
}
