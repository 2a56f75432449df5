//! Profile repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Profiles of one user list in creation order.
//! - Deleting a profile cascades to its documents and alarms.

use crate::model::profile::{Profile, ProfileId, UserId};
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::schema::{ensure_table_ready, parse_uuid};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const PROFILE_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    name,
    created_at,
    tree_version
FROM profiles";

/// Repository interface for profiles.
pub trait ProfileRepository {
    fn create_profile(&self, user_id: UserId, name: &str) -> RepoResult<Profile>;
    fn get_profile(&self, id: ProfileId) -> RepoResult<Option<Profile>>;
    fn list_profiles(&self, user_id: UserId) -> RepoResult<Vec<Profile>>;
    /// Deletes one profile and returns its prior state.
    fn delete_profile(&self, id: ProfileId) -> RepoResult<Profile>;
}

/// SQLite-backed profile repository.
pub struct SqliteProfileRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProfileRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(
            conn,
            "profiles",
            &["id", "user_id", "name", "created_at", "tree_version"],
        )?;
        Ok(Self { conn })
    }
}

impl ProfileRepository for SqliteProfileRepository<'_> {
    fn create_profile(&self, user_id: UserId, name: &str) -> RepoResult<Profile> {
        let id = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO profiles (id, user_id, name) VALUES (?1, ?2, ?3);",
            params![id.to_string(), user_id.to_string(), name],
        )?;
        self.get_profile(id)?
            .ok_or_else(|| RepoError::not_found("profile", id))
    }

    fn get_profile(&self, id: ProfileId) -> RepoResult<Option<Profile>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROFILE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_profile_row(row)?));
        }
        Ok(None)
    }

    fn list_profiles(&self, user_id: UserId) -> RepoResult<Vec<Profile>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PROFILE_SELECT_SQL}
             WHERE user_id = ?1
             ORDER BY created_at ASC, rowid ASC;"
        ))?;
        let mut rows = stmt.query([user_id.to_string()])?;
        let mut profiles = Vec::new();
        while let Some(row) = rows.next()? {
            profiles.push(parse_profile_row(row)?);
        }
        Ok(profiles)
    }

    fn delete_profile(&self, id: ProfileId) -> RepoResult<Profile> {
        let profile = self
            .get_profile(id)?
            .ok_or_else(|| RepoError::not_found("profile", id))?;
        self.conn
            .execute("DELETE FROM profiles WHERE id = ?1;", [id.to_string()])?;
        Ok(profile)
    }
}

fn parse_profile_row(row: &Row<'_>) -> RepoResult<Profile> {
    let id_text: String = row.get("id")?;
    let user_text: String = row.get("user_id")?;
    let tree_version: i64 = row.get("tree_version")?;
    Ok(Profile {
        id: parse_uuid(&id_text, "profiles.id")?,
        user_id: parse_uuid(&user_text, "profiles.user_id")?,
        name: row.get("name")?,
        created_at: row.get("created_at")?,
        tree_version: u64::try_from(tree_version).map_err(|_| {
            RepoError::InvalidData(format!(
                "invalid tree_version `{tree_version}` in profiles.tree_version"
            ))
        })?,
    })
}
