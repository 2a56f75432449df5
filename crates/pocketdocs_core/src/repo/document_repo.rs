//! Document record store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide the flat record store the hierarchy engine reads and writes.
//! - Keep SQL details, transactions and tree-version bookkeeping inside the
//!   repository boundary.
//!
//! # Invariants
//! - Listing order is insertion order (`seq ASC`), which is the child order
//!   of the built tree.
//! - Every write bumps `profiles.tree_version` of each affected profile in
//!   the same transaction as the write itself.
//! - A new or moved record's parent is checked inside the write
//!   transaction: it must be a folder of the target profile, and for moves it
//!   must not lie inside the moved subtree.
//! - `relocate` changes parent and owning profile in one transaction and
//!   re-owns the whole subtree, so no reader sees a half-moved document.
//! - Deleting a folder removes its descendants through the
//!   `ON DELETE CASCADE` foreign key.

use crate::model::change::{ProfileVersion, TreeChange};
use crate::model::document::{DocumentId, DocumentKind, DocumentRecord, NewDocument};
use crate::model::profile::ProfileId;
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::schema::{ensure_table_ready, parse_uuid};
use log::debug;
use rusqlite::types::Value;
use rusqlite::{
    params, params_from_iter, Connection, OptionalExtension, Row, Transaction,
    TransactionBehavior,
};
use std::collections::HashSet;
use uuid::Uuid;

const DOCUMENT_SELECT_SQL: &str = "SELECT
    id,
    name,
    kind,
    modified_at,
    parent_id,
    profile_id
FROM documents";

const DOCUMENT_COLUMNS: &[&str] = &[
    "seq",
    "id",
    "name",
    "kind",
    "modified_at",
    "parent_id",
    "profile_id",
];

/// Query options for listing documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentFilter {
    pub profile_id: Option<ProfileId>,
}

impl DocumentFilter {
    /// Every record owned by one profile.
    pub fn profile(profile_id: ProfileId) -> Self {
        Self {
            profile_id: Some(profile_id),
        }
    }
}

/// Repository interface for document records.
pub trait DocumentRepository {
    /// Loads one record by id, regardless of profile.
    fn find(&self, id: DocumentId) -> RepoResult<Option<DocumentRecord>>;
    /// Lists records matching `filter` in insertion order.
    fn find_many(&self, filter: &DocumentFilter) -> RepoResult<Vec<DocumentRecord>>;
    /// Inserts one record with `modified_at = now`. A parent must be a folder
    /// of the same profile.
    fn create(&self, document: &NewDocument) -> RepoResult<TreeChange<DocumentRecord>>;
    /// Inserts several records atomically, preserving slice order.
    fn create_many(&self, documents: &[NewDocument])
        -> RepoResult<TreeChange<Vec<DocumentRecord>>>;
    /// Replaces the name of one record. `modified_at` is left untouched.
    fn rename(&self, id: DocumentId, name: &str) -> RepoResult<TreeChange<DocumentRecord>>;
    /// Sets parent and owning profile of one record together.
    ///
    /// Fails with `NotFound { entity: "parent" }`, `ParentNotFolder` or
    /// `CycleDetected` when `parent_id` cannot hold the record.
    fn relocate(
        &self,
        id: DocumentId,
        profile_id: ProfileId,
        parent_id: Option<DocumentId>,
    ) -> RepoResult<TreeChange<DocumentRecord>>;
    /// Deletes one record and, by cascade, its descendants.
    ///
    /// Returns the record as it was before deletion.
    fn delete(&self, id: DocumentId) -> RepoResult<TreeChange<DocumentRecord>>;
    /// Current tree version of one profile.
    fn tree_version(&self, profile_id: ProfileId) -> RepoResult<u64>;
}

/// SQLite-backed document repository.
pub struct SqliteDocumentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDocumentRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, "documents", DOCUMENT_COLUMNS)?;
        ensure_table_ready(conn, "profiles", &["id", "tree_version"])?;
        Ok(Self { conn })
    }

    fn begin(&self) -> RepoResult<Transaction<'conn>> {
        Ok(Transaction::new_unchecked(
            self.conn,
            TransactionBehavior::Immediate,
        )?)
    }
}

impl DocumentRepository for SqliteDocumentRepository<'_> {
    fn find(&self, id: DocumentId) -> RepoResult<Option<DocumentRecord>> {
        load_document(self.conn, id)
    }

    fn find_many(&self, filter: &DocumentFilter) -> RepoResult<Vec<DocumentRecord>> {
        let mut sql = format!("{DOCUMENT_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(profile_id) = filter.profile_id {
            sql.push_str(" AND profile_id = ?");
            bind_values.push(Value::Text(profile_id.to_string()));
        }

        sql.push_str(" ORDER BY seq ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut documents = Vec::new();
        while let Some(row) = rows.next()? {
            documents.push(parse_document_row(row)?);
        }
        Ok(documents)
    }

    fn create(&self, document: &NewDocument) -> RepoResult<TreeChange<DocumentRecord>> {
        let tx = self.begin()?;
        let version = bump_tree_version(&tx, document.profile_id)?;
        if let Some(parent_id) = document.parent_id {
            load_parent_folder(&tx, parent_id, document.profile_id)?;
        }
        let record = insert_document(&tx, document)?;
        tx.commit()?;
        Ok(TreeChange::new(record, vec![version]))
    }

    fn create_many(
        &self,
        documents: &[NewDocument],
    ) -> RepoResult<TreeChange<Vec<DocumentRecord>>> {
        let tx = self.begin()?;
        let mut versions: Vec<ProfileVersion> = Vec::new();
        let mut records = Vec::with_capacity(documents.len());
        for document in documents {
            if !versions
                .iter()
                .any(|entry| entry.profile_id == document.profile_id)
            {
                versions.push(bump_tree_version(&tx, document.profile_id)?);
            }
            if let Some(parent_id) = document.parent_id {
                load_parent_folder(&tx, parent_id, document.profile_id)?;
            }
            records.push(insert_document(&tx, document)?);
        }
        tx.commit()?;
        Ok(TreeChange::new(records, versions))
    }

    fn rename(&self, id: DocumentId, name: &str) -> RepoResult<TreeChange<DocumentRecord>> {
        let tx = self.begin()?;
        let current = load_required_document(&tx, id)?;
        tx.execute(
            "UPDATE documents
             SET name = ?2
             WHERE id = ?1;",
            params![id.to_string(), name],
        )?;
        let version = bump_tree_version(&tx, current.profile_id)?;
        let record = load_required_document(&tx, id)?;
        tx.commit()?;
        Ok(TreeChange::new(record, vec![version]))
    }

    fn relocate(
        &self,
        id: DocumentId,
        profile_id: ProfileId,
        parent_id: Option<DocumentId>,
    ) -> RepoResult<TreeChange<DocumentRecord>> {
        let tx = self.begin()?;
        let current = load_required_document(&tx, id)?;
        if let Some(parent_id) = parent_id {
            if parent_id == id {
                return Err(RepoError::CycleDetected {
                    document_id: id,
                    parent_id,
                });
            }
            let parent = load_parent_folder(&tx, parent_id, profile_id)?;
            ensure_outside_subtree(&tx, id, &parent)?;
        }

        let mut versions = vec![bump_tree_version(&tx, current.profile_id)?];
        if profile_id != current.profile_id {
            versions.push(bump_tree_version(&tx, profile_id)?);
        }

        tx.execute(
            "UPDATE documents
             SET parent_id = ?2,
                 profile_id = ?3
             WHERE id = ?1;",
            params![
                id.to_string(),
                parent_id.map(|value| value.to_string()),
                profile_id.to_string(),
            ],
        )?;
        let reowned = reown_descendants(&tx, id, profile_id)?;
        let record = load_required_document(&tx, id)?;
        tx.commit()?;

        debug!(
            "event=document_relocate module=repo status=ok document_id={id} reowned_descendants={reowned}"
        );
        Ok(TreeChange::new(record, versions))
    }

    fn delete(&self, id: DocumentId) -> RepoResult<TreeChange<DocumentRecord>> {
        let tx = self.begin()?;
        let record = load_required_document(&tx, id)?;
        tx.execute("DELETE FROM documents WHERE id = ?1;", [id.to_string()])?;
        let version = bump_tree_version(&tx, record.profile_id)?;
        tx.commit()?;
        Ok(TreeChange::new(record, vec![version]))
    }

    fn tree_version(&self, profile_id: ProfileId) -> RepoResult<u64> {
        let value: Option<i64> = self
            .conn
            .query_row(
                "SELECT tree_version FROM profiles WHERE id = ?1;",
                [profile_id.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        let value = value.ok_or_else(|| RepoError::not_found("profile", profile_id))?;
        to_version(value)
    }
}

fn insert_document(conn: &Connection, document: &NewDocument) -> RepoResult<DocumentRecord> {
    let id = Uuid::new_v4();
    conn.execute(
        "INSERT INTO documents (
            id,
            name,
            kind,
            modified_at,
            parent_id,
            profile_id
        ) VALUES (?1, ?2, ?3, (strftime('%s', 'now') * 1000), ?4, ?5);",
        params![
            id.to_string(),
            document.name.as_str(),
            document.kind.as_str(),
            document.parent_id.map(|value| value.to_string()),
            document.profile_id.to_string(),
        ],
    )?;
    load_required_document(conn, id)
}

fn bump_tree_version(conn: &Connection, profile_id: ProfileId) -> RepoResult<ProfileVersion> {
    let value: Option<i64> = conn
        .query_row(
            "UPDATE profiles
             SET tree_version = tree_version + 1
             WHERE id = ?1
             RETURNING tree_version;",
            [profile_id.to_string()],
            |row| row.get(0),
        )
        .optional()?;
    let value = value.ok_or_else(|| RepoError::not_found("profile", profile_id))?;
    Ok(ProfileVersion {
        profile_id,
        version: to_version(value)?,
    })
}

/// Loads `parent_id` as a folder owned by `profile_id`.
fn load_parent_folder(
    conn: &Connection,
    parent_id: DocumentId,
    profile_id: ProfileId,
) -> RepoResult<DocumentRecord> {
    let parent = load_document(conn, parent_id)?
        .filter(|parent| parent.profile_id == profile_id)
        .ok_or_else(|| RepoError::not_found("parent", parent_id))?;
    if !parent.kind.can_contain_children() {
        return Err(RepoError::ParentNotFolder(parent_id));
    }
    Ok(parent)
}

/// Walks from `parent` up to root and fails when the chain reaches `id`.
fn ensure_outside_subtree(
    conn: &Connection,
    id: DocumentId,
    parent: &DocumentRecord,
) -> RepoResult<()> {
    let mut visited = HashSet::from([parent.id]);
    let mut cursor = parent.parent_id;
    while let Some(current) = cursor {
        if current == id || !visited.insert(current) {
            return Err(RepoError::CycleDetected {
                document_id: id,
                parent_id: parent.id,
            });
        }
        cursor = load_document(conn, current)?.and_then(|record| record.parent_id);
    }
    Ok(())
}

fn reown_descendants(
    conn: &Connection,
    id: DocumentId,
    profile_id: ProfileId,
) -> RepoResult<usize> {
    let changed = conn.execute(
        "WITH RECURSIVE subtree(id) AS (
            SELECT id
            FROM documents
            WHERE parent_id = ?1
            UNION
            SELECT child.id
            FROM documents child
            INNER JOIN subtree parent ON child.parent_id = parent.id
        )
        UPDATE documents
        SET profile_id = ?2
        WHERE id IN (SELECT id FROM subtree)
          AND profile_id <> ?2;",
        params![id.to_string(), profile_id.to_string()],
    )?;
    Ok(changed)
}

fn load_document(conn: &Connection, id: DocumentId) -> RepoResult<Option<DocumentRecord>> {
    let mut stmt = conn.prepare(&format!("{DOCUMENT_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_document_row(row)?));
    }
    Ok(None)
}

fn load_required_document(conn: &Connection, id: DocumentId) -> RepoResult<DocumentRecord> {
    load_document(conn, id)?.ok_or_else(|| RepoError::not_found("document", id))
}

fn parse_document_row(row: &Row<'_>) -> RepoResult<DocumentRecord> {
    let id_text: String = row.get("id")?;
    let id = parse_uuid(&id_text, "documents.id")?;

    let parent_id = row
        .get::<_, Option<String>>("parent_id")?
        .map(|value| parse_uuid(&value, "documents.parent_id"))
        .transpose()?;

    let profile_text: String = row.get("profile_id")?;
    let profile_id = parse_uuid(&profile_text, "documents.profile_id")?;

    let kind_text: String = row.get("kind")?;
    let kind = DocumentKind::parse(&kind_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid document kind `{kind_text}` in documents.kind"
        ))
    })?;

    Ok(DocumentRecord {
        id,
        name: row.get("name")?,
        kind,
        modified_at: row.get("modified_at")?,
        parent_id,
        profile_id,
    })
}

fn to_version(value: i64) -> RepoResult<u64> {
    u64::try_from(value).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid tree_version `{value}` in profiles.tree_version"
        ))
    })
}
