//! Document domain model.
//!
//! # Responsibility
//! - Define the flat, persisted document record and its kind.
//! - Define the derived in-memory tree node built from flat records.
//!
//! # Invariants
//! - `id` is unique across the whole store; parents are referenced by id.
//! - A non-null `parent_id` references a `Folder` in the same profile.
//! - `File` nodes never have children.
//! - `DocumentNode` is never persisted; it is rebuilt on every read.

use crate::model::profile::ProfileId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable document identifier.
pub type DocumentId = Uuid;

/// Document category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentKind {
    /// Container that may hold child documents.
    Folder,
    /// Leaf document.
    File,
}

impl DocumentKind {
    /// Stored/wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Folder => "FOLDER",
            Self::File => "FILE",
        }
    }

    /// Parses the stored representation. Matching is case-insensitive.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "FOLDER" => Some(Self::Folder),
            "FILE" => Some(Self::File),
            _ => None,
        }
    }

    /// Classifies an uploaded item by its MIME type.
    ///
    /// Images and videos become files; anything else is stored as a folder,
    /// which is how uploads have always been classified.
    pub fn from_mime_type(mime_type: &str) -> Self {
        let mime_type = mime_type.trim().to_ascii_lowercase();
        if mime_type.starts_with("image/") || mime_type.starts_with("video/") {
            Self::File
        } else {
            Self::Folder
        }
    }

    /// Whether records of this kind may be referenced as a parent.
    pub fn can_contain_children(self) -> bool {
        matches!(self, Self::Folder)
    }
}

/// Flat document record as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    pub id: DocumentId,
    pub name: String,
    pub kind: DocumentKind,
    /// Epoch ms. Set on creation only.
    pub modified_at: i64,
    /// `None` means root-level document.
    pub parent_id: Option<DocumentId>,
    #[serde(rename = "ownerProfileId")]
    pub profile_id: ProfileId,
}

impl DocumentRecord {
    /// Returns whether this record is a folder.
    pub fn is_folder(&self) -> bool {
        self.kind == DocumentKind::Folder
    }

    /// Returns whether this record sits at the root of its profile.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Tree node derived from a [`DocumentRecord`].
///
/// Children are owned exclusively by their parent and keep the input order
/// of the records they were built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentNode {
    #[serde(flatten)]
    pub record: DocumentRecord,
    pub children: Vec<DocumentNode>,
}

impl DocumentNode {
    /// Wraps a record into a childless node.
    pub fn new(record: DocumentRecord) -> Self {
        Self {
            record,
            children: Vec::new(),
        }
    }

    /// Shortcut to the wrapped record id.
    pub fn id(&self) -> DocumentId {
        self.record.id
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }
}

/// Insert payload for one document record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocument {
    pub name: String,
    pub kind: DocumentKind,
    pub parent_id: Option<DocumentId>,
    pub profile_id: ProfileId,
}

/// Metadata of one uploaded item. Content bytes are not stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadDescriptor {
    pub filename: String,
    pub mime_type: String,
}

impl UploadDescriptor {
    pub fn new(filename: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            mime_type: mime_type.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DocumentKind;

    #[test]
    fn kind_parse_accepts_stored_values_only() {
        assert_eq!(DocumentKind::parse("FOLDER"), Some(DocumentKind::Folder));
        assert_eq!(DocumentKind::parse("file"), Some(DocumentKind::File));
        assert_eq!(DocumentKind::parse("note"), None);
    }

    #[test]
    fn mime_classification_marks_media_as_files() {
        assert_eq!(
            DocumentKind::from_mime_type("image/png"),
            DocumentKind::File
        );
        assert_eq!(
            DocumentKind::from_mime_type("Video/MP4"),
            DocumentKind::File
        );
        assert_eq!(
            DocumentKind::from_mime_type("application/pdf"),
            DocumentKind::Folder
        );
    }
}
