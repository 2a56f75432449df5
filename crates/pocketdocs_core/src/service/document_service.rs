//! Document hierarchy use-case service.
//!
//! # Responsibility
//! - Authorize every operation against the caller's profiles.
//! - Provide tree read, search, folder creation, upload, rename, move and
//!   delete.
//!
//! # Invariants
//! - A parent must exist in the same profile and be a folder.
//! - Move never places a document inside itself or its own subtree. Parent
//!   and cycle checks run inside the repository's write transaction, so a
//!   concurrent move cannot slip between check and write.
//! - Mutations return the new tree version of every profile they touched.
//! - Rename and move leave `modified_at` untouched.
//! - Failed mutations log `status=error` with the stable error code.

use crate::hierarchy::{build_tree_with, resolve_parent, search, TreeOptions};
use crate::model::change::TreeChange;
use crate::model::document::{
    DocumentId, DocumentKind, DocumentNode, DocumentRecord, NewDocument, UploadDescriptor,
};
use crate::model::name::normalize_name;
use crate::model::profile::ProfileId;
use crate::repo::document_repo::{DocumentFilter, DocumentRepository};
use crate::service::access::Caller;
use crate::service::error::ServiceError;
use log::{debug, info, warn};

/// Document forest of one profile at a given tree version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileTree {
    pub profile_id: ProfileId,
    pub version: u64,
    pub roots: Vec<DocumentNode>,
}

/// Document hierarchy service facade.
pub struct DocumentService<R: DocumentRepository> {
    repo: R,
    options: TreeOptions,
}

impl<R: DocumentRepository> DocumentService<R> {
    /// Creates service with default tree options.
    pub fn new(repo: R) -> Self {
        Self::with_options(repo, TreeOptions::default())
    }

    pub fn with_options(repo: R, options: TreeOptions) -> Self {
        Self { repo, options }
    }

    /// Builds the document forest of one profile.
    pub fn document_tree(
        &self,
        caller: &Caller,
        profile_id: ProfileId,
    ) -> Result<ProfileTree, ServiceError> {
        let profile_id = caller.authorize(profile_id)?;
        let version = self.repo.tree_version(profile_id)?;
        let records = self.repo.find_many(&DocumentFilter::profile(profile_id))?;
        let record_count = records.len();
        let roots = build_tree_with(records, &self.options);
        debug!(
            "event=document_tree module=documents status=ok profile_id={profile_id} version={version} records={record_count} roots={}",
            roots.len()
        );
        Ok(ProfileTree {
            profile_id,
            version,
            roots,
        })
    }

    /// Searches one profile's forest by name.
    ///
    /// Returns matching nodes, each with its own subtree, in depth-first
    /// pre-order. An empty query returns nothing.
    pub fn search_documents(
        &self,
        caller: &Caller,
        profile_id: ProfileId,
        query: &str,
    ) -> Result<Vec<DocumentNode>, ServiceError> {
        let tree = self.document_tree(caller, profile_id)?;
        let hits: Vec<DocumentNode> = search(&tree.roots, query)
            .into_iter()
            .cloned()
            .collect();
        debug!(
            "event=document_search module=documents status=ok profile_id={profile_id} query_chars={} hits={}",
            query.chars().count(),
            hits.len()
        );
        Ok(hits)
    }

    /// Creates one folder under the last breadcrumb of `parent_path`, or at
    /// root when the path is empty.
    pub fn create_folder(
        &self,
        caller: &Caller,
        profile_id: ProfileId,
        name: &str,
        parent_path: &[DocumentId],
    ) -> Result<TreeChange<DocumentRecord>, ServiceError> {
        let result = (|| -> Result<_, ServiceError> {
            let profile_id = caller.authorize(profile_id)?;
            let document = NewDocument {
                name: normalize_name(name)?,
                kind: DocumentKind::Folder,
                parent_id: resolve_parent(parent_path).copied(),
                profile_id,
            };
            Ok(self.repo.create(&document)?)
        })();

        let change = log_failure("folder_create", result)?;
        info!(
            "event=folder_create module=documents status=ok profile_id={profile_id} document_id={} depth={}",
            change.value.id,
            parent_path.len()
        );
        Ok(change)
    }

    /// Creates one record per uploaded item under the last breadcrumb of
    /// `parent_path`. All records are written atomically.
    pub fn upload_documents(
        &self,
        caller: &Caller,
        profile_id: ProfileId,
        parent_path: &[DocumentId],
        uploads: &[UploadDescriptor],
    ) -> Result<TreeChange<Vec<DocumentRecord>>, ServiceError> {
        let result = (|| -> Result<_, ServiceError> {
            let profile_id = caller.authorize(profile_id)?;
            let parent_id = resolve_parent(parent_path).copied();
            let documents = uploads
                .iter()
                .map(|upload| {
                    Ok(NewDocument {
                        name: normalize_name(&upload.filename)?,
                        kind: DocumentKind::from_mime_type(&upload.mime_type),
                        parent_id,
                        profile_id,
                    })
                })
                .collect::<Result<Vec<_>, ServiceError>>()?;
            Ok(self.repo.create_many(&documents)?)
        })();

        let change = log_failure("document_upload", result)?;
        info!(
            "event=document_upload module=documents status=ok profile_id={profile_id} count={}",
            change.value.len()
        );
        Ok(change)
    }

    /// Renames one document owned by `profile_id`.
    pub fn rename_document(
        &self,
        caller: &Caller,
        profile_id: ProfileId,
        document_id: DocumentId,
        new_name: &str,
    ) -> Result<TreeChange<DocumentRecord>, ServiceError> {
        let result = (|| -> Result<_, ServiceError> {
            let profile_id = caller.authorize(profile_id)?;
            let name = normalize_name(new_name)?;
            self.find_in_profile(document_id, profile_id)?;
            Ok(self.repo.rename(document_id, &name)?)
        })();

        let change = log_failure("document_rename", result)?;
        info!(
            "event=document_rename module=documents status=ok profile_id={profile_id} document_id={document_id}"
        );
        Ok(change)
    }

    /// Moves a document, with its subtree, under a new parent and/or into
    /// another of the caller's profiles.
    ///
    /// `destination_parent_id = None` moves the document to the root of
    /// `destination_profile_id`.
    pub fn move_document(
        &self,
        caller: &Caller,
        document_id: DocumentId,
        destination_profile_id: ProfileId,
        destination_parent_id: Option<DocumentId>,
    ) -> Result<TreeChange<DocumentRecord>, ServiceError> {
        let result = (|| -> Result<_, ServiceError> {
            let destination_profile_id = caller.authorize(destination_profile_id)?;
            let document = self
                .repo
                .find(document_id)?
                .filter(|document| caller.owns(document.profile_id))
                .ok_or(ServiceError::DocumentNotFound(document_id))?;
            let change = self.repo.relocate(
                document_id,
                destination_profile_id,
                destination_parent_id,
            )?;
            Ok((document.profile_id, change))
        })();

        let (from_profile, change) = log_failure("document_move", result)?;
        info!(
            "event=document_move module=documents status=ok document_id={document_id} from_profile={from_profile} to_profile={destination_profile_id} to_root={}",
            destination_parent_id.is_none()
        );
        Ok(change)
    }

    /// Deletes a document owned by `profile_id`; descendants go with it.
    ///
    /// Returns the deleted record's prior state.
    pub fn delete_document(
        &self,
        caller: &Caller,
        profile_id: ProfileId,
        document_id: DocumentId,
    ) -> Result<TreeChange<DocumentRecord>, ServiceError> {
        let result = (|| -> Result<_, ServiceError> {
            let profile_id = caller.authorize(profile_id)?;
            self.find_in_profile(document_id, profile_id)?;
            Ok(self.repo.delete(document_id)?)
        })();

        let change = log_failure("document_delete", result)?;
        info!(
            "event=document_delete module=documents status=ok profile_id={profile_id} document_id={document_id} kind={}",
            change.value.kind.as_str()
        );
        Ok(change)
    }

    fn find_in_profile(
        &self,
        document_id: DocumentId,
        profile_id: ProfileId,
    ) -> Result<DocumentRecord, ServiceError> {
        self.repo
            .find(document_id)?
            .filter(|document| document.profile_id == profile_id)
            .ok_or(ServiceError::DocumentNotFound(document_id))
    }
}

fn log_failure<T>(event: &'static str, result: Result<T, ServiceError>) -> Result<T, ServiceError> {
    if let Err(err) = &result {
        warn!(
            "event={event} module=documents status=error error_code={}",
            err.code()
        );
    }
    result
}
