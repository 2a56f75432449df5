//! Recursive name search over a built document forest.
//!
//! # Invariants
//! - Matching is a case-insensitive substring test on `name`.
//! - Results are flat and in depth-first pre-order: a node is reported
//!   before anything inside it.
//! - An empty query means "no filter active" and yields no results.

use crate::model::document::DocumentNode;

/// Returns every node whose name contains `query`, at any depth.
pub fn search<'a>(roots: &'a [DocumentNode], query: &str) -> Vec<&'a DocumentNode> {
    if query.is_empty() {
        return Vec::new();
    }

    let needle = query.to_lowercase();
    let mut hits = Vec::new();
    let mut stack: Vec<&DocumentNode> = roots.iter().rev().collect();
    while let Some(node) = stack.pop() {
        if node.record.name.to_lowercase().contains(&needle) {
            hits.push(node);
        }
        stack.extend(node.children.iter().rev());
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::search;
    use crate::hierarchy::tree::build_tree;
    use crate::model::document::{DocumentKind, DocumentNode, DocumentRecord};
    use uuid::Uuid;

    fn record(name: &str, parent: Option<Uuid>, kind: DocumentKind) -> DocumentRecord {
        DocumentRecord {
            id: Uuid::new_v4(),
            name: name.to_string(),
            kind,
            modified_at: 0,
            parent_id: parent,
            profile_id: Uuid::nil(),
        }
    }

    fn names(hits: &[&DocumentNode]) -> Vec<String> {
        hits.iter().map(|node| node.record.name.clone()).collect()
    }

    fn sample_tree() -> Vec<DocumentNode> {
        let work = record("Work", None, DocumentKind::Folder);
        let reports = record("Reports", Some(work.id), DocumentKind::Folder);
        let q1 = record("report-q1.pdf", Some(reports.id), DocumentKind::File);
        let notes = record("notes.txt", Some(work.id), DocumentKind::File);
        let home = record("Home", None, DocumentKind::Folder);
        let bills = record("REPORT bills", Some(home.id), DocumentKind::File);
        build_tree(vec![work, reports, q1, notes, home, bills])
    }

    #[test]
    fn empty_query_returns_nothing() {
        let tree = sample_tree();
        assert!(search(&tree, "").is_empty());
    }

    #[test]
    fn matches_case_insensitively_in_pre_order() {
        let tree = sample_tree();
        let hits = search(&tree, "report");
        assert_eq!(
            names(&hits),
            vec!["Reports", "report-q1.pdf", "REPORT bills"]
        );
    }

    #[test]
    fn exact_folder_name_returns_that_folder() {
        let tree = sample_tree();
        let hits = search(&tree, "Work");
        assert_eq!(names(&hits), vec!["Work"]);
        assert_eq!(hits[0].children.len(), 2);
    }

    #[test]
    fn no_match_returns_empty() {
        let tree = sample_tree();
        assert!(search(&tree, "vacation").is_empty());
    }
}
