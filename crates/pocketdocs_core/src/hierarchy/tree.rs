//! Flat-record to forest conversion.
//!
//! # Responsibility
//! - Build the nested document forest of one profile from its flat records.
//! - Provide the inverse (pre-order flattening) and lookup helpers.
//!
//! # Invariants
//! - Each record appears at most once in the output forest.
//! - Root order and child order follow input order.
//! - A record whose parent is absent, is itself, or is a file is dangling;
//!   dangling records are dropped unless [`OrphanPolicy::PromoteToRoot`] is
//!   selected. Descendants of a dropped record are dropped with it.
//! - Records on a parent cycle are never reachable from a root and are
//!   dropped.

use crate::model::document::{DocumentId, DocumentNode, DocumentRecord};
use std::collections::HashMap;

/// What to do with records whose parent cannot be attached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrphanPolicy {
    /// Leave the record (and its subtree) out of the forest.
    #[default]
    Drop,
    /// Surface the record as an extra root, in input order.
    PromoteToRoot,
}

/// Tree construction options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeOptions {
    pub orphan_policy: OrphanPolicy,
}

/// Builds the document forest with default options.
///
/// See [`build_tree_with`].
pub fn build_tree<I>(records: I) -> Vec<DocumentNode>
where
    I: IntoIterator<Item = DocumentRecord>,
{
    build_tree_with(records, &TreeOptions::default())
}

/// Builds the document forest from flat records in O(n).
///
/// Records with a nil id are skipped. When an id repeats, the first record
/// wins and later ones are skipped.
pub fn build_tree_with<I>(records: I, options: &TreeOptions) -> Vec<DocumentNode>
where
    I: IntoIterator<Item = DocumentRecord>,
{
    let mut slots: Vec<Option<DocumentRecord>> = Vec::new();
    let mut index: HashMap<DocumentId, usize> = HashMap::new();
    for record in records {
        if record.id.is_nil() || index.contains_key(&record.id) {
            continue;
        }
        index.insert(record.id, slots.len());
        slots.push(Some(record));
    }

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); slots.len()];
    let mut roots: Vec<usize> = Vec::new();
    for (position, record) in slots.iter().enumerate() {
        let Some(record) = record else {
            continue;
        };
        let Some(parent_id) = record.parent_id else {
            roots.push(position);
            continue;
        };

        let attachable = index.get(&parent_id).copied().filter(|&parent| {
            parent != position
                && slots[parent]
                    .as_ref()
                    .is_some_and(|parent| parent.kind.can_contain_children())
        });
        match (attachable, options.orphan_policy) {
            (Some(parent), _) => children[parent].push(position),
            (None, OrphanPolicy::PromoteToRoot) => roots.push(position),
            (None, OrphanPolicy::Drop) => {}
        }
    }

    roots
        .into_iter()
        .filter_map(|position| assemble(position, &mut slots, &children))
        .collect()
}

fn assemble(
    root: usize,
    slots: &mut [Option<DocumentRecord>],
    children: &[Vec<usize>],
) -> Option<DocumentNode> {
    // `take` consumes each record once, so no node can be emitted twice.
    let record = slots[root].take()?;
    let mut stack = vec![(DocumentNode::new(record), children[root].iter())];
    loop {
        let (_, pending) = stack.last_mut()?;
        if let Some(&child) = pending.next() {
            if let Some(record) = slots[child].take() {
                stack.push((DocumentNode::new(record), children[child].iter()));
            }
            continue;
        }

        let (node, _) = stack.pop()?;
        match stack.last_mut() {
            Some((parent, _)) => parent.children.push(node),
            None => return Some(node),
        }
    }
}

/// Returns the effective parent of a breadcrumb path: its last element, or
/// `None` (root) for an empty path.
pub fn resolve_parent<T>(path: &[T]) -> Option<&T> {
    path.last()
}

/// Flattens a forest into records in depth-first pre-order.
pub fn flatten_pre_order(roots: &[DocumentNode]) -> Vec<DocumentRecord> {
    let mut records = Vec::new();
    let mut stack: Vec<&DocumentNode> = roots.iter().rev().collect();
    while let Some(node) = stack.pop() {
        records.push(node.record.clone());
        stack.extend(node.children.iter().rev());
    }
    records
}

/// Finds a node anywhere in the forest.
pub fn find_node(roots: &[DocumentNode], id: DocumentId) -> Option<&DocumentNode> {
    let mut stack: Vec<&DocumentNode> = roots.iter().rev().collect();
    while let Some(node) = stack.pop() {
        if node.id() == id {
            return Some(node);
        }
        stack.extend(node.children.iter().rev());
    }
    None
}

/// Counts every node in the forest.
pub fn count_nodes(roots: &[DocumentNode]) -> usize {
    roots.iter().map(DocumentNode::subtree_len).sum()
}

#[cfg(test)]
mod tests {
    use super::{
        build_tree, build_tree_with, count_nodes, find_node, flatten_pre_order, resolve_parent,
        OrphanPolicy, TreeOptions,
    };
    use crate::model::document::{DocumentId, DocumentKind, DocumentNode, DocumentRecord};
    use uuid::Uuid;

    fn record(
        id: DocumentId,
        parent_id: Option<DocumentId>,
        kind: DocumentKind,
        name: &str,
    ) -> DocumentRecord {
        DocumentRecord {
            id,
            name: name.to_string(),
            kind,
            modified_at: 0,
            parent_id,
            profile_id: Uuid::nil(),
        }
    }

    fn shape(nodes: &[DocumentNode]) -> Vec<(DocumentId, Vec<DocumentId>)> {
        flatten_pre_order(nodes)
            .iter()
            .map(|record| {
                let node = find_node(nodes, record.id).unwrap();
                (record.id, node.children.iter().map(|c| c.id()).collect())
            })
            .collect()
    }

    #[test]
    fn dangling_parent_is_dropped_not_promoted() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let missing = Uuid::new_v4();
        let records = vec![
            record(a, None, DocumentKind::Folder, "Work"),
            record(b, Some(a), DocumentKind::File, "report.pdf"),
            record(c, Some(missing), DocumentKind::File, "orphan.txt"),
        ];

        let roots = build_tree(records);

        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].id(), a);
        assert_eq!(roots[0].children.len(), 1);
        assert_eq!(roots[0].children[0].id(), b);
        assert!(find_node(&roots, c).is_none());
    }

    #[test]
    fn promote_policy_surfaces_orphans_in_input_order() {
        let a = Uuid::new_v4();
        let orphan = Uuid::new_v4();
        let orphan_child = Uuid::new_v4();
        let b = Uuid::new_v4();
        let records = vec![
            record(a, None, DocumentKind::Folder, "a"),
            record(orphan, Some(Uuid::new_v4()), DocumentKind::Folder, "o"),
            record(orphan_child, Some(orphan), DocumentKind::File, "oc"),
            record(b, None, DocumentKind::Folder, "b"),
        ];
        let options = TreeOptions {
            orphan_policy: OrphanPolicy::PromoteToRoot,
        };

        let roots = build_tree_with(records, &options);

        let root_ids: Vec<_> = roots.iter().map(DocumentNode::id).collect();
        assert_eq!(root_ids, vec![a, orphan, b]);
        assert_eq!(roots[1].children[0].id(), orphan_child);
    }

    #[test]
    fn children_follow_input_order_even_when_declared_before_parent() {
        let parent = Uuid::new_v4();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let records = vec![
            record(first, Some(parent), DocumentKind::File, "1"),
            record(parent, None, DocumentKind::Folder, "p"),
            record(second, Some(parent), DocumentKind::File, "2"),
        ];

        let roots = build_tree(records);

        let child_ids: Vec<_> = roots[0].children.iter().map(DocumentNode::id).collect();
        assert_eq!(child_ids, vec![first, second]);
    }

    #[test]
    fn file_parent_self_parent_and_cycles_never_attach() {
        let file = Uuid::new_v4();
        let under_file = Uuid::new_v4();
        let selfish = Uuid::new_v4();
        let cycle_a = Uuid::new_v4();
        let cycle_b = Uuid::new_v4();
        let records = vec![
            record(file, None, DocumentKind::File, "f"),
            record(under_file, Some(file), DocumentKind::File, "x"),
            record(selfish, Some(selfish), DocumentKind::Folder, "s"),
            record(cycle_a, Some(cycle_b), DocumentKind::Folder, "ca"),
            record(cycle_b, Some(cycle_a), DocumentKind::Folder, "cb"),
        ];

        let roots = build_tree(records.clone());
        assert_eq!(count_nodes(&roots), 1);
        assert!(roots[0].children.is_empty());

        let promoted = build_tree_with(
            records,
            &TreeOptions {
                orphan_policy: OrphanPolicy::PromoteToRoot,
            },
        );
        let root_ids: Vec<_> = promoted.iter().map(DocumentNode::id).collect();
        assert_eq!(root_ids, vec![file, under_file, selfish]);
    }

    #[test]
    fn nil_and_duplicate_ids_are_skipped() {
        let a = Uuid::new_v4();
        let records = vec![
            record(Uuid::nil(), None, DocumentKind::Folder, "nil"),
            record(a, None, DocumentKind::Folder, "first"),
            record(a, None, DocumentKind::Folder, "second"),
        ];

        let roots = build_tree(records);

        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].record.name, "first");
    }

    #[test]
    fn build_is_idempotent_and_survives_flatten_round_trip() {
        let root = Uuid::new_v4();
        let docs = Uuid::new_v4();
        let photos = Uuid::new_v4();
        let records = vec![
            record(root, None, DocumentKind::Folder, "root"),
            record(docs, Some(root), DocumentKind::Folder, "docs"),
            record(Uuid::new_v4(), Some(docs), DocumentKind::File, "a.txt"),
            record(photos, Some(root), DocumentKind::Folder, "photos"),
            record(Uuid::new_v4(), Some(photos), DocumentKind::File, "b.png"),
            record(Uuid::new_v4(), None, DocumentKind::File, "loose.txt"),
        ];

        let first = build_tree(records.clone());
        let second = build_tree(records.clone());
        assert_eq!(first, second);
        assert_eq!(count_nodes(&first), records.len());

        let rebuilt = build_tree(flatten_pre_order(&first));
        assert_eq!(shape(&rebuilt), shape(&first));
    }

    #[test]
    fn resolve_parent_picks_last_breadcrumb() {
        let empty: [DocumentId; 0] = [];
        assert_eq!(resolve_parent(&empty), None);

        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_eq!(resolve_parent(&[a, b]), Some(&b));
    }

    #[test]
    fn deep_folder_chain_builds_and_walks_iteratively() {
        let depth = 2_000;
        let ids: Vec<DocumentId> = (0..depth).map(|_| Uuid::new_v4()).collect();
        let records = ids.iter().enumerate().map(|(level, &id)| {
            let parent = level.checked_sub(1).map(|previous| ids[previous]);
            record(id, parent, DocumentKind::Folder, "level")
        });

        let roots = build_tree(records);

        assert_eq!(roots.len(), 1);
        assert_eq!(count_nodes(&roots), depth);
        let deepest = find_node(&roots, ids[depth - 1]).unwrap();
        assert!(deepest.children.is_empty());
        let flattened: Vec<DocumentId> = flatten_pre_order(&roots)
            .into_iter()
            .map(|record| record.id)
            .collect();
        assert_eq!(flattened, ids);
    }
}
