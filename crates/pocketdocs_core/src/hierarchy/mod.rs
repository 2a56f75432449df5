//! Document hierarchy engine: pure functions over flat document records.
//!
//! # Responsibility
//! - Convert a profile's flat, parent-pointer records into a forest.
//! - Search a built forest recursively by name.
//!
//! # Invariants
//! - Functions here never touch storage; mutations live in
//!   `service::document_service`.
//! - Building is O(n) and deterministic for a given input order.

pub mod search;
pub mod tree;

pub use search::search;
pub use tree::{
    build_tree, build_tree_with, count_nodes, find_node, flatten_pre_order, resolve_parent,
    OrphanPolicy, TreeOptions,
};
