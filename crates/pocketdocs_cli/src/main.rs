//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `pocketdocs_core` linkage with `ping`/`version` probes.
//! - Print one profile's document tree from a database file.

use pocketdocs_core::{
    open_db, DocumentNode, DocumentService, ProfileId, ProfileRepository,
    ProfileService, SqliteDocumentRepository, SqliteProfileRepository,
};
use std::error::Error;
use std::process::ExitCode;
use uuid::Uuid;

const USAGE: &str = "usage: pocketdocs_cli [ping | tree <db_path> <profile_id>]";

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let outcome = match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        [] | ["ping"] => {
            println!("pocketdocs_core ping={}", pocketdocs_core::ping());
            println!("pocketdocs_core version={}", pocketdocs_core::core_version());
            Ok(())
        }
        ["tree", db_path, profile_id] => print_tree(db_path, profile_id),
        _ => Err(USAGE.into()),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn print_tree(db_path: &str, profile_id: &str) -> Result<(), Box<dyn Error>> {
    let profile_id: ProfileId = Uuid::parse_str(profile_id)?;
    let conn = open_db(db_path)?;

    let profile_repo = SqliteProfileRepository::try_new(&conn)?;
    let profile = profile_repo
        .get_profile(profile_id)?
        .ok_or_else(|| format!("profile not found: {profile_id}"))?;
    let caller = ProfileService::new(profile_repo).caller_for(profile.user_id)?;

    let documents = DocumentService::new(SqliteDocumentRepository::try_new(&conn)?);
    let tree = documents.document_tree(&caller, profile_id)?;

    println!("{} (version {})", profile.name, tree.version);
    for root in &tree.roots {
        print_node(root, 1);
    }
    Ok(())
}

fn print_node(node: &DocumentNode, depth: usize) {
    println!(
        "{}{} [{}]",
        "  ".repeat(depth),
        node.record.name,
        node.record.kind.as_str()
    );
    for child in &node.children {
        print_node(child, depth + 1);
    }
}
