mod changes;
mod structure;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::registry::{self, AdapterKind};

pub use changes::{ChangeSource, DEFAULT_BASE, base_from_event, changed_files, touched_adapters};
pub use structure::{AdapterCheck, adapter_dir, adapters_on_disk, check_adapter, expected_export};
pub(crate) use structure::collect_rs_files;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StructureError {
    #[error("{adapter}: adapter directory not found: {}", .path.display())]
    MissingDirectory { adapter: String, path: PathBuf },

    #[error("{adapter}: missing required file {file}")]
    MissingFile { adapter: String, file: String },

    #[error("{adapter}: no adapter export found (expected: {expected})")]
    MissingExport { adapter: String, expected: String },

    #[error("{adapter}: missing required method {method}")]
    MissingMethod { adapter: String, method: String },

    #[error("{adapter}: missing test parameters for {operation}")]
    MissingTestParams { adapter: String, operation: String },

    #[error("{adapter}: empty test parameters for {operation}")]
    EmptyTestParams { adapter: String, operation: String },

    #[error("{adapter}: cannot read {}: {message}", .path.display())]
    Unreadable {
        adapter: String,
        path: PathBuf,
        message: String,
    },
}

/// Check a registered adapter by name. An unregistered name yields a single
/// missing-export problem.
pub fn check_registered(root: &Path, name: &str) -> Vec<StructureError> {
    match registry::manifest(name) {
        Some(manifest) => check_adapter(root, manifest.kind, name, Some(&manifest)).problems,
        None => vec![StructureError::MissingExport {
            adapter: name.to_string(),
            expected: expected_export(name),
        }],
    }
}

/// Adapters to check: every one on disk, or those the change set touches.
/// A change set that cannot be determined selects every adapter.
pub fn select_adapters(
    root: &Path,
    source: &ChangeSource,
    all: bool,
) -> BTreeSet<(AdapterKind, String)> {
    let everything = || -> BTreeSet<(AdapterKind, String)> {
        [AdapterKind::Options, AdapterKind::Perps]
            .into_iter()
            .flat_map(|kind| {
                adapters_on_disk(root, kind)
                    .into_iter()
                    .map(move |name| (kind, name))
            })
            .collect()
    };
    if all {
        return everything();
    }
    match changed_files(root, source) {
        Ok(paths) => touched_adapters(&paths),
        Err(e) => {
            tracing::warn!(error = %e, "could not determine changed files, checking all adapters");
            everything()
        }
    }
}

/// Check every selected adapter, collecting all problems.
pub fn check_selected(root: &Path, selected: &BTreeSet<(AdapterKind, String)>) -> Vec<AdapterCheck> {
    selected
        .iter()
        .map(|(kind, name)| {
            let manifest = registry::manifest(name);
            check_adapter(root, *kind, name, manifest.as_ref())
        })
        .collect()
}

/// CLI entry point for the `check-structure` subcommand.
pub fn run(root: &Path, changed: Option<&Path>, all: bool) -> anyhow::Result<()> {
    let source = ChangeSource::resolve(changed);
    tracing::debug!(?source, root = %root.display(), "selecting adapters");
    let selected = select_adapters(root, &source, all);

    if selected.is_empty() {
        println!("No adapter changes detected.");
        return Ok(());
    }
    let names: Vec<String> = selected
        .iter()
        .map(|(kind, name)| format!("{kind}/{name}"))
        .collect();
    println!("Checking adapters: {}", names.join(", "));

    let checks = check_selected(root, &selected);
    let failed: Vec<&AdapterCheck> = checks.iter().filter(|c| !c.passed()).collect();
    for check in &checks {
        if check.passed() {
            println!("  ok  {} passed structure validation", check.name);
        }
        for note in &check.notes {
            println!("      {}: {note}", check.name);
        }
    }

    if failed.is_empty() {
        return Ok(());
    }
    let total: usize = failed.iter().map(|c| c.problems.len()).sum();
    eprintln!(
        "Structure check failed for {} adapter(s) with {total} problem(s):",
        failed.len()
    );
    for (i, problem) in failed.iter().flat_map(|c| &c.problems).enumerate() {
        eprintln!("  {}. {}", i + 1, problem);
    }
    std::process::exit(1);
}
