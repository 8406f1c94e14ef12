//! Which adapters a change set touches.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, bail};

use crate::registry::AdapterKind;

/// Base ref used when the CI event carries no base commit.
pub const DEFAULT_BASE: &str = "main";

/// Where the list of changed paths comes from, in order of precedence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeSource {
    /// A file listing one repository-relative path per line.
    Manifest(PathBuf),
    /// CI: diff the event's base commit against `HEAD`.
    Ci { event_path: PathBuf },
    /// Local: uncommitted changes against `HEAD`.
    Local,
}

impl ChangeSource {
    pub fn resolve(changed_files: Option<&Path>) -> Self {
        if let Some(path) = changed_files {
            ChangeSource::Manifest(path.to_path_buf())
        } else if let Some(event_path) = std::env::var_os("GITHUB_EVENT_PATH") {
            ChangeSource::Ci {
                event_path: PathBuf::from(event_path),
            }
        } else {
            ChangeSource::Local
        }
    }
}

/// Changed paths, relative to the repository root.
pub fn changed_files(root: &Path, source: &ChangeSource) -> Result<Vec<String>> {
    match source {
        ChangeSource::Manifest(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            Ok(parse_listing(&text))
        }
        ChangeSource::Ci { event_path } => {
            let base = base_from_event(event_path)?.unwrap_or_else(|| DEFAULT_BASE.to_string());
            tracing::debug!(%base, "diffing CI change set");
            git_diff(root, &[base.as_str(), "HEAD"])
        }
        ChangeSource::Local => git_diff(root, &["HEAD"]),
    }
}

/// Base commit of a pull-request or push event payload.
pub fn base_from_event(event_path: &Path) -> Result<Option<String>> {
    let text = std::fs::read_to_string(event_path)
        .with_context(|| format!("reading event payload {}", event_path.display()))?;
    let event: serde_json::Value =
        serde_json::from_str(&text).context("event payload is not JSON")?;

    let pr_base = event.pointer("/pull_request/base/sha").and_then(|v| v.as_str());
    // Pushes report the previous tip; all zeros on a new branch.
    let before = event
        .get("before")
        .and_then(|v| v.as_str())
        .filter(|sha| !sha.chars().all(|c| c == '0'));
    Ok(pr_base.or(before).map(str::to_string))
}

fn git_diff(root: &Path, revs: &[&str]) -> Result<Vec<String>> {
    let output = Command::new("git")
        .arg("-C")
        .arg(root)
        .args(["diff", "--name-only"])
        .args(revs)
        .output()
        .context("running git")?;
    if !output.status.success() {
        bail!(
            "git diff {} failed: {}",
            revs.join(" "),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(parse_listing(&String::from_utf8_lossy(&output.stdout)))
}

fn parse_listing(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| line.replace('\\', "/"))
        .collect()
}

/// Adapters whose directory contains at least one of `paths`.
///
/// Only paths *inside* `src/<kind>/adapters/<name>/` count; the adapters
/// `mod.rs` itself does not select anything.
pub fn touched_adapters(paths: &[String]) -> BTreeSet<(AdapterKind, String)> {
    let mut touched = BTreeSet::new();
    for path in paths {
        let parts: Vec<&str> = path.trim_start_matches("./").split('/').collect();
        let [src, kind, adapters, name, _, ..] = parts.as_slice() else {
            continue;
        };
        if *src != "src" || *adapters != "adapters" {
            continue;
        }
        let kind = match *kind {
            "options" => AdapterKind::Options,
            "perps" => AdapterKind::Perps,
            _ => continue,
        };
        touched.insert((kind, name.to_string()));
    }
    touched
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touched_adapters() {
        let paths = vec![
            "src/options/adapters/deribit/order_book.rs".to_string(),
            "src/options/adapters/deribit/mod.rs".to_string(),
            "src/perps/adapters/hyperliquid/funding.rs".to_string(),
            "src/perps/adapters/mod.rs".to_string(),
            "src/registry.rs".to_string(),
            "README.md".to_string(),
        ];
        let touched: Vec<_> = touched_adapters(&paths).into_iter().collect();
        assert_eq!(
            touched,
            vec![
                (AdapterKind::Options, "deribit".to_string()),
                (AdapterKind::Perps, "hyperliquid".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_listing_skips_blanks_and_comments() {
        let listing = "# changed\n\nsrc/perps/adapters/lode/mod.rs\r\n  src\\options\\adapters\\moby\\types.rs \n";
        assert_eq!(
            parse_listing(listing),
            vec![
                "src/perps/adapters/lode/mod.rs",
                "src/options/adapters/moby/types.rs"
            ]
        );
    }

    #[test]
    fn test_base_from_event() {
        let dir = tempfile::tempdir().unwrap();
        let pr = dir.path().join("pr.json");
        std::fs::write(&pr, r#"{"pull_request": {"base": {"sha": "abc123"}}}"#).unwrap();
        assert_eq!(base_from_event(&pr).unwrap().as_deref(), Some("abc123"));

        let push = dir.path().join("push.json");
        std::fs::write(&push, r#"{"before": "0000000000000000000000000000000000000000"}"#).unwrap();
        assert_eq!(base_from_event(&push).unwrap(), None);
    }
}
