use std::fs;
use std::path::{Path, PathBuf};

use crate::registry::{AdapterKind, AdapterManifest};

use super::StructureError;

pub const ENTRY_FILE: &str = "mod.rs";
pub const README_FILE: &str = "README.md";

/// `src/<kind>/adapters/<name>` under `root`.
pub fn adapter_dir(root: &Path, kind: AdapterKind, name: &str) -> PathBuf {
    root.join("src")
        .join(kind.as_str())
        .join("adapters")
        .join(name)
}

/// "deribit" -> "DeribitAdapter".
pub fn expected_export(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => format!("{}{}Adapter", first.to_uppercase(), chars.as_str()),
        None => "Adapter".to_string(),
    }
}

/// Outcome for one adapter directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterCheck {
    pub kind: AdapterKind,
    pub name: String,
    pub problems: Vec<StructureError>,
    /// Non-fatal observations, e.g. a missing README.
    pub notes: Vec<String>,
}

impl AdapterCheck {
    pub fn passed(&self) -> bool {
        self.problems.is_empty()
    }
}

/// Check one adapter directory against its registry manifest (if any).
pub fn check_adapter(
    root: &Path,
    kind: AdapterKind,
    name: &str,
    manifest: Option<&AdapterManifest>,
) -> AdapterCheck {
    let mut check = AdapterCheck {
        kind,
        name: name.to_string(),
        problems: Vec::new(),
        notes: Vec::new(),
    };
    let adapter = name.to_string();
    let dir = adapter_dir(root, kind, name);

    if !dir.is_dir() {
        check.problems.push(StructureError::MissingDirectory { adapter, path: dir });
        return check;
    }
    if !dir.join(ENTRY_FILE).is_file() {
        check.problems.push(StructureError::MissingFile {
            adapter,
            file: ENTRY_FILE.to_string(),
        });
        return check;
    }
    if !dir.join(README_FILE).is_file() {
        check.notes.push(format!("no {README_FILE}"));
    }

    let source = match read_sources(&dir) {
        Ok(source) => source,
        Err(e) => {
            check.problems.push(StructureError::Unreadable {
                adapter,
                path: dir,
                message: e.to_string(),
            });
            return check;
        }
    };

    // Registered for the same kind and declared in the directory.
    let expected = expected_export(name);
    let registered = manifest.filter(|m| m.kind == kind && m.export == expected);
    if registered.is_none() || !source.contains(&format!("pub struct {expected}")) {
        check.problems.push(StructureError::MissingExport {
            adapter: adapter.clone(),
            expected,
        });
    }

    for op in kind.required_operations() {
        let declared = registered.is_none_or(|m| m.operations.contains(&op));
        if !declared || !source.contains(&format!("fn {op}(")) {
            check.problems.push(StructureError::MissingMethod {
                adapter: adapter.clone(),
                method: op.to_string(),
            });
        }
    }

    if let Some(m) = registered {
        for op in kind.parameterized_operations() {
            match m.test_params.get(op) {
                None | Some(serde_json::Value::Null) => {
                    check.problems.push(StructureError::MissingTestParams {
                        adapter: adapter.clone(),
                        operation: op.to_string(),
                    })
                }
                Some(value) if is_empty_param(value) => {
                    check.problems.push(StructureError::EmptyTestParams {
                        adapter: adapter.clone(),
                        operation: op.to_string(),
                    })
                }
                Some(_) => {}
            }
        }
    }

    check
}

/// Blank strings, empty containers, and objects holding any blank value.
fn is_empty_param(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => true,
        serde_json::Value::String(s) => s.trim().is_empty(),
        serde_json::Value::Array(items) => items.is_empty(),
        serde_json::Value::Object(map) => map.is_empty() || map.values().any(is_empty_param),
        _ => false,
    }
}

/// Concatenated text of every `.rs` file under `dir`.
pub fn read_sources(dir: &Path) -> std::io::Result<String> {
    let mut files = Vec::new();
    collect_rs_files(dir, &mut files)?;
    files.sort();
    let mut out = String::new();
    for file in files {
        out.push_str(&fs::read_to_string(&file)?);
        out.push('\n');
    }
    Ok(out)
}

pub(crate) fn collect_rs_files(dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_rs_files(&path, out)?;
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            out.push(path);
        }
    }
    Ok(())
}

/// Adapter directories present on disk for `kind`.
pub fn adapters_on_disk(root: &Path, kind: AdapterKind) -> Vec<String> {
    let base = root.join("src").join(kind.as_str()).join("adapters");
    let Ok(entries) = fs::read_dir(&base) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .filter_map(|e| e.file_name().into_string().ok())
        .collect();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_export() {
        assert_eq!(expected_export("deribit"), "DeribitAdapter");
        assert_eq!(expected_export("hyperliquid"), "HyperliquidAdapter");
    }

    #[test]
    fn test_is_empty_param() {
        assert!(is_empty_param(&serde_json::json!({})));
        assert!(is_empty_param(&serde_json::json!({"asset": " "})));
        assert!(!is_empty_param(&serde_json::json!({"asset": "BTC"})));
        assert!(!is_empty_param(&serde_json::json!({"expiry": 0, "asset": "BTC"})));
    }
}
