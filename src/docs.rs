//! `grix docs`: write an adapter's README.md from its sources.
//!
//! A line scanner, not a parser: it picks up the `<Name>Config` struct fields
//! and every `fn` signature together with the `///` lines directly above.

use std::fmt::{self, Write as _};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::options::OptionsOperation;
use crate::perps::PerpsOperation;
use crate::registry::{self, AdapterKind};
use crate::validate::{adapter_dir, expected_export};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigField {
    pub name: String,
    pub ty: String,
    pub doc: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDoc {
    pub name: String,
    /// Parameters other than the receiver, as written.
    pub params: Vec<String>,
    pub returns: Option<String>,
    pub doc: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdapterDocs {
    pub config_name: Option<String>,
    pub config_fields: Vec<ConfigField>,
    pub functions: Vec<FunctionDoc>,
}

impl AdapterDocs {
    fn function(&self, name: &str) -> Option<&FunctionDoc> {
        // Prefer the documented occurrence (trait impls over helpers).
        let mut matching = self.functions.iter().filter(|f| f.name == name);
        let first = matching.next()?;
        Some(
            std::iter::once(first)
                .chain(matching)
                .find(|f| !f.doc.is_empty())
                .unwrap_or(first),
        )
    }
}

/// Scan one source file into `docs`.
pub fn scan_source(source: &str, config_name: &str, docs: &mut AdapterDocs) {
    let lines: Vec<&str> = source.lines().collect();
    let mut pending_doc: Vec<String> = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i].trim();

        if let Some(doc) = line.strip_prefix("///") {
            pending_doc.push(doc.trim().to_string());
            i += 1;
            continue;
        }
        if line.starts_with("#[") {
            i += 1;
            continue;
        }

        if line.starts_with(&format!("pub struct {config_name}")) && line.ends_with('{') {
            docs.config_name = Some(config_name.to_string());
            i = scan_config(&lines, i + 1, docs);
            pending_doc.clear();
            continue;
        }

        if let Some(rest) = fn_start(line) {
            // Signatures may span lines; join until the body or `;`.
            let mut signature = rest.to_string();
            let mut j = i;
            while !signature.contains('{') && !signature.trim_end().ends_with(';') && j + 1 < lines.len() {
                j += 1;
                signature.push(' ');
                signature.push_str(lines[j].trim());
            }
            if let Some(f) = parse_signature(&signature, pending_doc.join(" ")) {
                docs.functions.push(f);
            }
            i = j + 1;
            pending_doc.clear();
            continue;
        }

        pending_doc.clear();
        i += 1;
    }
}

fn scan_config(lines: &[&str], mut i: usize, docs: &mut AdapterDocs) -> usize {
    let mut doc: Vec<String> = Vec::new();
    while i < lines.len() {
        let line = lines[i].trim();
        i += 1;
        if line.starts_with('}') {
            break;
        }
        if let Some(d) = line.strip_prefix("///") {
            doc.push(d.trim().to_string());
            continue;
        }
        if let Some(field) = line.strip_prefix("pub ") {
            if let Some((name, ty)) = field.split_once(':') {
                docs.config_fields.push(ConfigField {
                    name: name.trim().to_string(),
                    ty: ty.trim().trim_end_matches(',').to_string(),
                    doc: doc.join(" "),
                });
            }
        }
        doc.clear();
    }
    i
}

/// Text after the `fn` keyword, if the line declares a function.
fn fn_start(line: &str) -> Option<&str> {
    let mut rest = line;
    for prefix in ["pub(crate) ", "pub(super) ", "pub "] {
        if let Some(r) = rest.strip_prefix(prefix) {
            rest = r;
            break;
        }
    }
    rest = rest.strip_prefix("async ").unwrap_or(rest);
    rest.strip_prefix("fn ")
}

fn parse_signature(signature: &str, doc: String) -> Option<FunctionDoc> {
    let open = signature.find('(')?;
    let name = signature[..open].split('<').next()?.trim().to_string();

    // Match the parameter list's closing paren.
    let mut depth = 0;
    let mut close = None;
    for (idx, c) in signature[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(open + idx);
                    break;
                }
            }
            _ => {}
        }
    }
    let close = close?;

    let params = split_params(&signature[open + 1..close])
        .into_iter()
        .filter(|p| !p.ends_with("self"))
        .collect();

    let tail = &signature[close + 1..];
    let returns = tail.split_once("->").map(|(_, ret)| {
        ret.split(['{', ';'])
            .next()
            .unwrap_or("")
            .split(" where ")
            .next()
            .unwrap_or("")
            .trim()
            .to_string()
    });

    Some(FunctionDoc {
        name,
        params,
        returns: returns.filter(|r| !r.is_empty()),
        doc,
    })
}

/// Split on top-level commas only.
fn split_params(list: &str) -> Vec<String> {
    let mut params = Vec::new();
    let mut depth = 0i32;
    let mut current = String::new();
    for c in list.chars() {
        match c {
            '<' | '(' | '[' => depth += 1,
            '>' | ')' | ']' => depth -= 1,
            _ => {}
        }
        if c == ',' && depth == 0 {
            params.push(current.trim().to_string());
            current.clear();
        } else {
            current.push(c);
        }
    }
    params.push(current.trim().to_string());
    params.retain(|p| !p.is_empty());
    params
}

// ── Rendering ───────────────────────────────────────────────────────

fn method_groups(kind: AdapterKind) -> [(&'static str, Vec<&'static str>); 3] {
    match kind {
        AdapterKind::Options => [
            (
                "Required Methods",
                OptionsOperation::ALL.iter().map(|op| op.as_str()).collect(),
            ),
            ("Optional Methods", vec!["protocol_name"]),
            ("Extended Methods", Vec::new()),
        ],
        AdapterKind::Perps => [
            (
                "Required Methods",
                PerpsOperation::REQUIRED.iter().map(|op| op.as_str()).collect(),
            ),
            ("Optional Methods", vec!["network", "protocol_name"]),
            (
                "Extended Methods",
                PerpsOperation::EXTENSIONS.iter().map(|op| op.as_str()).collect(),
            ),
        ],
    }
}

pub fn render_readme(
    name: &str,
    kind: AdapterKind,
    docs: &AdapterDocs,
    test_params: Option<&serde_json::Value>,
) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    if let Err(e) = write_readme(&mut out, name, kind, docs, test_params) {
        tracing::warn!(adapter = name, error = %e, "README rendering stopped early");
    }
    out
}

fn write_readme(
    out: &mut String,
    name: &str,
    kind: AdapterKind,
    docs: &AdapterDocs,
    test_params: Option<&serde_json::Value>,
) -> fmt::Result {
    let export = expected_export(name);
    let display = export.trim_end_matches("Adapter");
    let market = match kind {
        AdapterKind::Options => "options",
        AdapterKind::Perps => "perpetual futures",
    };

    writeln!(out, "# {display} Adapter for Grix Protocol\n")?;
    writeln!(
        out,
        "`{export}` provides the standard {market} market-data interface for {display}.\n"
    )?;

    writeln!(out, "## Configuration\n")?;
    match &docs.config_name {
        Some(config) => {
            writeln!(out, "```rust\npub struct {config} {{")?;
            for field in &docs.config_fields {
                if !field.doc.is_empty() {
                    writeln!(out, "    /// {}", field.doc)?;
                }
                writeln!(out, "    pub {}: {},", field.name, field.ty)?;
            }
            writeln!(out, "}}\n```\n")?;
            writeln!(
                out,
                "Built from the shared settings with `{export}::from_settings` (network, timeout, signing key, base URL)."
            )?;
        }
        None => {
            writeln!(out, "No `{display}Config` struct; the adapter is built from the shared settings.")?;
        }
    }
    out.push('\n');

    for (title, methods) in method_groups(kind) {
        let documented: Vec<&FunctionDoc> =
            methods.iter().filter_map(|m| docs.function(m)).collect();
        if documented.is_empty() {
            continue;
        }
        writeln!(out, "## {title}\n")?;
        for f in documented {
            write_function(out, f)?;
        }
    }

    writeln!(out, "## Testing\n")?;
    if let Some(params) = test_params {
        let pretty = serde_json::to_string_pretty(params).unwrap_or_else(|_| params.to_string());
        writeln!(out, "Declared test parameters:\n\n```json\n{pretty}\n```\n")?;
    }
    writeln!(out, "```bash\ncargo test {name}\ngrix check-structure --all\ngrix conformance {name}\n```")
}

fn write_function(out: &mut String, f: &FunctionDoc) -> fmt::Result {
    writeln!(out, "### `{}`\n", f.name)?;
    let params = f.params.join(", ");
    match &f.returns {
        Some(ret) => writeln!(out, "```rust\nfn {}({params}) -> {ret}\n```\n", f.name)?,
        None => writeln!(out, "```rust\nfn {}({params})\n```\n", f.name)?,
    }
    if !f.doc.is_empty() {
        writeln!(out, "{}\n", f.doc)?;
    }
    Ok(())
}

fn locate(root: &Path, name: &str) -> Result<(AdapterKind, PathBuf)> {
    for kind in [AdapterKind::Options, AdapterKind::Perps] {
        let dir = adapter_dir(root, kind, name);
        if dir.is_dir() {
            return Ok((kind, dir));
        }
    }
    bail!("Adapter directory for '{name}' not found under {}/src", root.display())
}

/// Scan `name`'s directory and write its README.md. Returns the path.
pub fn generate(root: &Path, name: &str) -> Result<PathBuf> {
    let (kind, dir) = locate(root, name)?;
    let export = expected_export(name);
    let config_name = format!("{}Config", export.trim_end_matches("Adapter"));

    let mut files = Vec::new();
    crate::validate::collect_rs_files(&dir, &mut files)
        .with_context(|| format!("listing {}", dir.display()))?;
    files.sort();

    let mut docs = AdapterDocs::default();
    for file in &files {
        let source =
            fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
        scan_source(&source, &config_name, &mut docs);
    }
    tracing::debug!(adapter = name, files = files.len(), functions = docs.functions.len(), "scanned");

    let manifest = registry::manifest(name).filter(|m| m.kind == kind);
    let readme = render_readme(name, kind, &docs, manifest.as_ref().map(|m| &m.test_params));
    let path = dir.join("README.md");
    fs::write(&path, readme).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

/// CLI entry point for the `docs` subcommand.
pub fn run(root: &Path, name: &str) -> Result<()> {
    let path = generate(root, name)?;
    println!("Generated README.md for {name} adapter");
    println!("Location: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"
#[derive(Debug, Clone)]
pub struct GmxConfig {
    /// Network to connect to.
    pub network: Network,
    pub timeout: Duration,
}

#[async_trait]
impl PerpsAdapter for GmxAdapter {
    /// Mark price of `pair`.
    async fn get_asset_price(&self, pair: &str) -> AdapterResult<f64> {
        todo()
    }

    async fn get_historical_funding_rates(
        &self,
        query: &HistoricalFundingQuery,
    ) -> AdapterResult<Vec<FundingRateHistory>> {
        todo()
    }
}
"#;

    #[test]
    fn test_scan_config_and_functions() {
        let mut docs = AdapterDocs::default();
        scan_source(SOURCE, "GmxConfig", &mut docs);

        assert_eq!(docs.config_name.as_deref(), Some("GmxConfig"));
        assert_eq!(docs.config_fields.len(), 2);
        assert_eq!(docs.config_fields[0].doc, "Network to connect to.");
        assert_eq!(docs.config_fields[1].ty, "Duration");

        let price = docs.function("get_asset_price").unwrap();
        assert_eq!(price.params, vec!["pair: &str"]);
        assert_eq!(price.returns.as_deref(), Some("AdapterResult<f64>"));
        assert_eq!(price.doc, "Mark price of `pair`.");

        let history = docs.function("get_historical_funding_rates").unwrap();
        assert_eq!(history.params, vec!["query: &HistoricalFundingQuery"]);
        assert_eq!(
            history.returns.as_deref(),
            Some("AdapterResult<Vec<FundingRateHistory>>")
        );
    }

    #[test]
    fn test_render_sections() {
        let mut docs = AdapterDocs::default();
        scan_source(SOURCE, "GmxConfig", &mut docs);
        let readme = render_readme("gmx", AdapterKind::Perps, &docs, None);
        assert!(readme.starts_with("# Gmx Adapter for Grix Protocol"));
        for section in ["## Configuration", "## Required Methods", "## Extended Methods", "## Testing"] {
            assert!(readme.contains(section), "missing {section}");
        }
        // Nothing documented for network/protocol_name.
        assert!(!readme.contains("## Optional Methods"));
    }

    #[test]
    fn test_render_signatures_and_params() {
        let mut docs = AdapterDocs::default();
        scan_source(SOURCE, "GmxConfig", &mut docs);
        let params = serde_json::json!({"get_asset_price": {"pair": "BTC-USD"}});
        let readme = render_readme("gmx", AdapterKind::Perps, &docs, Some(&params));

        assert!(readme.contains("```rust\nfn get_asset_price(pair: &str) -> AdapterResult<f64>\n```"));
        assert!(readme.contains("Mark price of `pair`.\n"));
        assert!(readme.contains("    /// Network to connect to.\n    pub network: Network,"));
        assert!(readme.contains("\"pair\": \"BTC-USD\""));
        assert!(readme.ends_with("grix conformance gmx\n```\n"));
    }
}
