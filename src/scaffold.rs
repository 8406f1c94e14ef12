//! `grix scaffold`: generate a perps adapter from the template adapter.

use std::collections::BTreeSet;
use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

const TEMPLATE_NAME: &str = "template";

/// Optional operations the generated adapter can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Feature {
    HistoricalFunding,
    PredictedFunding,
    OpenInterestCap,
}

impl Feature {
    pub const ALL: [Feature; 3] = [
        Feature::HistoricalFunding,
        Feature::PredictedFunding,
        Feature::OpenInterestCap,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Feature::HistoricalFunding => "Historical Funding Rates",
            Feature::PredictedFunding => "Predicted Funding Rates",
            Feature::OpenInterestCap => "Open Interest Cap",
        }
    }

    /// Template file holding the feature's trait impl.
    pub fn file(&self) -> &'static str {
        match self {
            Feature::HistoricalFunding => "historical_funding.rs",
            Feature::PredictedFunding => "predicted_funding.rs",
            Feature::OpenInterestCap => "open_interest_cap.rs",
        }
    }

    /// Tokens identifying the feature's lines in the other template files.
    fn markers(&self) -> &'static [&'static str] {
        match self {
            Feature::HistoricalFunding => &["historical_funding", "HistoricalFundingRates"],
            Feature::PredictedFunding => &["predicted_funding", "PredictedFundingRates"],
            Feature::OpenInterestCap => &["open_interest_cap", "OpenInterestCaps"],
        }
    }
}

/// Parse a feature selection: numbers from the prompt menu (1-3, 4 = all,
/// 5 = none) or names, separated by commas or spaces.
pub fn parse_features(input: &str) -> Result<BTreeSet<Feature>> {
    let mut features = BTreeSet::new();
    for token in input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
    {
        match token.to_lowercase().as_str() {
            "1" | "historical" | "historical-funding" => {
                features.insert(Feature::HistoricalFunding);
            }
            "2" | "predicted" | "predicted-funding" => {
                features.insert(Feature::PredictedFunding);
            }
            "3" | "oi-cap" | "open-interest-cap" => {
                features.insert(Feature::OpenInterestCap);
            }
            "4" | "all" => features.extend(Feature::ALL),
            "5" | "none" => {}
            other => bail!("Unknown feature '{other}'. Use historical, predicted, oi-cap, all or none."),
        }
    }
    Ok(features)
}

/// Module name and type prefix for a protocol, e.g. "Gmx" -> ("gmx", "Gmx").
pub fn protocol_names(input: &str) -> Result<(String, String)> {
    let name = input.trim();
    if name.is_empty() {
        bail!("Protocol name is required");
    }
    if !name.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
        || !name.chars().all(|c| c.is_ascii_alphanumeric())
    {
        bail!("Protocol name '{name}' must start with a letter and be alphanumeric");
    }
    let lower = name.to_ascii_lowercase();
    if lower == TEMPLATE_NAME {
        bail!("'{name}' is reserved for the template adapter");
    }
    let mut chars = lower.chars();
    let capitalized = match chars.next() {
        Some(first) => format!("{}{}", first.to_ascii_uppercase(), chars.as_str()),
        None => String::new(),
    };
    Ok((lower, capitalized))
}

#[derive(Debug, Clone)]
pub struct ScaffoldPlan {
    pub root: PathBuf,
    pub lower: String,
    pub capitalized: String,
    pub features: BTreeSet<Feature>,
}

impl ScaffoldPlan {
    pub fn adapters_dir(&self) -> PathBuf {
        self.root.join("src").join("perps").join("adapters")
    }

    pub fn target_dir(&self) -> PathBuf {
        self.adapters_dir().join(&self.lower)
    }

    fn dropped(&self) -> Vec<Feature> {
        Feature::ALL
            .into_iter()
            .filter(|f| !self.features.contains(f))
            .collect()
    }

    fn customize(&self, text: &str) -> String {
        text.replace("Template", &self.capitalized)
            .replace(TEMPLATE_NAME, &self.lower)
    }
}

/// Copy the template into the plan's target directory. Returns the files
/// written. The target must not exist.
pub fn generate(plan: &ScaffoldPlan) -> Result<Vec<PathBuf>> {
    let source = plan.adapters_dir().join(TEMPLATE_NAME);
    if !source.is_dir() {
        bail!("Template adapter not found at {}", source.display());
    }
    let target = plan.target_dir();
    let mut written = Vec::new();
    copy_dir(plan, &source, &target, &mut written)?;
    Ok(written)
}

fn copy_dir(plan: &ScaffoldPlan, from: &Path, to: &Path, written: &mut Vec<PathBuf>) -> Result<()> {
    fs::create_dir_all(to).with_context(|| format!("creating {}", to.display()))?;
    let dropped = plan.dropped();
    let mut entries: Vec<_> = fs::read_dir(from)?.collect::<std::io::Result<_>>()?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        let file_name = entry.file_name().to_string_lossy().into_owned();
        let dest = to.join(plan.customize(&file_name));
        if path.is_dir() {
            copy_dir(plan, &path, &dest, written)?;
            continue;
        }
        if dropped.iter().any(|f| f.file() == file_name) {
            tracing::debug!(file = %file_name, "skipping unselected feature");
            continue;
        }
        let content =
            fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        let content = plan.customize(&prune_features(&content, &dropped));
        fs::write(&dest, content).with_context(|| format!("writing {}", dest.display()))?;
        written.push(dest);
    }
    Ok(())
}

/// Remove every line mentioning a dropped feature, together with the block
/// it opens (until braces balance).
pub fn prune_features(content: &str, dropped: &[Feature]) -> String {
    let markers: Vec<&str> = dropped.iter().flat_map(|f| f.markers().iter().copied()).collect();
    let mut out = String::with_capacity(content.len());
    let mut depth = 0i32;
    let mut skipping = false;
    let mut last_blank = false;

    for line in content.lines() {
        if !skipping && markers.iter().any(|m| line.contains(m)) {
            skipping = true;
            depth = 0;
        }
        if skipping {
            depth += brace_delta(line);
            if depth <= 0 {
                skipping = false;
            }
            continue;
        }
        let blank = line.trim().is_empty();
        if blank && last_blank {
            continue;
        }
        last_blank = blank;
        out.push_str(line);
        out.push('\n');
    }
    out
}

fn brace_delta(line: &str) -> i32 {
    line.chars().fold(0, |acc, c| match c {
        '{' => acc + 1,
        '}' => acc - 1,
        _ => acc,
    })
}

/// Add `pub mod <lower>;` to the perps adapters module, keeping the list
/// sorted. Returns false when already declared.
pub fn declare_module(plan: &ScaffoldPlan) -> Result<bool> {
    let path = plan.adapters_dir().join("mod.rs");
    let text = fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
    let decl = format!("pub mod {};", plan.lower);
    if text.lines().any(|l| l.trim() == decl) {
        return Ok(false);
    }
    let mut lines: Vec<String> = text.lines().map(str::to_string).collect();
    let at = lines
        .iter()
        .position(|l| l.starts_with("pub mod ") && l.as_str() > decl.as_str())
        .or_else(|| lines.iter().rposition(|l| l.starts_with("pub mod ")).map(|i| i + 1))
        .unwrap_or(lines.len());
    lines.insert(at, decl);
    fs::write(&path, lines.join("\n") + "\n")?;
    Ok(true)
}

/// Add the adapter to the `perps` list of the registry macro. Returns false
/// when already registered.
pub fn register_adapter(plan: &ScaffoldPlan) -> Result<bool> {
    let path = plan.root.join("src").join("registry.rs");
    let text = fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
    let entry = format!(
        "{lower} => crate::perps::adapters::{lower}::{cap}Adapter,",
        lower = plan.lower,
        cap = plan.capitalized
    );
    if text.contains(&entry) {
        return Ok(false);
    }

    let mut lines: Vec<String> = text.lines().map(str::to_string).collect();
    let invocation = lines
        .iter()
        .position(|l| l.trim() == "register_adapters! {")
        .context("registry invocation not found")?;
    let perps = lines[invocation..]
        .iter()
        .position(|l| l.trim() == "perps {")
        .map(|i| i + invocation)
        .context("perps list not found in registry")?;
    let close = lines[perps..]
        .iter()
        .position(|l| l.trim() == "}")
        .map(|i| i + perps)
        .context("unterminated perps list in registry")?;

    let indent = lines[perps + 1..close]
        .first()
        .map(|l| l.len() - l.trim_start().len())
        .unwrap_or(8);
    lines.insert(close, format!("{}{entry}", " ".repeat(indent)));
    fs::write(&path, lines.join("\n") + "\n")?;
    Ok(true)
}

// ── Interactive entry point ─────────────────────────────────────────

fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> Result<String> {
    write!(output, "{question}")?;
    output.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(answer.trim().to_string())
}

/// Drive the generator, prompting on `input` for anything not given.
pub fn run_with<R: BufRead, W: Write>(
    root: &Path,
    name: Option<String>,
    features: Option<String>,
    force: bool,
    input: &mut R,
    output: &mut W,
) -> Result<Option<ScaffoldPlan>> {
    writeln!(output, "Grix Protocol Adapter Generator")?;
    writeln!(output, "-------------------------------")?;

    let name = match name {
        Some(name) => name,
        None => ask(input, output, "What is the name of your protocol? ")?,
    };
    let (lower, capitalized) = protocol_names(&name)?;

    let features = match features {
        Some(list) => parse_features(&list)?,
        None => {
            writeln!(output, "\nSelect the features you want to implement:")?;
            for (i, feature) in Feature::ALL.iter().enumerate() {
                writeln!(output, "{}. {}", i + 1, feature.label())?;
            }
            writeln!(output, "4. All of the above")?;
            writeln!(output, "5. None of the above (required methods only)")?;
            let answer = ask(
                input,
                output,
                "Enter the numbers of the features you want to implement (comma-separated): ",
            )?;
            parse_features(&answer)?
        }
    };

    let plan = ScaffoldPlan {
        root: root.to_path_buf(),
        lower,
        capitalized,
        features,
    };

    let target = plan.target_dir();
    if target.exists() {
        if !force {
            let answer = ask(
                input,
                output,
                &format!("Directory {} already exists. Overwrite? (y/n) ", target.display()),
            )?;
            if !answer.eq_ignore_ascii_case("y") {
                writeln!(output, "Aborting...")?;
                return Ok(None);
            }
        }
        fs::remove_dir_all(&target).with_context(|| format!("removing {}", target.display()))?;
    }

    for file in generate(&plan)? {
        writeln!(output, "Created {}", file.display())?;
    }
    if declare_module(&plan)? {
        writeln!(output, "Declared module in src/perps/adapters/mod.rs")?;
    }
    if register_adapter(&plan)? {
        writeln!(output, "Registered {}Adapter in src/registry.rs", plan.capitalized)?;
    }
    tracing::info!(adapter = %plan.lower, features = ?plan.features, "adapter scaffolded");

    writeln!(output, "\nAdapter for {} created successfully!", plan.capitalized)?;
    writeln!(output, "Location: {}", target.display())?;
    writeln!(output, "\nNext steps:")?;
    writeln!(output, "1. Replace the placeholder data in {}/market.rs", target.display())?;
    writeln!(output, "2. Generate the README: grix docs {}", plan.lower)?;
    writeln!(output, "3. Run the unit tests: cargo test {}", plan.lower)?;
    writeln!(output, "4. Run the live suite: grix conformance {}", plan.lower)?;
    Ok(Some(plan))
}

/// CLI entry point for the `scaffold` subcommand.
pub fn run(root: &Path, name: Option<String>, features: Option<String>, force: bool) -> Result<()> {
    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut output = std::io::stdout();
    run_with(root, name, features, force, &mut input, &mut output)?;
    Ok(())
}
