//! Conformance harness: one independent case per adapter operation, driven
//! by the adapter's own test parameters.

mod options;
mod perps;

use std::fmt;
use std::time::{Duration, Instant};

use anyhow::Context;

use crate::config::AdapterSettings;
use crate::error::{AdapterError, AdapterResult};
use crate::registry::{self, AdapterKind};

pub use options::run_options_suite;
pub use perps::{INVALID_PAIR, run_perps_suite};

/// Which domain checks run on top of the shape checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarnessOptions {
    /// Future expiries, positive strikes/premiums/prices, bounded funding.
    pub strict: bool,
    /// Empty sequences fail.
    pub require_non_empty: bool,
    /// Unimplemented operations do not make the report non-conformant.
    pub allow_unimplemented: bool,
}

impl Default for HarnessOptions {
    fn default() -> Self {
        HarnessOptions {
            strict: true,
            require_non_empty: false,
            allow_unimplemented: false,
        }
    }
}

impl HarnessOptions {
    /// Shape checks only.
    pub fn lenient() -> Self {
        HarnessOptions {
            strict: false,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CaseOutcome {
    Passed,
    Failed(Vec<String>),
    NotImplemented,
}

#[derive(Debug, Clone)]
pub struct CaseReport {
    pub operation: &'static str,
    pub outcome: CaseOutcome,
    pub elapsed: Duration,
}

#[derive(Debug, Clone)]
pub struct ConformanceReport {
    pub adapter: String,
    pub kind: AdapterKind,
    pub cases: Vec<CaseReport>,
    /// Optional operations the adapter does not provide.
    pub absent: Vec<&'static str>,
    pub allow_unimplemented: bool,
}

impl ConformanceReport {
    pub fn new(adapter: &str, kind: AdapterKind, options: &HarnessOptions) -> Self {
        ConformanceReport {
            adapter: adapter.to_string(),
            kind,
            cases: Vec::new(),
            absent: Vec::new(),
            allow_unimplemented: options.allow_unimplemented,
        }
    }

    pub fn case(&self, operation: &str) -> Option<&CaseReport> {
        self.cases.iter().find(|c| c.operation == operation)
    }

    pub fn passed(&self) -> usize {
        self.count(|o| matches!(o, CaseOutcome::Passed))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, CaseOutcome::Failed(_)))
    }

    pub fn not_implemented(&self) -> usize {
        self.count(|o| matches!(o, CaseOutcome::NotImplemented))
    }

    pub fn is_conformant(&self) -> bool {
        self.failed() == 0 && (self.allow_unimplemented || self.not_implemented() == 0)
    }

    fn count(&self, pred: impl Fn(&CaseOutcome) -> bool) -> usize {
        self.cases.iter().filter(|c| pred(&c.outcome)).count()
    }
}

impl fmt::Display for ConformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Conformance: {} ({})", self.adapter, self.kind)?;
        for case in &self.cases {
            let ms = case.elapsed.as_millis();
            match &case.outcome {
                CaseOutcome::Passed => writeln!(f, "  PASS {} ({ms} ms)", case.operation)?,
                CaseOutcome::NotImplemented => {
                    writeln!(f, "  TODO {} (not implemented)", case.operation)?
                }
                CaseOutcome::Failed(reasons) => {
                    writeln!(f, "  FAIL {} ({ms} ms)", case.operation)?;
                    for reason in reasons {
                        writeln!(f, "       - {reason}")?;
                    }
                }
            }
        }
        if !self.absent.is_empty() {
            writeln!(f, "  not provided: {}", self.absent.join(", "))?;
        }
        write!(
            f,
            "{} passed, {} failed, {} not implemented: {}",
            self.passed(),
            self.failed(),
            self.not_implemented(),
            if self.is_conformant() { "conformant" } else { "NOT conformant" }
        )
    }
}

/// CLI entry point for the `conformance` subcommand.
pub fn run(adapter: &str, settings: &AdapterSettings, options: &HarnessOptions) -> anyhow::Result<()> {
    let rt = tokio::runtime::Runtime::new().context("creating tokio runtime")?;
    let report = rt.block_on(registry::run_conformance(adapter, settings, options))?;
    println!("{report}");
    if !report.is_conformant() {
        std::process::exit(1);
    }
    Ok(())
}

/// Await one operation and classify its result. `check` returns the
/// violated invariants; none means the case passed.
pub(crate) async fn run_case<T, F, C>(operation: &'static str, call: F, check: C) -> CaseReport
where
    F: Future<Output = AdapterResult<T>>,
    C: FnOnce(&T) -> Vec<String>,
{
    let started = Instant::now();
    let result = call.await;
    let elapsed = started.elapsed();

    let outcome = match result {
        Err(e) if e.is_not_implemented() => CaseOutcome::NotImplemented,
        Err(e) => CaseOutcome::Failed(vec![describe(&e)]),
        Ok(value) => {
            let reasons = check(&value);
            if reasons.is_empty() {
                CaseOutcome::Passed
            } else {
                CaseOutcome::Failed(reasons)
            }
        }
    };
    match &outcome {
        CaseOutcome::Failed(reasons) => tracing::warn!(operation, ?reasons, "case failed"),
        other => tracing::debug!(operation, ?other, "case finished"),
    }
    CaseReport {
        operation,
        outcome,
        elapsed,
    }
}

fn describe(e: &AdapterError) -> String {
    let mut out = e.to_string();
    let mut source = std::error::Error::source(e);
    while let Some(inner) = source {
        out.push_str(&format!(": {inner}"));
        source = inner.source();
    }
    out
}

pub(crate) fn check_finite(label: &str, value: f64, reasons: &mut Vec<String>) {
    if !value.is_finite() {
        reasons.push(format!("{label} is not a finite number ({value})"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(outcomes: Vec<CaseOutcome>, allow_unimplemented: bool) -> ConformanceReport {
        ConformanceReport {
            adapter: "mock".into(),
            kind: AdapterKind::Options,
            cases: outcomes
                .into_iter()
                .map(|outcome| CaseReport {
                    operation: "op",
                    outcome,
                    elapsed: Duration::ZERO,
                })
                .collect(),
            absent: Vec::new(),
            allow_unimplemented,
        }
    }

    #[test]
    fn test_unimplemented_fails_unless_allowed() {
        let outcomes = vec![CaseOutcome::Passed, CaseOutcome::NotImplemented];
        assert!(!report(outcomes.clone(), false).is_conformant());
        assert!(report(outcomes, true).is_conformant());
    }

    #[test]
    fn test_failure_is_never_conformant() {
        let r = report(vec![CaseOutcome::Failed(vec!["boom".into()])], true);
        assert!(!r.is_conformant());
        let printed = r.to_string();
        assert!(printed.contains("FAIL op"));
        assert!(printed.contains("- boom"));
        assert!(printed.ends_with("NOT conformant"));
    }
}
