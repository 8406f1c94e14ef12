use std::fmt;

use anyhow::{Result, bail};
use serde::Serialize;

use crate::config::AdapterSettings;
use crate::conformance::{self, ConformanceReport, HarnessOptions};
use crate::error::AdapterResult;
use crate::options::{OptionsAdapter, OptionsOperation};
use crate::perps::{PerpsAdapter, PerpsOperation};

/// Construction from the settings shared by every registered adapter.
pub trait FromSettings: Sized {
    fn from_settings(settings: &AdapterSettings) -> AdapterResult<Self>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AdapterKind {
    Options,
    Perps,
}

impl AdapterKind {
    /// Directory under `src/` holding this kind's adapters.
    pub fn as_str(&self) -> &'static str {
        match self {
            AdapterKind::Options => "options",
            AdapterKind::Perps => "perps",
        }
    }

    /// Operations every adapter of this kind must expose.
    pub fn required_operations(&self) -> Vec<&'static str> {
        match self {
            AdapterKind::Options => OptionsOperation::ALL.iter().map(|op| op.as_str()).collect(),
            AdapterKind::Perps => PerpsOperation::REQUIRED
                .iter()
                .map(|op| op.as_str())
                .collect(),
        }
    }

    /// Operations that need an entry in the adapter's test parameters.
    pub fn parameterized_operations(&self) -> Vec<&'static str> {
        match self {
            AdapterKind::Options => self.required_operations(),
            AdapterKind::Perps => PerpsOperation::REQUIRED
                .iter()
                .chain(PerpsOperation::EXTENSIONS.iter())
                .filter(|op| op.takes_params())
                .map(|op| op.as_str())
                .collect(),
        }
    }
}

impl fmt::Display for AdapterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the registry knows about an adapter without constructing it.
#[derive(Debug, Clone, Serialize)]
pub struct AdapterManifest {
    pub kind: AdapterKind,
    /// Module directory name, e.g. "deribit".
    pub name: &'static str,
    /// Exported type name, e.g. "DeribitAdapter".
    pub export: &'static str,
    pub operations: Vec<&'static str>,
    pub test_params: serde_json::Value,
}

fn export_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

fn options_manifest<A: OptionsAdapter>(name: &'static str) -> AdapterManifest {
    AdapterManifest {
        kind: AdapterKind::Options,
        name,
        export: export_name::<A>(),
        operations: AdapterKind::Options.required_operations(),
        test_params: A::test_params().to_json(),
    }
}

fn perps_manifest<A: PerpsAdapter>(name: &'static str) -> AdapterManifest {
    AdapterManifest {
        kind: AdapterKind::Perps,
        name,
        export: export_name::<A>(),
        operations: AdapterKind::Perps.required_operations(),
        test_params: A::test_params().to_json(),
    }
}

// ── Registration ────────────────────────────────────────────────────

/// Generates `names`, `manifests` and `run_conformance` from one list per
/// adapter kind. Listing a type that does not implement the kind's trait and
/// `FromSettings` is a compile error.
macro_rules! register_adapters {
    (
        options { $($oname:ident => $Opt:ty),* $(,)? }
        perps { $($pname:ident => $Perp:ty),* $(,)? }
    ) => {
        /// Every registered adapter, options first, in registration order.
        pub fn names() -> Vec<(AdapterKind, &'static str)> {
            vec![
                $((AdapterKind::Options, stringify!($oname)),)*
                $((AdapterKind::Perps, stringify!($pname)),)*
            ]
        }

        pub fn manifests() -> Vec<AdapterManifest> {
            vec![
                $(options_manifest::<$Opt>(stringify!($oname)),)*
                $(perps_manifest::<$Perp>(stringify!($pname)),)*
            ]
        }

        /// Build `name` from `settings` and run the conformance suite against
        /// its own test parameters.
        pub async fn run_conformance(
            name: &str,
            settings: &AdapterSettings,
            options: &HarnessOptions,
        ) -> Result<ConformanceReport> {
            $(
                if name == stringify!($oname) {
                    let adapter = <$Opt as FromSettings>::from_settings(settings)?;
                    let params = <$Opt as OptionsAdapter>::test_params();
                    return Ok(conformance::run_options_suite(name, &adapter, &params, options).await);
                }
            )*
            $(
                if name == stringify!($pname) {
                    let adapter = <$Perp as FromSettings>::from_settings(settings)?;
                    let params = <$Perp as PerpsAdapter>::test_params();
                    return Ok(conformance::run_perps_suite(name, &adapter, &params, options).await);
                }
            )*

            let known: Vec<&str> = names().into_iter().map(|(_, n)| n).collect();
            bail!("Unknown adapter '{name}'. Registered: {}", known.join(", "))
        }
    };
}

register_adapters! {
    options {
        deribit => crate::options::adapters::deribit::DeribitAdapter,
        ithaca => crate::options::adapters::ithaca::IthacaAdapter,
        moby => crate::options::adapters::moby::MobyAdapter,
        zomma => crate::options::adapters::zomma::ZommaAdapter,
    }
    perps {
        hyperliquid => crate::perps::adapters::hyperliquid::HyperliquidAdapter,
        lode => crate::perps::adapters::lode::LodeAdapter,
        template => crate::perps::adapters::template::TemplateAdapter,
    }
}

pub fn manifest(name: &str) -> Option<AdapterManifest> {
    manifests().into_iter().find(|m| m.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_names_follow_convention() {
        for m in manifests() {
            let mut chars = m.name.chars();
            let expected = match chars.next() {
                Some(first) => format!("{}{}Adapter", first.to_uppercase(), chars.as_str()),
                None => String::new(),
            };
            assert_eq!(m.export, expected);
        }
    }

    #[test]
    fn test_names_are_unique() {
        let names = names();
        let mut seen = std::collections::HashSet::new();
        for (_, name) in &names {
            assert!(seen.insert(*name), "duplicate adapter {name}");
        }
    }

    #[test]
    fn test_perps_params_cover_history_query() {
        let m = manifest("hyperliquid").unwrap();
        assert_eq!(m.kind, AdapterKind::Perps);
        assert_eq!(
            AdapterKind::Perps.parameterized_operations(),
            vec!["get_asset_price", "get_funding_rate", "get_historical_funding_rates"]
        );
        assert!(m.test_params["get_historical_funding_rates"].is_object());
    }

    #[tokio::test]
    async fn test_unknown_adapter_lists_registered() {
        let err = run_conformance("nope", &AdapterSettings::default(), &HarnessOptions::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("deribit"));
    }
}
