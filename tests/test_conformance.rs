use async_trait::async_trait;

use grix_adapters::config::AdapterSettings;
use grix_adapters::conformance::{CaseOutcome, HarnessOptions, run_options_suite, run_perps_suite};
use grix_adapters::error::{AdapterError, AdapterResult};
use grix_adapters::options::{
    AssetParams, ExpiryDate, InstrumentParams, OptionsAdapter, OptionsTestParams, Premium,
    StrikeListParams, StrikePrice,
};
use grix_adapters::perps::adapters::lode::{LodeAdapter, LodeConfig};
use grix_adapters::perps::adapters::template::{TemplateAdapter, TemplateConfig};
use grix_adapters::perps::{FundingRate, Pair, PerpsAdapter, PerpsTestParams};
use grix_adapters::registry;

// ── Mock adapters ───────────────────────────────────────────────────

/// Options venue with a scripted board.
struct ScriptedOptions {
    expiries: Vec<ExpiryDate>,
    strikes: Vec<StrikePrice>,
    long: Option<Premium>,
    short_implemented: bool,
}

impl ScriptedOptions {
    fn healthy() -> Self {
        let future = chrono::Utc::now().timestamp() as u64 + 7 * 24 * 3600;
        ScriptedOptions {
            expiries: vec![future],
            strikes: vec![90_000.0, 97_000.0],
            long: Some(4750.0),
            short_implemented: true,
        }
    }
}

#[async_trait]
impl OptionsAdapter for ScriptedOptions {
    type ExpiryParams = AssetParams;
    type LongPremiumParams = InstrumentParams;
    type ShortPremiumParams = InstrumentParams;
    type StrikeParams = StrikeListParams;

    fn protocol_name(&self) -> &'static str {
        "Scripted"
    }

    fn test_params() -> OptionsTestParams<Self> {
        OptionsTestParams {
            fetch_expiry_dates: AssetParams { asset: "BTC".into() },
            get_long_option_premium: InstrumentParams {
                instrument_name: "BTC-1-97000-C".into(),
            },
            get_short_option_premium: InstrumentParams {
                instrument_name: "BTC-1-97000-C".into(),
            },
            list_strike_prices_by_expiry: StrikeListParams {
                expiry: 1,
                asset: "BTC".into(),
            },
        }
    }

    async fn fetch_expiry_dates(&self, _: &AssetParams) -> AdapterResult<Option<Vec<ExpiryDate>>> {
        Ok(Some(self.expiries.clone()))
    }

    async fn get_long_option_premium(&self, _: &InstrumentParams) -> AdapterResult<Option<Premium>> {
        Ok(self.long)
    }

    async fn get_short_option_premium(&self, _: &InstrumentParams) -> AdapterResult<Option<Premium>> {
        if self.short_implemented {
            Ok(Some(4275.0))
        } else {
            Err(AdapterError::not_implemented("Scripted", "get_short_option_premium"))
        }
    }

    async fn list_strike_prices_by_expiry(
        &self,
        _: &StrikeListParams,
    ) -> AdapterResult<Option<Vec<StrikePrice>>> {
        Ok(Some(self.strikes.clone()))
    }
}

/// Perps venue that prices every pair, including ones it should reject.
struct PermissivePerps;

#[async_trait]
impl PerpsAdapter for PermissivePerps {
    async fn get_pairs(&self) -> AdapterResult<Vec<Pair>> {
        Ok(vec!["BTC-USD".into()])
    }

    async fn get_asset_price(&self, _pair: &str) -> AdapterResult<f64> {
        Ok(1.0)
    }

    async fn get_funding_rate(&self, _pair: &str) -> AdapterResult<FundingRate> {
        Ok(0.25)
    }

    fn test_params() -> PerpsTestParams {
        PerpsTestParams::for_pair("BTC-USD")
    }
}

// ── Options suite ───────────────────────────────────────────────────

#[tokio::test]
async fn test_healthy_options_adapter_is_conformant() {
    let adapter = ScriptedOptions::healthy();
    let report = run_options_suite(
        "scripted",
        &adapter,
        &ScriptedOptions::test_params(),
        &HarnessOptions::default(),
    )
    .await;
    assert!(report.is_conformant(), "{report}");
    assert_eq!(report.passed(), 4);
}

#[tokio::test]
async fn test_empty_strikes_fail_only_when_required() {
    let adapter = ScriptedOptions {
        strikes: Vec::new(),
        ..ScriptedOptions::healthy()
    };
    let params = ScriptedOptions::test_params();

    let relaxed = run_options_suite("scripted", &adapter, &params, &HarnessOptions::default()).await;
    assert!(relaxed.is_conformant(), "{relaxed}");

    let required = HarnessOptions {
        require_non_empty: true,
        ..Default::default()
    };
    let strict = run_options_suite("scripted", &adapter, &params, &required).await;
    assert!(!strict.is_conformant());
    assert!(matches!(
        strict.case("list_strike_prices_by_expiry").unwrap().outcome,
        CaseOutcome::Failed(_)
    ));
}

#[tokio::test]
async fn test_past_expiries_and_no_liquidity() {
    let adapter = ScriptedOptions {
        expiries: vec![1_739_779_200],
        long: None,
        ..ScriptedOptions::healthy()
    };
    let params = ScriptedOptions::test_params();

    let strict = run_options_suite("scripted", &adapter, &params, &HarnessOptions::default()).await;
    assert_eq!(strict.failed(), 1, "{strict}");
    assert_eq!(
        strict.case("get_long_option_premium").unwrap().outcome,
        CaseOutcome::Passed
    );

    let lenient = run_options_suite("scripted", &adapter, &params, &HarnessOptions::lenient()).await;
    assert!(lenient.is_conformant(), "{lenient}");
}

#[tokio::test]
async fn test_unimplemented_operation_is_todo() {
    let adapter = ScriptedOptions {
        short_implemented: false,
        ..ScriptedOptions::healthy()
    };
    let params = ScriptedOptions::test_params();

    let report = run_options_suite("scripted", &adapter, &params, &HarnessOptions::default()).await;
    assert_eq!(report.not_implemented(), 1);
    assert!(!report.is_conformant());
    assert!(report.to_string().contains("TODO get_short_option_premium"));

    let allowed = HarnessOptions {
        allow_unimplemented: true,
        ..Default::default()
    };
    let report = run_options_suite("scripted", &adapter, &params, &allowed).await;
    assert!(report.is_conformant(), "{report}");
}

// ── Perps suite ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_template_adapter_is_conformant() {
    let adapter = TemplateAdapter::new(TemplateConfig::default());
    let report = run_perps_suite(
        "template",
        &adapter,
        &TemplateAdapter::test_params(),
        &HarnessOptions {
            require_non_empty: true,
            ..Default::default()
        },
    )
    .await;
    assert!(report.is_conformant(), "{report}");
    assert!(report.absent.is_empty());
    assert_eq!(
        report.case("rejects_invalid_pair").unwrap().outcome,
        CaseOutcome::Passed
    );
}

#[tokio::test]
async fn test_lode_is_conformant_only_with_unimplemented_allowed() {
    let adapter = LodeAdapter::new(LodeConfig::default());
    let params = LodeAdapter::test_params();

    let report = run_perps_suite("lode", &adapter, &params, &HarnessOptions::default()).await;
    assert!(!report.is_conformant());
    assert_eq!(report.failed(), 0, "{report}");
    assert_eq!(report.absent.len(), 4);

    let allowed = HarnessOptions {
        allow_unimplemented: true,
        ..Default::default()
    };
    let report = run_perps_suite("lode", &adapter, &params, &allowed).await;
    assert!(report.is_conformant(), "{report}");
}

#[tokio::test]
async fn test_accepting_invalid_pair_fails() {
    let report = run_perps_suite(
        "permissive",
        &PermissivePerps,
        &PermissivePerps::test_params(),
        &HarnessOptions::default(),
    )
    .await;
    assert!(matches!(
        report.case("rejects_invalid_pair").unwrap().outcome,
        CaseOutcome::Failed(_)
    ));
    // 0.25 per interval is implausible
    assert!(matches!(
        report.case("get_funding_rate").unwrap().outcome,
        CaseOutcome::Failed(_)
    ));
    assert!(report.to_string().contains("not provided"));
}

#[tokio::test]
async fn test_registry_runs_by_name() {
    let report = registry::run_conformance(
        "template",
        &AdapterSettings::default(),
        &HarnessOptions::default(),
    )
    .await
    .unwrap();
    assert_eq!(report.adapter, "template");
    assert!(report.is_conformant(), "{report}");

    let err = registry::run_conformance(
        "gmx",
        &AdapterSettings::default(),
        &HarnessOptions::default(),
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("Unknown adapter 'gmx'"));
}
