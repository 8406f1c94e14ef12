use crate::perps::pair::{extract_base_asset, is_valid_pair};
use crate::perps::{
    AssetPredictedFundingRates, FundingRate, FundingRateHistory, HistoricalFundingQuery, Pair,
    PerpetualMetadata, PerpsAdapter, PerpsOperation, PerpsTestParams,
};
use crate::registry::AdapterKind;

use super::{CaseOutcome, CaseReport, ConformanceReport, HarnessOptions, check_finite, run_case};

/// Pair every adapter must reject.
pub const INVALID_PAIR: &str = "INVALID-PAIR";

/// Funding magnitude considered plausible for a single interval.
const MAX_ABS_FUNDING: f64 = 0.1;

/// Run the required perps operations, the invalid-pair probe, and every
/// extension the adapter provides.
pub async fn run_perps_suite<A: PerpsAdapter + ?Sized>(
    name: &str,
    adapter: &A,
    params: &PerpsTestParams,
    options: &HarnessOptions,
) -> ConformanceReport {
    let mut report = ConformanceReport::new(name, AdapterKind::Perps, options);
    tracing::info!(
        adapter = name,
        protocol = adapter.protocol_name(),
        network = ?adapter.network(),
        "running perps suite"
    );

    report.cases.push(
        run_case(
            PerpsOperation::GetPairs.as_str(),
            adapter.get_pairs(),
            |pairs| check_pairs(pairs, options.strict || options.require_non_empty),
        )
        .await,
    );
    report.cases.push(
        run_case(
            PerpsOperation::GetAssetPrice.as_str(),
            adapter.get_asset_price(&params.get_asset_price),
            |price| check_price(*price, options),
        )
        .await,
    );
    report.cases.push(
        run_case(
            PerpsOperation::GetFundingRate.as_str(),
            adapter.get_funding_rate(&params.get_funding_rate),
            |rate| check_funding(*rate, options),
        )
        .await,
    );
    report.cases.push(invalid_pair_case(adapter).await);

    match adapter.perpetuals_metadata() {
        Some(source) => report.cases.push(
            run_case(
                PerpsOperation::GetPerpetualsMetadata.as_str(),
                source.get_perpetuals_metadata(),
                |metadata| check_metadata(metadata, options),
            )
            .await,
        ),
        None => report.absent.push(PerpsOperation::GetPerpetualsMetadata.as_str()),
    }

    match adapter.historical_funding() {
        Some(source) => {
            let query = &params.get_historical_funding_rates;
            report.cases.push(
                run_case(
                    PerpsOperation::GetHistoricalFundingRates.as_str(),
                    source.get_historical_funding_rates(query),
                    |history| check_history(history, query, options),
                )
                .await,
            )
        }
        None => report
            .absent
            .push(PerpsOperation::GetHistoricalFundingRates.as_str()),
    }

    match adapter.predicted_funding() {
        Some(source) => report.cases.push(
            run_case(
                PerpsOperation::GetPredictedFundingRates.as_str(),
                source.get_predicted_funding_rates(),
                |predicted| check_predicted(predicted, options),
            )
            .await,
        ),
        None => report
            .absent
            .push(PerpsOperation::GetPredictedFundingRates.as_str()),
    }

    match adapter.open_interest_caps() {
        Some(source) => report.cases.push(
            run_case(
                PerpsOperation::GetPerpsAtOpenInterestCap.as_str(),
                source.get_perps_at_open_interest_cap(),
                |pairs| check_pairs(pairs, false),
            )
            .await,
        ),
        None => report
            .absent
            .push(PerpsOperation::GetPerpsAtOpenInterestCap.as_str()),
    }

    report
}

/// A price lookup for [`INVALID_PAIR`] has to fail.
async fn invalid_pair_case<A: PerpsAdapter + ?Sized>(adapter: &A) -> CaseReport {
    let started = std::time::Instant::now();
    let outcome = match adapter.get_asset_price(INVALID_PAIR).await {
        Err(e) if e.is_not_implemented() => CaseOutcome::NotImplemented,
        Err(e) => {
            tracing::debug!(error = %e, "invalid pair rejected");
            CaseOutcome::Passed
        }
        Ok(price) => CaseOutcome::Failed(vec![format!(
            "{INVALID_PAIR} should be rejected, got price {price}"
        )]),
    };
    CaseReport {
        operation: "rejects_invalid_pair",
        outcome,
        elapsed: started.elapsed(),
    }
}

pub(super) fn check_pairs(pairs: &[Pair], non_empty: bool) -> Vec<String> {
    let mut reasons = Vec::new();
    if non_empty && pairs.is_empty() {
        reasons.push("expected at least one pair".to_string());
    }
    for pair in pairs {
        if !is_valid_pair(pair) {
            reasons.push(format!("pair `{pair}` is not BASE-QUOTE"));
        }
    }
    reasons
}

pub(super) fn check_price(price: f64, options: &HarnessOptions) -> Vec<String> {
    let mut reasons = Vec::new();
    check_finite("price", price, &mut reasons);
    if options.strict && price <= 0.0 {
        reasons.push(format!("price {price} is not positive"));
    }
    reasons
}

pub(super) fn check_funding(rate: FundingRate, options: &HarnessOptions) -> Vec<String> {
    let mut reasons = Vec::new();
    check_finite("funding rate", rate, &mut reasons);
    if options.strict && rate.abs() >= MAX_ABS_FUNDING {
        reasons.push(format!(
            "funding rate {rate} outside ±{MAX_ABS_FUNDING}"
        ));
    }
    reasons
}

fn check_metadata(metadata: &[PerpetualMetadata], options: &HarnessOptions) -> Vec<String> {
    let mut reasons = Vec::new();
    if options.require_non_empty && metadata.is_empty() {
        reasons.push("expected metadata for at least one contract".to_string());
    }
    for m in metadata {
        if m.name.is_empty() {
            reasons.push("metadata entry without a name".to_string());
        }
        if options.strict && m.max_leverage == 0 {
            reasons.push(format!("{}: max leverage is 0", m.name));
        }
    }
    reasons
}

pub(super) fn check_history(
    history: &[FundingRateHistory],
    query: &HistoricalFundingQuery,
    options: &HarnessOptions,
) -> Vec<String> {
    let mut reasons = Vec::new();
    if options.require_non_empty && history.is_empty() {
        reasons.push("expected at least one funding entry".to_string());
    }
    let coin = extract_base_asset(&query.pair).ok();
    let end = query.end_time.unwrap_or(u64::MAX);
    for entry in history {
        check_finite("funding rate", entry.funding_rate, &mut reasons);
        check_finite("premium", entry.premium, &mut reasons);
        if !options.strict {
            continue;
        }
        if entry.time < query.start_time || entry.time > end {
            reasons.push(format!("entry at {} is outside the requested window", entry.time));
        }
        if coin.is_some_and(|c| c != entry.coin) {
            reasons.push(format!("entry for `{}` in a {} query", entry.coin, query.pair));
        }
    }
    reasons
}

fn check_predicted(predicted: &[AssetPredictedFundingRates], options: &HarnessOptions) -> Vec<String> {
    let mut reasons = Vec::new();
    if options.require_non_empty && predicted.is_empty() {
        reasons.push("expected predictions for at least one asset".to_string());
    }
    for asset in predicted {
        if asset.asset.is_empty() {
            reasons.push("prediction without an asset".to_string());
        }
        for rate in asset.venues.iter().filter_map(|v| v.rate.as_ref()) {
            check_finite("predicted funding rate", rate.funding_rate, &mut reasons);
        }
    }
    reasons
}
