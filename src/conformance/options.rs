use crate::options::{
    ExpiryDate, OptionsAdapter, OptionsOperation, OptionsTestParams, Premium, StrikePrice,
};
use crate::registry::AdapterKind;

use super::{ConformanceReport, HarnessOptions, check_finite, run_case};

/// Run every options operation once with `params`.
pub async fn run_options_suite<A: OptionsAdapter>(
    name: &str,
    adapter: &A,
    params: &OptionsTestParams<A>,
    options: &HarnessOptions,
) -> ConformanceReport {
    let mut report = ConformanceReport::new(name, AdapterKind::Options, options);
    let now = chrono::Utc::now().timestamp().max(0) as u64;
    tracing::info!(adapter = name, protocol = adapter.protocol_name(), "running options suite");

    report.cases.push(
        run_case(
            OptionsOperation::FetchExpiryDates.as_str(),
            adapter.fetch_expiry_dates(&params.fetch_expiry_dates),
            |expiries| check_expiries(expiries.as_deref(), now, options),
        )
        .await,
    );
    report.cases.push(
        run_case(
            OptionsOperation::GetLongOptionPremium.as_str(),
            adapter.get_long_option_premium(&params.get_long_option_premium),
            |premium| check_premium(*premium, options),
        )
        .await,
    );
    report.cases.push(
        run_case(
            OptionsOperation::GetShortOptionPremium.as_str(),
            adapter.get_short_option_premium(&params.get_short_option_premium),
            |premium| check_premium(*premium, options),
        )
        .await,
    );
    report.cases.push(
        run_case(
            OptionsOperation::ListStrikePricesByExpiry.as_str(),
            adapter.list_strike_prices_by_expiry(&params.list_strike_prices_by_expiry),
            |strikes| check_strikes(strikes.as_deref(), options),
        )
        .await,
    );

    report
}

fn check_non_empty<T>(values: Option<&[T]>, options: &HarnessOptions) -> Vec<String> {
    let empty = values.is_none_or(|v| v.is_empty());
    if options.require_non_empty && empty {
        vec!["expected a non-empty list".to_string()]
    } else {
        Vec::new()
    }
}

pub(super) fn check_expiries(
    expiries: Option<&[ExpiryDate]>,
    now: u64,
    options: &HarnessOptions,
) -> Vec<String> {
    let mut reasons = check_non_empty(expiries, options);
    if options.strict {
        for &expiry in expiries.unwrap_or_default() {
            if expiry <= now {
                reasons.push(format!("expiry {expiry} is not in the future (now {now})"));
            }
        }
    }
    reasons
}

pub(super) fn check_premium(premium: Option<Premium>, options: &HarnessOptions) -> Vec<String> {
    let mut reasons = Vec::new();
    // None is an empty book side, not a failure.
    if let Some(p) = premium {
        check_finite("premium", p, &mut reasons);
        if options.strict && p <= 0.0 {
            reasons.push(format!("premium {p} is not positive"));
        }
    }
    reasons
}

pub(super) fn check_strikes(strikes: Option<&[StrikePrice]>, options: &HarnessOptions) -> Vec<String> {
    let mut reasons = check_non_empty(strikes, options);
    for &strike in strikes.unwrap_or_default() {
        check_finite("strike", strike, &mut reasons);
        if options.strict && strike <= 0.0 {
            reasons.push(format!("strike {strike} is not positive"));
        }
    }
    reasons
}
