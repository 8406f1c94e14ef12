use std::collections::BTreeSet;

use crate::error::AdapterResult;
use crate::http;
use crate::options::{ExpiryDate, StrikePrice};

use super::types::DeribitInstrument;
use super::{VENUE, result_field};

/// All live (non-expired) options for `currency`.
pub async fn fetch_board(
    client: &reqwest::Client,
    base_url: &str,
    currency: &str,
) -> AdapterResult<Vec<DeribitInstrument>> {
    let url = format!("{base_url}/public/get_instruments");
    let query = [("currency", currency), ("expired", "false"), ("kind", "option")];
    let payload = http::get_json(client, VENUE, &url, &query).await?;
    http::decode(VENUE, result_field(payload)?)
}

/// Distinct expiries in ascending order, converted from ms to seconds.
pub fn expiries(board: &[DeribitInstrument]) -> Vec<ExpiryDate> {
    board
        .iter()
        .map(|i| i.expiration_timestamp / 1000)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct strikes, ascending, of the options expiring at `expiry` seconds.
pub fn strikes_for_expiry(board: &[DeribitInstrument], expiry: ExpiryDate) -> Vec<StrikePrice> {
    let mut strikes: Vec<StrikePrice> = board
        .iter()
        .filter(|i| i.expiration_timestamp / 1000 == expiry)
        .map(|i| i.strike)
        .collect();
    strikes.sort_by(|a, b| a.total_cmp(b));
    strikes.dedup();
    strikes
}
