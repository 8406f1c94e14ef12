use async_trait::async_trait;

use crate::error::{AdapterError, AdapterResult};
use crate::perps::{FundingRateHistory, HistoricalFundingQuery, HistoricalFundingRates};

use super::{TemplateAdapter, market};

/// Placeholder settlement interval.
const FUNDING_INTERVAL_MS: u64 = 8 * 60 * 60 * 1000;

/// Longest window served in one call, in funding intervals.
const MAX_INTERVALS: u64 = 500;

#[async_trait]
impl HistoricalFundingRates for TemplateAdapter {
    /// One entry per funding interval in `[start_time, end_time]`.
    async fn get_historical_funding_rates(
        &self,
        query: &HistoricalFundingQuery,
    ) -> AdapterResult<Vec<FundingRateHistory>> {
        query.validate()?;
        let market = market::lookup(&query.pair)?;
        let end = query
            .end_time
            .unwrap_or_else(|| chrono::Utc::now().timestamp_millis().max(0) as u64);
        let span = end.saturating_sub(query.start_time);
        if span / FUNDING_INTERVAL_MS > MAX_INTERVALS {
            return Err(AdapterError::InvalidParams(format!(
                "window of {span} ms exceeds {MAX_INTERVALS} funding intervals"
            )));
        }

        Ok((query.start_time..=end)
            .step_by(FUNDING_INTERVAL_MS as usize)
            .map(|time| FundingRateHistory {
                coin: market.coin.to_string(),
                funding_rate: market.funding_rate,
                premium: market.funding_rate / 2.0,
                time,
            })
            .collect())
    }
}
