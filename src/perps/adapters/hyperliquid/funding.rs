use async_trait::async_trait;

use crate::error::{AdapterError, AdapterResult};
use crate::perps::pair::extract_base_asset;
use crate::perps::{
    AssetPredictedFundingRates, FundingRateHistory, HistoricalFundingQuery,
    HistoricalFundingRates, PredictedFundingRates, VenueFundingRate, VenuePrediction,
};

use super::HyperliquidAdapter;
use super::types::{FundingHistoryEntry, InfoRequest, PredictedFundings, parse_decimal};

#[async_trait]
impl HistoricalFundingRates for HyperliquidAdapter {
    async fn get_historical_funding_rates(
        &self,
        query: &HistoricalFundingQuery,
    ) -> AdapterResult<Vec<FundingRateHistory>> {
        query.validate()?;
        let coin = extract_base_asset(&query.pair)?;
        let entries: Vec<FundingHistoryEntry> = self
            .info(&InfoRequest::FundingHistory {
                coin,
                start_time: query.start_time,
                end_time: query.end_time,
            })
            .await?;

        entries
            .into_iter()
            .map(|entry| {
                Ok(FundingRateHistory {
                    funding_rate: parse_decimal("fundingRate", &entry.funding_rate)?,
                    premium: parse_decimal("premium", &entry.premium)?,
                    coin: entry.coin,
                    time: entry.time,
                })
            })
            .collect()
    }
}

#[async_trait]
impl PredictedFundingRates for HyperliquidAdapter {
    async fn get_predicted_funding_rates(&self) -> AdapterResult<Vec<AssetPredictedFundingRates>> {
        let predicted: PredictedFundings = self.info(&InfoRequest::PredictedFundings).await?;
        predicted
            .into_iter()
            .map(|(asset, venues)| {
                let venues = venues
                    .into_iter()
                    .map(|(name, rate)| {
                        let rate = rate
                            .map(|r| {
                                Ok::<_, AdapterError>(VenueFundingRate {
                                    funding_rate: parse_decimal("fundingRate", &r.funding_rate)?,
                                    next_funding_time: r.next_funding_time,
                                })
                            })
                            .transpose()?;
                        Ok(VenuePrediction { name, rate })
                    })
                    .collect::<AdapterResult<Vec<_>>>()?;
                Ok(AssetPredictedFundingRates { asset, venues })
            })
            .collect()
    }
}
