use async_trait::async_trait;

use crate::error::AdapterResult;
use crate::perps::{
    AssetPredictedFundingRates, PredictedFundingRates, VenueFundingRate, VenuePrediction,
};

use super::{TemplateAdapter, market};

const FUNDING_INTERVAL_MS: u64 = 8 * 60 * 60 * 1000;

/// Venues the placeholder board predicts for; the first is this venue.
const VENUES: [&str; 3] = ["TemplatePerp", "BinPerp", "BybitPerp"];

#[async_trait]
impl PredictedFundingRates for TemplateAdapter {
    /// Next-interval funding for every listed asset across `VENUES`.
    async fn get_predicted_funding_rates(&self) -> AdapterResult<Vec<AssetPredictedFundingRates>> {
        let now = chrono::Utc::now().timestamp_millis().max(0) as u64;
        let next_funding_time = now - now % FUNDING_INTERVAL_MS + FUNDING_INTERVAL_MS;

        Ok(market::MARKETS
            .iter()
            .map(|m| AssetPredictedFundingRates {
                asset: m.coin.to_string(),
                venues: VENUES
                    .iter()
                    .map(|name| VenuePrediction {
                        name: name.to_string(),
                        rate: Some(VenueFundingRate {
                            funding_rate: m.funding_rate,
                            next_funding_time,
                        }),
                    })
                    .collect(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::perps::PerpsAdapter;
    use crate::perps::adapters::template::TemplateConfig;

    #[tokio::test]
    async fn test_predictions_cover_every_asset() {
        let adapter = TemplateAdapter::new(TemplateConfig::default());
        let predicted = adapter
            .predicted_funding()
            .unwrap()
            .get_predicted_funding_rates()
            .await
            .unwrap();
        assert_eq!(predicted.len(), 5);
        let now = chrono::Utc::now().timestamp_millis() as u64;
        for asset in &predicted {
            assert_eq!(asset.venues.len(), VENUES.len());
            let rate = asset.venues[0].rate.as_ref().unwrap();
            assert!(rate.next_funding_time > now);
        }
    }
}
