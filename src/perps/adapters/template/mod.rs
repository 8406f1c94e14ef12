//! Template perps adapter, the source `grix scaffold` copies.
//!
//! Serves a fixed placeholder board for BTC, ETH, SOL, AVAX and LINK. Replace
//! the bodies in `market.rs` and the extension files with calls to the venue.
//! Extension support is declared by the accessors on `PerpsAdapter`; each one
//! lives in its own file so the scaffold can drop what is not needed.

mod historical_funding;
mod market;
mod open_interest_cap;
mod predicted_funding;

use async_trait::async_trait;

use crate::config::{AdapterSettings, Network};
use crate::error::AdapterResult;
use crate::perps::HistoricalFundingRates;
use crate::perps::OpenInterestCaps;
use crate::perps::PredictedFundingRates;
use crate::perps::{
    FundingRate, Pair, PerpetualMetadata, PerpetualsMetadataSource, PerpsAdapter, PerpsTestParams,
};
use crate::registry::FromSettings;

const VENUE: &str = "Template";

#[derive(Debug, Clone, Default)]
pub struct TemplateConfig {
    /// Network to connect to.
    pub network: Network,
}

pub struct TemplateAdapter {
    network: Network,
}

impl TemplateAdapter {
    pub fn new(config: TemplateConfig) -> Self {
        TemplateAdapter {
            network: config.network,
        }
    }
}

impl FromSettings for TemplateAdapter {
    fn from_settings(settings: &AdapterSettings) -> AdapterResult<Self> {
        Ok(TemplateAdapter::new(TemplateConfig {
            network: settings.network,
        }))
    }
}

#[async_trait]
impl PerpsAdapter for TemplateAdapter {
    /// All tradable pairs as `BASE-USD`.
    async fn get_pairs(&self) -> AdapterResult<Vec<Pair>> {
        Ok(market::pairs())
    }

    /// Mark price of `pair`.
    async fn get_asset_price(&self, pair: &str) -> AdapterResult<f64> {
        Ok(market::lookup(pair)?.price)
    }

    /// Current funding rate of `pair`.
    async fn get_funding_rate(&self, pair: &str) -> AdapterResult<FundingRate> {
        Ok(market::lookup(pair)?.funding_rate)
    }

    fn network(&self) -> Option<Network> {
        Some(self.network)
    }

    fn protocol_name(&self) -> Option<&'static str> {
        Some(VENUE)
    }

    fn perpetuals_metadata(&self) -> Option<&dyn PerpetualsMetadataSource> {
        Some(self)
    }

    fn historical_funding(&self) -> Option<&dyn HistoricalFundingRates> {
        Some(self)
    }

    fn predicted_funding(&self) -> Option<&dyn PredictedFundingRates> {
        Some(self)
    }

    fn open_interest_caps(&self) -> Option<&dyn OpenInterestCaps> {
        Some(self)
    }

    fn test_params() -> PerpsTestParams {
        PerpsTestParams::for_pair("BTC-USD")
    }
}

#[async_trait]
impl PerpetualsMetadataSource for TemplateAdapter {
    /// Static contract parameters of every listed asset.
    async fn get_perpetuals_metadata(&self) -> AdapterResult<Vec<PerpetualMetadata>> {
        Ok(market::metadata())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdapterError;

    #[test]
    fn test_manifest_passes_structure_check() {
        let root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
        let problems = crate::validate::check_registered(root, "template");
        assert!(problems.is_empty(), "{problems:?}");
    }

    #[tokio::test]
    async fn test_placeholder_board() {
        let adapter = TemplateAdapter::new(TemplateConfig::default());
        let pairs = adapter.get_pairs().await.unwrap();
        assert_eq!(pairs, ["BTC-USD", "ETH-USD", "SOL-USD", "AVAX-USD", "LINK-USD"]);
        for pair in &pairs {
            assert!(adapter.get_asset_price(pair).await.unwrap() > 0.0);
            assert!(adapter.get_funding_rate(pair).await.unwrap().abs() < 0.01);
        }
        let metadata = adapter.perpetuals_metadata().unwrap();
        assert_eq!(metadata.get_perpetuals_metadata().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_unknown_and_malformed_pairs() {
        let adapter = TemplateAdapter::new(TemplateConfig::default());
        assert!(matches!(
            adapter.get_asset_price("INVALID-PAIR").await,
            Err(AdapterError::UnknownPair { .. })
        ));
        assert!(matches!(
            adapter.get_funding_rate("btc").await,
            Err(AdapterError::InvalidPair { .. })
        ));
    }
}
