//! Hyperliquid perps adapter.
//!
//! Every call is a single `POST {base}/info` with a typed request body.
//! Prices and funding come from `metaAndAssetCtxs`, matched to the pair's
//! base asset by position in the universe.

mod funding;
mod market;
mod open_interest;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::config::{AdapterSettings, DEFAULT_TIMEOUT_MS, Network};
use crate::error::AdapterResult;
use crate::http;
use crate::perps::{
    FundingRate, HistoricalFundingRates, OpenInterestCaps, Pair, PerpetualMetadata,
    PerpetualsMetadataSource, PerpsAdapter, PerpsTestParams, PredictedFundingRates,
};
use crate::registry::FromSettings;

use types::{InfoRequest, parse_decimal};

pub(crate) const VENUE: &str = "Hyperliquid";

const MAINNET_URL: &str = "https://api.hyperliquid.xyz";
const TESTNET_URL: &str = "https://api.hyperliquid-testnet.xyz";

#[derive(Debug, Clone)]
pub struct HyperliquidConfig {
    pub network: Network,
    /// Request timeout; 10 s unless overridden.
    pub timeout: Duration,
    /// Replaces the network's API root.
    pub base_url: Option<String>,
}

impl Default for HyperliquidConfig {
    fn default() -> Self {
        Self {
            network: Network::Mainnet,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            base_url: None,
        }
    }
}

pub struct HyperliquidAdapter {
    client: reqwest::Client,
    info_url: String,
    network: Network,
}

impl HyperliquidAdapter {
    pub fn new(config: HyperliquidConfig) -> AdapterResult<Self> {
        let base = config.base_url.unwrap_or_else(|| {
            match config.network {
                Network::Mainnet => MAINNET_URL,
                Network::Testnet => TESTNET_URL,
            }
            .to_string()
        });
        Ok(HyperliquidAdapter {
            client: http::build_client(VENUE, config.timeout)?,
            info_url: format!("{}/info", base.trim_end_matches('/')),
            network: config.network,
        })
    }

    async fn info<T: DeserializeOwned>(&self, request: &InfoRequest<'_>) -> AdapterResult<T> {
        let payload = http::post_json(&self.client, VENUE, &self.info_url, request).await?;
        http::decode(VENUE, payload)
    }
}

impl FromSettings for HyperliquidAdapter {
    fn from_settings(settings: &AdapterSettings) -> AdapterResult<Self> {
        HyperliquidAdapter::new(HyperliquidConfig {
            network: settings.network,
            timeout: settings.timeout,
            base_url: settings.base_url.clone(),
        })
    }
}

#[async_trait]
impl PerpsAdapter for HyperliquidAdapter {
    async fn get_pairs(&self) -> AdapterResult<Vec<Pair>> {
        self.pairs().await
    }

    async fn get_asset_price(&self, pair: &str) -> AdapterResult<f64> {
        let ctx = self.asset_ctx(pair).await?;
        parse_decimal("markPx", &ctx.mark_px)
    }

    async fn get_funding_rate(&self, pair: &str) -> AdapterResult<FundingRate> {
        let ctx = self.asset_ctx(pair).await?;
        parse_decimal("funding", &ctx.funding)
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
impl PerpetualsMetadataSource for HyperliquidAdapter {
    async fn get_perpetuals_metadata(&self) -> AdapterResult<Vec<PerpetualMetadata>> {
        self.metadata().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_passes_structure_check() {
        let root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
        let problems = crate::validate::check_registered(root, "hyperliquid");
        assert!(problems.is_empty(), "{problems:?}");
    }

    #[test]
    fn test_network_selects_base_url() {
        let testnet = HyperliquidAdapter::new(HyperliquidConfig {
            network: Network::Testnet,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(testnet.info_url, "https://api.hyperliquid-testnet.xyz/info");
        assert_eq!(testnet.network(), Some(Network::Testnet));

        let mock = HyperliquidAdapter::new(HyperliquidConfig {
            base_url: Some("http://127.0.0.1:9/".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(mock.info_url, "http://127.0.0.1:9/info");
    }
}
