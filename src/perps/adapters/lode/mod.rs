//! Lode perps adapter. Only identity is wired up so far; market data is not.

use async_trait::async_trait;

use crate::config::{AdapterSettings, Network};
use crate::error::{AdapterError, AdapterResult};
use crate::perps::{FundingRate, Pair, PerpsAdapter, PerpsTestParams};
use crate::registry::FromSettings;

const VENUE: &str = "Lode";

#[derive(Debug, Clone, Default)]
pub struct LodeConfig {
    pub network: Network,
}

pub struct LodeAdapter {
    network: Network,
}

impl LodeAdapter {
    pub fn new(config: LodeConfig) -> Self {
        LodeAdapter {
            network: config.network,
        }
    }
}

impl FromSettings for LodeAdapter {
    fn from_settings(settings: &AdapterSettings) -> AdapterResult<Self> {
        Ok(LodeAdapter::new(LodeConfig {
            network: settings.network,
        }))
    }
}

#[async_trait]
impl PerpsAdapter for LodeAdapter {
    async fn get_pairs(&self) -> AdapterResult<Vec<Pair>> {
        Err(AdapterError::not_implemented(VENUE, "get_pairs"))
    }

    async fn get_asset_price(&self, _pair: &str) -> AdapterResult<f64> {
        Err(AdapterError::not_implemented(VENUE, "get_asset_price"))
    }

    async fn get_funding_rate(&self, _pair: &str) -> AdapterResult<FundingRate> {
        Err(AdapterError::not_implemented(VENUE, "get_funding_rate"))
    }

    fn network(&self) -> Option<Network> {
        Some(self.network)
    }

    fn protocol_name(&self) -> Option<&'static str> {
        Some(VENUE)
    }

    fn test_params() -> PerpsTestParams {
        PerpsTestParams::for_pair("BTC-USD")
    }
}
