//! Moby options adapter.
//!
//! Everything is read from the aggregated `market/all` snapshot. Only expiry
//! listing is backed by venue data so far: strike listing returns an empty
//! board and both premium operations report themselves as unimplemented.

pub mod types;

use std::time::Duration;

use async_trait::async_trait;

use crate::config::{AdapterSettings, DEFAULT_TIMEOUT_MS};
use crate::error::{AdapterError, AdapterResult};
use crate::http;
use crate::options::{
    AssetParams, ExpiryDate, InstrumentParams, OptionsAdapter, OptionsTestParams, Premium,
    StrikeListParams, StrikePrice,
};
use crate::registry::FromSettings;

use types::MobyBoardData;

const VENUE: &str = "Moby";
const API_URL: &str = "https://api.moby.trade/v1";

#[derive(Debug, Clone)]
pub struct MobyConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for MobyConfig {
    fn default() -> Self {
        Self {
            base_url: API_URL.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

pub struct MobyAdapter {
    client: reqwest::Client,
    base_url: String,
}

impl MobyAdapter {
    pub fn new(config: MobyConfig) -> AdapterResult<Self> {
        Ok(MobyAdapter {
            client: http::build_client(VENUE, config.timeout)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch_board(&self) -> AdapterResult<MobyBoardData> {
        let url = format!("{}/market/all", self.base_url);
        let payload = http::get_json(&self.client, VENUE, &url, &[]).await?;
        http::decode(VENUE, payload)
    }
}

impl FromSettings for MobyAdapter {
    fn from_settings(settings: &AdapterSettings) -> AdapterResult<Self> {
        MobyAdapter::new(MobyConfig {
            base_url: settings
                .base_url
                .clone()
                .unwrap_or_else(|| API_URL.to_string()),
            timeout: settings.timeout,
        })
    }
}

#[async_trait]
impl OptionsAdapter for MobyAdapter {
    type ExpiryParams = AssetParams;
    type LongPremiumParams = InstrumentParams;
    type ShortPremiumParams = InstrumentParams;
    type StrikeParams = StrikeListParams;

    fn protocol_name(&self) -> &'static str {
        VENUE
    }

    fn test_params() -> OptionsTestParams<Self> {
        OptionsTestParams {
            fetch_expiry_dates: AssetParams {
                asset: "ETH".into(),
            },
            get_long_option_premium: InstrumentParams {
                instrument_name: "ETH-30JUN24-3000-C".into(),
            },
            get_short_option_premium: InstrumentParams {
                instrument_name: "ETH-30JUN24-3000-C".into(),
            },
            list_strike_prices_by_expiry: StrikeListParams {
                expiry: 1_739_779_200,
                asset: "ETH".into(),
            },
        }
    }

    async fn fetch_expiry_dates(
        &self,
        params: &AssetParams,
    ) -> AdapterResult<Option<Vec<ExpiryDate>>> {
        let board = self.fetch_board().await?;
        let market = board
            .data
            .market
            .get(&params.asset)
            .ok_or_else(|| AdapterError::UnknownAsset {
                venue: VENUE,
                asset: params.asset.clone(),
            })?;
        Ok(Some(market.expiries.clone()))
    }

    async fn get_long_option_premium(
        &self,
        _params: &InstrumentParams,
    ) -> AdapterResult<Option<Premium>> {
        Err(AdapterError::not_implemented(VENUE, "get_long_option_premium"))
    }

    async fn get_short_option_premium(
        &self,
        _params: &InstrumentParams,
    ) -> AdapterResult<Option<Premium>> {
        Err(AdapterError::not_implemented(VENUE, "get_short_option_premium"))
    }

    async fn list_strike_prices_by_expiry(
        &self,
        params: &StrikeListParams,
    ) -> AdapterResult<Option<Vec<StrikePrice>>> {
        tracing::warn!(
            venue = VENUE,
            asset = %params.asset,
            expiry = params.expiry,
            "strike listing is not backed by venue data yet, returning an empty board"
        );
        Ok(Some(Vec::new()))
    }
}
