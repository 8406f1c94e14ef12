//! Deribit options adapter.
//!
//! Premiums come from the public order book (`depth=1`), expiries and strikes
//! from the live instrument list. Deribit quotes option prices in the
//! underlying, so premiums are scaled by the book's `underlying_price`.

mod board;
mod order_book;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;

use crate::config::{AdapterSettings, DEFAULT_TIMEOUT_MS, Network};
use crate::error::{AdapterError, AdapterResult};
use crate::http;
use crate::options::{
    AssetParams, ExpiryDate, InstrumentParams, OptionsAdapter, OptionsTestParams, Premium,
    StrikeListParams, StrikePrice,
};
use crate::registry::FromSettings;

pub use order_book::{BookSide, premium_from_book};

pub(crate) const VENUE: &str = "Deribit";

const MAINNET_URL: &str = "https://www.deribit.com/api/v2";
const TESTNET_URL: &str = "https://test.deribit.com/api/v2";

#[derive(Debug, Clone)]
pub struct DeribitConfig {
    /// API root, without a trailing slash.
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for DeribitConfig {
    fn default() -> Self {
        Self {
            base_url: MAINNET_URL.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

pub struct DeribitAdapter {
    client: reqwest::Client,
    base_url: String,
}

impl DeribitAdapter {
    pub fn new(config: DeribitConfig) -> AdapterResult<Self> {
        Ok(DeribitAdapter {
            client: http::build_client(VENUE, config.timeout)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn premium(&self, instrument_name: &str, side: BookSide) -> AdapterResult<Option<Premium>> {
        let book = order_book::fetch_order_book(&self.client, &self.base_url, instrument_name).await?;
        let premium = premium_from_book(&book, side)?;
        if premium.is_none() {
            tracing::debug!(venue = VENUE, instrument_name, ?side, "no resting liquidity");
        }
        Ok(premium)
    }
}

impl FromSettings for DeribitAdapter {
    fn from_settings(settings: &AdapterSettings) -> AdapterResult<Self> {
        let base_url = settings.base_url.clone().unwrap_or_else(|| {
            match settings.network {
                Network::Mainnet => MAINNET_URL,
                Network::Testnet => TESTNET_URL,
            }
            .to_string()
        });
        DeribitAdapter::new(DeribitConfig {
            base_url,
            timeout: settings.timeout,
        })
    }
}

/// Unwrap the JSON-RPC `result` envelope every Deribit response carries.
pub(crate) fn result_field(payload: serde_json::Value) -> AdapterResult<serde_json::Value> {
    match payload.get("result") {
        Some(result) if !result.is_null() => Ok(result.clone()),
        _ => Err(AdapterError::Malformed {
            venue: VENUE,
            payload: payload.to_string(),
        }),
    }
}

#[async_trait]
impl OptionsAdapter for DeribitAdapter {
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
                asset: "BTC".into(),
            },
            get_long_option_premium: InstrumentParams {
                instrument_name: "BTC-17FEB25-97000-P".into(),
            },
            get_short_option_premium: InstrumentParams {
                instrument_name: "BTC-17FEB25-97000-P".into(),
            },
            list_strike_prices_by_expiry: StrikeListParams {
                expiry: 1_739_779_200,
                asset: "BTC".into(),
            },
        }
    }

    async fn fetch_expiry_dates(
        &self,
        params: &AssetParams,
    ) -> AdapterResult<Option<Vec<ExpiryDate>>> {
        let board = board::fetch_board(&self.client, &self.base_url, &params.asset).await?;
        Ok(Some(board::expiries(&board)))
    }

    async fn get_long_option_premium(
        &self,
        params: &InstrumentParams,
    ) -> AdapterResult<Option<Premium>> {
        self.premium(&params.instrument_name, BookSide::Ask).await
    }

    async fn get_short_option_premium(
        &self,
        params: &InstrumentParams,
    ) -> AdapterResult<Option<Premium>> {
        self.premium(&params.instrument_name, BookSide::Bid).await
    }

    async fn list_strike_prices_by_expiry(
        &self,
        params: &StrikeListParams,
    ) -> AdapterResult<Option<Vec<StrikePrice>>> {
        let board = board::fetch_board(&self.client, &self.base_url, &params.asset).await?;
        Ok(Some(board::strikes_for_expiry(&board, params.expiry)))
    }
}
