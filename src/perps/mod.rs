pub mod adapters;
pub mod pair;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::Network;
use crate::error::{AdapterError, AdapterResult};

/// `BASE-QUOTE` trading pair, e.g. "BTC-USD".
pub type Pair = String;

/// Signed funding rate as a decimal (0.0001 = 0.01%).
pub type FundingRate = f64;

// ── Data ────────────────────────────────────────────────────────────

/// Static trading parameters of one perpetual contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerpetualMetadata {
    pub name: String,
    pub sz_decimals: u32,
    pub max_leverage: u32,
    #[serde(default)]
    pub only_isolated: bool,
    #[serde(default)]
    pub is_delisted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingRateHistory {
    pub coin: String,
    pub funding_rate: FundingRate,
    pub premium: f64,
    /// ms
    pub time: u64,
}

/// Window for historical funding. Times are ms, both inclusive; a missing
/// `end_time` means "now".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalFundingQuery {
    pub pair: Pair,
    pub start_time: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<u64>,
}

impl HistoricalFundingQuery {
    /// The last `hours` hours for `pair`, open-ended.
    pub fn trailing_hours(pair: &str, hours: i64) -> Self {
        let start = chrono::Utc::now() - chrono::Duration::hours(hours);
        HistoricalFundingQuery {
            pair: pair.to_string(),
            start_time: start.timestamp_millis().max(0) as u64,
            end_time: None,
        }
    }

    pub fn validate(&self) -> AdapterResult<()> {
        match self.end_time {
            Some(end) if end < self.start_time => Err(AdapterError::InvalidParams(format!(
                "endTime ({end}) must be after startTime ({})",
                self.start_time
            ))),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueFundingRate {
    pub funding_rate: FundingRate,
    /// ms
    pub next_funding_time: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenuePrediction {
    /// Venue label as reported, e.g. "HlPerp", "BinPerp".
    pub name: String,
    pub rate: Option<VenueFundingRate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetPredictedFundingRates {
    pub asset: String,
    pub venues: Vec<VenuePrediction>,
}

// ── Operations ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PerpsOperation {
    GetPairs,
    GetAssetPrice,
    GetFundingRate,
    GetPerpetualsMetadata,
    GetHistoricalFundingRates,
    GetPredictedFundingRates,
    GetPerpsAtOpenInterestCap,
}

impl PerpsOperation {
    pub const REQUIRED: [PerpsOperation; 3] = [
        PerpsOperation::GetPairs,
        PerpsOperation::GetAssetPrice,
        PerpsOperation::GetFundingRate,
    ];

    pub const EXTENSIONS: [PerpsOperation; 4] = [
        PerpsOperation::GetPerpetualsMetadata,
        PerpsOperation::GetHistoricalFundingRates,
        PerpsOperation::GetPredictedFundingRates,
        PerpsOperation::GetPerpsAtOpenInterestCap,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PerpsOperation::GetPairs => "get_pairs",
            PerpsOperation::GetAssetPrice => "get_asset_price",
            PerpsOperation::GetFundingRate => "get_funding_rate",
            PerpsOperation::GetPerpetualsMetadata => "get_perpetuals_metadata",
            PerpsOperation::GetHistoricalFundingRates => "get_historical_funding_rates",
            PerpsOperation::GetPredictedFundingRates => "get_predicted_funding_rates",
            PerpsOperation::GetPerpsAtOpenInterestCap => "get_perps_at_open_interest_cap",
        }
    }

    /// Operations whose test parameters the validator requires.
    pub fn takes_params(&self) -> bool {
        matches!(
            self,
            PerpsOperation::GetAssetPrice
                | PerpsOperation::GetFundingRate
                | PerpsOperation::GetHistoricalFundingRates
        )
    }
}

// ── Adapter traits ──────────────────────────────────────────────────

/// Perpetual futures market-data adapter.
///
/// The three required operations are checked at compile time. Extensions are
/// exposed through accessors returning `None` by default; an adapter opts in
/// by returning `Some(self)` and implementing the matching trait.
#[async_trait]
pub trait PerpsAdapter: Send + Sync {
    /// Every tradable pair, as `BASE-QUOTE`.
    async fn get_pairs(&self) -> AdapterResult<Vec<Pair>>;

    async fn get_asset_price(&self, pair: &str) -> AdapterResult<f64>;

    async fn get_funding_rate(&self, pair: &str) -> AdapterResult<FundingRate>;

    fn network(&self) -> Option<Network> {
        None
    }

    fn protocol_name(&self) -> Option<&'static str> {
        None
    }

    fn perpetuals_metadata(&self) -> Option<&dyn PerpetualsMetadataSource> {
        None
    }

    fn historical_funding(&self) -> Option<&dyn HistoricalFundingRates> {
        None
    }

    fn predicted_funding(&self) -> Option<&dyn PredictedFundingRates> {
        None
    }

    fn open_interest_caps(&self) -> Option<&dyn OpenInterestCaps> {
        None
    }

    fn test_params() -> PerpsTestParams
    where
        Self: Sized;
}

#[async_trait]
pub trait PerpetualsMetadataSource: Send + Sync {
    async fn get_perpetuals_metadata(&self) -> AdapterResult<Vec<PerpetualMetadata>>;
}

#[async_trait]
pub trait HistoricalFundingRates: Send + Sync {
    async fn get_historical_funding_rates(
        &self,
        query: &HistoricalFundingQuery,
    ) -> AdapterResult<Vec<FundingRateHistory>>;
}

#[async_trait]
pub trait PredictedFundingRates: Send + Sync {
    async fn get_predicted_funding_rates(&self) -> AdapterResult<Vec<AssetPredictedFundingRates>>;
}

#[async_trait]
pub trait OpenInterestCaps: Send + Sync {
    /// Pairs whose open interest has reached the venue cap.
    async fn get_perps_at_open_interest_cap(&self) -> AdapterResult<Vec<Pair>>;
}

// ── Test parameters ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerpsTestParams {
    pub get_asset_price: Pair,
    pub get_funding_rate: Pair,
    pub get_historical_funding_rates: HistoricalFundingQuery,
}

impl PerpsTestParams {
    /// Same pair for every operation, with a trailing 24h funding window.
    pub fn for_pair(pair: &str) -> Self {
        PerpsTestParams {
            get_asset_price: pair.to_string(),
            get_funding_rate: pair.to_string(),
            get_historical_funding_rates: HistoricalFundingQuery::trailing_hours(pair, 24),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        map.insert(
            PerpsOperation::GetAssetPrice.as_str().to_string(),
            serde_json::json!({ "pair": self.get_asset_price }),
        );
        map.insert(
            PerpsOperation::GetFundingRate.as_str().to_string(),
            serde_json::json!({ "pair": self.get_funding_rate }),
        );
        map.insert(
            PerpsOperation::GetHistoricalFundingRates.as_str().to_string(),
            serde_json::to_value(&self.get_historical_funding_rates)
                .unwrap_or(serde_json::Value::Null),
        );
        serde_json::Value::Object(map)
    }
}
