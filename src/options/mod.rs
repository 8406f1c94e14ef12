pub mod adapters;
pub mod quote;

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AdapterResult;

/// Unix timestamp in seconds at which an options contract expires.
pub type ExpiryDate = u64;

/// Strike in the underlying's quote currency.
pub type StrikePrice = f64;

/// Price paid (long) or received (short) for an option position.
pub type Premium = f64;

// ── Operations ──────────────────────────────────────────────────────

/// The four operations every options adapter exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionsOperation {
    FetchExpiryDates,
    GetLongOptionPremium,
    GetShortOptionPremium,
    ListStrikePricesByExpiry,
}

impl OptionsOperation {
    pub const ALL: [OptionsOperation; 4] = [
        OptionsOperation::FetchExpiryDates,
        OptionsOperation::GetLongOptionPremium,
        OptionsOperation::GetShortOptionPremium,
        OptionsOperation::ListStrikePricesByExpiry,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OptionsOperation::FetchExpiryDates => "fetch_expiry_dates",
            OptionsOperation::GetLongOptionPremium => "get_long_option_premium",
            OptionsOperation::GetShortOptionPremium => "get_short_option_premium",
            OptionsOperation::ListStrikePricesByExpiry => "list_strike_prices_by_expiry",
        }
    }
}

// ── Adapter trait ───────────────────────────────────────────────────

/// Options market-data adapter.
///
/// Every operation takes a single venue-specific parameter record. `Ok(None)`
/// means the venue answered but has no data (e.g. an empty book side);
/// `Err` means the call failed or the venue returned something unusable.
#[async_trait]
pub trait OptionsAdapter: Send + Sync {
    type ExpiryParams: Serialize + Debug + Send + Sync;
    type LongPremiumParams: Serialize + Debug + Send + Sync;
    type ShortPremiumParams: Serialize + Debug + Send + Sync;
    type StrikeParams: Serialize + Debug + Send + Sync;

    /// Display name of the venue, e.g. "Deribit".
    fn protocol_name(&self) -> &'static str;

    /// Known-good arguments for each operation, used by the conformance
    /// harness and the structure validator.
    fn test_params() -> OptionsTestParams<Self>
    where
        Self: Sized;

    async fn fetch_expiry_dates(
        &self,
        params: &Self::ExpiryParams,
    ) -> AdapterResult<Option<Vec<ExpiryDate>>>;

    async fn get_long_option_premium(
        &self,
        params: &Self::LongPremiumParams,
    ) -> AdapterResult<Option<Premium>>;

    async fn get_short_option_premium(
        &self,
        params: &Self::ShortPremiumParams,
    ) -> AdapterResult<Option<Premium>>;

    async fn list_strike_prices_by_expiry(
        &self,
        params: &Self::StrikeParams,
    ) -> AdapterResult<Option<Vec<StrikePrice>>>;
}

/// One parameter record per operation.
pub struct OptionsTestParams<A: OptionsAdapter + ?Sized> {
    pub fetch_expiry_dates: A::ExpiryParams,
    pub get_long_option_premium: A::LongPremiumParams,
    pub get_short_option_premium: A::ShortPremiumParams,
    pub list_strike_prices_by_expiry: A::StrikeParams,
}

impl<A: OptionsAdapter + ?Sized> OptionsTestParams<A> {
    /// Render as `{ operation name: params }` for manifests and reports.
    pub fn to_json(&self) -> serde_json::Value {
        let entries = [
            (
                OptionsOperation::FetchExpiryDates,
                serde_json::to_value(&self.fetch_expiry_dates),
            ),
            (
                OptionsOperation::GetLongOptionPremium,
                serde_json::to_value(&self.get_long_option_premium),
            ),
            (
                OptionsOperation::GetShortOptionPremium,
                serde_json::to_value(&self.get_short_option_premium),
            ),
            (
                OptionsOperation::ListStrikePricesByExpiry,
                serde_json::to_value(&self.list_strike_prices_by_expiry),
            ),
        ];

        let mut map = serde_json::Map::new();
        for (op, value) in entries {
            map.insert(
                op.as_str().to_string(),
                value.unwrap_or(serde_json::Value::Null),
            );
        }
        serde_json::Value::Object(map)
    }
}

// ── Shared parameter records ────────────────────────────────────────

/// Underlying asset selector used by most venues.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssetParams {
    pub asset: String,
}

/// Identifies a single listed option by the venue's instrument name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstrumentParams {
    pub instrument_name: String,
}

/// Asset plus expiry (Unix seconds) for strike listings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StrikeListParams {
    pub expiry: ExpiryDate,
    pub asset: String,
}
