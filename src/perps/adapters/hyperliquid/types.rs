use serde::{Deserialize, Serialize};

use crate::error::{AdapterError, AdapterResult};

use super::VENUE;

// ── Requests ────────────────────────────────────────────────────────

/// Body of `POST /info`, tagged by `type`.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InfoRequest<'a> {
    Meta,
    MetaAndAssetCtxs,
    #[serde(rename_all = "camelCase")]
    FundingHistory {
        coin: &'a str,
        start_time: u64,
        #[serde(skip_serializing_if = "Option::is_none")]
        end_time: Option<u64>,
    },
    PredictedFundings,
    PerpsAtOpenInterestCap,
}

// ── Responses ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct Meta {
    pub universe: Vec<UniverseAsset>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniverseAsset {
    pub name: String,
    pub sz_decimals: u32,
    pub max_leverage: u32,
    #[serde(default)]
    pub only_isolated: bool,
    #[serde(default)]
    pub is_delisted: bool,
}

/// Per-asset live context; same order as `Meta::universe`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetCtx {
    pub funding: String,
    pub mark_px: String,
    #[serde(default)]
    pub open_interest: Option<String>,
}

/// `metaAndAssetCtxs` answers with a two-element array.
pub type MetaAndAssetCtxs = (Meta, Vec<AssetCtx>);

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingHistoryEntry {
    pub coin: String,
    pub funding_rate: String,
    pub premium: String,
    pub time: u64, // ms
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictedRate {
    pub funding_rate: String,
    pub next_funding_time: u64, // ms
}

/// `[[asset, [[venue, rate | null], ..]], ..]`
pub type PredictedFundings = Vec<(String, Vec<(String, Option<PredictedRate>)>)>;

/// Hyperliquid sends decimals as strings.
pub fn parse_decimal(field: &str, value: &str) -> AdapterResult<f64> {
    value.parse::<f64>().map_err(|_| AdapterError::Malformed {
        venue: VENUE,
        payload: format!("{field}: {value:?}"),
    })
}
