use std::collections::HashMap;

use serde::Deserialize;

/// Response of `GET /market/all`. Only the fields the adapter reads.
#[derive(Debug, Deserialize)]
pub struct MobyBoardData {
    pub data: MobyMarketData,
}

#[derive(Debug, Deserialize)]
pub struct MobyMarketData {
    /// Keyed by asset symbol ("BTC", "ETH").
    pub market: HashMap<String, MobyAssetMarket>,
}

#[derive(Debug, Deserialize)]
pub struct MobyAssetMarket {
    /// Unix seconds.
    pub expiries: Vec<u64>,
}
