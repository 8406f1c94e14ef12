use serde::Deserialize;

/// One listed option from `public/get_instruments`.
#[derive(Debug, Clone, Deserialize)]
#[allow(dead_code)]
pub struct DeribitInstrument {
    pub instrument_name: String,
    /// Milliseconds since the epoch.
    pub expiration_timestamp: u64,
    pub strike: f64,
    #[serde(default)]
    pub option_type: Option<String>,
    #[serde(default)]
    pub base_currency: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// `result` of `public/get_order_book`. Levels are `[price, amount]`.
#[derive(Debug, Clone, Deserialize)]
pub struct DeribitOrderBook {
    #[serde(default)]
    pub asks: Vec<Vec<f64>>,
    #[serde(default)]
    pub bids: Vec<Vec<f64>>,
    pub underlying_price: Option<f64>,
}
