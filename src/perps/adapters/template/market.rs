use crate::error::{AdapterError, AdapterResult};
use crate::perps::pair::{extract_base_asset, format_as_pair, is_valid_pair};
use crate::perps::{FundingRate, Pair, PerpetualMetadata};

use super::VENUE;

pub(super) struct PlaceholderMarket {
    pub coin: &'static str,
    pub price: f64,
    pub funding_rate: FundingRate,
    pub max_leverage: u32,
}

pub(super) const MARKETS: [PlaceholderMarket; 5] = [
    PlaceholderMarket {
        coin: "BTC",
        price: 50_000.0,
        funding_rate: 0.0001,
        max_leverage: 100,
    },
    PlaceholderMarket {
        coin: "ETH",
        price: 3_000.0,
        funding_rate: 0.00008,
        max_leverage: 100,
    },
    PlaceholderMarket {
        coin: "SOL",
        price: 100.0,
        funding_rate: -0.00005,
        max_leverage: 50,
    },
    PlaceholderMarket {
        coin: "AVAX",
        price: 30.0,
        funding_rate: 0.00012,
        max_leverage: 50,
    },
    PlaceholderMarket {
        coin: "LINK",
        price: 15.0,
        funding_rate: 0.00003,
        max_leverage: 50,
    },
];

pub(super) fn pairs() -> Vec<Pair> {
    MARKETS.iter().map(|m| format_as_pair(m.coin)).collect()
}

/// Market behind `pair`; malformed pairs and unlisted coins are errors.
pub(super) fn lookup(pair: &str) -> AdapterResult<&'static PlaceholderMarket> {
    if !is_valid_pair(pair) {
        return Err(AdapterError::InvalidPair {
            pair: pair.to_string(),
        });
    }
    let coin = extract_base_asset(pair)?;
    MARKETS
        .iter()
        .find(|m| m.coin == coin)
        .ok_or_else(|| AdapterError::UnknownPair {
            venue: VENUE,
            pair: pair.to_string(),
        })
}

pub(super) fn metadata() -> Vec<PerpetualMetadata> {
    MARKETS
        .iter()
        .map(|m| PerpetualMetadata {
            name: m.coin.to_string(),
            sz_decimals: 8,
            max_leverage: m.max_leverage,
            only_isolated: false,
            is_delisted: false,
        })
        .collect()
}
