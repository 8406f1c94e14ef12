//! Premium quoting shared by the SDK-backed venues (Zomma, Ithaca).
//!
//! Those venues price an option by asking their on-chain quoter for a trade of
//! a fixed size: positive size buys (long), negative size sells (short). The
//! quote call itself is the [`PremiumQuoter`] trait, supplied by the caller.

use std::sync::Arc;

use alloy::primitives::utils::{format_ether, parse_ether};
use alloy::primitives::{Address, I256, U256};
use alloy::signers::local::PrivateKeySigner;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::Network;
use crate::error::{AdapterError, AdapterResult};

use super::{ExpiryDate, Premium, StrikePrice};

/// Contracts quoted per request, in whole units (18-decimal on the wire).
pub const QUOTE_SIZE: &str = "0.1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeDirection {
    Buy,
    Sell,
}

/// Parameters of the premium operations on quote-based venues.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuoteParams {
    pub expiry: ExpiryDate,
    pub strike: StrikePrice,
    #[serde(default = "default_is_call")]
    pub is_call: bool,
}

fn default_is_call() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRequest {
    pub trader: Address,
    pub network: Network,
    /// Index into the venue's market list; 0 is BTC-USDC.
    pub market: usize,
    pub expiry: ExpiryDate,
    pub strike: StrikePrice,
    pub is_call: bool,
    /// Signed 18-decimal size.
    pub size: I256,
}

/// 18-decimal premium and fee as returned by the venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub premium: U256,
    pub fee: U256,
}

#[async_trait]
pub trait PremiumQuoter: Send + Sync {
    async fn quote(&self, request: &QuoteRequest) -> AdapterResult<Quote>;
}

/// Signed 18-decimal trade size for `direction`.
pub fn signed_size(direction: TradeDirection) -> AdapterResult<I256> {
    let unsigned = parse_ether(QUOTE_SIZE)
        .map_err(|e| AdapterError::InvalidParams(format!("quote size: {e}")))?;
    let size = I256::try_from(unsigned)
        .map_err(|e| AdapterError::InvalidParams(format!("quote size: {e}")))?;
    Ok(match direction {
        TradeDirection::Buy => size,
        TradeDirection::Sell => -size,
    })
}

/// Convert an 18-decimal amount to a float.
pub fn from_wei(venue: &'static str, amount: U256) -> AdapterResult<f64> {
    let formatted = format_ether(amount);
    formatted.parse::<f64>().map_err(|_| AdapterError::Malformed {
        venue,
        payload: formatted,
    })
}

/// Signer, network and quoter of one quote-based venue.
pub struct QuotedPremiums {
    venue: &'static str,
    network: Network,
    signer: Option<PrivateKeySigner>,
    quoter: Option<Arc<dyn PremiumQuoter>>,
}

impl QuotedPremiums {
    pub fn new(
        venue: &'static str,
        network: Network,
        signing_key: Option<&str>,
    ) -> AdapterResult<Self> {
        let signer = signing_key
            .map(|key| {
                key.trim()
                    .parse::<PrivateKeySigner>()
                    .map_err(|e| AdapterError::SigningKey(e.to_string()))
            })
            .transpose()?;
        Ok(QuotedPremiums {
            venue,
            network,
            signer,
            quoter: None,
        })
    }

    pub fn with_quoter(mut self, quoter: Arc<dyn PremiumQuoter>) -> Self {
        self.quoter = Some(quoter);
        self
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn trader(&self) -> Option<Address> {
        self.signer.as_ref().map(|s| s.address())
    }

    pub async fn premium(
        &self,
        operation: &'static str,
        params: &QuoteParams,
        direction: TradeDirection,
    ) -> AdapterResult<Option<Premium>> {
        let Some(quoter) = &self.quoter else {
            return Err(AdapterError::not_implemented(self.venue, operation));
        };
        let trader = self.trader().ok_or(AdapterError::MissingCredentials {
            venue: self.venue,
            operation,
        })?;
        if !(params.strike.is_finite() && params.strike > 0.0) {
            return Err(AdapterError::InvalidParams(format!(
                "strike must be positive, got {}",
                params.strike
            )));
        }

        let request = QuoteRequest {
            trader,
            network: self.network,
            market: 0,
            expiry: params.expiry,
            strike: params.strike,
            is_call: params.is_call,
            size: signed_size(direction)?,
        };
        let quote = quoter.quote(&request).await?;

        let premium = from_wei(self.venue, quote.premium)?;
        tracing::debug!(
            venue = self.venue,
            operation,
            premium,
            fee = from_wei(self.venue, quote.fee)?,
            "quoted"
        );
        Ok(Some(premium))
    }
}
