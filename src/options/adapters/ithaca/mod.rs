//! Ithaca options adapter. Quote-based like Zomma; listings are not exposed.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{AdapterSettings, Network};
use crate::error::{AdapterError, AdapterResult};
use crate::options::quote::{PremiumQuoter, QuoteParams, QuotedPremiums, TradeDirection};
use crate::options::{
    AssetParams, ExpiryDate, OptionsAdapter, OptionsTestParams, Premium, StrikeListParams,
    StrikePrice,
};
use crate::registry::FromSettings;

const VENUE: &str = "Ithaca";

#[derive(Debug, Clone, Default)]
pub struct IthacaConfig {
    pub network: Network,
    pub signing_key: Option<String>,
}

pub struct IthacaAdapter {
    premiums: QuotedPremiums,
}

impl IthacaAdapter {
    pub fn new(config: IthacaConfig) -> AdapterResult<Self> {
        Ok(IthacaAdapter {
            premiums: QuotedPremiums::new(VENUE, config.network, config.signing_key.as_deref())?,
        })
    }

    pub fn with_quoter(mut self, quoter: Arc<dyn PremiumQuoter>) -> Self {
        self.premiums = self.premiums.with_quoter(quoter);
        self
    }
}

impl FromSettings for IthacaAdapter {
    fn from_settings(settings: &AdapterSettings) -> AdapterResult<Self> {
        IthacaAdapter::new(IthacaConfig {
            network: settings.network,
            signing_key: settings.signing_key.clone(),
        })
    }
}

#[async_trait]
impl OptionsAdapter for IthacaAdapter {
    type ExpiryParams = AssetParams;
    type LongPremiumParams = QuoteParams;
    type ShortPremiumParams = QuoteParams;
    type StrikeParams = StrikeListParams;

    fn protocol_name(&self) -> &'static str {
        VENUE
    }

    fn test_params() -> OptionsTestParams<Self> {
        let quote = QuoteParams {
            expiry: 1_739_779_200,
            strike: 3_000.0,
            is_call: true,
        };
        OptionsTestParams {
            fetch_expiry_dates: AssetParams {
                asset: "ETH".into(),
            },
            get_long_option_premium: quote.clone(),
            get_short_option_premium: QuoteParams {
                is_call: false,
                ..quote
            },
            list_strike_prices_by_expiry: StrikeListParams {
                expiry: 1_739_779_200,
                asset: "ETH".into(),
            },
        }
    }

    async fn fetch_expiry_dates(
        &self,
        _params: &AssetParams,
    ) -> AdapterResult<Option<Vec<ExpiryDate>>> {
        Err(AdapterError::not_implemented(VENUE, "fetch_expiry_dates"))
    }

    async fn get_long_option_premium(
        &self,
        params: &QuoteParams,
    ) -> AdapterResult<Option<Premium>> {
        self.premiums
            .premium("get_long_option_premium", params, TradeDirection::Buy)
            .await
    }

    async fn get_short_option_premium(
        &self,
        params: &QuoteParams,
    ) -> AdapterResult<Option<Premium>> {
        self.premiums
            .premium("get_short_option_premium", params, TradeDirection::Sell)
            .await
    }

    async fn list_strike_prices_by_expiry(
        &self,
        _params: &StrikeListParams,
    ) -> AdapterResult<Option<Vec<StrikePrice>>> {
        Err(AdapterError::not_implemented(
            VENUE,
            "list_strike_prices_by_expiry",
        ))
    }
}
