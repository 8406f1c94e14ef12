//! Zomma options adapter.
//!
//! Premiums are quoted by Zomma's SDK against the BTC-USDC market for a
//! 0.1-contract call trade. The quote call is injected with
//! [`ZommaAdapter::with_quoter`]; an adapter built from settings alone has no
//! quoter and reports its premium operations as unimplemented.

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

const VENUE: &str = "Zomma";

#[derive(Debug, Clone, Default)]
pub struct ZommaConfig {
    pub network: Network,
    /// Hex private key of the quoting account.
    pub signing_key: Option<String>,
}

pub struct ZommaAdapter {
    premiums: QuotedPremiums,
}

impl ZommaAdapter {
    pub fn new(config: ZommaConfig) -> AdapterResult<Self> {
        Ok(ZommaAdapter {
            premiums: QuotedPremiums::new(VENUE, config.network, config.signing_key.as_deref())?,
        })
    }

    pub fn with_quoter(mut self, quoter: Arc<dyn PremiumQuoter>) -> Self {
        self.premiums = self.premiums.with_quoter(quoter);
        self
    }

    pub fn network(&self) -> Network {
        self.premiums.network()
    }
}

impl FromSettings for ZommaAdapter {
    fn from_settings(settings: &AdapterSettings) -> AdapterResult<Self> {
        ZommaAdapter::new(ZommaConfig {
            network: settings.network,
            signing_key: settings.signing_key.clone(),
        })
    }
}

#[async_trait]
impl OptionsAdapter for ZommaAdapter {
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
            strike: 97_000.0,
            is_call: true,
        };
        OptionsTestParams {
            fetch_expiry_dates: AssetParams {
                asset: "BTC".into(),
            },
            get_long_option_premium: quote.clone(),
            get_short_option_premium: quote,
            list_strike_prices_by_expiry: StrikeListParams {
                expiry: 1_739_779_200,
                asset: "BTC".into(),
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

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use alloy::primitives::U256;

    use super::*;
    use crate::options::quote::{Quote, QuoteRequest};

    // Anvil's first dev account.
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[derive(Default)]
    struct RecordingQuoter {
        requests: Mutex<Vec<QuoteRequest>>,
    }

    #[async_trait]
    impl PremiumQuoter for RecordingQuoter {
        async fn quote(&self, request: &QuoteRequest) -> AdapterResult<Quote> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(Quote {
                premium: U256::from(312_500_000_000_000_000_000u128),
                fee: U256::from(1_000_000_000_000_000u128),
            })
        }
    }

    #[test]
    fn test_manifest_passes_structure_check() {
        let root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
        let problems = crate::validate::check_registered(root, "zomma");
        assert!(problems.is_empty(), "{problems:?}");
    }

    #[tokio::test]
    async fn test_long_buys_and_short_sells() {
        let quoter = Arc::new(RecordingQuoter::default());
        let adapter = ZommaAdapter::new(ZommaConfig {
            network: Network::Mainnet,
            signing_key: Some(DEV_KEY.into()),
        })
        .unwrap()
        .with_quoter(quoter.clone());
        let params = ZommaAdapter::test_params();

        let long = adapter
            .get_long_option_premium(&params.get_long_option_premium)
            .await
            .unwrap();
        let short = adapter
            .get_short_option_premium(&params.get_short_option_premium)
            .await
            .unwrap();
        assert_eq!(long, Some(312.5));
        assert_eq!(short, Some(312.5));

        let requests = quoter.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].size.is_positive());
        assert!(requests[1].size.is_negative());
        assert_eq!(requests[0].market, 0);
        assert_eq!(
            requests[0].trader.to_string().to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[tokio::test]
    async fn test_missing_key_is_a_credentials_error() {
        let adapter = ZommaAdapter::new(ZommaConfig::default())
            .unwrap()
            .with_quoter(Arc::new(RecordingQuoter::default()));
        let params = ZommaAdapter::test_params();
        let err = adapter
            .get_long_option_premium(&params.get_long_option_premium)
            .await
            .unwrap_err();
        assert!(matches!(err, AdapterError::MissingCredentials { .. }));
    }

    #[tokio::test]
    async fn test_without_quoter_is_unimplemented() {
        let adapter = ZommaAdapter::new(ZommaConfig::default()).unwrap();
        let params = ZommaAdapter::test_params();
        let err = adapter
            .get_short_option_premium(&params.get_short_option_premium)
            .await
            .unwrap_err();
        assert!(err.is_not_implemented());
    }
}
