use async_trait::async_trait;

use crate::error::AdapterResult;
use crate::perps::pair::format_as_pair;
use crate::perps::{OpenInterestCaps, Pair};

use super::HyperliquidAdapter;
use super::types::InfoRequest;

#[async_trait]
impl OpenInterestCaps for HyperliquidAdapter {
    async fn get_perps_at_open_interest_cap(&self) -> AdapterResult<Vec<Pair>> {
        let coins: Vec<String> = self.info(&InfoRequest::PerpsAtOpenInterestCap).await?;
        Ok(coins.iter().map(|coin| format_as_pair(coin)).collect())
    }
}
