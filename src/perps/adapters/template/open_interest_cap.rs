use async_trait::async_trait;

use crate::error::AdapterResult;
use crate::perps::{OpenInterestCaps, Pair};

use super::TemplateAdapter;

#[async_trait]
impl OpenInterestCaps for TemplateAdapter {
    /// Pairs at their open-interest cap. The placeholder board has none.
    async fn get_perps_at_open_interest_cap(&self) -> AdapterResult<Vec<Pair>> {
        Ok(Vec::new())
    }
}
