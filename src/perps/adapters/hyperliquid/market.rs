use crate::error::{AdapterError, AdapterResult};
use crate::perps::pair::{extract_base_asset, format_as_pair};
use crate::perps::{Pair, PerpetualMetadata};

use super::types::{AssetCtx, InfoRequest, Meta, MetaAndAssetCtxs};
use super::{HyperliquidAdapter, VENUE};

impl HyperliquidAdapter {
    pub(super) async fn pairs(&self) -> AdapterResult<Vec<Pair>> {
        let meta: Meta = self.info(&InfoRequest::Meta).await?;
        Ok(meta
            .universe
            .iter()
            .map(|asset| format_as_pair(&asset.name))
            .collect())
    }

    pub(super) async fn metadata(&self) -> AdapterResult<Vec<PerpetualMetadata>> {
        let meta: Meta = self.info(&InfoRequest::Meta).await?;
        Ok(meta
            .universe
            .into_iter()
            .map(|asset| PerpetualMetadata {
                name: asset.name,
                sz_decimals: asset.sz_decimals,
                max_leverage: asset.max_leverage,
                only_isolated: asset.only_isolated,
                is_delisted: asset.is_delisted,
            })
            .collect())
    }

    /// Live context of the asset behind `pair`.
    pub(super) async fn asset_ctx(&self, pair: &str) -> AdapterResult<AssetCtx> {
        let coin = extract_base_asset(pair)?;
        let (meta, ctxs): MetaAndAssetCtxs = self.info(&InfoRequest::MetaAndAssetCtxs).await?;
        find_ctx(&meta, ctxs, coin).ok_or_else(|| AdapterError::UnknownPair {
            venue: VENUE,
            pair: pair.to_string(),
        })
    }
}

fn find_ctx(meta: &Meta, mut ctxs: Vec<AssetCtx>, coin: &str) -> Option<AssetCtx> {
    let index = meta.universe.iter().position(|asset| asset.name == coin)?;
    if index < ctxs.len() {
        Some(ctxs.swap_remove(index))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_ctx_is_positional() {
        let (meta, ctxs): MetaAndAssetCtxs = serde_json::from_value(serde_json::json!([
            {"universe": [
                {"name": "BTC", "szDecimals": 5, "maxLeverage": 50},
                {"name": "ETH", "szDecimals": 4, "maxLeverage": 50}
            ]},
            [
                {"funding": "0.0000125", "markPx": "97000.0"},
                {"funding": "-0.00002", "markPx": "2700.5"}
            ]
        ]))
        .unwrap();

        let eth = find_ctx(&meta, ctxs.clone(), "ETH").unwrap();
        assert_eq!(eth.mark_px, "2700.5");
        assert!(find_ctx(&meta, ctxs.clone(), "DOGE").is_none());
        // A universe longer than the context list is treated as missing.
        assert!(find_ctx(&meta, ctxs[..1].to_vec(), "ETH").is_none());
    }
}
