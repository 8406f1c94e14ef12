
use serde_json::json;
use wiremock::MockServer;

use grix_adapters::conformance::{self, CaseOutcome, HarnessOptions};
use grix_adapters::error::AdapterError;
use grix_adapters::perps::adapters::hyperliquid::HyperliquidAdapter;
use grix_adapters::perps::{HistoricalFundingQuery, PerpsAdapter};
use grix_adapters::registry::FromSettings;

use mock_common::*;

async fn adapter_with_board() -> (MockServer, HyperliquidAdapter) {
    let server = MockServer::start().await;
    mount_info(&server, "meta", hyperliquid_meta()).await;
    mount_info(&server, "metaAndAssetCtxs", hyperliquid_meta_and_ctxs()).await;
    let adapter = HyperliquidAdapter::from_settings(&settings_for(&server)).unwrap();
    (server, adapter)
}

#[tokio::test]
async fn test_pairs_and_metadata_from_universe() {
    let (_server, adapter) = adapter_with_board().await;
    assert_eq!(adapter.get_pairs().await.unwrap(), ["BTC-USD", "ETH-USD"]);

    let metadata = adapter
        .perpetuals_metadata()
        .unwrap()
        .get_perpetuals_metadata()
        .await
        .unwrap();
    assert_eq!(metadata.len(), 2);
    assert_eq!(metadata[1].name, "ETH");
    assert_eq!(metadata[1].max_leverage, 25);
    assert!(!metadata[0].is_delisted);
}

#[tokio::test]
async fn test_price_and_funding_match_asset_position() {
    let (_server, adapter) = adapter_with_board().await;
    assert_eq!(adapter.get_asset_price("ETH-USD").await.unwrap(), 2700.25);
    assert_eq!(adapter.get_funding_rate("ETH-USD").await.unwrap(), -0.00002);
    assert_eq!(adapter.get_asset_price("BTC-USD").await.unwrap(), 97000.5);
}

#[tokio::test]
async fn test_unknown_and_invalid_pairs() {
    let (_server, adapter) = adapter_with_board().await;
    match adapter.get_asset_price("DOGE-USD").await.unwrap_err() {
        AdapterError::UnknownPair { pair, .. } => assert_eq!(pair, "DOGE-USD"),
        other => panic!("unexpected error: {other}"),
    }
    assert!(matches!(
        adapter.get_funding_rate("BTCUSD").await,
        Err(AdapterError::InvalidPair { .. })
    ));
}

#[tokio::test]
async fn test_historical_funding_parses_decimals() {
    let server = MockServer::start().await;
    mount_info(
        &server,
        "fundingHistory",
        json!([
            {"coin": "BTC", "fundingRate": "0.0000125", "premium": "-0.0002", "time": 1_700_000_000_000u64},
            {"coin": "BTC", "fundingRate": "0.00001", "premium": "0.0001", "time": 1_700_003_600_000u64}
        ]),
    )
    .await;
    let adapter = HyperliquidAdapter::from_settings(&settings_for(&server)).unwrap();
    let history = adapter.historical_funding().unwrap();

    let query = HistoricalFundingQuery {
        pair: "BTC-USD".into(),
        start_time: 1_700_000_000_000,
        end_time: None,
    };
    let entries = history.get_historical_funding_rates(&query).await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].funding_rate, 0.0000125);
    assert_eq!(entries[0].premium, -0.0002);
    assert_eq!(entries[1].time, 1_700_003_600_000);

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(
        body,
        json!({"type": "fundingHistory", "coin": "BTC", "startTime": 1_700_000_000_000u64})
    );
}

#[tokio::test]
async fn test_inverted_window_never_reaches_venue() {
    let server = MockServer::start().await;
    let adapter = HyperliquidAdapter::from_settings(&settings_for(&server)).unwrap();
    let query = HistoricalFundingQuery {
        pair: "BTC-USD".into(),
        start_time: 2_000,
        end_time: Some(1_000),
    };
    let err = adapter
        .historical_funding()
        .unwrap()
        .get_historical_funding_rates(&query)
        .await
        .unwrap_err();
    assert!(matches!(err, AdapterError::InvalidParams(_)), "{err}");
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_predicted_funding_keeps_missing_venues() {
    let server = MockServer::start().await;
    mount_info(
        &server,
        "predictedFundings",
        json!([
            ["BTC", [
                ["BinPerp", {"fundingRate": "0.0001", "nextFundingTime": 1_733_961_600_000u64}],
                ["HlPerp", {"fundingRate": "0.0000125", "nextFundingTime": 1_733_958_000_000u64}],
                ["BybitPerp", null]
            ]]
        ]),
    )
    .await;
    let adapter = HyperliquidAdapter::from_settings(&settings_for(&server)).unwrap();
    let predicted = adapter
        .predicted_funding()
        .unwrap()
        .get_predicted_funding_rates()
        .await
        .unwrap();

    assert_eq!(predicted.len(), 1);
    assert_eq!(predicted[0].asset, "BTC");
    let venues = &predicted[0].venues;
    assert_eq!(venues.len(), 3);
    assert_eq!(venues[0].rate.as_ref().unwrap().funding_rate, 0.0001);
    assert!(venues[2].rate.is_none());
}

#[tokio::test]
async fn test_open_interest_cap_returns_pairs() {
    let server = MockServer::start().await;
    mount_info(&server, "perpsAtOpenInterestCap", json!(["BADGER", "CANTO"])).await;
    let adapter = HyperliquidAdapter::from_settings(&settings_for(&server)).unwrap();
    let capped = adapter
        .open_interest_caps()
        .unwrap()
        .get_perps_at_open_interest_cap()
        .await
        .unwrap();
    assert_eq!(capped, ["BADGER-USD", "CANTO-USD"]);
}

#[tokio::test]
async fn test_malformed_decimal_is_reported() {
    let server = MockServer::start().await;
    mount_info(
        &server,
        "metaAndAssetCtxs",
        json!([
            {"universe": [{"name": "BTC", "szDecimals": 5, "maxLeverage": 50}]},
            [{"funding": "n/a", "markPx": "97000.0"}]
        ]),
    )
    .await;
    let adapter = HyperliquidAdapter::from_settings(&settings_for(&server)).unwrap();
    let err = adapter.get_funding_rate("BTC-USD").await.unwrap_err();
    assert!(matches!(err, AdapterError::Malformed { .. }), "{err}");
}

#[tokio::test]
async fn test_mixed_case_tickers_pass_the_suite() {
    let server = MockServer::start().await;
    let board = json!([
        {"universe": [
            {"name": "BTC", "szDecimals": 5, "maxLeverage": 50},
            {"name": "kPEPE", "szDecimals": 0, "maxLeverage": 10}
        ]},
        [
            {"funding": "0.0000125", "markPx": "97000.5"},
            {"funding": "0.00003", "markPx": "0.0121"}
        ]
    ]);
    mount_info(&server, "meta", board[0].clone()).await;
    mount_info(&server, "metaAndAssetCtxs", board).await;
    mount_info(&server, "perpsAtOpenInterestCap", json!(["kPEPE"])).await;
    let adapter = HyperliquidAdapter::from_settings(&settings_for(&server)).unwrap();

    assert_eq!(adapter.get_pairs().await.unwrap(), ["BTC-USD", "kPEPE-USD"]);
    let report = conformance::run_perps_suite(
        "hyperliquid",
        &adapter,
        &HyperliquidAdapter::test_params(),
        &HarnessOptions::default(),
    )
    .await;
    for operation in ["get_pairs", "get_perps_at_open_interest_cap", "get_perpetuals_metadata"] {
        assert_eq!(
            report.case(operation).unwrap().outcome,
            CaseOutcome::Passed,
            "{report}"
        );
    }
}

#[tokio::test]
#[ignore] // Requires network access
async fn test_live_conformance() {
    let adapter = HyperliquidAdapter::from_settings(&Default::default()).unwrap();
    let params = HyperliquidAdapter::test_params();
    let report = conformance::run_perps_suite(
        "hyperliquid",
        &adapter,
        &params,
        &HarnessOptions::default(),
    )
    .await;
    println!("{report}");
    assert!(report.is_conformant());
}
