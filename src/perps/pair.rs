use crate::error::{AdapterError, AdapterResult};

/// Every current venue quotes perps against USD.
pub const QUOTE_ASSET: &str = "USD";

/// "BTC" -> "BTC-USD".
pub fn format_as_pair(asset: &str) -> String {
    format!("{asset}-{QUOTE_ASSET}")
}

/// Base asset of a `BASE-QUOTE` pair. Anything without a dash is rejected.
pub fn extract_base_asset(pair: &str) -> AdapterResult<&str> {
    match pair.split_once('-') {
        Some((base, _)) if !base.is_empty() => Ok(base),
        _ => Err(AdapterError::InvalidPair {
            pair: pair.to_string(),
        }),
    }
}

/// Alphanumeric base of either case (venues list `kPEPE`), a single dash, and
/// an uppercase alphanumeric quote.
pub fn is_valid_pair(pair: &str) -> bool {
    let Some((base, quote)) = pair.split_once('-') else {
        return false;
    };
    let base_ok = !base.is_empty() && base.chars().all(|c| c.is_ascii_alphanumeric());
    let quote_ok = !quote.is_empty()
        && quote
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());
    base_ok && quote_ok
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_and_extract() {
        assert_eq!(format_as_pair("BTC"), "BTC-USD");
        assert_eq!(extract_base_asset("ETH-USD").unwrap(), "ETH");
        assert_eq!(extract_base_asset("INVALID-PAIR").unwrap(), "INVALID");
    }

    #[test]
    fn test_extract_rejects_bare_asset() {
        let err = extract_base_asset("BTC").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid pair format: BTC. Expected format: BASE-QUOTE (e.g., BTC-USD)"
        );
        assert!(extract_base_asset("-USD").is_err());
    }

    #[test]
    fn test_is_valid_pair() {
        assert!(is_valid_pair("BTC-USD"));
        assert!(is_valid_pair("1000PEPE-USD"));
        assert!(is_valid_pair("kPEPE-USD"));
        assert!(!is_valid_pair("k_PEPE-USD"));
        assert!(!is_valid_pair("btc-usd"));
        assert!(!is_valid_pair("BTC-USD-PERP"));
        assert!(!is_valid_pair("BTCUSD"));
        assert!(!is_valid_pair("BTC-"));
    }
}
