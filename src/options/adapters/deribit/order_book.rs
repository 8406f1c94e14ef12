use crate::error::{AdapterError, AdapterResult};
use crate::http;
use crate::options::Premium;

use super::types::DeribitOrderBook;
use super::{VENUE, result_field};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookSide {
    /// Resting sell orders, what a buyer pays.
    Ask,
    /// Resting buy orders, what a seller receives.
    Bid,
}

pub async fn fetch_order_book(
    client: &reqwest::Client,
    base_url: &str,
    instrument_name: &str,
) -> AdapterResult<DeribitOrderBook> {
    if instrument_name.trim().is_empty() {
        return Err(AdapterError::InvalidParams(
            "instrument_name must not be empty".into(),
        ));
    }
    let url = format!("{base_url}/public/get_order_book");
    let query = [("depth", "1"), ("instrument_name", instrument_name)];
    let payload = http::get_json(client, VENUE, &url, &query).await?;
    http::decode(VENUE, result_field(payload)?)
}

/// Top-of-book price on `side`, quoted in the underlying, converted to the
/// quote currency. `None` when that side of the book is empty.
pub fn premium_from_book(book: &DeribitOrderBook, side: BookSide) -> AdapterResult<Option<Premium>> {
    let levels = match side {
        BookSide::Ask => &book.asks,
        BookSide::Bid => &book.bids,
    };
    let Some(best) = levels.first() else {
        return Ok(None);
    };
    let price = best.first().copied().ok_or_else(|| AdapterError::Malformed {
        venue: VENUE,
        payload: format!("empty price level in {side:?} side"),
    })?;
    let underlying = book.underlying_price.ok_or_else(|| AdapterError::Malformed {
        venue: VENUE,
        payload: "order book without underlying_price".into(),
    })?;
    Ok(Some(price * underlying))
}
