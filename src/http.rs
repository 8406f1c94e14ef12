use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{AdapterError, AdapterResult};

pub const USER_AGENT: &str = "grix-adapters/0.1";

/// Build the HTTP client a venue adapter owns for its lifetime.
pub fn build_client(venue: &'static str, timeout: Duration) -> AdapterResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|source| AdapterError::Request { venue, source })
}

/// GET `url` with URL-encoded `query` pairs and return the body as untyped
/// JSON.
///
/// Non-success statuses become [`AdapterError::Status`] carrying the
/// canonical reason phrase.
pub async fn get_json(
    client: &reqwest::Client,
    venue: &'static str,
    url: &str,
    query: &[(&str, &str)],
) -> AdapterResult<serde_json::Value> {
    tracing::debug!(venue, url, ?query, "GET");
    let resp = client
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(|source| AdapterError::Request { venue, source })?;
    read_json(venue, resp).await
}

/// POST a JSON body to `url` and return the response as untyped JSON.
pub async fn post_json<B: Serialize + ?Sized>(
    client: &reqwest::Client,
    venue: &'static str,
    url: &str,
    body: &B,
) -> AdapterResult<serde_json::Value> {
    tracing::debug!(venue, url, "POST");
    let resp = client
        .post(url)
        .json(body)
        .send()
        .await
        .map_err(|source| AdapterError::Request { venue, source })?;
    read_json(venue, resp).await
}

async fn read_json(venue: &'static str, resp: reqwest::Response) -> AdapterResult<serde_json::Value> {
    let status = resp.status();
    if !status.is_success() {
        return Err(AdapterError::Status {
            venue,
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("unknown status").to_string(),
        });
    }
    let text = resp
        .text()
        .await
        .map_err(|source| AdapterError::Request { venue, source })?;
    serde_json::from_str(&text).map_err(|_| AdapterError::Malformed {
        venue,
        payload: text,
    })
}

/// Decode an already-parsed payload into a typed response, keeping the raw
/// JSON in the error for diagnosis.
pub fn decode<T: DeserializeOwned>(venue: &'static str, value: serde_json::Value) -> AdapterResult<T> {
    T::deserialize(&value).map_err(|_| AdapterError::Malformed {
        venue,
        payload: value.to_string(),
    })
}
