use thiserror::Error;

/// Every failure an adapter operation can surface.
///
/// `Ok(None)` from an operation means "no data" (for example an empty book
/// side) and is not represented here.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("{venue}: request failed: {source}")]
    Request {
        venue: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{venue}: request failed with status {status}: {status_text}")]
    Status {
        venue: &'static str,
        status: u16,
        status_text: String,
    },

    #[error("{venue}: invalid response: {payload}")]
    Malformed {
        venue: &'static str,
        payload: String,
    },

    #[error("{venue}: unknown asset `{asset}`")]
    UnknownAsset { venue: &'static str, asset: String },

    #[error("{venue}: asset not found for pair `{pair}`")]
    UnknownPair { venue: &'static str, pair: String },

    #[error("Invalid pair format: {pair}. Expected format: BASE-QUOTE (e.g., BTC-USD)")]
    InvalidPair { pair: String },

    #[error("{venue}: `{operation}` is not implemented")]
    NotImplemented {
        venue: &'static str,
        operation: &'static str,
    },

    #[error("{venue}: `{operation}` requires a signing key")]
    MissingCredentials {
        venue: &'static str,
        operation: &'static str,
    },

    #[error("Invalid signing key: {0}")]
    SigningKey(String),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("{venue}: {message}")]
    Venue {
        venue: &'static str,
        message: String,
    },
}

impl AdapterError {
    pub fn not_implemented(venue: &'static str, operation: &'static str) -> Self {
        AdapterError::NotImplemented { venue, operation }
    }

    pub fn is_not_implemented(&self) -> bool {
        matches!(self, AdapterError::NotImplemented { .. })
    }
}

pub type AdapterResult<T> = Result<T, AdapterError>;
