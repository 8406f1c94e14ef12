pub mod cli;
pub mod config;
pub mod conformance;
pub mod docs;
pub mod error;
pub mod http;
pub mod list_adapters;
pub mod options;
pub mod perps;
pub mod registry;
pub mod scaffold;
pub mod telemetry;
pub mod validate;

pub use config::{AdapterSettings, Network};
pub use error::{AdapterError, AdapterResult};
