use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use anyhow::bail;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Venue network selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            other => bail!("Invalid network '{other}'. Use 'mainnet' or 'testnet'."),
        }
    }
}

/// Settings every registered adapter is constructed from.
///
/// Credentials are supplied by the caller; adapters never read the process
/// environment themselves.
#[derive(Debug, Clone)]
pub struct AdapterSettings {
    pub network: Network,
    pub timeout: Duration,
    /// Hex private key for venues that quote against a trader address.
    pub signing_key: Option<String>,
    /// Overrides the venue's default API base URL (mock servers, proxies).
    pub base_url: Option<String>,
}

impl Default for AdapterSettings {
    fn default() -> Self {
        Self {
            network: Network::Mainnet,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            signing_key: None,
            base_url: None,
        }
    }
}

impl AdapterSettings {
    pub fn from_cli(args: &crate::cli::GlobalArgs) -> anyhow::Result<Self> {
        let network: Network = args.network.parse()?;
        if args.timeout_ms == 0 {
            bail!("--timeout-ms must be greater than zero");
        }

        Ok(AdapterSettings {
            network,
            timeout: Duration::from_millis(args.timeout_ms),
            signing_key: args.signing_key.clone().filter(|k| !k.trim().is_empty()),
            base_url: args.base_url.clone(),
        })
    }
}
