use std::{collections::BTreeMap, env};

use thiserror::Error;
use url::Url;

/// solc version the contracts are compiled with
pub const SOLIDITY_VERSION: &str = "0.8.10";

pub const RINKEBY_NETWORK: &str = "rinkeby";
pub const RINKEBY_CHAIN_ID: u64 = 4;

pub const LOCALHOST_NETWORK: &str = "localhost";
pub const LOCALHOST_CHAIN_ID: u64 = 31337;
pub const LOCALHOST_RPC_URL: &str = "http://127.0.0.1:8545";

const RINKEBY_URL_ENV_VAR: &str = "RINKEBY_URL";
const PRIVATE_KEY_ENV_VAR: &str = "PRIVATE_KEY";

/// Account used when no private key is configured. Signing with it fails.
pub const PLACEHOLDER_ACCOUNT: &str = "";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("unknown network `{name}`, configured networks: {known}")]
    UnknownNetwork { name: String, known: String },
    #[error("no RPC url configured for network `{0}`")]
    MissingRpcUrl(String),
    #[error("invalid RPC url for network `{network}`: {source}")]
    InvalidRpcUrl {
        network: String,
        source: url::ParseError,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct NetworkConfig {
    pub name: String,
    pub chain_id: u64,
    pub url: Option<String>,
    pub accounts: Vec<String>,
}

impl NetworkConfig {
    pub fn rpc_url(&self) -> Result<Url, ConfigError> {
        let url = self
            .url
            .as_deref()
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ConfigError::MissingRpcUrl(self.name.clone()))?;

        Url::parse(url).map_err(|source| ConfigError::InvalidRpcUrl {
            network: self.name.clone(),
            source,
        })
    }

    /// first configured account, which signs the deployment
    pub fn signing_key(&self) -> &str {
        self.accounts
            .first()
            .map(String::as_str)
            .unwrap_or(PLACEHOLDER_ACCOUNT)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HardhatConfig {
    pub solidity: String,
    pub networks: BTreeMap<String, NetworkConfig>,
}

impl HardhatConfig {
    /// load `.env` (if any) and read the network settings from the environment
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        Self::from_vars(
            env::var(RINKEBY_URL_ENV_VAR).ok(),
            env::var(PRIVATE_KEY_ENV_VAR).ok(),
        )
    }

    pub fn from_vars(rinkeby_url: Option<String>, private_key: Option<String>) -> Self {
        let accounts = resolve_accounts(private_key.as_deref());

        let networks = [
            NetworkConfig {
                name: RINKEBY_NETWORK.to_owned(),
                chain_id: RINKEBY_CHAIN_ID,
                url: rinkeby_url,
                accounts: accounts.clone(),
            },
            // unlike hardhat this doesn't fall back to the node's unlocked
            // accounts, a local deploy needs PRIVATE_KEY as well
            NetworkConfig {
                name: LOCALHOST_NETWORK.to_owned(),
                chain_id: LOCALHOST_CHAIN_ID,
                url: Some(LOCALHOST_RPC_URL.to_owned()),
                accounts,
            },
        ]
        .into_iter()
        .map(|network| (network.name.clone(), network))
        .collect();

        Self {
            solidity: SOLIDITY_VERSION.to_owned(),
            networks,
        }
    }

    pub fn network(&self, name: &str) -> Result<&NetworkConfig, ConfigError> {
        self.networks
            .get(name)
            .ok_or_else(|| ConfigError::UnknownNetwork {
                name: name.to_owned(),
                known: self
                    .networks
                    .keys()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

/// `[private_key]` when a key is set, else the single placeholder account
pub fn resolve_accounts(private_key: Option<&str>) -> Vec<String> {
    match private_key {
        Some(key) if !key.is_empty() => vec![key.to_owned()],
        _ => vec![PLACEHOLDER_ACCOUNT.to_owned()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_accounts_use_private_key_when_set() {
        assert_eq!(resolve_accounts(Some(KEY)), vec![KEY.to_owned()]);
    }

    #[test]
    fn test_accounts_fall_back_to_placeholder() {
        assert_eq!(resolve_accounts(None), vec![String::new()]);
        assert_eq!(resolve_accounts(Some("")), vec![String::new()]);
    }

    #[test]
    fn test_rinkeby_network() {
        let config = HardhatConfig::from_vars(
            Some("https://rinkeby.example.org/v3/key".to_owned()),
            Some(KEY.to_owned()),
        );

        assert_eq!(config.solidity, "0.8.10");

        let rinkeby = config.network(RINKEBY_NETWORK).unwrap();
        assert_eq!(rinkeby.chain_id, 4);
        assert_eq!(rinkeby.accounts, vec![KEY.to_owned()]);
        assert_eq!(rinkeby.signing_key(), KEY);
        assert_eq!(
            rinkeby.rpc_url().unwrap().as_str(),
            "https://rinkeby.example.org/v3/key"
        );
    }

    #[test]
    fn test_unset_environment() {
        let config = HardhatConfig::from_vars(None, None);
        let rinkeby = config.network(RINKEBY_NETWORK).unwrap();

        assert_eq!(rinkeby.accounts, vec![PLACEHOLDER_ACCOUNT.to_owned()]);
        assert_eq!(rinkeby.signing_key(), "");
        assert_eq!(
            rinkeby.rpc_url(),
            Err(ConfigError::MissingRpcUrl("rinkeby".to_owned()))
        );

        // localhost has a default url, but signs with the same placeholder
        let localhost = config.network(LOCALHOST_NETWORK).unwrap();
        assert_eq!(localhost.chain_id, 31337);
        assert!(localhost.rpc_url().is_ok());
        assert_eq!(localhost.signing_key(), PLACEHOLDER_ACCOUNT);
    }

    #[test]
    fn test_invalid_rpc_url() {
        let config = HardhatConfig::from_vars(Some("not a url".to_owned()), None);
        let err = config.network(RINKEBY_NETWORK).unwrap().rpc_url();
        assert!(matches!(err, Err(ConfigError::InvalidRpcUrl { .. })));
    }

    #[test]
    fn test_unknown_network() {
        let config = HardhatConfig::from_vars(None, None);
        let err = config.network("mainnet").unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown network `mainnet`, configured networks: localhost, rinkeby"
        );
    }
}
