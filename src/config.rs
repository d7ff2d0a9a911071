//! Configuration is read from `DATASTREAMS_*` environment variables. A `.env` file in the working
//! directory is loaded first by the binary, real environment variables win over it.
use eyre::{Result, WrapErr};

use crate::credentials::Credentials;
use crate::feed_id::FeedId;

pub const API_KEY: &str = "DATASTREAMS_API_KEY";
pub const API_SECRET: &str = "DATASTREAMS_API_SECRET";
pub const REST_URL: &str = "DATASTREAMS_REST_URL";
pub const WS_URL: &str = "DATASTREAMS_WS_URL";
pub const FEED_ID: &str = "DATASTREAMS_FEED_ID";
pub const FEED_NAME: &str = "DATASTREAMS_FEED_NAME";

#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub rest_url: String,
    pub ws_url: String,
    pub feed_id: FeedId,
    pub feed_name: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Config> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.is_empty());
        let require = |key: &str| {
            lookup(key).ok_or_else(|| eyre::eyre!("Missing required environment variable: {}", key))
        };

        let credentials = Credentials::new(require(API_KEY)?, require(API_SECRET)?);
        let rest_url = require(REST_URL)?;
        let ws_url = require(WS_URL)?;
        let feed_id = require(FEED_ID)?
            .parse::<FeedId>()
            .wrap_err_with(|| format!("Invalid {}", FEED_ID))?;
        let feed_name = lookup(FEED_NAME);

        Ok(Config {
            credentials,
            rest_url: rest_url.trim_end_matches('/').to_string(),
            ws_url: ws_url.trim_end_matches('/').to_string(),
            feed_id,
            feed_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    const REQUIRED: [&str; 5] = [API_KEY, API_SECRET, REST_URL, WS_URL, FEED_ID];

    fn complete_env() -> HashMap<&'static str, String> {
        HashMap::from([
            (API_KEY, "key".to_string()),
            (API_SECRET, "secret".to_string()),
            (REST_URL, "https://api.testnet-dataengine.chain.link/".to_string()),
            (WS_URL, "wss://ws.testnet-dataengine.chain.link".to_string()),
            (
                FEED_ID,
                "0x000359843a543ee2fe414dc14c7e7920ef10f4372990b79d6361cdc0dd1ba782".to_string(),
            ),
        ])
    }

    fn load(env: &HashMap<&'static str, String>) -> Result<Config> {
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn loads_complete_config() {
        let config = load(&complete_env()).unwrap();

        assert_eq!(config.rest_url, "https://api.testnet-dataengine.chain.link");
        assert_eq!(config.ws_url, "wss://ws.testnet-dataengine.chain.link");
        assert_eq!(config.feed_id.schema_version(), 3);
        assert_eq!(config.feed_name, None);
        assert_eq!(config.credentials.api_key(), "key");
        assert_eq!(config.credentials.api_secret(), "secret");
    }

    #[test]
    fn missing_key_is_named_in_error() {
        for key in REQUIRED {
            let mut env = complete_env();
            env.remove(key);

            let err = load(&env).unwrap_err();

            assert_eq!(
                err.to_string(),
                format!("Missing required environment variable: {}", key)
            );
        }
    }

    #[test]
    fn empty_value_counts_as_missing() {
        let mut env = complete_env();
        env.insert(WS_URL, String::new());

        let err = load(&env).unwrap_err();

        assert!(err.to_string().contains(WS_URL));
    }

    #[test]
    fn reads_optional_feed_name() {
        let mut env = complete_env();
        env.insert(FEED_NAME, "ETH/USD".to_string());

        let config = load(&env).unwrap();

        assert_eq!(config.feed_name.as_deref(), Some("ETH/USD"));
    }

    #[test]
    fn rejects_malformed_feed_id() {
        let mut env = complete_env();
        env.insert(FEED_ID, "0x1234".to_string());

        let err = load(&env).unwrap_err();

        assert!(err.to_string().contains(FEED_ID));
    }

    #[test]
    fn debug_output_hides_secret() {
        let config = load(&complete_env()).unwrap();
        assert!(!format!("{:?}", config).contains("\"secret\""));
    }
}
