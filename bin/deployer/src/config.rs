// Copyright 2021 Gnosis Ltd.
// SPDX-License-Identifier: Apache-2.0

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use deployer_core::Address;
use log::LevelFilter;
use serde::Deserialize;
use std::{path::PathBuf, str::FromStr, time::Duration};
use workflow::Config as WorkflowConfig;

pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

/// The private key is taken from the command line and never printed, so
/// `Opts` is not `Debug`.
#[derive(Parser, Clone)]
#[clap(version = "1.0", author = "Gnosis Devs")]
pub struct Opts {
    /// Sender address, must belong to the private key
    #[clap(long)]
    pub account: String,
    /// Hex encoded secp256k1 secret of the sender
    #[clap(long)]
    pub private_key: String,
    /// Recipient of the token transfer
    #[clap(long)]
    pub destination: String,
    /// JSON-RPC endpoint of the node
    #[clap(long, default_value = DEFAULT_RPC_URL)]
    pub rpc_url: String,
    /// Optional TOML config file
    #[clap(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub source: Option<PathBuf>,
    pub contract: Option<String>,
    pub gas_limit: Option<u64>,
    pub gas_price_bump_percent: Option<u64>,
    pub receipt_timeout_secs: Option<u64>,
    pub poll_interval_ms: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub expected_initial_balance: Option<u64>,
    pub transfer_amount: Option<u64>,
    pub expected_final_balance: Option<u64>,
    /// Path of the solc binary
    pub solc: Option<PathBuf>,
    /// Log level, one of `error`, `warn`, `info`, `debug` or `trace`
    pub log: Option<String>,
}

impl Config {
    /// Without a file every value takes its default.
    pub fn load(path: Option<&PathBuf>) -> Result<Config> {
        let path = match path {
            Some(path) => path,
            None => return Ok(Config::default()),
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("parsing config file {:?}", path))
    }

    pub fn log_level(&self) -> Result<LevelFilter> {
        match &self.log {
            Some(level) => {
                LevelFilter::from_str(level).map_err(|_| anyhow!("invalid log level {:?}", level))
            }
            None => Ok(LevelFilter::Info),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(rpc::DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn solc(&self) -> PathBuf {
        self.solc
            .clone()
            .unwrap_or_else(|| PathBuf::from(solc::DEFAULT_SOLC))
    }
}

impl Into<WorkflowConfig> for Config {
    fn into(self) -> WorkflowConfig {
        let default = WorkflowConfig::default();
        WorkflowConfig {
            source: self.source.unwrap_or(default.source),
            contract: self.contract.unwrap_or(default.contract),
            gas_limit: self.gas_limit.map(Into::into).unwrap_or(default.gas_limit),
            gas_price_bump_percent: self
                .gas_price_bump_percent
                .unwrap_or(default.gas_price_bump_percent),
            receipt_timeout: self
                .receipt_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(default.receipt_timeout),
            poll_interval: self
                .poll_interval_ms
                .map(Duration::from_millis)
                .unwrap_or(default.poll_interval),
            expected_initial_balance: self
                .expected_initial_balance
                .map(Into::into)
                .unwrap_or(default.expected_initial_balance),
            transfer_amount: self
                .transfer_amount
                .map(Into::into)
                .unwrap_or(default.transfer_amount),
            expected_final_balance: self
                .expected_final_balance
                .map(Into::into)
                .unwrap_or(default.expected_final_balance),
        }
    }
}

/// Accepts addresses with or without `0x` prefix.
pub fn parse_address(input: &str) -> Result<Address> {
    let stripped = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input);
    Address::from_str(stripped).map_err(|_| anyhow!("invalid address {:?}", input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use deployer_core::U256;

    #[test]
    fn defaults_match_workflow() {
        let config: WorkflowConfig = Config::default().into();
        assert_eq!(config, WorkflowConfig::default());
        assert_eq!(config.gas_limit, U256::from(200_000));
        assert_eq!(config.gas_price_bump_percent, 120);
        assert_eq!(config.source, PathBuf::from("contracts/Token.sol"));
        assert_eq!(Config::default().log_level().unwrap(), LevelFilter::Info);
        assert_eq!(Config::default().request_timeout(), Duration::from_secs(30));
        assert_eq!(Config::default().solc(), PathBuf::from("solc"));
    }

    #[test]
    fn toml_overrides() {
        let config: Config = toml::from_str(
            r#"
            source = "other/Coin.sol"
            contract = "Coin"
            gas_limit = 300000
            receipt_timeout_secs = 10
            poll_interval_ms = 50
            transfer_amount = 7
            expected_final_balance = 7
            solc = "/opt/solc-0.8"
            log = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.log_level().unwrap(), LevelFilter::Debug);
        assert_eq!(config.solc(), PathBuf::from("/opt/solc-0.8"));

        let workflow: WorkflowConfig = config.into();
        assert_eq!(workflow.source, PathBuf::from("other/Coin.sol"));
        assert_eq!(workflow.contract, "Coin");
        assert_eq!(workflow.gas_limit, U256::from(300_000));
        assert_eq!(workflow.receipt_timeout, Duration::from_secs(10));
        assert_eq!(workflow.poll_interval, Duration::from_millis(50));
        assert_eq!(workflow.transfer_amount, U256::from(7));
        assert_eq!(workflow.expected_final_balance, U256::from(7));
        assert_eq!(workflow.expected_initial_balance, U256::from(1_000_000));
    }

    #[test]
    fn rejects_unknown_keys_and_levels() {
        assert!(toml::from_str::<Config>("gas = 1").is_err());
        let config = Config {
            log: Some("loud".to_owned()),
            ..Default::default()
        };
        assert!(config.log_level().is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(Config::load(Some(&PathBuf::from("/does/not/exist.toml"))).is_err());
        assert_eq!(Config::load(None).unwrap(), Config::default());
    }

    #[test]
    fn parses_command_line() {
        let opts = Opts::try_parse_from(&[
            "deployer",
            "--account",
            "0x9d8a62f656a8d1615c1294fd71e9cfb3e4855a4f",
            "--private-key",
            "4646464646464646464646464646464646464646464646464646464646464646",
            "--destination",
            "2222222222222222222222222222222222222222",
        ])
        .unwrap();
        assert_eq!(opts.rpc_url, DEFAULT_RPC_URL);
        assert!(opts.config.is_none());

        // destination is required
        assert!(Opts::try_parse_from(&[
            "deployer",
            "--account",
            "0x9d8a62f656a8d1615c1294fd71e9cfb3e4855a4f",
            "--private-key",
            "46",
        ])
        .is_err());
    }

    #[test]
    fn address_prefix_is_optional() {
        let expected = Address::repeat_byte(0x22);
        assert_eq!(
            parse_address("0x2222222222222222222222222222222222222222").unwrap(),
            expected
        );
        assert_eq!(
            parse_address("2222222222222222222222222222222222222222").unwrap(),
            expected
        );
        assert!(parse_address("0x22").is_err());
        assert!(parse_address("not an address").is_err());
    }
}
