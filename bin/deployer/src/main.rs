// Copyright 2021 Gnosis Ltd.
// SPDX-License-Identifier: Apache-2.0

use anyhow::Context;
use clap::Parser;
use deployer_core::{PrivateKey, Session};
use log::*;
use rpc::HttpRpc;
use simple_logger::SimpleLogger;
use solc::Solc;
use std::{process, sync::Arc};
use workflow::{DeployAndInvoke, Report};

use crate::config::{parse_address, Config, Opts};

mod config;

pub async fn run(opts: Opts, config: Config) -> anyhow::Result<Report> {
    let account = parse_address(&opts.account).context("--account")?;
    let destination = parse_address(&opts.destination).context("--destination")?;
    let key = PrivateKey::from_hex(&opts.private_key)?;
    let mut session = Session::new(account, key)?;

    let rpc = Arc::new(HttpRpc::with_timeout(&opts.rpc_url, config.request_timeout())?);
    info!("Connecting to {}", rpc.url());
    let compiler = Arc::new(Solc::new(config.solc()));

    let workflow = DeployAndInvoke::new(config.into(), rpc, compiler);
    Ok(workflow.run(&mut session, destination).await?)
}

/// Logs the outcome of a run and returns the process exit code.
pub fn exit_code(result: &anyhow::Result<Report>) -> i32 {
    match result {
        Ok(report) => {
            info!(
                "Token {:?} deployed, {} transferred in {:?}",
                report.contract_address, report.destination_balance, report.transfer_tx
            );
            0
        }
        Err(err) => {
            error!("{:#}", err);
            1
        }
    }
}

#[tokio::main]
async fn main() {
    let opts = Opts::parse();

    let config = match Config::load(opts.config.as_ref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            process::exit(1);
        }
    };
    let level = match config.log_level() {
        Ok(level) => level,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            process::exit(1);
        }
    };
    if let Err(err) = SimpleLogger::new().with_level(level).init() {
        eprintln!("Error: {}", err);
        process::exit(1);
    }

    info!("Starting deployer");
    let result = run(opts, config).await;
    process::exit(exit_code(&result));
}

#[cfg(test)]
mod tests {
    use super::*;
    use deployer_core::{Address, H256, U256};

    const KEY: &str = "4646464646464646464646464646464646464646464646464646464646464646";

    fn opts(account: &str) -> Opts {
        Opts::try_parse_from(&[
            "deployer",
            "--account",
            account,
            "--private-key",
            KEY,
            "--destination",
            "2222222222222222222222222222222222222222",
            // nothing listens here, failures below happen before any request
            "--rpc-url",
            "http://127.0.0.1:9",
        ])
        .unwrap()
    }

    #[test]
    fn success_exits_with_zero() {
        let report = Report {
            chain_id: 1337,
            suggested_gas_price: 10.into(),
            gas_price: 12.into(),
            native_balance: U256::zero(),
            deploy_nonce: U256::zero(),
            transfer_nonce: U256::one(),
            contract_address: Address::repeat_byte(0x33),
            deploy_tx: H256::repeat_byte(1),
            transfer_tx: H256::repeat_byte(2),
            initial_balance: 1_000_000.into(),
            destination_balance: 100.into(),
            sender_balance: 999_900.into(),
        };
        assert_eq!(exit_code(&Ok(report)), 0);
    }

    #[tokio::test]
    async fn account_mismatch_exits_with_one() {
        let result = run(
            opts("1111111111111111111111111111111111111111"),
            Config::default(),
        )
        .await;
        assert!(format!("{:#}", result.as_ref().unwrap_err()).contains("does not match"));
        assert_eq!(exit_code(&result), 1);
    }

    #[tokio::test]
    async fn missing_source_exits_with_one() {
        let config = Config {
            source: Some("does/not/exist/Token.sol".into()),
            ..Default::default()
        };
        let result = run(opts("9d8a62f656a8d1615c1294fd71e9cfb3e4855a4f"), config).await;
        assert!(format!("{:#}", result.as_ref().unwrap_err()).contains("not found"));
        assert_eq!(exit_code(&result), 1);
    }
}
