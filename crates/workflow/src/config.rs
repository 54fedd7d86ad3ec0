// Copyright 2021 Gnosis Ltd.
// SPDX-License-Identifier: Apache-2.0

use deployer_core::U256;
use std::{path::PathBuf, time::Duration};

/// Solidity source, relative to the working directory.
pub const DEFAULT_SOURCE: &str = "contracts/Token.sol";
pub const DEFAULT_CONTRACT: &str = "Token";

/// Gas limit of both transactions. It is never estimated.
pub const GAS_LIMIT: u64 = 200_000;

/// Suggested gas price is inflated by 20%, rounded up.
pub const GAS_PRICE_BUMP_PERCENT: u64 = 120;

/// Allocation the token constructor credits to the deployer.
pub const EXPECTED_INITIAL_BALANCE: u64 = 1_000_000;
pub const TRANSFER_AMOUNT: u64 = 100;
/// Destination balance after the transfer, destination starts empty.
pub const EXPECTED_FINAL_BALANCE: u64 = 100;

pub const BALANCE_METHOD: &str = "balanceOf";
pub const TRANSFER_METHOD: &str = "transfer";

pub const RECEIPT_TIMEOUT: Duration = Duration::from_secs(120);
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);
/// Receipt queries are never sent closer together than this.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub source: PathBuf,
    pub contract: String,
    pub gas_limit: U256,
    pub gas_price_bump_percent: u64,
    pub receipt_timeout: Duration,
    pub poll_interval: Duration,
    pub expected_initial_balance: U256,
    pub transfer_amount: U256,
    pub expected_final_balance: U256,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            source: PathBuf::from(DEFAULT_SOURCE),
            contract: DEFAULT_CONTRACT.to_owned(),
            gas_limit: GAS_LIMIT.into(),
            gas_price_bump_percent: GAS_PRICE_BUMP_PERCENT,
            receipt_timeout: RECEIPT_TIMEOUT,
            poll_interval: POLL_INTERVAL,
            expected_initial_balance: EXPECTED_INITIAL_BALANCE.into(),
            transfer_amount: TRANSFER_AMOUNT.into(),
            expected_final_balance: EXPECTED_FINAL_BALANCE.into(),
        }
    }
}
