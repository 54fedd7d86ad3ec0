// Copyright 2021 Gnosis Ltd.
// SPDX-License-Identifier: Apache-2.0
use deployer_core::{account::AccountError, transaction::SignError, Address, H256, U256, U64};
use std::{fmt, io, path::PathBuf, time::Duration};
use thiserror::Error;

/// Steps of the deploy and invoke sequence, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    LoadSource,
    Connect,
    Compile,
    PriceAndNonce,
    DeployTx,
    AwaitReceipt,
    ReadBalance1,
    AssertBalance1,
    BuildTransferTx,
    SignAndSubmit,
    ReadBalance2,
    AssertBalance2,
    Done,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Source file {0:?} not found")]
    SourceNotFound(PathBuf),
    #[error("Reading source file {path:?} failed: {error}")]
    SourceRead { path: PathBuf, error: io::Error },
    #[error("Account error: {0}")]
    Account(#[from] AccountError),
    #[error("Compilation failed: {0:#}")]
    Compile(anyhow::Error),
    #[error("RPC failed in step {step}: {error:#}")]
    Rpc { step: Step, error: anyhow::Error },
    #[error("ABI error: {0}")]
    Abi(#[from] ethabi::Error),
    #[error("{0}")]
    Signing(#[from] SignError),
    #[error("Gas price {0} overflows when bumped")]
    GasPriceOverflow(U256),
    #[error("Transaction {hash:?} failed in block {block:?}")]
    TransactionFailed { hash: H256, block: Option<U64> },
    #[error("Transaction {hash:?} was not mined within {timeout:?}")]
    ReceiptTimeout { hash: H256, timeout: Duration },
    #[error("Receipt of transaction {0:?} carries no contract address")]
    MissingContractAddress(H256),
    #[error("Unexpected output of {method}: {output}")]
    UnexpectedOutput { method: String, output: String },
    #[error("Step {step}: balance of {account:?} is {observed}, expected {expected}")]
    BalanceMismatch {
        step: Step,
        account: Address,
        expected: U256,
        observed: U256,
    },
}

impl Error {
    pub fn rpc(step: Step) -> impl FnOnce(anyhow::Error) -> Error {
        move |error| Error::Rpc { step, error }
    }

    /// True for errors raised before any network request was made.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::SourceNotFound(_) | Error::SourceRead { .. } | Error::Account(_)
        )
    }
}
