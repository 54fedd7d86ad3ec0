// Copyright 2021 Gnosis Ltd.
// SPDX-License-Identifier: Apache-2.0

use crate::{config::MIN_POLL_INTERVAL, Error, Step};
use deployer_core::{Receipt, H256};
use interfaces::EthRpc;
use log::*;
use std::time::Duration;
use tokio::time::{sleep, Instant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxStatus {
    /// Not included in a block yet.
    Pending,
    Mined(Receipt),
    /// Included but reverted or out of gas.
    Failed(Receipt),
}

/// One receipt query.
pub async fn status(rpc: &dyn EthRpc, hash: H256) -> anyhow::Result<TxStatus> {
    Ok(match rpc.transaction_receipt(hash).await? {
        None => TxStatus::Pending,
        Some(receipt) if receipt.succeeded() => TxStatus::Mined(receipt),
        Some(receipt) => TxStatus::Failed(receipt),
    })
}

/// Polls for a receipt every `interval` until `timeout` elapses.
///
/// The interval is never shorter than `MIN_POLL_INTERVAL`. A timeout too
/// large to be represented as a deadline waits without limit.
#[derive(Debug, Clone, Copy)]
pub struct Confirmation {
    pub timeout: Duration,
    pub interval: Duration,
}

impl Confirmation {
    pub fn new(timeout: Duration, interval: Duration) -> Confirmation {
        Confirmation { timeout, interval }
    }

    pub async fn wait(&self, rpc: &dyn EthRpc, hash: H256, step: Step) -> Result<Receipt, Error> {
        let deadline = Instant::now().checked_add(self.timeout);
        let interval = self.interval.max(MIN_POLL_INTERVAL);
        loop {
            match status(rpc, hash).await.map_err(Error::rpc(step))? {
                TxStatus::Mined(receipt) => return Ok(receipt),
                TxStatus::Failed(receipt) => {
                    return Err(Error::TransactionFailed {
                        hash,
                        block: receipt.block_number,
                    })
                }
                TxStatus::Pending => {}
            }

            let pause = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Err(Error::ReceiptTimeout {
                            hash,
                            timeout: self.timeout,
                        });
                    }
                    interval.min(deadline - now)
                }
                None => interval,
            };
            trace!("Transaction {:?} pending", hash);
            sleep(pause).await;
        }
    }
}

pub async fn wait_for_receipt(
    rpc: &dyn EthRpc,
    hash: H256,
    timeout: Duration,
    interval: Duration,
    step: Step,
) -> Result<Receipt, Error> {
    Confirmation::new(timeout, interval)
        .wait(rpc, hash, step)
        .await
}
