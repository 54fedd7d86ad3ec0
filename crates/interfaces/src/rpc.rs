// Copyright 2020-2021 Gnosis Ltd.
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use deployer_core::{Address, Bytes, ChainId, Receipt, H256, U256};
use std::fmt;

/// Ethereum JSON-RPC methods the deploy workflow relies on.
#[async_trait]
pub trait EthRpc: Send + Sync {
    /// `eth_chainId`
    async fn chain_id(&self) -> anyhow::Result<ChainId>;
    /// `eth_gasPrice`, node's suggested price per unit of gas
    async fn gas_price(&self) -> anyhow::Result<U256>;
    /// `eth_getTransactionCount`
    async fn transaction_count(&self, address: Address, block: BlockTag) -> anyhow::Result<U256>;
    /// `eth_getBalance`, native balance in wei
    async fn balance(&self, address: Address, block: BlockTag) -> anyhow::Result<U256>;
    /// `eth_sendRawTransaction`, returns transaction hash
    async fn send_raw_transaction(&self, raw: Bytes) -> anyhow::Result<H256>;
    /// `eth_getTransactionReceipt`, `None` while the transaction is not mined
    async fn transaction_receipt(&self, hash: H256) -> anyhow::Result<Option<Receipt>>;
    /// `eth_call`, read-only execution, returns output data
    async fn call(&self, request: CallRequest, block: BlockTag) -> anyhow::Result<Bytes>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockTag {
    Latest,
    Pending,
    Number(u64),
}

impl BlockTag {
    pub fn to_param(&self) -> String {
        match self {
            BlockTag::Latest => "latest".to_owned(),
            BlockTag::Pending => "pending".to_owned(),
            BlockTag::Number(n) => format!("0x{:x}", n),
        }
    }
}

impl fmt::Display for BlockTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_param())
    }
}

/// Unsigned read-only call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRequest {
    pub from: Option<Address>,
    pub to: Address,
    pub data: Bytes,
}

impl CallRequest {
    pub fn new(to: Address, data: Bytes) -> CallRequest {
        CallRequest {
            from: None,
            to,
            data,
        }
    }

    pub fn from(mut self, from: Address) -> CallRequest {
        self.from = Some(from);
        self
    }
}

#[cfg(any(test, feature = "test_only"))]
pub mod helper;
