// Copyright 2021 Gnosis Ltd.
// SPDX-License-Identifier: Apache-2.0

use crate::{
    jsonrpc::{Request, Response},
    RpcError,
};
use async_trait::async_trait;
use deployer_core::{hex, Address, Bytes, ChainId, Receipt, H256, U256, U64};
use interfaces::rpc::{BlockTag, CallRequest, EthRpc};
use log::*;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// JSON-RPC client over HTTP.
pub struct HttpRpc {
    client: Client,
    url: Url,
    next_id: AtomicU64,
}

impl HttpRpc {
    pub fn new(url: &str) -> Result<HttpRpc, RpcError> {
        HttpRpc::with_timeout(url, DEFAULT_REQUEST_TIMEOUT)
    }

    /// `timeout` bounds every single request, not the whole run.
    pub fn with_timeout(url: &str, timeout: Duration) -> Result<HttpRpc, RpcError> {
        let url = Url::parse(url).map_err(|e| RpcError::InvalidUrl {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(HttpRpc {
            client,
            url,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub async fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        trace!("rpc request id:{} method:{}", id, method);

        let response: Response = self
            .client
            .post(self.url.clone())
            .json(&Request::new(id, method, params))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(error) = response.error {
            debug!("rpc {} failed: {} {}", method, error.code, error.message);
            return Err(RpcError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        serde_json::from_value(response.result).map_err(|e| RpcError::Decode {
            method: method.to_owned(),
            reason: e.to_string(),
        })
    }

    fn decode_data(method: &str, data: &str) -> Result<Bytes, RpcError> {
        hex::decode(data).map_err(|e| RpcError::Decode {
            method: method.to_owned(),
            reason: e.to_string(),
        })
    }
}

fn call_object(request: &CallRequest) -> Value {
    let mut object = Map::new();
    if let Some(from) = request.from {
        object.insert("from".to_owned(), json!(from));
    }
    object.insert("to".to_owned(), json!(request.to));
    object.insert("data".to_owned(), json!(hex::encode(&request.data)));
    Value::Object(object)
}

#[async_trait]
impl EthRpc for HttpRpc {
    async fn chain_id(&self) -> anyhow::Result<ChainId> {
        let id: U64 = self.request("eth_chainId", json!([])).await?;
        Ok(id.as_u64())
    }

    async fn gas_price(&self) -> anyhow::Result<U256> {
        Ok(self.request("eth_gasPrice", json!([])).await?)
    }

    async fn transaction_count(&self, address: Address, block: BlockTag) -> anyhow::Result<U256> {
        Ok(self
            .request(
                "eth_getTransactionCount",
                json!([address, block.to_param()]),
            )
            .await?)
    }

    async fn balance(&self, address: Address, block: BlockTag) -> anyhow::Result<U256> {
        Ok(self
            .request("eth_getBalance", json!([address, block.to_param()]))
            .await?)
    }

    async fn send_raw_transaction(&self, raw: Bytes) -> anyhow::Result<H256> {
        Ok(self
            .request("eth_sendRawTransaction", json!([hex::encode(&raw)]))
            .await?)
    }

    async fn transaction_receipt(&self, hash: H256) -> anyhow::Result<Option<Receipt>> {
        Ok(self
            .request("eth_getTransactionReceipt", json!([hash]))
            .await?)
    }

    async fn call(&self, request: CallRequest, block: BlockTag) -> anyhow::Result<Bytes> {
        let data: String = self
            .request("eth_call", json!([call_object(&request), block.to_param()]))
            .await?;
        Ok(HttpRpc::decode_data("eth_call", &data)?)
    }
}
