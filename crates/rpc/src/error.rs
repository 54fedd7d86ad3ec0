// Copyright 2021 Gnosis Ltd.
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RpcError {
    #[error("Invalid RPC url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Node returned error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("Malformed response to {method}: {reason}")]
    Decode { method: String, reason: String },
}
