// Copyright 2021 Gnosis Ltd.
// SPDX-License-Identifier: Apache-2.0

pub mod error;
pub mod http;
pub mod jsonrpc;

pub use error::RpcError;
pub use http::{HttpRpc, DEFAULT_REQUEST_TIMEOUT};
