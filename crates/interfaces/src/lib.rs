// Copyright 2021 Gnosis Ltd.
// SPDX-License-Identifier: Apache-2.0

pub mod compiler;
pub mod rpc;

pub use compiler::{CompiledArtifact, Compiler};
pub use rpc::{BlockTag, CallRequest, EthRpc};
