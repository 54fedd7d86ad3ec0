// Copyright 2021 Gnosis Ltd.
// SPDX-License-Identifier: Apache-2.0

pub mod config;
pub mod confirm;
pub mod contract;
mod error;
pub mod gas;
mod workflow;

pub use config::Config;
pub use confirm::{wait_for_receipt, Confirmation, TxStatus};
pub use contract::{ContractHandle, MethodCall};
pub use error::{Error, Step};
pub use workflow::{DeployAndInvoke, Report};
