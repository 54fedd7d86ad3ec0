// Copyright 2021 Gnosis Ltd.
// SPDX-License-Identifier: Apache-2.0

pub mod account;
pub mod hex;
pub mod receipt;
pub mod transaction;

// large integers
pub use ethereum_types::{U256, U64};

// special purpose hashes
pub use ethereum_types::{Address, H256};

pub type Bytes = Vec<u8>;

// domain types
pub use account::{PrivateKey, Session};
pub use receipt::Receipt;
pub use transaction::{CallType, ChainId, LegacyData, Transaction};
