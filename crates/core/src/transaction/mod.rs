// Copyright 2021 Gnosis Ltd.
// SPDX-License-Identifier: Apache-2.0
pub mod call_type;
pub mod legacy_data;
pub mod replay_protection;
pub mod signature;
pub mod transaction;

pub use call_type::{create_address, CallType};
pub use legacy_data::LegacyData;
pub use signature::{Author, SigV, SigVLegacy, Signature};
pub use transaction::{ChainId, SignError, Transaction};
