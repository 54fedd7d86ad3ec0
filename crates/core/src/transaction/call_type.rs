// Copyright 2021 Gnosis Ltd.
// SPDX-License-Identifier: Apache-2.0

use crate::{Address, U256};
use keccak_hash::keccak;
use rlp::{Decodable, DecoderError, Encodable, Rlp, RlpStream};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallType {
    /// Create creates new contract.
    Create,
    /// Calls contract at given address.
    /// In the case of a transfer, this is the receiver's address.
    Call(Address),
}

impl CallType {
    pub fn to(&self) -> Option<Address> {
        match self {
            CallType::Create => None,
            CallType::Call(address) => Some(*address),
        }
    }
}

impl Encodable for CallType {
    fn rlp_append(&self, s: &mut RlpStream) {
        match self {
            CallType::Create => {
                s.append_empty_data();
            }
            CallType::Call(address) => {
                s.append(address);
            }
        }
    }
}

impl Decodable for CallType {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        if rlp.is_empty() {
            if rlp.is_data() {
                Ok(CallType::Create)
            } else {
                Err(DecoderError::RlpExpectedToBeData)
            }
        } else {
            Ok(CallType::Call(rlp.as_val()?))
        }
    }
}

/// Address of a contract created by `sender` with `nonce`:
/// last 20 bytes of `keccak(rlp([sender, nonce]))`.
pub fn create_address(sender: &Address, nonce: &U256) -> Address {
    let mut stream = RlpStream::new_list(2);
    stream.append(sender);
    stream.append(nonce);
    let hash = keccak(stream.out());
    Address::from_slice(&hash.as_bytes()[12..])
}
