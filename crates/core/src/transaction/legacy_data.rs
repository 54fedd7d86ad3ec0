// Copyright 2021 Gnosis Ltd.
// SPDX-License-Identifier: Apache-2.0
use super::{replay_protection, CallType, ChainId, Signature};
use crate::{Bytes, U256};
use rlp::{self, DecoderError, Rlp, RlpStream};

/// A transaction (formally, T) is a
/// single cryptographically-signed instruction constructed by
/// an actor externally to the scope of Ethereum
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyData {
    /// The number of transactions sent by the sender.
    pub nonce: U256,
    /// The number of Wei to pay the network for unit of gas.
    pub gas_price: U256,
    /// The maximum amount of gas to be used in while executing a transaction
    pub gas_limit: U256,
    /// Recipient of a message call, empty for contract creation.
    pub call_type: CallType,
    /// The number of Wei to be transferred to the recipient of a message call.
    pub value: U256,
    /// Byte array specifying the input data of the message call or
    /// for contract creation:  EVM-code for the account initialisation procedure
    pub data: Bytes,
}

impl LegacyData {
    /// Without signature this is the EIP-155 signing payload,
    /// with signature it is the wire format.
    pub fn encode(&self, chain_id: Option<ChainId>, signature: Option<&Signature>) -> Vec<u8> {
        let mut stream = RlpStream::new();
        self.rlp(&mut stream, chain_id, signature);
        stream.out().to_vec()
    }

    fn rlp(&self, rlp: &mut RlpStream, chain_id: Option<ChainId>, signature: Option<&Signature>) {
        rlp.begin_unbounded_list();
        self.rlp_append_fields(rlp);
        if let Some(sig) = signature {
            rlp.append(&replay_protection::encode(sig.v, chain_id));
            rlp.append(&sig.r);
            rlp.append(&sig.s);
        } else if let Some(n) = chain_id {
            rlp.append(&n);
            rlp.append(&0u8);
            rlp.append(&0u8);
        }
        rlp.finalize_unbounded_list();
    }

    fn rlp_append_fields(&self, s: &mut RlpStream) {
        s.append(&self.nonce);
        s.append(&self.gas_price);
        s.append(&self.gas_limit);
        s.append(&self.call_type);
        s.append(&self.value);
        s.append(&self.data);
    }

    pub(crate) fn decode_data(d: &Rlp, offset: usize) -> Result<LegacyData, DecoderError> {
        Ok(LegacyData {
            nonce: d.val_at(offset)?,
            gas_price: d.val_at(offset + 1)?,
            gas_limit: d.val_at(offset + 2)?,
            call_type: d.val_at(offset + 3)?,
            value: d.val_at(offset + 4)?,
            data: d.val_at(offset + 5)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    pub fn eip155_data() -> LegacyData {
        LegacyData {
            nonce: 9.into(),
            gas_price: 20_000_000_000u64.into(),
            gas_limit: 21000.into(),
            call_type: CallType::Call("3535353535353535353535353535353535353535".parse().unwrap()),
            value: 1_000_000_000_000_000_000u64.into(),
            data: Vec::new(),
        }
    }

    #[test]
    fn eip155_signing_payload() {
        assert_eq!(
            eip155_data().encode(Some(1), None),
            hex!("ec098504a817c800825208943535353535353535353535353535353535353535880de0b6b3a764000080018080").to_vec()
        );
    }

    #[test]
    fn unprotected_signing_payload_has_six_fields() {
        let encoded = eip155_data().encode(None, None);
        assert_eq!(Rlp::new(&encoded).item_count().unwrap(), 6);
    }
}
