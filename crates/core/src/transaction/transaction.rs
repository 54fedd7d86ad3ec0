// Copyright 2021 Gnosis Ltd.
// SPDX-License-Identifier: Apache-2.0
use super::{replay_protection, replay_protection::MAX_CHAIN_ID, Author, LegacyData, SigVLegacy, Signature};
use crate::{account::PrivateKey, Bytes, H256};
use crypto::publickey;
use keccak_hash::keccak;
use rlp::{DecoderError, Rlp};
use thiserror::Error;

pub type ChainId = u64;

#[derive(Error, Debug)]
pub enum SignError {
    #[error("Signing failed: {0}")]
    Sign(#[from] publickey::Error),
    #[error("Chain id {0} is too large for replay protection")]
    ChainIdTooLarge(ChainId),
    #[error("Recovered author {recovered:?} differs from signing key {expected:?}")]
    AuthorMismatch {
        expected: crate::Address,
        recovered: crate::Address,
    },
}

/// Signed legacy transaction ready to be sent with `eth_sendRawTransaction`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    data: LegacyData,
    signature: Signature,
    chain_id: Option<ChainId>,
    hash: H256,
    author: Option<Author>,
}

impl Transaction {
    pub fn new(
        data: LegacyData,
        signature: Signature,
        chain_id: Option<ChainId>,
        hash: H256,
    ) -> Transaction {
        Transaction {
            data,
            signature,
            chain_id,
            hash,
            author: None,
        }
    }

    /// Sign `data` with EIP-155 replay protection when `chain_id` is given.
    /// The data is consumed, only the signed form survives.
    pub fn sign(
        data: LegacyData,
        key: &PrivateKey,
        chain_id: Option<ChainId>,
    ) -> Result<Transaction, SignError> {
        if let Some(id) = chain_id.filter(|id| *id > MAX_CHAIN_ID) {
            return Err(SignError::ChainIdTooLarge(id));
        }
        let signature_hash = keccak(data.encode(chain_id, None));
        let sig: Signature = publickey::sign(key.secret(), &signature_hash)?.into();
        let author = sig.recover_author(&signature_hash)?;
        if author.0 != key.address() {
            return Err(SignError::AuthorMismatch {
                expected: key.address(),
                recovered: author.0,
            });
        }

        let mut tx = Transaction::new(data, sig, chain_id, H256::zero());
        tx.author = Some(author);
        tx.recompute_hash();
        Ok(tx)
    }

    /// Parse a raw signed legacy transaction. Author is not recovered.
    pub fn decode(input: &[u8]) -> Result<Transaction, DecoderError> {
        let rlp = Rlp::new(input);
        if rlp.item_count()? != 9 {
            return Err(DecoderError::RlpIncorrectListLen);
        }
        let data = LegacyData::decode_data(&rlp, 0)?;
        let mixed_v: SigVLegacy = rlp.val_at(6)?;
        let r = rlp.val_at(7)?;
        let s = rlp.val_at(8)?;
        let v = replay_protection::decode_v(mixed_v);
        let chain_id = replay_protection::decode_chain_id(mixed_v);

        Ok(Transaction::new(
            data,
            Signature::new(v, r, s),
            chain_id,
            keccak(input),
        ))
    }

    /// If we want to delay calculating of hash we can send invalid hash
    /// in constructor and use this function to calculate it when we see fit.
    fn recompute_hash(&mut self) {
        self.hash = keccak(self.rlp_bytes());
    }

    /// Wire format.
    pub fn rlp_bytes(&self) -> Bytes {
        self.data.encode(self.chain_id, Some(&self.signature))
    }

    pub fn author(&self) -> Option<Author> {
        self.author
    }

    pub fn data(&self) -> &LegacyData {
        &self.data
    }

    pub fn chain_id(&self) -> Option<ChainId> {
        self.chain_id
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn hash(&self) -> H256 {
        self.hash
    }

    /// V as it goes on the wire, with chain id merged in.
    pub fn v(&self) -> SigVLegacy {
        replay_protection::encode(self.signature.v, self.chain_id)
    }

    pub fn recover_author(&mut self) -> Result<Author, publickey::Error> {
        let signature_hash = keccak(self.data.encode(self.chain_id, None));
        let author = self.signature.recover_author(&signature_hash)?;
        self.author = Some(author);
        Ok(author)
    }

    pub fn has_author(&self) -> bool {
        self.author.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{transaction::CallType, Address, U256};
    use hex_literal::hex;

    const EIP155_KEY: &str = "4646464646464646464646464646464646464646464646464646464646464646";

    fn eip155_data() -> LegacyData {
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
    fn eip155_example() {
        let key: PrivateKey = EIP155_KEY.parse().unwrap();
        let tx = Transaction::sign(eip155_data(), &key, Some(1)).unwrap();

        assert_eq!(tx.v(), 37);
        assert_eq!(
            tx.signature().r,
            U256::from_dec_str(
                "18515461264373351373200002665853028612451056578545711640558177340181847433846"
            )
            .unwrap()
        );
        assert_eq!(
            tx.signature().s,
            U256::from_dec_str(
                "46948507304638947509940763649030358759909902576025900602547168820602576006531"
            )
            .unwrap()
        );
        assert_eq!(
            tx.rlp_bytes(),
            hex!("f86c098504a817c800825208943535353535353535353535353535353535353535880de0b6b3a76400008025a028ef61340bd939bc2195fe537567866003e1a15d3c71ff63e1590620aa636276a067cbe9d8997f761aecb703304b3800ccf555c9f3dc64214b297fb1966a3b6d83").to_vec()
        );
        assert_eq!(tx.hash(), keccak(tx.rlp_bytes()));
    }

    #[test]
    fn decode_and_recover() {
        let key: PrivateKey = EIP155_KEY.parse().unwrap();
        let signed = Transaction::sign(eip155_data(), &key, Some(1)).unwrap();

        let mut decoded = Transaction::decode(&signed.rlp_bytes()).unwrap();
        assert!(!decoded.has_author());
        assert_eq!(decoded.chain_id(), Some(1));
        assert_eq!(decoded.data(), signed.data());
        assert_eq!(decoded.hash(), signed.hash());

        let (author, _) = decoded.recover_author().unwrap();
        assert_eq!(author, key.address());
        assert_eq!(
            author,
            "9d8a62f656a8d1615c1294fd71e9cfb3e4855a4f".parse::<Address>().unwrap()
        );
    }

    #[test]
    fn contract_creation_round_trip() {
        let key: PrivateKey = EIP155_KEY.parse().unwrap();
        let data = LegacyData {
            nonce: 0.into(),
            gas_price: 1.into(),
            gas_limit: 200_000.into(),
            call_type: CallType::Create,
            value: U256::zero(),
            data: vec![0x60, 0x80, 0x60, 0x40],
        };
        let signed = Transaction::sign(data.clone(), &key, Some(1337)).unwrap();
        let decoded = Transaction::decode(&signed.rlp_bytes()).unwrap();
        assert_eq!(decoded.data(), &data);
        assert_eq!(decoded.chain_id(), Some(1337));
    }

    #[test]
    fn rejects_oversized_chain_id() {
        let key: PrivateKey = EIP155_KEY.parse().unwrap();
        assert!(matches!(
            Transaction::sign(eip155_data(), &key, Some(MAX_CHAIN_ID + 1)),
            Err(SignError::ChainIdTooLarge(id)) if id == MAX_CHAIN_ID + 1
        ));

        let tx = Transaction::sign(eip155_data(), &key, Some(MAX_CHAIN_ID)).unwrap();
        let mut decoded = Transaction::decode(&tx.rlp_bytes()).unwrap();
        assert_eq!(decoded.chain_id(), Some(MAX_CHAIN_ID));
        assert_eq!(decoded.recover_author().unwrap().0, key.address());
    }

    #[test]
    fn decode_rejects_short_list() {
        let unsigned = eip155_data().encode(Some(1), None);
        // signing payload has 9 items too but a zero signature fails recovery
        let mut decoded = Transaction::decode(&unsigned).unwrap();
        assert!(decoded.recover_author().is_err());

        let six = eip155_data().encode(None, None);
        assert_eq!(
            Transaction::decode(&six).unwrap_err(),
            DecoderError::RlpIncorrectListLen
        );
    }
}
