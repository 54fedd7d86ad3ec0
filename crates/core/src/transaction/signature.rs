// Copyright 2021 Gnosis Ltd.
// SPDX-License-Identifier: Apache-2.0
use crate::{Address, H256, U256};
use crypto::publickey::{self, public_to_address, recover, Public};

/// Recovery id of the signature, `0` or `1`.
pub type SigV = u8;
/// V as it is found in legacy transactions, possibly with a chain id merged in.
pub type SigVLegacy = u64;
/// Sender address and its public key.
pub type Author = (Address, Public);

/// Components that constitute transaction signature
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Signature {
    /// The V field of the signature; which half of the curve our point falls in.
    pub v: SigV,
    /// The R field of the signature; helps describe the point on the curve.
    pub r: U256,
    /// The S field of the signature; helps describe the point on the curve.
    pub s: U256,
}

impl Signature {
    pub fn new(v: SigV, r: U256, s: U256) -> Signature {
        Signature { v, r, s }
    }

    pub fn recover_author(&self, message: &H256) -> Result<Author, publickey::Error> {
        let public = recover(&self.to_publickey(), message)?;
        Ok((public_to_address(&public), public))
    }

    fn to_publickey(&self) -> publickey::Signature {
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        self.r.to_big_endian(&mut r);
        self.s.to_big_endian(&mut s);
        publickey::Signature::from_rsv(&H256::from(r), &H256::from(s), self.v)
    }
}

impl From<publickey::Signature> for Signature {
    fn from(sig: publickey::Signature) -> Self {
        Signature {
            v: sig.v(),
            r: U256::from_big_endian(sig.r()),
            s: U256::from_big_endian(sig.s()),
        }
    }
}
