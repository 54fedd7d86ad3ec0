// Copyright 2021 Gnosis Ltd.
// SPDX-License-Identifier: Apache-2.0

use crate::{hex, Address, U256};
use crypto::publickey::{self, KeyPair, Secret};
use std::{fmt, str::FromStr};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AccountError {
    #[error("Private key is not valid hex.")]
    KeyNotHex,
    #[error("Private key must be 32 bytes, got {0} bytes.")]
    KeyLength(usize),
    #[error("Private key is not a valid secp256k1 secret: {0}")]
    KeyInvalid(#[from] publickey::Error),
    #[error("Account {expected:?} does not match address {derived:?} of the private key.")]
    AddressMismatch { expected: Address, derived: Address },
    #[error("Nonce was not synced with the node.")]
    NonceUnknown,
    #[error("Nonce {0} cannot be advanced any further.")]
    NonceOverflow(U256),
}

/// Secret used to sign transactions. It is only kept in memory and both
/// `Debug` and `Display` are redacted.
#[derive(Clone)]
pub struct PrivateKey {
    secret: Secret,
    address: Address,
}

impl PrivateKey {
    pub fn from_secret(secret: Secret) -> Result<PrivateKey, AccountError> {
        let address = KeyPair::from_secret(secret.clone())?.address();
        Ok(PrivateKey { secret, address })
    }

    pub fn from_hex(input: &str) -> Result<PrivateKey, AccountError> {
        let bytes = hex::decode(input).map_err(|_| AccountError::KeyNotHex)?;
        if bytes.len() != 32 {
            return Err(AccountError::KeyLength(bytes.len()));
        }
        let secret = Secret::copy_from_slice(&bytes).ok_or(AccountError::KeyLength(bytes.len()))?;
        PrivateKey::from_secret(secret)
    }

    /// Address derived from the public key.
    pub fn address(&self) -> Address {
        self.address
    }

    pub(crate) fn secret(&self) -> &Secret {
        &self.secret
    }
}

impl FromStr for PrivateKey {
    type Err = AccountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PrivateKey::from_hex(s)
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("address", &self.address)
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl fmt::Display for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

/// Sending account for one run: address, key and the locally tracked nonce.
///
/// The nonce is synced once from the node and then advanced in memory for
/// every transaction built from this session.
#[derive(Debug, Clone)]
pub struct Session {
    address: Address,
    key: PrivateKey,
    nonce: Option<U256>,
}

impl Session {
    pub fn new(address: Address, key: PrivateKey) -> Result<Session, AccountError> {
        if key.address() != address {
            return Err(AccountError::AddressMismatch {
                expected: address,
                derived: key.address(),
            });
        }
        Ok(Session {
            address,
            key,
            nonce: None,
        })
    }

    /// Session whose address is derived from the key.
    pub fn from_key(key: PrivateKey) -> Session {
        Session {
            address: key.address(),
            key,
            nonce: None,
        }
    }

    pub fn with_nonce(mut self, nonce: U256) -> Session {
        self.nonce = Some(nonce);
        self
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn key(&self) -> &PrivateKey {
        &self.key
    }

    pub fn sync_nonce(&mut self, nonce: U256) {
        self.nonce = Some(nonce);
    }

    /// Nonce the next transaction will use.
    pub fn nonce(&self) -> Option<U256> {
        self.nonce
    }

    /// Returns the nonce for the next transaction and advances it by one.
    pub fn next_nonce(&mut self) -> Result<U256, AccountError> {
        let nonce = self.nonce.ok_or(AccountError::NonceUnknown)?;
        let next = nonce
            .checked_add(U256::one())
            .ok_or(AccountError::NonceOverflow(nonce))?;
        self.nonce = Some(next);
        Ok(nonce)
    }
}
