// Copyright 2021 Gnosis Ltd.
// SPDX-License-Identifier: Apache-2.0

//! `0x` prefixed hex as used by JSON-RPC data fields.

use rustc_hex::{FromHex, FromHexError, ToHex};

/// Encode bytes as `0x` prefixed lowercase hex.
pub fn encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(2 + bytes.len() * 2);
    out.push_str("0x");
    out.push_str(&bytes.to_hex::<String>());
    out
}

/// Decode hex with or without `0x` prefix. Empty input decodes to empty bytes.
pub fn decode(input: &str) -> Result<Vec<u8>, FromHexError> {
    let input = input.trim();
    let stripped = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input);
    stripped.from_hex()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_is_optional() {
        assert_eq!(decode("0x0a0b").unwrap(), vec![0x0a, 0x0b]);
        assert_eq!(decode("0a0b").unwrap(), vec![0x0a, 0x0b]);
        assert_eq!(decode("0x").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn odd_length_is_rejected() {
        assert!(decode("0x123").is_err());
    }

    #[test]
    fn encode_is_lowercase_prefixed() {
        assert_eq!(encode(&[0xde, 0xad]), "0xdead");
        assert_eq!(encode(&[]), "0x");
    }
}
