// Copyright 2021 Gnosis Ltd.
// SPDX-License-Identifier: Apache-2.0

//! Typed calls built from a compiled ABI.

use deployer_core::{Address, Bytes, U256};
use ethabi::{Contract, Function, Token};
use interfaces::rpc::CallRequest;

/// Creation payload: bytecode followed by ABI encoded constructor arguments.
pub fn deploy_payload(abi: &Contract, bytecode: Bytes, args: &[Token]) -> Result<Bytes, ethabi::Error> {
    match abi.constructor() {
        Some(constructor) => constructor.encode_input(bytecode, args),
        None if args.is_empty() => Ok(bytecode),
        None => Err(ethabi::Error::InvalidData),
    }
}

/// Deployed contract: its address and interface.
#[derive(Debug, Clone)]
pub struct ContractHandle {
    address: Address,
    abi: Contract,
}

impl ContractHandle {
    pub fn new(address: Address, abi: Contract) -> ContractHandle {
        ContractHandle { address, abi }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn abi(&self) -> &Contract {
        &self.abi
    }

    /// Start a call of method `name`. Fails if the ABI has no such method.
    pub fn method(&self, name: &str) -> Result<MethodCall<'_>, ethabi::Error> {
        Ok(MethodCall {
            to: self.address,
            function: self.abi.function(name)?,
            args: Vec::new(),
        })
    }
}

/// Arguments are checked against the ABI when encoding.
#[derive(Debug, Clone)]
pub struct MethodCall<'a> {
    to: Address,
    function: &'a Function,
    args: Vec<Token>,
}

impl<'a> MethodCall<'a> {
    pub fn arg(mut self, token: Token) -> Self {
        self.args.push(token);
        self
    }

    pub fn name(&self) -> &str {
        &self.function.name
    }

    pub fn to(&self) -> Address {
        self.to
    }

    /// Selector followed by the encoded arguments.
    pub fn encode(&self) -> Result<Bytes, ethabi::Error> {
        self.function.encode_input(&self.args)
    }

    pub fn call_request(&self) -> Result<CallRequest, ethabi::Error> {
        Ok(CallRequest::new(self.to, self.encode()?))
    }

    pub fn decode_output(&self, data: &[u8]) -> Result<Vec<Token>, ethabi::Error> {
        self.function.decode_output(data)
    }
}

/// First output token as unsigned integer.
pub fn uint_output(tokens: &[Token]) -> Option<U256> {
    match tokens.first() {
        Some(Token::Uint(value)) => Some(*value),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use interfaces::compiler::helper::token_artifact;

    fn token() -> ContractHandle {
        ContractHandle::new(Address::repeat_byte(0x33), token_artifact().abi)
    }

    #[test]
    fn encodes_transfer() {
        let to = Address::repeat_byte(0x22);
        let token = token();
        let call = token
            .method("transfer")
            .unwrap()
            .arg(Token::Address(to))
            .arg(Token::Uint(100.into()));
        let data = call.encode().unwrap();

        assert_eq!(data.len(), 4 + 32 + 32);
        assert_eq!(&data[..4], &[0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(&data[16..36], to.as_bytes());
        assert_eq!(data[67], 100);
        assert_eq!(call.to(), Address::repeat_byte(0x33));
    }

    #[test]
    fn encodes_balance_query() {
        let owner = Address::repeat_byte(0x11);
        let token = token();
        let request = token
            .method("balanceOf")
            .unwrap()
            .arg(Token::Address(owner))
            .call_request()
            .unwrap();
        assert_eq!(request.to, token.address());
        assert_eq!(&request.data[..4], &[0x70, 0xa0, 0x82, 0x31]);
        assert_eq!(request.data.len(), 36);
    }

    #[test]
    fn decodes_uint_output() {
        let token = token();
        let call = token.method("balanceOf").unwrap();
        let output = ethabi::encode(&[Token::Uint(1_000_000.into())]);
        let tokens = call.decode_output(&output).unwrap();
        assert_eq!(uint_output(&tokens), Some(1_000_000.into()));
        assert!(call.decode_output(&[]).is_err());
    }

    #[test]
    fn rejects_wrong_arguments() {
        let token = token();
        assert!(token.method("mint").is_err());

        // missing amount
        let call = token
            .method("transfer")
            .unwrap()
            .arg(Token::Address(Address::zero()));
        assert!(call.encode().is_err());

        // amount given as address
        let call = token
            .method("transfer")
            .unwrap()
            .arg(Token::Address(Address::zero()))
            .arg(Token::Address(Address::zero()));
        assert!(call.encode().is_err());
    }

    #[test]
    fn constructor_without_arguments() {
        let artifact = token_artifact();
        let payload = deploy_payload(&artifact.abi, artifact.bytecode.clone(), &[]).unwrap();
        assert_eq!(payload, artifact.bytecode);
        assert!(deploy_payload(
            &artifact.abi,
            artifact.bytecode.clone(),
            &[Token::Uint(1.into())]
        )
        .is_err());
    }
}
