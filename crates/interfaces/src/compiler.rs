// Copyright 2021 Gnosis Ltd.
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use deployer_core::Bytes;

/// Output of compiling one contract: creation bytecode and its ABI.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledArtifact {
    pub contract: String,
    pub bytecode: Bytes,
    pub abi: ethabi::Contract,
}

/// Solidity compiler.
#[async_trait]
pub trait Compiler: Send + Sync {
    /// Compile `source` and return the artifact of the contract named `contract`.
    async fn compile(&self, source: &str, contract: &str) -> anyhow::Result<CompiledArtifact>;
}

#[cfg(any(test, feature = "test_only"))]
pub mod helper {
    use super::*;
    use anyhow::bail;
    use parking_lot::Mutex;

    /// ABI of `contracts/Token.sol` as printed by `solc --combined-json abi`.
    pub const TOKEN_ABI: &str = r#"[
        {"inputs":[],"stateMutability":"nonpayable","type":"constructor"},
        {"anonymous":false,"inputs":[
            {"indexed":true,"internalType":"address","name":"from","type":"address"},
            {"indexed":true,"internalType":"address","name":"to","type":"address"},
            {"indexed":false,"internalType":"uint256","name":"value","type":"uint256"}],
            "name":"Transfer","type":"event"},
        {"inputs":[{"internalType":"address","name":"owner","type":"address"}],
            "name":"balanceOf","outputs":[{"internalType":"uint256","name":"","type":"uint256"}],
            "stateMutability":"view","type":"function"},
        {"inputs":[{"internalType":"address","name":"","type":"address"}],
            "name":"balances","outputs":[{"internalType":"uint256","name":"","type":"uint256"}],
            "stateMutability":"view","type":"function"},
        {"inputs":[],"name":"totalSupply","outputs":[{"internalType":"uint256","name":"","type":"uint256"}],
            "stateMutability":"view","type":"function"},
        {"inputs":[{"internalType":"address","name":"to","type":"address"},
            {"internalType":"uint256","name":"amount","type":"uint256"}],
            "name":"transfer","outputs":[{"internalType":"bool","name":"","type":"bool"}],
            "stateMutability":"nonpayable","type":"function"}
    ]"#;

    pub fn token_artifact() -> CompiledArtifact {
        CompiledArtifact {
            contract: "Token".to_owned(),
            bytecode: vec![0x60, 0x80, 0x60, 0x40, 0x52],
            abi: ethabi::Contract::load(TOKEN_ABI.as_bytes()).expect("token abi is valid"),
        }
    }

    /// Compiler that returns a fixed artifact and counts invocations.
    pub struct StaticCompiler {
        artifact: Option<CompiledArtifact>,
        calls: Mutex<Vec<String>>,
    }

    impl StaticCompiler {
        pub fn new(artifact: CompiledArtifact) -> StaticCompiler {
            StaticCompiler {
                artifact: Some(artifact),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn token() -> StaticCompiler {
            StaticCompiler::new(token_artifact())
        }

        /// Compiler that always reports a compilation error.
        pub fn failing() -> StaticCompiler {
            StaticCompiler {
                artifact: None,
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Contract names requested so far.
        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl Compiler for StaticCompiler {
        async fn compile(&self, _source: &str, contract: &str) -> anyhow::Result<CompiledArtifact> {
            self.calls.lock().push(contract.to_owned());
            match &self.artifact {
                Some(artifact) if artifact.contract == contract => Ok(artifact.clone()),
                Some(_) => bail!("contract {} not found in source", contract),
                None => bail!("ParserError: Expected pragma, import directive or contract definition."),
            }
        }
    }
}
