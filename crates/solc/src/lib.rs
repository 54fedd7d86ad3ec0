// Copyright 2021 Gnosis Ltd.
// SPDX-License-Identifier: Apache-2.0

//! `solc` command line compiler.

use async_trait::async_trait;
use deployer_core::hex;
use interfaces::compiler::{CompiledArtifact, Compiler};
use log::*;
use serde::Deserialize;
use serde_json::Value;
use std::{collections::HashMap, io, path::PathBuf, process::Stdio};
use thiserror::Error;
use tokio::{io::AsyncWriteExt, process::Command};

pub const DEFAULT_SOLC: &str = "solc";

#[derive(Error, Debug)]
pub enum SolcError {
    #[error("Solidity compiler {0:?} not found")]
    NotFound(PathBuf),
    #[error("Running solc failed: {0}")]
    Io(#[from] io::Error),
    #[error("Compilation failed: {0}")]
    Compilation(String),
    #[error("Unexpected solc output: {0}")]
    Output(String),
    #[error("Contract {0} not found in compiler output")]
    ContractNotFound(String),
    #[error("Contract {0} has no bytecode, is it abstract?")]
    EmptyBytecode(String),
    #[error("Invalid ABI: {0}")]
    Abi(#[from] ethabi::Error),
}

#[derive(Deserialize)]
struct CombinedJson {
    contracts: HashMap<String, CombinedContract>,
}

#[derive(Deserialize)]
struct CombinedContract {
    /// Array since solc 0.8.10, a JSON string before.
    abi: Value,
    bin: String,
}

/// Parse `solc --combined-json abi,bin` output and pick `contract`.
pub fn parse_combined_json(output: &str, contract: &str) -> Result<CompiledArtifact, SolcError> {
    let combined: CombinedJson =
        serde_json::from_str(output).map_err(|e| SolcError::Output(e.to_string()))?;

    let suffix = format!(":{}", contract);
    let compiled = combined
        .contracts
        .iter()
        .find(|(name, _)| *name == contract || name.ends_with(&suffix))
        .map(|(_, compiled)| compiled)
        .ok_or_else(|| SolcError::ContractNotFound(contract.to_owned()))?;

    let abi = match &compiled.abi {
        Value::String(abi) => ethabi::Contract::load(abi.as_bytes())?,
        abi => ethabi::Contract::load(abi.to_string().as_bytes())?,
    };
    let bytecode = hex::decode(&compiled.bin).map_err(|e| SolcError::Output(e.to_string()))?;
    if bytecode.is_empty() {
        return Err(SolcError::EmptyBytecode(contract.to_owned()));
    }

    Ok(CompiledArtifact {
        contract: contract.to_owned(),
        bytecode,
        abi,
    })
}

/// Invokes the `solc` executable with the source on stdin.
pub struct Solc {
    path: PathBuf,
}

impl Default for Solc {
    fn default() -> Self {
        Solc::new(DEFAULT_SOLC)
    }
}

impl Solc {
    pub fn new(path: impl Into<PathBuf>) -> Solc {
        Solc { path: path.into() }
    }

    pub async fn compile_source(
        &self,
        source: &str,
        contract: &str,
    ) -> Result<CompiledArtifact, SolcError> {
        debug!("Compiling {} with {:?}", contract, self.path);
        let mut child = Command::new(&self.path)
            .args(&["--combined-json", "abi,bin", "-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => SolcError::NotFound(self.path.clone()),
                _ => SolcError::Io(e),
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(source.as_bytes()).await?;
            // dropping stdin closes the pipe so solc starts compiling
        }
        let output = child.wait_with_output().await?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            return Err(SolcError::Compilation(stderr.trim().to_owned()));
        }
        if !stderr.trim().is_empty() {
            warn!("solc: {}", stderr.trim());
        }
        parse_combined_json(&String::from_utf8_lossy(&output.stdout), contract)
    }
}

#[async_trait]
impl Compiler for Solc {
    async fn compile(&self, source: &str, contract: &str) -> anyhow::Result<CompiledArtifact> {
        Ok(self.compile_source(source, contract).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABI: &str = r#"[{"inputs":[{"internalType":"address","name":"owner","type":"address"}],"name":"balanceOf","outputs":[{"internalType":"uint256","name":"","type":"uint256"}],"stateMutability":"view","type":"function"}]"#;

    #[test]
    fn array_abi() {
        let output = format!(
            r#"{{"contracts":{{"<stdin>:Token":{{"abi":{},"bin":"6080604052"}}}},"version":"0.8.19"}}"#,
            ABI
        );
        let artifact = parse_combined_json(&output, "Token").unwrap();
        assert_eq!(artifact.bytecode, vec![0x60, 0x80, 0x60, 0x40, 0x52]);
        assert!(artifact.abi.function("balanceOf").is_ok());
    }

    #[test]
    fn string_abi() {
        let output = serde_json::json!({
            "contracts": {"<stdin>:Token": {"abi": ABI, "bin": "6080604052"}},
            "version": "0.6.12",
        })
        .to_string();
        let artifact = parse_combined_json(&output, "Token").unwrap();
        assert!(artifact.abi.function("balanceOf").is_ok());
    }

    #[test]
    fn picks_named_contract() {
        let output = format!(
            r#"{{"contracts":{{"<stdin>:SafeMath":{{"abi":[],"bin":"60aa"}},"<stdin>:Token":{{"abi":{},"bin":"60bb"}}}}}}"#,
            ABI
        );
        assert_eq!(
            parse_combined_json(&output, "Token").unwrap().bytecode,
            vec![0x60, 0xbb]
        );
        assert!(matches!(
            parse_combined_json(&output, "Missing"),
            Err(SolcError::ContractNotFound(_))
        ));
    }

    #[test]
    fn abstract_contract_has_no_bytecode() {
        let output = r#"{"contracts":{"<stdin>:IToken":{"abi":[],"bin":""}}}"#;
        assert!(matches!(
            parse_combined_json(output, "IToken"),
            Err(SolcError::EmptyBytecode(_))
        ));
    }

    #[tokio::test]
    async fn missing_executable() {
        let solc = Solc::new("/nonexistent/solc");
        assert!(matches!(
            solc.compile_source("contract A {}", "A").await,
            Err(SolcError::NotFound(_))
        ));
    }
}
