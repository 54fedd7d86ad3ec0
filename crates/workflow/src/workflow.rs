// Copyright 2021 Gnosis Ltd.
// SPDX-License-Identifier: Apache-2.0

use crate::{
    config::{BALANCE_METHOD, TRANSFER_METHOD},
    confirm::Confirmation,
    contract::{deploy_payload, uint_output, ContractHandle},
    gas::bump_gas_price,
    Config, Error, Step,
};
use deployer_core::{
    hex, transaction::create_address, Address, Bytes, CallType, ChainId, LegacyData, Session,
    Transaction, H256, U256,
};
use ethabi::Token;
use interfaces::{BlockTag, Compiler, EthRpc};
use log::*;
use std::{io, path::Path, sync::Arc};

/// Values observed and used during a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub chain_id: ChainId,
    pub suggested_gas_price: U256,
    pub gas_price: U256,
    pub native_balance: U256,
    pub deploy_nonce: U256,
    pub transfer_nonce: U256,
    pub contract_address: Address,
    pub deploy_tx: H256,
    pub transfer_tx: H256,
    /// Sender token balance right after deployment.
    pub initial_balance: U256,
    pub destination_balance: U256,
    /// Sender token balance after the transfer.
    pub sender_balance: U256,
}

/// Compiles the token, deploys it and transfers part of the allocation.
///
/// Every step runs to completion before the next one starts and any failure
/// ends the run. Nothing is retried.
pub struct DeployAndInvoke {
    config: Config,
    rpc: Arc<dyn EthRpc>,
    compiler: Arc<dyn Compiler>,
}

impl DeployAndInvoke {
    pub fn new(config: Config, rpc: Arc<dyn EthRpc>, compiler: Arc<dyn Compiler>) -> Self {
        DeployAndInvoke {
            config,
            rpc,
            compiler,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn run(&self, session: &mut Session, destination: Address) -> Result<Report, Error> {
        let sender = session.address();

        info!("{}: reading {:?}", Step::LoadSource, self.config.source);
        let source = load_source(&self.config.source).await?;

        info!("{}: sending from {:?}", Step::Connect, sender);

        let artifact = self
            .compiler
            .compile(&source, &self.config.contract)
            .await
            .map_err(Error::Compile)?;
        info!(
            "{}: {} compiled, {} bytes of bytecode",
            Step::Compile,
            artifact.contract,
            artifact.bytecode.len()
        );

        let step = Step::PriceAndNonce;
        let chain_id = self.rpc.chain_id().await.map_err(Error::rpc(step))?;
        let suggested_gas_price = self.rpc.gas_price().await.map_err(Error::rpc(step))?;
        let gas_price = bump_gas_price(suggested_gas_price, self.config.gas_price_bump_percent)
            .ok_or(Error::GasPriceOverflow(suggested_gas_price))?;
        let nonce = self
            .rpc
            .transaction_count(sender, BlockTag::Pending)
            .await
            .map_err(Error::rpc(step))?;
        session.sync_nonce(nonce);
        let native_balance = self
            .rpc
            .balance(sender, BlockTag::Latest)
            .await
            .map_err(Error::rpc(step))?;
        info!(
            "{}: chain id {}, gas price {} (suggested {}), nonce {}, balance {} wei",
            step, chain_id, gas_price, suggested_gas_price, nonce, native_balance
        );

        let payload = deploy_payload(&artifact.abi, artifact.bytecode, &[])?;
        let deploy_nonce = session.next_nonce()?;
        let tx = self.sign(session, deploy_nonce, gas_price, CallType::Create, payload, chain_id)?;
        let deploy_tx = self
            .rpc
            .send_raw_transaction(tx.rlp_bytes())
            .await
            .map_err(Error::rpc(Step::DeployTx))?;
        info!("{}: submitted {:?} with nonce {}", Step::DeployTx, deploy_tx, deploy_nonce);

        let receipt = self
            .confirmation()
            .wait(&*self.rpc, deploy_tx, Step::AwaitReceipt)
            .await?;
        let contract_address = receipt
            .contract_address
            .ok_or(Error::MissingContractAddress(deploy_tx))?;
        let derived = create_address(&sender, &deploy_nonce);
        if derived != contract_address {
            warn!(
                "Contract deployed at {:?}, expected {:?} from sender and nonce",
                contract_address, derived
            );
        }
        info!(
            "{}: contract at {:?} in block {:?}",
            Step::AwaitReceipt,
            contract_address,
            receipt.block_number
        );
        let token = ContractHandle::new(contract_address, artifact.abi);

        let initial_balance = self.balance_of(&token, sender, Step::ReadBalance1).await?;
        info!("{}: {:?} holds {}", Step::ReadBalance1, sender, initial_balance);
        expect_balance(
            Step::AssertBalance1,
            sender,
            self.config.expected_initial_balance,
            initial_balance,
        )?;

        let transfer = token
            .method(TRANSFER_METHOD)?
            .arg(Token::Address(destination))
            .arg(Token::Uint(self.config.transfer_amount))
            .encode()?;
        let transfer_nonce = session.next_nonce()?;
        let tx = self.sign(
            session,
            transfer_nonce,
            gas_price,
            CallType::Call(contract_address),
            transfer,
            chain_id,
        )?;
        debug!(
            "{}: transfer of {} to {:?} with nonce {}",
            Step::BuildTransferTx,
            self.config.transfer_amount,
            destination,
            transfer_nonce
        );

        let step = Step::SignAndSubmit;
        let transfer_tx = self
            .rpc
            .send_raw_transaction(tx.rlp_bytes())
            .await
            .map_err(Error::rpc(step))?;
        info!("{}: submitted {:?} with nonce {}", step, transfer_tx, transfer_nonce);
        self.confirmation().wait(&*self.rpc, transfer_tx, step).await?;

        let destination_balance = self
            .balance_of(&token, destination, Step::ReadBalance2)
            .await?;
        let sender_balance = self.balance_of(&token, sender, Step::ReadBalance2).await?;
        info!(
            "{}: {:?} holds {}, {:?} holds {}",
            Step::ReadBalance2,
            destination,
            destination_balance,
            sender,
            sender_balance
        );
        expect_balance(
            Step::AssertBalance2,
            destination,
            self.config.expected_final_balance,
            destination_balance,
        )?;

        info!("{}", Step::Done);
        Ok(Report {
            chain_id,
            suggested_gas_price,
            gas_price,
            native_balance,
            deploy_nonce,
            transfer_nonce,
            contract_address,
            deploy_tx,
            transfer_tx,
            initial_balance,
            destination_balance,
            sender_balance,
        })
    }

    fn confirmation(&self) -> Confirmation {
        Confirmation::new(self.config.receipt_timeout, self.config.poll_interval)
    }

    fn sign(
        &self,
        session: &Session,
        nonce: U256,
        gas_price: U256,
        call_type: CallType,
        data: Bytes,
        chain_id: ChainId,
    ) -> Result<Transaction, Error> {
        let data = LegacyData {
            nonce,
            gas_price,
            gas_limit: self.config.gas_limit,
            call_type,
            value: U256::zero(),
            data,
        };
        Ok(Transaction::sign(data, session.key(), Some(chain_id))?)
    }

    async fn balance_of(
        &self,
        token: &ContractHandle,
        account: Address,
        step: Step,
    ) -> Result<U256, Error> {
        let call = token.method(BALANCE_METHOD)?.arg(Token::Address(account));
        let output = self
            .rpc
            .call(call.call_request()?, BlockTag::Latest)
            .await
            .map_err(Error::rpc(step))?;
        call.decode_output(&output)
            .ok()
            .and_then(|tokens| uint_output(&tokens))
            .ok_or_else(|| Error::UnexpectedOutput {
                method: call.name().to_owned(),
                output: hex::encode(&output),
            })
    }
}

async fn load_source(path: &Path) -> Result<String, Error> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|error| match error.kind() {
            io::ErrorKind::NotFound => Error::SourceNotFound(path.to_path_buf()),
            _ => Error::SourceRead {
                path: path.to_path_buf(),
                error,
            },
        })
}

fn expect_balance(step: Step, account: Address, expected: U256, observed: U256) -> Result<(), Error> {
    if observed != expected {
        return Err(Error::BalanceMismatch {
            step,
            account,
            expected,
            observed,
        });
    }
    Ok(())
}
