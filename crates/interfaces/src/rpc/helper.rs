// Copyright 2020-2021 Gnosis Ltd.
// SPDX-License-Identifier: Apache-2.0

//! In-memory node that understands exactly one token contract.
//!
//! Signed transactions are decoded and their author recovered, so nonce
//! handling and signing are exercised as on a real chain. Every RPC method
//! call is recorded.

use super::*;
use anyhow::{anyhow, bail};
use deployer_core::{transaction::create_address, CallType, Transaction, U64};
use ethabi::{ParamType, Token};
use keccak_hash::keccak;
use parking_lot::Mutex;
use std::collections::HashMap;

pub const TRANSFER_SIGNATURE: &str = "transfer(address,uint256)";
pub const BALANCE_OF_SIGNATURE: &str = "balanceOf(address)";

pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak(signature.as_bytes());
    let mut out = [0u8; 4];
    out.copy_from_slice(&hash.as_bytes()[..4]);
    out
}

struct TokenState {
    address: Address,
    balances: HashMap<Address, U256>,
}

struct NodeState {
    chain_id: ChainId,
    gas_price: U256,
    nonces: HashMap<Address, U256>,
    native_balances: HashMap<Address, U256>,
    initial_supply: U256,
    token: Option<TokenState>,
    receipts: HashMap<H256, Receipt>,
    submitted: Vec<Transaction>,
    invocations: Vec<&'static str>,
    balance_override: Option<U256>,
    polls_before_mined: usize,
    never_mine: bool,
    fail_transactions: bool,
    block_number: u64,
}

pub struct MockNode {
    state: Mutex<NodeState>,
}

impl Default for MockNode {
    fn default() -> Self {
        MockNode::new()
    }
}

impl MockNode {
    pub fn new() -> MockNode {
        MockNode {
            state: Mutex::new(NodeState {
                chain_id: 1337,
                gas_price: 1_000_000_000u64.into(),
                nonces: HashMap::new(),
                native_balances: HashMap::new(),
                initial_supply: 1_000_000.into(),
                token: None,
                receipts: HashMap::new(),
                submitted: Vec::new(),
                invocations: Vec::new(),
                balance_override: None,
                polls_before_mined: 0,
                never_mine: false,
                fail_transactions: false,
                block_number: 0,
            }),
        }
    }

    pub fn with_chain_id(self, chain_id: ChainId) -> Self {
        self.state.lock().chain_id = chain_id;
        self
    }

    pub fn with_gas_price(self, gas_price: U256) -> Self {
        self.state.lock().gas_price = gas_price;
        self
    }

    pub fn with_nonce(self, account: Address, nonce: U256) -> Self {
        self.state.lock().nonces.insert(account, nonce);
        self
    }

    pub fn with_native_balance(self, account: Address, balance: U256) -> Self {
        self.state.lock().native_balances.insert(account, balance);
        self
    }

    /// Token balance the deployer is credited with on contract creation.
    pub fn with_initial_supply(self, supply: U256) -> Self {
        self.state.lock().initial_supply = supply;
        self
    }

    /// Every `balanceOf` call answers `value` regardless of the token state.
    pub fn with_balance_override(self, value: U256) -> Self {
        self.state.lock().balance_override = Some(value);
        self
    }

    /// Each receipt is reported missing for `polls` queries before it shows up.
    pub fn with_receipt_delay(self, polls: usize) -> Self {
        self.state.lock().polls_before_mined = polls;
        self
    }

    pub fn never_mine(self) -> Self {
        self.state.lock().never_mine = true;
        self
    }

    /// Transactions are accepted and mined with failed status.
    pub fn fail_transactions(self) -> Self {
        self.state.lock().fail_transactions = true;
        self
    }

    /// Names of the RPC methods invoked so far, in order.
    pub fn invocations(&self) -> Vec<&'static str> {
        self.state.lock().invocations.clone()
    }

    pub fn invocation_count(&self, method: &str) -> usize {
        self.state
            .lock()
            .invocations
            .iter()
            .filter(|m| **m == method)
            .count()
    }

    /// Decoded transactions accepted by `eth_sendRawTransaction`.
    pub fn submitted(&self) -> Vec<Transaction> {
        self.state.lock().submitted.clone()
    }

    pub fn token_address(&self) -> Option<Address> {
        self.state.lock().token.as_ref().map(|t| t.address)
    }

    pub fn token_balance(&self, account: &Address) -> U256 {
        self.state
            .lock()
            .token
            .as_ref()
            .and_then(|t| t.balances.get(account).cloned())
            .unwrap_or_default()
    }

    fn record(&self, method: &'static str) {
        self.state.lock().invocations.push(method);
    }
}

impl NodeState {
    fn execute(&mut self, author: Address, tx: &Transaction) -> (bool, Option<Address>) {
        if self.fail_transactions {
            return (false, None);
        }
        let data = tx.data();
        match data.call_type {
            CallType::Create => {
                let address = create_address(&author, &data.nonce);
                let mut balances = HashMap::new();
                balances.insert(author, self.initial_supply);
                self.token = Some(TokenState { address, balances });
                (true, Some(address))
            }
            CallType::Call(to) => {
                let token = match self.token.as_mut() {
                    Some(token) if token.address == to => token,
                    _ => return (true, None),
                };
                if data.data.len() < 4 || data.data[..4] != selector(TRANSFER_SIGNATURE) {
                    return (false, None);
                }
                let args = match ethabi::decode(
                    &[ParamType::Address, ParamType::Uint(256)],
                    &data.data[4..],
                ) {
                    Ok(args) => args,
                    Err(_) => return (false, None),
                };
                let (recipient, amount) = match (&args[0], &args[1]) {
                    (Token::Address(recipient), Token::Uint(amount)) => (*recipient, *amount),
                    _ => return (false, None),
                };
                let from_balance = token.balances.get(&author).cloned().unwrap_or_default();
                if from_balance < amount {
                    return (false, None);
                }
                token.balances.insert(author, from_balance - amount);
                *token.balances.entry(recipient).or_default() += amount;
                (true, None)
            }
        }
    }
}

#[async_trait]
impl EthRpc for MockNode {
    async fn chain_id(&self) -> anyhow::Result<ChainId> {
        self.record("eth_chainId");
        Ok(self.state.lock().chain_id)
    }

    async fn gas_price(&self) -> anyhow::Result<U256> {
        self.record("eth_gasPrice");
        Ok(self.state.lock().gas_price)
    }

    async fn transaction_count(&self, address: Address, _block: BlockTag) -> anyhow::Result<U256> {
        self.record("eth_getTransactionCount");
        Ok(self
            .state
            .lock()
            .nonces
            .get(&address)
            .cloned()
            .unwrap_or_default())
    }

    async fn balance(&self, address: Address, _block: BlockTag) -> anyhow::Result<U256> {
        self.record("eth_getBalance");
        Ok(self
            .state
            .lock()
            .native_balances
            .get(&address)
            .cloned()
            .unwrap_or_default())
    }

    async fn send_raw_transaction(&self, raw: Bytes) -> anyhow::Result<H256> {
        self.record("eth_sendRawTransaction");
        let mut tx = Transaction::decode(&raw).map_err(|e| anyhow!("invalid rlp: {:?}", e))?;
        let (author, _) = tx
            .recover_author()
            .map_err(|e| anyhow!("invalid sender: {}", e))?;

        let mut state = self.state.lock();
        if tx.chain_id() != Some(state.chain_id) {
            bail!("invalid chain id {:?}", tx.chain_id());
        }
        let expected = state.nonces.get(&author).cloned().unwrap_or_default();
        if tx.data().nonce != expected {
            bail!(
                "nonce mismatch: expected {}, got {}",
                expected,
                tx.data().nonce
            );
        }
        state.nonces.insert(author, expected + U256::one());

        let (success, contract_address) = state.execute(author, &tx);
        state.block_number += 1;
        let receipt = Receipt {
            transaction_hash: tx.hash(),
            block_number: Some(U64::from(state.block_number)),
            contract_address,
            status: Some(U64::from(success as u64)),
            gas_used: Some(U256::from(21_000)),
        };
        state.receipts.insert(tx.hash(), receipt);
        let hash = tx.hash();
        state.submitted.push(tx);
        Ok(hash)
    }

    async fn transaction_receipt(&self, hash: H256) -> anyhow::Result<Option<Receipt>> {
        self.record("eth_getTransactionReceipt");
        let mut state = self.state.lock();
        if state.never_mine {
            return Ok(None);
        }
        if state.polls_before_mined > 0 {
            state.polls_before_mined -= 1;
            return Ok(None);
        }
        Ok(state.receipts.get(&hash).cloned())
    }

    async fn call(&self, request: CallRequest, _block: BlockTag) -> anyhow::Result<Bytes> {
        self.record("eth_call");
        let state = self.state.lock();
        let token = match state.token.as_ref() {
            Some(token) if token.address == request.to => token,
            _ => return Ok(Vec::new()),
        };
        if request.data.len() < 4 || request.data[..4] != selector(BALANCE_OF_SIGNATURE) {
            bail!("execution reverted");
        }
        let args = ethabi::decode(&[ParamType::Address], &request.data[4..])?;
        let account = match &args[0] {
            Token::Address(account) => *account,
            _ => bail!("execution reverted"),
        };
        let balance = state
            .balance_override
            .unwrap_or_else(|| token.balances.get(&account).cloned().unwrap_or_default());
        Ok(ethabi::encode(&[Token::Uint(balance)]))
    }
}
