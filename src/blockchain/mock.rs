// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory chain used by unit tests.
//!
//! Simulates the token, router and pool entry points the pipeline uses.
//! Submissions are recorded; confirmations apply their effects immediately.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use alloy::{
    primitives::{keccak256, Address, Bytes, TxHash, U256},
    sol_types::{SolCall, SolValue},
};

use super::contracts::{IPool, ISwapRouter, IERC20};
use super::types::*;
use super::Chain;
use crate::error::PipelineError;

#[derive(Default)]
struct MockState {
    decimals: HashMap<Address, u8>,
    balances: HashMap<(Address, Address), U256>,
    allowances: HashMap<(Address, Address, Address), U256>,
    supplied: HashMap<(Address, Address), U256>,
    swap_output: U256,
    rejected: HashSet<[u8; 4]>,
    reverted: HashSet<[u8; 4]>,
    fail_reads: bool,
    submitted: Vec<TransactionIntent>,
    pending: HashMap<TxHash, TransactionIntent>,
    reads: usize,
    block: u64,
}

/// Simulated chain for a single signer.
pub struct MockChain {
    signer: Address,
    state: Mutex<MockState>,
}

impl MockChain {
    pub fn new(signer: Address) -> Self {
        Self {
            signer,
            state: Mutex::new(MockState::default()),
        }
    }

    fn with(self, f: impl FnOnce(&mut MockState)) -> Self {
        f(&mut self.state.lock().unwrap());
        self
    }

    pub fn with_decimals(self, token: Address, decimals: u8) -> Self {
        self.with(|s| {
            s.decimals.insert(token, decimals);
        })
    }

    pub fn with_balance(self, token: Address, owner: Address, amount: U256) -> Self {
        self.with(|s| {
            s.balances.insert((token, owner), amount);
        })
    }

    pub fn with_allowance(self, token: Address, owner: Address, spender: Address, amount: U256) -> Self {
        self.with(|s| {
            s.allowances.insert((token, owner, spender), amount);
        })
    }

    /// Amount of the output token credited to the recipient of each swap.
    pub fn with_swap_output(self, amount: U256) -> Self {
        self.with(|s| s.swap_output = amount)
    }

    /// Make the node refuse to accept `K` calls at submission time.
    pub fn reject<K: SolCall>(self) -> Self {
        self.with(|s| {
            s.rejected.insert(K::SELECTOR);
        })
    }

    /// Accept `K` calls but mine them as reverted.
    pub fn revert<K: SolCall>(self) -> Self {
        self.with(|s| {
            s.reverted.insert(K::SELECTOR);
        })
    }

    pub fn fail_reads(self) -> Self {
        self.with(|s| s.fail_reads = true)
    }

    /// Every intent passed to `submit`, in order, including rejected ones.
    pub fn submitted(&self) -> Vec<TransactionIntent> {
        self.state.lock().unwrap().submitted.clone()
    }

    /// Decoded parameters of every submitted `K` call.
    pub fn submitted_calls<K: SolCall>(&self) -> Vec<K> {
        self.submitted().iter().filter_map(|i| i.decode::<K>()).collect()
    }

    pub fn read_count(&self) -> usize {
        self.state.lock().unwrap().reads
    }

    pub fn balance(&self, token: Address, owner: Address) -> U256 {
        let state = self.state.lock().unwrap();
        state.balances.get(&(token, owner)).copied().unwrap_or_default()
    }

    pub fn allowance(&self, token: Address, owner: Address, spender: Address) -> U256 {
        let state = self.state.lock().unwrap();
        state.allowances.get(&(token, owner, spender)).copied().unwrap_or_default()
    }

    pub fn supplied(&self, asset: Address, on_behalf_of: Address) -> U256 {
        let state = self.state.lock().unwrap();
        state.supplied.get(&(asset, on_behalf_of)).copied().unwrap_or_default()
    }
}

fn reverted(reason: impl Into<String>) -> PipelineError {
    PipelineError::TransactionFailed(format!("execution reverted: {}", reason.into()))
}

impl MockState {
    fn execute(&mut self, signer: Address, intent: &TransactionIntent) -> Result<(), PipelineError> {
        if self.reverted.contains(&intent.selector()) {
            return Err(reverted(intent.label()));
        }

        if let Some(call) = intent.decode::<IERC20::approveCall>() {
            self.allowances.insert((intent.to(), signer, call.spender), call.amount);
        } else if let Some(call) = intent.decode::<ISwapRouter::exactInputSingleCall>() {
            let params = call.params;
            if intent.value() != params.amountIn {
                return Err(reverted("value does not match amountIn"));
            }
            *self.balances.entry((params.tokenOut, params.recipient)).or_default() += self.swap_output;
        } else if let Some(call) = intent.decode::<IPool::supplyCall>() {
            let allowance_key = (call.asset, signer, intent.to());
            let balance_key = (call.asset, signer);
            if self.allowances.get(&allowance_key).copied().unwrap_or_default() < call.amount {
                return Err(reverted("ERC20: insufficient allowance"));
            }
            if self.balances.get(&balance_key).copied().unwrap_or_default() < call.amount {
                return Err(reverted("ERC20: transfer amount exceeds balance"));
            }
            *self.allowances.entry(allowance_key).or_default() -= call.amount;
            *self.balances.entry(balance_key).or_default() -= call.amount;
            *self.supplied.entry((call.asset, call.onBehalfOf)).or_default() += call.amount;
        } else {
            return Err(reverted("unknown selector"));
        }
        Ok(())
    }

    fn call(&self, to: Address, calldata: &[u8]) -> Option<Bytes> {
        let selector: [u8; 4] = calldata.get(..4)?.try_into().ok()?;
        let encoded = if selector == IERC20::balanceOfCall::SELECTOR {
            let call = IERC20::balanceOfCall::abi_decode(calldata).ok()?;
            self.balances.get(&(to, call.account)).copied().unwrap_or_default().abi_encode()
        } else if selector == IERC20::allowanceCall::SELECTOR {
            let call = IERC20::allowanceCall::abi_decode(calldata).ok()?;
            self.allowances
                .get(&(to, call.owner, call.spender))
                .copied()
                .unwrap_or_default()
                .abi_encode()
        } else if selector == IERC20::decimalsCall::SELECTOR {
            IERC20::decimalsCall::abi_encode_returns(&self.decimals.get(&to).copied()?)
        } else {
            return None;
        };
        Some(encoded.into())
    }
}

impl Chain for MockChain {
    fn signer(&self) -> Address {
        self.signer
    }

    async fn read(&self, to: Address, calldata: Bytes) -> Result<Bytes, PipelineError> {
        let mut state = self.state.lock().unwrap();
        state.reads += 1;
        if state.fail_reads {
            return Err(PipelineError::ReadFailed("connection refused".to_string()));
        }
        state
            .call(to, &calldata)
            .ok_or_else(|| PipelineError::ReadFailed(format!("eth_call to {} reverted", to)))
    }

    async fn submit(&self, intent: TransactionIntent) -> Result<PendingTransaction, PipelineError> {
        let mut state = self.state.lock().unwrap();
        state.submitted.push(intent.clone());
        if state.rejected.contains(&intent.selector()) {
            return Err(PipelineError::TransactionFailed(format!(
                "Failed to send {}: node rejected transaction",
                intent.label()
            )));
        }

        let nonce = state.submitted.len() as u64;
        let tx_hash = keccak256(nonce.to_be_bytes());
        let pending = PendingTransaction::new(tx_hash, intent.label());
        state.pending.insert(tx_hash, intent);
        Ok(pending)
    }

    async fn wait_for_confirmation(
        &self,
        pending: PendingTransaction,
    ) -> Result<ConfirmedTransaction, PipelineError> {
        let mut state = self.state.lock().unwrap();
        let intent = state
            .pending
            .remove(&pending.tx_hash())
            .ok_or_else(|| PipelineError::TransactionFailed("unknown transaction".to_string()))?;

        state.block += 1;
        let success = state.execute(self.signer, &intent);
        let block_number = state.block;
        success?;

        Ok(ConfirmedTransaction {
            tx_hash: pending.tx_hash(),
            receipt: TxReceipt {
                block_number,
                block_hash: Some(keccak256(block_number.to_be_bytes())),
                gas_used: 21_000,
                success: true,
            },
            receipt_hash: pending.tx_hash(),
        })
    }
}
