// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blockchain types and constants.

use alloy::{
    primitives::{Address, BlockHash, Bytes, TxHash, U256},
    rpc::types::TransactionRequest,
    sol_types::SolCall,
};

use super::amount::TokenAmount;

/// Known EVM network metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkConfig {
    /// Network name for display
    pub name: &'static str,
    /// Chain ID
    pub chain_id: u64,
    /// Block explorer URL
    pub explorer_url: Option<&'static str>,
}

/// Ethereum mainnet configuration.
pub const ETHEREUM_MAINNET: NetworkConfig = NetworkConfig {
    name: "Ethereum Mainnet",
    chain_id: 1,
    explorer_url: Some("https://etherscan.io"),
};

/// Ethereum Sepolia testnet configuration.
pub const SEPOLIA: NetworkConfig = NetworkConfig {
    name: "Sepolia Testnet",
    chain_id: 11_155_111,
    explorer_url: Some("https://sepolia.etherscan.io"),
};

impl NetworkConfig {
    /// Metadata for a chain id, falling back to an anonymous network.
    pub fn for_chain_id(chain_id: u64) -> Self {
        [ETHEREUM_MAINNET, SEPOLIA]
            .into_iter()
            .find(|n| n.chain_id == chain_id)
            .unwrap_or(NetworkConfig {
                name: "EVM network",
                chain_id,
                explorer_url: None,
            })
    }

    /// Explorer page for a transaction, when the network has an explorer.
    pub fn tx_url(&self, tx_hash: &TxHash) -> Option<String> {
        self.explorer_url
            .map(|base| format!("{}/tx/{:?}", base, tx_hash))
    }
}

/// A fully described, not yet submitted contract call.
///
/// Built from a typed `sol!` call so the selector and the encoded parameters
/// always agree. Fields are private: an intent cannot change after it is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionIntent {
    label: &'static str,
    to: Address,
    selector: [u8; 4],
    calldata: Bytes,
    value: U256,
}

impl TransactionIntent {
    pub fn new<C: SolCall>(label: &'static str, to: Address, call: &C, value: U256) -> Self {
        Self {
            label,
            to,
            selector: C::SELECTOR,
            calldata: call.abi_encode().into(),
            value,
        }
    }

    /// Human-readable name of the call, used in logs.
    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn to(&self) -> Address {
        self.to
    }

    pub fn selector(&self) -> [u8; 4] {
        self.selector
    }

    pub fn calldata(&self) -> &Bytes {
        &self.calldata
    }

    /// Native value attached to the call.
    pub fn value(&self) -> U256 {
        self.value
    }

    /// Decode the structured parameters back, if this intent is a `C` call.
    pub fn decode<C: SolCall>(&self) -> Option<C> {
        if self.selector != C::SELECTOR {
            return None;
        }
        C::abi_decode(&self.calldata).ok()
    }

    /// Unsigned request; nonce, gas and chain id are left to provider fillers.
    pub fn to_request(&self, from: Address) -> TransactionRequest {
        let mut tx = TransactionRequest::default()
            .from(from)
            .to(self.to)
            .input(self.calldata.clone().into());
        if !self.value.is_zero() {
            tx = tx.value(self.value);
        }
        tx
    }
}

/// Handle for a submitted transaction whose inclusion has not been observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTransaction {
    tx_hash: TxHash,
    label: &'static str,
}

impl PendingTransaction {
    pub fn new(tx_hash: TxHash, label: &'static str) -> Self {
        Self { tx_hash, label }
    }

    pub fn tx_hash(&self) -> TxHash {
        self.tx_hash
    }

    pub fn label(&self) -> &'static str {
        self.label
    }
}

/// Transaction receipt after confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    /// Block number where transaction was included
    pub block_number: u64,
    pub block_hash: Option<BlockHash>,
    /// Gas actually used
    pub gas_used: u64,
    /// Whether the transaction was successful
    pub success: bool,
}

/// A transaction the network has included in a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedTransaction {
    /// Hash returned at submission time
    pub tx_hash: TxHash,
    pub receipt: TxReceipt,
    /// Transaction hash as reported by the receipt
    pub receipt_hash: TxHash,
}

/// Allowance of `spender` over `owner`'s `token` balance, as read on-chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowanceState {
    pub owner: Address,
    pub spender: Address,
    pub token: Address,
    pub current: TokenAmount,
}
