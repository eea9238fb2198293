// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blockchain integration module for EVM chains.
//!
//! This module provides functionality for:
//! - Reading token balances, decimals and allowances
//! - Building typed contract calls (router, token, lending pool)
//! - Transaction signing, broadcasting and confirmation

use std::future::Future;

use alloy::primitives::{Address, Bytes};

use crate::error::PipelineError;

pub mod amount;
pub mod client;
pub mod contracts;
#[cfg(test)]
pub mod mock;
pub mod signing;
pub mod types;

pub use amount::{to_display, to_raw, TokenAmount};
pub use client::EvmClient;
pub use types::*;

/// Access to one signing identity on one network.
///
/// `EvmClient` talks to a JSON-RPC node; tests use an in-memory simulation.
/// Implementations are used strictly one operation at a time.
pub trait Chain {
    /// Address of the signing identity.
    fn signer(&self) -> Address;

    /// Read-only `eth_call` returning the raw ABI-encoded output.
    fn read(
        &self,
        to: Address,
        calldata: Bytes,
    ) -> impl Future<Output = Result<Bytes, PipelineError>> + Send;

    /// Sign and broadcast an intent. Returns as soon as the node accepts it.
    fn submit(
        &self,
        intent: TransactionIntent,
    ) -> impl Future<Output = Result<PendingTransaction, PipelineError>> + Send;

    /// Wait until the transaction is mined. There is no timeout: the wait is
    /// bounded only by network liveness.
    fn wait_for_confirmation(
        &self,
        pending: PendingTransaction,
    ) -> impl Future<Output = Result<ConfirmedTransaction, PipelineError>> + Send;
}
