// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Swap and Supply Pipeline
//!
//! Runs the three stages strictly in order, one transaction at a time:
//!
//! ```text
//! Start -> Swapping -> PostSwapCheck -> Approving -> Depositing -> Done
//!                                   \-> Aborted (stablecoin balance is zero)
//! ```
//!
//! Any stage error moves the run to `Failed`. Transactions confirmed before
//! the failure stay confirmed; nothing is rolled back.
//!
//! The post-swap gate reads the signer's *total* stablecoin balance, so a
//! wallet that already held stablecoin proceeds (and deposits everything)
//! even if the swap itself produced nothing.

use std::fmt;

use alloy::primitives::Address;
use tracing::{error, info};

use crate::blockchain::contracts::{Erc20, LendingPool};
use crate::blockchain::{Chain, ConfirmedTransaction, TokenAmount, TransactionIntent};
use crate::config::PipelineParams;
use crate::error::PipelineError;

pub mod allowance;
pub mod deposit;
pub mod exchange;

pub use allowance::AllowanceOutcome;

/// Submit an intent and wait for it to be mined.
pub async fn submit_and_confirm<C: Chain>(
    chain: &C,
    intent: TransactionIntent,
) -> Result<ConfirmedTransaction, PipelineError> {
    let label = intent.label();
    let pending = chain.submit(intent).await?;
    info!(call = label, tx_hash = %pending.tx_hash(), "Transaction submitted, waiting for confirmation");

    let confirmed = chain.wait_for_confirmation(pending).await?;
    info!(
        call = label,
        tx_hash = %confirmed.receipt_hash,
        block = confirmed.receipt.block_number,
        "Transaction confirmed"
    );
    Ok(confirmed)
}

/// Position of a run in the pipeline state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Start,
    Swapping,
    PostSwapCheck,
    Approving,
    Depositing,
    Done,
    Aborted,
    Failed,
}

impl PipelineState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Aborted | Self::Failed)
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::Swapping => "swapping",
            Self::PostSwapCheck => "post_swap_check",
            Self::Approving => "approving",
            Self::Depositing => "depositing",
            Self::Done => "done",
            Self::Aborted => "aborted",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Mutable state of a single run.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    pub signer: Address,
    pub state: PipelineState,
    /// Amount carried into the next stage, once known.
    pub running_amount: Option<TokenAmount>,
}

impl PipelineContext {
    fn new(signer: Address) -> Self {
        Self {
            signer,
            state: PipelineState::Start,
            running_amount: None,
        }
    }

    fn advance(&mut self, next: PipelineState) {
        tracing::debug!(from = %self.state, to = %next, "Pipeline transition");
        self.state = next;
    }
}

/// Everything a finished run observed.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub state: PipelineState,
    pub error: Option<PipelineError>,
    pub swap: Option<ConfirmedTransaction>,
    /// Stablecoin balance read at the post-swap gate
    pub swapped: Option<TokenAmount>,
    pub allowance: Option<AllowanceOutcome>,
    pub deposit: Option<ConfirmedTransaction>,
}

impl PipelineReport {
    fn new() -> Self {
        Self {
            state: PipelineState::Start,
            error: None,
            swap: None,
            swapped: None,
            allowance: None,
            deposit: None,
        }
    }

    /// `Done` and `Aborted` are both successful outcomes.
    pub fn is_success(&self) -> bool {
        matches!(self.state, PipelineState::Done | PipelineState::Aborted)
    }
}

/// Sequential orchestrator over one chain connection.
pub struct Pipeline<'a, C> {
    chain: &'a C,
    params: &'a PipelineParams,
}

impl<'a, C: Chain> Pipeline<'a, C> {
    pub fn new(chain: &'a C, params: &'a PipelineParams) -> Self {
        Self { chain, params }
    }

    /// Run the pipeline once. Errors are captured in the report, never raised.
    pub async fn run(&self) -> PipelineReport {
        let mut ctx = PipelineContext::new(self.chain.signer());
        let mut report = PipelineReport::new();

        if let Err(e) = self.execute(&mut ctx, &mut report).await {
            error!(state = %ctx.state, kind = e.kind(), error = %e, "Pipeline failed");
            ctx.advance(PipelineState::Failed);
            report.error = Some(e);
        }

        report.state = ctx.state;
        report
    }

    async fn execute(
        &self,
        ctx: &mut PipelineContext,
        report: &mut PipelineReport,
    ) -> Result<(), PipelineError> {
        let contracts = &self.params.contracts;

        ctx.advance(PipelineState::Swapping);
        // recorded before any read so a later failure still reports it
        let swap = exchange::submit_swap(self.chain, self.params, &self.params.swap_amount).await?;
        report.swap = Some(swap);

        ctx.advance(PipelineState::PostSwapCheck);
        let stablecoin = Erc20::new(self.chain, contracts.stablecoin);
        let balance = stablecoin.balance(ctx.signer).await?;
        ctx.running_amount = Some(balance);
        report.swapped = Some(balance);
        info!(balance = %balance, "Stablecoin balance");

        if balance.is_zero() {
            info!("No stablecoin received from swap, stopping");
            ctx.advance(PipelineState::Aborted);
            return Ok(());
        }

        ctx.advance(PipelineState::Approving);
        let approval =
            allowance::ensure_allowance(self.chain, &stablecoin, contracts.lending_pool, balance)
                .await?;
        report.allowance = Some(approval);

        ctx.advance(PipelineState::Depositing);
        let pool = LendingPool::new(contracts.lending_pool);
        let tx = deposit::deposit(self.chain, &pool, stablecoin.address(), balance, ctx.signer).await?;
        report.deposit = Some(tx);

        ctx.advance(PipelineState::Done);
        info!(amount = %balance, "Process completed successfully");
        Ok(())
    }
}
