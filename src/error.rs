// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Error taxonomy shared by every pipeline stage.

/// Errors that can occur while preparing or running the pipeline.
///
/// Stages never recover locally: each variant is propagated unchanged to the
/// orchestrator, which records it and ends the run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    /// Malformed, zero or negative amount, detected before any submission.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// RPC rejection, reverted execution, or a failed confirmation wait.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// A balance, decimals or allowance query could not be completed.
    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid private key: {0}")]
    Signer(String),
}

impl PipelineError {
    /// Short machine-friendly name of the variant, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidAmount(_) => "invalid_amount",
            Self::TransactionFailed(_) => "transaction_failed",
            Self::ReadFailed(_) => "read_failed",
            Self::Config(_) => "config",
            Self::Signer(_) => "signer",
        }
    }
}
