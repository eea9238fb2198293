// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Deposit stage: supply a token amount into the lending pool.

use alloy::primitives::Address;
use tracing::info;

use super::submit_and_confirm;
use crate::blockchain::contracts::LendingPool;
use crate::blockchain::{Chain, ConfirmedTransaction, TokenAmount};
use crate::error::PipelineError;

/// Referral code passed to `supply`; 0 means no referral.
pub const REFERRAL_CODE: u16 = 0;

/// Supply `amount` of `token` to `pool` on behalf of `on_behalf_of`.
///
/// The balance is not re-read after confirmation.
pub async fn deposit<C: Chain>(
    chain: &C,
    pool: &LendingPool,
    token: Address,
    amount: TokenAmount,
    on_behalf_of: Address,
) -> Result<ConfirmedTransaction, PipelineError> {
    info!(
        stage = "supply",
        amount = %amount,
        pool = %pool.address(),
        "Supplying token to lending pool"
    );

    let intent = pool.supply(token, amount.raw(), on_behalf_of, REFERRAL_CODE);
    submit_and_confirm(chain, intent).await
}
