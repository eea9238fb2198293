// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Allowance stage: make sure a spender may move the required amount.

use std::cmp::Ordering;

use alloy::primitives::Address;
use tracing::info;

use super::submit_and_confirm;
use crate::blockchain::contracts::Erc20;
use crate::blockchain::{AllowanceState, Chain, ConfirmedTransaction, TokenAmount};
use crate::error::PipelineError;

/// What the allowance stage did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowanceOutcome {
    /// Current allowance already covered the requirement; nothing submitted.
    AlreadySufficient(AllowanceState),
    /// An `approve` for exactly the required amount was mined.
    Approved(ConfirmedTransaction),
}

impl AllowanceOutcome {
    pub fn approval(&self) -> Option<&ConfirmedTransaction> {
        match self {
            Self::AlreadySufficient(_) => None,
            Self::Approved(tx) => Some(tx),
        }
    }
}

/// Read the current allowance of `spender` over the caller's `token`.
pub async fn read_allowance<C: Chain>(
    token: &Erc20<'_, C>,
    owner: Address,
    spender: Address,
    decimals: u8,
) -> Result<AllowanceState, PipelineError> {
    let raw = token.allowance(owner, spender).await?;
    Ok(AllowanceState {
        owner,
        spender,
        token: token.address(),
        current: TokenAmount::new(raw, decimals),
    })
}

/// Ensure `spender` may transfer at least `required` of `token` for the caller.
///
/// Skips the approval when `current >= required`. Otherwise approves exactly
/// `required`, replacing the previous allowance.
pub async fn ensure_allowance<C: Chain>(
    chain: &C,
    token: &Erc20<'_, C>,
    spender: Address,
    required: TokenAmount,
) -> Result<AllowanceOutcome, PipelineError> {
    let state = read_allowance(token, chain.signer(), spender, required.decimals()).await?;

    if state.current.checked_cmp(&required)? != Ordering::Less {
        info!(
            stage = "approve",
            current = %state.current,
            required = %required,
            "Allowance already sufficient"
        );
        return Ok(AllowanceOutcome::AlreadySufficient(state));
    }

    info!(
        stage = "approve",
        amount = %required,
        spender = %spender,
        "Approving token spend"
    );
    let intent = token.approve(spender, required.raw());
    let tx = submit_and_confirm(chain, intent).await?;

    Ok(AllowanceOutcome::Approved(tx))
}

#[cfg(test)]
mod tests {
    use alloy::primitives::U256;

    use super::*;
    use crate::blockchain::contracts::IERC20;
    use crate::blockchain::mock::MockChain;

    const OWNER: Address = Address::repeat_byte(0x0a);
    const DAI: Address = Address::repeat_byte(0xda);
    const POOL: Address = Address::repeat_byte(0x4f);

    fn dai(amount: &str) -> TokenAmount {
        TokenAmount::from_display(amount, 18).unwrap()
    }

    fn chain_with_allowance(current: &str) -> MockChain {
        MockChain::new(OWNER)
            .with_decimals(DAI, 18)
            .with_allowance(DAI, OWNER, POOL, dai(current).raw())
    }

    #[tokio::test]
    async fn sufficient_allowance_submits_nothing() {
        let chain = chain_with_allowance("300");
        let token = Erc20::new(&chain, DAI);

        let outcome = ensure_allowance(&chain, &token, POOL, dai("250")).await.unwrap();

        assert!(chain.submitted().is_empty());
        match outcome {
            AllowanceOutcome::AlreadySufficient(state) => {
                assert_eq!(state.owner, OWNER);
                assert_eq!(state.spender, POOL);
                assert_eq!(state.token, DAI);
                assert_eq!(state.current, dai("300"));
            }
            other => panic!("expected no approval, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn equal_allowance_is_sufficient() {
        let chain = chain_with_allowance("250");
        let token = Erc20::new(&chain, DAI);

        let outcome = ensure_allowance(&chain, &token, POOL, dai("250")).await.unwrap();

        assert!(outcome.approval().is_none());
        assert!(chain.submitted().is_empty());
    }

    #[tokio::test]
    async fn insufficient_allowance_approves_exact_requirement() {
        let chain = chain_with_allowance("100");
        let token = Erc20::new(&chain, DAI);

        let outcome = ensure_allowance(&chain, &token, POOL, dai("250")).await.unwrap();

        assert!(outcome.approval().is_some());
        let approvals = chain.submitted_calls::<IERC20::approveCall>();
        assert_eq!(approvals.len(), 1);
        assert_eq!(approvals[0].spender, POOL);
        assert_eq!(approvals[0].amount, dai("250").raw());
        assert_eq!(chain.submitted()[0].to(), DAI);
        assert_eq!(chain.allowance(DAI, OWNER, POOL), dai("250").raw());
    }

    #[tokio::test]
    async fn zero_allowance_approves_once() {
        let chain = MockChain::new(OWNER).with_decimals(DAI, 18);
        let token = Erc20::new(&chain, DAI);

        ensure_allowance(&chain, &token, POOL, TokenAmount::new(U256::from(1u64), 18))
            .await
            .unwrap();

        assert_eq!(chain.submitted().len(), 1);
    }

    #[tokio::test]
    async fn approval_failure_propagates() {
        let chain = chain_with_allowance("0").reject::<IERC20::approveCall>();
        let token = Erc20::new(&chain, DAI);

        let err = ensure_allowance(&chain, &token, POOL, dai("250")).await.unwrap_err();

        assert!(matches!(err, PipelineError::TransactionFailed(_)));
        assert_eq!(chain.submitted().len(), 1);
    }

    #[tokio::test]
    async fn allowance_read_failure_submits_nothing() {
        let chain = chain_with_allowance("0").fail_reads();
        let token = Erc20::new(&chain, DAI);

        let err = ensure_allowance(&chain, &token, POOL, dai("250")).await.unwrap_err();

        assert!(matches!(err, PipelineError::ReadFailed(_)));
        assert!(chain.submitted().is_empty());
    }
}
