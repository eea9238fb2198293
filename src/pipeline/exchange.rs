// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Exchange stage: swap the native asset for the stablecoin.

use alloy::primitives::{aliases::U160, U256};
use tracing::info;

use super::submit_and_confirm;
use crate::blockchain::contracts::{Erc20, ExactInputSingleParams, SwapRouter};
use crate::blockchain::{Chain, ConfirmedTransaction, TokenAmount};
use crate::config::PipelineParams;
use crate::error::PipelineError;

/// Precision of the native asset.
pub const NATIVE_DECIMALS: u8 = 18;

/// Result of a confirmed swap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapOutcome {
    pub tx: ConfirmedTransaction,
    /// Caller's total stablecoin balance after the swap.
    ///
    /// This is not the swap output when the wallet held stablecoin
    /// beforehand: any prior balance is included.
    pub received: TokenAmount,
}

/// Parse and validate the native input amount. Zero is rejected.
pub fn parse_swap_amount(amount_in: &str) -> Result<TokenAmount, PipelineError> {
    let amount = TokenAmount::from_display(amount_in, NATIVE_DECIMALS)?;
    if amount.is_zero() {
        return Err(PipelineError::InvalidAmount(
            "swap amount must be positive".to_string(),
        ));
    }
    Ok(amount)
}

/// Swap `amount_in` of the native asset for the configured stablecoin and
/// report the caller's resulting stablecoin balance.
pub async fn swap<C: Chain>(
    chain: &C,
    params: &PipelineParams,
    amount_in: &str,
) -> Result<SwapOutcome, PipelineError> {
    let tx = submit_swap(chain, params, amount_in).await?;

    let received = Erc20::new(chain, params.contracts.stablecoin)
        .balance(chain.signer())
        .await?;
    info!(stage = "swap", balance = %received, "Stablecoin balance after swap");

    Ok(SwapOutcome { tx, received })
}

/// Submit the swap and wait for it to be mined, without reading balances.
///
/// No slippage protection (`amountOutMinimum = 0`) and no price limit. The
/// native value is attached to the call; the router wraps it itself.
pub async fn submit_swap<C: Chain>(
    chain: &C,
    params: &PipelineParams,
    amount_in: &str,
) -> Result<ConfirmedTransaction, PipelineError> {
    let amount_in = parse_swap_amount(amount_in)?;
    let contracts = &params.contracts;

    let router = SwapRouter::new(contracts.swap_router);
    let intent = router.exact_input_single(
        ExactInputSingleParams {
            tokenIn: contracts.wrapped_native,
            tokenOut: contracts.stablecoin,
            fee: params.pool_fee,
            recipient: chain.signer(),
            amountIn: amount_in.raw(),
            amountOutMinimum: U256::ZERO,
            sqrtPriceLimitX96: U160::ZERO,
        },
        amount_in.raw(),
    );

    info!(
        stage = "swap",
        amount = %amount_in,
        token_out = %contracts.stablecoin,
        "Swapping native asset for stablecoin"
    );
    submit_and_confirm(chain, intent).await
}
