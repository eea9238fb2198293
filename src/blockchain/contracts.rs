// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Typed bindings for the three contract roles the pipeline talks to.
//!
//! Read entry points go through [`Chain::read`] and return decoded values.
//! State-changing entry points only build a [`TransactionIntent`]; submitting
//! and waiting is left to the caller.

use alloy::{
    primitives::{Address, U256},
    sol,
    sol_types::SolCall,
};

use super::amount::TokenAmount;
use super::types::TransactionIntent;
use super::Chain;
use crate::error::PipelineError;

sol! {
    interface IERC20 {
        function decimals() external view returns (uint8);
        function balanceOf(address account) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
    }

    interface ISwapRouter {
        struct ExactInputSingleParams {
            address tokenIn;
            address tokenOut;
            uint24 fee;
            address recipient;
            uint256 amountIn;
            uint256 amountOutMinimum;
            uint160 sqrtPriceLimitX96;
        }

        function exactInputSingle(ExactInputSingleParams calldata params) external payable returns (uint256 amountOut);
    }

    interface IPool {
        function supply(address asset, uint256 amount, address onBehalfOf, uint16 referralCode) external;
    }
}

pub use ISwapRouter::ExactInputSingleParams;

/// Execute a read-only call and decode its return value.
pub async fn read_call<C, K>(chain: &C, to: Address, call: &K) -> Result<K::Return, PipelineError>
where
    C: Chain,
    K: SolCall,
{
    let output = chain.read(to, call.abi_encode().into()).await?;
    K::abi_decode_returns(&output).map_err(|e| {
        PipelineError::ReadFailed(format!(
            "Could not decode {} from {}: {}",
            K::SIGNATURE,
            to,
            e
        ))
    })
}

/// ERC-20 token contract wrapper.
pub struct Erc20<'a, C> {
    chain: &'a C,
    address: Address,
}

impl<'a, C: Chain> Erc20<'a, C> {
    pub fn new(chain: &'a C, address: Address) -> Self {
        Self { chain, address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Get the token decimals.
    pub async fn decimals(&self) -> Result<u8, PipelineError> {
        read_call(self.chain, self.address, &IERC20::decimalsCall {}).await
    }

    /// Get the raw balance of an address.
    pub async fn balance_of(&self, account: Address) -> Result<U256, PipelineError> {
        read_call(self.chain, self.address, &IERC20::balanceOfCall { account }).await
    }

    /// Get the raw amount `spender` may move on behalf of `owner`.
    pub async fn allowance(&self, owner: Address, spender: Address) -> Result<U256, PipelineError> {
        read_call(
            self.chain,
            self.address,
            &IERC20::allowanceCall { owner, spender },
        )
        .await
    }

    /// Total balance of `account` paired with the token's precision.
    pub async fn balance(&self, account: Address) -> Result<TokenAmount, PipelineError> {
        let raw = self.balance_of(account).await?;
        let decimals = self.decimals().await?;
        Ok(TokenAmount::new(raw, decimals))
    }

    /// `approve(spender, amount)`: sets the allowance, it does not add to it.
    pub fn approve(&self, spender: Address, amount: U256) -> TransactionIntent {
        TransactionIntent::new(
            "approve",
            self.address,
            &IERC20::approveCall { spender, amount },
            U256::ZERO,
        )
    }
}

/// Uniswap V3 style swap router.
#[derive(Debug, Clone, Copy)]
pub struct SwapRouter {
    address: Address,
}

impl SwapRouter {
    pub fn new(address: Address) -> Self {
        Self { address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Single-pool exact-input swap, paying `value` in the native asset.
    pub fn exact_input_single(&self, params: ExactInputSingleParams, value: U256) -> TransactionIntent {
        TransactionIntent::new(
            "exactInputSingle",
            self.address,
            &ISwapRouter::exactInputSingleCall { params },
            value,
        )
    }
}

/// Aave V3 style lending pool.
#[derive(Debug, Clone, Copy)]
pub struct LendingPool {
    address: Address,
}

impl LendingPool {
    pub fn new(address: Address) -> Self {
        Self { address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn supply(
        &self,
        asset: Address,
        amount: U256,
        on_behalf_of: Address,
        referral_code: u16,
    ) -> TransactionIntent {
        TransactionIntent::new(
            "supply",
            self.address,
            &IPool::supplyCall {
                asset,
                amount,
                onBehalfOf: on_behalf_of,
                referralCode: referral_code,
            },
            U256::ZERO,
        )
    }
}
