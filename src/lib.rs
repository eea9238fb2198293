// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Relational Supply Pipeline
//!
//! Swaps a fixed amount of the native asset for a stablecoin on a Uniswap V3
//! style router, then approves and supplies the proceeds to an Aave V3 style
//! lending pool. One run per invocation, one transaction at a time.
//!
//! ## Modules
//!
//! - `blockchain` - Chain access, contract bindings, amounts and signing
//! - `config` - Environment configuration
//! - `error` - Error taxonomy
//! - `pipeline` - Exchange, allowance and deposit stages plus the orchestrator

pub mod blockchain;
pub mod config;
pub mod error;
pub mod pipeline;
