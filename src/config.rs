// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is read from the environment once at startup into an
//! immutable [`PipelineConfig`] that is passed explicitly to the stages.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `RPC_URL` | JSON-RPC endpoint | Required |
//! | `PRIVATE_KEY` | Hex secp256k1 key, optional `0x` prefix | Required unless `PRIVATE_KEY_PEM_PATH` is set |
//! | `PRIVATE_KEY_PEM_PATH` | Path to a SEC1 or PKCS#8 PEM key | Optional |
//! | `CHAIN_ID` | Chain id the RPC endpoint must serve | `11155111` (Sepolia) |
//! | `SWAP_ROUTER_ADDRESS` | Uniswap V3 swap router | Sepolia deployment |
//! | `LENDING_POOL_ADDRESS` | Aave V3 pool | Sepolia deployment |
//! | `WRAPPED_NATIVE_ADDRESS` | WETH token | Sepolia deployment |
//! | `STABLECOIN_ADDRESS` | DAI token | Sepolia deployment |
//! | `POOL_FEE` | Swap pool fee tier (hundredths of a bip) | `3000` |
//! | `SWAP_AMOUNT` | Native amount to swap, e.g. `0.1` | `0.1` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info` |

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use alloy::primitives::{aliases::U24, Address};
use url::Url;

use crate::blockchain::types::SEPOLIA;
use crate::error::PipelineError;

pub const RPC_URL_ENV: &str = "RPC_URL";
pub const PRIVATE_KEY_ENV: &str = "PRIVATE_KEY";
pub const PRIVATE_KEY_PEM_PATH_ENV: &str = "PRIVATE_KEY_PEM_PATH";
pub const CHAIN_ID_ENV: &str = "CHAIN_ID";
pub const SWAP_ROUTER_ADDRESS_ENV: &str = "SWAP_ROUTER_ADDRESS";
pub const LENDING_POOL_ADDRESS_ENV: &str = "LENDING_POOL_ADDRESS";
pub const WRAPPED_NATIVE_ADDRESS_ENV: &str = "WRAPPED_NATIVE_ADDRESS";
pub const STABLECOIN_ADDRESS_ENV: &str = "STABLECOIN_ADDRESS";
pub const POOL_FEE_ENV: &str = "POOL_FEE";
pub const SWAP_AMOUNT_ENV: &str = "SWAP_AMOUNT";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Uniswap V3 SwapRouter02 on Sepolia.
pub const DEFAULT_SWAP_ROUTER: &str = "0x68b3465833fb72A70ecDF485E0e4C7bD8665Fc45";
/// Aave V3 Pool on Sepolia.
pub const DEFAULT_LENDING_POOL: &str = "0x4ffb273DF4cdFfFc7C7b89C09C2C70A4244332A9";
/// WETH on Sepolia.
pub const DEFAULT_WRAPPED_NATIVE: &str = "0xB4FBF271143F4FBf7B91A5ded31805e42b2208d6";
/// DAI on Sepolia.
pub const DEFAULT_STABLECOIN: &str = "0x11fE4B6AE13d2a6055C8D9cF65c55bac32B5d844";

pub const DEFAULT_POOL_FEE: u32 = 3000;
pub const DEFAULT_SWAP_AMOUNT: &str = "0.1";

/// Largest value a `uint24` fee tier can hold.
const MAX_POOL_FEE: u32 = (1 << 24) - 1;

/// Where the signing key comes from.
#[derive(Clone, PartialEq, Eq)]
pub enum KeySource {
    Hex(String),
    PemFile(PathBuf),
}

impl fmt::Debug for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hex(_) => f.write_str("Hex(<redacted>)"),
            Self::PemFile(path) => f.debug_tuple("PemFile").field(path).finish(),
        }
    }
}

/// Contract addresses the pipeline interacts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractAddresses {
    pub swap_router: Address,
    pub lending_pool: Address,
    pub wrapped_native: Address,
    pub stablecoin: Address,
}

/// What one run does: which contracts, which pool, how much to swap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineParams {
    pub contracts: ContractAddresses,
    pub pool_fee: U24,
    /// Native amount in display units; validated by the exchange stage.
    pub swap_amount: String,
}

/// Log output format, read from `LOG_FORMAT` before the rest of the config
/// so configuration errors are logged in the requested format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    /// Unknown values fall back to `pretty`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if v == "json" => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Complete runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub rpc_url: Url,
    pub chain_id: u64,
    pub key: KeySource,
    pub params: PipelineParams,
}

impl PipelineConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, PipelineError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load through an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PipelineError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let rpc_url = get(RPC_URL_ENV)
            .ok_or_else(|| PipelineError::Config(format!("{RPC_URL_ENV} is required")))?;
        let rpc_url = Url::parse(rpc_url.trim())
            .map_err(|e| PipelineError::Config(format!("Invalid {RPC_URL_ENV}: {e}")))?;

        let key = match (get(PRIVATE_KEY_ENV), get(PRIVATE_KEY_PEM_PATH_ENV)) {
            (Some(hex), None) => KeySource::Hex(hex),
            (None, Some(path)) => KeySource::PemFile(PathBuf::from(path)),
            (Some(_), Some(_)) => {
                return Err(PipelineError::Config(format!(
                    "Set only one of {PRIVATE_KEY_ENV} and {PRIVATE_KEY_PEM_PATH_ENV}"
                )))
            }
            (None, None) => {
                return Err(PipelineError::Config(format!(
                    "{PRIVATE_KEY_ENV} or {PRIVATE_KEY_PEM_PATH_ENV} is required"
                )))
            }
        };

        let chain_id = match get(CHAIN_ID_ENV) {
            Some(raw) => parse_number::<u64>(CHAIN_ID_ENV, &raw)?,
            None => SEPOLIA.chain_id,
        };

        let address = |name: &str, default: &str| -> Result<Address, PipelineError> {
            let raw = get(name).unwrap_or_else(|| default.to_string());
            Address::from_str(raw.trim())
                .map_err(|e| PipelineError::Config(format!("Invalid {name}: {e}")))
        };
        let contracts = ContractAddresses {
            swap_router: address(SWAP_ROUTER_ADDRESS_ENV, DEFAULT_SWAP_ROUTER)?,
            lending_pool: address(LENDING_POOL_ADDRESS_ENV, DEFAULT_LENDING_POOL)?,
            wrapped_native: address(WRAPPED_NATIVE_ADDRESS_ENV, DEFAULT_WRAPPED_NATIVE)?,
            stablecoin: address(STABLECOIN_ADDRESS_ENV, DEFAULT_STABLECOIN)?,
        };

        let pool_fee = match get(POOL_FEE_ENV) {
            Some(raw) => parse_number::<u32>(POOL_FEE_ENV, &raw)?,
            None => DEFAULT_POOL_FEE,
        };
        if pool_fee > MAX_POOL_FEE {
            return Err(PipelineError::Config(format!(
                "{POOL_FEE_ENV} must fit in uint24, got {pool_fee}"
            )));
        }

        let swap_amount = get(SWAP_AMOUNT_ENV)
            .map(|v| v.trim().to_string())
            .unwrap_or_else(|| DEFAULT_SWAP_AMOUNT.to_string());

        Ok(Self {
            rpc_url,
            chain_id,
            key,
            params: PipelineParams {
                contracts,
                pool_fee: U24::from(pool_fee),
                swap_amount,
            },
        })
    }
}

fn parse_number<T: FromStr>(name: &str, raw: &str) -> Result<T, PipelineError>
where
    T::Err: fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| PipelineError::Config(format!("Invalid {name}: {e}")))
}
