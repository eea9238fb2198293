// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JSON-RPC client for EVM chain interactions.

use alloy::{
    network::{Ethereum, EthereumWallet},
    primitives::{Address, Bytes},
    providers::{
        fillers::{
            BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller,
            WalletFiller,
        },
        Identity, PendingTransactionBuilder, Provider, ProviderBuilder, RootProvider,
    },
    signers::local::PrivateKeySigner,
};
use url::Url;

use super::types::*;
use super::Chain;
use crate::error::PipelineError;

/// HTTP provider type with the recommended fillers and a local wallet.
type SigningProvider = FillProvider<
    JoinFill<
        JoinFill<
            Identity,
            JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
        >,
        WalletFiller<EthereumWallet>,
    >,
    RootProvider<Ethereum>,
>;

/// EVM client bound to a single signer.
pub struct EvmClient {
    /// Network configuration
    network: NetworkConfig,
    /// Alloy HTTP provider
    provider: SigningProvider,
    signer: Address,
}

impl EvmClient {
    /// Connect to `rpc_url` and verify the node serves `expected_chain_id`.
    pub async fn connect(
        rpc_url: &Url,
        expected_chain_id: u64,
        signer: PrivateKeySigner,
    ) -> Result<Self, PipelineError> {
        let address = signer.address();
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(rpc_url.clone());

        let chain_id = provider
            .get_chain_id()
            .await
            .map_err(|e| PipelineError::ReadFailed(format!("Failed to get chain id: {}", e)))?;

        if chain_id != expected_chain_id {
            return Err(PipelineError::Config(format!(
                "RPC endpoint serves chain {chain_id}, expected {expected_chain_id}"
            )));
        }

        let network = NetworkConfig::for_chain_id(chain_id);
        tracing::info!(
            network = network.name,
            chain_id,
            signer = %address,
            "Connected to RPC endpoint"
        );

        Ok(Self {
            network,
            provider,
            signer: address,
        })
    }

    /// Get the network configuration.
    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }
}

impl Chain for EvmClient {
    fn signer(&self) -> Address {
        self.signer
    }

    async fn read(&self, to: Address, calldata: Bytes) -> Result<Bytes, PipelineError> {
        let tx = alloy::rpc::types::TransactionRequest::default()
            .from(self.signer)
            .to(to)
            .input(calldata.into());

        self.provider
            .call(tx)
            .await
            .map_err(|e| PipelineError::ReadFailed(format!("eth_call to {} failed: {}", to, e)))
    }

    async fn submit(&self, intent: TransactionIntent) -> Result<PendingTransaction, PipelineError> {
        let pending = self
            .provider
            .send_transaction(intent.to_request(self.signer))
            .await
            .map_err(|e| {
                PipelineError::TransactionFailed(format!(
                    "Failed to send {}: {}",
                    intent.label(),
                    e
                ))
            })?;

        Ok(PendingTransaction::new(*pending.tx_hash(), intent.label()))
    }

    async fn wait_for_confirmation(
        &self,
        pending: PendingTransaction,
    ) -> Result<ConfirmedTransaction, PipelineError> {
        let receipt = PendingTransactionBuilder::new(self.provider.root().clone(), pending.tx_hash())
            .get_receipt()
            .await
            .map_err(|e| {
                PipelineError::TransactionFailed(format!(
                    "Failed to confirm {} {:?}: {}",
                    pending.label(),
                    pending.tx_hash(),
                    e
                ))
            })?;

        let confirmed = ConfirmedTransaction {
            tx_hash: pending.tx_hash(),
            receipt: TxReceipt {
                block_number: receipt.block_number.unwrap_or(0),
                block_hash: receipt.block_hash,
                gas_used: receipt.gas_used,
                success: receipt.status(),
            },
            receipt_hash: receipt.transaction_hash,
        };

        if !confirmed.receipt.success {
            return Err(PipelineError::TransactionFailed(format!(
                "{} {:?} reverted in block {}",
                pending.label(),
                confirmed.receipt_hash,
                confirmed.receipt.block_number
            )));
        }

        if let Some(url) = self.network.tx_url(&confirmed.receipt_hash) {
            tracing::debug!(%url, "Explorer link");
        }

        Ok(confirmed)
    }
}
