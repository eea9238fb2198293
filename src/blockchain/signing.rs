// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signer loading.
//!
//! The pipeline signs with a single local secp256k1 key, supplied either as a
//! hex string or as a PEM file (SEC1 or PKCS#8).

use std::path::Path;

use alloy::signers::local::PrivateKeySigner;
use k256::{pkcs8::DecodePrivateKey, SecretKey};

use crate::config::KeySource;
use crate::error::PipelineError;

/// Create a signer from a hex private key, with or without `0x` prefix.
pub fn signer_from_hex(private_key_hex: &str) -> Result<PrivateKeySigner, PipelineError> {
    let trimmed = private_key_hex.trim();
    let hex = trimmed.strip_prefix("0x").unwrap_or(trimmed);

    let key_bytes = alloy::hex::decode(hex).map_err(|e| PipelineError::Signer(e.to_string()))?;

    PrivateKeySigner::from_slice(&key_bytes).map_err(|e| PipelineError::Signer(e.to_string()))
}

/// Decode a PEM-wrapped secp256k1 key.
///
/// The DER body is tried as SEC1 (`EC PRIVATE KEY`) first, then as PKCS#8
/// (`PRIVATE KEY`). The PEM label itself is not trusted.
pub fn secret_key_from_pem(pem_bytes: &[u8]) -> Result<SecretKey, PipelineError> {
    let text = std::str::from_utf8(pem_bytes)
        .map_err(|e| PipelineError::Signer(format!("PEM is not UTF-8: {}", e)))?;
    let block = pem::parse(text).map_err(|e| PipelineError::Signer(format!("Invalid PEM: {}", e)))?;
    let der = block.contents();

    SecretKey::from_sec1_der(der)
        .or_else(|_| SecretKey::from_pkcs8_der(der))
        .map_err(|e| {
            PipelineError::Signer(format!(
                "PEM block {:?} is neither a SEC1 nor a PKCS#8 secp256k1 key: {}",
                block.tag(),
                e
            ))
        })
}

/// Create a signer from PEM-encoded private key bytes.
pub fn signer_from_pem(pem_bytes: &[u8]) -> Result<PrivateKeySigner, PipelineError> {
    let secret = secret_key_from_pem(pem_bytes)?;
    PrivateKeySigner::from_slice(&secret.to_bytes()).map_err(|e| PipelineError::Signer(e.to_string()))
}

fn signer_from_pem_file(path: &Path) -> Result<PrivateKeySigner, PipelineError> {
    let bytes = std::fs::read(path).map_err(|e| {
        PipelineError::Signer(format!("Failed to read {}: {}", path.display(), e))
    })?;
    signer_from_pem(&bytes)
}

/// Load the signing identity from the configured source.
pub fn load_signer(source: &KeySource) -> Result<PrivateKeySigner, PipelineError> {
    match source {
        KeySource::Hex(key) => signer_from_hex(key),
        KeySource::PemFile(path) => signer_from_pem_file(path),
    }
}
