// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::process::ExitCode;

use relational_supply_pipeline::{
    blockchain::{signing::load_signer, EvmClient},
    config::{LogFormat, PipelineConfig, LOG_FORMAT_ENV},
    error::PipelineError,
    pipeline::Pipeline,
};
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

async fn connect(config: &PipelineConfig) -> Result<EvmClient, PipelineError> {
    let signer = load_signer(&config.key)?;
    EvmClient::connect(&config.rpc_url, config.chain_id, signer).await
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing(LogFormat::parse(std::env::var(LOG_FORMAT_ENV).ok().as_deref()));

    let config = match PipelineConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    let client = match connect(&config).await {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(error = %e, "Failed to set up chain client");
            return ExitCode::FAILURE;
        }
    };

    let report = Pipeline::new(&client, &config.params).run().await;
    tracing::info!(state = %report.state, "Pipeline finished");

    if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
