// src/pipeline/validate.rs

use serde::Serialize;

use crate::error::Result;
use crate::models::{Config, Endpoint, EndpointConfig, KeyMap};
use crate::services::Method;

/// What a validated endpoint section resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointSummary {
    pub name: &'static str,
    pub host: String,
    pub method: Method,
    pub key_map: KeyMap,
}

impl EndpointSummary {
    fn of<Q: Endpoint>(endpoint: &EndpointConfig<Q>) -> Self {
        Self {
            name: Q::NAME,
            host: endpoint.host.clone(),
            method: endpoint.method,
            key_map: endpoint.key_map.clone(),
        }
    }
}

/// Validate the configuration and summarize both endpoints.
pub fn run_validate(config: &Config) -> Result<Vec<EndpointSummary>> {
    log::info!("Validating configuration...");

    if let Err(e) = config.validate() {
        log::error!("Config validation failed: {}", e);
        return Err(e);
    }

    log::info!("User agent: {}", config.http.user_agent);
    match config.http.timeout_secs {
        Some(secs) => log::info!("Timeout: {secs}s"),
        None => log::info!("Timeout: none"),
    }

    let summaries = vec![
        EndpointSummary::of(&config.calendar),
        EndpointSummary::of(&config.enrollment),
    ];
    for summary in &summaries {
        log::info!(
            "{}: {:?} {} ({} mapped fields)",
            summary.name,
            summary.method,
            summary.host,
            summary.key_map.len()
        );
        for (field, wire) in summary.key_map.iter() {
            log::debug!("  {field} -> {wire}");
        }
    }

    log::info!("All validations passed!");
    Ok(summaries)
}
