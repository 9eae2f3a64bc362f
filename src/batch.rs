// src/batch.rs
//! JSON Lines batch evaluation with bounded concurrency.

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;
use log::{info, warn};
use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::models::{Outcome, ServiceResponse};
use crate::service::LunaService;

/// One input line: `{"operation": "...", "payload": {...}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchRequest {
    pub operation: String,
    #[serde(default)]
    pub payload: JsonValue,
}

pub fn parse_line(line: &str) -> Result<BatchRequest> {
    serde_json::from_str(line).context("Invalid batch line")
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub served: usize,
    pub not_loaded: usize,
    pub degraded: usize,
    pub rejected: usize,
}

impl BatchSummary {
    pub fn from_responses(responses: &[ServiceResponse]) -> Self {
        let mut summary = Self::default();
        for response in responses {
            match response.outcome {
                Some(Outcome::Served) => summary.served += 1,
                Some(Outcome::NotLoaded) => summary.not_loaded += 1,
                Some(Outcome::Degraded) => summary.degraded += 1,
                None if response.status == 200 => summary.served += 1,
                None => summary.rejected += 1,
            }
        }
        summary
    }

    pub fn log(&self) {
        info!("--- BATCH SUMMARY ---");
        info!("Served: {}", self.served);
        info!("Not loaded (fallback): {}", self.not_loaded);
        info!("Degraded (fallback): {}", self.degraded);
        info!("Rejected: {}", self.rejected);
    }
}

fn evaluate_line(service: &LunaService, line: &str) -> ServiceResponse {
    match parse_line(line) {
        Ok(request) => service.dispatch(&request.operation, &request.payload),
        Err(e) => {
            warn!("{:#}", e);
            ServiceResponse::error(400, format!("{:#}", e))
        }
    }
}

/// Evaluates each non-blank line on the blocking pool, at most `concurrency`
/// at a time. Responses come back in input order.
pub async fn run_batch(
    service: &LunaService,
    lines: Vec<String>,
    concurrency: usize,
    pb: Option<ProgressBar>,
) -> Vec<ServiceResponse> {
    let lines: Vec<String> = lines
        .into_iter()
        .filter(|line| !line.trim().is_empty())
        .collect();
    info!(
        "Evaluating {} requests with concurrency {}",
        lines.len(),
        concurrency.max(1)
    );

    let results = stream::iter(lines)
        .map(|line| {
            let service = service.clone();
            let pb = pb.clone();
            tokio::task::spawn_blocking(move || {
                let response = evaluate_line(&service, &line);
                if let Some(pb) = &pb {
                    pb.inc(1);
                }
                response
            })
        })
        .buffered(concurrency.max(1))
        .collect::<Vec<_>>()
        .await;

    if let Some(pb) = &pb {
        pb.finish_with_message("Batch complete.");
    }

    results
        .into_iter()
        .map(|joined| {
            joined.unwrap_or_else(|e| {
                warn!("Batch task failed: {}", e);
                ServiceResponse::error(500, "Request task failed")
            })
        })
        .collect()
}
