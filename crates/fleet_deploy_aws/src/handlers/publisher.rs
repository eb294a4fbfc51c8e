use std::path::Path;

use serde_json::json;

use fleet_deploy_core::archive::package_directory;
use fleet_deploy_core::contract::{CandidateOutcomeRecord, FunctionCandidate, RunReport};
use fleet_deploy_core::scan::scan_function_directories;

use crate::adapters::function_registry::{FunctionLookup, FunctionRegistry};
use crate::adapters::gateway::GatewayBinder;

/// Soft-failing scan: a read error on the root is logged and yields an
/// empty candidate list instead of aborting the run.
pub fn scan_candidates(root: &Path) -> Vec<FunctionCandidate> {
    match scan_function_directories(root) {
        Ok(candidates) => candidates,
        Err(error) => {
            log_publisher_error(
                "scan_failed",
                json!({
                    "root": root.display().to_string(),
                    "error": error.to_string(),
                }),
            );
            Vec::new()
        }
    }
}

pub fn publish_candidate(
    candidate: &FunctionCandidate,
    registry: &impl FunctionRegistry,
    binder: &impl GatewayBinder,
) -> CandidateOutcomeRecord {
    let lookup = match registry.lookup_function(&candidate.function_name) {
        Ok(value) => value,
        Err(error) => {
            return CandidateOutcomeRecord::failed(
                candidate,
                format!("function lookup failed: {error}"),
            );
        }
    };

    let archive = match package_directory(&candidate.directory) {
        Ok(bytes) => bytes,
        Err(error) => {
            return CandidateOutcomeRecord::failed(candidate, format!("packaging failed: {error}"));
        }
    };

    match lookup {
        FunctionLookup::Exists => {
            match registry.update_function_code(&candidate.function_name, &archive) {
                Ok(()) => CandidateOutcomeRecord::updated(candidate),
                Err(error) => CandidateOutcomeRecord::failed(
                    candidate,
                    format!("code update failed: {error}"),
                ),
            }
        }
        FunctionLookup::Missing => {
            let function_arn = match registry.create_function(&candidate.function_name, &archive) {
                Ok(arn) => arn,
                Err(error) => {
                    return CandidateOutcomeRecord::failed(
                        candidate,
                        format!("function creation failed: {error}"),
                    );
                }
            };

            if !candidate.wants_gateway {
                return CandidateOutcomeRecord::created(candidate, None);
            }

            match binder.bind_http_gateway(&candidate.function_name, &function_arn) {
                Ok(gateway_name) => CandidateOutcomeRecord::created(candidate, Some(gateway_name)),
                Err(error) => CandidateOutcomeRecord::failed(
                    candidate,
                    format!("function created but gateway binding failed: {error}"),
                ),
            }
        }
    }
}

/// Sequentially publishes every candidate under `root`, one at a time,
/// each attempt fully completing (including any gateway bind) before the
/// next begins. Per-candidate failures are collected into the report and
/// never abort the run.
pub fn run_deploy(
    root: &Path,
    registry: &impl FunctionRegistry,
    binder: &impl GatewayBinder,
) -> RunReport {
    let candidates = scan_candidates(root);
    log_publisher_info(
        "deploy_started",
        json!({
            "root": root.display().to_string(),
            "candidates": candidates.len(),
        }),
    );

    let mut outcomes = Vec::with_capacity(candidates.len());
    for candidate in &candidates {
        let outcome = publish_candidate(candidate, registry, binder);
        if outcome.is_failure() {
            log_publisher_error(
                "candidate_failed",
                json!({
                    "function_name": outcome.function_name.clone(),
                    "directory": outcome.directory.clone(),
                    "error": outcome.error.clone(),
                }),
            );
        } else {
            log_publisher_info(
                "candidate_published",
                json!({
                    "function_name": outcome.function_name.clone(),
                    "status": outcome.status.clone(),
                    "gateway_name": outcome.gateway_name.clone(),
                }),
            );
        }
        outcomes.push(outcome);
    }

    let report = RunReport::from_outcomes(root, outcomes);
    log_publisher_info(
        "deploy_completed",
        json!({
            "created": report.created,
            "updated": report.updated,
            "failed": report.failed,
        }),
    );
    report
}

fn log_publisher_info(event: &str, details: serde_json::Value) {
    eprintln!(
        "{}",
        json!({
            "component": "publisher",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}

fn log_publisher_error(event: &str, details: serde_json::Value) {
    eprintln!(
        "{}",
        json!({
            "component": "publisher",
            "level": "error",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}
