use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::naming::{resolved_function_name, wants_gateway};

/// Runtime pinned for every newly created function.
pub const FUNCTION_RUNTIME: &str = "nodejs22.x";
/// Entry point every function package is expected to export.
pub const FUNCTION_ENTRY_POINT: &str = "index.handler";
/// Trailing directory-name character requesting HTTP gateway exposure.
pub const GATEWAY_MARKER: char = '_';
/// Default root scanned for function directories.
pub const DEFAULT_FUNCTIONS_ROOT: &str = "lib";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FunctionCandidate {
    pub directory: PathBuf,
    pub raw_name: String,
    pub function_name: String,
    pub wants_gateway: bool,
}

impl FunctionCandidate {
    pub fn from_directory(directory: PathBuf, raw_name: &str) -> Result<Self, ValidationError> {
        let function_name = resolved_function_name(raw_name);
        if function_name.is_empty() {
            return Err(ValidationError::new(format!(
                "directory name '{raw_name}' resolves to an empty function name"
            )));
        }

        Ok(Self {
            directory,
            raw_name: raw_name.to_string(),
            function_name: function_name.to_string(),
            wants_gateway: wants_gateway(raw_name),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CandidateOutcomeRecord {
    pub function_name: String,
    pub directory: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CandidateOutcomeRecord {
    pub fn created(candidate: &FunctionCandidate, gateway_name: Option<String>) -> Self {
        Self::with_status(candidate, "created", gateway_name, None)
    }

    pub fn updated(candidate: &FunctionCandidate) -> Self {
        Self::with_status(candidate, "updated", None, None)
    }

    pub fn failed(candidate: &FunctionCandidate, reason: impl Into<String>) -> Self {
        Self::with_status(candidate, "failed", None, Some(reason.into()))
    }

    pub fn is_failure(&self) -> bool {
        self.status == "failed"
    }

    fn with_status(
        candidate: &FunctionCandidate,
        status: &str,
        gateway_name: Option<String>,
        error: Option<String>,
    ) -> Self {
        Self {
            function_name: candidate.function_name.clone(),
            directory: candidate.directory.display().to_string(),
            status: status.to_string(),
            gateway_name,
            error,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunReport {
    pub root: String,
    pub created: usize,
    pub updated: usize,
    pub failed: usize,
    pub outcomes: Vec<CandidateOutcomeRecord>,
}

impl RunReport {
    pub fn from_outcomes(root: &Path, outcomes: Vec<CandidateOutcomeRecord>) -> Self {
        let mut created = 0usize;
        let mut updated = 0usize;
        let mut failed = 0usize;
        for outcome in &outcomes {
            match outcome.status.as_str() {
                "created" => created += 1,
                "updated" => updated += 1,
                _ => failed += 1,
            }
        }

        Self {
            root: root.display().to_string(),
            created,
            updated,
            failed,
            outcomes,
        }
    }
}

/// Secret-reader request contract. Both fields deserialize leniently so a
/// missing `secretId` surfaces as a client-error response, not a
/// deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SecretRequest {
    #[serde(rename = "secretId")]
    pub secret_id: Option<String>,
    #[serde(rename = "secretKey")]
    pub secret_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SecretResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn candidate_strips_trailing_marker_run() {
        let candidate =
            FunctionCandidate::from_directory(PathBuf::from("lib/orders__"), "orders__")
                .expect("candidate should resolve");

        assert_eq!(candidate.function_name, "orders");
        assert!(candidate.wants_gateway);
        assert_eq!(candidate.raw_name, "orders__");
    }

    #[test]
    fn candidate_keeps_interior_markers() {
        let candidate =
            FunctionCandidate::from_directory(PathBuf::from("lib/order_totals_"), "order_totals_")
                .expect("candidate should resolve");

        assert_eq!(candidate.function_name, "order_totals");
        assert!(candidate.wants_gateway);
    }

    #[test]
    fn unmarked_candidate_does_not_want_gateway() {
        let candidate = FunctionCandidate::from_directory(PathBuf::from("lib/billing"), "billing")
            .expect("candidate should resolve");

        assert_eq!(candidate.function_name, "billing");
        assert!(!candidate.wants_gateway);
    }

    #[test]
    fn all_marker_name_is_rejected() {
        let error = FunctionCandidate::from_directory(PathBuf::from("lib/___"), "___")
            .expect_err("all-marker name should fail");

        assert!(error.message().contains("empty function name"));
    }

    #[test]
    fn run_report_aggregates_outcome_counters() {
        let created = FunctionCandidate::from_directory(PathBuf::from("lib/a_"), "a_")
            .expect("candidate should resolve");
        let updated = FunctionCandidate::from_directory(PathBuf::from("lib/b"), "b")
            .expect("candidate should resolve");
        let failed = FunctionCandidate::from_directory(PathBuf::from("lib/c"), "c")
            .expect("candidate should resolve");

        let report = RunReport::from_outcomes(
            Path::new("lib"),
            vec![
                CandidateOutcomeRecord::created(&created, Some("a-api".to_string())),
                CandidateOutcomeRecord::updated(&updated),
                CandidateOutcomeRecord::failed(&failed, "packaging failed"),
            ],
        );

        assert_eq!(report.created, 1);
        assert_eq!(report.updated, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.outcomes.len(), 3);
    }

    #[test]
    fn secret_request_tolerates_missing_fields() {
        let request: SecretRequest =
            serde_json::from_value(json!({})).expect("empty request should deserialize");

        assert_eq!(request.secret_id, None);
        assert_eq!(request.secret_key, None);
    }

    #[test]
    fn secret_request_uses_camel_case_field_names() {
        let request: SecretRequest =
            serde_json::from_value(json!({"secretId": "db", "secretKey": "pass"}))
                .expect("request should deserialize");

        assert_eq!(request.secret_id.as_deref(), Some("db"));
        assert_eq!(request.secret_key.as_deref(), Some("pass"));
    }

    #[test]
    fn secret_response_serializes_status_code_in_camel_case() {
        let response = SecretResponse {
            status_code: 404,
            body: json!({"error": "Key pass not found in secret payload"}),
        };

        let serialized = serde_json::to_value(&response).expect("response should serialize");
        assert_eq!(serialized["statusCode"], json!(404));
    }
}
