use serde_json::{json, Value};

use fleet_deploy_core::contract::{SecretRequest, SecretResponse};

use crate::adapters::secret_store::SecretStore;

/// Stateless secret-reader handler. Every invocation performs a fresh
/// store lookup; failures come back as structured responses and are never
/// propagated past the handler boundary.
pub fn handle_secret_event(event: Value, store: &impl SecretStore) -> SecretResponse {
    let request = match serde_json::from_value::<SecretRequest>(event) {
        Ok(value) => value,
        Err(error) => return error_response(400, format!("Malformed request: {error}")),
    };

    let Some(secret_id) = request.secret_id.filter(|value| !value.trim().is_empty()) else {
        return error_response(400, "Missing required parameter \"secretId\"".to_string());
    };

    let secret_string = match store.fetch_secret_string(&secret_id) {
        Ok(value) => value,
        Err(error) => return error_response(500, format!("Unable to retrieve secret: {error}")),
    };

    let Some(secret_string) = secret_string else {
        return error_response(
            500,
            format!("Secret {secret_id} exists but no string value found"),
        );
    };

    let payload: Value = match serde_json::from_str(&secret_string) {
        Ok(value) => value,
        Err(error) => return error_response(500, format!("Unable to retrieve secret: {error}")),
    };

    let Some(secret_key) = request.secret_key.filter(|value| !value.is_empty()) else {
        return SecretResponse {
            status_code: 200,
            body: payload,
        };
    };

    match payload.get(&secret_key) {
        Some(value) => SecretResponse {
            status_code: 200,
            body: json!({ "value": value.clone() }),
        },
        None => error_response(
            404,
            format!("Key {secret_key} not found in secret payload"),
        ),
    }
}

fn error_response(status_code: u16, message: String) -> SecretResponse {
    SecretResponse {
        status_code,
        body: json!({ "error": message }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticSecretStore {
        secret_string: Option<String>,
    }

    impl StaticSecretStore {
        fn with_payload(payload: &str) -> Self {
            Self {
                secret_string: Some(payload.to_string()),
            }
        }

        fn without_string_value() -> Self {
            Self {
                secret_string: None,
            }
        }
    }

    impl SecretStore for StaticSecretStore {
        fn fetch_secret_string(&self, _secret_id: &str) -> Result<Option<String>, String> {
            Ok(self.secret_string.clone())
        }
    }

    struct FailingSecretStore {
        message: &'static str,
    }

    impl SecretStore for FailingSecretStore {
        fn fetch_secret_string(&self, _secret_id: &str) -> Result<Option<String>, String> {
            Err(self.message.to_string())
        }
    }

    fn error_text(response: &SecretResponse) -> String {
        response.body["error"]
            .as_str()
            .expect("error body should carry a message")
            .to_string()
    }

    #[test]
    fn missing_secret_id_is_a_client_error() {
        let store = StaticSecretStore::with_payload("{}");

        let response = handle_secret_event(json!({}), &store);

        assert_eq!(response.status_code, 400);
        assert!(error_text(&response).contains("secretId"));
    }

    #[test]
    fn blank_secret_id_is_a_client_error() {
        let store = StaticSecretStore::with_payload("{}");

        let response = handle_secret_event(json!({"secretId": "  "}), &store);

        assert_eq!(response.status_code, 400);
    }

    #[test]
    fn full_payload_is_returned_when_no_key_is_given() {
        let store = StaticSecretStore::with_payload(r#"{"user":"a","pass":"b"}"#);

        let response = handle_secret_event(json!({"secretId": "db"}), &store);

        assert_eq!(response.status_code, 200);
        assert_eq!(response.body, json!({"user": "a", "pass": "b"}));
    }

    #[test]
    fn present_key_is_projected_under_the_fixed_field() {
        let store = StaticSecretStore::with_payload(r#"{"user":"a","pass":"b"}"#);

        let response = handle_secret_event(json!({"secretId": "db", "secretKey": "pass"}), &store);

        assert_eq!(response.status_code, 200);
        assert_eq!(response.body, json!({"value": "b"}));
    }

    #[test]
    fn missing_key_is_named_in_a_not_found_response() {
        let store = StaticSecretStore::with_payload(r#"{"user":"a","pass":"b"}"#);

        let response =
            handle_secret_event(json!({"secretId": "db", "secretKey": "missing"}), &store);

        assert_eq!(response.status_code, 404);
        assert!(error_text(&response).contains("missing"));
    }

    #[test]
    fn store_failure_maps_to_a_server_error_with_the_cause() {
        let store = FailingSecretStore {
            message: "access denied for secret db",
        };

        let response = handle_secret_event(json!({"secretId": "db"}), &store);

        assert_eq!(response.status_code, 500);
        let error = error_text(&response);
        assert!(error.contains("Unable to retrieve secret"));
        assert!(error.contains("access denied for secret db"));
    }

    #[test]
    fn secret_without_string_value_is_a_server_misconfiguration() {
        let store = StaticSecretStore::without_string_value();

        let response = handle_secret_event(json!({"secretId": "db"}), &store);

        assert_eq!(response.status_code, 500);
        assert!(error_text(&response).contains("no string value"));
    }

    #[test]
    fn non_json_payload_maps_to_a_server_error() {
        let store = StaticSecretStore::with_payload("not-json");

        let response = handle_secret_event(json!({"secretId": "db"}), &store);

        assert_eq!(response.status_code, 500);
        assert!(error_text(&response).contains("Unable to retrieve secret"));
    }

    #[test]
    fn non_object_request_is_a_client_error() {
        let store = StaticSecretStore::with_payload("{}");

        let response = handle_secret_event(json!("just a string"), &store);

        assert_eq!(response.status_code, 400);
        assert!(error_text(&response).contains("Malformed request"));
    }
}
