use crate::contract::GATEWAY_MARKER;

/// Strips the run of trailing gateway markers, and only that run.
pub fn resolved_function_name(raw_name: &str) -> &str {
    raw_name.trim_end_matches(GATEWAY_MARKER)
}

pub fn wants_gateway(raw_name: &str) -> bool {
    raw_name.ends_with(GATEWAY_MARKER)
}

pub fn gateway_api_name(function_name: &str) -> String {
    format!("{function_name}-api")
}

pub fn gateway_permission_statement_id(function_name: &str) -> String {
    format!("{function_name}-gateway-invoke")
}
