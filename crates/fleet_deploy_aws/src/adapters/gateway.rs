pub trait GatewayBinder {
    /// Provisions an HTTP gateway whose sole backend is the given function
    /// and returns the gateway's name. Create-only and non-idempotent:
    /// binding the same function name twice either fails or provisions a
    /// duplicate, so callers must only bind on first creation.
    fn bind_http_gateway(&self, function_name: &str, function_arn: &str)
        -> Result<String, String>;
}
