/// Outcome of a registry lookup. `Missing` means the registry positively
/// reported a not-found condition; infrastructure failures (throttling,
/// auth, network) surface as `Err` from `lookup_function` and must never
/// be treated as `Missing`, or a transient error could trigger a
/// duplicate create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionLookup {
    Exists,
    Missing,
}

pub trait FunctionRegistry {
    fn lookup_function(&self, function_name: &str) -> Result<FunctionLookup, String>;

    /// Creates the function with the pinned runtime and entry point and
    /// returns its ARN.
    fn create_function(&self, function_name: &str, archive: &[u8]) -> Result<String, String>;

    fn update_function_code(&self, function_name: &str, archive: &[u8]) -> Result<(), String>;
}
