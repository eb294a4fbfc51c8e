pub trait SecretStore {
    /// Fetches the string payload of a secret. `Ok(None)` means the secret
    /// exists but carries no string value; lookup failures, including a
    /// missing secret, surface as `Err` with the underlying cause text.
    fn fetch_secret_string(&self, secret_id: &str) -> Result<Option<String>, String>;
}
