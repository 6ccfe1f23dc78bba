/// Source of the provider API key, consulted on every relay request
pub trait CredentialSource: Send + Sync {
    /// Current credential, or `None` when it is not configured
    fn api_key(&self) -> Option<String>;

    /// Where the credential is expected to come from, for logs
    fn describe(&self) -> String;
}

/// Reads the credential from an environment variable at call time
#[derive(Debug, Clone)]
pub struct EnvCredential {
    var: String,
}

impl EnvCredential {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl CredentialSource for EnvCredential {
    fn api_key(&self) -> Option<String> {
        std::env::var(&self.var)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }

    fn describe(&self) -> String {
        format!("environment variable {}", self.var)
    }
}

/// Fixed credential, used when the key is supplied programmatically
#[derive(Debug, Clone, Default)]
pub struct StaticCredential(Option<String>);

impl StaticCredential {
    pub fn new(key: impl Into<String>) -> Self {
        Self(Some(key.into()))
    }

    pub fn missing() -> Self {
        Self(None)
    }
}

impl CredentialSource for StaticCredential {
    fn api_key(&self) -> Option<String> {
        self.0.clone().filter(|key| !key.trim().is_empty())
    }

    fn describe(&self) -> String {
        "static credential".to_string()
    }
}
