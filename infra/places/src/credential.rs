use ogmap_domain::config::PlacesConfig;
use secrecy::{ExposeSecret, SecretString};
use std::fmt;

/// A non-blank places API key. Never printed by `Debug`.
#[derive(Clone)]
pub struct ApiKey(SecretString);

impl ApiKey {
    /// Wraps `raw`, trimming surrounding whitespace. Returns `None` for blank input.
    #[must_use]
    pub fn new(raw: impl AsRef<str>) -> Option<Self> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(SecretString::from(trimmed.to_owned())))
    }

    /// Plain key for request parameters and the map front-end.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey([REDACTED])")
    }
}

/// Supplies the places credential at the start of every sweep.
pub trait CredentialProvider: fmt::Debug + Send + Sync {
    fn api_key(&self) -> Option<ApiKey>;
}

/// Credential fixed at startup, usually taken from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticCredential {
    key: Option<ApiKey>,
}

impl StaticCredential {
    #[must_use]
    pub fn new(raw: Option<&str>) -> Self {
        Self { key: raw.and_then(ApiKey::new) }
    }

    #[must_use]
    pub fn from_config(config: &PlacesConfig) -> Self {
        Self::new(config.api_key.as_deref())
    }

    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.key.is_some()
    }
}

impl CredentialProvider for StaticCredential {
    fn api_key(&self) -> Option<ApiKey> {
        self.key.clone()
    }
}
