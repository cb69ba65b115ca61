use std::env;
use std::fmt;

use anyhow::{bail, Result};

/// An API key. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Returns `None` for blank input.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey([REDACTED])")
    }
}

/// Host capability that owns key selection.
///
/// `select_key` reports an authoritative outcome; callers must not assume a
/// key exists afterwards without asking `has_selected_key` again.
pub trait ApiKeySource: Send {
    fn has_selected_key(&self) -> bool;
    fn select_key(&mut self) -> Result<()>;
    fn selected_key(&self) -> Option<ApiKey>;
}

pub(crate) fn non_empty_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Reads `GEMINI_API_KEY`, then `GOOGLE_API_KEY`, on every check.
#[derive(Debug, Clone, Default)]
pub struct EnvKeySource;

impl EnvKeySource {
    pub const VARIABLES: [&'static str; 2] = ["GEMINI_API_KEY", "GOOGLE_API_KEY"];
}

impl ApiKeySource for EnvKeySource {
    fn has_selected_key(&self) -> bool {
        self.selected_key().is_some()
    }

    fn select_key(&mut self) -> Result<()> {
        if self.has_selected_key() {
            return Ok(());
        }
        bail!("{} not set", Self::VARIABLES.join(" or "))
    }

    fn selected_key(&self) -> Option<ApiKey> {
        Self::VARIABLES
            .iter()
            .find_map(|name| non_empty_env(name))
            .and_then(ApiKey::new)
    }
}

/// Key fixed at construction (or absent).
#[derive(Debug, Clone, Default)]
pub struct StaticKeySource {
    key: Option<ApiKey>,
}

impl StaticKeySource {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: ApiKey::new(key),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

impl ApiKeySource for StaticKeySource {
    fn has_selected_key(&self) -> bool {
        self.key.is_some()
    }

    fn select_key(&mut self) -> Result<()> {
        if self.key.is_none() {
            bail!("no API key configured");
        }
        Ok(())
    }

    fn selected_key(&self) -> Option<ApiKey> {
        self.key.clone()
    }
}
