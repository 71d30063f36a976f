// src/core/config_manager.rs
//! Company list loading and secret resolution

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;
use tracing::info;

pub const DEFAULT_REQUEST_TYPE: &str = "active";
pub const DEFAULT_LIMIT: u32 = 20;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Deserialize)]
pub struct ConfigManager {
    pub companies: Vec<CompanyConfig>,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompanyConfig {
    pub name: String,
    pub base_url: String,
    #[serde(rename = "type", default = "default_request_type")]
    pub request_type: String,
    #[serde(default = "default_limit")]
    pub limit: u32,
    pub cookie_secret: String,
    pub csrf_secret: String,
}

fn default_request_type() -> String {
    DEFAULT_REQUEST_TYPE.to_string()
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl ConfigManager {
    /// Load and validate the companies file
    pub fn load(path: &Path) -> Result<Self> {
        info!("Loading company configuration from {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config = Self::from_json(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        info!("Loaded {} companies", config.companies.len());
        Ok(config)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content).context("Invalid config JSON")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than zero");
        }

        let mut seen = HashSet::new();

        for company in &self.companies {
            if company.name.trim().is_empty() {
                anyhow::bail!("Company entry with empty name");
            }
            if !seen.insert(company.name.as_str()) {
                anyhow::bail!("Duplicate company name: {}", company.name);
            }
            for (field, value) in [
                ("base_url", &company.base_url),
                ("cookie_secret", &company.cookie_secret),
                ("csrf_secret", &company.csrf_secret),
            ] {
                if value.trim().is_empty() {
                    anyhow::bail!("Company {} has an empty {}", company.name, field);
                }
            }
        }

        Ok(())
    }

    /// Restrict the company list to `names`; an empty filter keeps everything.
    /// Returns the requested names that matched no company.
    pub fn retain_companies(&mut self, names: &[String]) -> Vec<String> {
        if names.is_empty() {
            return Vec::new();
        }

        let unknown = names
            .iter()
            .filter(|name| !self.companies.iter().any(|c| &c.name == *name))
            .cloned()
            .collect();

        self.companies.retain(|c| names.contains(&c.name));
        unknown
    }
}

/// Lookup of secret values by variable name
pub trait SecretStore {
    fn get(&self, name: &str) -> Option<String>;
}

/// Reads secrets from the process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSecrets;

impl SecretStore for EnvSecrets {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl SecretStore for HashMap<String, String> {
    fn get(&self, name: &str) -> Option<String> {
        HashMap::get(self, name).cloned()
    }
}

#[derive(Clone)]
pub struct CompanySecrets {
    pub cookie: String,
    pub csrf_token: String,
}

impl fmt::Debug for CompanySecrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompanySecrets")
            .field("cookie", &"<redacted>")
            .field("csrf_token", &"<redacted>")
            .finish()
    }
}

impl CompanyConfig {
    /// Resolve both secrets. Unset and empty variables count as missing;
    /// the error carries the names of every missing variable.
    pub fn resolve_secrets<S: SecretStore + ?Sized>(
        &self,
        store: &S,
    ) -> std::result::Result<CompanySecrets, Vec<String>> {
        let lookup = |name: &str| store.get(name).filter(|value| !value.is_empty());

        let cookie = lookup(&self.cookie_secret);
        let csrf_token = lookup(&self.csrf_secret);

        match (cookie, csrf_token) {
            (Some(cookie), Some(csrf_token)) => Ok(CompanySecrets { cookie, csrf_token }),
            (cookie, csrf_token) => {
                let mut missing = Vec::new();
                if cookie.is_none() {
                    missing.push(self.cookie_secret.clone());
                }
                if csrf_token.is_none() {
                    missing.push(self.csrf_secret.clone());
                }
                Err(missing)
            }
        }
    }
}
