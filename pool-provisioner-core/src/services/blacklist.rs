//! Domain blacklist
//!
//! Domains that burned during registration (provider rejects the MX, the
//! domain got flagged) are excluded from future email generation. The file
//! is append-only via explicit adds.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

#[derive(Debug, Default, Serialize, Deserialize)]
struct BlacklistFile {
    #[serde(default)]
    domains: BTreeSet<String>,
}

#[derive(Debug)]
pub struct DomainBlacklist {
    path: PathBuf,
    domains: BTreeSet<String>,
}

impl DomainBlacklist {
    /// Load the blacklist, starting empty when the file is missing or
    /// unreadable.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let domains = std::fs::read_to_string(&path)
            .ok()
            .and_then(|raw| serde_json::from_str::<BlacklistFile>(&raw).ok())
            .map(|file| file.domains)
            .unwrap_or_default();
        Self { path, domains }
    }

    /// Add a domain and persist. Returns whether the domain was new.
    pub fn add(&mut self, domain: &str) -> CoreResult<bool> {
        if domain.is_empty() || self.domains.contains(domain) {
            return Ok(false);
        }
        self.domains.insert(domain.to_string());
        self.save()?;
        Ok(true)
    }

    #[must_use]
    pub fn contains(&self, domain: &str) -> bool {
        self.domains.contains(domain)
    }

    /// Whether an email's domain is blacklisted.
    #[must_use]
    pub fn is_email_blacklisted(&self, email: &str) -> bool {
        domain_of(email).is_some_and(|d| self.contains(d))
    }

    fn save(&self) -> CoreResult<()> {
        let file = BlacklistFile {
            domains: self.domains.clone(),
        };
        let json = serde_json::to_string_pretty(&file)?;
        std::fs::write(&self.path, json)
            .map_err(|e| CoreError::Storage(format!("{}: {e}", self.path.display())))
    }
}

/// Extract the domain part of an email address.
#[must_use]
pub fn domain_of(email: &str) -> Option<&str> {
    match email.split_once('@') {
        Some((_, domain)) if !domain.is_empty() => Some(domain),
        _ => None,
    }
}
