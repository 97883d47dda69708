//! Configuration types for the zonesync flows

use crate::error::{Error, Result};
use crate::traits::AddressFamily;
use serde::{Deserialize, Serialize};

/// Configuration for the ACME validation-token flow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcmeConfig {
    /// Domain under validation; the flow targets
    /// `_acme-challenge.{domain}`.
    pub domain: String,

    /// Validation token to publish
    pub token: String,

    /// Optional exact tag to narrow the record query
    #[serde(default)]
    pub tag: Option<String>,

    /// Confirmation retry budget; the verifier performs at most this many
    /// lookups plus one
    #[serde(default = "default_confirm_attempts")]
    pub confirm_attempts: usize,

    /// Fixed delay before each confirmation lookup (in seconds)
    #[serde(default = "default_confirm_delay_secs")]
    pub confirm_delay_secs: u64,
}

impl AcmeConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        validate_domain_name(&self.domain)?;
        if self.token.is_empty() {
            return Err(Error::config("validation token cannot be empty"));
        }
        Ok(())
    }
}

/// Configuration for the dynamic DNS flow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Tag prefix selecting the managed record set
    pub tag_prefix: String,

    /// Reconciliation interval (in seconds)
    pub interval_secs: u64,

    /// Address families this deployment can resolve. A tagged record whose
    /// type needs a family outside this set is a startup error.
    #[serde(default = "default_families")]
    pub families: Vec<AddressFamily>,
}

impl SyncConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.tag_prefix.is_empty() {
            return Err(Error::config("tag prefix cannot be empty"));
        }
        if self.interval_secs == 0 {
            return Err(Error::config("reconciliation interval must be > 0"));
        }
        if self.families.is_empty() {
            return Err(Error::config(
                "at least one address family must be enabled",
            ));
        }
        Ok(())
    }
}

fn default_confirm_attempts() -> usize {
    10
}

fn default_confirm_delay_secs() -> u64 {
    10
}

fn default_families() -> Vec<AddressFamily> {
    vec![AddressFamily::V4, AddressFamily::V6]
}

/// Validate that a string is a plausible DNS domain name
///
/// Basic RFC 1035 shape checks; not comprehensive, but catches the common
/// misconfigurations before they turn into confusing query results.
pub fn validate_domain_name(domain: &str) -> Result<()> {
    if domain.is_empty() {
        return Err(Error::config("domain name cannot be empty"));
    }

    if domain.len() > 253 {
        return Err(Error::config(format!(
            "domain name too long: {} chars (max 253)",
            domain.len()
        )));
    }

    for label in domain.split('.') {
        if label.is_empty() {
            return Err(Error::config(format!(
                "domain name has an empty label: '{domain}'"
            )));
        }
        if label.len() > 63 {
            return Err(Error::config(format!(
                "domain label too long: {} chars (max 63): '{label}'",
                label.len()
            )));
        }
        if !label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(Error::config(format!(
                "domain label contains invalid characters: '{label}'"
            )));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(Error::config(format!(
                "domain label cannot start or end with a hyphen: '{label}'"
            )));
        }
    }

    Ok(())
}
