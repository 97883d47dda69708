//! External address discovery trait

use crate::error::{Error, Result};
use crate::record::RecordKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

/// IP address family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressFamily {
    /// IPv4
    V4,
    /// IPv6
    V6,
}

impl AddressFamily {
    /// The record type an address of this family belongs in
    pub fn record_kind(self) -> RecordKind {
        match self {
            AddressFamily::V4 => RecordKind::A,
            AddressFamily::V6 => RecordKind::Aaaa,
        }
    }

    /// The family whose address a record of kind `kind` carries, or `None`
    /// for kinds that cannot hold an address (TXT).
    pub fn for_record(kind: RecordKind) -> Option<AddressFamily> {
        match kind {
            RecordKind::A => Some(AddressFamily::V4),
            RecordKind::Aaaa => Some(AddressFamily::V6),
            RecordKind::Txt => None,
        }
    }

    /// Whether `addr` belongs to this family
    pub fn matches(self, addr: IpAddr) -> bool {
        match self {
            AddressFamily::V4 => addr.is_ipv4(),
            AddressFamily::V6 => addr.is_ipv6(),
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressFamily::V4 => f.write_str("IPv4"),
            AddressFamily::V6 => f.write_str("IPv6"),
        }
    }
}

impl FromStr for AddressFamily {
    type Err = Error;

    /// Parse a family selector from configuration. Anything outside the
    /// supported set fails with [`Error::UnsupportedFamily`].
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "4" | "v4" | "ipv4" => Ok(AddressFamily::V4),
            "6" | "v6" | "ipv6" => Ok(AddressFamily::V6),
            other => Err(Error::UnsupportedFamily(other.to_string())),
        }
    }
}

/// Trait for public address discovery
///
/// The two families are independent: a failure resolving one must not block
/// or fail the other. The engine issues both lookups concurrently and treats
/// each failure as "this family is unavailable this cycle".
#[async_trait::async_trait]
pub trait AddressSource: Send + Sync {
    /// Return the caller's current public address for `family`.
    ///
    /// # Errors
    ///
    /// [`Error::Transport`](crate::Error::Transport) on network failure,
    /// [`Error::Decode`](crate::Error::Decode) when the service answer is
    /// unusable (including an address of the wrong family).
    async fn resolve(&self, family: AddressFamily) -> Result<IpAddr>;
}
