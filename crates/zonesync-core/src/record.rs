//! Record and filter types shared by the store adapter and the engines

use serde::{Deserialize, Serialize};
use std::fmt;

/// DNS record types this system manages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    /// TXT record (validation tokens)
    #[serde(rename = "TXT")]
    Txt,
    /// A record (IPv4)
    #[serde(rename = "A")]
    A,
    /// AAAA record (IPv6)
    #[serde(rename = "AAAA")]
    Aaaa,
}

impl RecordKind {
    /// Wire name of the record type
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Txt => "TXT",
            RecordKind::A => "A",
            RecordKind::Aaaa => "AAAA",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One DNS resource record as known to both the engine and the provider
///
/// The `tag` field maps to the provider's free-text comment. It doubles as
/// the ownership marker the dynamic DNS flow selects on and as a
/// last-updated audit trail (the engine restamps it on every patch).
///
/// `id` is the provider-assigned handle. It is absent until the record came
/// back from a query; an update requires it and never changes `name` or
/// `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Fully-qualified record name
    pub name: String,

    /// Record type
    #[serde(rename = "type")]
    pub kind: RecordKind,

    /// Current value: an IP literal or a validation token
    #[serde(default)]
    pub content: String,

    /// Free-text annotation (the provider's `comment` field)
    #[serde(default, rename = "comment")]
    pub tag: String,

    /// Provider-assigned handle, present only on records from a query
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Record {
    /// Return this record with its content replaced; every other field is
    /// carried over unchanged.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Return this record with its tag replaced; every other field is
    /// carried over unchanged.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }
}

/// Selection criteria for a store query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Exact name+type match, optionally narrowed by tag. Used by the ACME
    /// flow, which treats any result count other than one as an error.
    Exact {
        /// Fully-qualified record name
        name: String,
        /// Record type
        kind: RecordKind,
        /// Optional exact tag to narrow the match
        tag: Option<String>,
    },

    /// Tag-prefix match. Used by the dynamic DNS flow; zero results is an
    /// empty cycle, not an error.
    TagPrefix(String),
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Exact {
                name,
                kind,
                tag: Some(tag),
            } => write!(f, "name={name} type={kind} tag={tag}"),
            Filter::Exact {
                name,
                kind,
                tag: None,
            } => write!(f, "name={name} type={kind}"),
            Filter::TagPrefix(prefix) => write!(f, "tag-prefix={prefix}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_deserializes_from_provider_shape() {
        let json = r#"{
            "id": "372e67954025e0ba6aaa6d586b9e0b59",
            "name": "home.example.com",
            "type": "A",
            "content": "203.0.113.5",
            "comment": "ddns/updated/2026-08-06T00:00:00Z"
        }"#;

        let record: Record = serde_json::from_str(json).expect("valid record");
        assert_eq!(record.name, "home.example.com");
        assert_eq!(record.kind, RecordKind::A);
        assert_eq!(record.content, "203.0.113.5");
        assert_eq!(record.tag, "ddns/updated/2026-08-06T00:00:00Z");
        assert_eq!(record.id.as_deref(), Some("372e67954025e0ba6aaa6d586b9e0b59"));
    }

    #[test]
    fn record_tolerates_missing_optional_fields() {
        let json = r#"{"name": "example.com", "type": "TXT"}"#;

        let record: Record = serde_json::from_str(json).expect("valid record");
        assert_eq!(record.content, "");
        assert_eq!(record.tag, "");
        assert_eq!(record.id, None);
    }

    #[test]
    fn with_content_changes_only_content() {
        let record = Record {
            name: "example.com".to_string(),
            kind: RecordKind::Txt,
            content: "old".to_string(),
            tag: "acme".to_string(),
            id: Some("abc".to_string()),
        };

        let updated = record.clone().with_content("new");
        assert_eq!(updated.content, "new");
        assert_eq!(updated.name, record.name);
        assert_eq!(updated.kind, record.kind);
        assert_eq!(updated.tag, record.tag);
        assert_eq!(updated.id, record.id);
    }

    #[test]
    fn kind_serializes_to_wire_names() {
        assert_eq!(serde_json::to_string(&RecordKind::Aaaa).unwrap(), "\"AAAA\"");
        assert_eq!(RecordKind::Txt.as_str(), "TXT");
    }
}
