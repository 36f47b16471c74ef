//! Correlation identifiers carried in the `@extra` field

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Opaque token stamped on a request and echoed on its response
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Creates a correlation ID from an arbitrary token
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CorrelationId {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

/// Generator of fresh correlation IDs
///
/// Each generator draws a random prefix once and appends a monotonically
/// increasing counter, so IDs never repeat for the lifetime of the generator
/// and do not collide with IDs from another generator.
#[derive(Debug)]
pub struct ExtraGenerator {
    prefix: Uuid,
    counter: AtomicU64,
}

impl ExtraGenerator {
    /// Creates a generator with a random prefix
    pub fn new() -> Self {
        Self::with_prefix(Uuid::new_v4())
    }

    /// Creates a generator with a fixed prefix
    pub fn with_prefix(prefix: Uuid) -> Self {
        Self {
            prefix,
            counter: AtomicU64::new(1),
        }
    }

    /// Returns the prefix shared by every ID from this generator
    pub fn prefix(&self) -> Uuid {
        self.prefix
    }

    /// Returns the next unused correlation ID
    pub fn next_id(&self) -> CorrelationId {
        let seq = self.counter.fetch_add(1, Ordering::Relaxed);
        CorrelationId(format!("{}:{}", self.prefix, seq))
    }
}

impl Default for ExtraGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_ids_are_unique() {
        let generator = ExtraGenerator::new();
        let ids: HashSet<CorrelationId> = (0..1000).map(|_| generator.next_id()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_generators_do_not_collide() {
        let a = ExtraGenerator::new();
        let b = ExtraGenerator::new();
        assert_ne!(a.prefix(), b.prefix());
        assert_ne!(a.next_id(), b.next_id());
    }

    #[test]
    fn test_generated_id_format() {
        let prefix = Uuid::nil();
        let generator = ExtraGenerator::with_prefix(prefix);
        assert_eq!(
            generator.next_id().as_str(),
            "00000000-0000-0000-0000-000000000000:1"
        );
        assert_eq!(
            generator.next_id().as_str(),
            "00000000-0000-0000-0000-000000000000:2"
        );
    }

    #[test]
    fn test_correlation_id_serializes_as_plain_string() {
        let id = CorrelationId::new("abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");
        let back: CorrelationId = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(back, id);
    }
}
