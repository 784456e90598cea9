//! Partition identifier derivation and namespace-name hygiene.
//!
//! A [`PartitionId`] names the isolated per-tenant namespace inside the shared
//! store. It is derived from the license key alone: the same key always lands
//! in the same partition, and distinct keys never share one.

use sha2::{Digest, Sha256};

/// Prefix applied to every partition namespace name.
const SCHEMA_PREFIX: &str = "tenant_";

/// Number of digest bytes carried into the namespace name. 128 bits keeps the
/// name inside PostgreSQL's 63-byte identifier limit while making collisions
/// between distinct keys negligible.
const DIGEST_BYTES: usize = 16;

/// Identifier of one tenant's isolated namespace within the partition store.
///
/// Stable across process restarts: the derivation uses no clock, randomness,
/// or I/O, only the full key bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PartitionId(String);

impl PartitionId {
    /// Derive the partition identifier for a license key.
    pub fn resolve(license_key: &str) -> Self {
        let digest = Sha256::digest(license_key.as_bytes());
        Self(format!(
            "{}{}",
            SCHEMA_PREFIX,
            hex::encode(&digest[..DIGEST_BYTES])
        ))
    }

    /// The namespace (schema) name this identifier maps to.
    pub fn schema_name(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PartitionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validate a namespace name against the shape the resolver produces.
///
/// The identifier is derived, but it is still treated as untrusted input at
/// the store boundary before it is spliced into session-scoping statements.
pub fn is_valid_schema_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 63
        && name.starts_with(SCHEMA_PREFIX)
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// Double-quote an identifier for safe inclusion in SQL text.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_is_deterministic() {
        let a = PartitionId::resolve("ABC-123");
        let b = PartitionId::resolve("ABC-123");

        assert_eq!(a, b);
        assert_eq!(a.schema_name(), b.schema_name());
    }

    #[test]
    fn test_resolve_distinct_keys_distinct_partitions() {
        let a = PartitionId::resolve("ABC-123");
        let b = PartitionId::resolve("ABC-124");

        assert_ne!(a, b);
    }

    #[test]
    fn test_shared_prefix_keys_do_not_collide() {
        // Keys sharing a long common prefix still resolve apart because the
        // digest covers the full key, not a truncation of it.
        let a = PartitionId::resolve("LICENSE-2026-CUSTOMER-0001");
        let b = PartitionId::resolve("LICENSE-2026-CUSTOMER-0002");

        assert_ne!(a, b);
    }

    #[test]
    fn test_resolved_name_is_valid_schema_name() {
        let id = PartitionId::resolve("any key at all, even with spaces & symbols!");

        assert!(is_valid_schema_name(id.schema_name()));
        assert_eq!(id.schema_name().len(), SCHEMA_PREFIX.len() + DIGEST_BYTES * 2);
    }

    #[test]
    fn test_schema_name_validation_rejects_injection_shapes() {
        assert!(!is_valid_schema_name(""));
        assert!(!is_valid_schema_name("public"));
        assert!(!is_valid_schema_name("tenant_abc; DROP TABLE products"));
        assert!(!is_valid_schema_name("tenant_ABC"));
        assert!(!is_valid_schema_name(&format!(
            "tenant_{}",
            "a".repeat(80)
        )));
    }

    #[test]
    fn test_quote_ident_escapes_embedded_quotes() {
        assert_eq!(quote_ident("tenant_ab"), "\"tenant_ab\"");
        assert_eq!(quote_ident("ten\"ant"), "\"ten\"\"ant\"");
    }
}
