//! # Access Gateway
//!
//! Validates a license key against the directory, enforces the
//! activation/expiration policy, and resolves the key to its partition.
//! Every request re-runs this decision; nothing here is cached, because
//! license state can change between requests (including the gateway's own
//! auto-deactivation write).

use std::sync::Arc;

use chrono::Utc;
use metrics::counter;
use thiserror::Error;

use crate::directory::{DirectoryError, LicenseDirectory};
use crate::partition::PartitionId;

/// Authorization failures, terminal for the current request.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The key is not present in the directory.
    #[error("unknown license key")]
    InvalidKey,
    /// The key exists but has been explicitly disabled.
    #[error("license has been deactivated")]
    Deactivated,
    /// The key exists but is past its expiry; the record has been flipped
    /// to deactivated as a side effect.
    #[error("license has expired")]
    Expired,
    /// The directory could not be reached; authorization is denied
    /// (fail closed) but the caller may retry.
    #[error("license directory unavailable")]
    DirectoryUnavailable(#[source] DirectoryError),
}

/// Gateway producing an authorization decision for every inbound request.
pub struct AccessGateway {
    directory: Arc<dyn LicenseDirectory>,
}

impl AccessGateway {
    /// Create a gateway over the given directory client.
    pub fn new(directory: Arc<dyn LicenseDirectory>) -> Self {
        Self { directory }
    }

    /// Validate `license_key` and resolve its partition.
    ///
    /// Ordering matters: unknown key, then deactivated, then expired. An
    /// expired license triggers a best-effort deactivation write before the
    /// failure is returned; a failure to persist that write is logged and
    /// never masks the expiry outcome.
    pub async fn authorize(&self, license_key: &str) -> Result<PartitionId, AuthError> {
        if license_key.trim().is_empty() {
            return self.deny(AuthError::InvalidKey);
        }

        let record = self
            .directory
            .find_by_key(license_key)
            .await
            .map_err(AuthError::DirectoryUnavailable)
            .map_err(|err| self.deny_err(err))?;

        let Some(record) = record else {
            return self.deny(AuthError::InvalidKey);
        };

        if !record.active {
            return self.deny(AuthError::Deactivated);
        }

        if let Some(expires_at) = record.expires_at
            && Utc::now() > expires_at
        {
            if let Err(err) = self.directory.deactivate(license_key).await {
                tracing::warn!(
                    error = %err,
                    "Failed to persist auto-deactivation of expired license"
                );
            }
            return self.deny(AuthError::Expired);
        }

        counter!("posgate_authorize_total", "outcome" => "authorized").increment(1);
        Ok(PartitionId::resolve(license_key))
    }

    fn deny(&self, err: AuthError) -> Result<PartitionId, AuthError> {
        Err(self.deny_err(err))
    }

    fn deny_err(&self, err: AuthError) -> AuthError {
        let outcome = match &err {
            AuthError::InvalidKey => "invalid_key",
            AuthError::Deactivated => "deactivated",
            AuthError::Expired => "expired",
            AuthError::DirectoryUnavailable(_) => "directory_unavailable",
        };
        counter!("posgate_authorize_total", "outcome" => outcome).increment(1);
        tracing::info!(outcome, "License authorization denied");
        err
    }
}
