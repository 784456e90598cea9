//! # License Authentication
//!
//! Middleware gating every data route behind a fresh gateway decision. The
//! resolved partition travels to handlers through request extensions;
//! handlers never see the raw license key.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::error::{ApiError, unauthorized};
use crate::partition::PartitionId;
use crate::server::AppState;

/// Header carrying the client installation's license key.
pub const LICENSE_KEY_HEADER: &str = "X-License-Key";

/// Extractor payload for the resolved partition of the current request.
#[derive(Debug, Clone)]
pub struct PartitionExtension(pub PartitionId);

/// Middleware that validates the license key and resolves its partition.
///
/// Runs on every request to the data routes; a positive decision is never
/// reused across requests.
pub async fn license_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let license_key = extract_license_key(request.headers())?;
    let partition = state.gateway.authorize(&license_key).await?;

    tracing::debug!(partition = %partition, "License authorized");

    let mut request = request;
    request
        .extensions_mut()
        .insert(PartitionExtension(partition));

    Ok(next.run(request).await)
}

pub(crate) fn extract_license_key(headers: &HeaderMap) -> Result<String, ApiError> {
    headers
        .get(LICENSE_KEY_HEADER)
        .ok_or_else(|| unauthorized(Some("Missing X-License-Key header")))?
        .to_str()
        .map(str::to_owned)
        .map_err(|_| unauthorized(Some("X-License-Key header must be valid UTF-8")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_license_key() {
        let mut headers = HeaderMap::new();
        headers.insert(LICENSE_KEY_HEADER, HeaderValue::from_static("KEY-1"));

        assert_eq!(extract_license_key(&headers).unwrap(), "KEY-1");
    }

    #[test]
    fn test_missing_header_is_unauthorized() {
        let headers = HeaderMap::new();

        let err = extract_license_key(&headers).unwrap_err();

        assert_eq!(err.code, Box::from("UNAUTHORIZED"));
    }
}
