//! Admin authentication utilities
//!
//! Token issuance lives in an external identity service; this module only
//! validates the opaque admin credential on incoming requests and extracts
//! the acting principal for audit-log text.

use crate::config::AuthConfig;
use crate::errors::{AppError, Result};
use axum::{extract::FromRequestParts, http::request::Parts, http::HeaderMap};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Prefix carried by every issued admin API key
pub const ADMIN_KEY_PREFIX: &str = "ak_";

/// Extracted admin principal available to handlers
#[derive(Debug, Clone)]
pub struct AdminContext {
    /// Username of the acting admin, used only for audit-log text
    pub username: String,

    /// The presented API key
    pub api_key: String,

    /// Request ID for tracing
    pub request_id: String,
}

impl AdminContext {
    /// One-line audit stamp for append-only job logs
    pub fn audit_stamp(&self) -> String {
        format!("admin {}", self.username)
    }
}

/// Hash an admin API key for storage/comparison
pub fn hash_admin_key(api_key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(api_key.as_bytes());
    hex::encode(hasher.finalize())
}

/// Validate an admin API key against a stored hash
pub fn validate_admin_key(api_key: &str, stored_hash: &str) -> bool {
    hash_admin_key(api_key) == stored_hash
}

/// Generate a new admin API key
pub fn generate_admin_key() -> String {
    // Two v4 uuids give 32 bytes of entropy without pulling in rand
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let mut bytes = Vec::with_capacity(32);
    bytes.extend_from_slice(a.as_bytes());
    bytes.extend_from_slice(b.as_bytes());
    format!("{}{}", ADMIN_KEY_PREFIX, hex::encode(bytes))
}

/// Extract the bearer token from an Authorization header value
pub fn extract_bearer(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

/// Validate the admin credential headers against configuration.
///
/// When `admin_key_hash` is unset the key is only shape-checked, which keeps
/// local development workable without minting keys.
pub fn authorize_headers(headers: &HeaderMap, config: &AuthConfig) -> Result<()> {
    let auth_header = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized {
            message: "Missing Authorization header".to_string(),
        })?;

    let key = extract_bearer(auth_header).ok_or_else(|| AppError::Unauthorized {
        message: "Authorization header must be a bearer token".to_string(),
    })?;

    if !key.starts_with(ADMIN_KEY_PREFIX) {
        return Err(AppError::InvalidApiKey);
    }

    if let Some(ref stored_hash) = config.admin_key_hash {
        if !validate_admin_key(key, stored_hash) {
            return Err(AppError::InvalidApiKey);
        }
    }

    Ok(())
}

/// Axum extractor for AdminContext
///
/// Full credential validation happens in the gateway's auth middleware; the
/// extractor re-checks key shape and pulls out the principal fields.
impl<S> FromRequestParts<S> for AdminContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        // Extract request ID
        let request_id = parts
            .headers
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .map(String::from)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        // Extract API key
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized {
                message: "Missing Authorization header".to_string(),
            })?;

        let api_key = extract_bearer(auth_header)
            .map(String::from)
            .ok_or_else(|| AppError::Unauthorized {
                message: "Authorization header must be a bearer token".to_string(),
            })?;

        if !api_key.starts_with(ADMIN_KEY_PREFIX) {
            return Err(AppError::InvalidApiKey);
        }

        // Acting admin username for audit-log text
        let username = parts
            .headers
            .get("x-admin-user")
            .and_then(|v| v.to_str().ok())
            .map(String::from)
            .unwrap_or_else(|| "unknown".to_string());

        Ok(AdminContext {
            username,
            api_key,
            request_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_admin_key() {
        let key = "ak_test_12345";
        let hash = hash_admin_key(key);
        assert!(validate_admin_key(key, &hash));
        assert!(!validate_admin_key("wrong_key", &hash));
    }

    #[test]
    fn test_generate_admin_key() {
        let key = generate_admin_key();
        assert!(key.starts_with(ADMIN_KEY_PREFIX));
        assert!(key.len() > 10);
    }

    #[test]
    fn test_extract_bearer() {
        assert_eq!(extract_bearer("Bearer ak_123"), Some("ak_123"));
        assert_eq!(extract_bearer("ak_123"), None);
        assert_eq!(extract_bearer("Basic abc"), None);
    }

    #[test]
    fn test_authorize_headers_requires_key() {
        let config = AuthConfig {
            admin_key_hash: None,
            admin_user_header: "X-Admin-User".into(),
            request_id_header: "X-Request-ID".into(),
        };

        let mut headers = HeaderMap::new();
        assert!(authorize_headers(&headers, &config).is_err());

        headers.insert("authorization", "Bearer ak_dev".parse().unwrap());
        assert!(authorize_headers(&headers, &config).is_ok());

        headers.insert("authorization", "Bearer pk_dev".parse().unwrap());
        assert!(authorize_headers(&headers, &config).is_err());
    }

    #[test]
    fn test_authorize_headers_checks_hash() {
        let key = "ak_prod_secret";
        let config = AuthConfig {
            admin_key_hash: Some(hash_admin_key(key)),
            admin_user_header: "X-Admin-User".into(),
            request_id_header: "X-Request-ID".into(),
        };

        let mut headers = HeaderMap::new();
        headers.insert("authorization", format!("Bearer {}", key).parse().unwrap());
        assert!(authorize_headers(&headers, &config).is_ok());

        headers.insert("authorization", "Bearer ak_other".parse().unwrap());
        assert!(authorize_headers(&headers, &config).is_err());
    }
}
