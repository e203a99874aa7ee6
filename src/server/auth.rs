//! Admin token handling.
//!
//! The upload endpoint is guarded by a single static shared secret carried
//! in the `X-Admin-Token` header. The token is injected via configuration or
//! the `ADMIN_SECRET_TOKEN` environment variable; when neither is set a
//! random one is generated at startup and logged so the operator can copy it.

use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("未提供驗證 token")]
    Missing,

    #[error("驗證 token 無效")]
    Invalid,
}

/// Resolve the admin token: configured value, then environment, then a
/// freshly generated one (logged with a warning).
pub fn resolve_admin_token(configured: Option<String>) -> String {
    if let Some(token) = configured.filter(|t| !t.is_empty()) {
        return token;
    }

    if let Ok(token) = std::env::var("ADMIN_SECRET_TOKEN") {
        if !token.is_empty() {
            return token;
        }
    }

    let token = generate_token();
    tracing::warn!("ADMIN_SECRET_TOKEN 未設定，已自動產生: {}", token);
    tracing::warn!("請將此 token 設定到環境變數中以確保一致性");
    token
}

/// A random 64-hex-char token.
pub fn generate_token() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

/// Check a presented token against the expected one.
///
/// Both sides are hashed to a fixed width before comparison so equality cost
/// does not depend on the token contents.
pub fn verify_token(expected: &str, presented: Option<&str>) -> Result<(), AuthError> {
    let presented = match presented {
        Some(token) if !token.is_empty() => token,
        _ => return Err(AuthError::Missing),
    };

    let expected_digest = Sha256::digest(expected.as_bytes());
    let presented_digest = Sha256::digest(presented.as_bytes());
    if expected_digest == presented_digest {
        Ok(())
    } else {
        Err(AuthError::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_token_is_64_hex_chars() {
        let token = generate_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_configured_token_wins() {
        assert_eq!(
            resolve_admin_token(Some("configured".to_string())),
            "configured"
        );
    }

    #[test]
    fn test_empty_configured_token_is_ignored() {
        // Falls through to env or generation; either way it is not "".
        let token = resolve_admin_token(Some(String::new()));
        assert!(!token.is_empty());
    }

    #[test]
    fn test_verify_token() {
        assert_eq!(verify_token("secret", None), Err(AuthError::Missing));
        assert_eq!(verify_token("secret", Some("")), Err(AuthError::Missing));
        assert_eq!(verify_token("secret", Some("wrong")), Err(AuthError::Invalid));
        assert_eq!(verify_token("secret", Some("secret")), Ok(()));
    }
}
