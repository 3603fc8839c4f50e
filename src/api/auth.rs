//! Basic authentication middleware for Axum

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::debug;

use super::AppState;
use crate::error::{Result, StoreError};

/// Extract `(user, pass)` from a `Basic` authorization header
fn decode_basic_credentials(header: &str) -> Result<(String, String)> {
    let encoded = header
        .strip_prefix("Basic ")
        .ok_or_else(|| StoreError::Unauthorized("invalid authorization method".to_string()))?;

    let decoded = STANDARD
        .decode(encoded)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .ok_or_else(|| StoreError::Unauthorized("invalid base64 encoding".to_string()))?;

    decoded
        .split_once(':')
        .map(|(user, pass)| (user.to_string(), pass.to_string()))
        .ok_or_else(|| StoreError::Unauthorized("invalid authorization credentials".to_string()))
}

/// Basic authentication middleware
///
/// Passes every request through when no credentials are configured.
pub async fn basic_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response> {
    let auth = &state.server.auth;
    if !auth.is_enabled() {
        return Ok(next.run(request).await);
    }

    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| StoreError::Unauthorized("authorization required".to_string()))?;

    let (user, pass) = decode_basic_credentials(header)?;
    if user != auth.user || pass != auth.pass {
        debug!("Rejected credentials for user '{}'", user);
        return Err(StoreError::Unauthorized(
            "invalid username or password".to_string(),
        ));
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_valid_credentials() {
        // "user:pa:ss"
        let (user, pass) = decode_basic_credentials("Basic dXNlcjpwYTpzcw==").unwrap();
        assert_eq!(user, "user");
        assert_eq!(pass, "pa:ss");
    }

    #[test]
    fn test_decode_rejects_other_schemes() {
        assert!(matches!(
            decode_basic_credentials("Bearer abc"),
            Err(StoreError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_decode_rejects_bad_base64() {
        assert!(decode_basic_credentials("Basic ***").is_err());
    }

    #[test]
    fn test_decode_rejects_missing_separator() {
        // "nocolon"
        assert!(decode_basic_credentials("Basic bm9jb2xvbg==").is_err());
    }
}
