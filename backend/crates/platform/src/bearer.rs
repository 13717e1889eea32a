//! Bearer token extraction
//!
//! The storefront sends its token in a bare `token` header, the admin panel
//! uses `Authorization: Bearer <token>`. Both are accepted.

use axum::http::{HeaderMap, header};

/// Header used by the storefront client
pub const TOKEN_HEADER: &str = "token";

/// Extract a credential token from request headers
///
/// The `token` header wins when both are present. Empty values count as
/// absent.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let from_token_header = headers
        .get(TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    if let Some(token) = from_token_header {
        return Some(token.to_string());
    }

    let authorization = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = authorization.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_token_header() {
        let mut headers = HeaderMap::new();
        headers.insert(TOKEN_HEADER, HeaderValue::from_static("abc.def.ghi"));
        assert_eq!(
            extract_bearer_token(&headers),
            Some("abc.def.ghi".to_string())
        );
    }

    #[test]
    fn test_authorization_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc.def.ghi"),
        );
        assert_eq!(
            extract_bearer_token(&headers),
            Some("abc.def.ghi".to_string())
        );

        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("bearer   xyz"),
        );
        assert_eq!(extract_bearer_token(&headers), Some("xyz".to_string()));
    }

    #[test]
    fn test_token_header_takes_precedence() {
        let mut headers = HeaderMap::new();
        headers.insert(TOKEN_HEADER, HeaderValue::from_static("from-token"));
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer from-auth"),
        );
        assert_eq!(
            extract_bearer_token(&headers),
            Some("from-token".to_string())
        );
    }

    #[test]
    fn test_missing_or_unusable() {
        assert_eq!(extract_bearer_token(&HeaderMap::new()), None);

        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Basic dXNlcjpwYXNz"),
        );
        assert_eq!(extract_bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(extract_bearer_token(&headers), None);

        let mut headers = HeaderMap::new();
        headers.insert(TOKEN_HEADER, HeaderValue::from_static(""));
        assert_eq!(extract_bearer_token(&headers), None);
    }
}
