//! Reading and writing bearer tokens on `http` requests and responses.
//!
//! A client presents its token as
//!
//! ```text
//! Authorization: Bearer <token>
//! ```
//!
//! or, where it cannot set headers (an `EventSource`, a WebSocket
//! upgrade from a browser), as a query parameter:
//!
//! ```text
//! GET /events?auth=Bearer%20<token>
//! ```
//!
//! The header wins when both are present. Newly issued tokens go back to
//! the client in an `Authorization` response header of the same form.
//! Headers are used instead of cookies because browsers never attach them
//! automatically, which rules out classic CSRF.

use std::borrow::Cow;

use http::header::{AUTHORIZATION, HeaderMap, HeaderValue, InvalidHeaderValue};
use http::request::Parts;
use http::{Request, Uri};
use sigil_token::Token;

use crate::SessionError;

/// Name of the query parameter consulted when there is no header.
pub const AUTH_QUERY_PARAM: &str = "auth";

/// The only supported scheme, including its separating space.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Anything a token can be read from: request headers plus the URI.
///
/// Implemented for [`http::Request`] and [`http::request::Parts`], which
/// covers frameworks that hand out either (axum's extractors see `Parts`).
pub trait BearerSource {
    /// The request headers.
    fn headers(&self) -> &HeaderMap;

    /// The request URI, for the query-parameter fallback.
    fn uri(&self) -> &Uri;
}

impl<B> BearerSource for Request<B> {
    fn headers(&self) -> &HeaderMap {
        Request::headers(self)
    }

    fn uri(&self) -> &Uri {
        Request::uri(self)
    }
}

impl BearerSource for Parts {
    fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    fn uri(&self) -> &Uri {
        &self.uri
    }
}

/// Returns the raw credential (scheme and token) carried by `source`.
///
/// # Errors
/// - [`SessionError::NoToken`] if neither the header nor the query
///   parameter has a non-empty value
/// - [`SessionError::UnsupportedTokenType`] if the header value is not
///   visible ASCII
pub fn credential<Q>(source: &Q) -> Result<Cow<'_, str>, SessionError>
where
    Q: BearerSource + ?Sized,
{
    if let Some(value) = source.headers().get(AUTHORIZATION) {
        let value = value
            .to_str()
            .map_err(|_| SessionError::UnsupportedTokenType)?;
        if !value.is_empty() {
            return Ok(Cow::Borrowed(value));
        }
    }

    match query_param(source.uri(), AUTH_QUERY_PARAM) {
        Some(value) if !value.is_empty() => Ok(Cow::Owned(value)),
        _ => Err(SessionError::NoToken),
    }
}

/// Returns the token string that follows `Bearer ` in the credential.
///
/// The scheme match is exact and case-sensitive.
///
/// # Errors
/// As [`credential`], plus [`SessionError::UnsupportedTokenType`] when
/// the credential uses any other scheme.
pub fn bearer_token<Q>(source: &Q) -> Result<Cow<'_, str>, SessionError>
where
    Q: BearerSource + ?Sized,
{
    let token = match credential(source)? {
        Cow::Borrowed(value) => {
            value.strip_prefix(BEARER_PREFIX).map(Cow::Borrowed)
        }
        Cow::Owned(value) => value
            .strip_prefix(BEARER_PREFIX)
            .map(|token| Cow::Owned(token.to_owned())),
    };
    token.ok_or(SessionError::UnsupportedTokenType)
}

/// Builds the `Bearer <token>` header value for a response.
pub fn header_value(token: &Token) -> Result<HeaderValue, InvalidHeaderValue> {
    HeaderValue::try_from(format!("{BEARER_PREFIX}{token}"))
}

/// First value of `name` in the query string, percent-decoded with `+`
/// read as a space. Pairs that fail to decode are skipped.
fn query_param(uri: &Uri, name: &str) -> Option<String> {
    uri.query()?
        .split('&')
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (key == name).then_some(value)
        })
        .find_map(|value| {
            urlencoding::decode(&value.replace('+', " "))
                .ok()
                .map(Cow::into_owned)
        })
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn request(uri: &str, authorization: Option<&str>) -> Request<()> {
        let mut builder = Request::builder().uri(uri);
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap()
    }

    #[test]
    fn test_bearer_token_from_header() {
        let req = request("http://example.com/", Some("Bearer abc123"));
        assert_eq!(bearer_token(&req).unwrap(), "abc123");
    }

    #[test]
    fn test_bearer_token_from_query_percent_encoded() {
        let req = request("http://example.com/?auth=Bearer%20abc-_123", None);
        assert_eq!(bearer_token(&req).unwrap(), "abc-_123");
    }

    #[test]
    fn test_bearer_token_from_query_plus_as_space() {
        let req = request("http://example.com/?x=1&auth=Bearer+abc&y=2", None);
        assert_eq!(bearer_token(&req).unwrap(), "abc");
    }

    #[test]
    fn test_header_takes_precedence_over_query() {
        let req = request(
            "http://example.com/?auth=Bearer%20from-query",
            Some("Bearer from-header"),
        );
        assert_eq!(bearer_token(&req).unwrap(), "from-header");
    }

    #[test]
    fn test_empty_header_falls_back_to_query() {
        let req = request("http://example.com/?auth=Bearer%20q", Some(""));
        assert_eq!(bearer_token(&req).unwrap(), "q");
    }

    #[test]
    fn test_no_header_no_query_returns_no_token() {
        let req = request("http://example.com/?other=1", None);
        assert!(matches!(bearer_token(&req), Err(SessionError::NoToken)));

        let req = request("http://example.com/", None);
        assert!(matches!(bearer_token(&req), Err(SessionError::NoToken)));
    }

    #[test]
    fn test_empty_query_value_returns_no_token() {
        let req = request("http://example.com/?auth=", None);
        assert!(matches!(bearer_token(&req), Err(SessionError::NoToken)));
    }

    #[test]
    fn test_other_schemes_return_unsupported_token_type() {
        for value in ["Basic xyz", "bearer abc", "Bearer", "BearerXabc", "INVALID abc"]
        {
            let req = request("http://example.com/", Some(value));
            assert!(
                matches!(
                    bearer_token(&req),
                    Err(SessionError::UnsupportedTokenType)
                ),
                "{value:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_non_ascii_header_returns_unsupported_token_type() {
        let mut req = request("http://example.com/", None);
        req.headers_mut().insert(
            AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer \xff\xfe").unwrap(),
        );
        assert!(matches!(
            bearer_token(&req),
            Err(SessionError::UnsupportedTokenType)
        ));
    }

    #[test]
    fn test_parts_are_a_bearer_source() {
        let (parts, ()) =
            request("http://example.com/", Some("Bearer p")).into_parts();
        assert_eq!(bearer_token(&parts).unwrap(), "p");
    }

    #[test]
    fn test_header_value_has_bearer_prefix() {
        let key = sigil_token::SigningKey::new("k").unwrap();
        let token = sigil_token::codec::issue_default(&key).unwrap();

        let value = header_value(&token).unwrap();

        assert_eq!(value.to_str().unwrap(), format!("Bearer {token}"));
    }
}
