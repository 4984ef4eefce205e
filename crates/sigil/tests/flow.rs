//! Integration tests for the full session flow through the `sigil` façade.

use std::sync::Arc;

use http::Request;
use http::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use sigil::prelude::*;
use sigil_session::testutil::RecordingStore;
use sigil_token::testutil::FailingRng;

// =========================================================================
// Helpers
// =========================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct User {
    name: String,
    reqs: u32,
}

fn user(reqs: u32) -> User {
    User {
        name: "tester".into(),
        reqs,
    }
}

fn sessions() -> SessionManager<Arc<RecordingStore>> {
    SigilBuilder::new()
        .signing_key("testsigningkey")
        .build(Arc::new(RecordingStore::new()))
        .expect("valid settings")
}

fn with_authorization(value: &str) -> Request<()> {
    Request::builder()
        .uri("https://api.example.com/me")
        .header(AUTHORIZATION, value)
        .body(())
        .unwrap()
}

/// Copies the response's `Authorization` header onto a fresh request,
/// the way a client echoes its token back.
fn echo(response: &http::HeaderMap) -> Request<()> {
    let value = response
        .get(AUTHORIZATION)
        .expect("token header set")
        .to_str()
        .unwrap();
    with_authorization(value)
}

// =========================================================================
// Full lifecycle
// =========================================================================

#[tokio::test]
async fn test_session_lifecycle_begin_get_update_end() {
    let sessions = sessions();

    // Sign in.
    let mut response = http::HeaderMap::new();
    let issued = sessions.begin_session(&mut response, &user(0)).await.unwrap();
    let header = response.get(AUTHORIZATION).unwrap().to_str().unwrap();
    assert_eq!(header, format!("Bearer {issued}"));
    assert_eq!(sessions.store().saves(), 1);

    // Authenticated request.
    let request = echo(&response);
    let (token, state): (Token, User) =
        sessions.get_state(&request).await.unwrap();
    assert_eq!(token, issued);
    assert_eq!(state, user(0));

    // State change.
    sessions.update_state(&token, &user(1)).await.unwrap();
    let (_, state): (Token, User) = sessions.get_state(&request).await.unwrap();
    assert_eq!(state, user(1));

    // Sign out.
    sessions.end_session(&request).await.unwrap();
    let err = sessions
        .get_state::<User, _>(&request)
        .await
        .expect_err("session ended");
    assert!(matches!(err, SessionError::Store(StoreError::NotFound)));
    assert!(err.is_unauthenticated());
    assert!(sessions.store().is_empty().await);
}

#[tokio::test]
async fn test_token_via_query_parameter() {
    let sessions = sessions();
    let mut response = http::HeaderMap::new();
    let token = sessions.begin_session(&mut response, &user(0)).await.unwrap();

    let request = Request::builder()
        .uri(format!("https://api.example.com/events?auth=Bearer%20{token}"))
        .body(())
        .unwrap();
    let (_, state): (Token, User) = sessions.get_state(&request).await.unwrap();

    assert_eq!(state, user(0));
}

#[tokio::test]
async fn test_works_with_request_parts() {
    let sessions = sessions();
    let mut response = http::HeaderMap::new();
    sessions.begin_session(&mut response, &user(4)).await.unwrap();

    let (parts, ()) = echo(&response).into_parts();
    let (_, state): (Token, User) = sessions.get_state(&parts).await.unwrap();

    assert_eq!(state, user(4));
}

// =========================================================================
// Rejections
// =========================================================================

#[tokio::test]
async fn test_request_without_token_is_anonymous() {
    let sessions = sessions();
    let request = Request::builder().uri("/").body(()).unwrap();

    let err = sessions.get_state::<User, _>(&request).await.unwrap_err();

    assert!(matches!(err, SessionError::NoToken));
    assert_eq!(sessions.store().gets(), 0);
}

#[tokio::test]
async fn test_basic_auth_is_unsupported() {
    let sessions = sessions();

    let err = sessions
        .get_state::<User, _>(&with_authorization("Basic xyz"))
        .await
        .unwrap_err();

    assert!(matches!(err, SessionError::UnsupportedTokenType));
}

#[tokio::test]
async fn test_malformed_token_is_invalid() {
    let sessions = sessions();

    let err = sessions
        .get_state::<User, _>(&with_authorization("Bearer not-base64!!"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SessionError::InvalidToken(TokenError::Decoding(_))
    ));
    assert_eq!(sessions.store().gets(), 0);
}

#[tokio::test]
async fn test_tampered_token_is_invalid() {
    let sessions = sessions();
    let mut response = http::HeaderMap::new();
    let token = sessions.begin_session(&mut response, &user(0)).await.unwrap();

    // Swap the first character for a different base64url symbol.
    let encoded = token.to_string();
    let first = if encoded.starts_with('A') { "B" } else { "A" };
    let tampered = format!("Bearer {first}{}", &encoded[1..]);

    let err = sessions
        .get_state::<User, _>(&with_authorization(&tampered))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SessionError::InvalidToken(TokenError::SignatureInvalid)
    ));
}

#[tokio::test]
async fn test_failed_issuance_writes_nothing() {
    let sessions = sessions().with_entropy(FailingRng);
    let mut response = http::HeaderMap::new();

    let err = sessions
        .begin_session(&mut response, &user(0))
        .await
        .unwrap_err();

    assert!(matches!(err, SessionError::Issue(_)));
    assert_eq!(sessions.store().saves(), 0);
    assert!(response.is_empty());
}

#[tokio::test]
async fn test_store_failure_surfaces_unchanged() {
    let sessions = sessions();
    sessions.store().set_failing(true);

    let err = sessions
        .begin_session(&mut http::HeaderMap::new(), &user(0))
        .await
        .unwrap_err();

    assert!(matches!(err, SessionError::Store(StoreError::Backend(_))));
    assert!(!err.is_unauthenticated());
}

// =========================================================================
// Key rotation
// =========================================================================

#[tokio::test]
async fn test_key_rotation_keeps_old_sessions_alive() {
    let store = Arc::new(RecordingStore::new());

    let old = SigilBuilder::new()
        .signing_key("key-2024")
        .build(Arc::clone(&store))
        .unwrap();
    let mut response = http::HeaderMap::new();
    old.begin_session(&mut response, &user(0)).await.unwrap();

    // Rotate: new key first, old key kept for verification.
    let rotated = SigilBuilder::new()
        .signing_keys(["key-2025", "key-2024"])
        .build(Arc::clone(&store))
        .unwrap();
    let (_, state): (Token, User) =
        rotated.get_state(&echo(&response)).await.unwrap();
    assert_eq!(state, user(0));

    // Retire the old key: its tokens stop verifying.
    let retired = SigilBuilder::new()
        .signing_key("key-2025")
        .build(Arc::clone(&store))
        .unwrap();
    let err = retired
        .get_state::<User, _>(&echo(&response))
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::InvalidToken(_)));
}

#[tokio::test]
async fn test_sigil_error_wraps_session_errors() {
    async fn load(
        sessions: &SessionManager<Arc<RecordingStore>>,
        request: &Request<()>,
    ) -> Result<User, SigilError> {
        let (_, state) = sessions.get_state(request).await?;
        Ok(state)
    }

    let sessions = sessions();
    let request = Request::builder().uri("/").body(()).unwrap();

    let err = load(&sessions, &request).await.unwrap_err();

    assert!(matches!(err, SigilError::Session(SessionError::NoToken)));
    assert!(err.is_unauthenticated());
}

#[tokio::test]
async fn test_sigil_error_wraps_direct_codec_and_store_calls() {
    async fn lookup(
        store: &RecordingStore,
        key: &SigningKey,
        raw: &str,
    ) -> Result<User, SigilError> {
        let token = codec::verify(raw, key)?;
        Ok(store.get(token.id()).await?)
    }

    let store = RecordingStore::new();
    let key = SigningKey::new("testsigningkey").unwrap();

    let err = lookup(&store, &key, "AAAA").await.unwrap_err();
    assert!(matches!(err, SigilError::Token(TokenError::TooShort { .. })));

    let token = codec::issue_default(&key).unwrap();
    let err = lookup(&store, &key, &token.to_string()).await.unwrap_err();
    assert!(matches!(err, SigilError::Store(StoreError::NotFound)));
    assert!(err.is_unauthenticated());
}
