use std::sync::Arc;

use http::{HeaderMap, Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use sigil::prelude::*;

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visitor {
    name: String,
    reqs: u32,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

type Sessions = Arc<SessionManager<MemoryStore<JsonCodec>>>;

fn respond(status: StatusCode, headers: HeaderMap, body: String) -> Response<String> {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

/// Answers every "no usable session" outcome with the same 401, and
/// anything else with a 500.
fn reject(err: SessionError) -> Response<String> {
    if err.is_unauthenticated() {
        return respond(StatusCode::UNAUTHORIZED, HeaderMap::new(), "sign in first".into());
    }
    tracing::error!(error = %err, "session failure");
    respond(StatusCode::INTERNAL_SERVER_ERROR, HeaderMap::new(), String::new())
}

/// `POST /sign-in` with the visitor's name as the body.
async fn sign_in(sessions: &Sessions, request: Request<String>) -> Response<String> {
    let visitor = Visitor {
        name: request.into_body(),
        reqs: 0,
    };
    let mut headers = HeaderMap::new();
    match sessions.begin_session(&mut headers, &visitor).await {
        Ok(_) => respond(StatusCode::OK, headers, format!("hello, {}", visitor.name)),
        Err(e) => reject(e),
    }
}

/// `GET /me`: counts the visitor's requests.
async fn me(sessions: &Sessions, request: Request<String>) -> Response<String> {
    let (token, mut visitor) = match sessions.get_state::<Visitor, _>(&request).await {
        Ok(found) => found,
        Err(e) => return reject(e),
    };
    visitor.reqs += 1;
    if let Err(e) = sessions.update_state(&token, &visitor).await {
        return reject(e);
    }
    match serde_json::to_string(&visitor) {
        Ok(body) => respond(StatusCode::OK, HeaderMap::new(), body),
        Err(e) => {
            tracing::error!(error = %e, "encoding response");
            respond(StatusCode::INTERNAL_SERVER_ERROR, HeaderMap::new(), String::new())
        }
    }
}

/// `POST /sign-out`.
async fn sign_out(sessions: &Sessions, request: Request<String>) -> Response<String> {
    match sessions.end_session(&request).await {
        Ok(()) => respond(StatusCode::NO_CONTENT, HeaderMap::new(), String::new()),
        Err(e) => reject(e),
    }
}

fn request_with(token_header: Option<&http::HeaderValue>, body: &str) -> Request<String> {
    let mut request = Request::new(body.to_string());
    if let Some(value) = token_header {
        request
            .headers_mut()
            .insert(http::header::AUTHORIZATION, value.clone());
    }
    request
}

// ---------------------------------------------------------------------------
// Walk-through
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let key = std::env::var("SIGIL_KEY").unwrap_or_else(|_| "demo-signing-key".into());
    let sessions: Sessions = Arc::new(
        SigilBuilder::new()
            .signing_key(key)
            .build(MemoryStore::new())?,
    );

    let response = sign_in(&sessions, request_with(None, "tester")).await;
    eprintln!("sign-in  -> {} {}", response.status(), response.body());
    let token = response
        .headers()
        .get(http::header::AUTHORIZATION)
        .cloned()
        .ok_or("sign-in returned no token")?;

    for _ in 0..2 {
        let response = me(&sessions, request_with(Some(&token), "")).await;
        eprintln!("me       -> {} {}", response.status(), response.body());
    }

    let response = sign_out(&sessions, request_with(Some(&token), "")).await;
    eprintln!("sign-out -> {}", response.status());

    let response = me(&sessions, request_with(Some(&token), "")).await;
    eprintln!("me       -> {} {}", response.status(), response.body());

    Ok(())
}
