//! The session manager: issues tokens and ties them to stored state.
//!
//! This is the central piece of the session layer. It's responsible for:
//! - Starting sessions: issue a signed token, save the caller's state,
//!   hand the token back in an `Authorization` response header
//! - Recognizing sessions: pull the token out of a request and verify it
//!   against the key ring
//! - Reading and replacing the state tied to a session
//! - Ending sessions by deleting their state
//!
//! # Concurrency note
//!
//! ID length, keys, and store are fixed at construction. The only mutable
//! part is the entropy source, which sits behind a mutex held just long
//! enough to draw one ID. One instance can therefore be put behind an
//! `Arc` and shared by every request handler. All waiting happens inside
//! the store; the manager makes at most one store call per operation and
//! holds no lock across it.

use http::HeaderMap;
use http::header::AUTHORIZATION;
use parking_lot::Mutex;
use rand::TryCryptoRng;
use rand::rngs::OsRng;
use serde::{Serialize, de::DeserializeOwned};
use sigil_token::{KeyRing, Token};

use crate::bearer::{self, BearerSource};
use crate::{SessionConfig, SessionError, Store};

/// Orchestrates the session lifecycle on top of a [`Store`].
///
/// ## Lifecycle
///
/// The manager keeps no record of sessions itself; what a token means is
/// decided entirely by the store:
///
/// ```text
/// begin_session() ──→ get_state() / update_state() ──→ end_session()
///        │                        │                         │
///        ▼                        ▼                         ▼
///     [Active]  ─────────────  [Active]  ──────────────  [Ended]
///   state saved             state read/replaced       state deleted
/// ```
///
/// An ended session looks exactly like one that never existed: the token
/// still verifies, but the store has nothing for it.
///
/// ## Entropy
///
/// Session IDs come from `R`, the operating system's generator by
/// default. The manager owns a single `R` behind a mutex that is held
/// only while the ID bytes are drawn, so a seeded generator such as
/// `StdRng` advances on every issuance and never repeats an ID.
#[derive(Debug)]
pub struct SessionManager<St, R = OsRng> {
    config: SessionConfig,
    keys: KeyRing,
    store: St,
    entropy: Mutex<R>,
}

impl<St: Store> SessionManager<St> {
    /// Creates a manager that signs with `keys` and persists to `store`.
    ///
    /// # Errors
    /// Returns [`SessionError::Config`] if `config` is invalid.
    pub fn new(
        config: SessionConfig,
        keys: KeyRing,
        store: St,
    ) -> Result<Self, SessionError> {
        config.validate()?;
        Ok(Self {
            config,
            keys,
            store,
            entropy: Mutex::new(OsRng),
        })
    }
}

impl<St, R> SessionManager<St, R>
where
    St: Store,
    R: TryCryptoRng + Send,
{
    /// Replaces the source session IDs are drawn from.
    pub fn with_entropy<R2>(self, entropy: R2) -> SessionManager<St, R2>
    where
        R2: TryCryptoRng + Send,
    {
        SessionManager {
            config: self.config,
            keys: self.keys,
            store: self.store,
            entropy: Mutex::new(entropy),
        }
    }

    /// Returns the manager's configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Returns the signing keys.
    pub fn keys(&self) -> &KeyRing {
        &self.keys
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &St {
        &self.store
    }

    /// Starts a new session holding `state`.
    ///
    /// Issues a token signed with a randomly chosen key, saves `state`
    /// under its ID, then appends `Authorization: Bearer <token>` to
    /// `response`. The token is also returned.
    ///
    /// # Errors
    /// - [`SessionError::Issue`] if no token could be issued; the store is
    ///   not touched
    /// - [`SessionError::Store`] if the save fails; `response` is left
    ///   unchanged
    pub async fn begin_session<S>(
        &self,
        response: &mut HeaderMap,
        state: &S,
    ) -> Result<Token, SessionError>
    where
        S: Serialize + Sync + ?Sized,
    {
        let token = {
            let mut entropy = self.entropy.lock();
            self.keys
                .issue(self.config.id_length, &mut *entropy)
                .map_err(SessionError::Issue)?
        };
        let header = bearer::header_value(&token)?;

        self.store.save(token.id(), state).await?;
        response.append(AUTHORIZATION, header);

        tracing::info!(id_length = self.config.id_length, "session started");
        Ok(token)
    }

    /// Extracts and verifies the token carried by `request`.
    ///
    /// Looks in the `Authorization` header first, then the `auth` query
    /// parameter. Does not consult the store.
    ///
    /// # Errors
    /// - [`SessionError::NoToken`] if the request carries no token
    /// - [`SessionError::UnsupportedTokenType`] if it is not a bearer token
    /// - [`SessionError::InvalidToken`] if no key in the ring verifies it
    pub fn get_token<Q>(&self, request: &Q) -> Result<Token, SessionError>
    where
        Q: BearerSource + ?Sized,
    {
        let token = bearer::bearer_token(request)?;
        self.keys.verify(&token).map_err(SessionError::InvalidToken)
    }

    /// Verifies the request's token and fetches the state saved for it.
    ///
    /// # Errors
    /// Everything [`get_token`](Self::get_token) returns, plus
    /// [`SessionError::Store`] from the store; a session with no state
    /// (ended or expired) is `Store(StoreError::NotFound)`.
    pub async fn get_state<S, Q>(
        &self,
        request: &Q,
    ) -> Result<(Token, S), SessionError>
    where
        S: DeserializeOwned + Send,
        Q: BearerSource + ?Sized,
    {
        let token = self.get_token(request)?;
        let state = self.store.get(token.id()).await?;
        Ok((token, state))
    }

    /// Replaces the state saved for `token`.
    ///
    /// The token is not re-verified. It is expected to come from
    /// [`begin_session`](Self::begin_session),
    /// [`get_token`](Self::get_token), or [`get_state`](Self::get_state);
    /// the type system already prevents building one any other way.
    pub async fn update_state<S>(
        &self,
        token: &Token,
        state: &S,
    ) -> Result<(), SessionError>
    where
        S: Serialize + Sync + ?Sized,
    {
        self.store.save(token.id(), state).await?;
        Ok(())
    }

    /// Ends the session identified by the request's token.
    ///
    /// # Errors
    /// Everything [`get_token`](Self::get_token) returns, plus store
    /// failures.
    pub async fn end_session<Q>(&self, request: &Q) -> Result<(), SessionError>
    where
        Q: BearerSource + ?Sized,
    {
        let token = self.get_token(request)?;
        self.end_session_token(&token).await
    }

    /// Ends the session for a token the caller already holds.
    pub async fn end_session_token(
        &self,
        token: &Token,
    ) -> Result<(), SessionError> {
        self.store.delete(token.id()).await?;
        tracing::info!("session ended");
        Ok(())
    }
}

// =========================================================================
// Tests
// =========================================================================
