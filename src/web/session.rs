//! Request-scoped session handle.
//!
//! A [`Session`] is extracted at the start of a handler and written back to
//! the store when it is returned as part of the response. Handlers that never
//! return it leave the stored session untouched.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponseParts, ResponseParts};
use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};
use uuid::Uuid;

use crate::session::{SessionData, SessionStore};

use super::AppState;

/// Name of the signed cookie holding the session id.
pub const SESSION_COOKIE: &str = "pocketchat_session";

pub struct Session {
    id: Uuid,
    pub data: SessionData,
    store: SessionStore,
    jar: SignedCookieJar,
}

impl Session {
    /// Resume the session named by the cookie, or start a fresh one.
    ///
    /// Missing, tampered and expired ids all yield a new empty session.
    pub fn open(jar: SignedCookieJar, store: &SessionStore) -> Self {
        let existing = jar
            .get(SESSION_COOKIE)
            .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
            .and_then(|id| store.load(&id).map(|data| (id, data)));

        let (id, data) = match existing {
            Some(found) => found,
            None => {
                let id = Uuid::new_v4();
                tracing::debug!(session = %id, "Starting new session");
                (id, SessionData::default())
            }
        };

        Self {
            id,
            data,
            store: store.clone(),
            jar,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl FromRequestParts<AppState> for Session {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = SignedCookieJar::from_headers(&parts.headers, state.key.clone());
        Ok(Self::open(jar, &state.sessions))
    }
}

impl IntoResponseParts for Session {
    type Error = Infallible;

    fn into_response_parts(self, res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        let Self {
            id,
            data,
            store,
            jar,
        } = self;
        store.save(id, data);

        let cookie = Cookie::build((SESSION_COOKIE, id.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax);
        jar.add(cookie).into_response_parts(res)
    }
}
