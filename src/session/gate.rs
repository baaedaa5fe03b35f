use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use uuid::Uuid;

use crate::common::AppState;
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::session::store::{Session, SessionStore};

pub const SESSION_COOKIE: &str = "dl_session";

/// Guards the dashboard with the single configured credential pair.
pub struct SessionGate {
    username: String,
    password: String,
    secure_cookies: bool,
    store: SessionStore,
}

impl SessionGate {
    #[must_use]
    pub fn new(config: &Config, store: SessionStore) -> Self {
        Self {
            username: config.dashboard_username.clone(),
            password: config.dashboard_password.clone(),
            secure_cookies: config.deployment.secure_cookies(),
            store,
        }
    }

    /// Exact byte comparison against the configured credentials.
    #[must_use]
    pub fn authenticate(&self, username: &str, password: &str) -> bool {
        username.as_bytes() == self.username.as_bytes()
            && password.as_bytes() == self.password.as_bytes()
    }

    /// Check credentials and open a session on success.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidCredentials` on any mismatch; no session is created.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<Session> {
        if !self.authenticate(username, password) {
            tracing::info!("login_rejected");
            return Err(AppError::InvalidCredentials);
        }
        let session = self.store.create(username).await;
        tracing::info!(session_id = %session.id, "login_accepted");
        Ok(session)
    }

    pub async fn logout(&self, id: &Uuid) -> Option<Session> {
        self.store.end(id).await
    }

    pub async fn session(&self, id: &Uuid) -> Option<Session> {
        self.store.get(id).await
    }

    /// Resolve the session named by the request's cookie, if any.
    pub async fn cookie_session(&self, jar: &CookieJar) -> Option<Session> {
        let id = session_id(jar)?;
        self.session(&id).await
    }

    #[must_use]
    pub fn session_cookie(&self, session: &Session) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, session.id.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure_cookies)
            .build()
    }

    #[must_use]
    pub fn removal_cookie() -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, "")).path("/").build()
    }
}

/// Session id carried by the request's cookie, if well-formed.
#[must_use]
pub fn session_id(jar: &CookieJar) -> Option<Uuid> {
    jar.get(SESSION_COOKIE)
        .and_then(|c| c.value().parse::<Uuid>().ok())
}

/// Reject requests without a live session; hand the session to handlers
/// through request extensions.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let session = state
        .gate
        .cookie_session(&jar)
        .await
        .ok_or(AppError::Unauthorized)?;

    req.extensions_mut().insert(session);

    Ok(next.run(req).await)
}
