use axum::{
    extract::State,
    http::{Extensions, HeaderMap},
    response::{IntoResponse, Redirect, Response},
    Extension, Form, Json,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::common::AppState;
use crate::error::AppError;
use crate::services::rate_limit::client_ip;
use crate::session::{gate, Session, SessionGate};

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Check the submitted credentials. On success the session cookie is set and
/// the browser is sent to the dashboard; on failure back to the form.
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    extensions: Extensions,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    let client = client_ip(&headers, &extensions, state.config.trust_proxy_headers);

    match state.gate.login(&form.username, &form.password).await {
        Ok(session) => {
            tracing::info!(client = %client, "Dashboard login");
            let cookie = state.gate.session_cookie(&session);
            (jar.add(cookie), Redirect::to("/?welcome=1")).into_response()
        }
        Err(AppError::InvalidCredentials) => {
            tracing::warn!(client = %client, "Rejected dashboard login");
            Redirect::to("/login?error=invalid").into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// End the current session, if any, and clear the cookie.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    if let Some(id) = gate::session_id(&jar) {
        state.gate.logout(&id).await;
    }
    (
        jar.remove(SessionGate::removal_cookie()),
        Redirect::to("/login?logged_out=1"),
    )
        .into_response()
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// Current session
#[utoipa::path(
    get,
    path = "/api/session",
    responses(
        (status = 200, description = "Session is live", body = SessionResponse),
        (status = 401, description = "Not logged in"),
    ),
    tag = "session"
)]
pub async fn current_session(Extension(session): Extension<Session>) -> Json<SessionResponse> {
    Json(SessionResponse {
        username: session.username,
        created_at: session.created_at,
    })
}
