use axum::{
    extract::Extension,
    http::header::SET_COOKIE,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tracing::error;

use crate::api::session::{AuthState, clear_session_cookie};

// axum handler for POST /logout
pub async fn logout(Extension(auth): Extension<Arc<AuthState>>) -> Response {
    match clear_session_cookie(auth.config()) {
        Ok(cookie) => ([(SET_COOKIE, cookie)], Redirect::to("/")).into_response(),
        Err(err) => {
            error!("Failed to build logout cookie: {err}");
            Redirect::to("/").into_response()
        }
    }
}
