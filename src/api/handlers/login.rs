//! Form login.
//!
//! Flow Overview:
//! 1) `GET /login` renders the form, or redirects home when a session exists.
//! 2) `POST /login` validates the form, looks up the user and password record,
//!    and verifies the Argon2 hash.
//! 3) Success issues a session cookie and redirects to `/`; failures re-render
//!    the form with a message (or return JSON when the client asks for it).

use anyhow::Result;
use axum::{
    Form, Json,
    extract::{Extension, rejection::FormRejection},
    http::{
        HeaderMap, StatusCode,
        header::{ACCEPT, SET_COOKIE},
    },
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use super::root::load_root_data;
use crate::{
    api::{error::RouteError, session::AuthState},
    credentials::{normalize_email, verify_password},
    store::{SharedStore, Store},
    views::{ClientEnv, login_document},
};

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

/// Body returned to clients that accept JSON.
#[derive(Debug, Serialize)]
pub struct ActionData {
    pub status: u16,
    pub message: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFailure {
    MissingFields,
    UnknownEmail,
    /// Wrong password and missing password record look the same to the client.
    BadCredentials,
}

impl LoginFailure {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::MissingFields => "Missing required fields",
            Self::UnknownEmail => "Email not in use. Please sign up instead.",
            Self::BadCredentials => "Credentials don't match. Please try again.",
        }
    }
}

// axum handler for GET /login
pub async fn login_page(
    headers: HeaderMap,
    Extension(store): Extension<SharedStore>,
    Extension(auth): Extension<Arc<AuthState>>,
    Extension(env): Extension<Arc<ClientEnv>>,
) -> Result<Response, RouteError> {
    let data = load_root_data(&headers, store.as_ref(), &auth, &env).await?;
    if data.current_user.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    Ok(Html(login_document(&data, None)).into_response())
}

// axum handler for POST /login
pub async fn login(
    headers: HeaderMap,
    Extension(store): Extension<SharedStore>,
    Extension(auth): Extension<Arc<AuthState>>,
    Extension(env): Extension<Arc<ClientEnv>>,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Result<Response, RouteError> {
    let form = match form {
        Ok(Form(form)) => form,
        Err(err) => {
            debug!("Unreadable login form: {err}");
            LoginForm::default()
        }
    };

    match authenticate(store.as_ref(), &form).await? {
        Ok(user_id) => {
            let cookie = auth.create_session(user_id)?;
            info!("User {user_id} logged in");
            Ok(([(SET_COOKIE, cookie)], Redirect::to("/")).into_response())
        }
        Err(failure) => {
            debug!("Login rejected: {failure:?}");
            if accepts_json(&headers) {
                return Ok(failure_json(failure));
            }

            let data = load_root_data(&headers, store.as_ref(), &auth, &env).await?;
            let html = login_document(&data, Some(failure.message()));
            Ok((StatusCode::BAD_REQUEST, Html(html)).into_response())
        }
    }
}

/// Check the submitted credentials.
///
/// The outer `Result` is a store or hashing failure; the inner one is the
/// verdict on the credentials.
async fn authenticate(
    store: &dyn Store,
    form: &LoginForm,
) -> Result<std::result::Result<Uuid, LoginFailure>> {
    // Presence is judged on the raw input; blank-but-present emails fall through
    // to the lookup and come back as unknown.
    if form.email.is_empty() || form.password.is_empty() {
        return Ok(Err(LoginFailure::MissingFields));
    }
    let email = normalize_email(&form.email);

    let Some(user) = store.find_user_by_email(&email).await? else {
        return Ok(Err(LoginFailure::UnknownEmail));
    };

    let Some(password) = store.find_password(user.id).await? else {
        return Ok(Err(LoginFailure::BadCredentials));
    };

    if verify_password(form.password.clone(), password.hash).await? {
        Ok(Ok(user.id))
    } else {
        Ok(Err(LoginFailure::BadCredentials))
    }
}

fn accepts_json(headers: &HeaderMap) -> bool {
    headers
        .get_all(ACCEPT)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| value.contains("application/json"))
}

fn failure_json(failure: LoginFailure) -> Response {
    let status = StatusCode::BAD_REQUEST;
    (
        status,
        Json(ActionData {
            status: status.as_u16(),
            message: failure.message(),
        }),
    )
        .into_response()
}
