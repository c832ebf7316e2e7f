//! Error boundary.
//!
//! Every failure that reaches the HTTP edge becomes a [`RouteError`] and is
//! rendered inside the shell with a red alert box.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use leptos::prelude::*;
use tracing::error;

use crate::views::{ErrorMessage, Shell, render_document};

pub const NOT_FOUND_IMAGE: &str = "/imgs/404-not-found.png";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// An HTTP error response raised on purpose by routing or a handler.
    Response {
        status: StatusCode,
        status_text: String,
        data: String,
    },
    /// A runtime fault with a displayable message.
    Fault(String),
    /// A failure that carries nothing displayable.
    Unknown,
}

impl RouteError {
    #[must_use]
    pub fn not_found() -> Self {
        Self::response(StatusCode::NOT_FOUND, "")
    }

    /// Routed error whose status text is the canonical reason phrase.
    #[must_use]
    pub fn response(status: StatusCode, data: impl Into<String>) -> Self {
        Self::Response {
            status,
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            data: data.into(),
        }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Response { status, .. } => *status,
            Self::Fault(_) | Self::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Full HTML document for this error.
    #[must_use]
    pub fn render(&self) -> String {
        let (title, body) = match self.clone() {
            Self::Response { status, .. } if status == StatusCode::NOT_FOUND => (
                "An Error Occurred",
                view! {
                    <img src=NOT_FOUND_IMAGE alt="Page not found" class="mx-auto mb-4 max-w-xs" />
                    <h1 class="text-xl">"The page you are looking for does not exist."</h1>
                }
                .into_any(),
            ),
            Self::Response {
                status,
                status_text,
                data,
            } => (
                "An Error Occurred",
                view! {
                    <h1 class="text-xl">{format!("{} {status_text}", status.as_u16())}</h1>
                    <p>{data}</p>
                }
                .into_any(),
            ),
            Self::Fault(message) => (
                "Something went wrong",
                view! {
                    <h1 class="text-xl">"Error"</h1>
                    <p>{message}</p>
                }
                .into_any(),
            ),
            Self::Unknown => (
                "An unknown error occurred",
                view! { <h1 class="text-xl">"Unknown Error"</h1> }.into_any(),
            ),
        };

        render_document(move || {
            view! {
                <Shell title=title>
                    <ErrorMessage>{body}</ErrorMessage>
                </Shell>
            }
        })
    }
}

impl IntoResponse for RouteError {
    fn into_response(self) -> Response {
        (self.status(), Html(self.render())).into_response()
    }
}

impl From<anyhow::Error> for RouteError {
    fn from(err: anyhow::Error) -> Self {
        error!("Request failed: {err:#}");
        let message = err.to_string();
        if message.trim().is_empty() {
            Self::Unknown
        } else {
            Self::Fault(message)
        }
    }
}
