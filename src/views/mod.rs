//! Server-rendered HTML.
//!
//! Pages are leptos components rendered to strings on the server. Text and
//! attribute values interpolated in `view!` are escaped by the renderer; only
//! the JSON payloads in the shell go in as raw script content.

mod error_message;
mod index;
mod login;
mod shell;

use leptos::{prelude::*, tachys::view::RenderHtml};

pub use error_message::ErrorMessage;
pub use index::{IndexPage, index_document};
pub use login::{LoginForm, login_document};
pub use shell::{ClientEnv, RootData, Shell};

/// Render a view to HTML under a fresh reactive owner.
#[must_use]
pub fn render_fragment<F, V>(view: F) -> String
where
    F: FnOnce() -> V,
    V: IntoView,
{
    let owner = Owner::new();
    owner.with(|| view().to_html())
}

/// Render a full page, `<html>` element included, with its doctype.
#[must_use]
pub fn render_document<F, V>(view: F) -> String
where
    F: FnOnce() -> V,
    V: IntoView,
{
    format!("<!DOCTYPE html>{}", render_fragment(view))
}
