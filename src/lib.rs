//! # Plan It Social
//!
//! A server-rendered site for planning events with groups of people.
//!
//! ## Pages
//!
//! Every page is rendered on the server inside a shared shell (head, top
//! navigation, `window.ENV` payload, footer). The root loader fetches up to 24
//! upcoming events, up to 24 groups, and the signed-in user concurrently.
//!
//! ## Authentication
//!
//! Users log in with email and password. Emails are stored trimmed and
//! lowercased; passwords are stored as Argon2id PHC strings. A successful login
//! issues an HMAC-signed session cookie; nothing is stored server side.
//!
//! ## Errors
//!
//! Failures at the HTTP edge are rendered by [`api::error::RouteError`]: a 404
//! page, other routed statuses, runtime faults, and unknown failures.

pub mod api;
pub mod cli;
pub mod credentials;
pub mod store;
pub mod views;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
