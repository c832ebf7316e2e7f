//! Route handlers.
//!
//! Each page handler loads the root data, renders its content inside the
//! shell, and lets [`RouteError`](crate::api::error::RouteError) render failures.

pub mod fallback;
pub mod health;
pub mod login;
pub mod logout;
pub mod root;
