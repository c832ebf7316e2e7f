use anyhow::Result;
use axum::{
    extract::Extension,
    http::HeaderMap,
    response::Html,
};
use std::sync::Arc;
use tracing::{Instrument, info_span};

use crate::{
    api::{
        error::RouteError,
        session::{AuthState, current_user},
    },
    store::{ROOT_LIST_LIMIT, SharedStore, Store},
    views::{ClientEnv, RootData, index_document},
};

/// Resolve what every page needs: events, groups, and the signed-in user.
///
/// # Errors
/// Fails if any of the three lookups fails.
pub async fn load_root_data(
    headers: &HeaderMap,
    store: &dyn Store,
    auth: &AuthState,
    env: &ClientEnv,
) -> Result<RootData> {
    let (events, groups, current_user) = tokio::try_join!(
        store.list_events(ROOT_LIST_LIMIT),
        store.list_groups(ROOT_LIST_LIMIT),
        current_user(headers, auth, store),
    )?;

    Ok(RootData {
        env: env.clone(),
        current_user,
        events,
        groups,
    })
}

// axum handler for /
pub async fn index(
    headers: HeaderMap,
    Extension(store): Extension<SharedStore>,
    Extension(auth): Extension<Arc<AuthState>>,
    Extension(env): Extension<Arc<ClientEnv>>,
) -> Result<Html<String>, RouteError> {
    let data = load_root_data(&headers, store.as_ref(), &auth, &env)
        .instrument(info_span!("root.load", store = store.backend()))
        .await?;

    Ok(Html(index_document(&data)))
}
