use crate::{
    api::{
        error::RouteError,
        handlers::{fallback, health, login, logout, root},
        session::AuthState,
    },
    store::{self, PgStore, SharedStore},
    views::ClientEnv,
};
use anyhow::Result;
use axum::{
    Extension, Router,
    body::Body,
    extract::MatchedPath,
    http::{HeaderName, HeaderValue, Request},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use std::{any::Any, path::Path, sync::Arc};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::PropagateRequestIdLayer,
    services::ServeDir,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{Span, error, info, info_span};
use ulid::Ulid;

pub mod error;
pub(crate) mod handlers;
pub mod session;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Build the application router.
///
/// Static images are served from `<assets_dir>/imgs`; every other unmatched
/// path falls through to the 404 page.
pub fn router(
    store: SharedStore,
    auth: Arc<AuthState>,
    env: Arc<ClientEnv>,
    assets_dir: &Path,
) -> Router {
    Router::new()
        .route("/", get(root::index))
        .route("/login", get(login::login_page).post(login::login))
        .route("/logout", post(logout::logout))
        .route("/health", get(health::health).options(health::health))
        .nest_service("/imgs", ServeDir::new(assets_dir.join("imgs")))
        .fallback(fallback::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static(REQUEST_ID_HEADER),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    REQUEST_ID_HEADER,
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(CatchPanicLayer::custom(handle_panic))
                .layer(Extension(auth))
                .layer(Extension(env))
                .layer(Extension(store)),
        )
}

/// Start the server
/// # Errors
/// Return error if failed to connect to the database or to bind the port
pub async fn new(
    port: u16,
    dsn: &str,
    auth: AuthState,
    env: ClientEnv,
    assets_dir: &Path,
) -> Result<()> {
    let pool = store::connect(dsn).await?;
    let store: SharedStore = Arc::new(PgStore::new(pool));

    let app = router(store, Arc::new(auth), Arc::new(env), assets_dir);

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            info!("Gracefully shutdown");
        })
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = tokio::signal::ctrl_c() => {}
                }
            }
            Err(err) => {
                error!("Failed to register SIGTERM handler: {err}");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}

/// A panicking handler carries nothing we want to show, so it renders as unknown.
fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("non-string panic payload");
    error!("Handler panicked: {detail}");
    RouteError::Unknown.into_response()
}
