use axum::http::Uri;
use tracing::debug;

use crate::api::error::RouteError;

// axum fallback for unmatched routes
pub async fn not_found(uri: Uri) -> RouteError {
    debug!("No route for {uri}");
    RouteError::not_found()
}
