use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
    Json,
};
use shared::error::ApiError;
use tracing::{debug, error};
use webtools_api::PageContext;

use crate::app_state::AppState;

/// Builds the shared view state for the request before its handler runs.
///
/// Handlers pick the result up as `Extension<PageContext>`.
pub(crate) async fn setup_page(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, (StatusCode, Json<ApiError>)> {
    let mut page = PageContext::new();
    state
        .initializer
        .initialize(&mut page, state.customizer.as_ref())
        .map_err(|e| {
            error!(path = %request.uri().path(), error = %e, "page setup failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(ApiError::from(e)))
        })?;

    debug!(path = %request.uri().path(), "page context ready");
    request.extensions_mut().insert(page);
    Ok(next.run(request).await)
}
