use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use shared::{
    assets::AssetKind,
    error::{ApiError, ErrorCode},
};
use tracing::{debug, error, warn};
use webtools_api::{AssetManager, PageContext};

use crate::app_state::AppState;

/// Resource files on disk and the uri prefix they are published under.
#[derive(Debug, Clone)]
pub(crate) struct ResourceFiles {
    mount: String,
    dir: PathBuf,
}

impl ResourceFiles {
    /// `None` when `uri` is not a local path this server can mount.
    pub(crate) fn new(uri: &str, dir: impl Into<PathBuf>) -> Option<Self> {
        let mount = uri.trim_end_matches('/');
        if mount.is_empty() || !mount.starts_with('/') {
            warn!(%uri, "resources uri is not a local path, not serving resources");
            return None;
        }
        Some(Self {
            mount: mount.to_string(),
            dir: dir.into(),
        })
    }

    pub(crate) fn mount(&self) -> &str {
        &self.mount
    }

    pub(crate) fn dir(&self) -> &Path {
        &self.dir
    }

    /// Maps a published resource uri back onto its file.
    pub(crate) fn resolve(&self, uri: &str) -> Option<PathBuf> {
        let relative = uri.strip_prefix(&self.mount)?.strip_prefix('/')?;
        if relative
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..")
        {
            return None;
        }
        Some(self.dir.join(relative))
    }
}

/// A joined collection and the route its output is served from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BundleRoute {
    pub(crate) route: String,
    pub(crate) collection: String,
    pub(crate) kind: AssetKind,
}

pub(crate) fn bundle_routes(assets: &AssetManager) -> Vec<BundleRoute> {
    assets
        .iter()
        .filter_map(|collection| {
            let target = collection.target_path()?;
            let kind = collection
                .iter()
                .find(|asset| collection.is_bundled(asset))?
                .kind;
            Some(BundleRoute {
                route: format!("/{}", target.trim_start_matches('/')),
                collection: collection.name().to_string(),
                kind,
            })
        })
        .collect()
}

/// Concatenates the collection's joined files in registration order.
///
/// Filters are not applied; the files are passed through as they are.
pub(crate) async fn serve_bundle(
    state: Arc<AppState>,
    page: PageContext,
    bundle: BundleRoute,
) -> Result<Response, (StatusCode, Json<ApiError>)> {
    let files = state
        .resources
        .as_ref()
        .ok_or_else(|| not_found("resources are not served"))?;
    let collection = page
        .assets
        .get(&bundle.collection)
        .ok_or_else(|| not_found(format!("unknown collection '{}'", bundle.collection)))?;

    let mut body = String::new();
    for uri in collection.bundled_paths(bundle.kind) {
        let path = files.resolve(uri).ok_or_else(|| {
            error!(%uri, collection = %bundle.collection, "asset is outside the resources mount");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError::new(
                    ErrorCode::Internal,
                    format!("cannot bundle '{uri}'"),
                )),
            )
        })?;
        let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
            error!(path = %path.display(), error = %e, "failed to read bundled asset");
            not_found(format!("missing asset '{uri}'"))
        })?;
        body.push_str(&content);
        if !content.ends_with('\n') {
            body.push('\n');
        }
    }

    debug!(collection = %bundle.collection, bytes = body.len(), "served bundle");
    let content_type = match bundle.kind {
        AssetKind::Stylesheet => "text/css; charset=utf-8",
        AssetKind::Script => "application/javascript; charset=utf-8",
    };
    Ok(([(header::CONTENT_TYPE, content_type)], body).into_response())
}

fn not_found(message: impl Into<String>) -> (StatusCode, Json<ApiError>) {
    (
        StatusCode::NOT_FOUND,
        Json(ApiError::new(ErrorCode::NotFound, message)),
    )
}
