use std::sync::Arc;

use askama::Template;
use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    Extension, Json,
};
use shared::{
    assets::AssetKind,
    error::{ApiError, WebtoolsError},
    redirect::Redirect,
    view::{TemplateContext, WEBTOOLS_LAYOUT},
};
use tracing::{error, info};
use webtools_api::{
    index_redirect,
    initializer::{FOOTER_JS, IE_JS, MAIN_CSS},
    webtools_redirect, PageContext,
};

use crate::app_state::AppState;

type PageResult = Result<Html<String>, (StatusCode, Json<ApiError>)>;

#[derive(Template)]
#[template(path = "webtools.html")]
struct WebtoolsLayout<'a> {
    title: &'a str,
    vars: &'a TemplateContext,
    css: String,
    js: String,
    ie_js: String,
    content: String,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardView<'a> {
    vars: &'a TemplateContext,
    collections: Vec<(&'a str, usize)>,
}

#[derive(Template)]
#[template(path = "info.html")]
struct InfoView<'a> {
    vars: &'a TemplateContext,
    routes: Vec<&'a str>,
}

pub(crate) async fn dashboard(
    State(state): State<Arc<AppState>>,
    Extension(page): Extension<PageContext>,
) -> PageResult {
    let collections = page
        .assets
        .iter()
        .map(|collection| (collection.name(), collection.len()))
        .collect();
    let content = DashboardView {
        vars: page.view.vars(),
        collections,
    }
    .render()
    .map_err(template_error)?;

    render_page(&page, state.bundle_base(), "Dashboard", content).map_err(internal)
}

pub(crate) async fn info(
    State(state): State<Arc<AppState>>,
    Extension(page): Extension<PageContext>,
) -> PageResult {
    let content = InfoView {
        vars: page.view.vars(),
        routes: state.routes.patterns().collect(),
    }
    .render()
    .map_err(template_error)?;

    render_page(&page, state.bundle_base(), "System Info", content).map_err(internal)
}

pub(crate) async fn back(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let referer = headers
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok());
    redirect_response(webtools_redirect(referer, &state.routes))
}

pub(crate) async fn home() -> Response {
    redirect_response(index_redirect())
}

/// Wraps `content` in the page's layout. Pages without a layout render bare.
///
/// `bundle_base` is set when the joined asset files are being served.
pub(crate) fn render_page(
    page: &PageContext,
    bundle_base: Option<&str>,
    title: &str,
    content: String,
) -> Result<Html<String>, WebtoolsError> {
    let Some(layout) = page.view.layout() else {
        return Ok(Html(content));
    };
    if layout.name() != WEBTOOLS_LAYOUT {
        return Err(WebtoolsError::UnknownLayout(layout.name().to_string()));
    }

    let tags = |name: &str, kind: AssetKind| {
        page.assets
            .get(name)
            .map(|collection| collection.render_tags(kind, bundle_base))
            .unwrap_or_default()
    };

    WebtoolsLayout {
        title,
        vars: page.view.vars(),
        css: tags(MAIN_CSS, AssetKind::Stylesheet),
        js: tags(FOOTER_JS, AssetKind::Script),
        ie_js: tags(IE_JS, AssetKind::Script),
        content,
    }
    .render()
    .map(Html)
    .map_err(|e| WebtoolsError::Template(e.to_string()))
}

pub(crate) fn redirect_response(redirect: Redirect) -> Response {
    let status = StatusCode::from_u16(redirect.status_code()).unwrap_or(StatusCode::FOUND);
    let location = HeaderValue::from_str(&redirect.location)
        .unwrap_or_else(|_| HeaderValue::from_static("/"));
    info!(location = %redirect.location, status = status.as_u16(), "redirecting");
    (status, [(header::LOCATION, location)]).into_response()
}

fn template_error(e: askama::Error) -> (StatusCode, Json<ApiError>) {
    internal(WebtoolsError::Template(e.to_string()))
}

fn internal(e: WebtoolsError) -> (StatusCode, Json<ApiError>) {
    error!(error = %e, "page rendering failed");
    (StatusCode::INTERNAL_SERVER_ERROR, Json(ApiError::from(e)))
}
