use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use axum::{
    extract::State,
    middleware,
    routing::{get, MethodRouter},
    Extension, Router,
};
use clap::Parser;
use shared::error::WebtoolsError;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;
use webtools_api::{
    NoopCustomizer, PageContext, PageCustomizer, RequestInitializer, Resources, RouteTable,
    StaticUrl, StaticVersion, WebtoolsConfig,
};

mod app_state;
mod bundles;
mod config;
mod pages;
mod setup;

use app_state::AppState;
use bundles::ResourceFiles;
use config::{load_settings, Settings, DEFAULT_CONFIG_PATH};

#[derive(Parser, Debug)]
#[command(name = "webtools-server", about = "Serves the WebTools admin dashboard")]
struct Cli {
    /// Settings file; missing files are ignored.
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// Overrides the configured bind address.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let mut settings = load_settings(&cli.config)?;
    if let Some(bind) = cli.bind {
        settings.server_bind = bind;
    }

    let state = build_state(&settings, Box::new(NoopCustomizer))?;
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, base_uri = %settings.base_uri, "webtools listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.layer(TraceLayer::new_for_http())).await?;
    Ok(())
}

fn build_state(
    settings: &Settings,
    customizer: Box<dyn PageCustomizer>,
) -> Result<AppState, WebtoolsError> {
    let config = WebtoolsConfig::from_providers(
        &StaticVersion(settings.tool_version.clone()),
        &StaticVersion(settings.framework_version.clone()),
        &StaticUrl(settings.base_uri.clone()),
        Resources::new(settings.resources_uri.clone()),
    );

    let initializer = RequestInitializer::new(config);

    let resources = settings
        .resources_dir
        .as_deref()
        .and_then(|dir| ResourceFiles::new(&settings.resources_uri, dir));
    let bundles = match &resources {
        Some(_) => {
            let mut page = PageContext::new();
            initializer.initialize(&mut page, customizer.as_ref())?;
            bundles::bundle_routes(&page.assets)
        }
        None => Vec::new(),
    };

    Ok(AppState {
        initializer,
        customizer,
        routes: route_table()?,
        resources,
        bundles,
    })
}

/// Dashboard pages. Every request to one of these runs the shared page setup first.
fn page_routes() -> Vec<(&'static str, MethodRouter<Arc<AppState>>)> {
    vec![
        ("/", get(pages::dashboard)),
        ("/info", get(pages::info)),
        ("/back", get(pages::back)),
        ("/home", get(pages::home)),
    ]
}

fn route_table() -> Result<RouteTable, WebtoolsError> {
    let mut routes = RouteTable::new();
    for (path, _) in page_routes() {
        routes.insert(path)?;
    }
    routes.insert("/healthz")?;
    Ok(routes)
}

fn build_router(state: Arc<AppState>) -> Router {
    let pages = page_routes()
        .into_iter()
        .fold(Router::new(), |router, (path, handler)| {
            router.route(path, handler)
        });
    let pages = state
        .bundles
        .iter()
        .fold(pages, |router, bundle| {
            let route = bundle.route.clone();
            let bundle = bundle.clone();
            router.route(
                &route,
                get(
                    move |State(state): State<Arc<AppState>>,
                          Extension(page): Extension<PageContext>| {
                        bundles::serve_bundle(state, page, bundle.clone())
                    },
                ),
            )
        })
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            setup::setup_page,
        ));

    let mut app = Router::new().route("/healthz", get(healthz)).merge(pages);
    if let Some(files) = &state.resources {
        info!(mount = %files.mount(), dir = %files.dir().display(), "serving resources");
        app = app.nest_service(files.mount(), ServeDir::new(files.dir()));
    }
    app.with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
