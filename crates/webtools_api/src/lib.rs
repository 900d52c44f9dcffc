pub mod initializer;
pub mod redirect;
pub mod routes;
pub mod services;

pub use initializer::{template_context, RequestInitializer, WebtoolsConfig};
pub use redirect::{index_redirect, webtools_redirect};
pub use routes::RouteTable;
pub use services::{
    AssetManager, AssetRegistry, NoopCustomizer, PageCustomizer, ResourceLocator, Resources,
    RouteMatcher, StaticUrl, StaticVersion, UrlHelper, VersionProvider, View, ViewSink,
};

/// Per-request view state, built fresh for every request and dropped with it.
#[derive(Debug, Default, Clone)]
pub struct PageContext {
    pub view: View,
    pub assets: AssetManager,
}

impl PageContext {
    pub fn new() -> Self {
        Self::default()
    }
}
