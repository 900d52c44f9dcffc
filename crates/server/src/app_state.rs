use webtools_api::{PageCustomizer, RequestInitializer, RouteTable};

use crate::bundles::{BundleRoute, ResourceFiles};

pub(crate) struct AppState {
    pub(crate) initializer: RequestInitializer,
    pub(crate) customizer: Box<dyn PageCustomizer>,
    pub(crate) routes: RouteTable,
    pub(crate) resources: Option<ResourceFiles>,
    pub(crate) bundles: Vec<BundleRoute>,
}

impl AppState {
    /// Base the joined asset files are served under, when they are served at all.
    pub(crate) fn bundle_base(&self) -> Option<&str> {
        self.resources
            .as_ref()
            .map(|_| self.initializer.config().base_uri.as_str())
    }
}
