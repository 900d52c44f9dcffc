use chrono::{Datelike, Local};
use shared::{
    assets::MinifyFilter,
    error::WebtoolsError,
    view::{Layout, TemplateContext},
};
use tracing::debug;

use crate::{
    services::{
        AssetRegistry, PageCustomizer, ResourceLocator, Resources, UrlHelper, VersionProvider,
        ViewSink,
    },
    PageContext,
};

pub const MAIN_CSS: &str = "main_css";
pub const FOOTER_JS: &str = "footer";
pub const IE_JS: &str = "js_ie";

/// Everything the shared page setup needs to know, resolved once at startup.
#[derive(Debug, Clone)]
pub struct WebtoolsConfig {
    pub tool_version: String,
    pub framework_version: String,
    pub base_uri: String,
    pub resources: Resources,
}

impl WebtoolsConfig {
    pub fn from_providers(
        tool: &dyn VersionProvider,
        framework: &dyn VersionProvider,
        url: &dyn UrlHelper,
        resources: Resources,
    ) -> Self {
        Self {
            tool_version: tool.version(),
            framework_version: framework.version(),
            base_uri: url.base_uri(),
            resources,
        }
    }
}

/// Builds the variables shared by every page.
pub fn template_context(config: &WebtoolsConfig, year: i32) -> TemplateContext {
    let webtools_uri = format!("{}/webtools.php", config.base_uri.trim_end_matches('/'));

    [
        ("base_uri", config.base_uri.clone()),
        ("webtools_uri", webtools_uri),
        ("ptools_version", config.tool_version.clone()),
        ("phalcon_version", config.framework_version.clone()),
        ("phalcon_team", "Phalcon Team".to_string()),
        ("lte_team", "Almsaeed Studio".to_string()),
        ("phalcon_url", "https://phalconphp.com/en/".to_string()),
        (
            "devtools_url",
            "https://github.com/phalcon/phalcon-devtools".to_string(),
        ),
        ("lte_url", "https://adminlte.io/".to_string()),
        ("app_name", "Phalcon WebTools".to_string()),
        ("app_mini", "PWT".to_string()),
        ("lte_name", "AdminLTE".to_string()),
        ("copy_date", format!("2011-{year}")),
        ("lte_date", format!("2014-{year}")),
    ]
    .into_iter()
    .collect()
}

pub struct RequestInitializer {
    config: WebtoolsConfig,
}

impl RequestInitializer {
    pub fn new(config: WebtoolsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WebtoolsConfig {
        &self.config
    }

    /// Runs the shared setup steps and then the page-specific customizer.
    pub fn initialize(
        &self,
        page: &mut PageContext,
        customizer: &dyn PageCustomizer,
    ) -> Result<(), WebtoolsError> {
        self.prepare(&mut page.view, &mut page.assets)?;
        customizer.customize(page)
    }

    /// Vars, stylesheets, scripts and layout, in that order.
    pub fn prepare<V, A>(&self, view: &mut V, assets: &mut A) -> Result<(), WebtoolsError>
    where
        V: ViewSink + ?Sized,
        A: AssetRegistry + ?Sized,
    {
        self.set_vars(view)?;
        self.set_css(assets)?;
        self.set_js(assets)?;
        self.set_layout(view)
    }

    pub fn set_vars<V: ViewSink + ?Sized>(&self, view: &mut V) -> Result<(), WebtoolsError> {
        let vars = template_context(&self.config, Local::now().year());
        debug!(count = vars.len(), "setting template vars");
        view.set_vars(vars)
    }

    pub fn set_css<A: AssetRegistry + ?Sized>(&self, assets: &mut A) -> Result<(), WebtoolsError> {
        let res = &self.config.resources;
        let version = &self.config.tool_version;

        assets
            .collection(MAIN_CSS)
            .set_target_path("css/webtools.css")?
            .set_target_uri(format!("css/webtools.css?v={version}"))?
            .add_css(res.path("bootstrap/css/bootstrap.min.css"), true, false)?
            .add_css(res.path("admin-lte/css/AdminLTE.min.css"), true, true)?
            .add_css(res.path("admin-lte/css/skins/_all-skins.min.css"), true, false)?
            .add_css(res.path("jvectormap/jquery-jvectormap-1.2.2.css"), true, true)?
            .add_css(res.path("css/dashboard.css"), true, true)?
            .set_join(true)
            .add_filter(MinifyFilter::CssMin);

        debug!(collection = MAIN_CSS, "registered stylesheets");
        Ok(())
    }

    pub fn set_js<A: AssetRegistry + ?Sized>(&self, assets: &mut A) -> Result<(), WebtoolsError> {
        let res = &self.config.resources;
        let version = &self.config.tool_version;

        assets
            .collection(FOOTER_JS)
            .set_target_path("js/webtools.js")?
            .set_target_uri(format!("js/webtools.js?v={version}"))?
            .add_js(res.path("jquery/2.2.4/jquery.min.js"), true, false)?
            .add_js(res.path("jquery-ui/jquery-ui.min.js"), true, false)?
            .add_inline_js("$.widget.bridge('uibutton', $.ui.button);", false, false)?
            .add_js(res.path("bootstrap/js/bootstrap.min.js"), true, false)?
            .add_js(res.path("sparkline/jquery.sparkline.min.js"), true, false)?
            .add_js(res.path("jvectormap/jquery-jvectormap-1.2.2.min.js"), true, false)?
            .add_js(res.path("jvectormap/jquery-jvectormap-world-mill-en.js"), true, false)?
            .add_js(res.path("slimScroll/jquery.slimscroll.min.js"), false, false)?
            .add_js(res.path("fastclick/fastclick.min.js"), false, false)?
            .add_js(res.path("admin-lte/js/app.min.js"), true, false)?
            .add_js(res.path("js/dashboard.js"), true, true)?
            .set_join(true)
            .add_filter(MinifyFilter::JsMin);

        // Legacy browser shims, loaded on their own behind a conditional comment.
        assets
            .collection(IE_JS)
            .add_js(
                "https://oss.maxcdn.com/html5shiv/3.7.3/html5shiv.min.js",
                false,
                false,
            )?
            .add_js("https://oss.maxcdn.com/respond/1.4.2/respond.min.js", false, false)?;

        debug!(main = FOOTER_JS, shims = IE_JS, "registered scripts");
        Ok(())
    }

    pub fn set_layout<V: ViewSink + ?Sized>(&self, view: &mut V) -> Result<(), WebtoolsError> {
        view.set_layout(Layout::webtools())
    }
}

#[cfg(test)]
#[path = "tests/initializer_tests.rs"]
mod tests;
