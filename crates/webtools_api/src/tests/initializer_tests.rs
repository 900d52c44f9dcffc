use std::{cell::RefCell, rc::Rc};

use chrono::{Datelike, Local};
use shared::assets::{AssetCollection, AssetKind, AssetSource, MinifyFilter};

use super::*;
use crate::services::{AssetManager, NoopCustomizer, StaticUrl, StaticVersion};

fn config() -> WebtoolsConfig {
    WebtoolsConfig::from_providers(
        &StaticVersion("4.0.3".into()),
        &StaticVersion("0.7.9".into()),
        &StaticUrl("/".into()),
        Resources::new("/resources"),
    )
}

fn initialized() -> PageContext {
    let mut page = PageContext::new();
    RequestInitializer::new(config())
        .initialize(&mut page, &NoopCustomizer)
        .expect("initialize");
    page
}

fn paths(collection: &AssetCollection) -> Vec<String> {
    collection
        .iter()
        .map(|asset| match &asset.source {
            AssetSource::Path(path) => path.clone(),
            AssetSource::Inline(code) => format!("inline:{code}"),
        })
        .collect()
}

#[test]
fn template_context_has_fixed_keys_and_current_year() {
    let page = initialized();
    let vars = page.view.vars();

    let mut keys: Vec<&str> = vars.keys().collect();
    keys.sort_unstable();
    let mut expected = vec![
        "base_uri",
        "webtools_uri",
        "ptools_version",
        "phalcon_version",
        "phalcon_team",
        "lte_team",
        "phalcon_url",
        "devtools_url",
        "lte_url",
        "app_name",
        "app_mini",
        "lte_name",
        "copy_date",
        "lte_date",
    ];
    expected.sort_unstable();
    assert_eq!(keys, expected);

    let year = Local::now().year().to_string();
    assert!(vars.var("copy_date").starts_with("2011-"));
    assert!(vars.var("copy_date").ends_with(&year));
    assert!(vars.var("lte_date").starts_with("2014-"));
    assert!(vars.var("lte_date").ends_with(&year));
    assert_eq!(vars.var("ptools_version"), "4.0.3");
    assert_eq!(vars.var("phalcon_version"), "0.7.9");
    assert_eq!(vars.var("app_mini"), "PWT");
}

#[test]
fn webtools_uri_strips_trailing_slash_from_base() {
    let mut cfg = config();
    assert_eq!(template_context(&cfg, 2024).var("webtools_uri"), "/webtools.php");

    cfg.base_uri = "/admin/".into();
    let vars = template_context(&cfg, 2024);
    assert_eq!(vars.var("base_uri"), "/admin/");
    assert_eq!(vars.var("webtools_uri"), "/admin/webtools.php");
    assert_eq!(vars.var("copy_date"), "2011-2024");
}

#[test]
fn css_collection_is_joined_and_minified_in_order() {
    let page = initialized();
    let css = page.assets.get(MAIN_CSS).expect("main_css");

    assert_eq!(
        paths(css),
        [
            "/resources/bootstrap/css/bootstrap.min.css",
            "/resources/admin-lte/css/AdminLTE.min.css",
            "/resources/admin-lte/css/skins/_all-skins.min.css",
            "/resources/jvectormap/jquery-jvectormap-1.2.2.css",
            "/resources/css/dashboard.css",
        ]
    );
    assert!(css.iter().all(|a| a.kind == AssetKind::Stylesheet && a.join));
    assert!(css.is_joined());
    assert_eq!(css.filters(), &[MinifyFilter::CssMin]);
    assert_eq!(css.target_path(), Some("css/webtools.css"));
    assert_eq!(css.target_uri(), Some("css/webtools.css?v=4.0.3"));
}

#[test]
fn main_js_collection_is_joined_and_minified_in_order() {
    let page = initialized();
    let js = page.assets.get(FOOTER_JS).expect("footer");

    assert_eq!(
        paths(js),
        [
            "/resources/jquery/2.2.4/jquery.min.js",
            "/resources/jquery-ui/jquery-ui.min.js",
            "inline:$.widget.bridge('uibutton', $.ui.button);",
            "/resources/bootstrap/js/bootstrap.min.js",
            "/resources/sparkline/jquery.sparkline.min.js",
            "/resources/jvectormap/jquery-jvectormap-1.2.2.min.js",
            "/resources/jvectormap/jquery-jvectormap-world-mill-en.js",
            "/resources/slimScroll/jquery.slimscroll.min.js",
            "/resources/fastclick/fastclick.min.js",
            "/resources/admin-lte/js/app.min.js",
            "/resources/js/dashboard.js",
        ]
    );
    assert_eq!(js.iter().filter(|a| a.is_inline()).count(), 1);
    assert!(js.is_joined());
    assert_eq!(js.filters(), &[MinifyFilter::JsMin]);
    assert_eq!(js.target_uri(), Some("js/webtools.js?v=4.0.3"));
}

#[test]
fn ie_shims_are_unjoined_and_unminified() {
    let page = initialized();
    let shims = page.assets.get(IE_JS).expect("js_ie");

    assert_eq!(
        paths(shims),
        [
            "https://oss.maxcdn.com/html5shiv/3.7.3/html5shiv.min.js",
            "https://oss.maxcdn.com/respond/1.4.2/respond.min.js",
        ]
    );
    assert!(shims.iter().all(|a| !a.join && !a.minify));
    assert!(!shims.is_joined());
    assert!(!shims.is_minified());
    assert_eq!(shims.target_uri(), None);
    assert_eq!(
        page.assets.names().collect::<Vec<_>>(),
        [MAIN_CSS, FOOTER_JS, IE_JS]
    );
}

#[test]
fn layout_is_webtools() {
    let page = initialized();
    assert_eq!(page.view.layout().map(Layout::name), Some("webtools"));
}

#[test]
fn each_request_starts_from_fresh_state() {
    let initializer = RequestInitializer::new(config());
    let mut first = PageContext::new();
    let mut second = PageContext::new();
    initializer
        .initialize(&mut first, &NoopCustomizer)
        .expect("first");
    initializer
        .initialize(&mut second, &NoopCustomizer)
        .expect("second");

    assert_eq!(second.assets.get(MAIN_CSS).map(AssetCollection::len), Some(5));
    assert_eq!(first.view.vars(), second.view.vars());
}

type Log = Rc<RefCell<Vec<&'static str>>>;

struct RecordingView {
    log: Log,
    fail_layout: bool,
}

impl ViewSink for RecordingView {
    fn set_vars(&mut self, _vars: TemplateContext) -> Result<(), WebtoolsError> {
        self.log.borrow_mut().push("vars");
        Ok(())
    }

    fn set_layout(&mut self, _layout: Layout) -> Result<(), WebtoolsError> {
        if self.fail_layout {
            return Err(WebtoolsError::UnknownLayout("webtools".into()));
        }
        self.log.borrow_mut().push("layout");
        Ok(())
    }
}

struct RecordingAssets {
    log: Log,
    inner: AssetManager,
}

impl AssetRegistry for RecordingAssets {
    fn collection(&mut self, name: &str) -> &mut AssetCollection {
        self.log.borrow_mut().push(match name {
            MAIN_CSS => "css",
            FOOTER_JS => "js",
            _ => "shims",
        });
        self.inner.collection(name)
    }
}

#[test]
fn steps_run_in_order() {
    let log = Log::default();
    let mut view = RecordingView {
        log: log.clone(),
        fail_layout: false,
    };
    let mut assets = RecordingAssets {
        log: log.clone(),
        inner: AssetManager::default(),
    };

    RequestInitializer::new(config())
        .prepare(&mut view, &mut assets)
        .expect("prepare");

    assert_eq!(*log.borrow(), ["vars", "css", "js", "shims", "layout"]);
}

#[test]
fn sink_failure_propagates() {
    let mut view = RecordingView {
        log: Log::default(),
        fail_layout: true,
    };
    let mut assets = AssetManager::default();

    let err = RequestInitializer::new(config())
        .prepare(&mut view, &mut assets)
        .expect_err("layout failure");
    assert!(matches!(err, WebtoolsError::UnknownLayout(_)));
}

struct Rebrand;

impl PageCustomizer for Rebrand {
    fn customize(&self, page: &mut PageContext) -> Result<(), WebtoolsError> {
        page.view
            .set_vars([("app_name", "Custom Tools")].into_iter().collect())?;
        page.assets
            .collection("page")
            .add_js("/resources/js/page.js", true, true)?;
        Ok(())
    }
}

struct Failing;

impl PageCustomizer for Failing {
    fn customize(&self, _page: &mut PageContext) -> Result<(), WebtoolsError> {
        Err(WebtoolsError::validation("page setup failed"))
    }
}

#[test]
fn customizer_runs_after_shared_setup() {
    let mut page = PageContext::new();
    RequestInitializer::new(config())
        .initialize(&mut page, &Rebrand)
        .expect("initialize");

    assert_eq!(page.view.vars().var("app_name"), "Custom Tools");
    assert_eq!(page.assets.names().last(), Some("page"));
}

#[test]
fn customizer_error_is_returned() {
    let mut page = PageContext::new();
    let err = RequestInitializer::new(config())
        .initialize(&mut page, &Failing)
        .expect_err("customizer failure");
    assert!(matches!(err, WebtoolsError::Validation(_)));
    assert_eq!(page.view.layout().map(Layout::name), Some("webtools"));
}
