use shared::{
    assets::AssetCollection,
    error::WebtoolsError,
    view::{Layout, TemplateContext},
};

use crate::PageContext;

pub trait ViewSink {
    fn set_vars(&mut self, vars: TemplateContext) -> Result<(), WebtoolsError>;
    fn set_layout(&mut self, layout: Layout) -> Result<(), WebtoolsError>;
}

pub trait AssetRegistry {
    /// Returns the named collection, creating an empty one on first use.
    fn collection(&mut self, name: &str) -> &mut AssetCollection;
}

pub trait RouteMatcher {
    /// Checks whether `path` resolves to a registered route without dispatching it.
    fn dry_run_match(&self, path: &str) -> bool;
}

pub trait VersionProvider {
    fn version(&self) -> String;
}

pub trait UrlHelper {
    fn base_uri(&self) -> String;
}

pub trait ResourceLocator {
    fn path(&self, relative: &str) -> String;
}

/// Page-specific setup run after the shared initialization steps.
pub trait PageCustomizer: Send + Sync {
    fn customize(&self, page: &mut PageContext) -> Result<(), WebtoolsError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCustomizer;

impl PageCustomizer for NoopCustomizer {
    fn customize(&self, _page: &mut PageContext) -> Result<(), WebtoolsError> {
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct View {
    vars: TemplateContext,
    layout: Option<Layout>,
}

impl View {
    pub fn vars(&self) -> &TemplateContext {
        &self.vars
    }

    pub fn layout(&self) -> Option<&Layout> {
        self.layout.as_ref()
    }
}

impl ViewSink for View {
    fn set_vars(&mut self, vars: TemplateContext) -> Result<(), WebtoolsError> {
        self.vars.extend(vars);
        Ok(())
    }

    fn set_layout(&mut self, layout: Layout) -> Result<(), WebtoolsError> {
        self.layout = Some(layout);
        Ok(())
    }
}

/// Named asset collections, kept in the order they were first requested.
#[derive(Debug, Default, Clone)]
pub struct AssetManager {
    collections: Vec<AssetCollection>,
}

impl AssetManager {
    pub fn get(&self, name: &str) -> Option<&AssetCollection> {
        self.collections.iter().find(|c| c.name() == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.collections.iter().map(AssetCollection::name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssetCollection> {
        self.collections.iter()
    }
}

impl AssetRegistry for AssetManager {
    fn collection(&mut self, name: &str) -> &mut AssetCollection {
        let index = match self.collections.iter().position(|c| c.name() == name) {
            Some(index) => index,
            None => {
                self.collections.push(AssetCollection::new(name));
                self.collections.len() - 1
            }
        };
        &mut self.collections[index]
    }
}

#[derive(Debug, Clone)]
pub struct StaticVersion(pub String);

impl VersionProvider for StaticVersion {
    fn version(&self) -> String {
        self.0.clone()
    }
}

#[derive(Debug, Clone)]
pub struct StaticUrl(pub String);

impl UrlHelper for StaticUrl {
    fn base_uri(&self) -> String {
        self.0.clone()
    }
}

/// Maps paths relative to the bundled resources directory onto public uris.
#[derive(Debug, Clone)]
pub struct Resources {
    base: String,
}

impl Resources {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &str {
        &self.base
    }
}

impl ResourceLocator for Resources {
    fn path(&self, relative: &str) -> String {
        let base = self.base.trim_end_matches('/');
        let relative = relative.trim_start_matches('/');
        format!("{base}/{relative}")
    }
}
