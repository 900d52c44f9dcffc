use serde::{Deserialize, Serialize};

use crate::error::WebtoolsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Stylesheet,
    Script,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum AssetSource {
    Path(String),
    Inline(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub kind: AssetKind,
    pub source: AssetSource,
    /// Folded into the collection's single output file when the collection joins.
    pub join: bool,
    /// Passed through the collection's filters.
    pub minify: bool,
}

impl Asset {
    pub fn path(&self) -> Option<&str> {
        match &self.source {
            AssetSource::Path(path) => Some(path),
            AssetSource::Inline(_) => None,
        }
    }

    pub fn is_inline(&self) -> bool {
        matches!(self.source, AssetSource::Inline(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinifyFilter {
    CssMin,
    JsMin,
}

/// A named, ordered group of stylesheet and script references.
///
/// The collection only records the bundling policy. Producing the joined and
/// minified output file is left to whatever serves `target_path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetCollection {
    name: String,
    assets: Vec<Asset>,
    join: bool,
    filters: Vec<MinifyFilter>,
    target_path: Option<String>,
    target_uri: Option<String>,
}

impl AssetCollection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            assets: Vec::new(),
            join: false,
            filters: Vec::new(),
            target_path: None,
            target_uri: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_css(
        &mut self,
        path: impl Into<String>,
        join: bool,
        minify: bool,
    ) -> Result<&mut Self, WebtoolsError> {
        self.push_path(AssetKind::Stylesheet, path.into(), join, minify)
    }

    pub fn add_js(
        &mut self,
        path: impl Into<String>,
        join: bool,
        minify: bool,
    ) -> Result<&mut Self, WebtoolsError> {
        self.push_path(AssetKind::Script, path.into(), join, minify)
    }

    pub fn add_inline_js(
        &mut self,
        code: impl Into<String>,
        join: bool,
        minify: bool,
    ) -> Result<&mut Self, WebtoolsError> {
        let code = code.into();
        if code.trim().is_empty() {
            return Err(WebtoolsError::validation(format!(
                "inline script for collection '{}' cannot be empty",
                self.name
            )));
        }
        self.assets.push(Asset {
            kind: AssetKind::Script,
            source: AssetSource::Inline(code),
            join,
            minify,
        });
        Ok(self)
    }

    pub fn set_target_path(&mut self, path: impl Into<String>) -> Result<&mut Self, WebtoolsError> {
        self.target_path = Some(non_empty(path.into(), "target path")?);
        Ok(self)
    }

    pub fn set_target_uri(&mut self, uri: impl Into<String>) -> Result<&mut Self, WebtoolsError> {
        self.target_uri = Some(non_empty(uri.into(), "target uri")?);
        Ok(self)
    }

    pub fn set_join(&mut self, join: bool) -> &mut Self {
        self.join = join;
        self
    }

    pub fn add_filter(&mut self, filter: MinifyFilter) -> &mut Self {
        if !self.filters.contains(&filter) {
            self.filters.push(filter);
        }
        self
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn iter(&self) -> impl Iterator<Item = &Asset> {
        self.assets.iter()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn is_joined(&self) -> bool {
        self.join
    }

    pub fn is_minified(&self) -> bool {
        !self.filters.is_empty()
    }

    pub fn filters(&self) -> &[MinifyFilter] {
        &self.filters
    }

    pub fn target_path(&self) -> Option<&str> {
        self.target_path.as_deref()
    }

    pub fn target_uri(&self) -> Option<&str> {
        self.target_uri.as_deref()
    }

    /// Whether `asset` is served from the joined output rather than on its own.
    pub fn is_bundled(&self, asset: &Asset) -> bool {
        self.join && asset.join && self.target_path.is_some() && !asset.is_inline()
    }

    /// Paths of the `kind` assets folded into the joined output, in order.
    pub fn bundled_paths(&self, kind: AssetKind) -> impl Iterator<Item = &str> {
        self.assets
            .iter()
            .filter(move |asset| asset.kind == kind && self.is_bundled(asset))
            .filter_map(Asset::path)
    }

    /// Renders the HTML tags that load the assets of `kind`.
    ///
    /// With `bundle_base`, the joined output is served under that base, so
    /// every bundled file collapses into one tag for the target uri, placed
    /// where the first of them appears. Without it, nothing produces the
    /// joined file and every asset gets its own tag. Either way the rest is
    /// emitted in registration order.
    pub fn render_tags(&self, kind: AssetKind, bundle_base: Option<&str>) -> String {
        let bundle_uri = match (bundle_base, self.target_uri.as_deref()) {
            (Some(base), Some(uri)) if self.join => Some(format!(
                "{}/{}",
                base.trim_end_matches('/'),
                uri.trim_start_matches('/')
            )),
            _ => None,
        };
        let mut bundled = false;
        let mut out = String::new();

        for asset in self.assets.iter().filter(|asset| asset.kind == kind) {
            match (&asset.source, bundle_uri.as_deref()) {
                (AssetSource::Path(_), Some(uri)) if self.is_bundled(asset) => {
                    if !bundled {
                        push_file_tag(&mut out, kind, uri);
                        bundled = true;
                    }
                }
                (AssetSource::Path(path), _) => push_file_tag(&mut out, kind, path),
                (AssetSource::Inline(code), _) => push_inline_tag(&mut out, kind, code),
            }
        }

        out
    }

    fn push_path(
        &mut self,
        kind: AssetKind,
        path: String,
        join: bool,
        minify: bool,
    ) -> Result<&mut Self, WebtoolsError> {
        let path = non_empty(path, "asset path")?;
        self.assets.push(Asset {
            kind,
            source: AssetSource::Path(path),
            join,
            minify,
        });
        Ok(self)
    }
}

fn non_empty(value: String, what: &str) -> Result<String, WebtoolsError> {
    if value.trim().is_empty() {
        return Err(WebtoolsError::validation(format!("{what} cannot be empty")));
    }
    Ok(value)
}

fn push_file_tag(out: &mut String, kind: AssetKind, uri: &str) {
    let uri = escape_attr(uri);
    out.push_str(&match kind {
        AssetKind::Stylesheet => format!("<link rel=\"stylesheet\" href=\"{uri}\">\n"),
        AssetKind::Script => format!("<script src=\"{uri}\"></script>\n"),
    });
}

fn push_inline_tag(out: &mut String, kind: AssetKind, code: &str) {
    out.push_str(&match kind {
        AssetKind::Stylesheet => format!("<style>{code}</style>\n"),
        AssetKind::Script => format!("<script>{code}</script>\n"),
    });
}

fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
