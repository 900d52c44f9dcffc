use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::WebtoolsError;

pub const WEBTOOLS_LAYOUT: &str = "webtools";

/// Variables handed to every rendered page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateContext {
    vars: BTreeMap<String, String>,
}

impl TemplateContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Lookup for templates, where a missing variable renders as nothing.
    pub fn var(&self, key: &str) -> &str {
        self.get(key).unwrap_or_default()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Merges `other` into this context. Values from `other` win on key clashes.
    pub fn extend(&mut self, other: TemplateContext) {
        self.vars.extend(other.vars);
    }
}

impl<K, V> FromIterator<(K, V)> for TemplateContext
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Layout(String);

impl Layout {
    pub fn new(name: impl Into<String>) -> Result<Self, WebtoolsError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(WebtoolsError::validation("layout name cannot be empty"));
        }
        Ok(Self(name))
    }

    pub fn webtools() -> Self {
        Self(WEBTOOLS_LAYOUT.to_string())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Layout {
    type Error = WebtoolsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Layout> for String {
    fn from(value: Layout) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extend_overrides_existing_keys() {
        let mut ctx: TemplateContext = [("app_name", "old"), ("app_mini", "PWT")]
            .into_iter()
            .collect();
        ctx.extend([("app_name", "new")].into_iter().collect());

        assert_eq!(ctx.get("app_name"), Some("new"));
        assert_eq!(ctx.get("app_mini"), Some("PWT"));
        assert_eq!(ctx.len(), 2);
    }

    #[test]
    fn missing_var_renders_empty() {
        let ctx = TemplateContext::new();
        assert_eq!(ctx.var("base_uri"), "");
        assert!(ctx.is_empty());
    }

    #[test]
    fn blank_layout_name_is_rejected() {
        assert!(matches!(
            Layout::new("  "),
            Err(WebtoolsError::Validation(_))
        ));
        assert_eq!(Layout::webtools().name(), "webtools");
    }

    #[test]
    fn context_serializes_as_flat_object() {
        let ctx: TemplateContext = [("app_mini", "PWT")].into_iter().collect();
        let json = serde_json::to_value(&ctx).expect("json");
        assert_eq!(json, serde_json::json!({ "app_mini": "PWT" }));
    }
}
