use std::fmt;

use shared::error::WebtoolsError;

use crate::services::RouteMatcher;

/// The page routes the server dispatches, kept in a form that can be queried
/// without running a handler.
///
/// Uses the same matcher and pattern syntax as axum 0.7 (`/users/:id`,
/// `/files/*rest`), so a path matches here exactly when the real router would
/// dispatch it.
pub struct RouteTable {
    router: matchit::Router<usize>,
    patterns: Vec<String>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self {
            router: matchit::Router::new(),
            patterns: Vec::new(),
        }
    }

    pub fn insert(&mut self, pattern: &str) -> Result<(), WebtoolsError> {
        if self.patterns.iter().any(|p| p == pattern) {
            return Ok(());
        }
        self.router
            .insert(pattern, self.patterns.len())
            .map_err(|e| WebtoolsError::Config(format!("route '{pattern}': {e}")))?;
        self.patterns.push(pattern.to_string());
        Ok(())
    }

    /// The pattern `path` resolves to, if any.
    pub fn matched_pattern(&self, path: &str) -> Option<&str> {
        let matched = self.router.at(path).ok()?;
        self.patterns.get(*matched.value).map(String::as_str)
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTable")
            .field("patterns", &self.patterns)
            .finish()
    }
}

impl RouteMatcher for RouteTable {
    fn dry_run_match(&self, path: &str) -> bool {
        self.matched_pattern(path).is_some()
    }
}
