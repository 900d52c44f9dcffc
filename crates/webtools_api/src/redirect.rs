use shared::redirect::Redirect;
use tracing::debug;
use url::Url;

use crate::services::RouteMatcher;

/// Sends the user back to the page named by the `Referer` header, provided
/// that page is still routable. Falls back to [`index_redirect`].
pub fn webtools_redirect(referer: Option<&str>, routes: &dyn RouteMatcher) -> Redirect {
    let Some(path) = referer.and_then(referer_path) else {
        debug!("no usable referer, redirecting to index");
        return index_redirect();
    };

    if routes.dry_run_match(&path) {
        debug!(%path, "redirecting back to referer");
        Redirect::permanent(path)
    } else {
        debug!(%path, "referer does not match a route, redirecting to index");
        index_redirect()
    }
}

pub fn index_redirect() -> Redirect {
    Redirect::index()
}

fn referer_path(referer: &str) -> Option<String> {
    let referer = referer.trim();
    if referer.is_empty() {
        return None;
    }

    let url = match Url::parse(referer) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            if referer.starts_with(|c| c == '?' || c == '#') {
                return None;
            }
            Url::parse("http://localhost/").ok()?.join(referer).ok()?
        }
        Err(_) => return None,
    };
    if url.cannot_be_a_base() || !has_explicit_path(referer) {
        return None;
    }

    let path = url.path();
    (!path.is_empty()).then(|| path.to_string())
}

/// `Url` reports `/` for `https://host`, so whether the referer spelled out a
/// path has to be read from the raw text after the authority.
fn has_explicit_path(referer: &str) -> bool {
    let Some((_, rest)) = referer.split_once("://") else {
        return true;
    };
    rest.find(|c| matches!(c, '/' | '?' | '#'))
        .is_some_and(|i| rest[i..].starts_with('/'))
}
