//! Page URL and history, reduced to what platform selection needs

use reqwest::Url;

use crate::keyboard::keybind::Platform;

/// Origin that page-relative URLs are resolved against
const PAGE_ORIGIN: &str = "http://localhost/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLocation {
    url: Url,
    /// Decoded query pairs of `url`, in order
    query: Vec<(String, String)>,
    /// Every URL pushed onto the history stack, oldest first
    history: Vec<String>,
}

fn origin() -> Url {
    match Url::parse(PAGE_ORIGIN) {
        Ok(url) => url,
        Err(_) => unreachable!("PAGE_ORIGIN is a valid absolute URL"),
    }
}

fn decode_query(url: &Url) -> Vec<(String, String)> {
    url.query_pairs()
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect()
}

impl PageLocation {
    /// Parse a page-relative URL such as `/dotfiles?platform=hyprland`
    ///
    /// Anything that does not resolve falls back to `/`.
    pub fn parse(url: &str) -> Self {
        let base = origin();
        let url = base.join(url).unwrap_or_else(|e| {
            tracing::warn!(url, error = %e, "Unparseable page URL, using /");
            base
        });
        Self {
            query: decode_query(&url),
            url,
            history: Vec::new(),
        }
    }

    pub fn path(&self) -> &str {
        self.url.path()
    }

    /// First decoded value of a query parameter
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Platform named by `?platform=`, or `default` when absent or unknown
    pub fn platform(&self, default: Platform) -> Platform {
        match self.query_param("platform") {
            Some(value) if !value.is_empty() => value.parse().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Ignoring platform query parameter");
                default
            }),
            _ => default,
        }
    }

    /// Navigate without reloading; a bare `?query` keeps the current path
    pub fn push_state(&mut self, url: &str) {
        match self.url.join(url) {
            Ok(next) => self.navigate(next),
            Err(e) => tracing::warn!(url, error = %e, "Ignoring unparseable history push"),
        }
    }

    /// Push the current path with its query replaced by `pairs`, encoded
    pub fn push_query(&mut self, pairs: &[(&str, &str)]) {
        let mut next = self.url.clone();
        if pairs.is_empty() {
            next.set_query(None);
        } else {
            next.query_pairs_mut().clear().extend_pairs(pairs);
        }
        self.navigate(next);
    }

    fn navigate(&mut self, url: Url) {
        self.query = decode_query(&url);
        self.url = url;
        let href = self.href();
        tracing::debug!(url = %href, "History push");
        self.history.push(href);
    }

    /// Path and query, as shown in the address bar after the origin
    pub fn href(&self) -> String {
        match self.url.query() {
            Some(query) if !query.is_empty() => format!("{}?{}", self.url.path(), query),
            _ => self.url.path().to_string(),
        }
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }
}

impl Default for PageLocation {
    fn default() -> Self {
        Self::parse("/")
    }
}
