//! Route resolution events
//!
//! A [`RouteResolution`] is what the route source hands to the store: the
//! url, the path parameters merged across all matched route segments, and
//! the query parameters.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Path parameter holding a category unique id
pub const PARAM_CATEGORY_UNIQUE_ID: &str = "categoryUniqueId";
/// Path parameter holding a product sku
pub const PARAM_SKU: &str = "sku";
/// Path parameter holding a search term
pub const PARAM_SEARCH_TERM: &str = "searchTerm";

pub const QUERY_VIEW: &str = "view";
pub const QUERY_SORTING: &str = "sorting";
pub const QUERY_PAGE: &str = "page";
pub const QUERY_FILTERS: &str = "filters";

/// One resolved navigation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResolution {
    pub url: String,
    /// Path without leading slash or query
    pub path: String,
    #[serde(default)]
    pub params: BTreeMap<String, String>,
    #[serde(default)]
    pub query_params: BTreeMap<String, String>,
}

impl RouteResolution {
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into().trim_matches('/').to_string();
        Self {
            url: format!("/{}", path),
            path,
            params: BTreeMap::new(),
            query_params: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.insert(key.into(), value.into());
        self
    }

    fn param(&self, key: &str) -> Option<&str> {
        self.params
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    fn query(&self, key: &str) -> Option<&str> {
        self.query_params
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn category_unique_id(&self) -> Option<&str> {
        self.param(PARAM_CATEGORY_UNIQUE_ID)
    }

    pub fn sku(&self) -> Option<&str> {
        self.param(PARAM_SKU)
    }

    pub fn search_term(&self) -> Option<&str> {
        self.param(PARAM_SEARCH_TERM)
    }

    pub fn view(&self) -> Option<&str> {
        self.query(QUERY_VIEW)
    }

    pub fn sorting(&self) -> Option<&str> {
        self.query(QUERY_SORTING)
    }

    /// Page query parameter; zero or unparsable values count as absent
    pub fn page(&self) -> Option<u32> {
        self.query(QUERY_PAGE)
            .and_then(|p| p.parse::<u32>().ok())
            .filter(|p| *p > 0)
    }

    pub fn filters(&self) -> Option<&str> {
        self.query(QUERY_FILTERS)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A route pattern such as `category/:categoryUniqueId/product/:sku`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    segments: Vec<Segment>,
}

impl RoutePattern {
    pub fn parse(pattern: &str) -> Self {
        let segments = pattern
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| match s.strip_prefix(':') {
                Some(name) => Segment::Param(name.to_string()),
                None => Segment::Literal(s.to_string()),
            })
            .collect();
        Self { segments }
    }

    fn matches(&self, parts: &[String]) -> Option<BTreeMap<String, String>> {
        if parts.len() != self.segments.len() {
            return None;
        }
        let mut params = BTreeMap::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(lit) if lit == part => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => {
                    params.insert(name.clone(), part.clone());
                }
            }
        }
        Some(params)
    }
}

/// Ordered set of route patterns; the first match wins
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    patterns: Vec<RoutePattern>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes of the storefront's shopping pages
    pub fn storefront() -> Self {
        Self::new()
            .route("category/:categoryUniqueId")
            .route("category/:categoryUniqueId/product/:sku")
            .route("product/:sku")
            .route("search/:searchTerm")
    }

    pub fn route(mut self, pattern: &str) -> Self {
        self.patterns.push(RoutePattern::parse(pattern));
        self
    }

    /// Resolve a url into path and query parameters
    ///
    /// Urls matching no pattern resolve with empty path parameters.
    pub fn resolve(&self, url: &str) -> RouteResolution {
        let url = url.split('#').next().unwrap_or_default();
        let (path, query) = match url.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (url, None),
        };

        let parts: Vec<String> = path
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .map(decode_component)
            .collect();

        let params = self
            .patterns
            .iter()
            .find_map(|p| p.matches(&parts))
            .unwrap_or_default();

        let query_params = query.map(parse_query).unwrap_or_default();

        RouteResolution {
            url: url.to_string(),
            path: path.trim_matches('/').to_string(),
            params,
            query_params,
        }
    }
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}

fn parse_query(query: &str) -> BTreeMap<String, String> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (decode_component(k), decode_component(v)),
            None => (decode_component(pair), String::new()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_category_product_route() {
        let route = RouteTable::storefront().resolve("/category/A.123.456/product/P1?view=list");
        assert_eq!(route.category_unique_id(), Some("A.123.456"));
        assert_eq!(route.sku(), Some("P1"));
        assert_eq!(route.view(), Some("list"));
        assert_eq!(route.path, "category/A.123.456/product/P1");
    }

    #[test]
    fn test_unknown_route_has_no_params() {
        let route = RouteTable::storefront().resolve("/compare");
        assert!(route.params.is_empty());
        assert_eq!(route.category_unique_id(), None);
        assert_eq!(route.sku(), None);
    }

    #[test]
    fn test_query_decoding() {
        let route = RouteTable::storefront()
            .resolve("/search/digital+camera?filters=Brand%3DAcme%26Color%3Dred&page=2&sorting=");
        assert_eq!(route.search_term(), Some("digital camera"));
        assert_eq!(route.filters(), Some("Brand=Acme&Color=red"));
        assert_eq!(route.page(), Some(2));
        assert_eq!(route.sorting(), None);
    }

    #[test]
    fn test_page_zero_is_absent() {
        let route = RouteTable::storefront().resolve("/category/A?page=0");
        assert_eq!(route.page(), None);
        let route = RouteTable::storefront().resolve("/category/A?page=abc");
        assert_eq!(route.page(), None);
    }

    #[test]
    fn test_builder() {
        let route = RouteResolution::new("/category/A/")
            .with_param(PARAM_CATEGORY_UNIQUE_ID, "A")
            .with_query(QUERY_VIEW, "grid");
        assert_eq!(route.url, "/category/A");
        assert_eq!(route.category_unique_id(), Some("A"));
        assert_eq!(route.view(), Some("grid"));
    }
}
