//! Product listing identity, keys and page arithmetic

use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use super::category::UNIQUE_ID_SEPARATOR;

/// Kind of product sequence a listing shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingKind {
    Category,
    Search,
    Master,
}

impl ListingKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Search => "search",
            Self::Master => "master",
        }
    }
}

/// Identity of one listing series
///
/// Serialized as `{"type": "category", "value": "A.123"}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum ListingId {
    /// Products of a category, by unique id
    Category(String),
    /// Products matching a search term
    Search(String),
    /// Variations of a master product, by sku
    Master(String),
}

impl ListingId {
    pub fn category(unique_id: impl Into<String>) -> Self {
        Self::Category(unique_id.into())
    }

    pub fn search(term: impl Into<String>) -> Self {
        Self::Search(term.into())
    }

    pub fn master(sku: impl Into<String>) -> Self {
        Self::Master(sku.into())
    }

    pub fn kind(&self) -> ListingKind {
        match self {
            Self::Category(_) => ListingKind::Category,
            Self::Search(_) => ListingKind::Search,
            Self::Master(_) => ListingKind::Master,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Self::Category(v) | Self::Search(v) | Self::Master(v) => v,
        }
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind().name(), self.value())
    }
}

/// Listing identity plus the sorting and filter selection
///
/// Two keys that differ only in filters are distinct listings; their pages
/// are cached independently.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ListingKey {
    pub id: ListingId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sorting: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<String>,
}

impl ListingKey {
    /// Build a validated key
    ///
    /// Empty sorting/filter strings are treated as absent.
    pub fn new(id: ListingId, sorting: Option<String>, filters: Option<String>) -> AppResult<Self> {
        let sorting = sorting.filter(|s| !s.trim().is_empty());
        let filters = filters.filter(|f| !f.trim().is_empty());
        let key = Self {
            id,
            sorting,
            filters,
        };
        key.validate()?;
        Ok(key)
    }

    /// Key without sorting or filters
    pub fn plain(id: ListingId) -> AppResult<Self> {
        Self::new(id, None, None)
    }

    /// Same identity and sorting with a different filter selection
    pub fn with_filters(&self, filters: Option<String>) -> AppResult<Self> {
        Self::new(self.id.clone(), self.sorting.clone(), filters)
    }

    fn validate(&self) -> AppResult<()> {
        let value = self.id.value();
        if value.trim().is_empty() {
            return Err(AppError::invalid_listing_key(format!(
                "{} listing requires a non-empty value",
                self.id.kind().name()
            )));
        }

        if let ListingId::Category(unique_id) = &self.id
            && unique_id.split(UNIQUE_ID_SEPARATOR).any(str::is_empty)
        {
            return Err(AppError::invalid_listing_key(format!(
                "malformed category unique id: {}",
                unique_id
            ))
            .with_detail("unique_id", unique_id.clone()));
        }

        if let Some(sorting) = &self.sorting
            && !sorting
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        {
            return Err(
                AppError::invalid_listing_key(format!("malformed sorting: {}", sorting))
                    .with_detail("sorting", sorting.clone()),
            );
        }

        if let Some(filters) = &self.filters {
            if filters.chars().any(char::is_control) {
                return Err(AppError::invalid_listing_key(
                    "filters contain control characters",
                ));
            }
            if self.id.kind() == ListingKind::Master {
                return Err(AppError::invalid_listing_key(
                    "master variation listings cannot be filtered",
                )
                .with_detail("sku", value.to_string()));
            }
        }

        Ok(())
    }
}

impl fmt::Display for ListingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)?;
        if let Some(sorting) = &self.sorting {
            write!(f, " sorting={}", sorting)?;
        }
        if let Some(filters) = &self.filters {
            write!(f, " filters={}", filters)?;
        }
        Ok(())
    }
}

/// Listing presentation, independent of the listing key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewType {
    #[default]
    Grid,
    List,
}

impl ViewType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::List => "list",
        }
    }
}

impl fmt::Display for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grid" => Ok(Self::Grid),
            "list" => Ok(Self::List),
            other => Err(AppError::validation(format!("unknown view type: {}", other))),
        }
    }
}

/// Ordered product sequence returned by the backend for a listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListing {
    /// Skus in listing order
    pub skus: Vec<String>,
    /// Sort keys the backend offers for this listing
    #[serde(default)]
    pub sort_keys: Vec<String>,
    /// Total number of products reported by the backend
    #[serde(default)]
    pub total: usize,
}

impl ProductListing {
    pub fn new(skus: Vec<String>, sort_keys: Vec<String>) -> Self {
        let total = skus.len();
        Self {
            skus,
            sort_keys,
            total,
        }
    }

    /// Reported total, never smaller than the number of skus delivered
    pub fn total(&self) -> usize {
        self.total.max(self.skus.len())
    }
}

/// Index range covered by a 1-based page
///
/// Page 0 is treated as page 1.
pub fn page_range(page: u32, page_size: usize) -> Range<usize> {
    let page = page.max(1) as usize;
    let start = (page - 1).saturating_mul(page_size);
    start..start.saturating_add(page_size)
}

/// Skus occupying `page`: a full slice, a shorter tail, or empty past the end
pub fn page_slice(skus: &[String], page: u32, page_size: usize) -> &[String] {
    let range = page_range(page, page_size);
    if range.start >= skus.len() {
        return &[];
    }
    &skus[range.start..range.end.min(skus.len())]
}

/// Number of pages needed for `total` items
pub fn page_count(total: usize, page_size: usize) -> u32 {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn skus(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("P{}", i)).collect()
    }

    #[test]
    fn test_page_slice_boundaries() {
        let all = skus(7);
        assert_eq!(page_slice(&all, 1, 3), &all[0..3]);
        assert_eq!(page_slice(&all, 2, 3), &all[3..6]);
        assert_eq!(page_slice(&all, 3, 3), &all[6..7]);
        assert!(page_slice(&all, 4, 3).is_empty());
        assert_eq!(page_slice(&all, 0, 3), &all[0..3]);
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(7, 3), 3);
        assert_eq!(page_count(6, 3), 2);
        assert_eq!(page_count(0, 3), 0);
    }

    #[test]
    fn test_pages_concatenate_without_gaps() {
        let all = skus(10);
        let mut joined = Vec::new();
        for page in 1..=page_count(all.len(), 4) {
            joined.extend_from_slice(page_slice(&all, page, 4));
        }
        assert_eq!(joined, all);
    }

    #[test]
    fn test_listing_key_normalizes_empty_params() {
        let key = ListingKey::new(
            ListingId::category("A.123"),
            Some(String::new()),
            Some("  ".into()),
        )
        .unwrap();
        assert_eq!(key.sorting, None);
        assert_eq!(key.filters, None);
    }

    #[test]
    fn test_listing_key_rejections() {
        let err = ListingKey::plain(ListingId::search("")).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidListingKey);

        let err = ListingKey::plain(ListingId::category("A..B")).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidListingKey);

        let err = ListingKey::new(ListingId::category("A"), Some("name asc".into()), None)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidListingKey);

        let err =
            ListingKey::new(ListingId::master("M1"), None, Some("color=red".into())).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidListingKey);
    }

    #[test]
    fn test_with_filters_keeps_identity() {
        let key = ListingKey::new(ListingId::search("camera"), Some("name-asc".into()), None)
            .unwrap();
        let filtered = key.with_filters(Some("brand=acme".into())).unwrap();
        assert_eq!(filtered.id, key.id);
        assert_eq!(filtered.sorting, key.sorting);
        assert_ne!(filtered, key);
    }

    #[test]
    fn test_listing_id_serde_shape() {
        let json = serde_json::to_value(ListingId::category("A.123")).unwrap();
        assert_eq!(json, serde_json::json!({"type": "category", "value": "A.123"}));
    }

    #[test]
    fn test_view_type_parse() {
        assert_eq!("list".parse::<ViewType>().unwrap(), ViewType::List);
        assert_eq!("GRID".parse::<ViewType>().unwrap(), ViewType::Grid);
        assert!("tiles".parse::<ViewType>().is_err());
    }
}
