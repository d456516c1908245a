//! Filter Navigation Model
//!
//! Facets offered next to a product listing. The store keeps the navigation
//! of the listing being shown and does not interpret facet contents.

use serde::{Deserialize, Serialize};

/// One selectable value of a filter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Facet {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub selected: bool,
    /// Filter string selecting this facet, as put into the `filters` query
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub facets: Vec<Facet>,
}

impl Filter {
    pub fn selected_facets(&self) -> impl Iterator<Item = &Facet> {
        self.facets.iter().filter(|f| f.selected)
    }
}

/// Filters available for one listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterNavigation {
    #[serde(default)]
    pub filter: Vec<Filter>,
}

impl FilterNavigation {
    pub fn is_empty(&self) -> bool {
        self.filter.is_empty()
    }

    pub fn filter(&self, id: &str) -> Option<&Filter> {
        self.filter.iter().find(|f| f.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format() {
        let json = serde_json::json!({
            "filter": [{
                "id": "color",
                "name": "Color",
                "facets": [
                    { "name": "red", "count": 3, "selected": true, "filters": "color=red" },
                    { "name": "blue", "displayName": "Blue", "count": 1 }
                ]
            }]
        });
        let navigation: FilterNavigation = serde_json::from_value(json).unwrap();
        let color = navigation.filter("color").unwrap();
        assert_eq!(color.facets.len(), 2);
        assert_eq!(color.facets[1].display_name.as_deref(), Some("Blue"));
        let selected: Vec<_> = color.selected_facets().map(|f| f.name.as_str()).collect();
        assert_eq!(selected, vec!["red"]);
        assert!(navigation.filter("size").is_none());
    }
}
