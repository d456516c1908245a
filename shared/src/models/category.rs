//! Category Model

use serde::{Deserialize, Serialize};

/// Separator between id segments of a category `unique_id`
pub const UNIQUE_ID_SEPARATOR: char = '.';

/// Category entity
///
/// `unique_id` is the dot-joined path of ancestor ids (`A.123.456`) and is
/// stable across loads. `id` is only unique among siblings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub unique_id: String,
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub has_online_sub_categories: bool,
    #[serde(default)]
    pub has_online_products: bool,

    // -- Relations (populated by the tree mapper, empty when unknown) --

    /// Child category unique ids, in backend order
    #[serde(default)]
    pub sub_categories: Vec<String>,
}

impl Category {
    /// Create a leaf category with the given path
    pub fn new(unique_id: impl Into<String>) -> Self {
        let unique_id = unique_id.into();
        let id = unique_id::local_id(&unique_id).to_string();
        Self {
            unique_id,
            id,
            name: None,
            has_online_sub_categories: false,
            has_online_products: false,
            sub_categories: Vec::new(),
        }
    }

    /// Parent unique id, `None` for root categories
    pub fn parent_unique_id(&self) -> Option<&str> {
        unique_id::parent(&self.unique_id)
    }

    pub fn is_root(&self) -> bool {
        self.parent_unique_id().is_none()
    }
}

/// Category as delivered by the backend: ids are local, children nested
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryData {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub has_online_sub_categories: bool,
    #[serde(default)]
    pub has_online_products: bool,
    #[serde(default)]
    pub sub_categories: Vec<CategoryData>,
}

impl CategoryData {
    /// Flatten this node and its descendants into categories
    ///
    /// Children are emitted before their parent. `parent` is the unique id of
    /// the node this data hangs under (`None` for a root category).
    pub fn into_categories(self, parent: Option<&str>) -> Vec<Category> {
        let mut out = Vec::new();
        self.flatten_into(parent, &mut out);
        out
    }

    fn flatten_into(self, parent: Option<&str>, out: &mut Vec<Category>) -> String {
        let unique_id = unique_id::child(parent, &self.id);
        let mut children = Vec::with_capacity(self.sub_categories.len());
        for sub in self.sub_categories {
            children.push(sub.flatten_into(Some(&unique_id), out));
        }
        out.push(Category {
            unique_id: unique_id.clone(),
            id: self.id,
            name: self.name,
            has_online_sub_categories: self.has_online_sub_categories,
            has_online_products: self.has_online_products,
            sub_categories: children,
        });
        unique_id
    }
}

/// Flatten a list of root-level category trees
pub fn flatten_tree(roots: Vec<CategoryData>) -> Vec<Category> {
    roots
        .into_iter()
        .flat_map(|root| root.into_categories(None))
        .collect()
}

/// Helpers for dot-joined category paths
pub mod unique_id {
    use super::UNIQUE_ID_SEPARATOR;

    /// Cumulative prefixes of a unique id, root first, including the id itself
    ///
    /// `"A.123.456"` yields `["A", "A.123", "A.123.456"]`.
    pub fn ancestors(unique_id: &str) -> Vec<String> {
        let mut out = Vec::new();
        if unique_id.is_empty() {
            return out;
        }
        for (idx, ch) in unique_id.char_indices() {
            if ch == UNIQUE_ID_SEPARATOR {
                out.push(unique_id[..idx].to_string());
            }
        }
        out.push(unique_id.to_string());
        out
    }

    /// Unique id of the parent, `None` for a root
    pub fn parent(unique_id: &str) -> Option<&str> {
        unique_id
            .rfind(UNIQUE_ID_SEPARATOR)
            .map(|idx| &unique_id[..idx])
    }

    /// Last segment of the path
    pub fn local_id(unique_id: &str) -> &str {
        unique_id
            .rfind(UNIQUE_ID_SEPARATOR)
            .map_or(unique_id, |idx| &unique_id[idx + 1..])
    }

    /// Unique id of `id` placed under `parent`
    pub fn child(parent: Option<&str>, id: &str) -> String {
        match parent {
            Some(p) => format!("{}{}{}", p, UNIQUE_ID_SEPARATOR, id),
            None => id.to_string(),
        }
    }

    /// Whether `ancestor` is `unique_id` itself or one of its ancestors
    pub fn is_self_or_ancestor(ancestor: &str, unique_id: &str) -> bool {
        unique_id == ancestor
            || (unique_id.len() > ancestor.len()
                && unique_id.starts_with(ancestor)
                && unique_id[ancestor.len()..].starts_with(UNIQUE_ID_SEPARATOR))
    }
}
