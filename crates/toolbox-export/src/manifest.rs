//! JSON route manifest for the front-end route table.

use serde::Serialize;
use toolbox_core::{Category, ToolDescriptor};

/// A category index page and the tool ids it lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRoute {
    pub slug: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub path: String,
    pub tools: Vec<&'static str>,
}

/// Every routable page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteManifest {
    pub categories: Vec<CategoryRoute>,
    pub tools: Vec<ToolDescriptor>,
}

impl RouteManifest {
    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns the serializer error, which cannot occur for this shape in
    /// practice.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Group `tools` by category. Categories without tools are omitted.
#[must_use]
pub fn to_route_manifest(tools: &[ToolDescriptor]) -> RouteManifest {
    let categories = Category::ALL
        .into_iter()
        .filter_map(|category| {
            let ids: Vec<_> = tools
                .iter()
                .filter(|t| t.category == category)
                .map(|t| t.id)
                .collect();
            (!ids.is_empty()).then(|| CategoryRoute {
                slug: category.slug(),
                name: category.name(),
                description: category.description(),
                path: category.path(),
                tools: ids,
            })
        })
        .collect();

    RouteManifest {
        categories,
        tools: tools.to_vec(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use toolbox_core::registry;

    #[test]
    fn tools_are_grouped_by_category() {
        let manifest = to_route_manifest(registry::tools());
        let calculators = manifest
            .categories
            .iter()
            .find(|c| c.slug == "calculator")
            .unwrap();
        assert_eq!(calculators.path, "/calculator");
        assert!(calculators.tools.contains(&"age-calculator"));

        let listed: usize = manifest.categories.iter().map(|c| c.tools.len()).sum();
        assert_eq!(listed, registry::tools().len());
    }

    #[test]
    fn empty_categories_are_omitted() {
        let only_text: Vec<_> = registry::in_category(Category::Text).copied().collect();
        let manifest = to_route_manifest(&only_text);
        assert_eq!(manifest.categories.len(), 1);
        assert_eq!(manifest.categories[0].slug, "text");
    }

    #[test]
    fn json_carries_paths_but_not_strategies() {
        let manifest = to_route_manifest(registry::tools());
        let json: serde_json::Value = serde_json::from_str(&manifest.to_json().unwrap()).unwrap();
        let first = &json["tools"][0];
        assert_eq!(
            first["path"].as_str().unwrap(),
            format!("/{}/{}", first["category"].as_str().unwrap(), first["id"].as_str().unwrap())
        );
        assert!(first.get("strategy").is_none());
    }
}
