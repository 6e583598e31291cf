use crate::model::{Category, Product};

/// Catalog listing filter: keeps products of `category` (all when `None`) whose
/// device list contains `query`, ignoring case. A blank query keeps everything.
pub fn filter_products<'a>(catalog: &'a [Product], category: Option<Category>, query: &str) -> Vec<&'a Product> {
    let needle = query.trim().to_lowercase();

    catalog
        .iter()
        .filter(|p| category.is_none() || p.category == category)
        .filter(|p| {
            needle.is_empty()
                || p.compatible_devices
                    .as_deref()
                    .is_some_and(|devices| devices.to_lowercase().contains(&needle))
        })
        .collect()
}
