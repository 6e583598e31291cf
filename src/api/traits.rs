use crate::model::{ApiError, Category, Product};

/// Anything that can hand out a fresh catalog snapshot.
#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_products(&self, category: Option<Category>) -> Result<Vec<Product>, ApiError>;
}
