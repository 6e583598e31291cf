pub mod client;
pub mod traits;


pub use client::ApiClient;
pub use traits::CatalogSource;
