use crate::api::traits::CatalogSource;
use crate::model::{ApiError, AuthResponse, Category, LoginRequest, Product, RegisterRequest};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::sync::RwLock;
use std::time::Duration;
use tracing::{info, warn};

/// REST client for the catalog and auth endpoints.
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .user_agent(concat!("proglide/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: RwLock::new(None),
        })
    }

    /// Sets or clears the bearer token sent with every request.
    pub fn set_token(&self, token: Option<String>) {
        if let Ok(mut guard) = self.token.write() {
            *guard = token;
        }
    }

    pub fn has_token(&self) -> bool {
        self.token.read().map(|t| t.is_some()).unwrap_or(false)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token.read().ok().and_then(|t| t.clone()) {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// `GET /products`, optionally narrowed to one category.
    pub async fn get_products(&self, category: Option<Category>) -> Result<Vec<Product>, ApiError> {
        let url = self.url("products");
        let mut request = self.authorized(self.client.get(&url));
        if let Some(category) = category {
            request = request.query(&[("category", category.label())]);
        }

        info!("Fetching catalog from {} (category: {:?})", url, category.map(Category::label));
        let response = request.send().await.inspect_err(|e| warn!("Catalog fetch failed: {}", e))?;
        let products: Vec<Product> = read_json(response).await?;
        info!("Fetched {} products", products.len());
        Ok(products)
    }

    pub async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse, ApiError> {
        let response = self
            .authorized(self.client.post(self.url("auth/login")))
            .json(credentials)
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn register(&self, account: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        let response = self
            .authorized(self.client.post(self.url("auth/register")))
            .json(account)
            .send()
            .await?;
        read_json(response).await
    }
}

#[async_trait::async_trait]
impl CatalogSource for ApiClient {
    async fn fetch_products(&self, category: Option<Category>) -> Result<Vec<Product>, ApiError> {
        self.get_products(category).await
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        warn!("API responded [{}]: {}", status, body);
        return Err(ApiError::Server {
            status: status.as_u16(),
            message: parse_error_message(&body),
        });
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Extracts `message` (or `error`) from a JSON error body.
pub fn parse_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body.trim()).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|field| value.get(field).and_then(|m| m.as_str()))
        .map(str::to_string)
}
