use crate::core::{Product, ProductId, ProductLookup, StockLookup, StockRecord};
use crate::utils::error::{CartError, Result};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

/// Catalog API client serving both the stock and the product lookups.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: Client,
    base_url: Url,
    stock_path: String,
    product_path: String,
}

impl HttpCatalog {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Self::with_client(client, base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Result<Self> {
        // Url::join drops the last segment unless the base ends with a slash
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalized).map_err(|e| CartError::InvalidConfigValueError {
            field: "api.base_url".to_string(),
            value: base_url.to_string(),
            reason: format!("Invalid URL format: {}", e),
        })?;

        Ok(Self {
            client,
            base_url,
            stock_path: "stock".to_string(),
            product_path: "product".to_string(),
        })
    }

    pub fn with_paths(mut self, stock_path: &str, product_path: &str) -> Self {
        self.stock_path = stock_path.trim_matches('/').to_string();
        self.product_path = product_path.trim_matches('/').to_string();
        self
    }

    fn resource_url(&self, path: &str, product_id: ProductId) -> Result<Url> {
        self.base_url
            .join(&format!("{}/{}", path, product_id))
            .map_err(|e| CartError::ConfigError {
                message: format!("Cannot build URL for {}/{}: {}", path, product_id, e),
            })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        resource: &'static str,
        path: &str,
        product_id: ProductId,
    ) -> Result<T> {
        let url = self.resource_url(path, product_id)?;

        tracing::debug!("Making API request to: {}", url);
        let response = self.client.get(url.clone()).send().await?;
        tracing::debug!("API response status: {}", response.status());

        match response.status() {
            status if status.is_success() => Ok(response.json::<T>().await?),
            StatusCode::NOT_FOUND => Err(CartError::NotFound {
                resource,
                product_id,
            }),
            status => Err(CartError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            }),
        }
    }
}

#[async_trait::async_trait]
impl StockLookup for HttpCatalog {
    async fn stock(&self, product_id: ProductId) -> Result<StockRecord> {
        self.get_json("stock", &self.stock_path, product_id).await
    }
}

#[async_trait::async_trait]
impl ProductLookup for HttpCatalog {
    async fn product(&self, product_id: ProductId) -> Result<Product> {
        self.get_json("product", &self.product_path, product_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn catalog(server: &MockServer) -> HttpCatalog {
        HttpCatalog::new(&server.base_url(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_stock() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/stock/3");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"id": 3, "amount": 7}));
        });

        let stock = catalog(&server).stock(3).await.unwrap();

        api_mock.assert();
        assert_eq!(stock, StockRecord { id: 3, amount: 7 });
    }

    #[tokio::test]
    async fn test_fetch_product_keeps_metadata() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/product/1");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "id": 1,
                    "title": "Tênis de Caminhada Leve Confortável",
                    "price": 179.9,
                    "image": "https://example.com/shoe1.jpg"
                }));
        });

        let product = catalog(&server).product(1).await.unwrap();

        api_mock.assert();
        assert_eq!(product.id, 1);
        assert_eq!(product.metadata.len(), 3);
        assert_eq!(product.metadata["price"], 179.9);
    }

    #[tokio::test]
    async fn test_custom_paths_under_base_path() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/api/v1/inventory/5");
            then.status(200)
                .json_body(serde_json::json!({"id": 5, "amount": 0}));
        });

        let catalog = HttpCatalog::new(&server.url("/api/v1"), Duration::from_secs(5))
            .unwrap()
            .with_paths("/inventory/", "products");
        let stock = catalog.stock(5).await.unwrap();

        api_mock.assert();
        assert_eq!(stock.amount, 0);
    }

    #[tokio::test]
    async fn test_not_found_maps_to_not_found() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/product/99");
            then.status(404);
        });

        let err = catalog(&server).product(99).await.unwrap_err();

        assert!(matches!(
            err,
            CartError::NotFound {
                resource: "product",
                product_id: 99
            }
        ));
    }

    #[tokio::test]
    async fn test_server_error_maps_to_unexpected_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/stock/1");
            then.status(503);
        });

        let err = catalog(&server).stock(1).await.unwrap_err();

        assert!(matches!(err, CartError::UnexpectedStatus { status: 503, .. }));
        assert!(err.is_collaborator_failure());
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_collaborator_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/stock/1");
            then.status(200).body("not json");
        });

        let err = catalog(&server).stock(1).await.unwrap_err();

        assert!(matches!(err, CartError::Network(_)));
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let err = HttpCatalog::new("not a url", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, CartError::InvalidConfigValueError { .. }));
    }
}
