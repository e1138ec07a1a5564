use crate::core::{Catalog, ConfigProvider, Lesson, Order, OrderConfirmation, Result};
use crate::utils::error::ShopError;
use async_trait::async_trait;
use reqwest::{Client, Response};

/// 課程目錄服務的 HTTP 客戶端。四個端點都是同一種失敗方式:
/// 非 2xx 或連線錯誤,一律不重試
pub struct HttpCatalog {
    base_url: String,
    client: Client,
}

impl HttpCatalog {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self::new(config.base_url())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn expect_success(operation: &'static str, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(ShopError::StatusError { operation, status })
        }
    }
}

#[async_trait]
impl Catalog for HttpCatalog {
    async fn list_lessons(&self) -> Result<Vec<Lesson>> {
        let url = self.endpoint("/lessons");
        tracing::debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        let response = Self::expect_success("list_lessons", response)?;
        Ok(response.json().await?)
    }

    async fn search_lessons(&self, query: &str) -> Result<Vec<Lesson>> {
        let url = self.endpoint("/search");
        tracing::debug!("GET {} q={}", url, query);

        let response = self
            .client
            .get(&url)
            .query(&[("q", query)])
            .send()
            .await?;
        let response = Self::expect_success("search_lessons", response)?;
        Ok(response.json().await?)
    }

    async fn update_spaces(&self, lesson_id: &str, spaces: u32) -> Result<Lesson> {
        let url = self.endpoint(&format!("/update/{}", lesson_id));
        tracing::debug!("PUT {} spaces={}", url, spaces);

        let response = self
            .client
            .put(&url)
            .json(&serde_json::json!({ "spaces": spaces }))
            .send()
            .await?;
        let response = Self::expect_success("update_spaces", response)?;
        Ok(response.json().await?)
    }

    async fn submit_order(&self, order: &Order) -> Result<OrderConfirmation> {
        let url = self.endpoint("/order");
        tracing::debug!("POST {} ({} lines)", url, order.lessons.len());

        let response = self.client.post(&url).json(order).send().await?;
        let response = Self::expect_success("submit_order", response)?;
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::OrderLine;
    use httpmock::prelude::*;

    fn lesson_json() -> serde_json::Value {
        serde_json::json!([
            {"_id": "a1", "subject": "Math", "location": "Hendon", "price": 100.0, "spaces": 5},
            {"_id": "b2", "subject": "Music", "location": "Brent", "price": 80.0, "spaces": 0}
        ])
    }

    #[tokio::test]
    async fn test_list_lessons_success() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/lessons");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(lesson_json());
        });

        let catalog = HttpCatalog::new(server.base_url());
        let lessons = catalog.list_lessons().await.unwrap();

        api_mock.assert();
        assert_eq!(lessons.len(), 2);
        assert_eq!(lessons[0].id, "a1");
        assert_eq!(lessons[1].spaces, 0);
    }

    #[tokio::test]
    async fn test_list_lessons_non_success_status() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/lessons");
            then.status(500);
        });

        let catalog = HttpCatalog::new(server.base_url());
        let err = catalog.list_lessons().await.unwrap_err();

        api_mock.assert();
        assert!(err.is_transport());
        match err {
            ShopError::StatusError { operation, status } => {
                assert_eq!(operation, "list_lessons");
                assert_eq!(status, reqwest::StatusCode::INTERNAL_SERVER_ERROR);
            }
            other => panic!("expected StatusError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_search_lessons_encodes_query() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/search")
                .query_param("q", "yoga club");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!([]));
        });

        let catalog = HttpCatalog::new(server.base_url());
        let lessons = catalog.search_lessons("yoga club").await.unwrap();

        api_mock.assert();
        assert!(lessons.is_empty());
    }

    #[tokio::test]
    async fn test_update_spaces_puts_absolute_value() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(PUT)
                .path("/update/a1")
                .json_body(serde_json::json!({"spaces": 4}));
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!(
                    {"_id": "a1", "subject": "Math", "location": "Hendon", "price": 100.0, "spaces": 4}
                ));
        });

        let catalog = HttpCatalog::new(server.base_url());
        let lesson = catalog.update_spaces("a1", 4).await.unwrap();

        api_mock.assert();
        assert_eq!(lesson.spaces, 4);
    }

    #[tokio::test]
    async fn test_submit_order_posts_json_body() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST).path("/order").json_body(serde_json::json!({
                "name": "Jo Ann",
                "phone": "1234567890",
                "lessons": [{"id": "a1", "subject": "Math", "quantity": 2}]
            }));
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"message": "Order placed"}));
        });

        let order = Order {
            name: "Jo Ann".to_string(),
            phone: "1234567890".to_string(),
            lessons: vec![OrderLine {
                id: "a1".to_string(),
                subject: "Math".to_string(),
                quantity: 2,
            }],
        };

        let catalog = HttpCatalog::new(server.base_url());
        let confirmation = catalog.submit_order(&order).await.unwrap();

        api_mock.assert();
        assert_eq!(confirmation.message.as_deref(), Some("Order placed"));
    }

    #[tokio::test]
    async fn test_submit_order_failure_maps_to_status_error() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST).path("/order");
            then.status(400);
        });

        let order = Order {
            name: "Jo Ann".to_string(),
            phone: "1234567890".to_string(),
            lessons: vec![],
        };

        let catalog = HttpCatalog::new(server.base_url());
        let err = catalog.submit_order(&order).await.unwrap_err();

        api_mock.assert();
        assert!(matches!(
            err,
            ShopError::StatusError {
                operation: "submit_order",
                ..
            }
        ));
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let catalog = HttpCatalog::new("http://localhost:9999/");
        assert_eq!(catalog.base_url(), "http://localhost:9999");
        assert_eq!(catalog.endpoint("/lessons"), "http://localhost:9999/lessons");
    }
}
