use crate::domain::model::{Lesson, Order, OrderConfirmation};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 遠端課程目錄服務的四個操作。所有持久狀態都在服務端
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn list_lessons(&self) -> Result<Vec<Lesson>>;

    /// Server-side text search. Redirecting an empty query to
    /// `list_lessons` is the caller's job, not this operation's.
    async fn search_lessons(&self, query: &str) -> Result<Vec<Lesson>>;

    /// Idempotent set of the remaining capacity (absolute value, not a delta).
    async fn update_spaces(&self, lesson_id: &str, spaces: u32) -> Result<Lesson>;

    /// No idempotency guarantee: a retried call may create duplicate orders.
    async fn submit_order(&self, order: &Order) -> Result<OrderConfirmation>;
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
}
