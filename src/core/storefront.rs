use crate::core::{CartLine, Catalog, Lesson, Order, OrderLine};
use crate::domain::model::{SortDirection, SortKey};
use crate::utils::validation::{is_valid_customer_name, is_valid_phone};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// 訂單確認標記自動清除的延遲
pub const CONFIRMATION_CLEAR: Duration = Duration::from_secs(5);

/// 店面的 view-model:庫存與購物車放在本地,排序/過濾/總價/表單驗證
/// 都是純導出,每次讀取時重新計算。所有持久狀態仍在目錄服務端
pub struct Storefront<C: Catalog> {
    catalog: C,
    pub lessons: Vec<Lesson>,
    pub cart: Vec<CartLine>,
    pub search_query: String,
    pub sort_key: SortKey,
    pub direction: SortDirection,
    pub name: String,
    pub phone: String,
    pub show_cart: bool,
    notice: Option<String>,
    confirmed: Arc<AtomicBool>,
    confirm_reset: Option<JoinHandle<()>>,
}

impl<C: Catalog> Storefront<C> {
    pub fn new(catalog: C) -> Self {
        Self {
            catalog,
            lessons: Vec::new(),
            cart: Vec::new(),
            search_query: String::new(),
            sort_key: SortKey::Subject,
            direction: SortDirection::Ascending,
            name: String::new(),
            phone: String::new(),
            show_cart: false,
            notice: None,
            confirmed: Arc::new(AtomicBool::new(false)),
            confirm_reset: None,
        }
    }

    /// Stable sort of the inventory under the current key and direction.
    /// Ties keep their relative order from the inventory.
    pub fn sorted_lessons(&self) -> Vec<Lesson> {
        let mut sorted = self.lessons.clone();
        sorted.sort_by(|a, b| {
            let ordering = match self.sort_key {
                SortKey::Subject => a.subject.cmp(&b.subject),
                SortKey::Location => a.location.cmp(&b.location),
                SortKey::Price => a.price.total_cmp(&b.price),
                SortKey::Spaces => a.spaces.cmp(&b.spaces),
            };
            match self.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
        sorted
    }

    /// Sorted inventory filtered by the current query. A lesson matches when
    /// the lowercased query is a substring of its subject, location, or the
    /// decimal string form of its price or spaces.
    pub fn filtered_lessons(&self) -> Vec<Lesson> {
        let query = self.search_query.to_lowercase();
        self.sorted_lessons()
            .into_iter()
            .filter(|lesson| matches_query(lesson, &query))
            .collect()
    }

    pub fn cart_total(&self) -> f64 {
        self.cart.iter().map(|line| line.subtotal()).sum()
    }

    pub fn valid_form(&self) -> bool {
        is_valid_customer_name(&self.name) && is_valid_phone(&self.phone)
    }

    pub fn order_confirmed(&self) -> bool {
        self.confirmed.load(Ordering::SeqCst)
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    pub fn toggle_order(&mut self) {
        self.direction = self.direction.toggled();
    }

    pub fn toggle_cart(&mut self) {
        self.show_cart = !self.show_cart;
    }

    /// 樂觀更新:先在本地加進購物車、扣掉名額,再呼叫後端。
    /// 呼叫失敗時本地狀態保持已扣,不回滾
    pub async fn add_to_cart(&mut self, lesson_id: &str) {
        let Some(idx) = self.lessons.iter().position(|l| l.id == lesson_id) else {
            return;
        };
        if self.lessons[idx].spaces == 0 {
            return;
        }

        match self.cart.iter().position(|line| line.lesson.id == lesson_id) {
            Some(pos) => self.cart[pos].quantity += 1,
            None => {
                let snapshot = self.lessons[idx].clone();
                self.cart.push(CartLine {
                    lesson: snapshot,
                    quantity: 1,
                });
            }
        }

        self.lessons[idx].spaces -= 1;
        let id = self.lessons[idx].id.clone();
        let spaces = self.lessons[idx].spaces;

        if let Err(err) = self.catalog.update_spaces(&id, spaces).await {
            tracing::error!("Failed to update spaces for lesson {}: {}", id, err);
            self.notice = Some("Failed to update lesson spaces.".to_string());
        }
    }

    /// 把該列的數量全數還給庫存,通知後端,然後無論結果如何移除該列
    pub async fn remove_from_cart(&mut self, index: usize) {
        if index >= self.cart.len() {
            return;
        }
        let line_id = self.cart[index].lesson.id.clone();
        let quantity = self.cart[index].quantity;

        let mut update = None;
        if let Some(lesson) = self.lessons.iter_mut().find(|l| l.id == line_id) {
            lesson.spaces += quantity;
            update = Some((lesson.id.clone(), lesson.spaces));
        }

        if let Some((id, spaces)) = update {
            if let Err(err) = self.catalog.update_spaces(&id, spaces).await {
                tracing::error!("Failed to update spaces for lesson {}: {}", id, err);
                self.notice = Some("Failed to update lesson spaces.".to_string());
            }
        }

        self.cart.remove(index);
    }

    /// 送出訂單。成功時清空購物車與姓名/電話並舉起確認標記,
    /// 標記在 5 秒後由計時任務自動放下;失敗時狀態原封不動
    pub async fn checkout(&mut self) {
        if !self.valid_form() || self.cart.is_empty() {
            return;
        }

        let order = Order {
            name: self.name.clone(),
            phone: self.phone.clone(),
            lessons: self
                .cart
                .iter()
                .map(|line| OrderLine {
                    id: line.lesson.id.clone(),
                    subject: line.lesson.subject.clone(),
                    quantity: line.quantity,
                })
                .collect(),
        };

        match self.catalog.submit_order(&order).await {
            Ok(confirmation) => {
                tracing::info!(
                    "Order submitted ({} lines): {:?}",
                    order.lessons.len(),
                    confirmation.message
                );
                self.cart.clear();
                self.name.clear();
                self.phone.clear();
                self.raise_confirmation();
            }
            Err(err) => {
                tracing::error!("Failed to submit order: {}", err);
                self.notice = Some("Failed to submit order. Check backend.".to_string());
            }
        }
    }

    /// 以 listLessons 的結果整批取代庫存;失敗時保留原本庫存
    pub async fn fetch_lessons(&mut self) {
        match self.catalog.list_lessons().await {
            Ok(lessons) => {
                tracing::debug!("Fetched {} lessons", lessons.len());
                self.lessons = lessons;
            }
            Err(err) => {
                tracing::error!("Failed to load lessons: {}", err);
                self.notice = Some("Failed to load lessons.".to_string());
            }
        }
    }

    /// 空白查詢等於重新抓整份清單,否則用伺服器端搜尋整批取代庫存。
    /// 沒有防抖動也沒有序號:晚到的舊回應可能蓋掉新庫存,維持原行為
    pub async fn search(&mut self) {
        if self.search_query.trim().is_empty() {
            self.fetch_lessons().await;
            return;
        }

        match self.catalog.search_lessons(&self.search_query).await {
            Ok(lessons) => {
                tracing::debug!("Search '{}' matched {} lessons", self.search_query, lessons.len());
                self.lessons = lessons;
            }
            Err(err) => {
                tracing::error!("Search failed: {}", err);
                self.notice = Some("Search failed.".to_string());
            }
        }
    }

    /// 查詢字串一變就觸發搜尋 (沒有防抖動,每個變更都打一次 API)
    pub async fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
        self.search().await;
    }

    fn raise_confirmation(&mut self) {
        self.confirmed.store(true, Ordering::SeqCst);
        if let Some(previous) = self.confirm_reset.take() {
            previous.abort();
        }
        let flag = Arc::clone(&self.confirmed);
        self.confirm_reset = Some(tokio::spawn(async move {
            tokio::time::sleep(CONFIRMATION_CLEAR).await;
            flag.store(false, Ordering::SeqCst);
        }));
    }
}

impl<C: Catalog> Drop for Storefront<C> {
    fn drop(&mut self) {
        if let Some(handle) = self.confirm_reset.take() {
            handle.abort();
        }
    }
}

fn matches_query(lesson: &Lesson, query: &str) -> bool {
    lesson.subject.to_lowercase().contains(query)
        || lesson.location.to_lowercase().contains(query)
        || lesson.price.to_string().contains(query)
        || lesson.spaces.to_string().contains(query)
}
