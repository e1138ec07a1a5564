use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 後端目錄中的一堂課。`_id` 是後端 (Mongo) 的主鍵欄位名
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub subject: String,
    pub location: String,
    pub price: f64,
    pub spaces: u32,
}

/// 購物車的一列:課程欄位加上預訂數量。每個課程 id 最多一列
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(flatten)]
    pub lesson: Lesson,
    pub quantity: u32,
}

impl CartLine {
    pub fn subtotal(&self) -> f64 {
        self.lesson.price * self.quantity as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum SortKey {
    Subject,
    Location,
    Price,
    Spaces,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// 結帳時送出的訂單,送出後即丟棄
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub name: String,
    pub phone: String,
    pub lessons: Vec<OrderLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: String,
    pub subject: String,
    pub quantity: u32,
}

/// 後端回傳的訂單確認,欄位不完全固定
#[derive(Debug, Clone, Deserialize)]
pub struct OrderConfirmation {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub details: HashMap<String, serde_json::Value>,
}
