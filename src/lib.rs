pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::TomlConfig;

pub use crate::core::catalog::HttpCatalog;
pub use crate::core::storefront::{Storefront, CONFIRMATION_CLEAR};
pub use crate::domain::model::{
    CartLine, Lesson, Order, OrderConfirmation, OrderLine, SortDirection, SortKey,
};
pub use crate::domain::ports::{Catalog, ConfigProvider};
pub use crate::utils::error::{Result, ShopError};
