pub mod catalog;
pub mod storefront;

pub use crate::domain::model::{CartLine, Lesson, Order, OrderConfirmation, OrderLine};
pub use crate::domain::ports::{Catalog, ConfigProvider};
pub use crate::utils::error::Result;
