pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod notice;
pub mod pricing;

pub use catalog::listing::{CategorySection, ListingStyle, MenuListing};
pub use catalog::storage::{CatalogStorage, InMemoryStorage, JsonFileStorage};
pub use catalog::{AddedItem, CatalogStore};
pub use domain::menu_item::{IntoPrice, MenuItem, MenuItemId};
pub use domain::order::Order;
pub use errors::{ApplicationError, DomainError, InterfaceError, StorageError};
pub use notice::{InMemoryNoticeSink, Notice, NoticeKind, NoticeLevel, NoticeSink};
pub use pricing::{compute_total, OrderTotal, TAX_RATE};
