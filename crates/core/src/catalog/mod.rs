pub mod listing;
pub mod storage;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::domain::menu_item::{IntoPrice, MenuItem, MenuItemId};
use crate::errors::{ApplicationError, DomainError, StorageError};
use crate::notice::{Notice, NoticeKind, NoticeLevel, NoticeSink};
use crate::pricing::{compute_total, OrderTotal};

use self::listing::{ListingStyle, MenuListing};
use self::storage::{CatalogStorage, JsonFileStorage};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddedItem {
    pub item: MenuItem,
    /// False when the item only lives in memory because the save failed.
    pub persisted: bool,
}

/// Owns the catalog and its backing resource.
///
/// Lifecycle: [`CatalogStore::open`] loads the catalog, [`CatalogStore::add_item`] appends and
/// saves, and [`CatalogStore::save`] may be called again to retry after a failed write.
pub struct CatalogStore<S = JsonFileStorage> {
    storage: S,
    items: Vec<MenuItem>,
    sink: Arc<dyn NoticeSink>,
    /// Set when the last load could not read existing content; the next save overwrites it.
    unreadable_on_load: bool,
}

impl CatalogStore<JsonFileStorage> {
    pub fn open_json(path: impl Into<PathBuf>, sink: Arc<dyn NoticeSink>) -> Self {
        Self::open(JsonFileStorage::new(path), sink)
    }
}

impl<S: CatalogStorage> CatalogStore<S> {
    pub fn open(storage: S, sink: Arc<dyn NoticeSink>) -> Self {
        let mut store = Self { storage, items: Vec::new(), sink, unreadable_on_load: false };
        store.reload();
        store
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Reads the catalog from storage without touching the in-memory copy.
    ///
    /// Never fails: a missing resource is created empty, unreadable or malformed content yields
    /// an empty catalog and is left as-is on disk.
    pub fn load(&self) -> Vec<MenuItem> {
        self.load_inner().0
    }

    /// Returns the loaded items and whether existing content had to be ignored.
    fn load_inner(&self) -> (Vec<MenuItem>, bool) {
        let resource = self.storage.resource();
        match self.storage.read() {
            Ok(items) => {
                debug!(
                    event_name = "catalog.load.ok",
                    resource = %resource,
                    item_count = items.len(),
                    "catalog loaded"
                );
                (items, false)
            }
            Err(StorageError::Missing { .. }) => {
                // A failed create is already reported by `persist`.
                if self.persist(&[]).is_ok() {
                    self.notify(
                        Notice::new(
                            NoticeKind::ResourceCreated,
                            format!("created empty catalog `{resource}`"),
                        )
                        .with_metadata("resource", resource.clone()),
                    );
                }
                (Vec::new(), false)
            }
            Err(error @ StorageError::Malformed { .. }) => {
                self.notify(
                    Notice::new(
                        NoticeKind::MalformedResource,
                        format!("catalog `{resource}` is not a valid catalog; starting empty"),
                    )
                    .with_metadata("resource", resource.clone())
                    .with_metadata("cause", error.to_string()),
                );
                (Vec::new(), true)
            }
            Err(error) => {
                self.notify(
                    Notice::new(
                        NoticeKind::ResourceUnreadable,
                        format!("catalog `{resource}` could not be read; starting empty"),
                    )
                    .with_metadata("resource", resource.clone())
                    .with_metadata("cause", error.to_string()),
                );
                (Vec::new(), true)
            }
        }
    }

    /// Replaces the in-memory catalog with a fresh [`load`](Self::load).
    pub fn reload(&mut self) {
        let (items, unreadable) = self.load_inner();
        self.items = items;
        self.unreadable_on_load = unreadable;
    }

    /// Writes the full catalog. Failures are reported through a notice as well as returned;
    /// the in-memory catalog is untouched either way.
    ///
    /// The first successful save after a load that ignored unreadable content emits a
    /// `ContentReplaced` notice, since that content is now gone.
    pub fn save(&mut self) -> Result<(), ApplicationError> {
        self.persist(&self.items)?;
        if std::mem::take(&mut self.unreadable_on_load) {
            let resource = self.storage.resource();
            self.notify(
                Notice::new(
                    NoticeKind::ContentReplaced,
                    format!("unreadable previous content of catalog `{resource}` was replaced"),
                )
                .with_metadata("resource", resource),
            );
        }
        Ok(())
    }

    /// `1` for an empty catalog, otherwise one past the highest id.
    pub fn next_id(&self) -> Result<MenuItemId, DomainError> {
        match self.items.iter().map(|item| item.id).max() {
            None => Ok(MenuItemId(1)),
            Some(max) => max.0.checked_add(1).map(MenuItemId).ok_or(DomainError::IdExhausted(max)),
        }
    }

    /// Appends a new item and saves the catalog.
    ///
    /// An invalid price is returned as an error and leaves the catalog unchanged. A failed save
    /// keeps the item in memory and reports `persisted: false`.
    pub fn add_item(
        &mut self,
        name: impl Into<String>,
        price: impl IntoPrice,
        category: impl Into<String>,
    ) -> Result<AddedItem, DomainError> {
        let item = MenuItem::new(self.next_id()?, name, price, category)?;
        self.items.push(item.clone());
        let persisted = self.save().is_ok();

        self.notify(
            Notice::new(
                NoticeKind::ItemAdded,
                format!("product `{}` added with id {}", item.name, item.id),
            )
            .with_metadata("id", item.id.to_string())
            .with_metadata("persisted", persisted.to_string()),
        );

        Ok(AddedItem { item, persisted })
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn find(&self, id: MenuItemId) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Id lookup table, built on demand.
    pub fn index(&self) -> HashMap<MenuItemId, &MenuItem> {
        self.items.iter().map(|item| (item.id, item)).collect()
    }

    pub fn listing(&self) -> MenuListing<'_> {
        MenuListing::from_items(&self.items)
    }

    /// Renders the grouped listing, or emits an empty-catalog notice and returns `None`.
    pub fn render_listing(&self, style: &ListingStyle) -> Option<String> {
        if self.items.is_empty() {
            self.notify(Notice::new(
                NoticeKind::EmptyCatalog,
                "the menu has no products; add some first",
            ));
            return None;
        }
        Some(self.listing().render(style))
    }

    pub fn compute_total<'a>(&self, order: impl IntoIterator<Item = &'a MenuItem>) -> OrderTotal {
        compute_total(order)
    }

    fn persist(&self, items: &[MenuItem]) -> Result<(), ApplicationError> {
        match self.storage.write(items) {
            Ok(()) => {
                debug!(
                    event_name = "catalog.save.ok",
                    resource = %self.storage.resource(),
                    item_count = items.len(),
                    "catalog saved"
                );
                Ok(())
            }
            Err(error) => {
                let resource = self.storage.resource();
                self.notify(
                    Notice::new(
                        NoticeKind::PersistenceFailed,
                        format!("could not save catalog `{resource}`: {error}"),
                    )
                    .with_metadata("resource", resource),
                );
                Err(error.into())
            }
        }
    }

    fn notify(&self, notice: Notice) {
        let event_name = notice.kind.event_name();
        match notice.level {
            NoticeLevel::Info => info!(event_name, "{}", notice.message),
            NoticeLevel::Warning => warn!(event_name, "{}", notice.message),
            NoticeLevel::Error => error!(event_name, "{}", notice.message),
        }
        self.sink.emit(notice);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rust_decimal::Decimal;

    use super::storage::{CatalogStorage, InMemoryStorage};
    use super::CatalogStore;
    use crate::domain::menu_item::MenuItemId;
    use crate::errors::DomainError;
    use crate::notice::{InMemoryNoticeSink, NoticeKind};

    fn store_with(storage: InMemoryStorage) -> (CatalogStore<InMemoryStorage>, InMemoryNoticeSink) {
        let sink = InMemoryNoticeSink::default();
        let store = CatalogStore::open(storage, Arc::new(sink.clone()));
        (store, sink)
    }

    #[test]
    fn assigns_sequential_ids_from_one() {
        let (mut store, _) = store_with(InMemoryStorage::default());

        let ids: Vec<u64> = ["Tarta", "Smoothie", "Tostada"]
            .into_iter()
            .map(|name| store.add_item(name, "1.00", "Postre").expect("valid").item.id.0)
            .collect();

        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(store.next_id(), Ok(MenuItemId(4)));
    }

    #[test]
    fn continues_after_highest_loaded_id() {
        let raw = r#"[
            {"id": 7, "name": "Mocha Blanco", "price": 4.95, "category": "Café Especial"},
            {"id": 3, "name": "Brownie", "price": 2.75, "category": "Postre"}
        ]"#;
        let (mut store, _) = store_with(InMemoryStorage::with_contents(raw));

        let added = store.add_item("Chocolate", "3.10", "Bebida Caliente").expect("valid");
        assert_eq!(added.item.id, MenuItemId(8));
    }

    #[test]
    fn exhausted_ids_fail_without_touching_the_catalog() {
        let raw = r#"[{"id": 18446744073709551615, "name": "A", "price": 1.0, "category": "C"}]"#;
        let (mut store, sink) = store_with(InMemoryStorage::with_contents(raw));
        let before = store.storage().contents();

        let error = store.add_item("B", "1", "C").expect_err("no id left");

        assert_eq!(error, DomainError::IdExhausted(MenuItemId(u64::MAX)));
        assert_eq!(store.len(), 1);
        assert_eq!(store.storage().contents(), before);
        assert!(sink.kinds().is_empty());
    }

    #[test]
    fn first_save_after_malformed_load_reports_replacement() {
        let (mut store, sink) = store_with(InMemoryStorage::with_contents("{ not json"));
        assert_eq!(sink.drain().len(), 1);

        store.add_item("Tarta", "3.75", "Postre").expect("valid");
        store.add_item("Mocha", "4.95", "Café").expect("valid");

        assert_eq!(
            sink.kinds(),
            vec![NoticeKind::ContentReplaced, NoticeKind::ItemAdded, NoticeKind::ItemAdded]
        );
    }

    #[test]
    fn invalid_price_leaves_catalog_untouched() {
        let (mut store, sink) = store_with(InMemoryStorage::default());
        let before = store.storage().contents();

        let error = store.add_item("X", "not-a-number", "Y").expect_err("invalid price");

        assert!(matches!(error, DomainError::InvalidInput { field: "price", .. }));
        assert!(store.is_empty());
        assert_eq!(store.storage().contents(), before);
        assert!(!sink.kinds().contains(&NoticeKind::ItemAdded));
    }

    #[test]
    fn failed_save_keeps_item_in_memory() {
        let (mut store, sink) = store_with(InMemoryStorage::default());
        store.storage().set_fail_writes(true);

        let added = store.add_item("Limonada Menta", 3.20, "Bebida Fría").expect("valid");

        assert!(!added.persisted);
        assert_eq!(store.len(), 1);
        assert_eq!(store.find(MenuItemId(1)).map(|item| item.price), Some(Decimal::new(32, 1)));
        assert_eq!(store.storage().contents().as_deref(), Some(&b"[]\n"[..]));
        assert!(sink.kinds().contains(&NoticeKind::PersistenceFailed));

        store.storage().set_fail_writes(false);
        store.save().expect("retry succeeds");
        assert_eq!(store.load(), store.items());
    }

    #[test]
    fn empty_listing_emits_notice() {
        let (store, sink) = store_with(InMemoryStorage::with_contents("[]"));

        assert_eq!(store.render_listing(&Default::default()), None);
        assert_eq!(sink.kinds(), vec![NoticeKind::EmptyCatalog]);
    }

    #[test]
    fn confirmation_notice_carries_assigned_id() {
        let (mut store, sink) = store_with(InMemoryStorage::with_contents("[]"));
        store.add_item("Yogurt con Granola", "5.50", "Alimentos").expect("valid");

        let notices = sink.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].kind, NoticeKind::ItemAdded);
        assert!(notices[0].message.contains("id 1"));
        assert_eq!(notices[0].metadata.get("persisted").map(String::as_str), Some("true"));
    }

    #[test]
    fn reload_picks_up_storage_contents() {
        let (mut store, _) = store_with(InMemoryStorage::with_contents("[]"));
        let outside = crate::domain::menu_item::MenuItem::new(MenuItemId(3), "Té", "1.5", "Té")
            .expect("valid");
        store.storage().write(std::slice::from_ref(&outside)).expect("direct write");
        assert!(store.is_empty());

        store.reload();
        assert_eq!(store.items(), [outside]);
        assert_eq!(store.next_id(), Ok(MenuItemId(4)));
    }

    #[test]
    fn index_maps_ids_to_items() {
        let (mut store, _) = store_with(InMemoryStorage::default());
        store.add_item("Tarta", "3.75", "Postre").expect("valid");
        store.add_item("Mocha", "4.95", "Café").expect("valid");

        let index = store.index();
        assert_eq!(index.len(), 2);
        assert_eq!(index[&MenuItemId(2)].name, "Mocha");
        assert!(store.find(MenuItemId(3)).is_none());
    }
}
