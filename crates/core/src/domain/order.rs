use std::collections::HashMap;

use crate::domain::menu_item::{MenuItem, MenuItemId};
use crate::errors::DomainError;
use crate::pricing::{compute_total, OrderTotal};

/// A transient selection of catalog items. Never persisted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Order<'a> {
    items: Vec<&'a MenuItem>,
}

impl<'a> Order<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves `ids` against `catalog`, keeping duplicates and request order.
    pub fn from_ids(
        catalog: &'a [MenuItem],
        ids: impl IntoIterator<Item = MenuItemId>,
    ) -> Result<Self, DomainError> {
        let by_id: HashMap<MenuItemId, &'a MenuItem> =
            catalog.iter().map(|item| (item.id, item)).collect();

        let items = ids
            .into_iter()
            .map(|id| by_id.get(&id).copied().ok_or(DomainError::UnknownItem(id)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { items })
    }

    pub fn push(&mut self, item: &'a MenuItem) {
        self.items.push(item);
    }

    pub fn items(&self) -> &[&'a MenuItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total(&self) -> OrderTotal {
        compute_total(self.items.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::Order;
    use crate::domain::menu_item::{MenuItem, MenuItemId};
    use crate::errors::DomainError;

    fn catalog() -> Vec<MenuItem> {
        vec![
            MenuItem::new(MenuItemId(1), "Tarta de Queso", "3.75", "Postre").expect("item"),
            MenuItem::new(MenuItemId(2), "Limonada Menta", "3.20", "Bebida Fría").expect("item"),
        ]
    }

    #[test]
    fn resolves_ids_in_request_order() {
        let catalog = catalog();
        let order = Order::from_ids(&catalog, [MenuItemId(2), MenuItemId(1), MenuItemId(2)])
            .expect("known ids");

        let names: Vec<&str> = order.items().iter().map(|item| item.name.as_str()).collect();
        assert_eq!(names, ["Limonada Menta", "Tarta de Queso", "Limonada Menta"]);
        assert_eq!(order.total().subtotal, Decimal::new(1015, 2));
    }

    #[test]
    fn unknown_id_is_rejected() {
        let catalog = catalog();
        let error = Order::from_ids(&catalog, [MenuItemId(1), MenuItemId(9)])
            .expect_err("id 9 is not in the catalog");

        assert_eq!(error, DomainError::UnknownItem(MenuItemId(9)));
    }

    #[test]
    fn manual_orders_accept_any_item() {
        let outside = MenuItem::new(MenuItemId(99), "Especial", "10", "Temporada").expect("item");
        let mut order = Order::new();
        assert!(order.is_empty());

        order.push(&outside);
        assert_eq!(order.total().total, Decimal::new(1160, 2));
    }
}
