use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::domain::menu_item::MenuItem;

/// Sales tax applied to every order subtotal (16%).
pub const TAX_RATE: Decimal = Decimal::from_parts(16, 0, 0, false, 2);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotal {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl OrderTotal {
    /// Rounds every amount to cents for display. The unrounded values stay authoritative.
    pub fn rounded(&self) -> Self {
        Self { subtotal: cents(self.subtotal), tax: cents(self.tax), total: cents(self.total) }
    }
}

pub fn compute_total<'a>(items: impl IntoIterator<Item = &'a MenuItem>) -> OrderTotal {
    let subtotal: Decimal = items.into_iter().map(|item| item.price).sum();
    let tax = subtotal * TAX_RATE;
    let total = subtotal + tax;

    OrderTotal { subtotal, tax, total }
}

fn cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
