use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::de::{self, Unexpected};
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct MenuItemId(pub u64);

impl<'de> Deserialize<'de> for MenuItemId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match u64::deserialize(deserializer)? {
            0 => Err(de::Error::invalid_value(Unexpected::Unsigned(0), &"an id of at least 1")),
            id => Ok(Self(id)),
        }
    }
}

impl fmt::Display for MenuItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One sellable entry of the catalog.
///
/// Prices are stored as JSON numbers on disk and as [`Decimal`] in memory. The Spanish field
/// names are accepted on read so catalogs written by older tooling still load. Records with a
/// zero id or a negative price fail to deserialize.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: MenuItemId,
    #[serde(alias = "nombre")]
    pub name: String,
    #[serde(
        alias = "precio",
        serialize_with = "rust_decimal::serde::float::serialize",
        deserialize_with = "deserialize_price"
    )]
    pub price: Decimal,
    #[serde(alias = "categoria")]
    pub category: String,
}

impl MenuItem {
    pub fn new(
        id: MenuItemId,
        name: impl Into<String>,
        price: impl IntoPrice,
        category: impl Into<String>,
    ) -> Result<Self, DomainError> {
        Ok(Self { id, name: name.into(), price: price.into_price()?, category: category.into() })
    }
}

/// Conversion of caller-supplied amounts into a validated price.
///
/// Non-numeric, non-finite and negative amounts are rejected with
/// [`DomainError::InvalidInput`], as are amounts that would not survive being stored as a JSON
/// number (more than about 15 significant digits).
pub trait IntoPrice {
    fn into_price(self) -> Result<Decimal, DomainError>;
}

impl IntoPrice for Decimal {
    fn into_price(self) -> Result<Decimal, DomainError> {
        validate_price(self)
    }
}

impl IntoPrice for f64 {
    fn into_price(self) -> Result<Decimal, DomainError> {
        if !self.is_finite() {
            return Err(DomainError::invalid_input("price", format!("`{self}` is not finite")));
        }
        let value = Decimal::from_str(&self.to_string()).map_err(|error| {
            DomainError::invalid_input("price", format!("`{self}` is out of range: {error}"))
        })?;
        validate_price(value)
    }
}

impl IntoPrice for u32 {
    fn into_price(self) -> Result<Decimal, DomainError> {
        Ok(Decimal::from(self))
    }
}

impl IntoPrice for &str {
    fn into_price(self) -> Result<Decimal, DomainError> {
        parse_price(self)
    }
}

impl IntoPrice for String {
    fn into_price(self) -> Result<Decimal, DomainError> {
        parse_price(&self)
    }
}

pub fn parse_price(raw: &str) -> Result<Decimal, DomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DomainError::invalid_input("price", "value is empty"));
    }

    let value = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| DomainError::invalid_input("price", format!("`{trimmed}` is not a number")))?;
    validate_price(value)
}

fn validate_price(value: Decimal) -> Result<Decimal, DomainError> {
    let value = ensure_non_negative(value)?;
    // Prices are written as f64; what reads back must equal what was accepted.
    let stored = value.to_f64().and_then(|float| Decimal::from_str(&float.to_string()).ok());
    if stored != Some(value) {
        return Err(DomainError::invalid_input(
            "price",
            format!("`{value}` has more digits than a stored price keeps"),
        ));
    }
    Ok(value)
}

fn ensure_non_negative(value: Decimal) -> Result<Decimal, DomainError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(DomainError::invalid_input("price", format!("`{value}` is negative")));
    }
    Ok(value)
}

fn deserialize_price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
    let value = rust_decimal::serde::float::deserialize(deserializer)?;
    ensure_non_negative(value).map_err(de::Error::custom)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{parse_price, IntoPrice, MenuItem, MenuItemId};
    use crate::errors::DomainError;

    #[test]
    fn parses_plain_and_padded_amounts() {
        assert_eq!(parse_price("3.75").expect("plain"), Decimal::new(375, 2));
        assert_eq!(parse_price("  4.20 ").expect("padded"), Decimal::new(420, 2));
        assert_eq!(parse_price("6").expect("integer"), Decimal::from(6));
        assert_eq!(parse_price("1e1").expect("scientific"), Decimal::from(10));
    }

    #[test]
    fn rejects_non_numeric_price() {
        let error = parse_price("not-a-number").expect_err("should fail");
        assert!(matches!(error, DomainError::InvalidInput { field: "price", .. }));
    }

    #[test]
    fn rejects_negative_and_non_finite_prices() {
        assert!(parse_price("-1.00").is_err());
        assert!(f64::NAN.into_price().is_err());
        assert!(f64::INFINITY.into_price().is_err());
        assert!((-0.5_f64).into_price().is_err());
    }

    #[test]
    fn float_prices_keep_cent_precision() {
        assert_eq!(3.75_f64.into_price().expect("float"), Decimal::new(375, 2));
        assert_eq!(4.2_f64.into_price().expect("float"), Decimal::new(42, 1));
    }

    #[test]
    fn serializes_price_as_json_number() {
        let item = MenuItem::new(MenuItemId(1), "Mocha Blanco", "4.95", "Café Especial")
            .expect("valid item");
        let json = serde_json::to_value(&item).expect("serialize");

        assert_eq!(json["id"], 1);
        let price = json["price"].as_f64().expect("price is a JSON number");
        assert!((price - 4.95).abs() < 1e-9);
        assert_eq!(json["category"], "Café Especial");
    }

    #[test]
    fn rejects_prices_with_more_digits_than_storage_keeps() {
        let error = parse_price("1.23456789012345678").expect_err("too precise");
        assert!(matches!(error, DomainError::InvalidInput { field: "price", .. }));

        let kept = parse_price("12345.6789").expect("fits");
        let item = MenuItem::new(MenuItemId(1), "Pastel", kept, "Postre").expect("valid item");
        let raw = serde_json::to_string(&item).expect("serialize");
        let decoded: MenuItem = serde_json::from_str(&raw).expect("deserialize");
        assert_eq!(decoded, item);
    }

    #[test]
    fn stored_records_with_negative_price_or_zero_id_fail_to_decode() {
        let negative = r#"{"id": 1, "name": "A", "price": -5.0, "category": "C"}"#;
        let error = serde_json::from_str::<MenuItem>(negative).expect_err("negative price");
        assert!(error.to_string().contains("negative"));

        let zero_id = r#"{"id": 0, "name": "A", "price": 5.0, "category": "C"}"#;
        assert!(serde_json::from_str::<MenuItem>(zero_id).is_err());
    }

    #[test]
    fn reads_legacy_spanish_field_names() {
        let raw = r#"{"id": 3, "nombre": "Brownie de Nuez", "precio": 2.75, "categoria": "Postre"}"#;
        let item: MenuItem = serde_json::from_str(raw).expect("legacy record");

        assert_eq!(item.name, "Brownie de Nuez");
        assert_eq!(item.price, Decimal::new(275, 2));
        assert_eq!(item.category, "Postre");
    }
}
