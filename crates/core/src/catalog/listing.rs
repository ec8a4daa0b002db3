use std::fmt;

use rust_decimal::RoundingStrategy;

use crate::domain::menu_item::MenuItem;

const RULE: &str = "---------------------------------------------";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListingStyle {
    pub title: String,
    pub currency_symbol: String,
    pub name_width: usize,
}

impl Default for ListingStyle {
    fn default() -> Self {
        Self { title: "Menu".to_string(), currency_symbol: "$".to_string(), name_width: 25 }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategorySection<'a> {
    pub category: &'a str,
    pub items: Vec<&'a MenuItem>,
}

/// Catalog grouped by category.
///
/// Sections appear in the order their category is first seen; items keep catalog order
/// inside each section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuListing<'a> {
    pub sections: Vec<CategorySection<'a>>,
}

impl<'a> MenuListing<'a> {
    pub fn from_items(items: &'a [MenuItem]) -> Self {
        let mut sections: Vec<CategorySection<'a>> = Vec::new();
        for item in items {
            match sections.iter_mut().find(|section| section.category == item.category) {
                Some(section) => section.items.push(item),
                None => sections
                    .push(CategorySection { category: item.category.as_str(), items: vec![item] }),
            }
        }
        Self { sections }
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn render(&self, style: &ListingStyle) -> String {
        Rendered { listing: self, style }.to_string()
    }
}

struct Rendered<'l, 'a> {
    listing: &'l MenuListing<'a>,
    style: &'l ListingStyle,
}

impl fmt::Display for Rendered<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let style = self.style;
        writeln!(f, "{}", style.title)?;
        writeln!(f, "{RULE}")?;

        for section in &self.listing.sections {
            writeln!(f)?;
            writeln!(f, "== {} ==", section.category.to_uppercase())?;
            for item in &section.items {
                let price =
                    item.price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
                writeln!(
                    f,
                    "  [{}] {:<width$} {}{:.2}",
                    item.id,
                    item.name,
                    style.currency_symbol,
                    price,
                    width = style.name_width
                )?;
            }
        }

        write!(f, "{RULE}")
    }
}
