use cafeteria_core::config::LoadOptions;

use crate::commands::{open_session, CommandResult};

/// Demo products, in the order they are added.
pub const DEMO_PRODUCTS: [(&str, &str, &str); 9] = [
    ("Tarta de Queso", "3.75", "Postre"),
    ("Smoothie de Mango", "4.20", "Bebida Fría"),
    ("Tostada de Aguacate", "6.00", "Alimentos"),
    ("Limonada Menta", "3.20", "Bebida Fría"),
    ("Mocha Blanco", "4.95", "Café Especial"),
    ("Brownie de Nuez", "2.75", "Postre"),
    ("Chocolate Caliente", "3.10", "Bebida Caliente"),
    ("Yogurt con Granola", "5.50", "Alimentos"),
    ("Frappé de Caramelo", "5.25", "Bebida Fría"),
];

/// Adds every demo product whose name is not in the catalog yet, so repeated runs are no-ops.
pub fn run(options: LoadOptions) -> CommandResult {
    let mut session = match open_session("seed", options) {
        Ok(session) => session,
        Err(result) => return result,
    };

    let mut added = Vec::new();
    let mut unsaved = 0usize;
    for (name, price, category) in DEMO_PRODUCTS {
        if session.store.items().iter().any(|item| item.name == name) {
            continue;
        }
        match session.store.add_item(name, price, category) {
            Ok(outcome) => {
                if !outcome.persisted {
                    unsaved += 1;
                }
                added.push(format!("  - {}: {}", outcome.item.id, outcome.item.name));
            }
            Err(error) => {
                let notices = session.notices.drain();
                return CommandResult::failure(
                    "seed",
                    "invalid_input",
                    format!("demo product `{name}` was rejected: {error}"),
                    3,
                    &notices,
                );
            }
        }
    }

    let notices = session.notices.drain();
    if unsaved > 0 {
        return CommandResult::failure(
            "seed",
            "persistence",
            format!("{unsaved} demo product(s) could not be saved"),
            4,
            &notices,
        );
    }

    let message = if added.is_empty() {
        "demo products already present; nothing to add".to_string()
    } else {
        format!("added {} demo product(s):\n{}", added.len(), added.join("\n"))
    };
    CommandResult::success("seed", message, &notices)
}
