use cafeteria_core::config::LoadOptions;
use cafeteria_core::{ApplicationError, InterfaceError};

use crate::commands::{open_session, CommandResult};

pub fn run(options: LoadOptions, name: String, price: String, category: String) -> CommandResult {
    let mut session = match open_session("add", options) {
        Ok(session) => session,
        Err(result) => return result,
    };

    let outcome = session.store.add_item(name, price, category);
    let notices = session.notices.drain();

    match outcome {
        Ok(added) if added.persisted => CommandResult::success(
            "add",
            format!("product `{}` added with id {}", added.item.name, added.item.id),
            &notices,
        ),
        Ok(added) => CommandResult::failure(
            "add",
            "persistence",
            format!(
                "product `{}` got id {} but the catalog `{}` could not be saved",
                added.item.name,
                added.item.id,
                session.config.catalog.path.display()
            ),
            4,
            &notices,
        ),
        Err(error) => {
            let interface = InterfaceError::from(ApplicationError::from(error));
            CommandResult::from_interface("add", &interface, &notices)
        }
    }
}
