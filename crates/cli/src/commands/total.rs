use cafeteria_core::config::LoadOptions;
use cafeteria_core::{ApplicationError, InterfaceError, MenuItemId, Order};

use crate::commands::{open_session, CommandResult};

pub fn run(options: LoadOptions, ids: Vec<u64>) -> CommandResult {
    let session = match open_session("total", options) {
        Ok(session) => session,
        Err(result) => return result,
    };
    let notices = session.notices.drain();

    let order = match Order::from_ids(session.store.items(), ids.into_iter().map(MenuItemId)) {
        Ok(order) => order,
        Err(error) => {
            let interface = InterfaceError::from(ApplicationError::from(error));
            return CommandResult::from_interface("total", &interface, &notices);
        }
    };

    let totals = session.store.compute_total(order.items().iter().copied()).rounded();
    let symbol = &session.config.display.currency_symbol;
    CommandResult::success(
        "total",
        format!(
            "{} item(s): subtotal {symbol}{:.2}, tax {symbol}{:.2}, total {symbol}{:.2}",
            order.items().len(),
            totals.subtotal,
            totals.tax,
            totals.total
        ),
        &notices,
    )
}
