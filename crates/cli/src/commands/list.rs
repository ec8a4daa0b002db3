use cafeteria_core::config::LoadOptions;

use crate::commands::{open_session, CommandResult};

/// Prints the grouped listing as plain text, preceded by any notices raised while loading.
pub fn run(options: LoadOptions) -> CommandResult {
    let session = match open_session("list", options) {
        Ok(session) => session,
        Err(result) => return result,
    };

    let rendered = session.store.render_listing(&session.config.display.listing_style());
    let mut lines: Vec<String> =
        session.notices.drain().iter().map(ToString::to_string).collect();
    if let Some(listing) = rendered {
        lines.push(listing);
    }

    CommandResult { exit_code: 0, output: lines.join("\n") }
}
