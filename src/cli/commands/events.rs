use anyhow::Result;

use crate::PropertyId;

use super::CommandContext;
use crate::cli::ui;

/// Print the event journal, optionally narrowed to one property
pub fn execute(ctx: &CommandContext, id: Option<PropertyId>) -> Result<()> {
    let journal = match &ctx.journal {
        Some(journal) => journal,
        None => {
            ui::print_warning("No event journal configured (set event_log_path or ESTATE_EVENT_LOG)");
            return Ok(());
        }
    };

    let events: Vec<_> = journal
        .read_all()?
        .into_iter()
        .filter(|event| id.map_or(true, |id| event.property_id() == id))
        .collect();

    if ctx.is_json() {
        return ctx.emit_json(&events);
    }
    if events.is_empty() {
        ui::print_info("No events recorded");
        return Ok(());
    }
    ui::print_header(&format!("Events from {}", journal.path().display()));
    for (i, event) in events.iter().enumerate() {
        ui::display_event(i, event);
    }
    Ok(())
}
