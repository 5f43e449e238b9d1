use crate::audubon::model::EventRecord;
use std::error::Error;
use std::fs;
use std::path::Path;
use tracing::info;

/// One-shot pretty-printed dump of the full record list.
pub fn write_events(path: &Path, events: &[EventRecord]) -> Result<(), Box<dyn Error>> {
    fs::write(path, serde_json::to_string_pretty(events)?)?;

    info!("Saved {} total events to {}", events.len(), path.display());

    Ok(())
}
