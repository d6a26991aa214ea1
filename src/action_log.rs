use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use crate::update::UpdateAction;
use crate::util::SORTABLE_FORMAT;

pub fn header_line() -> String {
    format!(
        "{:<30} {:<8} {:<20} {:<20} {:<39} {}",
        "OccurredOn", "ExitCode", "Result", "Name", "WanIpAddress", "Notes"
    )
}

/// One data line. The timestamp cell is the sortable date-time plus the full
/// weekday name, padded to the 30-column `OccurredOn` field.
pub fn format_line(action: &UpdateAction) -> String {
    let occurred = format!(
        "{} {}",
        action.occurred.format(SORTABLE_FORMAT),
        action.occurred.format("%A")
    );

    format!(
        "{:<30} {:<8} {:<20} {:<20} {:<39} {}",
        occurred,
        action.exit_code(),
        action.result,
        action.name,
        action.wan_ip,
        action.notes
    )
}

/// Appends one line per run; the header is written only when the file is
/// created. No rotation, no size bound, no locking.
pub fn append(path: &Path, action: &UpdateAction) -> io::Result<()> {
    let write_header = !path.exists();

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;

    if write_header {
        writeln!(file, "{}", header_line())?;
    }
    writeln!(file, "{}", format_line(action))?;

    Ok(())
}
