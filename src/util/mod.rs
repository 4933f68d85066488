pub mod log;

use std::time::Duration;

/// `m:ss` clock display.
pub fn format_time(time: Duration) -> String {
    let total = time.as_secs();
    format!("{}:{:02}", total / 60, total % 60)
}
