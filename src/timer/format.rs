//! Text formatting for durations shown to the user.

use std::time::Duration;

/// Formats a duration as `MM:SS`.
///
/// The duration is rounded to the nearest whole second first. Minutes are
/// not wrapped into hours, so one hour renders as `60:00`.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use xtimer::timer::format_duration;
///
/// assert_eq!(format_duration(Duration::from_secs(125)), "02:05");
/// assert_eq!(format_duration(Duration::from_secs(3600)), "60:00");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_secs = round_to_secs(duration);
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

/// Formats a number of minutes as `Hh MMm` (e.g. `2h 05m`).
pub fn format_minutes_total(minutes: u32) -> String {
    format!("{}h {:02}m", minutes / 60, minutes % 60)
}

fn round_to_secs(duration: Duration) -> u64 {
    duration.as_secs() + u64::from(duration.subsec_millis() >= 500)
}
