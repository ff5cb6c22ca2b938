use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// Signals are aligned to M5 boundaries
pub const WINDOW_MINUTES: i64 = 5;

/// Fixed UTC+3 display offset (EAT)
pub const DISPLAY_OFFSET: FixedOffset = match FixedOffset::east_opt(3 * 3600) {
    Some(offset) => offset,
    None => panic!("UTC+3 is a valid offset"),
};

pub const DISPLAY_OFFSET_LABEL: &str = "EAT";

/// The M5 slot in which a signal is meant to be acted upon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalWindow {
    pub valid_from: DateTime<FixedOffset>,
    pub valid_to: DateTime<FixedOffset>,
}

impl SignalWindow {
    /// Next 5-minute boundary strictly after the current minute, through 5 minutes later.
    /// 10:07:30 -> [10:10, 10:15); 10:05:00 -> [10:10, 10:15).
    pub fn next_m5(now: DateTime<Utc>) -> Self {
        let minute = now.timestamp().div_euclid(60);
        let start_minute = (minute.div_euclid(WINDOW_MINUTES) + 1) * WINDOW_MINUTES;
        let start = DateTime::<Utc>::from_timestamp(start_minute * 60, 0).unwrap_or(now);
        let end = start + chrono::Duration::minutes(WINDOW_MINUTES);

        Self {
            valid_from: start.with_timezone(&DISPLAY_OFFSET),
            valid_to: end.with_timezone(&DISPLAY_OFFSET),
        }
    }

    pub fn start_label(&self) -> String {
        format_display_time(self.valid_from)
    }

    pub fn end_label(&self) -> String {
        format_display_time(self.valid_to)
    }
}

/// `HH:MM EAT`
pub fn format_display_time(time: DateTime<FixedOffset>) -> String {
    format!("{} {}", time.format("%H:%M"), DISPLAY_OFFSET_LABEL)
}
