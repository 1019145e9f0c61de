//! Presentation settings resolved once at startup and passed explicitly

use chrono::{FixedOffset, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Light or dark appearance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

/// Configuration for presentation of chat list entries
#[derive(Debug, Clone, Default)]
pub struct DisplayConfig {
    /// Offset from UTC in minutes used for `HH:MM` times
    pub utc_offset_minutes: i32,

    pub color_scheme: ColorScheme,
}

impl DisplayConfig {
    /// Format a millisecond timestamp as `HH:MM`.
    ///
    /// Out of range offsets fall back to UTC; out of range timestamps yield an
    /// empty string.
    pub fn format_time(&self, millis: i64) -> String {
        let Some(dt) = Utc.timestamp_millis_opt(millis).single() else {
            return String::new();
        };

        match FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60)) {
            Some(offset) => dt.with_timezone(&offset).format("%H:%M").to_string(),
            None => dt.format("%H:%M").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time_utc() {
        let config = DisplayConfig::default();
        // 2024-01-01T13:05:00Z
        assert_eq!(config.format_time(1_704_114_300_000), "13:05");
    }

    #[test]
    fn test_format_time_with_offset() {
        let config = DisplayConfig {
            utc_offset_minutes: -330,
            color_scheme: ColorScheme::Dark,
        };
        assert_eq!(config.format_time(1_704_114_300_000), "07:35");
    }

    #[test]
    fn test_invalid_offset_falls_back_to_utc() {
        let config = DisplayConfig {
            utc_offset_minutes: 100_000,
            color_scheme: ColorScheme::Light,
        };
        assert_eq!(config.format_time(1_704_114_300_000), "13:05");
    }
}
