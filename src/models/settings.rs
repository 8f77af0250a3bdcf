use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default settings values
pub mod defaults {
    pub const REFRESH_INTERVAL_MINUTES: u64 = 15;
    pub const THRESHOLD_UNDER_BUDGET: f32 = 85.0;
    pub const THRESHOLD_ON_TRACK: f32 = 115.0;
    pub const NOTIFICATIONS_ENABLED: bool = true;
    pub const NOTIFY_APPROACHING_PERCENT: f32 = 100.0;
    pub const NOTIFY_OVER_BUDGET_PERCENT: f32 = 115.0;
}

/// The persisted settings record. Field names are the on-disk / IPC contract.
///
/// Keys missing from an IPC payload fall back to their individual defaults;
/// persisted files go through [`SettingsRecord::from_value`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsRecord {
    pub refresh_interval_minutes: u64,
    pub threshold_under_budget: f32,
    pub threshold_on_track: f32,
    pub notifications_enabled: bool,
    pub notify_approaching_percent: f32,
    pub notify_over_budget_percent: f32,
}

impl Default for SettingsRecord {
    fn default() -> Self {
        Self {
            refresh_interval_minutes: defaults::REFRESH_INTERVAL_MINUTES,
            threshold_under_budget: defaults::THRESHOLD_UNDER_BUDGET,
            threshold_on_track: defaults::THRESHOLD_ON_TRACK,
            notifications_enabled: defaults::NOTIFICATIONS_ENABLED,
            notify_approaching_percent: defaults::NOTIFY_APPROACHING_PERCENT,
            notify_over_budget_percent: defaults::NOTIFY_OVER_BUDGET_PERCENT,
        }
    }
}

/// One editable field of [`SettingsRecord`], addressed by its wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingsField {
    RefreshIntervalMinutes,
    ThresholdUnderBudget,
    ThresholdOnTrack,
    NotificationsEnabled,
    NotifyApproachingPercent,
    NotifyOverBudgetPercent,
}

impl SettingsField {
    pub const ALL: [SettingsField; 6] = [
        SettingsField::RefreshIntervalMinutes,
        SettingsField::ThresholdUnderBudget,
        SettingsField::ThresholdOnTrack,
        SettingsField::NotificationsEnabled,
        SettingsField::NotifyApproachingPercent,
        SettingsField::NotifyOverBudgetPercent,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SettingsField::RefreshIntervalMinutes => "refresh_interval_minutes",
            SettingsField::ThresholdUnderBudget => "threshold_under_budget",
            SettingsField::ThresholdOnTrack => "threshold_on_track",
            SettingsField::NotificationsEnabled => "notifications_enabled",
            SettingsField::NotifyApproachingPercent => "notify_approaching_percent",
            SettingsField::NotifyOverBudgetPercent => "notify_over_budget_percent",
        }
    }

    /// Fields greyed out (but still validated) when notifications are off.
    pub fn is_notification_field(self) -> bool {
        matches!(
            self,
            SettingsField::NotifyApproachingPercent | SettingsField::NotifyOverBudgetPercent
        )
    }
}

impl fmt::Display for SettingsField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown settings field: {0}")]
pub struct UnknownField(pub String);

impl FromStr for SettingsField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SettingsField::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

impl SettingsRecord {
    /// Build a record from a persisted JSON object, key by key.
    ///
    /// A missing or wrongly typed key falls back to its own default; the
    /// remaining keys are kept.
    pub fn from_value(value: &Value) -> Self {
        let defaults = Self::default();
        Self {
            refresh_interval_minutes: read_key(
                value,
                SettingsField::RefreshIntervalMinutes,
                Value::as_u64,
                defaults.refresh_interval_minutes,
            ),
            threshold_under_budget: read_key(
                value,
                SettingsField::ThresholdUnderBudget,
                as_f32,
                defaults.threshold_under_budget,
            ),
            threshold_on_track: read_key(
                value,
                SettingsField::ThresholdOnTrack,
                as_f32,
                defaults.threshold_on_track,
            ),
            notifications_enabled: read_key(
                value,
                SettingsField::NotificationsEnabled,
                Value::as_bool,
                defaults.notifications_enabled,
            ),
            notify_approaching_percent: read_key(
                value,
                SettingsField::NotifyApproachingPercent,
                as_f32,
                defaults.notify_approaching_percent,
            ),
            notify_over_budget_percent: read_key(
                value,
                SettingsField::NotifyOverBudgetPercent,
                as_f32,
                defaults.notify_over_budget_percent,
            ),
        }
    }

    /// Parse `raw` according to the field's type and store it.
    ///
    /// Both numeric parsers keep a leading number ("30 min" -> 30, "72.5%" -> 72.5).
    /// Never fails: unparsable integers become `0`, unparsable floats become NaN.
    /// Both are rejected later by validation.
    pub fn apply_raw(&mut self, field: SettingsField, raw: &str) {
        match field {
            SettingsField::RefreshIntervalMinutes => {
                self.refresh_interval_minutes = parse_leading_int(raw)
            }
            SettingsField::ThresholdUnderBudget => self.threshold_under_budget = parse_float(raw),
            SettingsField::ThresholdOnTrack => self.threshold_on_track = parse_float(raw),
            SettingsField::NotificationsEnabled => self.notifications_enabled = parse_bool(raw),
            SettingsField::NotifyApproachingPercent => {
                self.notify_approaching_percent = parse_float(raw)
            }
            SettingsField::NotifyOverBudgetPercent => {
                self.notify_over_budget_percent = parse_float(raw)
            }
        }
    }
}

fn read_key<T>(
    value: &Value,
    field: SettingsField,
    extract: fn(&Value) -> Option<T>,
    default: T,
) -> T {
    match value.get(field.name()) {
        None => default,
        Some(raw) => extract(raw).unwrap_or_else(|| {
            log::warn!("Ignoring persisted {field} = {raw}, using default");
            default
        }),
    }
}

fn as_f32(value: &Value) -> Option<f32> {
    value.as_f64().map(|v| v as f32)
}

fn parse_leading_int(raw: &str) -> u64 {
    let trimmed = raw.trim();
    let digits: String = trimmed
        .strip_prefix('+')
        .unwrap_or(trimmed)
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().unwrap_or_else(|_| {
        log::debug!("Unparsable integer input {raw:?}, storing 0");
        0
    })
}

fn parse_float(raw: &str) -> f32 {
    let trimmed = raw.trim();
    // Longest prefix that reads as a number.
    (1..=trimmed.len())
        .rev()
        .filter(|&end| trimmed.is_char_boundary(end))
        .find_map(|end| trimmed[..end].parse::<f32>().ok())
        .unwrap_or_else(|| {
            log::debug!("Unparsable numeric input {raw:?}, storing NaN");
            f32::NAN
        })
}

fn parse_bool(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "on" | "1" | "yes" | "checked"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names_round_trip_through_from_str() {
        for field in SettingsField::ALL {
            assert_eq!(field.name().parse::<SettingsField>(), Ok(field));
        }
        assert!("refreshInterval".parse::<SettingsField>().is_err());
    }

    #[test]
    fn apply_raw_parses_each_field_type() {
        let mut record = SettingsRecord::default();
        record.apply_raw(SettingsField::RefreshIntervalMinutes, " 30 ");
        record.apply_raw(SettingsField::ThresholdUnderBudget, "72.5");
        record.apply_raw(SettingsField::NotificationsEnabled, "false");

        assert_eq!(record.refresh_interval_minutes, 30);
        assert_eq!(record.threshold_under_budget, 72.5);
        assert!(!record.notifications_enabled);
    }

    #[test]
    fn unparsable_input_stores_sentinels() {
        let mut record = SettingsRecord::default();
        record.apply_raw(SettingsField::RefreshIntervalMinutes, "soon");
        record.apply_raw(SettingsField::ThresholdOnTrack, "abc");

        assert_eq!(record.refresh_interval_minutes, 0);
        assert!(record.threshold_on_track.is_nan());
    }

    #[test]
    fn integer_input_keeps_leading_digits() {
        let mut record = SettingsRecord::default();
        record.apply_raw(SettingsField::RefreshIntervalMinutes, "45.9");
        assert_eq!(record.refresh_interval_minutes, 45);
    }

    #[test]
    fn float_input_keeps_leading_number_like_integer_input() {
        let mut record = SettingsRecord::default();
        record.apply_raw(SettingsField::ThresholdUnderBudget, "72abc");
        record.apply_raw(SettingsField::RefreshIntervalMinutes, "30abc");
        record.apply_raw(SettingsField::NotifyApproachingPercent, "99.5 %");

        assert_eq!(record.threshold_under_budget, 72.0);
        assert_eq!(record.refresh_interval_minutes, 30);
        assert_eq!(record.notify_approaching_percent, 99.5);
    }

    #[test]
    fn wrongly_typed_key_keeps_the_other_persisted_values() {
        let record = SettingsRecord::from_value(&serde_json::json!({
            "refresh_interval_minutes": "30",
            "threshold_under_budget": 70,
            "threshold_on_track": 150,
            "notifications_enabled": "yes",
            "notify_approaching_percent": 90,
            "notify_over_budget_percent": 120
        }));

        assert_eq!(
            record.refresh_interval_minutes,
            defaults::REFRESH_INTERVAL_MINUTES
        );
        assert_eq!(record.notifications_enabled, defaults::NOTIFICATIONS_ENABLED);
        assert_eq!(record.threshold_under_budget, 70.0);
        assert_eq!(record.threshold_on_track, 150.0);
        assert_eq!(record.notify_approaching_percent, 90.0);
        assert_eq!(record.notify_over_budget_percent, 120.0);
    }

    #[test]
    fn missing_keys_fall_back_individually() {
        let record =
            SettingsRecord::from_value(&serde_json::json!({ "threshold_under_budget": 70 }));
        assert_eq!(record.threshold_under_budget, 70.0);
        assert_eq!(record.threshold_on_track, defaults::THRESHOLD_ON_TRACK);
        assert_eq!(
            record.refresh_interval_minutes,
            defaults::REFRESH_INTERVAL_MINUTES
        );
    }
}
