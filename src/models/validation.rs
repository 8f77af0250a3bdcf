use crate::models::settings::SettingsRecord;
use serde::Serialize;
use std::fmt;
use std::ops::RangeInclusive;
use thiserror::Error;

const UNDER_BUDGET_RANGE: RangeInclusive<f32> = 1.0..=99.0;
const ON_TRACK_RANGE: RangeInclusive<f32> = 2.0..=200.0;
const NOTIFY_RANGE: RangeInclusive<f32> = 1.0..=200.0;
const MIN_REFRESH_INTERVAL_MINUTES: u64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationRule {
    UnderBudgetRange,
    OnTrackRange,
    ThresholdOrdering,
    ApproachingRange,
    OverBudgetRange,
    NotifyOrdering,
    RefreshInterval,
    /// The store refused the write; not a property of the record itself.
    Persistence,
}

impl ValidationRule {
    pub fn message(self) -> &'static str {
        match self {
            ValidationRule::UnderBudgetRange => "Under budget threshold must be between 1 and 99",
            ValidationRule::OnTrackRange => "On track threshold must be between 2 and 200",
            ValidationRule::ThresholdOrdering => {
                "Under budget must be less than on track threshold"
            }
            ValidationRule::ApproachingRange => {
                "Approaching notification must be between 1 and 200"
            }
            ValidationRule::OverBudgetRange => "Over budget notification must be between 1 and 200",
            ValidationRule::NotifyOrdering => {
                "Over budget notification must be >= approaching notification"
            }
            ValidationRule::RefreshInterval => "Refresh interval must be at least 1 minute",
            ValidationRule::Persistence => "Failed to save settings",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub rule: ValidationRule,
    pub message: String,
}

impl ValidationError {
    fn violated(rule: ValidationRule) -> Self {
        Self {
            rule,
            message: rule.message().to_string(),
        }
    }

    pub fn persistence(reason: impl fmt::Display) -> Self {
        let rule = ValidationRule::Persistence;
        Self {
            rule,
            message: format!("{}: {reason}", rule.message()),
        }
    }
}

/// Evaluate every rule against `record`, returning violations in rule order.
///
/// Notification percentages are checked even when notifications are disabled.
/// NaN never satisfies a range check, so unparsable form input is reported.
pub fn validate(record: &SettingsRecord) -> Vec<ValidationError> {
    let checks = [
        (
            ValidationRule::UnderBudgetRange,
            !UNDER_BUDGET_RANGE.contains(&record.threshold_under_budget),
        ),
        (
            ValidationRule::OnTrackRange,
            !ON_TRACK_RANGE.contains(&record.threshold_on_track),
        ),
        (
            ValidationRule::ThresholdOrdering,
            record.threshold_under_budget >= record.threshold_on_track,
        ),
        (
            ValidationRule::ApproachingRange,
            !NOTIFY_RANGE.contains(&record.notify_approaching_percent),
        ),
        (
            ValidationRule::OverBudgetRange,
            !NOTIFY_RANGE.contains(&record.notify_over_budget_percent),
        ),
        (
            ValidationRule::NotifyOrdering,
            record.notify_over_budget_percent < record.notify_approaching_percent,
        ),
        (
            ValidationRule::RefreshInterval,
            record.refresh_interval_minutes < MIN_REFRESH_INTERVAL_MINUTES,
        ),
    ];

    checks
        .into_iter()
        .filter(|(_, violated)| *violated)
        .map(|(rule, _)| ValidationError::violated(rule))
        .collect()
}

pub fn messages(errors: &[ValidationError]) -> Vec<String> {
    errors.iter().map(|e| e.message.clone()).collect()
}
