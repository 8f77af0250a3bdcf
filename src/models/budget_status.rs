use crate::models::settings::SettingsRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BudgetStatus {
    UnderBudget,
    OnTrack,
    OverBudget,
    Unknown, // projection unavailable
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationSeverity {
    Approaching,
    OverBudget,
}

impl SettingsRecord {
    /// Classify a projected end-of-period usage percentage against the thresholds.
    pub fn budget_status(&self, projected_percent: f32) -> BudgetStatus {
        if !projected_percent.is_finite() {
            BudgetStatus::Unknown
        } else if projected_percent < self.threshold_under_budget {
            BudgetStatus::UnderBudget
        } else if projected_percent <= self.threshold_on_track {
            BudgetStatus::OnTrack
        } else {
            BudgetStatus::OverBudget
        }
    }

    /// Which notification, if any, a projection warrants. Over budget wins.
    pub fn notification_severity(&self, projected_percent: f32) -> Option<NotificationSeverity> {
        if !self.notifications_enabled {
            return None;
        }
        if projected_percent >= self.notify_over_budget_percent {
            Some(NotificationSeverity::OverBudget)
        } else if projected_percent >= self.notify_approaching_percent {
            Some(NotificationSeverity::Approaching)
        } else {
            None
        }
    }
}

/// Remembers which notifications went out, so each quota is notified at most
/// once per severity per reset period.
///
/// Periods are identified by their reset timestamp (unix seconds).
#[derive(Debug, Default)]
pub struct NotificationState {
    last_sent: HashMap<(String, NotificationSeverity), i64>,
}

impl NotificationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn should_notify(&self, quota: &str, severity: NotificationSeverity, reset_at: i64) -> bool {
        self.last_sent
            .get(&(quota.to_string(), severity))
            .map_or(true, |&last| last != reset_at)
    }

    pub fn record(&mut self, quota: &str, severity: NotificationSeverity, reset_at: i64) {
        self.last_sent.insert((quota.to_string(), severity), reset_at);
    }

    /// The notification to send for `quota` now, if any, recording it as sent.
    pub fn check(
        &mut self,
        settings: &SettingsRecord,
        quota: &str,
        projected_percent: f32,
        reset_at: i64,
    ) -> Option<NotificationSeverity> {
        let severity = settings.notification_severity(projected_percent)?;
        if !self.should_notify(quota, severity, reset_at) {
            return None;
        }
        log::debug!("Notifying {quota}: {severity:?} at {projected_percent}%");
        self.record(quota, severity, reset_at);
        Some(severity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_against_default_thresholds() {
        let settings = SettingsRecord::default();
        assert_eq!(settings.budget_status(40.0), BudgetStatus::UnderBudget);
        assert_eq!(settings.budget_status(85.0), BudgetStatus::OnTrack);
        assert_eq!(settings.budget_status(115.0), BudgetStatus::OnTrack);
        assert_eq!(settings.budget_status(115.5), BudgetStatus::OverBudget);
        assert_eq!(settings.budget_status(f32::NAN), BudgetStatus::Unknown);
    }

    #[test]
    fn over_budget_notification_takes_priority() {
        let settings = SettingsRecord::default();
        assert_eq!(settings.notification_severity(99.0), None);
        assert_eq!(
            settings.notification_severity(100.0),
            Some(NotificationSeverity::Approaching)
        );
        assert_eq!(
            settings.notification_severity(130.0),
            Some(NotificationSeverity::OverBudget)
        );
    }

    #[test]
    fn disabled_notifications_never_fire() {
        let settings = SettingsRecord {
            notifications_enabled: false,
            ..SettingsRecord::default()
        };
        assert_eq!(settings.notification_severity(180.0), None);
    }

    #[test]
    fn notifies_once_per_reset_period() {
        let settings = SettingsRecord::default();
        let mut state = NotificationState::new();
        let reset_at = 1_700_000_000;

        assert_eq!(
            state.check(&settings, "session", 105.0, reset_at),
            Some(NotificationSeverity::Approaching)
        );
        assert_eq!(state.check(&settings, "session", 108.0, reset_at), None);
        assert_eq!(
            state.check(&settings, "session", 130.0, reset_at),
            Some(NotificationSeverity::OverBudget)
        );
        assert_eq!(
            state.check(&settings, "week", 105.0, reset_at),
            Some(NotificationSeverity::Approaching)
        );
        assert_eq!(
            state.check(&settings, "session", 105.0, reset_at + 5 * 3600),
            Some(NotificationSeverity::Approaching)
        );
    }

    #[test]
    fn disabled_notifications_are_not_recorded() {
        let settings = SettingsRecord {
            notifications_enabled: false,
            ..SettingsRecord::default()
        };
        let mut state = NotificationState::new();

        assert_eq!(state.check(&settings, "session", 150.0, 10), None);
        assert!(state.should_notify("session", NotificationSeverity::OverBudget, 10));
    }
}
