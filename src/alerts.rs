//! Alert matching and tone resolution.
//!
//! Gauges carry alert definitions as configuration. At render time the current
//! reading is matched against them and the matches decide the gauge tone:
//!
//! | Matched alerts            | Threshold breached | Tone      |
//! |---------------------------|--------------------|-----------|
//! | any `critical`            | -                  | `Danger`  |
//! | any `warning`             | -                  | `Warning` |
//! | only `info` / none        | yes                | `Warning` |
//! | only `info` / none        | no                 | `Accent`  |
//!
//! # Value vs Heading Alerts
//!
//! Value alerts are thresholds: every alert at or below the reading is active,
//! reported highest threshold first. Heading alerts are windows around a
//! bearing: every alert within the angular tolerance is active, reported in
//! configuration order.

use serde::{Deserialize, Serialize};

use crate::geometry::angular_distance_deg;

/// Default half-width of a heading alert window, in degrees.
pub const DEFAULT_HEADING_TOLERANCE: f64 = 8.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Info,
    Warning,
    Critical,
}

/// Visual emphasis of a gauge, mapped to palette colors by the renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Tone {
    #[default]
    Accent,
    Warning,
    Danger,
}

/// Common view over value and heading alerts.
pub trait GaugeAlert {
    fn id(&self) -> &str;
    fn message(&self) -> &str;
    fn severity(&self) -> AlertSeverity;
}

/// Alert raised once the reading reaches `value`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValueAlert {
    pub id: String,
    pub value: f64,
    pub message: String,
    pub severity: AlertSeverity,
}

/// Alert raised while the heading is near `heading` (degrees).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeadingAlert {
    pub id: String,
    pub heading: f64,
    pub message: String,
    pub severity: AlertSeverity,
}

impl GaugeAlert for ValueAlert {
    fn id(&self) -> &str { &self.id }

    fn message(&self) -> &str { &self.message }

    fn severity(&self) -> AlertSeverity { self.severity }
}

impl GaugeAlert for HeadingAlert {
    fn id(&self) -> &str { &self.id }

    fn message(&self) -> &str { &self.message }

    fn severity(&self) -> AlertSeverity { self.severity }
}

/// Owned summary of a matched alert, reported in render results.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveAlert {
    pub id: String,
    pub message: String,
    pub severity: AlertSeverity,
}

impl ActiveAlert {
    pub fn from_alert<A: GaugeAlert + ?Sized>(alert: &A) -> Self {
        Self { id: alert.id().to_owned(), message: alert.message().to_owned(), severity: alert.severity() }
    }
}

/// Tone for a set of matched alerts.
pub fn resolve_gauge_tone_from_alerts<'a, A>(
    alerts: impl IntoIterator<Item = &'a A>,
    threshold_breached: bool,
) -> Tone
where
    A: GaugeAlert + 'a + ?Sized,
{
    let mut warning = threshold_breached;
    for alert in alerts {
        match alert.severity() {
            AlertSeverity::Critical => return Tone::Danger,
            AlertSeverity::Warning => warning = true,
            AlertSeverity::Info => {}
        }
    }
    if warning { Tone::Warning } else { Tone::Accent }
}

/// Value alerts whose threshold is at or below `value`, highest first.
///
/// Ties keep configuration order. Alerts with a non-finite threshold never
/// match.
pub fn resolve_gauge_value_alerts<'a>(
    value: f64,
    alerts: &'a [ValueAlert],
) -> Vec<&'a ValueAlert> {
    let mut matched: Vec<&ValueAlert> =
        alerts.iter().filter(|a| a.value.is_finite() && a.value <= value).collect();
    // sort_by is stable
    matched.sort_by(|a, b| b.value.total_cmp(&a.value));
    matched
}

/// Heading alerts within `tolerance` degrees of `heading`, in list order.
pub fn resolve_gauge_heading_alerts<'a>(
    heading: f64,
    alerts: &'a [HeadingAlert],
    tolerance: f64,
) -> Vec<&'a HeadingAlert> {
    alerts
        .iter()
        .filter(|a| a.heading.is_finite() && angular_distance_deg(heading, a.heading) <= tolerance)
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn value_alert(
        id: &str,
        value: f64,
        severity: AlertSeverity,
    ) -> ValueAlert {
        ValueAlert { id: id.into(), value, message: format!("{id} reached"), severity }
    }

    fn heading_alert(
        id: &str,
        heading: f64,
    ) -> HeadingAlert {
        HeadingAlert { id: id.into(), heading, message: String::new(), severity: AlertSeverity::Info }
    }

    // -------------------------------------------------------------------------
    // Tone Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_tone_warning_from_warning_alert() {
        let alerts = [value_alert("hot", 90.0, AlertSeverity::Warning)];
        assert_eq!(resolve_gauge_tone_from_alerts(&alerts, false), Tone::Warning);
    }

    #[test]
    fn test_tone_danger_wins_over_warning() {
        let alerts =
            [value_alert("hot", 90.0, AlertSeverity::Warning), value_alert("boil", 110.0, AlertSeverity::Critical)];
        assert_eq!(resolve_gauge_tone_from_alerts(&alerts, false), Tone::Danger);
    }

    #[test]
    fn test_tone_from_threshold_only() {
        let none: [ValueAlert; 0] = [];
        assert_eq!(resolve_gauge_tone_from_alerts(&none, true), Tone::Warning);
        assert_eq!(resolve_gauge_tone_from_alerts(&none, false), Tone::Accent);

        let info = [value_alert("note", 1.0, AlertSeverity::Info)];
        assert_eq!(resolve_gauge_tone_from_alerts(&info, false), Tone::Accent, "info alone stays accent");
    }

    #[test]
    fn test_tone_accepts_matched_references() {
        let alerts = [value_alert("a", 10.0, AlertSeverity::Critical)];
        let matched = resolve_gauge_value_alerts(20.0, &alerts);
        assert_eq!(resolve_gauge_tone_from_alerts(matched.iter().copied(), false), Tone::Danger);
    }

    // -------------------------------------------------------------------------
    // Value Alert Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_value_alerts_sorted_descending_stable() {
        let alerts = [
            value_alert("low", 10.0, AlertSeverity::Info),
            value_alert("high", 50.0, AlertSeverity::Critical),
            value_alert("mid-a", 30.0, AlertSeverity::Warning),
            value_alert("mid-b", 30.0, AlertSeverity::Warning),
            value_alert("above", 80.0, AlertSeverity::Critical),
        ];
        let ids: Vec<&str> = resolve_gauge_value_alerts(60.0, &alerts).iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["high", "mid-a", "mid-b", "low"]);
    }

    #[test]
    fn test_value_alert_boundary_is_inclusive() {
        let alerts = [value_alert("edge", 42.0, AlertSeverity::Warning)];
        assert_eq!(resolve_gauge_value_alerts(42.0, &alerts).len(), 1);
        assert!(resolve_gauge_value_alerts(41.9, &alerts).is_empty());
    }

    #[test]
    fn test_value_alert_non_finite_threshold_never_matches() {
        let alerts = [value_alert("nan", f64::NAN, AlertSeverity::Critical)];
        assert!(resolve_gauge_value_alerts(1e9, &alerts).is_empty());
    }

    // -------------------------------------------------------------------------
    // Heading Alert Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_heading_alerts_wrap_around_north() {
        let alerts = [heading_alert("north", 0.0), heading_alert("east", 90.0), heading_alert("n-ish", 355.0)];
        let ids: Vec<&str> =
            resolve_gauge_heading_alerts(358.0, &alerts, DEFAULT_HEADING_TOLERANCE).iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["north", "n-ish"], "list order, wrap-aware");
    }

    #[test]
    fn test_heading_tolerance_edge() {
        let alerts = [heading_alert("east", 90.0)];
        assert_eq!(resolve_gauge_heading_alerts(98.0, &alerts, 8.0).len(), 1);
        assert!(resolve_gauge_heading_alerts(98.5, &alerts, 8.0).is_empty());
    }

    #[test]
    fn test_severity_serde_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            alerts: Vec<ValueAlert>,
        }
        let parsed: Wrapper = toml::from_str(
            r#"
            [[alerts]]
            id = "boil"
            value = 110.0
            message = "Coolant boiling"
            severity = "critical"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.alerts[0].severity, AlertSeverity::Critical);
    }
}
