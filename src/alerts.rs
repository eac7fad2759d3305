//! Typed alerts, list filtering and ordering, and the locally simulated
//! resolve/ignore lifecycle.

use crate::models::{RawAlert, RecordId};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
    Unknown,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
            Priority::Unknown => "unknown",
        }
    }

    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
            Priority::Unknown => 0,
        }
    }

    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "high" => Priority::High,
            "medium" => Priority::Medium,
            "low" => Priority::Low,
            _ => Priority::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

impl Severity {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "critical" => Severity::Critical,
            "warning" => Severity::Warning,
            _ => Severity::Info,
        }
    }

    /// Priority implied by the severity when the backend sends no priority.
    pub fn implied_priority(self) -> Priority {
        match self {
            Severity::Critical => Priority::High,
            Severity::Warning => Priority::Medium,
            Severity::Info => Priority::Low,
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    Active,
    Resolved,
    Ignored,
}

impl AlertStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AlertStatus::Active => "active",
            AlertStatus::Resolved => "resolved",
            AlertStatus::Ignored => "ignored",
        }
    }

    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "resolved" | "closed" => AlertStatus::Resolved,
            "ignored" => AlertStatus::Ignored,
            // "open" and "acknowledged" are both still active.
            _ => AlertStatus::Active,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Capacity,
    Security,
    Maintenance,
    System,
    Sensor,
    Other,
}

impl AlertKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AlertKind::Capacity => "capacity",
            AlertKind::Security => "security",
            AlertKind::Maintenance => "maintenance",
            AlertKind::System => "system",
            AlertKind::Sensor => "sensor",
            AlertKind::Other => "other",
        }
    }

    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "capacity" => AlertKind::Capacity,
            "security" => AlertKind::Security,
            "maintenance" => AlertKind::Maintenance,
            "system" => AlertKind::System,
            "sensor" => AlertKind::Sensor,
            _ => AlertKind::Other,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AlertKind::Capacity => "Capacidade",
            AlertKind::Security => "Segurança",
            AlertKind::Maintenance => "Manutenção",
            AlertKind::System => "Sistema",
            AlertKind::Sensor => "Sensor",
            AlertKind::Other => "Outro",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            AlertKind::Capacity => "fa-users",
            AlertKind::Security => "fa-shield-alt",
            AlertKind::Maintenance => "fa-tools",
            AlertKind::System => "fa-server",
            AlertKind::Sensor => "fa-microchip",
            AlertKind::Other => "fa-exclamation-triangle",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub id: RecordId,
    pub kind: AlertKind,
    pub severity: Severity,
    pub priority: Priority,
    pub status: AlertStatus,
    pub title: Option<String>,
    pub message: Option<String>,
    pub area: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl From<RawAlert> for Alert {
    fn from(raw: RawAlert) -> Self {
        let severity = raw
            .severity
            .as_deref()
            .map(Severity::parse)
            .unwrap_or(Severity::Info);
        let priority = raw
            .priority
            .as_deref()
            .map(Priority::parse)
            .unwrap_or_else(|| severity.implied_priority());
        Alert {
            id: raw.id.unwrap_or_default(),
            kind: raw
                .kind
                .as_deref()
                .or(raw.alert_type.as_deref())
                .map(AlertKind::parse)
                .unwrap_or(AlertKind::Other),
            severity,
            priority,
            status: raw
                .status
                .as_deref()
                .map(AlertStatus::parse)
                .unwrap_or(AlertStatus::Active),
            title: raw.title,
            message: raw.message,
            area: raw.area,
            created_at: raw.created_at.or(raw.timestamp),
            resolved_at: raw.resolved_at,
        }
    }
}

/// One filter criterion: either everything or a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice<T> {
    All,
    Only(T),
}

impl<T: PartialEq> Choice<T> {
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Choice::All => true,
            Choice::Only(expected) => expected == value,
        }
    }
}

impl<T: Copy> Choice<T> {
    /// Query-string value for this choice, `all` when unrestricted.
    pub fn slug(&self, name: impl Fn(T) -> &'static str) -> &'static str {
        match self {
            Choice::All => "all",
            Choice::Only(value) => name(*value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterParseError {
    pub field: &'static str,
    pub value: String,
}

impl fmt::Display for FilterParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} filter: {:?}", self.field, self.value)
    }
}

impl std::error::Error for FilterParseError {}

fn parse_choice<T>(
    field: &'static str,
    raw: Option<&str>,
    default: Choice<T>,
    known: &[(&str, T)],
) -> Result<Choice<T>, FilterParseError>
where
    T: Copy,
{
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(default);
    };
    if raw.eq_ignore_ascii_case("all") {
        return Ok(Choice::All);
    }
    known
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(raw))
        .map(|(_, value)| Choice::Only(*value))
        .ok_or_else(|| FilterParseError {
            field,
            value: raw.to_string(),
        })
}

/// Conjunction of the three list filters. The page opens on active alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertFilter {
    pub kind: Choice<AlertKind>,
    pub priority: Choice<Priority>,
    pub status: Choice<AlertStatus>,
}

impl Default for AlertFilter {
    fn default() -> Self {
        Self {
            kind: Choice::All,
            priority: Choice::All,
            status: Choice::Only(AlertStatus::Active),
        }
    }
}

impl AlertFilter {
    pub fn unrestricted() -> Self {
        Self {
            kind: Choice::All,
            priority: Choice::All,
            status: Choice::All,
        }
    }

    /// Parses the raw `type`/`priority`/`status` values; absent values keep
    /// the page defaults.
    pub fn parse(
        kind: Option<&str>,
        priority: Option<&str>,
        status: Option<&str>,
    ) -> Result<Self, FilterParseError> {
        let defaults = Self::default();
        Ok(Self {
            kind: parse_choice(
                "type",
                kind,
                defaults.kind,
                &[
                    ("capacity", AlertKind::Capacity),
                    ("security", AlertKind::Security),
                    ("maintenance", AlertKind::Maintenance),
                    ("system", AlertKind::System),
                    ("sensor", AlertKind::Sensor),
                    ("other", AlertKind::Other),
                ],
            )?,
            priority: parse_choice(
                "priority",
                priority,
                defaults.priority,
                &[
                    ("high", Priority::High),
                    ("medium", Priority::Medium),
                    ("low", Priority::Low),
                ],
            )?,
            status: parse_choice(
                "status",
                status,
                defaults.status,
                &[
                    ("active", AlertStatus::Active),
                    ("resolved", AlertStatus::Resolved),
                    ("ignored", AlertStatus::Ignored),
                ],
            )?,
        })
    }

    pub fn matches(&self, alert: &Alert) -> bool {
        self.kind.admits(&alert.kind)
            && self.priority.admits(&alert.priority)
            && self.status.admits(&alert.status)
    }
}

/// Priority first (high to low), then newest first. Alerts without a
/// creation time sort after every dated alert of the same priority.
pub fn display_order(a: &Alert, b: &Alert) -> Ordering {
    b.priority
        .rank()
        .cmp(&a.priority.rank())
        .then_with(|| b.created_at.cmp(&a.created_at))
}

pub fn filter_and_sort(alerts: &[Alert], filter: &AlertFilter) -> Vec<Alert> {
    let mut selected: Vec<Alert> = alerts
        .iter()
        .filter(|alert| filter.matches(alert))
        .cloned()
        .collect();
    selected.sort_by(display_order);
    selected
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AlertSummary {
    pub total: usize,
    pub high_priority: usize,
    pub active: usize,
    pub resolved_today: usize,
}

/// Summary cards count the whole snapshot, not the filtered list.
pub fn summarize<Tz: TimeZone>(alerts: &[Alert], today: NaiveDate, tz: &Tz) -> AlertSummary {
    AlertSummary {
        total: alerts.len(),
        high_priority: alerts
            .iter()
            .filter(|a| a.priority == Priority::High)
            .count(),
        active: alerts
            .iter()
            .filter(|a| a.status == AlertStatus::Active)
            .count(),
        resolved_today: alerts
            .iter()
            .filter(|a| a.status == AlertStatus::Resolved)
            .filter(|a| {
                a.resolved_at
                    .is_some_and(|at| at.with_timezone(tz).date_naive() == today)
            })
            .count(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Resolve,
    Ignore,
}

impl FromStr for Action {
    type Err = ();

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "resolve" => Ok(Action::Resolve),
            "ignore" => Ok(Action::Ignore),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    UnknownAlert(RecordId),
    NotActive(RecordId),
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionError::UnknownAlert(id) => write!(f, "alert {id} not found"),
            ActionError::NotActive(id) => write!(f, "alert {id} is not active"),
        }
    }
}

impl std::error::Error for ActionError {}

/// Resolve/ignore decisions taken on this dashboard. The backend has no
/// mutation endpoint, so transitions are kept here and laid over every
/// fresh snapshot.
#[derive(Debug, Clone, Default)]
pub struct AlertBoard {
    transitions: HashMap<RecordId, (AlertStatus, DateTime<Utc>)>,
}

impl AlertBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Forgets decisions the backend has caught up with: the alert is gone
    /// from `alerts` or no longer reported as active.
    pub fn prune(&mut self, alerts: &[Alert]) {
        self.transitions.retain(|id, _| {
            alerts
                .iter()
                .any(|alert| &alert.id == id && alert.status == AlertStatus::Active)
        });
    }

    /// Lays local decisions over alerts the backend still reports as active.
    /// Any other backend status is left as reported.
    pub fn overlay(&self, alerts: &mut [Alert]) {
        for alert in alerts
            .iter_mut()
            .filter(|alert| alert.status == AlertStatus::Active)
        {
            if let Some((status, at)) = self.transitions.get(&alert.id) {
                alert.status = *status;
                if *status == AlertStatus::Resolved {
                    alert.resolved_at = Some(*at);
                }
            }
        }
    }

    /// Applies `action` to the alert with `id` in `alerts` (already
    /// overlaid) and returns its new state.
    pub fn apply(
        &mut self,
        alerts: &mut [Alert],
        id: &RecordId,
        action: Action,
        now: DateTime<Utc>,
    ) -> Result<Alert, ActionError> {
        let alert = alerts
            .iter_mut()
            .find(|alert| &alert.id == id)
            .ok_or_else(|| ActionError::UnknownAlert(id.clone()))?;
        if alert.status != AlertStatus::Active {
            return Err(ActionError::NotActive(id.clone()));
        }
        let status = match action {
            Action::Resolve => AlertStatus::Resolved,
            Action::Ignore => AlertStatus::Ignored,
        };
        self.transitions.insert(id.clone(), (status, now));
        alert.status = status;
        if status == AlertStatus::Resolved {
            alert.resolved_at = Some(now);
        }
        Ok(alert.clone())
    }
}
