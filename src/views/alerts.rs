use crate::alerts::{
    self, Action, ActionError, Alert, AlertBoard, AlertFilter, AlertKind, AlertStatus,
    AlertSummary, Priority, Severity,
};
use crate::charts::{self, ChartSlot};
use crate::fetcher::{ApiClient, Resource};
use crate::format;
use crate::models::{ActiveAlerts, RecordId};
use crate::scheduler::Refresh;
use crate::views::{Badge, Clock, Rendered, Section};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertsView {
    pub filter: FilterState,
    pub summary: Section<AlertSummary>,
    pub list: Section<AlertList>,
}

/// The filter values the page was rendered with, as query-string values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterState {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub priority: &'static str,
    pub status: &'static str,
}

impl From<&AlertFilter> for FilterState {
    fn from(filter: &AlertFilter) -> Self {
        Self {
            kind: filter.kind.slug(AlertKind::as_str),
            priority: filter.priority.slug(Priority::as_str),
            status: filter.status.slug(AlertStatus::as_str),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AlertList {
    Empty { title: String, message: String },
    Items { items: Vec<AlertCard> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertCard {
    pub id: String,
    pub type_label: &'static str,
    pub type_icon: &'static str,
    pub priority_class: &'static str,
    pub priority: Badge,
    pub status: Badge,
    pub status_class: &'static str,
    pub title: String,
    pub message: String,
    pub area: Option<String>,
    pub age: String,
    pub actionable: bool,
}

fn priority_badge(priority: Priority) -> (&'static str, Badge) {
    match priority {
        Priority::High => ("priority-high", Badge::new("Alta", "badge-danger", "")),
        Priority::Medium => ("priority-medium", Badge::new("Média", "badge-warning", "")),
        Priority::Low | Priority::Unknown => {
            ("priority-low", Badge::new("Baixa", "badge-info", ""))
        }
    }
}

fn status_badge(status: AlertStatus) -> Badge {
    match status {
        AlertStatus::Active => Badge::new("Ativo", "badge-danger", ""),
        AlertStatus::Resolved => Badge::new("Resolvido", "badge-success", ""),
        AlertStatus::Ignored => Badge::new("Ignorado", "badge-secondary", ""),
    }
}

pub fn card(alert: &Alert, now: DateTime<Utc>) -> AlertCard {
    let (priority_class, priority) = priority_badge(alert.priority);
    AlertCard {
        id: alert.id.to_string(),
        type_label: alert.kind.label(),
        type_icon: alert.kind.icon(),
        priority_class,
        priority,
        status: status_badge(alert.status),
        status_class: alert.status.as_str(),
        title: alert
            .title
            .clone()
            .unwrap_or_else(|| "Sem título".to_string()),
        message: alert
            .message
            .clone()
            .unwrap_or_else(|| "Sem descrição".to_string()),
        area: alert.area.clone(),
        age: format::relative_age(alert.created_at.as_ref(), now),
        actionable: alert.status == AlertStatus::Active,
    }
}

/// Filtered and ordered list. An empty result is an explicit state, never a
/// blank list.
pub fn list(alerts: &[Alert], filter: &AlertFilter, now: DateTime<Utc>) -> AlertList {
    let selected = alerts::filter_and_sort(alerts, filter);
    if selected.is_empty() {
        return AlertList::Empty {
            title: "Nenhum alerta encontrado".to_string(),
            message: "Todos os sistemas estão funcionando normalmente".to_string(),
        };
    }
    AlertList::Items {
        items: selected.iter().map(|alert| card(alert, now)).collect(),
    }
}

fn severity_counts(alerts: &[Alert]) -> [usize; 3] {
    let count = |severity: Severity| alerts.iter().filter(|a| a.severity == severity).count();
    [
        count(Severity::Critical),
        count(Severity::Warning),
        count(Severity::Info),
    ]
}

pub fn render(
    snapshot: &Section<Vec<Alert>>,
    filter: &AlertFilter,
    clock: &Clock,
) -> Rendered<AlertsView> {
    let today = clock.now.with_timezone(&clock.offset).date_naive();
    let (summary, list, counts) = match snapshot {
        Section::Loading => (Section::Loading, Section::Loading, None),
        Section::NoData => (Section::NoData, Section::NoData, None),
        Section::Ready(alerts) => (
            Section::Ready(alerts::summarize(alerts, today, &clock.offset)),
            Section::Ready(list(alerts, filter, clock.now)),
            Some(severity_counts(alerts)),
        ),
    };
    Rendered {
        view: AlertsView {
            filter: FilterState::from(filter),
            summary,
            list,
        },
        charts: vec![ChartSlot::new(
            "alertsByTypeChart",
            charts::alerts_by_type(counts),
        )],
    }
}

#[derive(Debug)]
struct AlertsState {
    snapshot: Section<Vec<Alert>>,
    board: AlertBoard,
}

/// The alerts page keeps the typed snapshot rather than a rendered view: the
/// list depends on the filter each reader asks for, and resolve/ignore
/// decisions are laid over every new snapshot.
pub struct AlertsPage {
    api: ApiClient,
    state: RwLock<AlertsState>,
}

impl AlertsPage {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: RwLock::new(AlertsState {
                snapshot: Section::Loading,
                board: AlertBoard::new(),
            }),
        }
    }

    pub async fn view(&self, filter: &AlertFilter, clock: &Clock) -> Rendered<AlertsView> {
        let state = self.state.read().await;
        render(&state.snapshot, filter, clock)
    }

    /// Filtered, ordered alerts, or `None` while there is no snapshot.
    pub async fn alerts(&self, filter: &AlertFilter) -> Option<Vec<Alert>> {
        let state = self.state.read().await;
        state
            .snapshot
            .ready()
            .map(|alerts| alerts::filter_and_sort(alerts, filter))
    }

    pub async fn resolve(&self, id: &RecordId, now: DateTime<Utc>) -> Result<Alert, ActionError> {
        self.act(id, Action::Resolve, now).await
    }

    pub async fn ignore(&self, id: &RecordId, now: DateTime<Utc>) -> Result<Alert, ActionError> {
        self.act(id, Action::Ignore, now).await
    }

    pub async fn act(
        &self,
        id: &RecordId,
        action: Action,
        now: DateTime<Utc>,
    ) -> Result<Alert, ActionError> {
        let mut state = self.state.write().await;
        let AlertsState { snapshot, board } = &mut *state;
        let Section::Ready(alerts) = snapshot else {
            return Err(ActionError::UnknownAlert(id.clone()));
        };
        let alert = board.apply(alerts, id, action, now)?;
        info!(alert = %id, action = ?action, "alert transition recorded");
        Ok(alert)
    }

    /// Replaces the snapshot, keeping earlier resolve/ignore decisions.
    pub async fn store(&self, snapshot: Option<ActiveAlerts>) {
        let alerts: Option<Vec<Alert>> = snapshot
            .and_then(|snapshot| snapshot.alerts)
            .map(|raw| raw.into_iter().map(Alert::from).collect());
        let mut state = self.state.write().await;
        let snapshot = match alerts {
            Some(mut alerts) => {
                state.board.prune(&alerts);
                state.board.overlay(&mut alerts);
                Section::Ready(alerts)
            }
            None => Section::NoData,
        };
        state.snapshot = snapshot;
    }
}

impl Refresh for AlertsPage {
    fn name(&self) -> &'static str {
        "alerts"
    }

    async fn refresh(&self) {
        let snapshot = self.api.fetch::<ActiveAlerts>(Resource::ActiveAlerts).await;
        self.store(snapshot).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_timestamp;
    use chrono::TimeZone;
    use serde_json::json;

    fn clock() -> Clock {
        Clock::utc(Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap())
    }

    fn snapshot() -> ActiveAlerts {
        serde_json::from_value(json!({
            "total": 4,
            "alerts": [
                {"id": 1, "type": "capacity", "priority": "low", "status": "active",
                 "created_at": "2026-10-17T08:00:00"},
                {"id": 2, "type": "security", "priority": "high", "status": "active",
                 "created_at": "2026-10-17T09:00:00", "area": "Portaria"},
                {"id": 3, "type": "system", "priority": "medium", "status": "active",
                 "created_at": "2026-10-17T10:00:00"},
                {"id": 4, "type": "capacity", "priority": "high", "status": "resolved",
                 "created_at": "2026-10-17T11:00:00", "resolved_at": "2026-10-17T11:30:00"}
            ]
        }))
        .unwrap()
    }

    fn page() -> AlertsPage {
        AlertsPage::new(ApiClient::new("http://127.0.0.1:9"))
    }

    fn ids(view: &Rendered<AlertsView>) -> Vec<String> {
        match view.view.list.ready() {
            Some(AlertList::Items { items }) => items.iter().map(|c| c.id.clone()).collect(),
            _ => Vec::new(),
        }
    }

    #[tokio::test]
    async fn default_view_lists_active_alerts_by_priority() {
        let page = page();
        page.store(Some(snapshot())).await;
        let view = page.view(&AlertFilter::default(), &clock()).await;
        assert_eq!(ids(&view), ["2", "3", "1"]);
        assert_eq!(
            view.view.summary.ready().copied(),
            Some(AlertSummary {
                total: 4,
                high_priority: 2,
                active: 3,
                resolved_today: 1,
            })
        );
        assert_eq!(view.view.filter.status, "active");
        assert_eq!(view.view.filter.kind, "all");
    }

    #[tokio::test]
    async fn resolve_survives_the_next_snapshot() {
        let page = page();
        page.store(Some(snapshot())).await;
        let resolved = page.resolve(&RecordId::from("2"), clock().now).await.unwrap();
        assert_eq!(resolved.status, AlertStatus::Resolved);

        page.store(Some(snapshot())).await;
        let view = page.view(&AlertFilter::default(), &clock()).await;
        assert_eq!(ids(&view), ["3", "1"]);
        assert_eq!(
            page.ignore(&RecordId::from("2"), clock().now).await,
            Err(ActionError::NotActive(RecordId::from("2")))
        );
        assert_eq!(
            page.ignore(&RecordId::from("99"), clock().now).await,
            Err(ActionError::UnknownAlert(RecordId::from("99")))
        );
    }

    #[tokio::test]
    async fn backend_resolution_replaces_a_local_ignore() {
        let page = page();
        page.store(Some(snapshot())).await;
        page.ignore(&RecordId::from("1"), clock().now).await.unwrap();

        let mut closed = snapshot();
        if let Some(alerts) = closed.alerts.as_mut() {
            alerts[0].status = Some("resolved".to_string());
            alerts[0].resolved_at = parse_timestamp("2026-10-17T11:45:00");
        }
        page.store(Some(closed)).await;

        let resolved = page
            .alerts(&AlertFilter::parse(None, None, Some("resolved")).unwrap())
            .await
            .unwrap();
        let first = resolved.iter().find(|alert| alert.id.0 == "1").unwrap();
        assert_eq!(first.status, AlertStatus::Resolved);
        assert_eq!(first.resolved_at, parse_timestamp("2026-10-17T11:45:00"));

        // The backend reopening it does not bring the old decision back.
        page.store(Some(snapshot())).await;
        let active = page.alerts(&AlertFilter::default()).await.unwrap();
        assert!(active.iter().any(|alert| alert.id.0 == "1"));
    }

    #[tokio::test]
    async fn filtering_down_to_nothing_shows_the_empty_state() {
        let page = page();
        page.store(Some(snapshot())).await;
        let filter = AlertFilter::parse(Some("maintenance"), None, None).unwrap();
        let view = page.view(&filter, &clock()).await;
        assert!(matches!(
            view.view.list.ready(),
            Some(AlertList::Empty { .. })
        ));
    }

    #[tokio::test]
    async fn failed_fetch_replaces_the_list_with_no_data() {
        let page = page();
        page.store(Some(snapshot())).await;
        page.store(None).await;
        let view = page.view(&AlertFilter::default(), &clock()).await;
        assert!(view.view.list.is_no_data());
        assert!(view.view.summary.is_no_data());
        assert!(page.alerts(&AlertFilter::unrestricted()).await.is_none());
    }

    #[test]
    fn card_fields() {
        let alerts: Vec<Alert> = snapshot()
            .alerts
            .unwrap()
            .into_iter()
            .map(Alert::from)
            .collect();
        let card = card(&alerts[1], clock().now);
        assert_eq!(card.type_label, "Segurança");
        assert_eq!(card.priority.text, "Alta");
        assert_eq!(card.status.text, "Ativo");
        assert_eq!(card.title, "Sem título");
        assert_eq!(card.area.as_deref(), Some("Portaria"));
        assert_eq!(card.age, "3h atrás");
        assert!(card.actionable);
    }
}
