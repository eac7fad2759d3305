use crate::alerts::{Alert, Severity};
use crate::charts::{self, ChartSlot};
use crate::fetcher::{ApiClient, Resource};
use crate::format::{self, NO_TIME};
use crate::models::{
    ActiveAlerts, AdvancedStats, AreasOccupation, CurrentStats, PeakPrediction, PeopleFlow,
};
use crate::scheduler::Refresh;
use crate::thresholds::{MAIN_ALERT_COUNT, MAIN_CAPACITY};
use crate::views::{Clock, Rendered, Section, StatusText};
use serde::Serialize;
use tokio::sync::RwLock;

const DEFAULT_MAX_CAPACITY: u64 = 300;
const DEFAULT_STAY_MINUTES: u64 = 120;
const FEED_LENGTH: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MainView {
    pub occupancy: Section<OccupancyCard>,
    pub visits: Section<VisitsCard>,
    pub peak: Section<PeakCard>,
    pub alerts: Section<AlertsCard>,
}

impl MainView {
    pub fn loading() -> Self {
        Self {
            occupancy: Section::Loading,
            visits: Section::Loading,
            peak: Section::Loading,
            alerts: Section::Loading,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OccupancyCard {
    pub current_people: u64,
    pub capacity_info: String,
    pub entries_today: u64,
    pub capacity_percentage: f64,
    pub occupation_rate: String,
    pub status: StatusText,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisitsCard {
    pub daily_average: String,
    pub average_stay: String,
    pub today_peak: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeakCard {
    pub peak_hour: String,
    pub prediction: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertsCard {
    pub total: u64,
    pub breakdown: String,
    pub status: StatusText,
    pub feed: AlertFeed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AlertFeed {
    AllClear { title: String, message: String },
    Items { items: Vec<FeedItem> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedItem {
    pub severity: Severity,
    pub icon: &'static str,
    pub title: String,
    pub message: String,
    pub age: String,
}

fn capacity_percentage(stats: &CurrentStats) -> f64 {
    if let Some(pct) = stats.capacity_percentage {
        return pct;
    }
    let current = stats.current_people.unwrap_or(0) as f64;
    match stats.max_capacity {
        Some(max) if max > 0 => current / max as f64 * 100.0,
        _ => 0.0,
    }
}

pub fn occupancy_card(stats: &CurrentStats) -> OccupancyCard {
    let current = stats.current_people.unwrap_or(0);
    let pct = capacity_percentage(stats);
    OccupancyCard {
        current_people: current,
        capacity_info: format!(
            "Capacidade: {current}/{}",
            stats.max_capacity.unwrap_or(DEFAULT_MAX_CAPACITY)
        ),
        entries_today: stats.entries_today.unwrap_or(0),
        capacity_percentage: pct,
        occupation_rate: format!("{pct:.1}%"),
        status: MAIN_CAPACITY.classify(pct).into(),
    }
}

pub fn visits_card(advanced: &AdvancedStats, stats: Option<&CurrentStats>) -> VisitsCard {
    VisitsCard {
        daily_average: format!(
            "Média: {}/dia",
            format::number(advanced.daily_average.unwrap_or(0.0))
        ),
        average_stay: format::stay_duration(
            advanced.average_stay_minutes.unwrap_or(DEFAULT_STAY_MINUTES),
        ),
        today_peak: advanced
            .today_peak
            .or_else(|| stats.and_then(|s| s.current_people))
            .unwrap_or(0),
    }
}

pub fn peak_card(peak: &PeakPrediction) -> PeakCard {
    PeakCard {
        peak_hour: peak
            .peak_hour
            .clone()
            .filter(|hour| !hour.is_empty())
            .unwrap_or_else(|| NO_TIME.to_string()),
        prediction: format!(
            "Prev. {:.0}% de ocupação",
            peak.capacity_prediction.unwrap_or(0.0)
        ),
    }
}

fn feed_icon(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "fa-exclamation-triangle",
        Severity::Warning => "fa-exclamation-circle",
        Severity::Info => "fa-info-circle",
    }
}

pub fn alerts_card(snapshot: ActiveAlerts, clock: &Clock) -> AlertsCard {
    let alerts: Vec<Alert> = snapshot
        .alerts
        .unwrap_or_default()
        .into_iter()
        .map(Alert::from)
        .collect();
    let total = snapshot.total.unwrap_or(alerts.len() as u64);
    let critical = alerts
        .iter()
        .filter(|a| a.severity == Severity::Critical)
        .count();
    let warning = alerts
        .iter()
        .filter(|a| a.severity == Severity::Warning)
        .count();

    let feed = if alerts.is_empty() {
        AlertFeed::AllClear {
            title: "Sistema Operacional".to_string(),
            message: "Nenhum alerta ativo no momento".to_string(),
        }
    } else {
        AlertFeed::Items {
            items: alerts
                .iter()
                .take(FEED_LENGTH)
                .map(|alert| FeedItem {
                    severity: alert.severity,
                    icon: feed_icon(alert.severity),
                    title: alert
                        .title
                        .clone()
                        .unwrap_or_else(|| alert.kind.label().to_string()),
                    message: alert
                        .message
                        .clone()
                        .unwrap_or_else(|| "Sem descrição".to_string()),
                    age: format::spoken_age(alert.created_at.as_ref(), clock.now, &clock.offset),
                })
                .collect(),
        }
    };

    AlertsCard {
        total,
        breakdown: format!("{critical} críticos, {warning} avisos"),
        status: MAIN_ALERT_COUNT.classify(total as f64).into(),
        feed,
    }
}

/// Snapshots gathered by one refresh cycle of the main page.
#[derive(Debug, Clone, Default)]
pub struct MainSnapshots {
    pub stats: Option<CurrentStats>,
    pub advanced: Option<AdvancedStats>,
    pub peak: Option<PeakPrediction>,
    pub alerts: Option<ActiveAlerts>,
    pub flow: Option<PeopleFlow>,
    pub areas: Option<AreasOccupation>,
}

pub fn render(snapshots: MainSnapshots, clock: &Clock) -> Rendered<MainView> {
    let MainSnapshots {
        stats,
        advanced,
        peak,
        alerts,
        flow,
        areas,
    } = snapshots;
    let view = MainView {
        occupancy: Section::from_snapshot(stats.as_ref(), occupancy_card),
        visits: Section::from_snapshot(advanced.as_ref(), |advanced| {
            visits_card(advanced, stats.as_ref())
        }),
        peak: Section::from_snapshot(peak.as_ref(), peak_card),
        alerts: Section::from_snapshot(alerts, |alerts| alerts_card(alerts, clock)),
    };
    Rendered {
        view,
        charts: vec![
            ChartSlot::new("peopleFlowChart", charts::people_flow(flow.as_ref())),
            ChartSlot::new(
                "occupationByAreaChart",
                charts::occupation_by_area(areas.as_ref()),
            ),
        ],
    }
}

pub struct MainPage {
    api: ApiClient,
    rendered: RwLock<Rendered<MainView>>,
}

impl MainPage {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            rendered: RwLock::new(Rendered {
                view: MainView::loading(),
                charts: Vec::new(),
            }),
        }
    }

    pub async fn current(&self) -> Rendered<MainView> {
        self.rendered.read().await.clone()
    }
}

impl Refresh for MainPage {
    fn name(&self) -> &'static str {
        "main"
    }

    async fn refresh(&self) {
        let (stats, advanced, peak, alerts, flow, areas) = tokio::join!(
            self.api.fetch::<CurrentStats>(Resource::CurrentStats),
            self.api.fetch::<AdvancedStats>(Resource::AdvancedStats),
            self.api.fetch::<PeakPrediction>(Resource::PeakPrediction),
            self.api.fetch::<ActiveAlerts>(Resource::ActiveAlerts),
            self.api.fetch::<PeopleFlow>(Resource::PeopleFlow),
            self.api.fetch::<AreasOccupation>(Resource::AreasOccupation),
        );
        let rendered = render(
            MainSnapshots {
                stats,
                advanced,
                peak,
                alerts,
                flow,
                areas,
            },
            &Clock::system(),
        );
        *self.rendered.write().await = rendered;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thresholds::Level;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn clock() -> Clock {
        Clock::utc(Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap())
    }

    #[test]
    fn capacity_at_85_percent_is_critical() {
        let stats = CurrentStats {
            current_people: Some(85),
            max_capacity: Some(100),
            capacity_percentage: Some(85.0),
            ..CurrentStats::default()
        };
        let card = occupancy_card(&stats);
        assert_eq!(card.status.level, Level::Critical);
        assert_eq!(card.status.text, "Capacidade crítica");
        assert_eq!(card.capacity_info, "Capacidade: 85/100");
        assert_eq!(card.occupation_rate, "85.0%");
    }

    #[test]
    fn capacity_percentage_is_derived_when_missing() {
        let stats = CurrentStats {
            current_people: Some(150),
            ..CurrentStats::default()
        };
        let card = occupancy_card(&stats);
        assert_eq!(card.capacity_percentage, 0.0);
        assert_eq!(card.capacity_info, "Capacidade: 150/300");

        let stats = CurrentStats {
            current_people: Some(45),
            max_capacity: Some(60),
            ..CurrentStats::default()
        };
        assert_eq!(occupancy_card(&stats).capacity_percentage, 75.0);
        assert_eq!(occupancy_card(&stats).status.level, Level::Warning);
    }

    #[test]
    fn visits_defaults() {
        let card = visits_card(&AdvancedStats::default(), None);
        assert_eq!(card.daily_average, "Média: 0/dia");
        assert_eq!(card.average_stay, "2h0min");
        assert_eq!(card.today_peak, 0);

        let stats = CurrentStats {
            current_people: Some(33),
            ..CurrentStats::default()
        };
        let advanced = AdvancedStats {
            average_stay_minutes: Some(45),
            ..AdvancedStats::default()
        };
        let card = visits_card(&advanced, Some(&stats));
        assert_eq!(card.average_stay, "45min");
        assert_eq!(card.today_peak, 33);
    }

    #[test]
    fn peak_placeholders() {
        let card = peak_card(&PeakPrediction::default());
        assert_eq!(card.peak_hour, "--:--");
        assert_eq!(card.prediction, "Prev. 0% de ocupação");
    }

    #[test]
    fn alert_card_breakdown_and_feed() {
        let snapshot: ActiveAlerts = serde_json::from_value(json!({
            "total": 3,
            "alerts": [
                {"id": 1, "type": "capacity", "severity": "critical",
                 "message": "Lotação", "timestamp": "2026-10-17T11:55:00"},
                {"id": 2, "severity": "warning", "timestamp": "2026-10-17T10:00:00"},
                {"id": 3, "severity": "info"}
            ]
        }))
        .unwrap();
        let card = alerts_card(snapshot, &clock());
        assert_eq!(card.total, 3);
        assert_eq!(card.breakdown, "1 críticos, 1 avisos");
        assert_eq!(card.status.level, Level::Critical);
        let AlertFeed::Items { items } = card.feed else {
            panic!("expected feed items");
        };
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].title, "Capacidade");
        assert_eq!(items[0].age, "Há 5 minutos");
        assert_eq!(items[1].message, "Sem descrição");
        assert_eq!(items[1].age, "Há 2 horas");
        assert_eq!(items[2].age, "Agora");
    }

    #[test]
    fn no_alerts_renders_all_clear() {
        let snapshot: ActiveAlerts =
            serde_json::from_value(json!({"total": 0, "alerts": []})).unwrap();
        let card = alerts_card(snapshot, &clock());
        assert_eq!(card.status.level, Level::Normal);
        assert!(matches!(card.feed, AlertFeed::AllClear { .. }));
    }

    #[test]
    fn failed_fetches_render_no_data_sections() {
        let rendered = render(MainSnapshots::default(), &clock());
        assert!(rendered.view.occupancy.is_no_data());
        assert!(rendered.view.visits.is_no_data());
        assert!(rendered.view.peak.is_no_data());
        assert!(rendered.view.alerts.is_no_data());
        assert_eq!(rendered.charts.len(), 2);
    }
}
