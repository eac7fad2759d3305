use crate::charts::{self, ChartSlot};
use crate::fetcher::{ApiClient, Resource};
use crate::format::{self, NO_DATA, NO_TIME, PLACEHOLDER};
use crate::models::{PoolCurrent, PoolQuality, QualityReading};
use crate::scheduler::Refresh;
use crate::thresholds::{
    self, ALKALINITY_RANGE, AREA_OCCUPANCY, CHLORINE_RANGE, IdealRange, Level, PH_RANGE,
    POOL_OCCUPANCY_STATUS, RangeStatus, TURBIDITY_RANGE,
};
use crate::views::{Badge, Clock, Rendered, Section};
use serde::Serialize;
use tokio::sync::RwLock;

const DEFAULT_POOL_CAPACITY: u64 = 50;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoolView {
    pub status: Section<PoolStatusCard>,
    pub occupation: Section<PoolOccupationCard>,
    pub quality: Section<WaterQualityCard>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoolStatusCard {
    pub water_temperature: String,
    pub temperature_status: Option<TemperatureStatus>,
    pub ambient_temperature: String,
    pub last_update: String,
    pub operational: Badge,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TemperatureStatus {
    pub status: RangeStatus,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoolOccupationCard {
    pub current_people: u64,
    pub capacity: u64,
    pub available: i64,
    pub percentage: f64,
    pub percentage_text: String,
    pub bar_width: f64,
    pub bar_class: &'static str,
    pub status: Badge,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaterQualityCard {
    pub metrics: Vec<QualityMetric>,
    pub overall: Badge,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityMetric {
    pub key: &'static str,
    pub label: &'static str,
    pub value: String,
    pub status: RangeStatus,
    pub status_text: &'static str,
    pub class: &'static str,
    #[serde(skip)]
    ideal: bool,
}

fn celsius(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.1}°C"))
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

pub fn operational_badge(status: Option<&str>) -> Badge {
    match status.map(str::trim).unwrap_or("unknown") {
        "open" => Badge::new("Aberta", "badge-success", "fa-check-circle"),
        "closed" => Badge::new("Fechada", "badge-danger", "fa-times-circle"),
        "maintenance" => Badge::new("Manutenção", "badge-warning", "fa-tools"),
        _ => Badge::new("Desconhecido", "badge-secondary", "fa-question-circle"),
    }
}

pub fn status_card(current: &PoolCurrent, clock: &Clock) -> PoolStatusCard {
    PoolStatusCard {
        water_temperature: celsius(current.temperature),
        temperature_status: current.temperature.map(|t| {
            let (status, label) = thresholds::classify_temperature(t);
            TemperatureStatus { status, label }
        }),
        ambient_temperature: celsius(current.ambient_temperature),
        last_update: current
            .last_update
            .map(|at| format::clock_time(&at, &clock.offset))
            .unwrap_or_else(|| NO_TIME.to_string()),
        operational: operational_badge(current.operational_status.as_deref()),
    }
}

fn occupation_badge(percentage: f64) -> Badge {
    let band = POOL_OCCUPANCY_STATUS.classify(percentage);
    let (class, icon) = match band.level {
        Level::Critical => ("badge-danger", "fa-exclamation-triangle"),
        Level::Warning => ("badge-warning", "fa-exclamation-circle"),
        Level::Moderate => ("badge-info", "fa-users"),
        Level::Normal => ("badge-success", "fa-check"),
    };
    Badge::new(band.label, class, icon)
}

pub fn occupation_card(current: &PoolCurrent) -> PoolOccupationCard {
    let people = current.current_people.unwrap_or(0);
    let capacity = current
        .capacity
        .filter(|c| *c > 0)
        .unwrap_or(DEFAULT_POOL_CAPACITY);
    let percentage = people as f64 / capacity as f64 * 100.0;
    PoolOccupationCard {
        current_people: people,
        capacity,
        available: capacity as i64 - people as i64,
        percentage,
        percentage_text: format!("{percentage:.0}%"),
        bar_width: percentage.min(100.0),
        bar_class: AREA_OCCUPANCY.level(percentage).css_class(),
        status: occupation_badge(percentage),
    }
}

fn metric(
    key: &'static str,
    label: &'static str,
    reading: Option<&QualityReading>,
    defaults: IdealRange,
) -> Option<QualityMetric> {
    let reading = reading?;
    let value = reading.value?;
    let range = defaults.with_bounds(reading.min_safe, reading.max_safe);
    let status = range.classify(value);
    Some(QualityMetric {
        key,
        label,
        value: format!("{value:.2}"),
        status,
        status_text: status.label(),
        class: status.css_class(),
        ideal: status == RangeStatus::Optimal,
    })
}

/// Overall badge over the metrics that were actually reported.
fn overall_quality(metrics: &[QualityMetric]) -> Badge {
    if metrics.is_empty() {
        return Badge::new(NO_DATA, "badge-secondary", "fa-question-circle");
    }
    if metrics.iter().all(|m| m.ideal) {
        return Badge::new("Excelente", "badge-success", "fa-check-circle");
    }
    let sanitizer_off = metrics
        .iter()
        .any(|m| (m.key == "ph" || m.key == "chlorine") && !m.ideal);
    if sanitizer_off {
        Badge::new("Requer Atenção", "badge-danger", "fa-exclamation-triangle")
    } else {
        Badge::new("Aceitável", "badge-warning", "fa-exclamation-circle")
    }
}

pub fn quality_card(quality: &PoolQuality) -> WaterQualityCard {
    let metrics: Vec<QualityMetric> = [
        metric("ph", "pH", quality.ph.as_ref(), PH_RANGE),
        metric("chlorine", "Cloro", quality.chlorine.as_ref(), CHLORINE_RANGE),
        metric(
            "alkalinity",
            "Alcalinidade",
            quality.alkalinity.as_ref(),
            ALKALINITY_RANGE,
        ),
        metric(
            "turbidity",
            "Turbidez",
            quality.turbidity.as_ref(),
            TURBIDITY_RANGE,
        ),
    ]
    .into_iter()
    .flatten()
    .collect();
    WaterQualityCard {
        overall: overall_quality(&metrics),
        metrics,
    }
}

pub fn render(
    current: Option<PoolCurrent>,
    quality: Option<PoolQuality>,
    clock: &Clock,
) -> Rendered<PoolView> {
    Rendered {
        view: PoolView {
            status: Section::from_snapshot(current.as_ref(), |c| status_card(c, clock)),
            occupation: Section::from_snapshot(current.as_ref(), occupation_card),
            quality: Section::from_snapshot(quality.as_ref(), quality_card),
        },
        charts: vec![
            ChartSlot::new("poolOccupationChart", charts::pool_occupation()),
            ChartSlot::new("waterQualityChart", charts::water_quality()),
        ],
    }
}

pub struct PoolPage {
    api: ApiClient,
    rendered: RwLock<Rendered<PoolView>>,
}

impl PoolPage {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            rendered: RwLock::new(Rendered {
                view: PoolView {
                    status: Section::Loading,
                    occupation: Section::Loading,
                    quality: Section::Loading,
                },
                charts: Vec::new(),
            }),
        }
    }

    pub async fn current(&self) -> Rendered<PoolView> {
        self.rendered.read().await.clone()
    }
}

impl Refresh for PoolPage {
    fn name(&self) -> &'static str {
        "pool"
    }

    async fn refresh(&self) {
        let (current, quality) = tokio::join!(
            self.api.fetch::<PoolCurrent>(Resource::PoolCurrent),
            self.api.fetch::<PoolQuality>(Resource::PoolQuality),
        );
        let rendered = render(current, quality, &Clock::system());
        *self.rendered.write().await = rendered;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn clock() -> Clock {
        Clock::utc(Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap())
    }

    fn quality(value: serde_json::Value) -> PoolQuality {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn ph_inside_the_range_is_ideal() {
        let card = quality_card(&quality(json!({"ph": 7.5})));
        assert_eq!(card.metrics[0].status, RangeStatus::Optimal);
        assert_eq!(card.metrics[0].value, "7.50");
        assert_eq!(card.overall.text, "Excelente");

        let card = quality_card(&quality(json!({"ph": 8.0})));
        assert_eq!(card.metrics[0].status, RangeStatus::Attention);
        assert_eq!(card.overall.text, "Requer Atenção");
    }

    #[test]
    fn off_alkalinity_alone_is_acceptable() {
        let card = quality_card(&quality(json!({
            "ph": 7.4, "chlorine": 2.0, "alkalinity": 130.0, "turbidity": 1.0
        })));
        assert_eq!(card.metrics.len(), 4);
        assert_eq!(card.metrics[2].status, RangeStatus::Attention);
        assert_eq!(card.overall.text, "Aceitável");
    }

    #[test]
    fn snapshot_bounds_override_defaults() {
        let card = quality_card(&quality(json!({
            "ph": {"value": 7.7, "min_safe": 7.0, "max_safe": 7.6}
        })));
        assert_eq!(card.metrics[0].status, RangeStatus::Attention);
    }

    #[test]
    fn empty_quality_payload_has_no_overall_verdict() {
        let card = quality_card(&PoolQuality::default());
        assert!(card.metrics.is_empty());
        assert_eq!(card.overall.text, "Sem dados");
    }

    #[test]
    fn occupation_defaults_and_badges() {
        let card = occupation_card(&PoolCurrent {
            current_people: Some(45),
            ..PoolCurrent::default()
        });
        assert_eq!(card.capacity, 50);
        assert_eq!(card.available, 5);
        assert_eq!(card.percentage_text, "90%");
        assert_eq!(card.bar_class, "critical");
        assert_eq!(card.status.text, "Lotada");

        let card = occupation_card(&PoolCurrent {
            current_people: Some(10),
            capacity: Some(20),
            ..PoolCurrent::default()
        });
        assert_eq!(card.status.text, "Moderada");
        assert_eq!(card.status.class, "badge-info");
    }

    #[test]
    fn status_card_placeholders() {
        let card = status_card(&PoolCurrent::default(), &clock());
        assert_eq!(card.water_temperature, "—");
        assert!(card.temperature_status.is_none());
        assert_eq!(card.last_update, "--:--");
        assert_eq!(card.operational.text, "Desconhecido");

        let current: PoolCurrent = serde_json::from_value(json!({
            "water_temperature": 27.3,
            "operational_status": "maintenance",
            "last_reading": "2026-10-17T09:05:00"
        }))
        .unwrap();
        let card = status_card(&current, &clock());
        assert_eq!(card.water_temperature, "27.3°C");
        assert_eq!(card.temperature_status.unwrap().label, "Ideal");
        assert_eq!(card.last_update, "09:05");
        assert_eq!(card.operational.class, "badge-warning");
    }

    #[test]
    fn failed_fetches_leave_no_data_sections() {
        let rendered = render(None, Some(quality(json!({"ph": 7.4}))), &clock());
        assert!(rendered.view.status.is_no_data());
        assert!(rendered.view.occupation.is_no_data());
        assert!(rendered.view.quality.ready().is_some());
    }
}
