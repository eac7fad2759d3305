//! Chart.js configurations built from snapshots, with the static series the
//! screens fall back to when a fetch fails.

use crate::models::{AreasOccupation, PeopleFlow, Sensor};
use crate::thresholds::{AREA_BAR_COLOR, Level};
use serde::Serialize;
use serde_json::{Value, json};

const BLUE: &str = "#3498db";
const BLUE_FILL: &str = "rgba(52, 152, 219, 0.1)";
const GREEN_LINE: &str = "#2ecc71";
const GREEN_FILL: &str = "rgba(46, 204, 113, 0.1)";

const BAR_RED: &str = "rgba(231, 76, 60, 0.7)";
const BAR_YELLOW: &str = "rgba(241, 196, 15, 0.7)";
const BAR_GREEN: &str = "rgba(46, 204, 113, 0.7)";
const BAR_BLUE: &str = "rgba(52, 152, 219, 0.7)";

const FALLBACK_FLOW_LABELS: [&str; 6] = ["00:00", "04:00", "08:00", "12:00", "16:00", "20:00"];
const FALLBACK_FLOW_DATA: [f64; 6] = [25.0, 18.0, 85.0, 120.0, 180.0, 95.0];
const FALLBACK_AREA_LABELS: [&str; 6] = [
    "Piscinas",
    "Auditórios",
    "Salas",
    "Quadras",
    "Biblioteca",
    "Convivência",
];
const FALLBACK_AREA_DATA: [f64; 6] = [68.0, 35.0, 55.0, 45.0, 22.0, 38.0];
const FALLBACK_ALERT_COUNTS: [f64; 3] = [3.0, 2.0, 5.0];
const FALLBACK_SENSORS: [(&str, f64); 6] = [
    ("LORA-A1B2C3D4", 3619.0),
    ("ZIGB-E5F6G7H8", 3703.0),
    ("SIGF-I9J0K1L2", 4036.0),
    ("RFID-M3N4O5P6", 3528.0),
    ("LORA-Q7R8S9T0", 3428.0),
    ("ZIGB-U1V2W3X4", 3762.0),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
    Doughnut,
}

/// A single color for the whole dataset or one per data point.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Paint {
    One(String),
    Each(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub data: Vec<f64>,
    pub border_color: Paint,
    pub background_color: Paint,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<bool>,
    #[serde(rename = "yAxisID", skip_serializing_if = "Option::is_none")]
    pub y_axis_id: Option<String>,
}

impl Dataset {
    fn trend(label: &str, data: Vec<f64>, line: &str, fill: &str) -> Self {
        Self {
            label: Some(label.to_string()),
            data,
            border_color: Paint::One(line.to_string()),
            background_color: Paint::One(fill.to_string()),
            border_width: None,
            tension: Some(0.4),
            fill: None,
            y_axis_id: None,
        }
    }

    fn filled(mut self) -> Self {
        self.fill = Some(true);
        self
    }

    fn on_axis(mut self, axis: &str) -> Self {
        self.y_axis_id = Some(axis.to_string());
        self
    }

    fn bars(label: Option<&str>, data: Vec<f64>, colors: Vec<String>) -> Self {
        let borders = colors.iter().map(|color| opaque(color)).collect();
        Self {
            label: label.map(str::to_string),
            data,
            border_color: Paint::Each(borders),
            background_color: Paint::Each(colors),
            border_width: Some(2),
            tension: None,
            fill: None,
            y_axis_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub data: ChartData,
    pub options: Value,
}

/// A chart bound to the canvas it is drawn on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSlot {
    pub canvas: &'static str,
    pub spec: ChartSpec,
}

impl ChartSlot {
    pub fn new(canvas: &'static str, spec: ChartSpec) -> Self {
        Self { canvas, spec }
    }
}

fn labels<S: AsRef<str>>(items: &[S]) -> Vec<String> {
    items.iter().map(|s| s.as_ref().to_string()).collect()
}

/// Same rgba color with full opacity, used for bar borders.
fn opaque(color: &str) -> String {
    match color.rfind(',') {
        Some(idx) if color.starts_with("rgba(") => format!("{}, 1)", &color[..idx]),
        _ => color.to_string(),
    }
}

fn percent_axis(title: &str) -> Value {
    json!({
        "responsive": true,
        "maintainAspectRatio": false,
        "plugins": { "legend": { "display": false } },
        "scales": {
            "y": {
                "beginAtZero": true,
                "max": 100,
                "title": { "display": true, "text": title }
            }
        }
    })
}

pub fn bar_color(percentage: f64) -> &'static str {
    match AREA_BAR_COLOR.level(percentage) {
        Level::Critical => BAR_RED,
        Level::Warning | Level::Moderate => BAR_YELLOW,
        Level::Normal => BAR_GREEN,
    }
}

pub fn people_flow(flow: Option<&PeopleFlow>) -> ChartSpec {
    let (labels, data) = match flow {
        Some(flow) if !flow.labels.is_empty() && !flow.data.is_empty() => {
            (flow.labels.clone(), flow.data.clone())
        }
        _ => (labels(&FALLBACK_FLOW_LABELS), FALLBACK_FLOW_DATA.to_vec()),
    };
    ChartSpec {
        kind: ChartKind::Line,
        data: ChartData {
            labels,
            datasets: vec![Dataset::trend("Pessoas no CEU", data, BLUE, BLUE_FILL).filled()],
        },
        options: json!({
            "responsive": true,
            "maintainAspectRatio": false,
            "plugins": { "legend": { "display": false } },
            "scales": {
                "y": {
                    "beginAtZero": true,
                    "title": { "display": true, "text": "Número de Pessoas" }
                }
            }
        }),
    }
}

pub fn occupation_by_area(areas: Option<&AreasOccupation>) -> ChartSpec {
    let (labels, data) = match areas.and_then(|a| a.areas.as_ref()) {
        Some(areas) if !areas.is_empty() => (
            areas
                .iter()
                .map(|area| area.name.clone().unwrap_or_else(|| "Sem nome".to_string()))
                .collect(),
            areas
                .iter()
                .map(|area| area.occupation_percentage.unwrap_or(0.0))
                .collect::<Vec<_>>(),
        ),
        _ => (labels(&FALLBACK_AREA_LABELS), FALLBACK_AREA_DATA.to_vec()),
    };
    let colors = data.iter().map(|value| bar_color(*value).to_string()).collect();
    ChartSpec {
        kind: ChartKind::Bar,
        data: ChartData {
            labels,
            datasets: vec![Dataset::bars(Some("Ocupação (%)"), data, colors)],
        },
        options: percent_axis("Ocupação (%)"),
    }
}

pub fn pool_occupation() -> ChartSpec {
    let labels = labels(&[
        "08:00", "09:00", "10:00", "11:00", "12:00", "13:00", "14:00", "15:00",
    ]);
    let data = vec![15.0, 22.0, 35.0, 48.0, 55.0, 62.0, 68.0, 70.0];
    ChartSpec {
        kind: ChartKind::Line,
        data: ChartData {
            labels,
            datasets: vec![Dataset::trend("Ocupação (%)", data, BLUE, BLUE_FILL).filled()],
        },
        options: percent_axis("Ocupação (%)"),
    }
}

pub fn water_quality() -> ChartSpec {
    let labels = labels(&FALLBACK_FLOW_LABELS);
    ChartSpec {
        kind: ChartKind::Line,
        data: ChartData {
            labels,
            datasets: vec![
                Dataset::trend("pH", vec![7.2, 7.3, 7.4, 7.5, 7.4, 7.3], BLUE, BLUE_FILL)
                    .on_axis("y"),
                Dataset::trend(
                    "Cloro (ppm)",
                    vec![2.0, 2.1, 2.2, 2.1, 2.0, 2.1],
                    GREEN_LINE,
                    GREEN_FILL,
                )
                .on_axis("y1"),
            ],
        },
        options: json!({
            "responsive": true,
            "maintainAspectRatio": false,
            "interaction": { "mode": "index", "intersect": false },
            "scales": {
                "y": {
                    "type": "linear",
                    "display": true,
                    "position": "left",
                    "title": { "display": true, "text": "pH" },
                    "min": 6.5,
                    "max": 8.0
                },
                "y1": {
                    "type": "linear",
                    "display": true,
                    "position": "right",
                    "title": { "display": true, "text": "Cloro (ppm)" },
                    "min": 0,
                    "max": 4,
                    "grid": { "drawOnChartArea": false }
                }
            }
        }),
    }
}

/// Doughnut of alert counts by severity: critical, warning, info.
pub fn alerts_by_type(counts: Option<[usize; 3]>) -> ChartSpec {
    let data = counts
        .map(|counts| counts.iter().map(|c| *c as f64).collect())
        .unwrap_or_else(|| FALLBACK_ALERT_COUNTS.to_vec());
    let colors = vec![BAR_RED.to_string(), BAR_YELLOW.to_string(), BAR_BLUE.to_string()];
    ChartSpec {
        kind: ChartKind::Doughnut,
        data: ChartData {
            labels: labels(&["Críticos", "Avisos", "Informativos"]),
            datasets: vec![Dataset::bars(None, data, colors)],
        },
        options: json!({
            "responsive": true,
            "maintainAspectRatio": false,
            "plugins": { "legend": { "position": "bottom" } }
        }),
    }
}

fn protocol_color(serial_or_protocol: &str) -> &'static str {
    let upper = serial_or_protocol.to_ascii_uppercase();
    if upper.starts_with("LORA") {
        "rgba(155, 89, 182, 0.8)"
    } else if upper.starts_with("ZIGB") {
        "rgba(39, 174, 96, 0.8)"
    } else if upper.starts_with("SIGF") {
        "rgba(230, 126, 34, 0.8)"
    } else {
        "rgba(52, 152, 219, 0.8)"
    }
}

pub fn sensors_distribution(sensors: Option<&[Sensor]>) -> ChartSpec {
    let points: Vec<(String, f64, &'static str)> = match sensors {
        Some(sensors) if !sensors.is_empty() => sensors
            .iter()
            .map(|sensor| {
                let name = sensor
                    .serial_number
                    .clone()
                    .unwrap_or_else(|| "Sem nome".to_string());
                let color = protocol_color(sensor.protocol.as_deref().unwrap_or(&name));
                (name, sensor.total_readings.unwrap_or(0) as f64, color)
            })
            .collect(),
        _ => FALLBACK_SENSORS
            .iter()
            .map(|(name, readings)| (name.to_string(), *readings, protocol_color(name)))
            .collect(),
    };
    let labels = points.iter().map(|(name, _, _)| name.clone()).collect();
    let data = points.iter().map(|(_, readings, _)| *readings).collect();
    let colors = points.iter().map(|(_, _, color)| color.to_string()).collect();
    ChartSpec {
        kind: ChartKind::Bar,
        data: ChartData {
            labels,
            datasets: vec![Dataset::bars(Some("Leituras por Sensor"), data, colors)],
        },
        options: json!({
            "responsive": true,
            "maintainAspectRatio": false,
            "plugins": { "legend": { "display": false }, "title": { "display": false } },
            "scales": { "y": { "beginAtZero": true } }
        }),
    }
}
