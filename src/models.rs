//! Snapshot payloads returned by the monitoring backend.
//!
//! Every field is optional: the backend omits or nulls values freely and a
//! missing field must never fail the whole snapshot. Defaults are applied by
//! the views, not here.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CurrentStats {
    pub current_people: Option<u64>,
    pub max_capacity: Option<u64>,
    pub capacity_percentage: Option<f64>,
    pub entries_today: Option<u64>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub last_reading: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdvancedStats {
    pub daily_average: Option<f64>,
    pub average_stay_minutes: Option<u64>,
    pub today_peak: Option<u64>,
    pub trend_percentage: Option<f64>,
    pub trend_direction: Option<String>,
    pub total_entries_today: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PeopleFlow {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub data: Vec<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PeakPrediction {
    pub peak_hour: Option<String>,
    pub capacity_prediction: Option<f64>,
    pub confidence: Option<f64>,
    pub total_readings: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AreasOccupation {
    pub areas: Option<Vec<Area>>,
    pub total_people: Option<u64>,
}

/// The backend also answers with its older `current`/`percentage` names,
/// sometimes next to the current ones; the current name wins.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "RawArea")]
pub struct Area {
    pub id: Option<RecordId>,
    pub name: Option<String>,
    pub current_people: Option<u64>,
    pub capacity: Option<u64>,
    pub occupation_percentage: Option<f64>,
}

#[derive(Deserialize)]
struct RawArea {
    id: Option<RecordId>,
    name: Option<String>,
    current_people: Option<u64>,
    current: Option<u64>,
    capacity: Option<u64>,
    occupation_percentage: Option<f64>,
    percentage: Option<f64>,
}

impl From<RawArea> for Area {
    fn from(raw: RawArea) -> Self {
        Area {
            id: raw.id,
            name: raw.name,
            current_people: raw.current_people.or(raw.current),
            capacity: raw.capacity,
            occupation_percentage: raw.occupation_percentage.or(raw.percentage),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "RawPoolCurrent")]
pub struct PoolCurrent {
    pub temperature: Option<f64>,
    pub ambient_temperature: Option<f64>,
    pub current_people: Option<u64>,
    pub capacity: Option<u64>,
    pub operational_status: Option<String>,
    pub last_update: Option<DateTime<Utc>>,
    pub entries_today: Option<u64>,
}

#[derive(Deserialize)]
struct RawPoolCurrent {
    temperature: Option<f64>,
    water_temperature: Option<f64>,
    ambient_temperature: Option<f64>,
    current_people: Option<u64>,
    capacity: Option<u64>,
    operational_status: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    last_update: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    last_reading: Option<DateTime<Utc>>,
    entries_today: Option<u64>,
}

impl From<RawPoolCurrent> for PoolCurrent {
    fn from(raw: RawPoolCurrent) -> Self {
        PoolCurrent {
            temperature: raw.temperature.or(raw.water_temperature),
            ambient_temperature: raw.ambient_temperature,
            current_people: raw.current_people,
            capacity: raw.capacity,
            operational_status: raw.operational_status,
            last_update: raw.last_update.or(raw.last_reading),
            entries_today: raw.entries_today,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PoolQuality {
    pub ph: Option<QualityReading>,
    pub chlorine: Option<QualityReading>,
    pub alkalinity: Option<QualityReading>,
    pub turbidity: Option<QualityReading>,
}

/// A water quality metric. The backend sends either a bare number or an
/// object carrying the safe range alongside the value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(from = "RawQuality")]
pub struct QualityReading {
    pub value: Option<f64>,
    pub min_safe: Option<f64>,
    pub max_safe: Option<f64>,
}

impl QualityReading {
    pub fn bare(value: f64) -> Self {
        Self {
            value: Some(value),
            ..Self::default()
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawQuality {
    Bare(f64),
    Detailed {
        value: Option<f64>,
        min_safe: Option<f64>,
        max_safe: Option<f64>,
    },
}

impl From<RawQuality> for QualityReading {
    fn from(raw: RawQuality) -> Self {
        match raw {
            RawQuality::Bare(value) => QualityReading::bare(value),
            RawQuality::Detailed {
                value,
                min_safe,
                max_safe,
            } => QualityReading {
                value,
                min_safe,
                max_safe,
            },
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActiveAlerts {
    pub total: Option<u64>,
    pub alerts: Option<Vec<RawAlert>>,
}

/// Alert as it arrives on the wire; [`crate::alerts::Alert`] is the typed form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAlert {
    pub id: Option<RecordId>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Older name of `type`; only read when `type` is absent.
    pub alert_type: Option<String>,
    pub severity: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub title: Option<String>,
    pub message: Option<String>,
    pub area: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub resolved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Sensor {
    pub serial_number: Option<String>,
    pub status: Option<String>,
    pub protocol: Option<String>,
    pub total_readings: Option<u64>,
    pub battery: Option<f64>,
    #[serde(default, deserialize_with = "lenient_signal")]
    pub signal_strength: Option<i64>,
}

/// The sensor list is served either bare or wrapped in `{"sensors": [...]}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "RawFleet")]
pub struct SensorFleet {
    pub sensors: Vec<Sensor>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFleet {
    List(Vec<Sensor>),
    Wrapped { sensors: Vec<Sensor> },
}

impl From<RawFleet> for SensorFleet {
    fn from(raw: RawFleet) -> Self {
        match raw {
            RawFleet::List(sensors) | RawFleet::Wrapped { sensors } => SensorFleet { sensors },
        }
    }
}

/// Identifier that may be numeric or textual on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawId")]
pub struct RecordId(pub String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

impl From<RawId> for RecordId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Number(n) => RecordId(n.to_string()),
            RawId::Text(s) => RecordId(s),
        }
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        RecordId(value.to_string())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Query string of the alert list: `?type=&priority=&status=`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlertQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
}

/// Accepts RFC 3339 and the naive ISO form the backend emits (read as UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
    ]
    .iter()
    .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
    .map(|naive| naive.and_utc())
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(parse_timestamp))
}

fn lenient_signal<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Some(serde_json::Value::String(s)) => leading_integer(&s),
        _ => None,
    })
}

// "-67 dBm" reads as -67, the way a lenient integer parse would.
fn leading_integer(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    let end = raw
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
        .map(|(i, _)| i)
        .unwrap_or(raw.len());
    raw[..end].parse().ok()
}
