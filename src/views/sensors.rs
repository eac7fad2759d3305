use crate::charts::{self, ChartSlot};
use crate::fetcher::{ApiClient, Resource};
use crate::format;
use crate::models::{Sensor, SensorFleet};
use crate::scheduler::Refresh;
use crate::views::{Rendered, Section};
use serde::Serialize;
use tokio::sync::RwLock;

const ACTIVE_STATUS: &str = "ativo";
const UNKNOWN_PROTOCOL: &str = "Desconhecido";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorsView {
    pub fleet: Section<FleetSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FleetSummary {
    pub total_sensors: usize,
    pub active_sensors: usize,
    pub total_readings: String,
    pub total_protocols: usize,
    pub protocols: Vec<ProtocolShare>,
    pub battery: BatteryBuckets,
    pub signal: SignalBuckets,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProtocolShare {
    pub protocol: String,
    pub sensors: usize,
}

/// Battery levels: excellent 90% and up, good 70-89%, critical below 50%.
/// Sensors between 50% and 69% fall in no bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatteryBuckets {
    pub excellent: usize,
    pub good: usize,
    pub critical: usize,
}

/// Signal in dBm: excellent -60..=-40, good -70..=-61, poor below -70.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SignalBuckets {
    pub excellent: usize,
    pub good: usize,
    pub poor: usize,
}

/// Protocol counts in the order protocols first appear in the fleet.
pub fn protocol_distribution(sensors: &[Sensor]) -> Vec<ProtocolShare> {
    let mut shares: Vec<ProtocolShare> = Vec::new();
    for sensor in sensors {
        let protocol = sensor
            .protocol
            .as_deref()
            .filter(|p| !p.is_empty())
            .unwrap_or(UNKNOWN_PROTOCOL);
        match shares.iter_mut().find(|share| share.protocol == protocol) {
            Some(share) => share.sensors += 1,
            None => shares.push(ProtocolShare {
                protocol: protocol.to_string(),
                sensors: 1,
            }),
        }
    }
    shares
}

pub fn battery_buckets(sensors: &[Sensor]) -> BatteryBuckets {
    sensors
        .iter()
        .filter_map(|sensor| sensor.battery)
        .fold(BatteryBuckets::default(), |mut buckets, level| {
            if level >= 90.0 {
                buckets.excellent += 1;
            } else if level >= 70.0 {
                buckets.good += 1;
            } else if level < 50.0 {
                buckets.critical += 1;
            }
            buckets
        })
}

pub fn signal_buckets(sensors: &[Sensor]) -> SignalBuckets {
    sensors
        .iter()
        .filter_map(|sensor| sensor.signal_strength)
        // Zero means the sensor reported nothing.
        .filter(|dbm| *dbm != 0)
        .fold(SignalBuckets::default(), |mut buckets, dbm| {
            if (-60..=-40).contains(&dbm) {
                buckets.excellent += 1;
            } else if (-70..=-61).contains(&dbm) {
                buckets.good += 1;
            } else if dbm < -70 {
                buckets.poor += 1;
            }
            buckets
        })
}

pub fn summarize(sensors: &[Sensor]) -> FleetSummary {
    let protocols = protocol_distribution(sensors);
    FleetSummary {
        total_sensors: sensors.len(),
        active_sensors: sensors
            .iter()
            .filter(|s| s.status.as_deref() == Some(ACTIVE_STATUS))
            .count(),
        total_readings: format::thousands(
            sensors.iter().filter_map(|s| s.total_readings).sum(),
        ),
        total_protocols: protocols.len(),
        protocols,
        battery: battery_buckets(sensors),
        signal: signal_buckets(sensors),
    }
}

pub fn render(fleet: Option<SensorFleet>) -> Rendered<SensorsView> {
    // An empty fleet is treated like a failed fetch.
    let sensors = fleet
        .map(|fleet| fleet.sensors)
        .filter(|sensors| !sensors.is_empty());
    Rendered {
        view: SensorsView {
            fleet: Section::from_snapshot(sensors.as_deref(), summarize),
        },
        charts: vec![ChartSlot::new(
            "sensorsDistributionChart",
            charts::sensors_distribution(sensors.as_deref()),
        )],
    }
}

pub struct SensorsPage {
    api: ApiClient,
    rendered: RwLock<Rendered<SensorsView>>,
}

impl SensorsPage {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            rendered: RwLock::new(Rendered {
                view: SensorsView {
                    fleet: Section::Loading,
                },
                charts: Vec::new(),
            }),
        }
    }

    pub async fn current(&self) -> Rendered<SensorsView> {
        self.rendered.read().await.clone()
    }
}

impl Refresh for SensorsPage {
    fn name(&self) -> &'static str {
        "sensors"
    }

    async fn refresh(&self) {
        let fleet = self.api.fetch::<SensorFleet>(Resource::Sensors).await;
        let rendered = render(fleet);
        *self.rendered.write().await = rendered;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fleet() -> Vec<Sensor> {
        serde_json::from_value(json!([
            {"serial_number": "LORA-1", "status": "ativo", "protocol": "LoRa",
             "total_readings": 3619, "battery": 95.0, "signal_strength": "-45 dBm"},
            {"serial_number": "ZIGB-1", "status": "inativo", "protocol": "Zigbee",
             "total_readings": 3703, "battery": 72.0, "signal_strength": -65},
            {"serial_number": "LORA-2", "status": "ativo", "protocol": "LoRa",
             "total_readings": 4036, "battery": 60.0, "signal_strength": -80},
            {"serial_number": "X-1", "battery": 30.0, "signal_strength": 0}
        ]))
        .unwrap()
    }

    #[test]
    fn overview_counts() {
        let summary = summarize(&fleet());
        assert_eq!(summary.total_sensors, 4);
        assert_eq!(summary.active_sensors, 2);
        assert_eq!(summary.total_readings, "11.358");
        assert_eq!(summary.total_protocols, 3);
    }

    #[test]
    fn protocols_keep_first_seen_order() {
        let shares = protocol_distribution(&fleet());
        let pairs: Vec<(&str, usize)> = shares
            .iter()
            .map(|s| (s.protocol.as_str(), s.sensors))
            .collect();
        assert_eq!(pairs, [("LoRa", 2), ("Zigbee", 1), ("Desconhecido", 1)]);
    }

    #[test]
    fn battery_gap_between_50_and_69_is_not_counted() {
        assert_eq!(
            battery_buckets(&fleet()),
            BatteryBuckets {
                excellent: 1,
                good: 1,
                critical: 1,
            }
        );
    }

    #[test]
    fn signal_buckets_skip_missing_readings() {
        assert_eq!(
            signal_buckets(&fleet()),
            SignalBuckets {
                excellent: 1,
                good: 1,
                poor: 1,
            }
        );
    }

    #[test]
    fn empty_fleet_is_no_data() {
        let rendered = render(Some(SensorFleet::default()));
        assert!(rendered.view.fleet.is_no_data());
        assert_eq!(rendered.charts[0].spec.data.labels.len(), 6);
    }
}
