//! Stub of the monitoring backend served by wiremock.

#![allow(dead_code)]

use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

pub const API_PREFIX: &str = "/smartceu/api/v1/dashboard";

pub struct MockBackend {
    pub server: MockServer,
}

impl MockBackend {
    /// Backend answering every endpoint with the default fixtures.
    pub async fn start() -> Self {
        let backend = Self::empty().await;
        for (resource, body) in fixtures() {
            backend.serve(resource, body).await;
        }
        backend
    }

    /// Backend with no endpoint mounted: every request gets a 404.
    pub async fn empty() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn api_base(&self) -> String {
        format!("{}{API_PREFIX}", self.server.uri())
    }

    pub async fn serve(&self, resource: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(format!("{API_PREFIX}/{resource}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    pub async fn fail(&self, resource: &str, status: u16) {
        Mock::given(method("GET"))
            .and(path(format!("{API_PREFIX}/{resource}")))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    pub async fn serve_raw(&self, resource: &str, body: &str) {
        Mock::given(method("GET"))
            .and(path(format!("{API_PREFIX}/{resource}")))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    pub async fn reset(&self) {
        self.server.reset().await;
    }
}

pub fn fixtures() -> Vec<(&'static str, Value)> {
    vec![
        (
            "current-stats",
            json!({
                "current_people": 85,
                "max_capacity": 100,
                "capacity_percentage": 85.0,
                "entries_today": 412,
                "last_reading": "2026-10-17T11:58:00"
            }),
        ),
        (
            "advanced-stats",
            json!({
                "daily_average": 380.5,
                "average_stay_minutes": 95,
                "today_peak": 140,
                "trend_percentage": 4.2,
                "trend_direction": "up"
            }),
        ),
        (
            "people-flow",
            json!({
                "labels": ["08:00", "10:00", "12:00"],
                "data": [12, 48, 85]
            }),
        ),
        (
            "peak-prediction",
            json!({
                "peak_hour": "16:00",
                "capacity_prediction": 92.4,
                "confidence": 0.8
            }),
        ),
        (
            "areas-occupation",
            json!({
                "areas": [
                    {"id": 1, "name": "Piscina", "current_people": 46, "capacity": 50,
                     "occupation_percentage": 92.0},
                    {"id": 2, "name": "Biblioteca", "current_people": 12, "capacity": 60,
                     "occupation_percentage": 20.0}
                ],
                "total_people": 58
            }),
        ),
        (
            "pool/current",
            json!({
                "temperature": 27.5,
                "ambient_temperature": 24.0,
                "current_people": 20,
                "capacity": 50,
                "operational_status": "open",
                "last_update": "2026-10-17T11:50:00"
            }),
        ),
        (
            "pool/quality",
            json!({
                "ph": 7.5,
                "chlorine": 2.0,
                "alkalinity": 100,
                "turbidity": 1.2
            }),
        ),
        (
            "alerts/active",
            json!({
                "total": 3,
                "alerts": [
                    {"id": 1, "type": "capacity", "severity": "critical", "priority": "high",
                     "status": "active", "title": "Piscina lotada",
                     "message": "Ocupação acima de 90%", "area": "Piscina",
                     "created_at": "2026-10-17T11:40:00"},
                    {"id": 2, "type": "maintenance", "severity": "warning", "priority": "medium",
                     "status": "active", "title": "Filtro",
                     "created_at": "2026-10-17T10:00:00"},
                    {"id": 3, "type": "system", "severity": "info", "priority": "low",
                     "status": "active", "created_at": "2026-10-17T09:00:00"}
                ]
            }),
        ),
        (
            "sensors",
            json!([
                {"serial_number": "LORA-A1B2C3D4", "status": "ativo", "protocol": "LoRa",
                 "total_readings": 3619, "battery": 92.0, "signal_strength": "-52 dBm"},
                {"serial_number": "ZIGB-E5F6G7H8", "status": "ativo", "protocol": "Zigbee",
                 "total_readings": 3703, "battery": 41.0, "signal_strength": -74}
            ]),
        ),
    ]
}
