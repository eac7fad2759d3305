use crate::fetcher::{ApiClient, Resource};
use crate::format::{self, NO_DATA};
use crate::models::CurrentStats;
use crate::scheduler::Refresh;
use crate::thresholds::{Level, READING_AGE};
use crate::views::Clock;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

/// Header badge telling how old the newest sensor reading is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Freshness {
    pub text: String,
    pub level: Level,
    pub icon: &'static str,
    pub age_minutes: Option<i64>,
}

impl Freshness {
    pub fn loading() -> Self {
        Self {
            text: "Carregando...".to_string(),
            level: Level::Normal,
            icon: "fa-spinner",
            age_minutes: None,
        }
    }

    pub fn no_data() -> Self {
        Self {
            text: NO_DATA.to_string(),
            level: Level::Critical,
            icon: "fa-exclamation-triangle",
            age_minutes: None,
        }
    }
}

fn icon(level: Level) -> &'static str {
    match level {
        Level::Normal | Level::Moderate => "fa-check-circle",
        Level::Warning => "fa-clock",
        Level::Critical => "fa-exclamation-triangle",
    }
}

pub fn classify(last_reading: Option<&DateTime<Utc>>, clock: &Clock) -> Freshness {
    let Some(at) = last_reading else {
        return Freshness::no_data();
    };
    let minutes = (clock.now - *at).num_minutes();
    let level = READING_AGE.level(minutes as f64);
    Freshness {
        text: format!(
            "Última Leitura: {}",
            format::date_time(at, &clock.offset)
        ),
        level,
        icon: icon(level),
        age_minutes: Some(minutes),
    }
}

pub fn render(stats: Option<CurrentStats>, clock: &Clock) -> Freshness {
    classify(
        stats.as_ref().and_then(|stats| stats.last_reading.as_ref()),
        clock,
    )
}

pub struct FreshnessIndicator {
    api: ApiClient,
    current: RwLock<Freshness>,
}

impl FreshnessIndicator {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            current: RwLock::new(Freshness::loading()),
        }
    }

    pub async fn current(&self) -> Freshness {
        self.current.read().await.clone()
    }
}

impl Refresh for FreshnessIndicator {
    fn name(&self) -> &'static str {
        "freshness"
    }

    async fn refresh(&self) {
        let stats = self
            .api
            .fetch::<CurrentStats>(Resource::CurrentStats)
            .await;
        let freshness = render(stats, &Clock::system());
        *self.current.write().await = freshness;
    }
}
