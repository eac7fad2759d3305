use crate::config::RefreshPeriods;
use crate::fetcher::ApiClient;
use crate::scheduler::{Refresh, spawn_refresh_loop};
use crate::views::alerts::AlertsPage;
use crate::views::areas::AreasPage;
use crate::views::freshness::FreshnessIndicator;
use crate::views::main_page::MainPage;
use crate::views::pool::PoolPage;
use crate::views::sensors::SensorsPage;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Every page component plus the header indicator. Pages never see each
/// other; handlers only read them, except for alert actions.
#[derive(Clone)]
pub struct AppState {
    pub main: Arc<MainPage>,
    pub areas: Arc<AreasPage>,
    pub alerts: Arc<AlertsPage>,
    pub pool: Arc<PoolPage>,
    pub sensors: Arc<SensorsPage>,
    pub freshness: Arc<FreshnessIndicator>,
    pub refresh: RefreshPeriods,
}

impl AppState {
    pub fn new(api: ApiClient, refresh: RefreshPeriods) -> Self {
        Self {
            main: Arc::new(MainPage::new(api.clone())),
            areas: Arc::new(AreasPage::new(api.clone())),
            alerts: Arc::new(AlertsPage::new(api.clone())),
            pool: Arc::new(PoolPage::new(api.clone())),
            sensors: Arc::new(SensorsPage::new(api.clone())),
            freshness: Arc::new(FreshnessIndicator::new(api)),
            refresh,
        }
    }

    /// Starts one independent loop per page.
    pub fn spawn_refresh_loops(&self) -> Vec<JoinHandle<()>> {
        let periods = self.refresh;
        vec![
            spawn_refresh_loop(Arc::clone(&self.main), periods.main),
            spawn_refresh_loop(Arc::clone(&self.areas), periods.areas),
            spawn_refresh_loop(Arc::clone(&self.alerts), periods.alerts),
            spawn_refresh_loop(Arc::clone(&self.pool), periods.pool),
            spawn_refresh_loop(Arc::clone(&self.sensors), periods.sensors),
            spawn_refresh_loop(Arc::clone(&self.freshness), periods.freshness),
        ]
    }

    /// Runs a single pass of every page and waits for all of them.
    pub async fn refresh_once(&self) {
        tokio::join!(
            self.main.refresh(),
            self.areas.refresh(),
            self.alerts.refresh(),
            self.pool.refresh(),
            self.sensors.refresh(),
            self.freshness.refresh(),
        );
    }
}
