pub mod alerts;
pub mod app;
pub mod charts;
pub mod config;
pub mod errors;
pub mod fetcher;
pub mod format;
pub mod handlers;
pub mod models;
pub mod scheduler;
pub mod state;
pub mod thresholds;
pub mod ui;
pub mod views;

pub use app::router;
pub use config::Config;
pub use fetcher::ApiClient;
pub use state::AppState;
