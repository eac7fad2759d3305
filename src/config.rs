use std::{env, fmt, net::SocketAddr, time::Duration};

pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:5000/smartceu/api/v1/dashboard";
const DEFAULT_PORT: u16 = 8080;

/// Refresh cadence of every page. Alerts are polled fastest, the sensor
/// fleet slowest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshPeriods {
    pub main: Duration,
    pub areas: Duration,
    pub alerts: Duration,
    pub pool: Duration,
    pub sensors: Duration,
    pub freshness: Duration,
}

impl Default for RefreshPeriods {
    fn default() -> Self {
        Self {
            main: Duration::from_secs(30),
            areas: Duration::from_secs(30),
            alerts: Duration::from_secs(15),
            pool: Duration::from_secs(30),
            sensors: Duration::from_secs(60),
            freshness: Duration::from_secs(30),
        }
    }
}

impl RefreshPeriods {
    pub fn uniform(period: Duration) -> Self {
        Self {
            main: period,
            areas: period,
            alerts: period,
            pool: period,
            sensors: period,
            freshness: period,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub api_base: String,
    pub refresh: RefreshPeriods,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            api_base: DEFAULT_API_BASE.to_string(),
            refresh: RefreshPeriods::default(),
        }
    }
}

#[derive(Debug)]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid value for {}: {:?}", self.var, self.value)
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source so the
    /// parsing rules can be exercised without touching the process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(value) = lookup("PORT") {
            config.port = value.trim().parse().map_err(|_| ConfigError {
                var: "PORT",
                value: value.clone(),
            })?;
        }

        if let Some(value) = lookup("DASHBOARD_API_BASE") {
            let trimmed = value.trim().trim_end_matches('/');
            if trimmed.is_empty() {
                return Err(ConfigError {
                    var: "DASHBOARD_API_BASE",
                    value,
                });
            }
            config.api_base = trimmed.to_string();
        }

        if let Some(value) = lookup("DASHBOARD_REFRESH_MS") {
            let millis: u64 = value
                .trim()
                .parse()
                .ok()
                .filter(|millis| *millis > 0)
                .ok_or_else(|| ConfigError {
                    var: "DASHBOARD_REFRESH_MS",
                    value: value.clone(),
                })?;
            config.refresh = RefreshPeriods::uniform(Duration::from_millis(millis));
        }

        Ok(config)
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}
