use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::tracker::TrackerConfig;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub track_interval_secs: u64,
    pub acquire_timeout_secs: u64,
    pub min_move_km: f64,
    pub max_search_radius_km: f64,
    pub default_search_radius_km: f64,
    pub default_result_limit: i64,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenv::dotenv().ok();

        Ok(Config {
            server_host: env::var("SERVER_HOST")?,
            server_port: env::var("SERVER_PORT")?.parse().unwrap_or(3000),
            track_interval_secs: env_or("TRACK_INTERVAL_SECS", 10),
            acquire_timeout_secs: env_or("ACQUIRE_TIMEOUT_SECS", 8),
            min_move_km: env_or("MIN_MOVE_KM", 0.01),
            max_search_radius_km: env_or("MAX_SEARCH_RADIUS_KM", 50.0),
            default_search_radius_km: env_or("DEFAULT_SEARCH_RADIUS_KM", 5.0),
            default_result_limit: env_or("DEFAULT_RESULT_LIMIT", 20),
        })
    }

    pub fn track_interval(&self) -> Duration {
        Duration::from_secs(self.track_interval_secs)
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    /// 跟踪器参数取自同一份配置
    pub fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig {
            interval: self.track_interval(),
            acquire_timeout: self.acquire_timeout(),
            min_move_km: self.min_move_km,
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
