use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::proximity::{Event, ProximityResult};

/// 附近查询参数
#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    pub viewer_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: Option<f64>,
    pub limit: Option<i64>,
}

/// 附近事件条目
#[derive(Debug, Serialize)]
pub struct NearbyEvent {
    pub event_id: String,
    pub title: String,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: DateTime<Utc>,
    pub distance_km: f64,
}

impl From<ProximityResult<Event>> for NearbyEvent {
    fn from(result: ProximityResult<Event>) -> Self {
        Self {
            event_id: result.entity.event_id,
            title: result.entity.title,
            latitude: result.entity.position.latitude,
            longitude: result.entity.position.longitude,
            created_at: result.entity.created_at,
            distance_km: result.distance_km,
        }
    }
}

/// 附近用户条目
#[derive(Debug, Serialize)]
pub struct NearbyUser {
    pub user_id: String,
    pub distance_km: f64,
}

impl From<ProximityResult<String>> for NearbyUser {
    fn from(result: ProximityResult<String>) -> Self {
        Self {
            user_id: result.entity,
            distance_km: result.distance_km,
        }
    }
}
