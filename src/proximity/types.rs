use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::MapLocation;
use crate::geo::BoundingBox;

/// 附近查询返回的事件条目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub event_id: String,
    pub title: String,
    pub position: MapLocation,
    pub created_at: DateTime<Utc>,
    pub is_private: bool,
    pub creator_id: String,
}

/// 附近查询结果，按距离升序排列
#[derive(Debug, Clone, Serialize)]
pub struct ProximityResult<T> {
    pub entity: T,
    pub distance_km: f64,
}

/// 事件仓库，由外部事件模块实现
/// 负责返回边界盒内、查看者可见（公开或本人创建）的候选事件
pub trait EventRepository: Send + Sync {
    fn events_in_bounding_box(&self, bbox: &BoundingBox, viewer_id: &str) -> Vec<Event>;
}
