use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// 上报位置请求
#[derive(Debug, Deserialize)]
pub struct ReportPositionRequest {
    pub user_id: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize)]
pub struct ViewerQuery {
    pub viewer_id: String,
}

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub user_id: String,
}

/// 位置记录响应，updated_at 原样返回，陈旧判断交给调用方
#[derive(Debug, Serialize)]
pub struct LocationRecord {
    pub user_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 更新共享偏好请求，user_id 必须是偏好的所有者
#[derive(Debug, Deserialize)]
pub struct UpdateSharingRequest {
    pub user_id: String,
    pub enabled: bool,
    pub share_with_all_friends: bool,
    #[serde(default)]
    pub share_with_group_ids: HashSet<String>,
    pub precision_full: bool,
    #[serde(default)]
    pub background_tracking: bool,
}

/// 可见位置条目
#[derive(Debug, Serialize)]
pub struct VisiblePosition {
    pub user_id: String,
    pub latitude: f64,
    pub longitude: f64,
}
