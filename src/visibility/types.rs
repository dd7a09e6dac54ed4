use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// 用户的位置共享偏好
/// 只有本人（经由外部设置服务）可以修改；enabled 为 false 时对任何人都不可见
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharingPreferences {
    pub enabled: bool,
    pub share_with_all_friends: bool,
    #[serde(default)]
    pub share_with_group_ids: HashSet<String>,
    pub precision_full: bool,
    #[serde(default)]
    pub background_tracking: bool,
}

impl Default for SharingPreferences {
    fn default() -> Self {
        Self {
            enabled: false,
            share_with_all_friends: false,
            share_with_group_ids: HashSet::new(),
            precision_full: false,
            background_tracking: false,
        }
    }
}

/// 好友与群组关系查询，由外部社交模块实现，引擎只读
pub trait SocialGraph: Send + Sync {
    /// 两个用户是否互为好友（对称关系）
    fn are_friends(&self, a: &str, b: &str) -> bool;

    /// 查看者与候选人共同所在的群组
    fn groups_shared_between(&self, viewer_id: &str, candidate_id: &str) -> HashSet<String>;
}

/// 共享偏好读取，由外部设置模块实现，引擎只读
pub trait SharingSettings: Send + Sync {
    /// 用户的共享偏好，没有记录视为未开启共享
    fn sharing_preferences(&self, user_id: &str) -> Option<SharingPreferences>;
}
