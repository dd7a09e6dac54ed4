// 外部协作者的进程内实现
// 真实产品中好友、群组、事件与共享设置由独立服务提供，引擎只消费它们的接口
// 这里的实现用于本地部署、演示与测试

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use crate::common::MapLocation;
use crate::geo::BoundingBox;
use crate::proximity::{Event, EventRepository};
use crate::visibility::{SharingPreferences, SharingSettings, SocialGraph};

/// 好友与群组成员关系
#[derive(Debug, Default)]
pub struct InMemorySocialGraph {
    friendships: DashMap<String, HashSet<String>>,
    group_members: DashMap<String, HashSet<String>>,
}

impl InMemorySocialGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// 建立对称好友关系
    pub fn add_friendship(&self, a: &str, b: &str) {
        self.friendships
            .entry(a.to_string())
            .or_default()
            .insert(b.to_string());
        self.friendships
            .entry(b.to_string())
            .or_default()
            .insert(a.to_string());
    }

    pub fn add_group_member(&self, group_id: &str, user_id: &str) {
        self.group_members
            .entry(group_id.to_string())
            .or_default()
            .insert(user_id.to_string());
    }
}

impl SocialGraph for InMemorySocialGraph {
    fn are_friends(&self, a: &str, b: &str) -> bool {
        self.friendships
            .get(a)
            .map(|friends| friends.contains(b))
            .unwrap_or(false)
    }

    fn groups_shared_between(&self, viewer_id: &str, candidate_id: &str) -> HashSet<String> {
        self.group_members
            .iter()
            .filter(|entry| entry.value().contains(viewer_id) && entry.value().contains(candidate_id))
            .map(|entry| entry.key().clone())
            .collect()
    }
}

/// 共享偏好表
#[derive(Debug, Default)]
pub struct InMemorySharingSettings {
    prefs: DashMap<String, SharingPreferences>,
}

impl InMemorySharingSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入用户的共享偏好，只应由用户本人的请求触发
    pub fn set(&self, user_id: &str, prefs: SharingPreferences) {
        self.prefs.insert(user_id.to_string(), prefs);
    }
}

impl SharingSettings for InMemorySharingSettings {
    fn sharing_preferences(&self, user_id: &str) -> Option<SharingPreferences> {
        self.prefs.get(user_id).map(|entry| entry.value().clone())
    }
}

/// 事件表，负责边界盒粗筛与事件级可见性（公开或本人创建）
#[derive(Debug, Default)]
pub struct InMemoryEventRepository {
    events: DashMap<String, Event>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 录入事件，返回生成的事件ID
    pub fn insert(
        &self,
        title: &str,
        position: MapLocation,
        is_private: bool,
        creator_id: &str,
    ) -> String {
        self.insert_at(title, position, is_private, creator_id, Utc::now())
    }

    /// 以指定创建时间录入事件
    pub fn insert_at(
        &self,
        title: &str,
        position: MapLocation,
        is_private: bool,
        creator_id: &str,
        created_at: DateTime<Utc>,
    ) -> String {
        let event_id = Uuid::new_v4().to_string();
        self.events.insert(
            event_id.clone(),
            Event {
                event_id: event_id.clone(),
                title: title.to_string(),
                position,
                created_at,
                is_private,
                creator_id: creator_id.to_string(),
            },
        );
        event_id
    }
}

impl EventRepository for InMemoryEventRepository {
    fn events_in_bounding_box(&self, bbox: &BoundingBox, viewer_id: &str) -> Vec<Event> {
        self.events
            .iter()
            .filter(|entry| bbox.contains(&entry.position))
            .filter(|entry| !entry.is_private || entry.creator_id == viewer_id)
            .map(|entry| entry.value().clone())
            .collect()
    }
}
