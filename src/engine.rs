// 引擎门面
// 对外暴露位置上报、可见位置解析与附近查询，内部组合各子模块

use std::collections::HashMap;
use std::sync::Arc;

use crate::common::MapLocation;
use crate::error::EngineError;
use crate::proximity::{Event, EventRepository, ProximityQuery, ProximityResult};
use crate::store::{LocationStore, UserLocation};
use crate::tracker::PositionSink;
use crate::visibility::{SharingSettings, SocialGraph, VisibilityResolver};

pub struct LocationEngine {
    store: Arc<LocationStore>,
    resolver: Arc<VisibilityResolver>,
    proximity: ProximityQuery,
}

impl LocationEngine {
    pub fn new(
        graph: Arc<dyn SocialGraph>,
        settings: Arc<dyn SharingSettings>,
        events: Arc<dyn EventRepository>,
    ) -> Self {
        let store = Arc::new(LocationStore::new());
        let resolver = Arc::new(VisibilityResolver::new(
            store.clone(),
            graph,
            settings,
        ));
        let proximity = ProximityQuery::new(store.clone(), resolver.clone(), events);
        Self {
            store,
            resolver,
            proximity,
        }
    }

    /// 位置存储只通过引擎暴露，外部不直接写
    pub fn store(&self) -> &Arc<LocationStore> {
        &self.store
    }

    /// 上报用户位置，坐标非法时同步报错且不写入
    pub fn report_position(
        &self,
        user_id: &str,
        position: MapLocation,
    ) -> Result<(), EngineError> {
        self.store.upsert(user_id, position)
    }

    /// 读取用户的最新位置记录
    pub fn get_location(&self, user_id: &str) -> Result<UserLocation, EngineError> {
        self.store
            .get(user_id)
            .ok_or_else(|| EngineError::NotFound(user_id.to_string()))
    }

    /// 查看者当前能看到的所有用户位置，已按各自偏好降精度
    pub fn get_visible_positions(&self, viewer_id: &str) -> HashMap<String, MapLocation> {
        let candidates = self.store.user_ids();
        self.resolver.visible_to(viewer_id, &candidates)
    }

    /// 查看者可见、给定半径内的事件
    pub fn find_nearby_events(
        &self,
        center: &MapLocation,
        radius_km: f64,
        viewer_id: &str,
        limit: i64,
    ) -> Result<Vec<ProximityResult<Event>>, EngineError> {
        self.proximity
            .nearby_events(center, radius_km, viewer_id, limit)
    }

    /// 查看者可见、给定半径内的其他用户
    pub fn find_nearby_users(
        &self,
        viewer_id: &str,
        center: &MapLocation,
        radius_km: f64,
        limit: i64,
    ) -> Result<Vec<ProximityResult<String>>, EngineError> {
        self.proximity
            .nearby_users(viewer_id, center, radius_km, limit)
    }
}

// 本地部署下，跟踪器直接把采集到的位置写入引擎
impl PositionSink for LocationEngine {
    fn report(&self, user_id: &str, position: MapLocation) -> Result<(), EngineError> {
        self.report_position(user_id, position)
    }
}
