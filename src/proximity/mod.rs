// 附近查询
// 先用经纬度边界盒粗筛，再用Haversine精确过滤，按距离升序返回
// 纯读操作，无副作用；空结果不是错误

mod types;

pub use types::{Event, EventRepository, ProximityResult};

use std::cmp::Ordering;
use std::sync::Arc;

use crate::common::MapLocation;
use crate::error::EngineError;
use crate::geo;
use crate::store::LocationStore;
use crate::visibility::VisibilityResolver;

pub struct ProximityQuery {
    store: Arc<LocationStore>,
    resolver: Arc<VisibilityResolver>,
    events: Arc<dyn EventRepository>,
}

impl ProximityQuery {
    pub fn new(
        store: Arc<LocationStore>,
        resolver: Arc<VisibilityResolver>,
        events: Arc<dyn EventRepository>,
    ) -> Self {
        Self {
            store,
            resolver,
            events,
        }
    }

    /// 查看者可见、距中心点 radius_km 以内的事件，按距离升序，最多 limit 条
    /// 距离相同时按事件创建顺序排列
    pub fn nearby_events(
        &self,
        center: &MapLocation,
        radius_km: f64,
        viewer_id: &str,
        limit: i64,
    ) -> Result<Vec<ProximityResult<Event>>, EngineError> {
        check_radius(radius_km)?;
        check_limit(limit)?;
        check_center(center)?;

        let bbox = geo::bounding_box(center, radius_km);
        let mut candidates = self.events.events_in_bounding_box(&bbox, viewer_id);
        // 事件级可见性（公开或本人创建）由事件仓库负责，这里不重复判断

        // 先按创建时间排序，稳定排序保证距离相同的结果保持创建顺序
        candidates.sort_by_key(|event| event.created_at);

        let mut results: Vec<ProximityResult<Event>> = candidates
            .into_iter()
            .map(|event| {
                let distance_km = geo::distance_km(&event.position, center);
                ProximityResult {
                    entity: event,
                    distance_km,
                }
            })
            // 边界盒在角落处会放进假阳性，这里用精确距离过滤
            .filter(|result| result.distance_km <= radius_km)
            .collect();

        sort_by_distance(&mut results);
        results.truncate(limit as usize);
        Ok(results)
    }

    /// 查看者可见、距中心点 radius_km 以内的其他用户
    /// 距离基于可见性解析后的（可能已降精度的）坐标计算，原始坐标不参与任何输出
    pub fn nearby_users(
        &self,
        viewer_id: &str,
        center: &MapLocation,
        radius_km: f64,
        limit: i64,
    ) -> Result<Vec<ProximityResult<String>>, EngineError> {
        check_radius(radius_km)?;
        check_limit(limit)?;
        check_center(center)?;

        let bbox = geo::bounding_box(center, radius_km);
        let candidates = self.store.user_ids();
        let visible = self.resolver.visible_to(viewer_id, &candidates);

        let mut results: Vec<ProximityResult<String>> = visible
            .into_iter()
            .filter(|(user_id, _)| user_id != viewer_id)
            .filter(|(_, position)| bbox.contains(position))
            .map(|(user_id, position)| ProximityResult {
                distance_km: geo::distance_km(&position, center),
                entity: user_id,
            })
            .filter(|result| result.distance_km <= radius_km)
            .collect();

        // 先按用户ID排序，距离相同时结果保持确定
        results.sort_by(|a, b| a.entity.cmp(&b.entity));
        sort_by_distance(&mut results);
        results.truncate(limit as usize);
        Ok(results)
    }
}

fn check_radius(radius_km: f64) -> Result<(), EngineError> {
    if !radius_km.is_finite() || radius_km <= 0.0 {
        return Err(EngineError::InvalidRadius(radius_km));
    }
    Ok(())
}

fn check_limit(limit: i64) -> Result<(), EngineError> {
    if limit <= 0 {
        return Err(EngineError::InvalidLimit(limit));
    }
    Ok(())
}

fn check_center(center: &MapLocation) -> Result<(), EngineError> {
    if !center.is_valid() {
        return Err(EngineError::InvalidPosition {
            latitude: center.latitude,
            longitude: center.longitude,
        });
    }
    Ok(())
}

fn sort_by_distance<T>(results: &mut [ProximityResult<T>]) {
    results.sort_by(|a, b| {
        a.distance_km
            .partial_cmp(&b.distance_km)
            .unwrap_or(Ordering::Equal)
    });
}
