// 位置存储
// 每个用户只保留一条最新位置记录，覆盖写，不保留历史
// 分片并发Map保证不同用户的写入互不阻塞，同一用户的写入由分片锁串行化

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::common::MapLocation;
use crate::error::EngineError;

/// 用户最近一次上报的位置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserLocation {
    pub user_id: String,
    pub position: MapLocation,
    pub updated_at: DateTime<Utc>,
}

/// 位置表：user_id -> 最新位置
/// 陈旧不是错误，updated_at 原样返回，由展示层自行决定TTL策略
#[derive(Debug, Default)]
pub struct LocationStore {
    rows: DashMap<String, UserLocation>,
}

impl LocationStore {
    pub fn new() -> Self {
        Self {
            rows: DashMap::new(),
        }
    }

    /// 插入或覆盖用户位置
    /// 坐标非法时返回 InvalidPosition，存储保持不变；后写覆盖先写
    pub fn upsert(&self, user_id: &str, position: MapLocation) -> Result<(), EngineError> {
        if !position.is_valid() {
            return Err(EngineError::InvalidPosition {
                latitude: position.latitude,
                longitude: position.longitude,
            });
        }

        self.rows.insert(
            user_id.to_string(),
            UserLocation {
                user_id: user_id.to_string(),
                position,
                updated_at: Utc::now(),
            },
        );

        Ok(())
    }

    pub fn get(&self, user_id: &str) -> Option<UserLocation> {
        self.rows.get(user_id).map(|row| row.value().clone())
    }

    /// 批量读取，没有记录的用户静默跳过
    pub fn get_many(&self, user_ids: &[String]) -> HashMap<String, UserLocation> {
        user_ids
            .iter()
            .filter_map(|id| self.get(id).map(|row| (id.clone(), row)))
            .collect()
    }

    /// 当前有位置记录的所有用户
    pub fn user_ids(&self) -> Vec<String> {
        self.rows.iter().map(|row| row.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
