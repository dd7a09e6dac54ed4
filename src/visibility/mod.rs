// 可见性解析
// 根据共享偏好、好友关系与群组关系决定查看者能看到哪些用户的位置
// 纯读操作，组合位置存储与两个外部协作者，不产生副作用

mod types;

pub use types::{SharingPreferences, SharingSettings, SocialGraph};

use std::collections::HashMap;
use std::sync::Arc;

use crate::common::MapLocation;
use crate::store::LocationStore;

pub struct VisibilityResolver {
    store: Arc<LocationStore>,
    graph: Arc<dyn SocialGraph>,
    settings: Arc<dyn SharingSettings>,
}

impl VisibilityResolver {
    pub fn new(
        store: Arc<LocationStore>,
        graph: Arc<dyn SocialGraph>,
        settings: Arc<dyn SharingSettings>,
    ) -> Self {
        Self {
            store,
            graph,
            settings,
        }
    }

    /// 解析查看者可以看到的候选用户位置
    /// 返回的坐标已按候选人的精度偏好降级；未通过共享规则的候选人不会出现在结果中
    pub fn visible_to(
        &self,
        viewer_id: &str,
        candidate_ids: &[String],
    ) -> HashMap<String, MapLocation> {
        let mut visible = HashMap::new();

        for candidate_id in candidate_ids {
            // 自己对自己永远可见，且不降精度
            if candidate_id == viewer_id {
                if let Some(row) = self.store.get(candidate_id) {
                    visible.insert(candidate_id.clone(), row.position);
                }
                continue;
            }

            // 没有偏好记录视为未开启共享
            let Some(prefs) = self.settings.sharing_preferences(candidate_id) else {
                continue;
            };
            if !prefs.enabled {
                continue;
            }

            let allowed = if prefs.share_with_all_friends {
                self.graph.are_friends(viewer_id, candidate_id)
            } else {
                // 群组范围共享：查看者必须与候选人同在至少一个被共享的群组
                let shared = self.graph.groups_shared_between(viewer_id, candidate_id);
                shared
                    .iter()
                    .any(|group_id| prefs.share_with_group_ids.contains(group_id))
            };
            if !allowed {
                continue;
            }

            let Some(row) = self.store.get(candidate_id) else {
                continue;
            };
            let position = if prefs.precision_full {
                row.position
            } else {
                row.position.coarsened()
            };
            visible.insert(candidate_id.clone(), position);
        }

        visible
    }
}
