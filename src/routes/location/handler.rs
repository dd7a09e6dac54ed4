use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::AppState;
use crate::common::MapLocation;
use crate::utils::{error_to_api_response, success_to_api_response};
use crate::visibility::SharingPreferences;

use super::model::{
    LocationRecord, ReportPositionRequest, UpdateSharingRequest, UserQuery, ViewerQuery,
    VisiblePosition,
};

#[axum::debug_handler]
pub async fn report_position(
    State(state): State<AppState>,
    Json(req): Json<ReportPositionRequest>,
) -> impl IntoResponse {
    let position = MapLocation::new(req.latitude, req.longitude);

    match state.engine.report_position(&req.user_id, position) {
        Ok(()) => (
            StatusCode::OK,
            success_to_api_response(serde_json::json!({
                "success": true
            })),
        ),
        Err(e) => (e.status(), error_to_api_response(e.code(), e.to_string())),
    }
}

#[axum::debug_handler]
pub async fn get_own_location(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> impl IntoResponse {
    match state.engine.get_location(&query.user_id) {
        Ok(row) => (
            StatusCode::OK,
            success_to_api_response(LocationRecord {
                user_id: row.user_id,
                latitude: row.position.latitude,
                longitude: row.position.longitude,
                updated_at: row.updated_at,
            }),
        ),
        Err(e) => (e.status(), error_to_api_response(e.code(), e.to_string())),
    }
}

#[axum::debug_handler]
pub async fn get_visible(
    State(state): State<AppState>,
    Query(query): Query<ViewerQuery>,
) -> impl IntoResponse {
    let visible = state.engine.get_visible_positions(&query.viewer_id);

    let positions = visible
        .into_iter()
        .map(|(user_id, position)| VisiblePosition {
            user_id,
            latitude: position.latitude,
            longitude: position.longitude,
        })
        .collect::<Vec<_>>();

    (StatusCode::OK, success_to_api_response(positions))
}

#[axum::debug_handler]
pub async fn update_sharing(
    State(state): State<AppState>,
    Json(req): Json<UpdateSharingRequest>,
) -> impl IntoResponse {
    // 共享偏好归设置服务所有，这里写入其进程内实现
    state.sharing.set(
        &req.user_id,
        SharingPreferences {
            enabled: req.enabled,
            share_with_all_friends: req.share_with_all_friends,
            share_with_group_ids: req.share_with_group_ids,
            precision_full: req.precision_full,
            background_tracking: req.background_tracking,
        },
    );

    (
        StatusCode::OK,
        success_to_api_response(serde_json::json!({
            "success": true
        })),
    )
}
