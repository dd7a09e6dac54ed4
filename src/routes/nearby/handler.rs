use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::AppState;
use crate::common::MapLocation;
use crate::utils::{error_to_api_response, success_to_api_response};

use super::model::{NearbyEvent, NearbyQuery, NearbyUser};

#[axum::debug_handler]
pub async fn nearby_events(
    State(state): State<AppState>,
    Query(query): Query<NearbyQuery>,
) -> impl IntoResponse {
    let radius_km = query
        .radius_km
        .unwrap_or(state.config.default_search_radius_km)
        .min(state.config.max_search_radius_km);
    let limit = query.limit.unwrap_or(state.config.default_result_limit);
    let center = MapLocation::new(query.latitude, query.longitude);

    match state
        .engine
        .find_nearby_events(&center, radius_km, &query.viewer_id, limit)
    {
        Ok(results) => {
            let events = results.into_iter().map(NearbyEvent::from).collect::<Vec<_>>();
            (StatusCode::OK, success_to_api_response(events))
        }
        Err(e) => (e.status(), error_to_api_response(e.code(), e.to_string())),
    }
}

#[axum::debug_handler]
pub async fn nearby_users(
    State(state): State<AppState>,
    Query(query): Query<NearbyQuery>,
) -> impl IntoResponse {
    let radius_km = query
        .radius_km
        .unwrap_or(state.config.default_search_radius_km)
        .min(state.config.max_search_radius_km);
    let limit = query.limit.unwrap_or(state.config.default_result_limit);
    let center = MapLocation::new(query.latitude, query.longitude);

    match state
        .engine
        .find_nearby_users(&query.viewer_id, &center, radius_km, limit)
    {
        Ok(results) => {
            let users = results.into_iter().map(NearbyUser::from).collect::<Vec<_>>();
            (StatusCode::OK, success_to_api_response(users))
        }
        Err(e) => (e.status(), error_to_api_response(e.code(), e.to_string())),
    }
}
