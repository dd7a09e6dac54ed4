use axum::http::StatusCode;
use thiserror::Error;

use crate::utils::error_codes;

/// 引擎错误分类，校验类错误同步返回给调用方，不做部分写入
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// 经纬度超出合法范围，拒绝入库
    #[error("invalid position: latitude={latitude}, longitude={longitude}")]
    InvalidPosition { latitude: f64, longitude: f64 },
    /// 搜索半径必须为正数
    #[error("invalid search radius: {0}")]
    InvalidRadius(f64),
    /// 返回条数必须为正数
    #[error("invalid result limit: {0}")]
    InvalidLimit(i64),
    /// 请求的用户没有位置记录
    #[error("no location on record for user {0}")]
    NotFound(String),
}

impl EngineError {
    /// 对应的HTTP状态码
    pub fn status(&self) -> StatusCode {
        match self {
            EngineError::InvalidPosition { .. }
            | EngineError::InvalidRadius(_)
            | EngineError::InvalidLimit(_) => StatusCode::BAD_REQUEST,
            EngineError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    /// 对应的业务错误码
    pub fn code(&self) -> i32 {
        match self {
            EngineError::InvalidPosition { .. }
            | EngineError::InvalidRadius(_)
            | EngineError::InvalidLimit(_) => error_codes::VALIDATION_ERROR,
            EngineError::NotFound(_) => error_codes::NOT_FOUND,
        }
    }
}

/// 定位失败分类
/// 可恢复错误：跟踪循环不会终止，下一个采集周期自动重试
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PositioningError {
    /// 用户拒绝了定位权限，界面层应提示重新授权
    #[error("positioning permission denied")]
    PermissionDenied,
    /// 定位源暂时取不到位置
    #[error("position currently unavailable")]
    PositionUnavailable,
    /// 单次采集超过时限
    #[error("positioning request timed out")]
    Timeout,
    /// 设备不支持定位
    #[error("positioning not supported on this device")]
    Unsupported,
}
