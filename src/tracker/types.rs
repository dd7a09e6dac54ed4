use crate::common::MapLocation;
use crate::error::{EngineError, PositioningError};

/// 设备定位源，由平台（浏览器/系统定位）实现
/// 采集可能长时间挂起，跟踪器会在外层施加超时
pub trait PositioningSource: Send + Sync {
    fn current_position(
        &self,
    ) -> impl Future<Output = Result<MapLocation, PositioningError>> + Send;
}

/// 位置上报目的地
/// 本地部署由引擎实现（直接写位置存储）；远程部署可实现为服务端上报客户端
pub trait PositionSink: Send + Sync {
    fn report(&self, user_id: &str, position: MapLocation) -> Result<(), EngineError>;
}
