// 位置跟踪
// 每个活跃会话一个周期任务：限时采集设备位置，校验、去抖后写入上报目的地
// 采集失败分类上报但不终止循环，下一个周期自动重试；会话结束时通过令牌取消

mod types;

pub use types::{PositionSink, PositioningSource};

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Notify, watch};
use tokio_util::sync::CancellationToken;

use crate::common::MapLocation;
use crate::error::PositioningError;
use crate::geo;

/// 跟踪器参数
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// 采集周期
    pub interval: Duration,
    /// 单次采集超时
    pub acquire_timeout: Duration,
    /// 小于该距离（千米）的位移不重复上报
    pub min_move_km: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            acquire_timeout: Duration::from_secs(8),
            min_move_km: 0.01,
        }
    }
}

pub struct PositionTracker<S, K> {
    user_id: String,
    source: S,
    sink: Arc<K>,
    config: TrackerConfig,
    current_tx: watch::Sender<Option<MapLocation>>,
    failure_tx: watch::Sender<Option<PositioningError>>,
    refresh: Arc<Notify>,
    cancel: CancellationToken,
}

impl<S, K> PositionTracker<S, K>
where
    S: PositioningSource,
    K: PositionSink,
{
    pub fn new(user_id: &str, source: S, sink: Arc<K>, config: TrackerConfig) -> Self {
        let (current_tx, _) = watch::channel(None);
        let (failure_tx, _) = watch::channel(None);
        Self {
            user_id: user_id.to_string(),
            source,
            sink,
            config,
            current_tx,
            failure_tx,
            refresh: Arc::new(Notify::new()),
            cancel: CancellationToken::new(),
        }
    }

    /// 本地消费者订阅当前坐标（去抖不影响这里，每次成功采集都会更新）
    pub fn subscribe_position(&self) -> watch::Receiver<Option<MapLocation>> {
        self.current_tx.subscribe()
    }

    /// 订阅最近一次采集的失败原因，成功后清空；界面层据此区分提示
    pub fn subscribe_failure(&self) -> watch::Receiver<Option<PositioningError>> {
        self.failure_tx.subscribe()
    }

    /// 手动触发一次立即采集，不改变周期节奏
    pub fn refresh_handle(&self) -> Arc<Notify> {
        self.refresh.clone()
    }

    /// 会话结束时取消循环；取消后不再采集也不再写入
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// 运行采集循环，直到令牌被取消
    pub async fn run(self) {
        tracing::info!(
            user_id = %self.user_id,
            interval_secs = self.config.interval.as_secs(),
            "Position tracker started"
        );

        let mut interval = tokio::time::interval(self.config.interval);
        let mut last_reported: Option<MapLocation> = None;

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    tracing::info!(user_id = %self.user_id, "Position tracker stopping");
                    break;
                }
                _ = interval.tick() => {
                    self.acquire_once(&mut last_reported).await;
                }
                _ = self.refresh.notified() => {
                    self.acquire_once(&mut last_reported).await;
                }
            }
        }
    }

    /// 单次采集：限时获取、分类失败、校验、去抖、上报
    async fn acquire_once(&self, last_reported: &mut Option<MapLocation>) {
        let acquired = match tokio::time::timeout(
            self.config.acquire_timeout,
            self.source.current_position(),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(PositioningError::Timeout),
        };

        let position = match acquired {
            Ok(position) => position,
            Err(reason) => {
                // 失败不终止循环，留给下一个周期重试
                tracing::warn!(
                    user_id = %self.user_id,
                    error = %reason,
                    "Position acquisition failed"
                );
                let _ = self.failure_tx.send(Some(reason));
                return;
            }
        };

        if !position.is_valid() {
            tracing::warn!(
                user_id = %self.user_id,
                latitude = position.latitude,
                longitude = position.longitude,
                "Discarding out-of-range position fix"
            );
            let _ = self.failure_tx.send(Some(PositioningError::PositionUnavailable));
            return;
        }

        let _ = self.failure_tx.send(None);
        // 本地当前位置无条件更新
        let _ = self.current_tx.send(Some(position));

        // 位移小于阈值时跳过上报，避免冗余覆盖写
        if let Some(previous) = last_reported {
            if geo::distance_km(previous, &position) < self.config.min_move_km {
                return;
            }
        }

        match self.sink.report(&self.user_id, position) {
            Ok(()) => {
                *last_reported = Some(position);
            }
            Err(e) => {
                // 写入失败不自动重试，由下一次采集决定是否再次上报
                tracing::error!(
                    user_id = %self.user_id,
                    error = %e,
                    "Failed to report position"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;
    use crate::error::EngineError;

    /// 按脚本返回结果的定位源，脚本耗尽后永远挂起
    struct ScriptedSource {
        script: Mutex<VecDeque<Result<MapLocation, PositioningError>>>,
    }

    impl ScriptedSource {
        fn new(script: Vec<Result<MapLocation, PositioningError>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
            }
        }
    }

    impl PositioningSource for ScriptedSource {
        async fn current_position(&self) -> Result<MapLocation, PositioningError> {
            let next = self.script.lock().unwrap().pop_front();
            match next {
                Some(result) => result,
                None => std::future::pending().await,
            }
        }
    }

    /// 记录所有上报的目的地
    #[derive(Default)]
    struct RecordingSink {
        reports: Mutex<Vec<(String, MapLocation)>>,
    }

    impl PositionSink for RecordingSink {
        fn report(&self, user_id: &str, position: MapLocation) -> Result<(), EngineError> {
            self.reports
                .lock()
                .unwrap()
                .push((user_id.to_string(), position));
            Ok(())
        }
    }

    fn config() -> TrackerConfig {
        TrackerConfig {
            interval: Duration::from_secs(10),
            acquire_timeout: Duration::from_secs(8),
            min_move_km: 0.01,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn successful_fix_is_reported() {
        let sink = Arc::new(RecordingSink::default());
        let fix = MapLocation::new(49.0, 16.0);
        let tracker =
            PositionTracker::new("u1", ScriptedSource::new(vec![Ok(fix)]), sink.clone(), config());
        let mut last_reported = None;

        tracker.acquire_once(&mut last_reported).await;

        let reports = sink.reports.lock().unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0], ("u1".to_string(), fix));
        assert_eq!(last_reported, Some(fix));
    }

    #[tokio::test(start_paused = true)]
    async fn redundant_fix_is_debounced_but_current_position_updates() {
        let sink = Arc::new(RecordingSink::default());
        let fix = MapLocation::new(49.0, 16.0);
        // 第二个点距第一个点不到1米
        let nearby = MapLocation::new(49.000001, 16.0);
        let tracker = PositionTracker::new(
            "u1",
            ScriptedSource::new(vec![Ok(fix), Ok(nearby)]),
            sink.clone(),
            config(),
        );
        let current = tracker.subscribe_position();
        let mut last_reported = None;

        tracker.acquire_once(&mut last_reported).await;
        tracker.acquire_once(&mut last_reported).await;

        assert_eq!(sink.reports.lock().unwrap().len(), 1);
        // 去抖不影响本地当前位置
        assert_eq!(*current.borrow(), Some(nearby));
    }

    #[tokio::test(start_paused = true)]
    async fn movement_beyond_epsilon_is_reported_again() {
        let sink = Arc::new(RecordingSink::default());
        let first = MapLocation::new(49.0, 16.0);
        let second = MapLocation::new(49.1, 16.0);
        let tracker = PositionTracker::new(
            "u1",
            ScriptedSource::new(vec![Ok(first), Ok(second)]),
            sink.clone(),
            config(),
        );
        let mut last_reported = None;

        tracker.acquire_once(&mut last_reported).await;
        tracker.acquire_once(&mut last_reported).await;

        assert_eq!(sink.reports.lock().unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn failure_is_classified_and_loop_survives() {
        let sink = Arc::new(RecordingSink::default());
        let fix = MapLocation::new(49.0, 16.0);
        let tracker = PositionTracker::new(
            "u1",
            ScriptedSource::new(vec![Err(PositioningError::PermissionDenied), Ok(fix)]),
            sink.clone(),
            config(),
        );
        let failures = tracker.subscribe_failure();
        let mut last_reported = None;

        tracker.acquire_once(&mut last_reported).await;
        assert_eq!(*failures.borrow(), Some(PositioningError::PermissionDenied));
        assert!(sink.reports.lock().unwrap().is_empty());

        // 失败后下一次采集照常进行，成功后失败状态清空
        tracker.acquire_once(&mut last_reported).await;
        assert_eq!(*failures.borrow(), None);
        assert_eq!(sink.reports.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn hung_acquisition_times_out() {
        let sink = Arc::new(RecordingSink::default());
        // 脚本为空，定位源永远挂起
        let tracker = PositionTracker::new(
            "u1",
            ScriptedSource::new(Vec::new()),
            sink.clone(),
            config(),
        );
        let failures = tracker.subscribe_failure();
        let mut last_reported = None;

        tracker.acquire_once(&mut last_reported).await;

        assert_eq!(*failures.borrow(), Some(PositioningError::Timeout));
        assert!(sink.reports.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_fix_is_discarded() {
        let sink = Arc::new(RecordingSink::default());
        let tracker = PositionTracker::new(
            "u1",
            ScriptedSource::new(vec![Ok(MapLocation::new(91.0, 0.0))]),
            sink.clone(),
            config(),
        );
        let mut last_reported = None;

        tracker.acquire_once(&mut last_reported).await;

        assert!(sink.reports.lock().unwrap().is_empty());
        assert_eq!(last_reported, None);
    }

    #[tokio::test(start_paused = true)]
    async fn manual_refresh_acquires_between_ticks() {
        let sink = Arc::new(RecordingSink::default());
        let first = MapLocation::new(49.0, 16.0);
        let second = MapLocation::new(49.1, 16.0);
        let tracker = PositionTracker::new(
            "u1",
            ScriptedSource::new(vec![Ok(first), Ok(second)]),
            sink.clone(),
            config(),
        );
        let refresh = tracker.refresh_handle();
        let cancel = tracker.cancellation_token();

        let handle = tokio::spawn(tracker.run());
        // 第一个tick立即触发
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
        assert_eq!(sink.reports.lock().unwrap().len(), 1);

        // 不推进虚拟时间，手动刷新应在周期之间立即采集
        refresh.notify_one();
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
        cancel.cancel();
        handle.await.unwrap();

        let reports = sink.reports.lock().unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[1], ("u1".to_string(), second));
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_stops_the_loop() {
        let sink = Arc::new(RecordingSink::default());
        let fix = MapLocation::new(49.0, 16.0);
        let tracker = PositionTracker::new(
            "u1",
            ScriptedSource::new(vec![Ok(fix)]),
            sink.clone(),
            config(),
        );
        let cancel = tracker.cancellation_token();

        let handle = tokio::spawn(tracker.run());
        // 第一个tick立即触发
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
        cancel.cancel();
        handle.await.unwrap();

        let count = sink.reports.lock().unwrap().len();
        // 取消后不再有任何写入
        tokio::time::advance(Duration::from_secs(60)).await;
        tokio::task::yield_now().await;
        assert_eq!(sink.reports.lock().unwrap().len(), count);
    }
}
