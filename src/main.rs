use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
};
use backend::{
    AppState,
    config::Config,
    engine::LocationEngine,
    infrastructure::memory::{
        InMemoryEventRepository, InMemorySharingSettings, InMemorySocialGraph,
    },
    middleware::log_errors,
    routes,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 加载配置
    let config = Config::from_env().expect("Failed to load configuration");

    #[cfg(debug_assertions)]
    tracing::info!("Running in debug mode with CORS enabled");

    #[cfg(not(debug_assertions))]
    tracing::info!("Running in production mode with CORS disabled");

    // 好友、群组、事件与共享设置由外部服务提供，这里挂进程内实现
    let social = Arc::new(InMemorySocialGraph::new());
    let sharing = Arc::new(InMemorySharingSettings::new());
    let events = Arc::new(InMemoryEventRepository::new());

    // 组装引擎
    let engine = Arc::new(LocationEngine::new(
        social.clone(),
        sharing.clone(),
        events.clone(),
    ));

    let state = AppState {
        engine: engine.clone(),
        config: config.clone(),
        sharing: sharing.clone(),
    };

    // 位置与附近查询路由
    let api_routes = Router::new()
        .route("/ping", get(routes::ping))
        .route("/locations/report", post(routes::location::report_position))
        .route("/locations/me", get(routes::location::get_own_location))
        .route("/locations/visible", get(routes::location::get_visible))
        .route("/locations/sharing", put(routes::location::update_sharing))
        .route("/nearby/events", get(routes::nearby::nearby_events))
        .route("/nearby/users", get(routes::nearby::nearby_users));

    let router = Router::new().nest("/api", api_routes);

    // 添加错误日志中间件
    let router = router.layer(axum::middleware::from_fn(log_errors));

    // 根据编译模式决定是否添加CORS
    #[cfg(debug_assertions)]
    let router = {
        tracing::debug!("Adding CORS layer for development mode");
        // 开发环境允许所有来源
        let cors = tower_http::cors::CorsLayer::permissive();
        router.layer(cors)
    };

    // 添加应用状态
    let app = router.with_state(state.clone());

    // 启动服务器
    let addr = SocketAddr::new(
        state.config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        state.config.server_port,
    );
    tracing::info!("Server listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        app,
    )
    .await
    .expect("Failed to start server");
}
