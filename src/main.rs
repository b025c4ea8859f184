// region:    --- Imports
use crate::auction::store::PostgresAuctionStore;
use crate::bidding::policy::BidIncrementPolicy;
use crate::config::AppConfig;
use crate::database::DatabaseManager;
use crate::handlers::AppState;
use crate::listing::HttpListingClient;
use crate::notifier::KafkaNotifier;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};
// endregion: --- Imports

// region:    --- Modules
mod auction;
mod bidding;
mod config;
mod database;
mod error;
mod handlers;
mod listing;
mod notifier;
mod query;
mod scheduler;

// endregion: --- Modules

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    // 설정 로드
    let config = AppConfig::from_env();

    // DatabaseManager 생성
    let db_manager = Arc::new(DatabaseManager::new(&config.database_url).await);

    // 데이터베이스 초기화
    if let Err(e) = db_manager.initialize_database().await {
        error!("{:<12} --> 데이터베이스 초기화 실패: {:?}", "Main", e);
        return Err(e.into());
    }
    info!("{:<12} --> 데이터베이스 초기화 성공", "Main");

    // Kafka 알림 프로듀서 생성 및 토픽 준비
    let notifier = Arc::new(KafkaNotifier::new(&config.kafka_brokers));
    if let Err(e) = notifier.ensure_topic(5, 1).await {
        // 알림 토픽 준비 실패는 기동을 막지 않는다
        warn!("{:<12} --> Kafka 토픽 준비 실패: {}", "Main", e);
    }

    // 저장소 및 협력 서비스 클라이언트 생성
    let store = Arc::new(PostgresAuctionStore::new(db_manager.get_pool()));
    let listing_client = Arc::new(HttpListingClient::new(&config.listing_service_url));

    // 상태 조정 스케줄러 시작
    let sched = scheduler::AuctionScheduler::new(
        Arc::clone(&store),
        Arc::clone(&listing_client),
        Arc::clone(&notifier),
        config.sweep_interval_secs,
    );
    sched.start().await;

    // 테스트 페이지를 위한 cors 설정
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let state = AppState {
        db_manager: Arc::clone(&db_manager),
        store,
        listing_client,
        notifier,
        bid_policy: BidIncrementPolicy::new(config.bid_increment),
    };

    // 라우터 설정
    let routes_all = Router::new()
        .route(
            "/auctions",
            get(handlers::handle_list_auctions).post(handlers::handle_create_auction),
        )
        .route(
            "/auctions/system/update-statuses",
            post(handlers::handle_update_statuses),
        )
        .route("/auctions/:id", get(handlers::handle_get_auction))
        .route("/auctions/:id/bids", post(handlers::handle_place_bid))
        .route("/auctions/:id/end", post(handlers::handle_end_auction))
        .route(
            "/auctions/:id/time-remaining",
            get(handlers::handle_time_remaining),
        )
        .route("/users/:user_id/bids", get(handlers::handle_user_bids))
        .route(
            "/users/:user_id/auctions",
            get(handlers::handle_user_auctions),
        )
        .layer(cors)
        .layer(DefaultBodyLimit::max(1024 * 1024 * 20))
        .with_state(state);

    // 리스너 생성
    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    // 서버 실행
    if let Err(err) = axum::serve(listener, routes_all.into_make_service()).await {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    Ok(())
}
// endregion: --- Main
