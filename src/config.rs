// region:    --- Imports
use crate::bidding::policy::DEFAULT_BID_INCREMENT;
use tracing::info;

// endregion: --- Imports

// region:    --- App Config
/// 환경 변수 기반 서비스 설정
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub kafka_brokers: String,
    pub listing_service_url: String,
    pub bind_addr: String,
    pub sweep_interval_secs: u64,
    pub bid_increment: i64,
}

impl AppConfig {
    /// 환경 변수에서 설정 로드
    pub fn from_env() -> Self {
        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let kafka_brokers =
            std::env::var("KAFKA_BROKERS").unwrap_or_else(|_| "localhost:9092".to_string());
        let listing_service_url = std::env::var("LISTING_SERVICE_URL")
            .unwrap_or_else(|_| "http://localhost:3001".to_string());
        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let sweep_interval_secs = std::env::var("SWEEP_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);
        let bid_increment = std::env::var("BID_INCREMENT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_BID_INCREMENT);

        info!(
            "{:<12} --> 설정 로드 완료: bind={}, sweep_interval={}s, increment={}",
            "Config", bind_addr, sweep_interval_secs, bid_increment
        );

        Self {
            database_url,
            kafka_brokers,
            listing_service_url,
            bind_addr,
            sweep_interval_secs,
            bid_increment,
        }
    }
}
// endregion: --- App Config
