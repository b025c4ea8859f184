/// 알림 협력 서비스로의 이벤트 발행
/// 발행 실패는 호출 측에서 로그만 남긴다. 경매 상태 전이를 되돌리지 않는다.
// region:    --- Imports
use crate::auction::events::AuctionEvent;
use async_trait::async_trait;
use rdkafka::admin::{AdminClient, AdminOptions, NewTopic, TopicReplication};
use rdkafka::client::DefaultClientContext;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::ClientConfig;
use std::sync::Arc;
use tracing::info;

// endregion: --- Imports

/// 경매 이벤트 토픽
pub const EVENTS_TOPIC: &str = "auction-events";

// region:    --- Notifier Trait
/// 알림 발행 트레이트
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn publish(&self, event: AuctionEvent) -> Result<(), String>;
}
// endregion: --- Notifier Trait

// region:    --- Kafka Notifier
/// Kafka 기반 알림 발행 구현체
pub struct KafkaNotifier {
    producer: Arc<FutureProducer>,
    brokers: String,
}

impl KafkaNotifier {
    pub fn new(brokers: &str) -> Self {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", "5000")
            .create()
            .expect("Producer creation error");

        KafkaNotifier {
            producer: Arc::new(producer),
            brokers: brokers.to_string(),
        }
    }

    /// 이벤트 토픽 생성
    pub async fn ensure_topic(
        &self,
        num_partitions: i32,
        replication_factor: i32,
    ) -> Result<(), String> {
        info!(
            "{:<12} --> Kafka 토픽 생성 시작: {}",
            "Notifier", EVENTS_TOPIC
        );

        let admin_client: AdminClient<DefaultClientContext> = ClientConfig::new()
            .set("bootstrap.servers", &self.brokers)
            .create()
            .map_err(|e| format!("AdminClient 생성 실패: {:?}", e))?;

        let new_topic = NewTopic::new(
            EVENTS_TOPIC,
            num_partitions,
            TopicReplication::Fixed(replication_factor),
        );

        admin_client
            .create_topics(&[new_topic], &AdminOptions::new())
            .await
            .map_err(|e| format!("토픽 생성 실패: {:?}", e))?;

        info!(
            "{:<12} --> Kafka 토픽 생성 성공: {}",
            "Notifier", EVENTS_TOPIC
        );
        Ok(())
    }
}

#[async_trait]
impl Notifier for KafkaNotifier {
    async fn publish(&self, event: AuctionEvent) -> Result<(), String> {
        let key = match &event {
            AuctionEvent::BidPlaced { auction_id, .. }
            | AuctionEvent::Outbid { auction_id, .. }
            | AuctionEvent::AuctionEnded { auction_id, .. } => auction_id.to_string(),
        };
        let payload =
            serde_json::to_string(&event).map_err(|e| format!("이벤트 직렬화 실패: {}", e))?;

        info!(
            "{:<12} --> 이벤트 발행: topic={}, key={}",
            "Notifier", EVENTS_TOPIC, key
        );

        let record = FutureRecord::to(EVENTS_TOPIC)
            .key(key.as_str())
            .payload(payload.as_str());
        self.producer
            .send(record, std::time::Duration::from_secs(0))
            .await
            .map_err(|(e, _)| format!("Error sending message: {:?}", e))?;

        Ok(())
    }
}
// endregion: --- Kafka Notifier
