use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 알림 협력 서비스로 발행되는 경매 이벤트
#[derive(Debug, Serialize, Deserialize, Clone)]
pub enum AuctionEvent {
    // 입찰 이벤트
    BidPlaced {
        auction_id: i64,
        bidder_id: i64,
        amount: i64,
        timestamp: DateTime<Utc>,
    },
    // 상위 입찰로 밀려난 입찰자 알림
    Outbid {
        auction_id: i64,
        bidder_id: i64,
        outbid_by: i64,
        timestamp: DateTime<Utc>,
    },
    // 경매 종료 이벤트
    AuctionEnded {
        auction_id: i64,
        listing_id: i64,
        winner_id: Option<i64>,
        final_price: Option<i64>,
        timestamp: DateTime<Utc>,
    },
}
