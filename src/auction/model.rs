// region:    --- Imports
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgArgumentBuffer, PgTypeInfo, PgValueRef};
use std::fmt;
use std::str::FromStr;

// endregion: --- Imports

// region:    --- Auction Status
/// 경매 상태
/// SCHEDULED -> ACTIVE -> ENDED 순서로만 전이한다. CANCELLED는 관리용 종료 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuctionStatus {
    Scheduled,
    Active,
    Ended,
    Cancelled,
}

impl AuctionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuctionStatus::Scheduled => "SCHEDULED",
            AuctionStatus::Active => "ACTIVE",
            AuctionStatus::Ended => "ENDED",
            AuctionStatus::Cancelled => "CANCELLED",
        }
    }

    /// 더 이상 전이할 수 없는 상태인지 여부
    pub fn is_terminal(&self) -> bool {
        matches!(self, AuctionStatus::Ended | AuctionStatus::Cancelled)
    }
}

impl fmt::Display for AuctionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuctionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SCHEDULED" => Ok(AuctionStatus::Scheduled),
            "ACTIVE" => Ok(AuctionStatus::Active),
            "ENDED" => Ok(AuctionStatus::Ended),
            "CANCELLED" => Ok(AuctionStatus::Cancelled),
            other => Err(format!("알 수 없는 경매 상태: {}", other)),
        }
    }
}

// TEXT 컬럼과 매핑
impl sqlx::Type<sqlx::Postgres> for AuctionStatus {
    fn type_info() -> PgTypeInfo {
        <&str as sqlx::Type<sqlx::Postgres>>::type_info()
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Postgres> for AuctionStatus {
    fn decode(value: PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as sqlx::Decode<'r, sqlx::Postgres>>::decode(value)?;
        s.parse().map_err(Into::into)
    }
}

impl<'q> sqlx::Encode<'q, sqlx::Postgres> for AuctionStatus {
    fn encode_by_ref(
        &self,
        buf: &mut PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}
// endregion: --- Auction Status

// region:    --- Models
/// 경매 모델
/// current_bid는 원장(bids)의 현재 승리 입찰 금액을 복제한 캐시 필드다.
/// version은 입찰/종료 확정마다 1씩 증가한다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Auction {
    pub id: i64,
    pub listing_id: i64,
    pub seller_id: i64,
    pub start_price: i64,
    pub buy_now_price: Option<i64>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: AuctionStatus,
    pub current_bid: Option<i64>,
    pub winner_id: Option<i64>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
}

/// 입찰 모델
/// 원장은 추가 전용: is_winning 강등 외에는 생성 후 불변이다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bid {
    pub id: i64,
    pub auction_id: i64,
    pub listing_id: i64,
    pub bidder_id: i64,
    pub amount: i64,
    pub is_winning: bool,
    pub created_at: DateTime<Utc>,
}

/// 경매 생성 시 저장소에 전달되는 값
#[derive(Debug, Clone)]
pub struct NewAuction {
    pub listing_id: i64,
    pub seller_id: i64,
    pub start_price: i64,
    pub buy_now_price: Option<i64>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: AuctionStatus,
}

/// 페이지네이션 정보
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let pages = if limit > 0 {
            (total + limit - 1) / limit
        } else {
            0
        };
        Self {
            page,
            limit,
            total,
            pages,
        }
    }
}
// endregion: --- Models
