/// 읽기 전용 조회 모듈
/// 어떤 조회도 상태를 바꾸지 않는다. 상태 전이는 전적으로 스케줄러의 몫이다.
// region:    --- Imports
use super::queries;
use crate::auction::model::{Auction, AuctionStatus, Bid, Pagination};
use crate::database::DatabaseManager;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::Error as SqlxError;
use tracing::info;

// endregion: --- Imports

// region:    --- Read Models
/// 경매 상세(경매 + 최근 입찰)
#[derive(Debug, Serialize)]
pub struct AuctionDetail {
    pub auction: Auction,
    pub bids: Vec<Bid>,
}

/// 경매 목록 페이지
#[derive(Debug, Serialize)]
pub struct AuctionPage {
    pub auctions: Vec<Auction>,
    pub pagination: Pagination,
}

/// 입찰 목록 페이지
#[derive(Debug, Serialize)]
pub struct BidPage {
    pub bids: Vec<Bid>,
    pub pagination: Pagination,
}

/// 종료까지 남은 시간
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeRemaining {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub is_expired: bool,
}

// 상세 조회에 포함되는 최근 입찰 수
const RECENT_BIDS_LIMIT: i64 = 20;
// endregion: --- Read Models

// region:    --- Pure Functions
/// 종료까지 남은 시간 계산. 이미 지난 경매는 0으로 클램프된다.
pub fn time_remaining(end_time: DateTime<Utc>, now: DateTime<Utc>) -> TimeRemaining {
    let left = end_time - now;
    if left <= chrono::Duration::zero() {
        return TimeRemaining {
            days: 0,
            hours: 0,
            minutes: 0,
            seconds: 0,
            is_expired: true,
        };
    }

    let total_secs = left.num_seconds();
    TimeRemaining {
        days: total_secs / 86_400,
        hours: (total_secs % 86_400) / 3_600,
        minutes: (total_secs % 3_600) / 60,
        seconds: total_secs % 60,
        is_expired: false,
    }
}

/// 페이지 파라미터 정리(page >= 1, 1 <= limit <= 100)
pub fn clamp_page(page: i64, limit: i64) -> (i64, i64) {
    (page.max(1), limit.clamp(1, 100))
}
// endregion: --- Pure Functions

// region:    --- Query Handlers
/// 경매 단건 조회
pub async fn get_auction(
    db_manager: &DatabaseManager,
    auction_id: i64,
) -> Result<Option<Auction>, SqlxError> {
    info!("{:<12} --> 경매 조회 id: {}", "Query", auction_id);
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query_as::<_, Auction>(queries::GET_AUCTION)
                    .bind(auction_id)
                    .fetch_optional(&mut **tx)
                    .await
            })
        })
        .await
}

/// 경매 상세 조회(경매 + 최근 입찰을 한 트랜잭션에서 읽는다)
pub async fn get_auction_detail(
    db_manager: &DatabaseManager,
    auction_id: i64,
) -> Result<Option<AuctionDetail>, SqlxError> {
    info!("{:<12} --> 경매 상세 조회 id: {}", "Query", auction_id);
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                let auction = sqlx::query_as::<_, Auction>(queries::GET_AUCTION)
                    .bind(auction_id)
                    .fetch_optional(&mut **tx)
                    .await?;

                let auction = match auction {
                    Some(auction) => auction,
                    None => return Ok(None),
                };

                let bids = sqlx::query_as::<_, Bid>(queries::GET_RECENT_BIDS)
                    .bind(auction_id)
                    .bind(RECENT_BIDS_LIMIT)
                    .fetch_all(&mut **tx)
                    .await?;

                Ok(Some(AuctionDetail { auction, bids }))
            })
        })
        .await
}

/// 경매 목록 조회(상태 필터 + 페이지네이션)
pub async fn list_auctions(
    db_manager: &DatabaseManager,
    status: Option<AuctionStatus>,
    page: i64,
    limit: i64,
) -> Result<AuctionPage, SqlxError> {
    info!(
        "{:<12} --> 경매 목록 조회 status: {:?}, page: {}",
        "Query", status, page
    );
    let (page, limit) = clamp_page(page, limit);
    let offset = (page - 1) * limit;

    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                let (auctions, total) = match status {
                    Some(status) => {
                        let auctions =
                            sqlx::query_as::<_, Auction>(queries::LIST_AUCTIONS_BY_STATUS)
                                .bind(status)
                                .bind(limit)
                                .bind(offset)
                                .fetch_all(&mut **tx)
                                .await?;
                        let total = sqlx::query_scalar::<_, i64>(queries::COUNT_AUCTIONS_BY_STATUS)
                            .bind(status)
                            .fetch_one(&mut **tx)
                            .await?;
                        (auctions, total)
                    }
                    None => {
                        let auctions = sqlx::query_as::<_, Auction>(queries::LIST_AUCTIONS)
                            .bind(limit)
                            .bind(offset)
                            .fetch_all(&mut **tx)
                            .await?;
                        let total = sqlx::query_scalar::<_, i64>(queries::COUNT_AUCTIONS)
                            .fetch_one(&mut **tx)
                            .await?;
                        (auctions, total)
                    }
                };

                Ok(AuctionPage {
                    auctions,
                    pagination: Pagination::new(page, limit, total),
                })
            })
        })
        .await
}

/// 사용자 입찰 이력 조회
pub async fn user_bids(
    db_manager: &DatabaseManager,
    user_id: i64,
    page: i64,
    limit: i64,
) -> Result<BidPage, SqlxError> {
    info!("{:<12} --> 사용자 입찰 이력 조회 id: {}", "Query", user_id);
    let (page, limit) = clamp_page(page, limit);
    let offset = (page - 1) * limit;

    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                let bids = sqlx::query_as::<_, Bid>(queries::GET_USER_BIDS)
                    .bind(user_id)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(&mut **tx)
                    .await?;
                let total = sqlx::query_scalar::<_, i64>(queries::COUNT_USER_BIDS)
                    .bind(user_id)
                    .fetch_one(&mut **tx)
                    .await?;

                Ok(BidPage {
                    bids,
                    pagination: Pagination::new(page, limit, total),
                })
            })
        })
        .await
}

/// 사용자 등록 경매 조회(상품 소유 기준)
pub async fn user_auctions(
    db_manager: &DatabaseManager,
    user_id: i64,
    page: i64,
    limit: i64,
) -> Result<AuctionPage, SqlxError> {
    info!("{:<12} --> 사용자 등록 경매 조회 id: {}", "Query", user_id);
    let (page, limit) = clamp_page(page, limit);
    let offset = (page - 1) * limit;

    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                let auctions = sqlx::query_as::<_, Auction>(queries::GET_USER_AUCTIONS)
                    .bind(user_id)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(&mut **tx)
                    .await?;
                let total = sqlx::query_scalar::<_, i64>(queries::COUNT_USER_AUCTIONS)
                    .bind(user_id)
                    .fetch_one(&mut **tx)
                    .await?;

                Ok(AuctionPage {
                    auctions,
                    pagination: Pagination::new(page, limit, total),
                })
            })
        })
        .await
}
// endregion: --- Query Handlers
