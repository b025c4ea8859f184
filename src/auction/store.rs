/// 경매 레코드 저장소 + 입찰 원장
/// 단일 경매에 대한 입찰 확정과 종료 확정은 auctions.version CAS로 직렬화된다.
// region:    --- Imports
use crate::auction::model::{Auction, Bid, NewAuction};
use crate::error::AuctionError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::debug;

// endregion: --- Imports

// region:    --- Commit Result
/// 입찰 확정 결과: 새 승리 입찰과 밀려난 직전 승리 입찰
#[derive(Debug, Clone)]
pub struct CommittedBid {
    pub bid: Bid,
    pub outbid: Option<Bid>,
}
// endregion: --- Commit Result

// region:    --- Auction Store Trait
/// 경매 저장소 트레이트
#[async_trait]
pub trait AuctionStore: Send + Sync {
    /// 경매 생성. 같은 상품에 대한 경매가 이미 있으면 DuplicateAuction.
    async fn create_auction(&self, new: NewAuction) -> Result<Auction, AuctionError>;

    /// 경매 단건 조회
    async fn auction_by_id(&self, auction_id: i64) -> Result<Option<Auction>, AuctionError>;

    /// 현재 승리 입찰 조회
    async fn winning_bid(&self, auction_id: i64) -> Result<Option<Bid>, AuctionError>;

    /// 입찰 확정. 호출 측이 관측한 버전이 그대로일 때만 커밋한다.
    /// None이면 버전 충돌이며 아무것도 쓰이지 않은 상태다.
    async fn commit_bid(
        &self,
        auction_id: i64,
        expected_version: i64,
        bidder_id: i64,
        amount: i64,
        now: DateTime<Utc>,
    ) -> Result<Option<CommittedBid>, AuctionError>;

    /// ACTIVE -> ENDED 전이 확정. false면 버전 충돌 또는 이미 ACTIVE가 아님.
    async fn commit_close(
        &self,
        auction_id: i64,
        expected_version: i64,
        winner_id: Option<i64>,
    ) -> Result<bool, AuctionError>;

    /// 시작 시간이 지난 SCHEDULED 경매를 일괄 ACTIVE로 전환
    async fn activate_due(&self, now: DateTime<Utc>) -> Result<u64, AuctionError>;

    /// 종료 시간이 지난 ACTIVE 경매 목록
    async fn expired_active(&self, now: DateTime<Utc>) -> Result<Vec<Auction>, AuctionError>;
}
// endregion: --- Auction Store Trait

// region:    --- Postgres Auction Store
/// 경매 저장소 구현체
pub struct PostgresAuctionStore {
    pool: Arc<PgPool>,
}

impl PostgresAuctionStore {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuctionStore for PostgresAuctionStore {
    async fn create_auction(&self, new: NewAuction) -> Result<Auction, AuctionError> {
        let auction = sqlx::query_as::<_, Auction>(
            r#"
            INSERT INTO auctions
                (listing_id, seller_id, start_price, buy_now_price, start_time, end_time, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(new.listing_id)
        .bind(new.seller_id)
        .bind(new.start_price)
        .bind(new.buy_now_price)
        .bind(new.start_time)
        .bind(new.end_time)
        .bind(new.status)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AuctionError::DuplicateAuction
            }
            _ => AuctionError::Database(e),
        })?;

        Ok(auction)
    }

    async fn auction_by_id(&self, auction_id: i64) -> Result<Option<Auction>, AuctionError> {
        let auction = sqlx::query_as::<_, Auction>("SELECT * FROM auctions WHERE id = $1")
            .bind(auction_id)
            .fetch_optional(&*self.pool)
            .await?;
        Ok(auction)
    }

    async fn winning_bid(&self, auction_id: i64) -> Result<Option<Bid>, AuctionError> {
        let bid =
            sqlx::query_as::<_, Bid>("SELECT * FROM bids WHERE auction_id = $1 AND is_winning")
                .bind(auction_id)
                .fetch_optional(&*self.pool)
                .await?;
        Ok(bid)
    }

    async fn commit_bid(
        &self,
        auction_id: i64,
        expected_version: i64,
        bidder_id: i64,
        amount: i64,
        now: DateTime<Utc>,
    ) -> Result<Option<CommittedBid>, AuctionError> {
        let mut tx = self.pool.begin().await?;

        // 관측한 버전이 그대로일 때만 캐시 필드를 갱신한다(CAS)
        let updated = sqlx::query(
            "UPDATE auctions SET current_bid = $1, version = version + 1
             WHERE id = $2 AND version = $3",
        )
        .bind(amount)
        .bind(auction_id)
        .bind(expected_version)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            debug!("{:<12} --> 버전 충돌: auction_id={}", "Store", auction_id);
            return Ok(None);
        }

        // 직전 승리 입찰 강등
        let outbid = sqlx::query_as::<_, Bid>(
            "UPDATE bids SET is_winning = FALSE
             WHERE auction_id = $1 AND is_winning
             RETURNING *",
        )
        .bind(auction_id)
        .fetch_optional(&mut *tx)
        .await?;

        // 새 승리 입찰 기록. listing_id는 상품 기준 조회를 위해 복제한다.
        let bid = sqlx::query_as::<_, Bid>(
            r#"
            INSERT INTO bids (auction_id, listing_id, bidder_id, amount, is_winning, created_at)
            SELECT id, listing_id, $2, $3, TRUE, $4 FROM auctions WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(auction_id)
        .bind(bidder_id)
        .bind(amount)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(CommittedBid { bid, outbid }))
    }

    async fn commit_close(
        &self,
        auction_id: i64,
        expected_version: i64,
        winner_id: Option<i64>,
    ) -> Result<bool, AuctionError> {
        let updated = sqlx::query(
            "UPDATE auctions SET status = 'ENDED', winner_id = $1, version = version + 1
             WHERE id = $2 AND version = $3 AND status = 'ACTIVE'",
        )
        .bind(winner_id)
        .bind(auction_id)
        .bind(expected_version)
        .execute(&*self.pool)
        .await?;

        Ok(updated.rows_affected() > 0)
    }

    async fn activate_due(&self, now: DateTime<Utc>) -> Result<u64, AuctionError> {
        let updated = sqlx::query(
            "UPDATE auctions SET status = 'ACTIVE', version = version + 1
             WHERE status = 'SCHEDULED' AND start_time <= $1",
        )
        .bind(now)
        .execute(&*self.pool)
        .await?;

        Ok(updated.rows_affected())
    }

    async fn expired_active(&self, now: DateTime<Utc>) -> Result<Vec<Auction>, AuctionError> {
        let auctions = sqlx::query_as::<_, Auction>(
            "SELECT * FROM auctions
             WHERE status = 'ACTIVE' AND end_time <= $1
             ORDER BY end_time",
        )
        .bind(now)
        .fetch_all(&*self.pool)
        .await?;

        Ok(auctions)
    }
}
// endregion: --- Postgres Auction Store
