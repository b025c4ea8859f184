/// 경매 커맨드 처리
/// 1. 경매 생성
/// 2. 입찰
/// 3. 경매 종료(수동 종료와 스케줄러 스윕 공용)
// region:    --- Imports
use crate::auction::events::AuctionEvent;
use crate::auction::model::{Auction, AuctionStatus, Bid, NewAuction};
use crate::auction::store::{AuctionStore, CommittedBid};
use crate::bidding::policy::BidIncrementPolicy;
use crate::error::AuctionError;
use crate::listing::ListingClient;
use crate::notifier::Notifier;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Commands
/// 경매 생성 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreateAuctionCommand {
    pub listing_id: i64,
    pub seller_id: i64,
    pub start_price: i64,
    pub buy_now_price: Option<i64>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// 입찰 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlaceBidCommand {
    pub auction_id: i64,
    pub bidder_id: i64,
    pub amount: i64,
}

/// 종료 처리 결과
#[derive(Debug, Clone, Serialize)]
pub struct ClosedAuction {
    pub auction: Auction,
    pub winning_bid: Option<Bid>,
}

// 최대 재시도 횟수
const MAX_RETRIES: i32 = 100;

/// 1. 경매 생성
/// 판매자 소유의 판매 중인 상품에만 경매를 걸 수 있고, 상품당 경매는 하나다.
pub async fn create_auction(
    cmd: CreateAuctionCommand,
    store: &impl AuctionStore,
    listing_client: &impl ListingClient,
) -> Result<Auction, AuctionError> {
    info!(
        "{:<12} --> 경매 생성 요청 처리 시작: listing_id={}",
        "Command", cmd.listing_id
    );

    if cmd.start_price <= 0 {
        return Err(AuctionError::Invalid(
            "시작가는 0보다 커야 합니다".to_string(),
        ));
    }
    if let Some(buy_now) = cmd.buy_now_price {
        if buy_now <= cmd.start_price {
            return Err(AuctionError::Invalid(
                "즉시 구매가는 시작가보다 커야 합니다".to_string(),
            ));
        }
    }
    if cmd.end_time <= cmd.start_time {
        return Err(AuctionError::Invalid(
            "종료 시간은 시작 시간 이후여야 합니다".to_string(),
        ));
    }

    listing_client
        .assert_active_and_owned(cmd.listing_id, cmd.seller_id)
        .await?;

    // 시작 시간이 이미 지났으면 곧바로 ACTIVE로 생성한다
    let status = if cmd.start_time <= Utc::now() {
        AuctionStatus::Active
    } else {
        AuctionStatus::Scheduled
    };

    store
        .create_auction(NewAuction {
            listing_id: cmd.listing_id,
            seller_id: cmd.seller_id,
            start_price: cmd.start_price,
            buy_now_price: cmd.buy_now_price,
            start_time: cmd.start_time,
            end_time: cmd.end_time,
            status,
        })
        .await
}

/// 입찰 전제 조건 검증
/// 검사 순서 고정: 상태/시간 -> 본인 입찰 -> 최소 금액
pub fn validate_bid(
    auction: &Auction,
    bidder_id: i64,
    amount: i64,
    now: DateTime<Utc>,
    policy: &BidIncrementPolicy,
) -> Result<(), AuctionError> {
    // 상태가 아직 스윕되지 않았더라도 종료 시간이 지났으면 거절한다
    if auction.status != AuctionStatus::Active || now >= auction.end_time {
        return Err(AuctionError::AuctionNotOpen);
    }
    if auction.seller_id == bidder_id {
        return Err(AuctionError::SelfBidRejected);
    }
    let minimum = policy.minimum_bid(auction);
    if amount < minimum {
        return Err(AuctionError::BidTooLow { minimum });
    }
    Ok(())
}

/// 2. 입찰
/// 검증부터 커밋까지를 경매 단위로 직렬화한다. 관측한 버전이 그 사이
/// 달라졌으면 처음부터 다시 검증한다.
pub async fn place_bid(
    cmd: PlaceBidCommand,
    store: &impl AuctionStore,
    policy: &BidIncrementPolicy,
) -> Result<CommittedBid, AuctionError> {
    info!("{:<12} --> 입찰 요청 처리 시작: {:?}", "Command", cmd);
    let mut retries = 0;

    while retries < MAX_RETRIES {
        let auction = store
            .auction_by_id(cmd.auction_id)
            .await?
            .ok_or(AuctionError::NotFound)?;

        let now = Utc::now();
        validate_bid(&auction, cmd.bidder_id, cmd.amount, now, policy)?;

        match store
            .commit_bid(auction.id, auction.version, cmd.bidder_id, cmd.amount, now)
            .await?
        {
            Some(committed) => {
                info!(
                    "{:<12} --> 입찰 확정: auction_id={}, amount={}",
                    "Command", auction.id, cmd.amount
                );
                return Ok(committed);
            }
            None => {
                warn!(
                    "{:<12} --> 낙관적 업데이트로 인한 버전 충돌: 재시도",
                    "Command"
                );
                retries += 1;
            }
        }
    }

    Err(AuctionError::ConcurrentBidConflict)
}

/// 3. 경매 종료 (ACTIVE -> ENDED)
/// requested_by가 Some이면 판매자 수동 종료, None이면 스케줄러 스윕이다.
/// 이미 ACTIVE가 아닌 경매는 AlreadyEnded로 끝나며 아무것도 바꾸지 않는다.
pub async fn end_auction(
    auction_id: i64,
    requested_by: Option<i64>,
    store: &impl AuctionStore,
    listing_client: &impl ListingClient,
    notifier: &impl Notifier,
) -> Result<ClosedAuction, AuctionError> {
    let mut retries = 0;

    while retries < MAX_RETRIES {
        let mut auction = store
            .auction_by_id(auction_id)
            .await?
            .ok_or(AuctionError::NotFound)?;

        if let Some(user_id) = requested_by {
            if auction.seller_id != user_id {
                return Err(AuctionError::Unauthorized);
            }
        }

        if auction.status != AuctionStatus::Active {
            return Err(AuctionError::AlreadyEnded);
        }

        // 승리 입찰을 읽은 뒤, 그 사이 새 입찰이 확정되지 않았을 때만 종료한다
        let winning_bid = store.winning_bid(auction_id).await?;
        let winner_id = winning_bid.as_ref().map(|b| b.bidder_id);

        if !store
            .commit_close(auction_id, auction.version, winner_id)
            .await?
        {
            warn!("{:<12} --> 종료 처리 중 버전 충돌: 재시도", "Command");
            retries += 1;
            continue;
        }

        auction.status = AuctionStatus::Ended;
        auction.winner_id = winner_id;
        auction.version += 1;

        info!(
            "{:<12} --> 경매 종료: auction_id={}, winner={:?}",
            "Command", auction_id, winner_id
        );

        // 협력 서비스 실패는 이미 확정된 전이를 되돌리지 않는다
        if let Some(bid) = &winning_bid {
            if let Err(e) = listing_client
                .mark_sold(auction.listing_id, bid.bidder_id)
                .await
            {
                warn!("{:<12} --> 상품 판매 완료 처리 실패: {:?}", "Command", e);
            }
        }

        let event = AuctionEvent::AuctionEnded {
            auction_id,
            listing_id: auction.listing_id,
            winner_id,
            final_price: winning_bid.as_ref().map(|b| b.amount),
            timestamp: Utc::now(),
        };
        if let Err(e) = notifier.publish(event).await {
            warn!("{:<12} --> 종료 알림 발행 실패: {}", "Command", e);
        }

        return Ok(ClosedAuction {
            auction,
            winning_bid,
        });
    }

    Err(AuctionError::ConcurrentBidConflict)
}
// endregion: --- Commands
