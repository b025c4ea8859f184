mod common;

use chrono::{Duration, Utc};
use common::{active_auction, FakeListingClient, FakeNotifier, MemoryAuctionStore};
use marketplace_auction::auction::model::AuctionStatus;
use marketplace_auction::bidding::commands::{self, PlaceBidCommand};
use marketplace_auction::bidding::policy::BidIncrementPolicy;
use marketplace_auction::error::AuctionError;
use marketplace_auction::scheduler;

fn bid(auction_id: i64, bidder_id: i64, amount: i64) -> PlaceBidCommand {
    PlaceBidCommand {
        auction_id,
        bidder_id,
        amount,
    }
}

/// 스윕: 시작 시간이 지난 SCHEDULED 경매는 한 번만 ACTIVE로 전이된다
#[tokio::test]
async fn test_sweep_activates_due_auctions_once() {
    let store = MemoryAuctionStore::new();
    let listing = FakeListingClient::new();
    let notifier = FakeNotifier::new();

    let mut auction = active_auction(1, 10, 10_000);
    auction.status = AuctionStatus::Scheduled;
    auction.start_time = Utc::now() - Duration::minutes(5);
    store.insert_auction(auction);

    let first = scheduler::sweep(&store, &listing, &notifier).await.unwrap();
    assert_eq!(first.activated, 1);
    assert_eq!(first.updated_count(), 1);
    assert_eq!(store.auction(1).status, AuctionStatus::Active);

    // 두 번째 스윕은 아무것도 하지 않는다
    let second = scheduler::sweep(&store, &listing, &notifier).await.unwrap();
    assert_eq!(second.updated_count(), 0);
    assert_eq!(store.auction(1).status, AuctionStatus::Active);
}

/// 스윕: 시작 시간이 아직 안 된 SCHEDULED 경매는 건드리지 않는다
#[tokio::test]
async fn test_sweep_leaves_future_auctions_alone() {
    let store = MemoryAuctionStore::new();
    let listing = FakeListingClient::new();
    let notifier = FakeNotifier::new();

    let mut auction = active_auction(1, 10, 10_000);
    auction.status = AuctionStatus::Scheduled;
    auction.start_time = Utc::now() + Duration::hours(1);
    store.insert_auction(auction);

    let report = scheduler::sweep(&store, &listing, &notifier).await.unwrap();
    assert_eq!(report.updated_count(), 0);
    assert_eq!(store.auction(1).status, AuctionStatus::Scheduled);
}

/// 입찰 없이 종료: 낙찰자 없음, 상품은 판매 완료 처리되지 않는다
#[tokio::test]
async fn test_close_without_bids() {
    let store = MemoryAuctionStore::new();
    let listing = FakeListingClient::new();
    let notifier = FakeNotifier::new();

    let mut auction = active_auction(1, 10, 10_000);
    auction.end_time = Utc::now() - Duration::seconds(1);
    store.insert_auction(auction);

    let report = scheduler::sweep(&store, &listing, &notifier).await.unwrap();
    assert_eq!(report.closed, 1);

    let closed = store.auction(1);
    assert_eq!(closed.status, AuctionStatus::Ended);
    assert_eq!(closed.winner_id, None);
    assert_eq!(listing.sold_count(), 0);
    assert_eq!(notifier.ended_count(), 1);
}

/// 낙찰자와 함께 종료: winner_id 설정, 상품은 정확히 한 번 판매 완료 처리
#[tokio::test]
async fn test_close_with_winner_via_sweep() {
    let store = MemoryAuctionStore::new();
    let listing = FakeListingClient::new();
    let notifier = FakeNotifier::new();

    let mut auction = active_auction(1, 10, 10_000);
    auction.end_time = Utc::now() + Duration::milliseconds(200);
    store.insert_auction(auction);

    commands::place_bid(bid(1, 42, 10_000), &store, &BidIncrementPolicy::default())
        .await
        .unwrap();

    // 종료 시간 경과 대기
    tokio::time::sleep(std::time::Duration::from_millis(300)).await;

    let report = scheduler::sweep(&store, &listing, &notifier).await.unwrap();
    assert_eq!(report.closed, 1);

    let closed = store.auction(1);
    assert_eq!(closed.status, AuctionStatus::Ended);
    assert_eq!(closed.winner_id, Some(42));
    assert_eq!(listing.sold_calls.lock().unwrap().as_slice(), &[(1, 42)]);
    assert_eq!(notifier.ended_count(), 1);
}

/// 멱등 종료: 두 번째 종료는 AlreadyEnded이며 아무것도 바꾸지 않는다
#[tokio::test]
async fn test_idempotent_close() {
    let store = MemoryAuctionStore::new();
    let listing = FakeListingClient::new();
    let notifier = FakeNotifier::new();

    store.insert_auction(active_auction(1, 10, 10_000));
    commands::place_bid(bid(1, 42, 10_000), &store, &BidIncrementPolicy::default())
        .await
        .unwrap();

    let closed = commands::end_auction(1, Some(10), &store, &listing, &notifier)
        .await
        .unwrap();
    assert_eq!(closed.auction.status, AuctionStatus::Ended);
    assert_eq!(closed.auction.winner_id, Some(42));
    assert_eq!(closed.winning_bid.as_ref().map(|b| b.amount), Some(10_000));

    let again = commands::end_auction(1, Some(10), &store, &listing, &notifier).await;
    assert!(matches!(again, Err(AuctionError::AlreadyEnded)));

    // 협력 서비스 호출과 winner_id는 그대로다
    assert_eq!(store.auction(1).winner_id, Some(42));
    assert_eq!(listing.sold_count(), 1);
    assert_eq!(notifier.ended_count(), 1);
}

/// 판매자가 아니면 수동 종료할 수 없다
#[tokio::test]
async fn test_manual_close_requires_owner() {
    let store = MemoryAuctionStore::new();
    let listing = FakeListingClient::new();
    let notifier = FakeNotifier::new();

    store.insert_auction(active_auction(1, 10, 10_000));

    let result = commands::end_auction(1, Some(99), &store, &listing, &notifier).await;
    assert!(matches!(result, Err(AuctionError::Unauthorized)));
    assert_eq!(store.auction(1).status, AuctionStatus::Active);
}

/// 종료된 경매에는 더 이상 입찰할 수 없다
#[tokio::test]
async fn test_no_bid_after_close() {
    let store = MemoryAuctionStore::new();
    let listing = FakeListingClient::new();
    let notifier = FakeNotifier::new();

    store.insert_auction(active_auction(1, 10, 10_000));
    commands::end_auction(1, Some(10), &store, &listing, &notifier)
        .await
        .unwrap();

    let result =
        commands::place_bid(bid(1, 21, 10_000), &store, &BidIncrementPolicy::default()).await;
    assert!(matches!(result, Err(AuctionError::AuctionNotOpen)));
    assert!(store.bids_for(1).is_empty());
}

/// 존재하지 않는 경매 종료
#[tokio::test]
async fn test_close_not_found() {
    let store = MemoryAuctionStore::new();
    let listing = FakeListingClient::new();
    let notifier = FakeNotifier::new();

    let result = commands::end_auction(99, None, &store, &listing, &notifier).await;
    assert!(matches!(result, Err(AuctionError::NotFound)));
}
