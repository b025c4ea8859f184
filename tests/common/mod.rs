#![allow(dead_code)]
/// 테스트 공용 객체: 인메모리 경매 저장소와 기록형 협력 서비스 페이크
// region:    --- Imports
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use marketplace_auction::auction::events::AuctionEvent;
use marketplace_auction::auction::model::{Auction, AuctionStatus, Bid, NewAuction};
use marketplace_auction::auction::store::{AuctionStore, CommittedBid};
use marketplace_auction::error::AuctionError;
use marketplace_auction::listing::{ListingClient, ListingInfo};
use marketplace_auction::notifier::Notifier;
use std::collections::HashMap;
use std::sync::Mutex;

// endregion: --- Imports

// region:    --- Memory Auction Store
#[derive(Default)]
struct StoreInner {
    auctions: HashMap<i64, Auction>,
    bids: Vec<Bid>,
    next_auction_id: i64,
    next_bid_id: i64,
}

/// Postgres 구현과 같은 버전 CAS 의미를 갖는 인메모리 저장소
#[derive(Default)]
pub struct MemoryAuctionStore {
    inner: Mutex<StoreInner>,
}

impl MemoryAuctionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 테스트 픽스처: 지정한 상태의 경매를 직접 삽입
    pub fn insert_auction(&self, auction: Auction) {
        let mut inner = self.inner.lock().unwrap();
        inner.next_auction_id = inner.next_auction_id.max(auction.id);
        inner.auctions.insert(auction.id, auction);
    }

    pub fn auction(&self, id: i64) -> Auction {
        self.inner.lock().unwrap().auctions[&id].clone()
    }

    pub fn bids_for(&self, auction_id: i64) -> Vec<Bid> {
        self.inner
            .lock()
            .unwrap()
            .bids
            .iter()
            .filter(|b| b.auction_id == auction_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl AuctionStore for MemoryAuctionStore {
    async fn create_auction(&self, new: NewAuction) -> Result<Auction, AuctionError> {
        let mut inner = self.inner.lock().unwrap();
        if inner
            .auctions
            .values()
            .any(|a| a.listing_id == new.listing_id)
        {
            return Err(AuctionError::DuplicateAuction);
        }

        inner.next_auction_id += 1;
        let auction = Auction {
            id: inner.next_auction_id,
            listing_id: new.listing_id,
            seller_id: new.seller_id,
            start_price: new.start_price,
            buy_now_price: new.buy_now_price,
            start_time: new.start_time,
            end_time: new.end_time,
            status: new.status,
            current_bid: None,
            winner_id: None,
            version: 0,
            created_at: Utc::now(),
        };
        inner.auctions.insert(auction.id, auction.clone());
        Ok(auction)
    }

    async fn auction_by_id(&self, auction_id: i64) -> Result<Option<Auction>, AuctionError> {
        Ok(self.inner.lock().unwrap().auctions.get(&auction_id).cloned())
    }

    async fn winning_bid(&self, auction_id: i64) -> Result<Option<Bid>, AuctionError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .bids
            .iter()
            .find(|b| b.auction_id == auction_id && b.is_winning)
            .cloned())
    }

    async fn commit_bid(
        &self,
        auction_id: i64,
        expected_version: i64,
        bidder_id: i64,
        amount: i64,
        now: DateTime<Utc>,
    ) -> Result<Option<CommittedBid>, AuctionError> {
        let mut inner = self.inner.lock().unwrap();

        let listing_id = match inner.auctions.get(&auction_id) {
            Some(auction) if auction.version == expected_version => auction.listing_id,
            _ => return Ok(None),
        };

        let outbid = inner
            .bids
            .iter_mut()
            .find(|b| b.auction_id == auction_id && b.is_winning)
            .map(|b| {
                b.is_winning = false;
                b.clone()
            });

        inner.next_bid_id += 1;
        let bid = Bid {
            id: inner.next_bid_id,
            auction_id,
            listing_id,
            bidder_id,
            amount,
            is_winning: true,
            created_at: now,
        };
        inner.bids.push(bid.clone());

        let auction = inner.auctions.get_mut(&auction_id).unwrap();
        auction.current_bid = Some(amount);
        auction.version += 1;

        Ok(Some(CommittedBid { bid, outbid }))
    }

    async fn commit_close(
        &self,
        auction_id: i64,
        expected_version: i64,
        winner_id: Option<i64>,
    ) -> Result<bool, AuctionError> {
        let mut inner = self.inner.lock().unwrap();
        let auction = match inner.auctions.get_mut(&auction_id) {
            Some(auction) => auction,
            None => return Ok(false),
        };
        if auction.version != expected_version || auction.status != AuctionStatus::Active {
            return Ok(false);
        }

        auction.status = AuctionStatus::Ended;
        auction.winner_id = winner_id;
        auction.version += 1;
        Ok(true)
    }

    async fn activate_due(&self, now: DateTime<Utc>) -> Result<u64, AuctionError> {
        let mut inner = self.inner.lock().unwrap();
        let mut activated = 0;
        for auction in inner.auctions.values_mut() {
            if auction.status == AuctionStatus::Scheduled && auction.start_time <= now {
                auction.status = AuctionStatus::Active;
                auction.version += 1;
                activated += 1;
            }
        }
        Ok(activated)
    }

    async fn expired_active(&self, now: DateTime<Utc>) -> Result<Vec<Auction>, AuctionError> {
        let mut expired: Vec<Auction> = self
            .inner
            .lock()
            .unwrap()
            .auctions
            .values()
            .filter(|a| a.status == AuctionStatus::Active && a.end_time <= now)
            .cloned()
            .collect();
        expired.sort_by_key(|a| a.end_time);
        Ok(expired)
    }
}
// endregion: --- Memory Auction Store

// region:    --- Listing Fake
/// 호출을 기록하는 상품 서비스 페이크
#[derive(Default)]
pub struct FakeListingClient {
    listings: Mutex<HashMap<i64, ListingInfo>>,
    pub sold_calls: Mutex<Vec<(i64, i64)>>,
}

impl FakeListingClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listing(self, id: i64, seller_id: i64, status: &str) -> Self {
        self.listings.lock().unwrap().insert(
            id,
            ListingInfo {
                id,
                seller_id,
                status: status.to_string(),
            },
        );
        self
    }

    pub fn sold_count(&self) -> usize {
        self.sold_calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ListingClient for FakeListingClient {
    async fn get_listing(&self, listing_id: i64) -> Result<Option<ListingInfo>, AuctionError> {
        Ok(self.listings.lock().unwrap().get(&listing_id).cloned())
    }

    async fn mark_sold(&self, listing_id: i64, winner_id: i64) -> Result<(), AuctionError> {
        self.sold_calls.lock().unwrap().push((listing_id, winner_id));
        Ok(())
    }
}
// endregion: --- Listing Fake

// region:    --- Notifier Fake
/// 발행된 이벤트를 기록하는 알림 페이크
#[derive(Default)]
pub struct FakeNotifier {
    pub events: Mutex<Vec<AuctionEvent>>,
}

impl FakeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ended_count(&self) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| matches!(e, AuctionEvent::AuctionEnded { .. }))
            .count()
    }
}

#[async_trait]
impl Notifier for FakeNotifier {
    async fn publish(&self, event: AuctionEvent) -> Result<(), String> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}
// endregion: --- Notifier Fake

// region:    --- Fixtures
/// 진행 중인 경매 픽스처
pub fn active_auction(id: i64, seller_id: i64, start_price: i64) -> Auction {
    Auction {
        id,
        listing_id: id,
        seller_id,
        start_price,
        buy_now_price: None,
        start_time: Utc::now() - Duration::hours(1),
        end_time: Utc::now() + Duration::hours(2),
        status: AuctionStatus::Active,
        current_bid: None,
        winner_id: None,
        version: 0,
        created_at: Utc::now(),
    }
}
// endregion: --- Fixtures
