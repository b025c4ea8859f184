/// 상품(리스팅) 협력 서비스 클라이언트
/// 상품 레코드 자체는 마켓플레이스 마이크로서비스가 관리한다고 가정한다.
// region:    --- Imports
use crate::error::AuctionError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

// endregion: --- Imports

// region:    --- Listing Model
/// 협력 서비스가 내려주는 상품 요약
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingInfo {
    pub id: i64,
    pub seller_id: i64,
    pub status: String,
}

impl ListingInfo {
    /// 판매 중(경매 등록 가능) 여부
    pub fn is_active(&self) -> bool {
        self.status == "ACTIVE"
    }
}
// endregion: --- Listing Model

// region:    --- Listing Client Trait
/// 상품 협력 서비스 트레이트
#[async_trait]
pub trait ListingClient: Send + Sync {
    /// 상품 조회. 없으면 None.
    async fn get_listing(&self, listing_id: i64) -> Result<Option<ListingInfo>, AuctionError>;

    /// 낙찰 확정 후 상품 판매 완료 처리
    async fn mark_sold(&self, listing_id: i64, winner_id: i64) -> Result<(), AuctionError>;

    /// 판매자 소유의 판매 중인 상품인지 확인
    async fn assert_active_and_owned(
        &self,
        listing_id: i64,
        owner_id: i64,
    ) -> Result<ListingInfo, AuctionError> {
        let listing = self
            .get_listing(listing_id)
            .await?
            .ok_or(AuctionError::ListingNotFound)?;
        if listing.seller_id != owner_id {
            return Err(AuctionError::Unauthorized);
        }
        if !listing.is_active() {
            return Err(AuctionError::ListingNotActive);
        }
        Ok(listing)
    }
}
// endregion: --- Listing Client Trait

// region:    --- Http Listing Client
/// 마켓플레이스 서비스 HTTP 클라이언트
pub struct HttpListingClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpListingClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ListingClient for HttpListingClient {
    async fn get_listing(&self, listing_id: i64) -> Result<Option<ListingInfo>, AuctionError> {
        info!("{:<12} --> 상품 조회: listing_id={}", "Listing", listing_id);
        let url = format!("{}/marketplace/items/{}", self.base_url, listing_id);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AuctionError::Listing(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(AuctionError::Listing(format!(
                "상품 조회 실패: status={}",
                response.status()
            )));
        }

        let listing = response
            .json::<ListingInfo>()
            .await
            .map_err(|e| AuctionError::Listing(e.to_string()))?;
        Ok(Some(listing))
    }

    async fn mark_sold(&self, listing_id: i64, winner_id: i64) -> Result<(), AuctionError> {
        info!(
            "{:<12} --> 상품 판매 완료 처리: listing_id={}, winner_id={}",
            "Listing", listing_id, winner_id
        );
        let url = format!("{}/marketplace/items/{}/sold", self.base_url, listing_id);
        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "winner_id": winner_id }))
            .send()
            .await
            .map_err(|e| AuctionError::Listing(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AuctionError::Listing(format!(
                "상품 판매 완료 처리 실패: status={}",
                response.status()
            )));
        }
        Ok(())
    }
}
// endregion: --- Http Listing Client
