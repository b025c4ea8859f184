// region:    --- Imports
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

// endregion: --- Imports

// region:    --- Auction Error
/// 경매 도메인 오류
/// ConcurrentBidConflict만 재시도 가능하며, 나머지 검증 오류는 종결이다.
#[derive(Debug, thiserror::Error)]
pub enum AuctionError {
    #[error("경매를 찾을 수 없습니다")]
    NotFound,

    #[error("상품을 찾을 수 없습니다")]
    ListingNotFound,

    #[error("입찰 가능한 경매가 아닙니다")]
    AuctionNotOpen,

    #[error("자신의 상품에는 입찰할 수 없습니다")]
    SelfBidRejected,

    #[error("입찰 금액이 최소 입찰 금액보다 낮습니다")]
    BidTooLow { minimum: i64 },

    #[error("동시 입찰 충돌이 발생했습니다. 현재가를 확인한 뒤 다시 시도해주세요")]
    ConcurrentBidConflict,

    #[error("경매가 이미 종료되었습니다")]
    AlreadyEnded,

    #[error("해당 상품에 대한 경매가 이미 존재합니다")]
    DuplicateAuction,

    #[error("권한이 없습니다")]
    Unauthorized,

    #[error("판매 중인 상품이 아닙니다")]
    ListingNotActive,

    #[error("잘못된 요청입니다: {0}")]
    Invalid(String),

    #[error("데이터베이스 오류")]
    Database(#[from] sqlx::Error),

    #[error("상품 서비스 호출에 실패했습니다: {0}")]
    Listing(String),
}

impl AuctionError {
    /// 클라이언트에 내려주는 오류 코드
    pub fn code(&self) -> &'static str {
        match self {
            AuctionError::NotFound | AuctionError::ListingNotFound => "NOT_FOUND",
            AuctionError::AuctionNotOpen => "AUCTION_NOT_OPEN",
            AuctionError::SelfBidRejected => "SELF_BID",
            AuctionError::BidTooLow { .. } => "BID_TOO_LOW",
            AuctionError::ConcurrentBidConflict => "CONCURRENT_BID_CONFLICT",
            AuctionError::AlreadyEnded => "ALREADY_ENDED",
            AuctionError::DuplicateAuction => "DUPLICATE_AUCTION",
            AuctionError::Unauthorized => "UNAUTHORIZED",
            AuctionError::ListingNotActive => "LISTING_NOT_ACTIVE",
            AuctionError::Invalid(_) => "INVALID_REQUEST",
            AuctionError::Database(_) => "DATABASE_ERROR",
            AuctionError::Listing(_) => "LISTING_SERVICE_ERROR",
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AuctionError::NotFound | AuctionError::ListingNotFound => StatusCode::NOT_FOUND,
            AuctionError::ConcurrentBidConflict => StatusCode::CONFLICT,
            AuctionError::Unauthorized => StatusCode::FORBIDDEN,
            AuctionError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuctionError::Listing(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AuctionError {
    fn into_response(self) -> Response {
        if let AuctionError::Database(e) = &self {
            error!("{:<12} --> 데이터베이스 오류: {:?}", "Error", e);
        }

        let mut body = serde_json::json!({
            "error": self.to_string(),
            "code": self.code(),
        });
        // 거절된 입찰에는 즉시 재시도할 수 있도록 최소 금액을 함께 내려준다
        if let AuctionError::BidTooLow { minimum } = &self {
            body["minimum_bid"] = serde_json::json!(minimum);
        }

        (self.status_code(), Json(body)).into_response()
    }
}
// endregion: --- Auction Error
