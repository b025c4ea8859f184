/// 경매 목록 조회(상태 필터, 종료 임박 순)
pub const LIST_AUCTIONS_BY_STATUS: &str =
    "SELECT * FROM auctions WHERE status = $1 ORDER BY end_time ASC LIMIT $2 OFFSET $3";

/// 상태별 경매 수 조회
pub const COUNT_AUCTIONS_BY_STATUS: &str = "SELECT COUNT(*) FROM auctions WHERE status = $1";

/// 전체 경매 목록 조회(종료 임박 순)
pub const LIST_AUCTIONS: &str = "SELECT * FROM auctions ORDER BY end_time ASC LIMIT $1 OFFSET $2";

/// 전체 경매 수 조회
pub const COUNT_AUCTIONS: &str = "SELECT COUNT(*) FROM auctions";

/// 경매 단건 조회
pub const GET_AUCTION: &str = "SELECT * FROM auctions WHERE id = $1";

/// 경매별 최근 입찰 조회
pub const GET_RECENT_BIDS: &str =
    "SELECT * FROM bids WHERE auction_id = $1 ORDER BY created_at DESC LIMIT $2";

/// 입찰자별 입찰 이력 조회
pub const GET_USER_BIDS: &str =
    "SELECT * FROM bids WHERE bidder_id = $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3";

/// 입찰자별 입찰 수 조회
pub const COUNT_USER_BIDS: &str = "SELECT COUNT(*) FROM bids WHERE bidder_id = $1";

/// 판매자별 경매 조회
pub const GET_USER_AUCTIONS: &str =
    "SELECT * FROM auctions WHERE seller_id = $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3";

/// 판매자별 경매 수 조회
pub const COUNT_USER_AUCTIONS: &str = "SELECT COUNT(*) FROM auctions WHERE seller_id = $1";
