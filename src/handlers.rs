// region:    --- Imports
use crate::auction::events::AuctionEvent;
use crate::auction::model::AuctionStatus;
use crate::auction::store::PostgresAuctionStore;
use crate::bidding::commands::{self, CreateAuctionCommand, PlaceBidCommand};
use crate::bidding::policy::BidIncrementPolicy;
use crate::database::DatabaseManager;
use crate::error::AuctionError;
use crate::listing::HttpListingClient;
use crate::notifier::{KafkaNotifier, Notifier};
use crate::query;
use crate::scheduler;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- App State
/// 라우터 공유 상태
#[derive(Clone)]
pub struct AppState {
    pub db_manager: Arc<DatabaseManager>,
    pub store: Arc<PostgresAuctionStore>,
    pub listing_client: Arc<HttpListingClient>,
    pub notifier: Arc<KafkaNotifier>,
    pub bid_policy: BidIncrementPolicy,
}
// endregion: --- App State

// region:    --- Request Payloads
/// 입찰 요청 바디
#[derive(Debug, Deserialize)]
pub struct PlaceBidPayload {
    pub bidder_id: i64,
    pub amount: i64,
}

/// 수동 종료 요청 바디
#[derive(Debug, Deserialize)]
pub struct EndAuctionPayload {
    pub seller_id: i64,
}

/// 목록 조회 쿼리 파라미터
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub status: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// 페이지 파라미터
#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}
// endregion: --- Request Payloads

// region:    --- Command Handlers

/// 경매 생성 요청 처리
pub async fn handle_create_auction(
    State(state): State<AppState>,
    Json(cmd): Json<CreateAuctionCommand>,
) -> Result<impl IntoResponse, AuctionError> {
    info!(
        "{:<12} --> 경매 생성 요청: listing_id={}",
        "Command", cmd.listing_id
    );
    let auction = commands::create_auction(cmd, &*state.store, &*state.listing_client).await?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "경매가 성공적으로 등록되었습니다.",
            "auction": auction
        })),
    ))
}

/// 입찰 요청 처리
pub async fn handle_place_bid(
    State(state): State<AppState>,
    Path(auction_id): Path<i64>,
    Json(payload): Json<PlaceBidPayload>,
) -> Result<impl IntoResponse, AuctionError> {
    let cmd = PlaceBidCommand {
        auction_id,
        bidder_id: payload.bidder_id,
        amount: payload.amount,
    };
    info!("{:<12} --> 입찰 요청: {:?}", "Command", cmd);

    let committed = commands::place_bid(cmd, &*state.store, &state.bid_policy).await?;

    // 커밋 이후 알림 발행: 실패해도 확정된 입찰에는 영향이 없다
    let placed = AuctionEvent::BidPlaced {
        auction_id,
        bidder_id: committed.bid.bidder_id,
        amount: committed.bid.amount,
        timestamp: committed.bid.created_at,
    };
    if let Err(e) = state.notifier.publish(placed).await {
        warn!("{:<12} --> 입찰 알림 발행 실패: {}", "Command", e);
    }
    if let Some(outbid) = &committed.outbid {
        let event = AuctionEvent::Outbid {
            auction_id,
            bidder_id: outbid.bidder_id,
            outbid_by: committed.bid.amount,
            timestamp: committed.bid.created_at,
        };
        if let Err(e) = state.notifier.publish(event).await {
            warn!("{:<12} --> 상위 입찰 알림 발행 실패: {}", "Command", e);
        }
    }

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "입찰이 성공적으로 처리되었습니다.",
            "bid": committed.bid,
            "current_bid": committed.bid.amount
        })),
    ))
}

/// 수동 종료 요청 처리(판매자 전용)
pub async fn handle_end_auction(
    State(state): State<AppState>,
    Path(auction_id): Path<i64>,
    Json(payload): Json<EndAuctionPayload>,
) -> Result<impl IntoResponse, AuctionError> {
    info!(
        "{:<12} --> 수동 종료 요청: auction_id={}",
        "Command", auction_id
    );
    let closed = commands::end_auction(
        auction_id,
        Some(payload.seller_id),
        &*state.store,
        &*state.listing_client,
        &*state.notifier,
    )
    .await?;

    Ok(Json(serde_json::json!({
        "message": "경매가 성공적으로 종료되었습니다.",
        "auction": closed.auction,
        "winning_bid": closed.winning_bid
    })))
}

/// 상태 조정 스윕 트리거(크론 대용 시스템 엔드포인트)
pub async fn handle_update_statuses(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AuctionError> {
    info!("{:<12} --> 상태 조정 스윕 요청", "Command");
    let report = scheduler::sweep(&*state.store, &*state.listing_client, &*state.notifier).await?;

    Ok(Json(serde_json::json!({
        "message": format!("{}개 경매 상태를 갱신했습니다.", report.updated_count()),
        "updated_count": report.updated_count(),
        "report": report
    })))
}

// endregion: --- Command Handlers

// region:    --- Query Handlers

/// 경매 목록 조회
pub async fn handle_list_auctions(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, AuctionError> {
    info!("{:<12} --> 경매 목록 조회", "HandlerQuery");
    let status = match params.status.as_deref() {
        Some(s) => Some(s.parse::<AuctionStatus>().map_err(AuctionError::Invalid)?),
        None => None,
    };

    let page = query::handlers::list_auctions(
        &state.db_manager,
        status,
        params.page.unwrap_or(1),
        params.limit.unwrap_or(20),
    )
    .await?;
    Ok(Json(page))
}

/// 경매 상세 조회
pub async fn handle_get_auction(
    State(state): State<AppState>,
    Path(auction_id): Path<i64>,
) -> Result<impl IntoResponse, AuctionError> {
    info!("{:<12} --> 경매 상세 조회 id: {}", "HandlerQuery", auction_id);
    let detail = query::handlers::get_auction_detail(&state.db_manager, auction_id)
        .await?
        .ok_or(AuctionError::NotFound)?;
    Ok(Json(detail))
}

/// 남은 시간 조회
pub async fn handle_time_remaining(
    State(state): State<AppState>,
    Path(auction_id): Path<i64>,
) -> Result<impl IntoResponse, AuctionError> {
    info!("{:<12} --> 남은 시간 조회 id: {}", "HandlerQuery", auction_id);
    let auction = query::handlers::get_auction(&state.db_manager, auction_id)
        .await?
        .ok_or(AuctionError::NotFound)?;
    let remaining = query::handlers::time_remaining(auction.end_time, Utc::now());
    Ok(Json(serde_json::json!({ "time_remaining": remaining })))
}

/// 사용자 입찰 이력 조회
pub async fn handle_user_bids(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, AuctionError> {
    info!(
        "{:<12} --> 사용자 입찰 이력 조회 id: {}",
        "HandlerQuery", user_id
    );
    let page = query::handlers::user_bids(
        &state.db_manager,
        user_id,
        params.page.unwrap_or(1),
        params.limit.unwrap_or(20),
    )
    .await?;
    Ok(Json(page))
}

/// 사용자 등록 경매 조회
pub async fn handle_user_auctions(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, AuctionError> {
    info!(
        "{:<12} --> 사용자 등록 경매 조회 id: {}",
        "HandlerQuery", user_id
    );
    let page = query::handlers::user_auctions(
        &state.db_manager,
        user_id,
        params.page.unwrap_or(1),
        params.limit.unwrap_or(20),
    )
    .await?;
    Ok(Json(page))
}

// endregion: --- Query Handlers
