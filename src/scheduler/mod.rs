/// 경매 상태 조정 스케줄러
/// 벽시계 기준으로 SCHEDULED -> ACTIVE, ACTIVE -> ENDED 전이를 수행한다.
/// 같은 스윕이 POST /auctions/system/update-statuses 로도 호출된다.
// region:    --- Imports
use crate::auction::store::AuctionStore;
use crate::bidding::commands;
use crate::error::AuctionError;
use crate::listing::ListingClient;
use crate::notifier::Notifier;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::{debug, error, info};

// endregion: --- Imports

// region:    --- Sweep
/// 한 번의 스윕 결과
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct SweepReport {
    pub activated: u64,
    pub closed: u64,
    pub failed: u64,
}

impl SweepReport {
    /// 이번 스윕에서 전이된 경매 수
    pub fn updated_count(&self) -> u64 {
        self.activated + self.closed
    }
}

/// 상태가 벽시계보다 뒤처진 경매를 모두 전이시킨다.
/// 개별 경매의 종료 실패는 기록만 하고 스윕을 중단하지 않는다.
pub async fn sweep(
    store: &impl AuctionStore,
    listing_client: &impl ListingClient,
    notifier: &impl Notifier,
) -> Result<SweepReport, AuctionError> {
    let now = Utc::now();
    let mut report = SweepReport::default();

    // SCHEDULED -> ACTIVE
    report.activated = store.activate_due(now).await?;

    // ACTIVE -> ENDED
    let expired = store.expired_active(now).await?;
    for auction in expired {
        match commands::end_auction(auction.id, None, store, listing_client, notifier).await {
            Ok(_) => report.closed += 1,
            // 수동 종료와의 경합에서 진 경우: 이미 원하는 상태다
            Err(AuctionError::AlreadyEnded) => {}
            Err(e) => {
                error!(
                    "{:<12} --> 경매 종료 실패: auction_id={}, error={:?}",
                    "Scheduler", auction.id, e
                );
                report.failed += 1;
            }
        }
    }

    Ok(report)
}
// endregion: --- Sweep

// region:    --- Auction Scheduler
/// 주기적으로 스윕을 실행하는 백그라운드 태스크
pub struct AuctionScheduler<S, L, N> {
    store: Arc<S>,
    listing_client: Arc<L>,
    notifier: Arc<N>,
    interval_secs: u64,
}

impl<S, L, N> AuctionScheduler<S, L, N>
where
    S: AuctionStore + 'static,
    L: ListingClient + 'static,
    N: Notifier + 'static,
{
    pub fn new(
        store: Arc<S>,
        listing_client: Arc<L>,
        notifier: Arc<N>,
        interval_secs: u64,
    ) -> Self {
        Self {
            store,
            listing_client,
            notifier,
            interval_secs,
        }
    }

    /// 스케줄러 시작
    pub async fn start(&self) {
        let store = Arc::clone(&self.store);
        let listing_client = Arc::clone(&self.listing_client);
        let notifier = Arc::clone(&self.notifier);
        let interval_secs = self.interval_secs;

        tokio::spawn(async move {
            let mut interval = interval(Duration::from_secs(interval_secs));
            loop {
                interval.tick().await;
                match sweep(&*store, &*listing_client, &*notifier).await {
                    Ok(report) if report.updated_count() > 0 || report.failed > 0 => {
                        info!(
                            "{:<12} --> 스윕 완료: activated={}, closed={}, failed={}",
                            "Scheduler", report.activated, report.closed, report.failed
                        );
                    }
                    Ok(_) => {
                        debug!("{:<12} --> 스윕 완료: 전이 대상 없음", "Scheduler");
                    }
                    Err(e) => {
                        error!("{:<12} --> 스윕 중 오류 발생: {:?}", "Scheduler", e);
                    }
                }
            }
        });
    }
}
// endregion: --- Auction Scheduler
