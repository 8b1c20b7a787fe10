//! 翻页控制 - 编排层
//!
//! 循环：确保"视频"标签页 → 处理当前页 → 配额已满则结束 → 翻到下一页。
//! 找不到可用的"下一页"按钮时视为结果已翻完，正常结束而不是报错。

use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::CrawlResult;
use crate::infrastructure::selectors::*;
use crate::infrastructure::{scripts, Locator, NavigableView};
use crate::models::UploaderRecord;
use crate::services::RelevanceOracle;
use crate::utils::logging;
use crate::workflow::{CrawlSession, ResultPageWalker};

/// 抓取结束原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    QuotaReached,
    PaginationExhausted,
}

impl Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::QuotaReached => write!(f, "已收集到足够的 UP 主"),
            StopReason::PaginationExhausted => write!(f, "没有更多搜索结果"),
        }
    }
}

/// 一次抓取的结果
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    pub records: Vec<UploaderRecord>,
    pub stop_reason: StopReason,
    pub pages_walked: usize,
}

/// 翻页控制器
pub struct PaginationController {
    walker: ResultPageWalker,
    quota: usize,
    element_timeout: Duration,
    next_page_timeout: Duration,
    page_settle: Duration,
}

impl PaginationController {
    pub fn new(config: &Config, oracle: Arc<RelevanceOracle>) -> Self {
        Self {
            walker: ResultPageWalker::new(config, oracle),
            quota: config.num_up,
            element_timeout: config.element_timeout(),
            next_page_timeout: config.next_page_timeout(),
            page_settle: config.scroll_pause(),
        }
    }

    /// 在已打开的搜索结果页上运行抓取
    pub async fn run(&self, view: &dyn NavigableView, query: &str) -> CrawlResult<CrawlOutcome> {
        let mut session = CrawlSession::new(self.quota);
        let mut pages_walked = 0;

        let stop_reason = loop {
            pages_walked += 1;
            logging::log_page_start(pages_walked, session.len(), session.quota());

            self.activate_video_tab(view).await;
            let summary = self
                .walker
                .walk(view, query, pages_walked, &mut session)
                .await?;
            debug!("[第 {} 页] 统计: {:?}", pages_walked, summary);

            if session.is_full() {
                break StopReason::QuotaReached;
            }

            match self.advance(view).await {
                Ok(true) => {}
                Ok(false) => break StopReason::PaginationExhausted,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!("⚠️ 翻页失败，结束抓取: {}", e);
                    break StopReason::PaginationExhausted;
                }
            }
        };

        info!(
            "抓取结束: {} (共 {} 页, 收集 {} 个 UP 主)",
            stop_reason,
            pages_walked,
            session.len()
        );

        Ok(CrawlOutcome {
            records: session.into_records(),
            stop_reason,
            pages_walked,
        })
    }

    /// 切到"视频"标签；找不到时沿用当前页面
    async fn activate_video_tab(&self, view: &dyn NavigableView) {
        let tab = Locator::new(RESULT_TAB).with_text(RESULT_TAB_VIDEO_TEXT);
        let result = match view.wait_for(&tab, self.element_timeout).await {
            Ok(()) => view.click(&tab).await,
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            warn!("⚠️ 未能切换到视频标签: {}", e);
        }
    }

    /// 翻到下一页；没有可用的"下一页"按钮时返回 `Ok(false)`
    async fn advance(&self, view: &dyn NavigableView) -> CrawlResult<bool> {
        view.evaluate(scripts::SCROLL_TO_BOTTOM).await?;

        let next = Locator::new(NEXT_PAGE_BUTTON).with_text(NEXT_PAGE_TEXT);
        match view.wait_for(&next, self.next_page_timeout).await {
            Ok(()) => {}
            Err(e) if e.is_timeout() => {
                info!("未找到下一页按钮，搜索结果已全部浏览");
                return Ok(false);
            }
            Err(e) => return Err(e),
        }

        if view.attribute(&next, "disabled").await?.is_some() {
            info!("下一页按钮已禁用，搜索结果已全部浏览");
            return Ok(false);
        }

        view.click(&next).await?;
        sleep(self.page_settle).await;
        Ok(true)
    }
}
