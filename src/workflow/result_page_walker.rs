//! 搜索结果页处理流程 - 流程层
//!
//! 核心职责：定义"一页搜索结果"的处理顺序
//!
//! 每个视频：
//! 1. 配额已满 → 立即结束本页
//! 2. 卡片 UP 主名已处理过 → 跳过（不打开详情页）
//! 3. 打开详情页 → 标题 + 标签 → LLM 判断
//! 4. 相关 → 打开 UP 主空间 → ProfileInspector
//! 5. 收录 → 追加到结果集合
//!
//! 本条目打开的页面无论结果如何都会关闭。

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{CrawlError, CrawlResult};
use crate::infrastructure::selectors::*;
use crate::infrastructure::{normalize_href, Locator, NavigableView};
use crate::models::{AppendOutcome, CandidateVideo, UploaderRef};
use crate::services::{AmbiguityPolicy, ProfileInspector, ProfileOutcome, RelevanceOracle};
use crate::utils::truncate_text;
use crate::workflow::item_ctx::ItemCtx;
use crate::workflow::session::CrawlSession;

/// 单个条目的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotOutcome {
    /// UP 主已处理过，未打开页面
    AlreadySeen,
    /// 视频与搜索主题无关
    VideoNotRelevant,
    /// LLM 无法判定（宽松模式）
    Undecided,
    /// UP 主空间检查未通过
    Rejected(ProfileOutcome),
    /// 已追加到结果集合
    Appended,
    /// 该 UP 主已收录过
    Duplicate,
    /// 追加时配额已满
    QuotaFull,
}

impl From<AppendOutcome> for SlotOutcome {
    fn from(outcome: AppendOutcome) -> Self {
        match outcome {
            AppendOutcome::Appended => SlotOutcome::Appended,
            AppendOutcome::Duplicate => SlotOutcome::Duplicate,
            AppendOutcome::QuotaFull => SlotOutcome::QuotaFull,
        }
    }
}

/// 一页的处理统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageSummary {
    /// 本页计划处理的条目数
    pub bound: usize,
    /// 实际处理（含跳过）的条目数
    pub visited: usize,
    /// 本页新收录的 UP 主数
    pub appended: usize,
    /// 因错误跳过的条目数
    pub failed: usize,
}

/// 搜索结果页处理流程
pub struct ResultPageWalker {
    oracle: Arc<RelevanceOracle>,
    inspector: ProfileInspector,
    policy: AmbiguityPolicy,
    per_page: usize,
    page_size: usize,
    element_timeout: Duration,
}

impl ResultPageWalker {
    pub fn new(config: &Config, oracle: Arc<RelevanceOracle>) -> Self {
        Self {
            inspector: ProfileInspector::new(config, oracle.clone()),
            oracle,
            policy: AmbiguityPolicy::from_verbose(config.verbose),
            per_page: config.video_go_through_per_page,
            page_size: config.default_videos_per_page,
            element_timeout: config.element_timeout(),
        }
    }

    /// 处理当前结果页
    ///
    /// 只有致命错误（见 [`CrawlError::is_fatal`]）会返回 `Err`，
    /// 其余错误只跳过当前条目。
    pub async fn walk(
        &self,
        view: &dyn NavigableView,
        query: &str,
        page_index: usize,
        session: &mut CrawlSession,
    ) -> CrawlResult<PageSummary> {
        let links = Locator::new(RESULT_VIDEO_LINK);
        match view.wait_for(&links, self.element_timeout).await {
            Ok(()) => {}
            Err(e) if !e.is_fatal() => {
                warn!("[第 {} 页] ⚠️ 搜索结果未加载: {}", page_index, e);
                return Ok(PageSummary::default());
            }
            Err(e) => return Err(e),
        }

        let total = view.count(&links).await?;
        let bound = self.per_page.min(total).min(self.page_size);
        info!("[第 {} 页] 找到 {} 个视频，处理前 {} 个", page_index, total, bound);

        let mut summary = PageSummary {
            bound,
            ..Default::default()
        };

        for slot in 0..bound {
            if session.is_full() {
                info!(
                    "[第 {} 页] ✓ 已收集 {} 个 UP 主，提前结束本页",
                    page_index,
                    session.len()
                );
                break;
            }

            let ctx = ItemCtx::new(page_index, slot + 1, bound);
            summary.visited += 1;

            match self.process_slot(view, query, slot, &ctx, session).await {
                Ok(outcome) => {
                    debug!("{} 处理结果: {:?}", ctx, outcome);
                    if outcome == SlotOutcome::Appended {
                        summary.appended += 1;
                        info!("{} ✅ 已收录 ({}/{})", ctx, session.len(), session.quota());
                    }
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    summary.failed += 1;
                    warn!("{} ⚠️ 处理失败，跳过: {}", ctx, e);
                }
            }
        }

        Ok(summary)
    }

    async fn process_slot(
        &self,
        view: &dyn NavigableView,
        query: &str,
        slot: usize,
        ctx: &ItemCtx,
        session: &mut CrawlSession,
    ) -> CrawlResult<SlotOutcome> {
        let card_name = view
            .text(&Locator::new(RESULT_AUTHOR).nth(slot))
            .await?
            .filter(|name| !name.is_empty())
            .ok_or_else(|| CrawlError::missing(format!("第 {} 个视频的 UP 主名", slot + 1)))?;
        let ctx = ctx.clone().with_uploader(&card_name);

        if !session.dedup.should_process(&card_name) {
            debug!("{} UP 主已处理过，跳过", ctx);
            return Ok(SlotOutcome::AlreadySeen);
        }

        let detail = view
            .open_popup(&Locator::new(RESULT_VIDEO_LINK).nth(slot))
            .await?;
        let outcome = self
            .process_detail(detail.as_ref(), query, &card_name, &ctx, session)
            .await;
        if let Err(e) = detail.close().await {
            warn!("{} 关闭详情页失败: {}", ctx, e);
        }

        outcome
    }

    async fn process_detail(
        &self,
        detail: &dyn NavigableView,
        query: &str,
        card_name: &str,
        ctx: &ItemCtx,
        session: &mut CrawlSession,
    ) -> CrawlResult<SlotOutcome> {
        let page_title = detail.title().await?;
        let tags = detail.texts(&Locator::new(VIDEO_TAG)).await?;
        let video = CandidateVideo::from_page_title(&page_title, tags);
        info!("{} 视频: {}", ctx, truncate_text(&video.title, 60));

        let judgment = self.oracle.judge_video(&video, query).await?;
        match self.policy.resolve(judgment)? {
            Some(true) => {}
            Some(false) => {
                info!("{} 视频与搜索主题无关", ctx);
                return Ok(SlotOutcome::VideoNotRelevant);
            }
            None => return Ok(SlotOutcome::Undecided),
        }

        let uploader = self.locate_uploader(detail).await?;
        if uploader.name != card_name && !session.dedup.should_process(&uploader.name) {
            debug!("{} UP 主 {} 已处理过，跳过", ctx, uploader.name);
            return Ok(SlotOutcome::AlreadySeen);
        }

        info!("{} 🔍 检查 UP 主空间: {}", ctx, uploader.profile_url);
        let profile = detail.open_popup(&uploader.link).await?;
        let inspected = self.inspector.inspect(profile.as_ref(), &uploader, query).await;
        if let Err(e) = profile.close().await {
            warn!("{} 关闭 UP 主空间失败: {}", ctx, e);
        }

        match inspected? {
            ProfileOutcome::Accepted(record) => Ok(session.try_append(record).into()),
            rejected => Ok(SlotOutcome::Rejected(rejected)),
        }
    }

    /// 在详情页中找到 UP 主名和空间链接
    ///
    /// 优先读名字链接；合作投稿等布局下没有名字链接时退回到头像链接。
    async fn locate_uploader(&self, detail: &dyn NavigableView) -> CrawlResult<UploaderRef> {
        detail
            .wait_for(&Locator::new(UP_PANEL), self.element_timeout)
            .await?;

        let name_link = Locator::new(UP_NAME_LINK);
        let (name, link) = match detail.text(&name_link).await? {
            Some(name) if !name.is_empty() => (name, name_link),
            _ => {
                let avatar = Locator::new(UP_AVATAR_LINK);
                let name = match detail.attribute(&avatar, "title").await? {
                    Some(title) if !title.trim().is_empty() => Some(title),
                    _ => detail.attribute(&Locator::new(UP_AVATAR_IMG), "alt").await?,
                };
                let name = name
                    .map(|n| n.trim().to_string())
                    .filter(|n| !n.is_empty())
                    .ok_or_else(|| CrawlError::missing("详情页 UP 主名"))?;
                (name, avatar)
            }
        };

        let profile_url = detail
            .attribute(&link, "href")
            .await?
            .map(|href| normalize_href(&href))
            .filter(|href| !href.is_empty())
            .ok_or_else(|| CrawlError::missing(format!("UP 主 {} 的空间链接", name)))?;

        Ok(UploaderRef {
            name,
            profile_url,
            link,
        })
    }
}
