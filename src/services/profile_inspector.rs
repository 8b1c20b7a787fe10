//! UP 主空间检查 - 业务能力层
//!
//! 流程：账号是否可用 → 投稿页 → 滚动加载全部标题 → 数量预筛 →
//! LLM 判断 → 切换"最多播放" → 收集代表视频。

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::CrawlResult;
use crate::infrastructure::selectors::*;
use crate::infrastructure::{
    eval_as, first_matching, normalize_href, scripts, scroll_until_stable, Locator,
    NavigableView,
};
use crate::models::{TopVideo, UploaderRecord, UploaderRef};
use crate::services::relevance_oracle::{AmbiguityPolicy, RelevanceOracle};

/// 检查结果；除 `Accepted` 外都表示不收录
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileOutcome {
    Accepted(UploaderRecord),
    /// 账号已注销或不存在
    Unavailable,
    /// 投稿数不足，未调用 LLM
    TooFewVideos { count: usize },
    NotRelevant,
    /// LLM 回复无法判定（宽松模式）
    Undecided,
}

impl ProfileOutcome {
    pub fn into_record(self) -> Option<UploaderRecord> {
        match self {
            ProfileOutcome::Accepted(record) => Some(record),
            _ => None,
        }
    }
}

/// 脚本返回的原始卡片
#[derive(Debug, Deserialize)]
struct RawVideoCard {
    #[serde(default)]
    title: String,
    #[serde(default)]
    href: String,
    #[serde(default)]
    thumb: String,
}

/// UP 主空间检查器
pub struct ProfileInspector {
    oracle: Arc<RelevanceOracle>,
    policy: AmbiguityPolicy,
    min_acceptable_videos: usize,
    top_videos: usize,
    element_timeout: Duration,
    scroll_pause: Duration,
    top_videos_scroll_pause: Duration,
    max_scroll_rounds: usize,
}

impl ProfileInspector {
    pub fn new(config: &Config, oracle: Arc<RelevanceOracle>) -> Self {
        Self {
            oracle,
            policy: AmbiguityPolicy::from_verbose(config.verbose),
            min_acceptable_videos: config.min_acceptable_videos,
            top_videos: config.top_videos_per_uploader,
            element_timeout: config.element_timeout(),
            scroll_pause: config.scroll_pause(),
            top_videos_scroll_pause: config.top_videos_scroll_pause(),
            max_scroll_rounds: config.max_scroll_rounds,
        }
    }

    /// 检查一个已打开的 UP 主空间
    pub async fn inspect(
        &self,
        profile: &dyn NavigableView,
        uploader: &UploaderRef,
        query: &str,
    ) -> CrawlResult<ProfileOutcome> {
        if self.is_unavailable(profile).await? {
            info!("UP主 {} 的账号已注销，跳过", uploader.name);
            return Ok(ProfileOutcome::Unavailable);
        }

        let uploads_tab = Locator::new(NAV_TAB).with_text(NAV_TAB_UPLOADS_TEXT);
        profile.wait_for(&uploads_tab, self.element_timeout).await?;
        profile.click(&uploads_tab).await?;

        let captions = self.collect_captions(profile).await?;
        if captions.len() < self.min_acceptable_videos {
            info!(
                "UP主 {} 的视频数量 {} 小于最小可接受数量 {}，跳过",
                uploader.name,
                captions.len(),
                self.min_acceptable_videos
            );
            return Ok(ProfileOutcome::TooFewVideos {
                count: captions.len(),
            });
        }

        let judgment = self.oracle.judge_profile(&captions, query).await?;
        match self.policy.resolve(judgment)? {
            Some(true) => {}
            Some(false) => {
                info!("UP主 {} 的投稿与搜索主题无关", uploader.name);
                return Ok(ProfileOutcome::NotRelevant);
            }
            None => return Ok(ProfileOutcome::Undecided),
        }

        let anchor_selector = self.switch_to_most_viewed(profile).await?;
        let videos = self.collect_top_videos(profile, &anchor_selector).await?;
        info!(
            "✓ UP主 {} 符合搜索结果，收集到 {} 个代表视频",
            uploader.name,
            videos.len()
        );

        Ok(ProfileOutcome::Accepted(UploaderRecord {
            uploader: uploader.name.clone(),
            profile: uploader.profile_url.clone(),
            videos,
        }))
    }

    /// 注销账号的空间页会显示 404 错误码
    async fn is_unavailable(&self, profile: &dyn NavigableView) -> CrawlResult<bool> {
        let marker = profile.text(&Locator::new(ERROR_CODE_MARKER)).await?;
        Ok(marker.is_some_and(|text| text.contains(ERROR_CODE_NOT_FOUND)))
    }

    /// 滚动到页面高度稳定后读取全部投稿标题
    async fn collect_captions(&self, profile: &dyn NavigableView) -> CrawlResult<Vec<String>> {
        let captions = Locator::new(UPLOAD_CAPTION);
        profile.wait_for(&captions, self.element_timeout).await?;

        let report = scroll_until_stable(profile, self.scroll_pause, self.max_scroll_rounds).await?;
        debug!("投稿页滚动 {} 次 (收敛: {})", report.scrolls, report.converged);

        let texts = profile.texts(&captions).await?;
        Ok(texts.into_iter().filter(|t| !t.is_empty()).collect())
    }

    /// 切换到"最多播放"，返回实际出现的视频卡片选择器
    async fn switch_to_most_viewed(&self, profile: &dyn NavigableView) -> CrawlResult<String> {
        let most_viewed = Locator::new(SORT_FILTER).with_text(SORT_MOST_VIEWED_TEXT);
        profile.wait_for(&most_viewed, self.element_timeout).await?;
        profile.click(&most_viewed).await?;

        first_matching(
            profile,
            SORT_MOST_VIEWED_TEXT,
            &MOST_VIEWED_CARD_PROBES,
            self.element_timeout,
        )
        .await
    }

    /// 收集前 N 个代表视频，按链接去重；首屏不足时向下滚动加载
    async fn collect_top_videos(
        &self,
        profile: &dyn NavigableView,
        anchor_selector: &str,
    ) -> CrawlResult<Vec<TopVideo>> {
        let anchors = Locator::new(anchor_selector);

        let mut rounds = 0;
        while profile.count(&anchors).await? < self.top_videos && rounds < self.max_scroll_rounds {
            rounds += 1;
            profile.evaluate(scripts::SCROLL_BY_VIEWPORT).await?;
            sleep(self.top_videos_scroll_pause).await;

            if profile.count(&anchors).await? >= self.top_videos {
                break;
            }
            let at_bottom = profile.evaluate(scripts::AT_BOTTOM).await?;
            if at_bottom.as_bool().unwrap_or(true) {
                break;
            }
        }

        let cards: Vec<RawVideoCard> =
            eval_as(profile, &scripts::video_cards(anchor_selector)).await?;

        Ok(dedupe_cards(cards, self.top_videos))
    }
}

fn dedupe_cards(cards: Vec<RawVideoCard>, limit: usize) -> Vec<TopVideo> {
    let mut seen = HashSet::new();
    let mut videos = Vec::new();

    for card in cards {
        let href = normalize_href(&card.href);
        if href.is_empty() || !seen.insert(href.clone()) {
            continue;
        }
        videos.push(TopVideo {
            title: card.title.trim().to_string(),
            href,
            thumb: normalize_href(&card.thumb),
        });
        if videos.len() >= limit {
            break;
        }
    }

    videos
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(title: &str, href: &str) -> RawVideoCard {
        RawVideoCard {
            title: title.to_string(),
            href: href.to_string(),
            thumb: "//i0.hdslb.com/x.jpg".to_string(),
        }
    }

    #[test]
    fn test_dedupe_cards_by_link_and_limit() {
        let cards = vec![
            card("第一", "//www.bilibili.com/video/BV1"),
            card("第一(封面)", "https://www.bilibili.com/video/BV1"),
            card("", ""),
            card("第二", "//www.bilibili.com/video/BV2"),
            card("第三", "//www.bilibili.com/video/BV3"),
        ];

        let videos = dedupe_cards(cards, 2);
        assert_eq!(videos.len(), 2);
        assert_eq!(videos[0].title, "第一");
        assert_eq!(videos[0].href, "https://www.bilibili.com/video/BV1");
        assert_eq!(videos[0].thumb, "https://i0.hdslb.com/x.jpg");
        assert_eq!(videos[1].href, "https://www.bilibili.com/video/BV2");
    }

    #[test]
    fn test_into_record() {
        assert_eq!(ProfileOutcome::Unavailable.into_record(), None);
        assert_eq!(
            ProfileOutcome::TooFewVideos { count: 3 }.into_record(),
            None
        );
    }
}
