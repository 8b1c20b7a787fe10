//! 页面探测原语
//!
//! - [`scroll_until_stable`]：滚动加载直到文档高度不再变化（带轮数上限）
//! - [`first_matching`]：按顺序尝试候选选择器，先出现者为准

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

use super::scripts;
use super::view::{Locator, NavigableView};
use crate::error::{CrawlError, CrawlResult};

/// 滚动加载结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollReport {
    /// 执行了多少次滚动
    pub scrolls: usize,
    /// 最后一次读到的高度
    pub height: i64,
    /// 是否因高度稳定而结束（否则是达到轮数上限）
    pub converged: bool,
}

/// 反复滚动到底部，直到连续两次读到相同的文档高度
///
/// 最多探测 `max_rounds` 次，防止无限滚动页面永不收敛。
pub async fn scroll_until_stable(
    view: &dyn NavigableView,
    pause: Duration,
    max_rounds: usize,
) -> CrawlResult<ScrollReport> {
    let mut previous: Option<i64> = None;
    let mut scrolls = 0;

    for _ in 0..max_rounds {
        let height = read_height(view).await?;
        if previous == Some(height) {
            debug!("页面高度稳定在 {}, 共滚动 {} 次", height, scrolls);
            return Ok(ScrollReport {
                scrolls,
                height,
                converged: true,
            });
        }
        previous = Some(height);

        view.evaluate(scripts::SCROLL_TO_BOTTOM).await?;
        scrolls += 1;
        sleep(pause).await;
    }

    warn!("滚动 {} 轮后页面高度仍在变化，停止加载", max_rounds);
    Ok(ScrollReport {
        scrolls,
        height: previous.unwrap_or_default(),
        converged: false,
    })
}

async fn read_height(view: &dyn NavigableView) -> CrawlResult<i64> {
    let value = view.evaluate(scripts::SCROLL_HEIGHT).await?;
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|h| h as i64))
        .ok_or_else(|| CrawlError::missing(format!("scrollHeight 返回了非数字: {}", value)))
}

/// 依次等待候选选择器，返回第一个出现的
///
/// 某个候选超时就换下一个；全部超时返回 `SelectorExhaustion`。
pub async fn first_matching(
    view: &dyn NavigableView,
    action: &str,
    candidates: &[&str],
    timeout: Duration,
) -> CrawlResult<String> {
    for selector in candidates {
        match view.wait_for(&Locator::new(*selector), timeout).await {
            Ok(()) => {
                debug!("{}: 命中选择器 {}", action, selector);
                return Ok(selector.to_string());
            }
            Err(e) if e.is_timeout() => {
                debug!("{}: 选择器 {} 未出现", action, selector);
            }
            Err(e) => return Err(e),
        }
    }

    Err(CrawlError::SelectorExhaustion {
        action: action.to_string(),
        tried: candidates.iter().map(|s| s.to_string()).collect(),
    })
}
