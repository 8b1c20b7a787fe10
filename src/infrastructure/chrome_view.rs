//! 基于 chromiumoxide 的页面实现
//!
//! 持有一个 Page，对外只暴露 [`NavigableView`] 的能力。

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::element::Element;
use chromiumoxide::{Browser, Page};
use reqwest::Url;
use serde_json::Value as JsonValue;
use tokio::time::{sleep, timeout};
use tracing::debug;

use super::view::{normalize_href, Locator, NavigableView};
use crate::error::{CrawlError, CrawlResult};

/// 轮询元素的间隔
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// 新标签页打开后的额外等待，给懒加载内容一点时间
const POPUP_SETTLE: Duration = Duration::from_millis(500);

/// chromiumoxide 页面
pub struct ChromeView {
    browser: Arc<Browser>,
    page: Page,
}

impl ChromeView {
    pub fn new(browser: Arc<Browser>, page: Page) -> Self {
        Self { browser, page }
    }

    /// 所有匹配定位的元素（已按文字过滤）
    async fn matching(&self, locator: &Locator) -> CrawlResult<Vec<Element>> {
        let elements = self.page.find_elements(locator.selector.as_str()).await?;
        let Some(needle) = &locator.has_text else {
            return Ok(elements);
        };

        let mut filtered = Vec::new();
        for element in elements {
            let text = element.inner_text().await?.unwrap_or_default();
            if text.contains(needle.as_str()) {
                filtered.push(element);
            }
        }
        Ok(filtered)
    }

    async fn nth(&self, locator: &Locator) -> CrawlResult<Option<Element>> {
        Ok(self.matching(locator).await?.into_iter().nth(locator.nth))
    }

    async fn require(&self, locator: &Locator) -> CrawlResult<Element> {
        self.nth(locator)
            .await?
            .ok_or_else(|| CrawlError::missing(locator.to_string()))
    }

    /// 把链接解析为绝对地址
    async fn absolute_href(&self, href: &str) -> CrawlResult<String> {
        let href = normalize_href(href);
        if Url::parse(&href).is_ok() {
            return Ok(href);
        }
        let base = self.url().await?;
        Url::parse(&base)
            .and_then(|base| base.join(&href))
            .map(|url| url.to_string())
            .map_err(|e| CrawlError::missing(format!("无法解析链接 {}: {}", href, e)))
    }
}

#[async_trait]
impl NavigableView for ChromeView {
    async fn navigate(&self, url: &str) -> CrawlResult<()> {
        debug!("导航到: {}", url);
        self.page.goto(url).await?;
        self.page.wait_for_navigation().await?;
        Ok(())
    }

    async fn url(&self) -> CrawlResult<String> {
        Ok(self.page.url().await?.unwrap_or_default())
    }

    async fn title(&self) -> CrawlResult<String> {
        Ok(self.page.get_title().await?.unwrap_or_default())
    }

    async fn wait_for(&self, locator: &Locator, limit: Duration) -> CrawlResult<()> {
        let polling = async {
            loop {
                if !self.matching(locator).await?.is_empty() {
                    return Ok::<(), CrawlError>(());
                }
                sleep(POLL_INTERVAL).await;
            }
        };

        match timeout(limit, polling).await {
            Ok(result) => result,
            Err(_) => Err(CrawlError::timeout(
                locator.to_string(),
                limit.as_millis() as u64,
            )),
        }
    }

    async fn count(&self, locator: &Locator) -> CrawlResult<usize> {
        Ok(self.matching(locator).await?.len())
    }

    async fn texts(&self, locator: &Locator) -> CrawlResult<Vec<String>> {
        let mut texts = Vec::new();
        for element in self.matching(locator).await? {
            texts.push(element.inner_text().await?.unwrap_or_default().trim().to_string());
        }
        Ok(texts)
    }

    async fn text(&self, locator: &Locator) -> CrawlResult<Option<String>> {
        match self.nth(locator).await? {
            Some(element) => Ok(element
                .inner_text()
                .await?
                .map(|text| text.trim().to_string())),
            None => Ok(None),
        }
    }

    async fn attribute(&self, locator: &Locator, name: &str) -> CrawlResult<Option<String>> {
        match self.nth(locator).await? {
            Some(element) => Ok(element.attribute(name).await?),
            None => Ok(None),
        }
    }

    async fn click(&self, locator: &Locator) -> CrawlResult<()> {
        debug!("点击: {}", locator);
        self.require(locator).await?.click().await?;
        Ok(())
    }

    async fn evaluate(&self, script: &str) -> CrawlResult<JsonValue> {
        let result = self.page.evaluate(script).await?;
        Ok(result.value().cloned().unwrap_or(JsonValue::Null))
    }

    async fn open_popup(&self, trigger: &Locator) -> CrawlResult<Box<dyn NavigableView>> {
        let href = self
            .attribute(trigger, "href")
            .await?
            .filter(|href| !href.trim().is_empty())
            .ok_or_else(|| CrawlError::missing(format!("{} 没有 href", trigger)))?;
        let url = self.absolute_href(&href).await?;

        debug!("在新标签页打开: {}", url);
        let page = self.browser.new_page(url.as_str()).await?;
        page.wait_for_navigation().await?;
        sleep(POPUP_SETTLE).await;

        Ok(Box::new(ChromeView::new(self.browser.clone(), page)))
    }

    async fn close(&self) -> CrawlResult<()> {
        self.page.clone().close().await?;
        Ok(())
    }
}
