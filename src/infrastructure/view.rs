//! 可导航页面抽象
//!
//! 抓取流程只依赖 [`NavigableView`]，不关心背后是哪种浏览器驱动。

use std::fmt::Display;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use crate::error::CrawlResult;

/// 元素定位：CSS 选择器 + 可选的文字过滤 + 第几个匹配
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator {
    pub selector: String,
    pub has_text: Option<String>,
    pub nth: usize,
}

impl Locator {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            has_text: None,
            nth: 0,
        }
    }

    /// 只匹配文字包含 `text` 的元素
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.has_text = Some(text.into());
        self
    }

    /// 取第 `n` 个匹配（从 0 开始）
    pub fn nth(&self, n: usize) -> Self {
        Self {
            nth: n,
            ..self.clone()
        }
    }
}

impl Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.selector)?;
        if let Some(text) = &self.has_text {
            write!(f, ":has-text('{}')", text)?;
        }
        if self.nth > 0 {
            write!(f, " >> nth={}", self.nth)?;
        }
        Ok(())
    }
}

/// 可导航页面
///
/// 所有操作都是挂起点；元素等待超时返回 `NavigationTimeout`。
#[async_trait]
pub trait NavigableView: Send + Sync {
    /// 导航到 URL
    async fn navigate(&self, url: &str) -> CrawlResult<()>;

    /// 当前 URL
    async fn url(&self) -> CrawlResult<String>;

    /// 页面标题
    async fn title(&self) -> CrawlResult<String>;

    /// 等待至少一个匹配元素出现
    async fn wait_for(&self, locator: &Locator, timeout: Duration) -> CrawlResult<()>;

    /// 匹配元素数量（忽略 `nth`）
    async fn count(&self, locator: &Locator) -> CrawlResult<usize>;

    /// 所有匹配元素的文字（已去除首尾空白，忽略 `nth`）
    async fn texts(&self, locator: &Locator) -> CrawlResult<Vec<String>>;

    /// 第 `nth` 个匹配元素的文字，不存在时为 `None`
    async fn text(&self, locator: &Locator) -> CrawlResult<Option<String>>;

    /// 第 `nth` 个匹配元素的属性
    async fn attribute(&self, locator: &Locator, name: &str) -> CrawlResult<Option<String>>;

    /// 点击第 `nth` 个匹配元素
    async fn click(&self, locator: &Locator) -> CrawlResult<()>;

    /// 执行脚本，返回 JSON 值（`undefined` 视为 `null`）
    async fn evaluate(&self, script: &str) -> CrawlResult<JsonValue>;

    /// 打开触发元素指向的新页面
    async fn open_popup(&self, trigger: &Locator) -> CrawlResult<Box<dyn NavigableView>>;

    /// 关闭页面
    async fn close(&self) -> CrawlResult<()>;
}

/// 执行脚本并反序列化为指定类型
pub async fn eval_as<T: DeserializeOwned>(
    view: &dyn NavigableView,
    script: &str,
) -> CrawlResult<T> {
    let value = view.evaluate(script).await?;
    Ok(serde_json::from_value(value)?)
}

/// 把协议相对地址（`//host/path`）补全为 https
pub fn normalize_href(href: &str) -> String {
    let href = href.trim();
    if let Some(rest) = href.strip_prefix("//") {
        format!("https://{}", rest)
    } else {
        href.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_href() {
        assert_eq!(
            normalize_href("//www.bilibili.com/video/BV1xx"),
            "https://www.bilibili.com/video/BV1xx"
        );
        assert_eq!(
            normalize_href(" https://space.bilibili.com/42 "),
            "https://space.bilibili.com/42"
        );
        assert_eq!(normalize_href(""), "");
    }

    #[test]
    fn test_locator_display() {
        let locator = Locator::new("div.radio-filter__item").with_text("最多播放");
        assert_eq!(
            locator.to_string(),
            "div.radio-filter__item:has-text('最多播放')"
        );
        assert_eq!(Locator::new("a").nth(2).to_string(), "a >> nth=2");
    }
}
