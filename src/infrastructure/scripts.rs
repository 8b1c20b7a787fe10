//! 页面内执行的 JS 片段

/// 当前文档高度
pub const SCROLL_HEIGHT: &str = "document.documentElement.scrollHeight";

/// 滚动到底部
pub const SCROLL_TO_BOTTOM: &str = "window.scrollTo(0, document.body.scrollHeight)";

/// 向下滚动一屏
pub const SCROLL_BY_VIEWPORT: &str = "window.scrollBy(0, window.innerHeight)";

/// 是否已滚到底
pub const AT_BOTTOM: &str =
    "window.scrollY + window.innerHeight >= document.body.scrollHeight - 2";

/// 读取视频卡片（标题、链接、缩略图）
///
/// 标题优先取卡片里的标题链接，其次取 `<a>` 自身的 title 属性。
pub fn video_cards(anchor_selector: &str) -> String {
    let selector = serde_json::to_string(anchor_selector).unwrap_or_else(|_| "\"a\"".to_string());
    format!(
        r#"
        (() => {{
            const anchors = Array.from(document.querySelectorAll({}));
            return anchors.map(a => {{
                const card = a.closest("[class*='upload-video-card']") || a.parentElement;
                const titleEl = card ? card.querySelector("div.bili-video-card__title a") : null;
                const img = card ? card.querySelector("img") : null;
                return {{
                    title: ((titleEl && titleEl.textContent) || a.getAttribute("title") || "").trim(),
                    href: a.getAttribute("href") || "",
                    thumb: (img && img.getAttribute("src")) || ""
                }};
            }});
        }})()
        "#,
        selector
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_cards_quotes_selector() {
        let script = video_cards("a[href*='/video/'][target='_blank']");
        assert!(script.contains(r#"querySelectorAll("a[href*='/video/'][target='_blank']")"#));
    }
}
