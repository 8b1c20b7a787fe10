//! 测试用的内存页面和脚本化 LLM
//!
//! 不需要浏览器和网络：页面内容、脚本返回值、LLM 回复都在测试里写死。

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value as JsonValue};

use up_finder::config::Config;
use up_finder::error::{CrawlError, CrawlResult};
use up_finder::infrastructure::selectors::*;
use up_finder::infrastructure::{scripts, Locator, NavigableView};
use up_finder::services::{PromptStore, RelevanceOracle};
use up_finder::TextOracle;

// ========== 页面事件记录 ==========

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Opened(String),
    Closed(String),
    Clicked { page: String, locator: String },
    Evaluated { page: String, script: String },
}

#[derive(Debug, Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<Event>>>);

impl Journal {
    fn push(&self, event: Event) {
        self.0.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.lock().unwrap().clone()
    }

    pub fn opened(&self, page: &str) -> usize {
        self.count(|e| matches!(e, Event::Opened(p) if p == page))
    }

    pub fn closed(&self, page: &str) -> usize {
        self.count(|e| matches!(e, Event::Closed(p) if p == page))
    }

    pub fn evaluated(&self, page: &str, script: &str) -> usize {
        self.count(|e| matches!(e, Event::Evaluated { page: p, script: s } if p == page && s == script))
    }

    /// 打开过的页面都已关闭
    pub fn all_popups_closed(&self) -> bool {
        let events = self.events();
        let mut open: HashMap<&str, i64> = HashMap::new();
        for event in &events {
            match event {
                Event::Opened(p) => *open.entry(p.as_str()).or_default() += 1,
                Event::Closed(p) => *open.entry(p.as_str()).or_default() -= 1,
                _ => {}
            }
        }
        open.values().all(|n| *n <= 0)
    }

    fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
        self.0.lock().unwrap().iter().filter(|e| pred(e)).count()
    }
}

// ========== 内存页面 ==========

#[derive(Debug, Clone, Default)]
pub struct MockElement {
    text: String,
    attrs: HashMap<String, String>,
    popup: Option<Arc<MockPage>>,
    next_page: bool,
}

impl MockElement {
    pub fn text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Default::default()
        }
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    /// 点击 / open_popup 时打开的页面
    pub fn popup(mut self, page: Arc<MockPage>) -> Self {
        self.popup = Some(page);
        self
    }

    /// 点击后切换到下一页内容
    pub fn next_page(mut self) -> Self {
        self.next_page = true;
        self
    }
}

#[derive(Debug, Default)]
pub struct MockPage {
    pub name: String,
    title: String,
    elements: HashMap<String, Vec<MockElement>>,
    /// 脚本 → 依次返回的值，最后一个值会一直返回
    evals: Mutex<Vec<(String, VecDeque<JsonValue>)>>,
}

impl MockPage {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn element(mut self, selector: &str, element: MockElement) -> Self {
        self.elements
            .entry(selector.to_string())
            .or_default()
            .push(element);
        self
    }

    pub fn texts(mut self, selector: &str, texts: &[&str]) -> Self {
        for text in texts {
            self = self.element(selector, MockElement::text(text));
        }
        self
    }

    /// 脚本返回值；`script` 既可以是完整脚本，也可以是脚本中的一段
    pub fn eval(self, script: &str, values: Vec<JsonValue>) -> Self {
        self.evals
            .lock()
            .unwrap()
            .push((script.to_string(), values.into_iter().collect()));
        self
    }

    pub fn build(self) -> Arc<Self> {
        Arc::new(self)
    }

    fn matching(&self, locator: &Locator) -> Vec<&MockElement> {
        self.elements
            .get(&locator.selector)
            .map(|elements| {
                elements
                    .iter()
                    .filter(|e| match &locator.has_text {
                        Some(needle) => e.text.contains(needle.as_str()),
                        None => true,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn nth(&self, locator: &Locator) -> Option<&MockElement> {
        self.matching(locator).into_iter().nth(locator.nth)
    }

    fn run_script(&self, script: &str) -> JsonValue {
        let mut evals = self.evals.lock().unwrap();
        let index = evals
            .iter()
            .position(|(key, _)| key == script)
            .or_else(|| evals.iter().position(|(key, _)| script.contains(key.as_str())));

        let Some(index) = index else {
            return JsonValue::Null;
        };
        let queue = &mut evals[index].1;
        if queue.len() > 1 {
            queue.pop_front().unwrap_or(JsonValue::Null)
        } else {
            queue.front().cloned().unwrap_or(JsonValue::Null)
        }
    }
}

/// 内存中的可导航页面；`pages` 为依次翻页后的内容
pub struct MockView {
    pages: Vec<Arc<MockPage>>,
    current: AtomicUsize,
    pub journal: Journal,
}

impl MockView {
    pub fn new(pages: Vec<Arc<MockPage>>) -> Self {
        Self::with_journal(pages, Journal::default())
    }

    fn with_journal(pages: Vec<Arc<MockPage>>, journal: Journal) -> Self {
        Self {
            pages,
            current: AtomicUsize::new(0),
            journal,
        }
    }

    fn page(&self) -> &Arc<MockPage> {
        let index = self.current.load(Ordering::SeqCst).min(self.pages.len() - 1);
        &self.pages[index]
    }
}

#[async_trait]
impl NavigableView for MockView {
    async fn navigate(&self, _url: &str) -> CrawlResult<()> {
        Ok(())
    }

    async fn url(&self) -> CrawlResult<String> {
        Ok(format!("mock://{}", self.page().name))
    }

    async fn title(&self) -> CrawlResult<String> {
        Ok(self.page().title.clone())
    }

    async fn wait_for(&self, locator: &Locator, timeout: Duration) -> CrawlResult<()> {
        if self.page().matching(locator).is_empty() {
            Err(CrawlError::timeout(locator.to_string(), timeout.as_millis() as u64))
        } else {
            Ok(())
        }
    }

    async fn count(&self, locator: &Locator) -> CrawlResult<usize> {
        Ok(self.page().matching(locator).len())
    }

    async fn texts(&self, locator: &Locator) -> CrawlResult<Vec<String>> {
        Ok(self
            .page()
            .matching(locator)
            .iter()
            .map(|e| e.text.trim().to_string())
            .collect())
    }

    async fn text(&self, locator: &Locator) -> CrawlResult<Option<String>> {
        Ok(self.page().nth(locator).map(|e| e.text.trim().to_string()))
    }

    async fn attribute(&self, locator: &Locator, name: &str) -> CrawlResult<Option<String>> {
        Ok(self
            .page()
            .nth(locator)
            .and_then(|e| e.attrs.get(name).cloned()))
    }

    async fn click(&self, locator: &Locator) -> CrawlResult<()> {
        let page = self.page().clone();
        let element = page
            .nth(locator)
            .ok_or_else(|| CrawlError::missing(locator.to_string()))?;
        self.journal.push(Event::Clicked {
            page: page.name.clone(),
            locator: locator.to_string(),
        });
        if element.next_page {
            self.current.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }

    async fn evaluate(&self, script: &str) -> CrawlResult<JsonValue> {
        let page = self.page();
        self.journal.push(Event::Evaluated {
            page: page.name.clone(),
            script: script.to_string(),
        });
        Ok(page.run_script(script))
    }

    async fn open_popup(&self, trigger: &Locator) -> CrawlResult<Box<dyn NavigableView>> {
        let popup = self
            .page()
            .nth(trigger)
            .and_then(|e| e.popup.clone())
            .ok_or_else(|| CrawlError::missing(format!("弹出页: {}", trigger)))?;

        self.journal.push(Event::Opened(popup.name.clone()));
        Ok(Box::new(MockView::with_journal(
            vec![popup],
            self.journal.clone(),
        )))
    }

    async fn close(&self) -> CrawlResult<()> {
        self.journal.push(Event::Closed(self.page().name.clone()));
        Ok(())
    }
}

// ========== 站点页面构造 ==========

/// 搜索结果中的一个视频
pub struct Item {
    pub author: String,
    pub detail: Arc<MockPage>,
}

impl Item {
    pub fn new(author: &str, detail: Arc<MockPage>) -> Self {
        Self {
            author: author.to_string(),
            detail,
        }
    }
}

/// 搜索结果页；`has_next` 时带可点击的下一页按钮
pub fn search_page(name: &str, items: Vec<Item>, has_next: bool) -> Arc<MockPage> {
    let next = has_next.then(|| MockElement::text(NEXT_PAGE_TEXT).next_page());
    results_page(name, items, next)
}

/// 最后一页：下一页按钮仍在，但已禁用
pub fn last_search_page(name: &str, items: Vec<Item>) -> Arc<MockPage> {
    let next = MockElement::text(NEXT_PAGE_TEXT)
        .attr("disabled", "")
        .next_page();
    results_page(name, items, Some(next))
}

fn results_page(name: &str, items: Vec<Item>, next: Option<MockElement>) -> Arc<MockPage> {
    let mut page = MockPage::new(name).element(RESULT_TAB, MockElement::text(RESULT_TAB_VIDEO_TEXT));
    for item in items {
        page = page
            .element(
                RESULT_VIDEO_LINK,
                MockElement::text("")
                    .attr("href", &format!("//www.bilibili.com/video/{}", item.detail.name))
                    .popup(item.detail),
            )
            .element(RESULT_AUTHOR, MockElement::text(&item.author));
    }
    if let Some(next) = next {
        page = page.element(NEXT_PAGE_BUTTON, next);
    }
    page.build()
}

/// 视频详情页
pub fn detail_page(name: &str, title: &str, uploader: &str, profile: Arc<MockPage>) -> Arc<MockPage> {
    MockPage::new(name)
        .title(&format!("{}_哔哩哔哩_bilibili", title))
        .texts(VIDEO_TAG, &["数码", "键盘"])
        .element(UP_PANEL, MockElement::text(""))
        .element(
            UP_NAME_LINK,
            MockElement::text(uploader)
                .attr("href", &format!("//space.bilibili.com/{}", profile.name))
                .popup(profile),
        )
        .build()
}

/// UP 主空间：`uploads` 个投稿，`top` 个最多播放卡片
pub fn profile_page(name: &str, uploads: usize, top: usize) -> Arc<MockPage> {
    let captions: Vec<String> = (1..=uploads).map(|i| format!("{} 的投稿 {}", name, i)).collect();
    let caption_refs: Vec<&str> = captions.iter().map(String::as_str).collect();

    let mut page = MockPage::new(name)
        .element(NAV_TAB, MockElement::text("主页"))
        .element(NAV_TAB, MockElement::text(NAV_TAB_UPLOADS_TEXT))
        .texts(UPLOAD_CAPTION, &caption_refs)
        .element(SORT_FILTER, MockElement::text("最新发布"))
        .element(SORT_FILTER, MockElement::text(SORT_MOST_VIEWED_TEXT))
        .eval(scripts::SCROLL_HEIGHT, vec![json!(1200)])
        .eval(scripts::AT_BOTTOM, vec![json!(true)])
        .eval("querySelectorAll", vec![video_cards(name, top)]);
    for _ in 0..top {
        page = page.element(MOST_VIEWED_CARD_PROBES[0], MockElement::text(""));
    }
    page.build()
}

/// 已注销账号的空间
pub fn deactivated_profile(name: &str) -> Arc<MockPage> {
    MockPage::new(name)
        .element(ERROR_CODE_MARKER, MockElement::text("错误号: 404"))
        .build()
}

pub fn video_cards(owner: &str, n: usize) -> JsonValue {
    JsonValue::Array(
        (1..=n)
            .map(|i| {
                json!({
                    "title": format!("{} 热门 {}", owner, i),
                    "href": format!("//www.bilibili.com/video/{}-top{}", owner, i),
                    "thumb": format!("//i0.hdslb.com/{}-{}.jpg", owner, i),
                })
            })
            .collect(),
    )
}

// ========== 脚本化 LLM ==========

type Responder = Box<dyn Fn(&str) -> CrawlResult<String> + Send + Sync>;

/// 按用户输入决定回复的 LLM，记录所有请求
pub struct MockOracle {
    responder: Responder,
    calls: Mutex<Vec<String>>,
}

impl MockOracle {
    pub fn new(responder: impl Fn(&str) -> CrawlResult<String> + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            responder: Box::new(responder),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// 所有问题都回复同一句话
    pub fn always(reply: &str) -> Arc<Self> {
        let reply = reply.to_string();
        Self::new(move |_| Ok(reply.clone()))
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// 单视频判断次数
    pub fn video_calls(&self) -> usize {
        self.calls().iter().filter(|c| c.starts_with("视频标题是")).count()
    }

    /// UP 主空间判断次数
    pub fn profile_calls(&self) -> usize {
        self.calls().iter().filter(|c| c.starts_with("视频标题列表")).count()
    }
}

#[async_trait]
impl TextOracle for MockOracle {
    async fn complete(&self, _system_instructions: &str, user_text: &str) -> CrawlResult<String> {
        self.calls.lock().unwrap().push(user_text.to_string());
        (self.responder)(user_text)
    }
}

// ========== 配置 ==========

/// 不等待、不暂停的测试配置
pub fn test_config(num_up: usize) -> Config {
    Config {
        num_up,
        min_acceptable_videos: 10,
        top_videos_per_uploader: 3,
        element_timeout_ms: 5,
        next_page_timeout_ms: 5,
        scroll_pause_ms: 0,
        top_videos_scroll_pause_ms: 0,
        max_scroll_rounds: 10,
        ..Config::default()
    }
}

pub fn relevance(oracle: &Arc<MockOracle>, verbose: bool) -> Arc<RelevanceOracle> {
    Arc::new(RelevanceOracle::new(
        oracle.clone(),
        PromptStore::builtin(),
        verbose,
    ))
}
