//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：解析 LLM 配置、加载提示词、获取浏览器
//! 2. **资源管理**：唯一持有 Browser 和搜索结果页
//! 3. **单次抓取**：打开搜索页 → 扩展关键词 → 翻页抓取 → 写报告
//! 4. **全局统计**：输出结束原因和收集数量

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chromiumoxide::Browser;
use reqwest::Url;
use tracing::{info, warn};

use crate::browser;
use crate::clients::{LlmClient, TextOracle};
use crate::config::{BrowserMode, Config};
use crate::infrastructure::{ChromeView, NavigableView};
use crate::orchestrator::pagination::PaginationController;
use crate::services::{PromptStore, RelevanceOracle, ReportWriter};
use crate::utils::logging;

/// 应用主结构
pub struct App {
    config: Config,
    _browser: Arc<Browser>,
    view: ChromeView,
    oracle: Arc<RelevanceOracle>,
    reports: ReportWriter,
}

impl App {
    /// 初始化应用
    ///
    /// 缺少 API Key 在这里直接失败，不会等到第一次调用 LLM。
    pub async fn initialize(config: Config) -> Result<Self> {
        let settings = config.llm_settings()?;
        let client = LlmClient::new(&settings);
        info!(
            "🤖 LLM 提供方: {}, 模型: {}",
            settings.provider.name(),
            client.model_name()
        );
        let client: Arc<dyn TextOracle> = Arc::new(client);

        let prompts = match &config.prompts_dir {
            Some(dir) => PromptStore::from_dir(dir),
            None => PromptStore::builtin(),
        };
        let oracle = Arc::new(RelevanceOracle::new(client, prompts, config.verbose));

        let (browser, page) = match config.browser_mode {
            BrowserMode::Connect => {
                browser::connect_to_browser_and_page(config.browser_debug_port, "about:blank")
                    .await?
            }
            BrowserMode::Headless => {
                browser::launch_headless_browser(
                    "about:blank",
                    config.chrome_executable.as_deref().map(Path::new),
                )
                .await?
            }
        };
        let browser = Arc::new(browser);
        let view = ChromeView::new(browser.clone(), page);

        Ok(Self {
            reports: ReportWriter::new(&config.reports_dir),
            config,
            _browser: browser,
            view,
            oracle,
        })
    }

    /// 运行一次抓取
    pub async fn run(&self, query: &str) -> Result<()> {
        logging::log_startup(&self.config, query);

        let search_url = search_url(&self.config.search_url, query)?;
        info!("🔍 打开搜索页: {}", search_url);
        self.view.navigate(search_url.as_str()).await?;

        let expanded = self.oracle.expand_query(query).await?;
        info!("扩展后的搜索主题: {}", expanded);

        let controller = PaginationController::new(&self.config, self.oracle.clone());
        let outcome = controller.run(&self.view, &expanded).await?;

        if outcome.records.is_empty() {
            warn!("⚠️ 没有找到符合条件的 UP 主");
        } else {
            self.reports
                .write(&outcome.records, query)
                .context("写入报告失败")?;
        }

        logging::log_final_stats(
            outcome.records.len(),
            self.config.num_up,
            outcome.pages_walked,
            &outcome.stop_reason,
            &self.config.output_log_file,
        );

        if let Err(e) = self.view.close().await {
            warn!("关闭搜索页失败: {}", e);
        }

        Ok(())
    }
}

/// 拼出带关键词参数的搜索地址
fn search_url(base: &str, query: &str) -> Result<Url> {
    Url::parse_with_params(base, [("keyword", query)])
        .with_context(|| format!("搜索地址无效: {}", base))
}
