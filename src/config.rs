//! 程序配置
//!
//! 加载顺序（后者覆盖前者）：默认值 → TOML 配置文件 → 环境变量 → 命令行参数，
//! 最后统一校验。

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::error::ConfigError;

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "up_finder.toml";

/// 搜索结果每页固定的视频数
pub const VIDEOS_PER_PAGE: usize = 30;

/// LLM 服务提供方
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    Deepseek,
    Openai,
}

impl LlmProvider {
    pub fn name(self) -> &'static str {
        match self {
            LlmProvider::Deepseek => "deepseek",
            LlmProvider::Openai => "openai",
        }
    }

    /// 存放 API Key 的环境变量
    pub fn api_key_env(self) -> &'static str {
        match self {
            LlmProvider::Deepseek => "DEEPSEEK_API_KEY",
            LlmProvider::Openai => "OPENAI_API_KEY",
        }
    }

    pub fn default_base_url(self) -> &'static str {
        match self {
            LlmProvider::Deepseek => "https://api.deepseek.com",
            LlmProvider::Openai => "https://api.openai.com/v1",
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            LlmProvider::Deepseek => "deepseek-chat",
            LlmProvider::Openai => "gpt-4.1-mini",
        }
    }
}

impl std::str::FromStr for LlmProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "deepseek" => Ok(LlmProvider::Deepseek),
            "openai" => Ok(LlmProvider::Openai),
            other => Err(ConfigError::invalid(
                "llm_provider",
                format!("未知的提供方 '{}'", other),
            )),
        }
    }
}

/// 浏览器获取方式
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserMode {
    /// 连接已开启远程调试端口的浏览器（沿用其登录态）
    #[default]
    Connect,
    /// 启动无头浏览器
    Headless,
}

/// 解析后的 LLM 连接参数
#[derive(Clone, Debug)]
pub struct LlmSettings {
    pub provider: LlmProvider,
    pub api_key: String,
    pub api_base_url: String,
    pub model_name: String,
}

/// 程序配置
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // --- 抓取 ---
    /// 最多收集的 UP 主数量
    pub num_up: usize,
    /// UP 主投稿数低于该值时直接跳过
    pub min_acceptable_videos: usize,
    /// 每页最多处理的视频数
    pub video_go_through_per_page: usize,
    /// 每页显示的视频数（固定 30）
    pub default_videos_per_page: usize,
    /// 每个 UP 主收集的最多播放视频数
    pub top_videos_per_uploader: usize,
    /// 详细模式：LLM 说明理由，无法判定的回复跳过而不中止
    pub verbose: bool,

    // --- 等待 ---
    pub element_timeout_ms: u64,
    pub next_page_timeout_ms: u64,
    pub scroll_pause_ms: u64,
    pub top_videos_scroll_pause_ms: u64,
    /// 滚动加载的最大轮数
    pub max_scroll_rounds: usize,

    // --- 浏览器 ---
    pub browser_mode: BrowserMode,
    pub browser_debug_port: u16,
    pub chrome_executable: Option<String>,
    pub search_url: String,

    // --- LLM ---
    pub llm_provider: LlmProvider,
    pub llm_api_key: Option<String>,
    pub llm_api_base_url: Option<String>,
    pub llm_model_name: Option<String>,
    pub prompts_dir: Option<String>,

    // --- 输出 ---
    pub reports_dir: String,
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            num_up: 10,
            min_acceptable_videos: 10,
            video_go_through_per_page: VIDEOS_PER_PAGE,
            default_videos_per_page: VIDEOS_PER_PAGE,
            top_videos_per_uploader: 10,
            verbose: false,
            element_timeout_ms: 10_000,
            next_page_timeout_ms: 10_000,
            scroll_pause_ms: 800,
            top_videos_scroll_pause_ms: 600,
            max_scroll_rounds: 60,
            browser_mode: BrowserMode::Connect,
            browser_debug_port: 9222,
            chrome_executable: None,
            search_url: "https://search.bilibili.com/all".to_string(),
            llm_provider: LlmProvider::Deepseek,
            llm_api_key: None,
            llm_api_base_url: None,
            llm_model_name: None,
            prompts_dir: None,
            reports_dir: "reports".to_string(),
            output_log_file: "logs/app.log".to_string(),
        }
    }
}

impl Config {
    /// 按 默认值 → 配置文件 → 环境变量 → 命令行 的顺序加载并校验
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let config = match cli.config.as_deref() {
            Some(path) => Self::from_file(Path::new(path))?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };

        let config = config.with_env()?.with_cli(cli);
        config.validate()?;
        Ok(config)
    }

    /// 从 TOML 文件读取，缺省字段取默认值
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// 用环境变量覆盖
    pub fn with_env(self) -> Result<Self, ConfigError> {
        self.with_vars(|name| std::env::var(name).ok())
    }

    fn with_vars(mut self, var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        fn parsed<T: std::str::FromStr>(
            var: &impl Fn(&str) -> Option<String>,
            name: &'static str,
            current: T,
        ) -> Result<T, ConfigError> {
            match var(name) {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::invalid(name, format!("无法解析 '{}'", raw))),
                None => Ok(current),
            }
        }

        self.num_up = parsed(&var, "NUM_UP", self.num_up)?;
        self.min_acceptable_videos =
            parsed(&var, "MIN_ACCEPTABLE_VIDEOS", self.min_acceptable_videos)?;
        self.video_go_through_per_page = parsed(
            &var,
            "VIDEO_GO_THROUGH_PER_PAGE",
            self.video_go_through_per_page,
        )?;
        self.top_videos_per_uploader =
            parsed(&var, "TOP_VIDEOS_PER_UPLOADER", self.top_videos_per_uploader)?;
        self.verbose = parsed(&var, "VERBOSE", self.verbose)?;
        self.browser_debug_port = parsed(&var, "BROWSER_DEBUG_PORT", self.browser_debug_port)?;
        if let Some(path) = var("CHROME_EXECUTABLE") {
            self.chrome_executable = Some(path);
        }
        if let Some(provider) = var("LLM_PROVIDER") {
            self.llm_provider = provider.parse()?;
        }
        if let Some(key) = var("LLM_API_KEY") {
            self.llm_api_key = Some(key);
        }
        if let Some(url) = var("LLM_API_BASE_URL") {
            self.llm_api_base_url = Some(url);
        }
        if let Some(model) = var("LLM_MODEL_NAME") {
            self.llm_model_name = Some(model);
        }
        if let Some(dir) = var("PROMPTS_DIR") {
            self.prompts_dir = Some(dir);
        }
        if let Some(dir) = var("REPORTS_DIR") {
            self.reports_dir = dir;
        }
        if let Some(file) = var("OUTPUT_LOG_FILE") {
            self.output_log_file = file;
        }
        Ok(self)
    }

    /// 用命令行参数覆盖
    pub fn with_cli(mut self, cli: &Cli) -> Self {
        if let Some(n) = cli.num_up {
            self.num_up = n;
        }
        if cli.verbose {
            self.verbose = true;
        }
        if let Some(n) = cli.video_go_through_per_page {
            self.video_go_through_per_page = n;
        }
        if let Some(n) = cli.default_videos_per_page {
            self.default_videos_per_page = n;
        }
        if let Some(n) = cli.min_acceptable_videos {
            self.min_acceptable_videos = n;
        }
        if let Some(provider) = cli.provider {
            self.llm_provider = provider;
        }
        if cli.headless {
            self.browser_mode = BrowserMode::Headless;
        }
        if let Some(port) = cli.port {
            self.browser_debug_port = port;
        }
        self
    }

    /// 校验取值范围
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_up < 1 {
            return Err(ConfigError::invalid("num_up", "必须 >= 1"));
        }
        if self.min_acceptable_videos < 10 {
            return Err(ConfigError::invalid("min_acceptable_videos", "必须 >= 10"));
        }
        if !(1..=VIDEOS_PER_PAGE).contains(&self.video_go_through_per_page) {
            return Err(ConfigError::invalid(
                "video_go_through_per_page",
                format!("必须在 1..={} 之间", VIDEOS_PER_PAGE),
            ));
        }
        if self.default_videos_per_page != VIDEOS_PER_PAGE {
            return Err(ConfigError::invalid(
                "default_videos_per_page",
                format!("必须为 {}", VIDEOS_PER_PAGE),
            ));
        }
        if self.top_videos_per_uploader < 1 {
            return Err(ConfigError::invalid("top_videos_per_uploader", "必须 >= 1"));
        }
        if self.max_scroll_rounds < 1 {
            return Err(ConfigError::invalid("max_scroll_rounds", "必须 >= 1"));
        }
        Ok(())
    }

    /// 解析 LLM 连接参数；缺少 API Key 属于启动期错误
    pub fn llm_settings(&self) -> Result<LlmSettings, ConfigError> {
        self.llm_settings_with(|name| std::env::var(name).ok())
    }

    fn llm_settings_with(
        &self,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<LlmSettings, ConfigError> {
        let provider = self.llm_provider;
        let api_key = self
            .llm_api_key
            .clone()
            .or_else(|| var(provider.api_key_env()))
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingCredential {
                provider: provider.name(),
                env_var: provider.api_key_env(),
            })?;

        Ok(LlmSettings {
            provider,
            api_key,
            api_base_url: self
                .llm_api_base_url
                .clone()
                .unwrap_or_else(|| provider.default_base_url().to_string()),
            model_name: self
                .llm_model_name
                .clone()
                .unwrap_or_else(|| provider.default_model().to_string()),
        })
    }

    pub fn element_timeout(&self) -> Duration {
        Duration::from_millis(self.element_timeout_ms)
    }

    pub fn next_page_timeout(&self) -> Duration {
        Duration::from_millis(self.next_page_timeout_ms)
    }

    pub fn scroll_pause(&self) -> Duration {
        Duration::from_millis(self.scroll_pause_ms)
    }

    pub fn top_videos_scroll_pause(&self) -> Duration {
        Duration::from_millis(self.top_videos_scroll_pause_ms)
    }
}
