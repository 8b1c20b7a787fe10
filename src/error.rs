//! 错误类型
//!
//! 抓取过程中的错误分两类：
//! - 只影响当前条目（超时、选择器全部落空、LLM 调用失败等），记录后跳过
//! - 影响整个抓取（严格模式下 LLM 回复无法判定、配置错误），直接中止
//!
//! 是否中止统一由 [`CrawlError::is_fatal`] 决定。

use thiserror::Error;

/// 抓取错误
#[derive(Debug, Error)]
pub enum CrawlError {
    /// LLM 回复中既没有 yes 也没有 no（或两者都有）
    #[error("LLM 回复无法判定为 yes/no: {reply}")]
    AmbiguousJudgment { reply: String },

    /// 等待元素超时
    #[error("等待元素超时 ({timeout_ms}ms): {selector}")]
    NavigationTimeout { selector: String, timeout_ms: u64 },

    /// 所有候选选择器都没有命中
    #[error("{action}: 所有候选选择器均未命中 {tried:?}")]
    SelectorExhaustion { action: String, tried: Vec<String> },

    /// LLM 服务不可用或调用失败
    #[error("LLM 服务调用失败 ({provider}): {message}")]
    Transport { provider: String, message: String },

    /// 浏览器协议错误
    #[error("浏览器错误: {0}")]
    Browser(String),

    /// 页面上缺少预期的元素或属性
    #[error("页面元素缺失: {0}")]
    MissingElement(String),

    /// 脚本返回值解析失败
    #[error("JSON 解析失败: {0}")]
    Json(#[from] serde_json::Error),

    /// 文件读写失败
    #[error("文件错误: {0}")]
    Io(#[from] std::io::Error),

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

impl CrawlError {
    /// 是否需要中止整个抓取
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            CrawlError::AmbiguousJudgment { .. } | CrawlError::Config(_)
        )
    }

    /// 是否为等待超时
    pub fn is_timeout(&self) -> bool {
        matches!(self, CrawlError::NavigationTimeout { .. })
    }

    pub fn timeout(selector: impl Into<String>, timeout_ms: u64) -> Self {
        CrawlError::NavigationTimeout {
            selector: selector.into(),
            timeout_ms,
        }
    }

    pub fn transport(provider: impl Into<String>, message: impl Into<String>) -> Self {
        CrawlError::Transport {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn missing(what: impl Into<String>) -> Self {
        CrawlError::MissingElement(what.into())
    }
}

impl From<chromiumoxide::error::CdpError> for CrawlError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        CrawlError::Browser(err.to_string())
    }
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 取值不合法
    #[error("配置项 {field} 不合法: {reason}")]
    Invalid { field: &'static str, reason: String },

    /// 缺少 LLM 凭据
    #[error("未设置 {provider} 的 API Key (环境变量 {env_var})")]
    MissingCredential {
        provider: &'static str,
        env_var: &'static str,
    },

    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// 解析配置文件失败
    #[error("解析配置文件失败 ({path}): {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// 抓取结果类型
pub type CrawlResult<T> = Result<T, CrawlError>;
