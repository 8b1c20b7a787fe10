//! LLM 客户端
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - DeepSeek 与 OpenAI 都走 OpenAI 兼容的 chat completions 接口

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::{LlmProvider, LlmSettings};
use crate::error::{CrawlError, CrawlResult};

/// 文本补全服务：给定系统指令和用户输入，返回一段文本
#[async_trait]
pub trait TextOracle: Send + Sync {
    async fn complete(&self, system_instructions: &str, user_text: &str) -> CrawlResult<String>;
}

/// OpenAI 兼容接口的 LLM 客户端
pub struct LlmClient {
    client: Client<OpenAIConfig>,
    provider: LlmProvider,
    model_name: String,
}

impl LlmClient {
    /// 创建新的 LLM 客户端
    pub fn new(settings: &LlmSettings) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&settings.api_key)
            .with_api_base(&settings.api_base_url);

        Self {
            client: Client::with_config(openai_config),
            provider: settings.provider,
            model_name: settings.model_name.clone(),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    fn transport_error(&self, message: impl std::fmt::Display) -> CrawlError {
        CrawlError::transport(self.provider.name(), message.to_string())
    }
}

#[async_trait]
impl TextOracle for LlmClient {
    async fn complete(&self, system_instructions: &str, user_text: &str) -> CrawlResult<String> {
        debug!(
            "调用 LLM API，提供方: {}, 模型: {}",
            self.provider.name(),
            self.model_name
        );
        debug!("用户消息长度: {} 字符", user_text.chars().count());

        let system_msg = ChatCompletionRequestSystemMessageArgs::default()
            .content(system_instructions)
            .build()
            .map_err(|e| self.transport_error(e))?;
        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_text)
            .build()
            .map_err(|e| self.transport_error(e))?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(vec![
                ChatCompletionRequestMessage::System(system_msg),
                ChatCompletionRequestMessage::User(user_msg),
            ])
            .temperature(0.2)
            .build()
            .map_err(|e| self.transport_error(e))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            self.transport_error(e)
        })?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| self.transport_error("LLM 返回内容为空"))?;

        Ok(content.trim().to_string())
    }
}
