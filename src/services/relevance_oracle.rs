//! 相关性判断 - 业务能力层
//!
//! 只负责"调用 LLM 判断是否相关"，不关心流程。
//! 回复解析为 [`Judgment`]；无法判定时如何处理由调用方通过 [`AmbiguityPolicy`] 决定。

use std::fmt::Display;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::{debug, info, warn};

use crate::clients::TextOracle;
use crate::error::{CrawlError, CrawlResult};
use crate::models::CandidateVideo;
use crate::services::prompt_store::{PromptKind, PromptStore};

/// 详细模式下附加在判断指令后，让 LLM 说明理由
const REASON_SUFFIX: &str = " 在yes或no之后, 告诉我你为什么这么认为。";

static YES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)yes").expect("valid yes pattern"));
static NO: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)no").expect("valid no pattern"));

/// LLM 的判断结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Judgment {
    Relevant,
    NotRelevant,
    /// 回复中 yes/no 都没有或都有
    Undecided { reply: String },
}

impl Judgment {
    /// 解析回复：不区分大小写地查找子串 yes / no
    ///
    /// "Nope"、"Not relevant" 都算 no。
    pub fn parse(reply: &str) -> Self {
        match (YES.is_match(reply), NO.is_match(reply)) {
            (true, false) => Judgment::Relevant,
            (false, true) => Judgment::NotRelevant,
            _ => Judgment::Undecided {
                reply: reply.to_string(),
            },
        }
    }
}

/// 无法判定时的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmbiguityPolicy {
    /// 返回 `AmbiguousJudgment`，中止抓取
    Strict,
    /// 视为未决，跳过当前条目
    Lenient,
}

impl AmbiguityPolicy {
    /// 详细模式下宽松处理
    pub fn from_verbose(verbose: bool) -> Self {
        if verbose {
            AmbiguityPolicy::Lenient
        } else {
            AmbiguityPolicy::Strict
        }
    }

    /// `Some(true)` 相关，`Some(false)` 不相关，`None` 未决（仅宽松模式）
    pub fn resolve(self, judgment: Judgment) -> CrawlResult<Option<bool>> {
        match judgment {
            Judgment::Relevant => Ok(Some(true)),
            Judgment::NotRelevant => Ok(Some(false)),
            Judgment::Undecided { reply } => match self {
                AmbiguityPolicy::Strict => Err(CrawlError::AmbiguousJudgment { reply }),
                AmbiguityPolicy::Lenient => {
                    warn!("LLM 回复无法判定, 跳过: {}", reply);
                    Ok(None)
                }
            },
        }
    }
}

/// 判断所需的上下文
#[derive(Debug, Clone, Copy)]
pub enum JudgeContext<'a> {
    /// 单个视频：标题 + 标签
    Video {
        title: &'a str,
        tags: &'a [String],
        query: &'a str,
    },
    /// UP 主空间：全部投稿标题
    Profile {
        captions: &'a [String],
        query: &'a str,
    },
}

impl JudgeContext<'_> {
    pub fn prompt_kind(&self) -> PromptKind {
        match self {
            JudgeContext::Video { .. } => PromptKind::DecideTargetVideoRelevant,
            JudgeContext::Profile { .. } => PromptKind::DecideUserSpaceVideoRelevant,
        }
    }
}

impl Display for JudgeContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JudgeContext::Video { title, tags, query } => write!(
                f,
                "视频标题是: {}. 附加的标签: {}. 搜索查询是: {}.",
                title,
                tags.join(", "),
                query
            ),
            JudgeContext::Profile { captions, query } => write!(
                f,
                "视频标题列表: {}. 搜索关键词是: {}.",
                captions.join(", "),
                query
            ),
        }
    }
}

/// 相关性判断服务
pub struct RelevanceOracle {
    oracle: Arc<dyn TextOracle>,
    prompts: PromptStore,
    verbose: bool,
}

impl RelevanceOracle {
    pub fn new(oracle: Arc<dyn TextOracle>, prompts: PromptStore, verbose: bool) -> Self {
        Self {
            oracle,
            prompts,
            verbose,
        }
    }

    /// 扩展搜索关键词；LLM 返回空文本时沿用原关键词
    pub async fn expand_query(&self, query: &str) -> CrawlResult<String> {
        let instructions = self.prompts.load(PromptKind::ExpandSearchQuery)?;
        let reply = self.oracle.complete(&instructions, query).await?;
        let expanded = reply.trim();

        if expanded.is_empty() {
            warn!("关键词扩展结果为空，沿用原关键词: {}", query);
            return Ok(query.to_string());
        }

        debug!("扩展关键词结果: {}", expanded);
        Ok(expanded.to_string())
    }

    /// 按上下文渲染提示词并请求判断
    pub async fn judge(&self, context: JudgeContext<'_>) -> CrawlResult<Judgment> {
        let kind = context.prompt_kind();
        let instructions = self.instructions(kind)?;
        let user_text = context.to_string();

        let reply = self.oracle.complete(&instructions, &user_text).await?;
        info!("{} LLM 回复: {}", kind, reply);

        Ok(Judgment::parse(&reply))
    }

    pub async fn judge_video(&self, video: &CandidateVideo, query: &str) -> CrawlResult<Judgment> {
        self.judge(JudgeContext::Video {
            title: &video.title,
            tags: &video.tags,
            query,
        })
        .await
    }

    pub async fn judge_profile(&self, captions: &[String], query: &str) -> CrawlResult<Judgment> {
        debug!("投稿标题: {:?}", captions);
        self.judge(JudgeContext::Profile { captions, query }).await
    }

    fn instructions(&self, kind: PromptKind) -> CrawlResult<String> {
        let mut instructions = self.prompts.load(kind)?;
        if self.verbose {
            instructions.push_str(REASON_SUFFIX);
        }
        Ok(instructions)
    }
}
