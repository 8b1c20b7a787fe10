//! 业务能力层
//!
//! 每个服务只描述"我能做什么"，处理单个视频或单个 UP 主，不关心流程顺序。

pub mod dedup;
pub mod profile_inspector;
pub mod prompt_store;
pub mod relevance_oracle;
pub mod report_writer;

pub use dedup::Deduplicator;
pub use profile_inspector::{ProfileInspector, ProfileOutcome};
pub use prompt_store::{PromptKind, PromptStore};
pub use relevance_oracle::{AmbiguityPolicy, JudgeContext, Judgment, RelevanceOracle};
pub use report_writer::{render_report, ReportPaths, ReportWriter};
