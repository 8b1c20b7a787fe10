//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 管理应用生命周期（初始化、运行）
//! - 管理浏览器资源（Browser、搜索结果页）
//! - 关键词扩展、报告输出、全局统计
//!
//! ### `pagination` - 翻页控制
//! - 逐页调用 ResultPageWalker
//! - 配额已满或结果翻完时结束
//!
//! ## 层次关系
//!
//! ```text
//! app (一次抓取)
//!     ↓
//! pagination (逐页)
//!     ↓
//! workflow::ResultPageWalker (逐个视频)
//!     ↓
//! services (能力层：relevance / profile / dedup / report)
//!     ↓
//! infrastructure (基础设施：NavigableView)
//! ```

pub mod app;
pub mod pagination;

pub use app::App;
pub use pagination::{CrawlOutcome, PaginationController, StopReason};
