//! # UP Finder
//!
//! 根据搜索关键词在 B 站搜索结果中寻找内容相关的 UP 主，并生成报告
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有浏览器页面，只暴露页面能力
//! - `NavigableView` - 可导航页面抽象，`ChromeView` 为 chromiumoxide 实现
//! - `probes` - 滚动加载、候选选择器探测
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个视频或单个 UP 主
//! - `RelevanceOracle` - LLM 相关性判断能力
//! - `ProfileInspector` - UP 主空间检查能力
//! - `Deduplicator` - UP 主去重
//! - `ReportWriter` - 写报告能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一页搜索结果"的完整处理流程
//! - `ItemCtx` - 上下文封装（页码 + 序号 + UP 主名）
//! - `ResultPageWalker` - 流程编排（详情页 → 判断 → UP 主空间 → 收录）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/app` - 应用入口，管理浏览器和 LLM 资源
//! - `orchestrator/pagination` - 翻页控制，配额已满或结果翻完时结束
//!
//! ## 模块结构

pub mod browser;
pub mod cli;
pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use cli::Cli;
pub use clients::{LlmClient, TextOracle};
pub use config::Config;
pub use error::{ConfigError, CrawlError, CrawlResult};
pub use infrastructure::{ChromeView, Locator, NavigableView};
pub use models::{TopVideo, UploaderRecord};
pub use orchestrator::{App, CrawlOutcome, PaginationController, StopReason};
pub use services::{ProfileInspector, ProfileOutcome, RelevanceOracle};
pub use workflow::{CrawlSession, ResultPageWalker};
