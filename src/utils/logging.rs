//! 日志工具模块
//!
//! 同时输出到终端和日志文件；提供运行横幅等格式化辅助函数

use std::fs::{self, File};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

/// 传输层依赖的日志太吵，统一压到 warn
const QUIET_CRATES: &str = "chromiumoxide=warn,hyper=warn,reqwest=warn,async_openai=warn";

/// 默认过滤规则；设置了 `RUST_LOG` 时以其为准
fn default_filter(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    format!("up_finder={},{}", level, QUIET_CRATES)
}

/// 初始化日志：终端 + 日志文件
pub fn init(config: &Config) -> Result<()> {
    let file = init_log_file(&config.output_log_file)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(config.verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .context("初始化日志失败")?;

    Ok(())
}

/// 创建日志文件并写入运行头，返回以追加方式打开的文件
fn init_log_file(log_file_path: &str) -> Result<File> {
    let path = Path::new(log_file_path);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("创建日志目录失败: {}", parent.display()))?;
    }

    let log_header = format!(
        "{}\nUP 主搜索日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(path, log_header)
        .with_context(|| format!("写入日志文件失败: {}", path.display()))?;

    fs::OpenOptions::new()
        .append(true)
        .open(path)
        .with_context(|| format!("打开日志文件失败: {}", path.display()))
}

/// 记录程序启动信息
pub fn log_startup(config: &Config, query: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 搜索关键词: {}", query);
    info!(
        "📊 目标 UP 主数: {} | 每页处理: {} | 最少投稿数: {}",
        config.num_up, config.video_go_through_per_page, config.min_acceptable_videos
    );
    info!(
        "🤖 LLM: {} | 详细模式: {}",
        config.llm_provider.name(),
        config.verbose
    );
    info!("{}", "=".repeat(60));
}

/// 记录翻页信息
pub fn log_page_start(page_index: usize, collected: usize, quota: usize) {
    info!("\n{}", "─".repeat(60));
    info!("📄 开始处理第 {} 页 (已收集 {}/{})", page_index, collected, quota);
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
pub fn log_final_stats(
    collected: usize,
    quota: usize,
    pages_walked: usize,
    stop_reason: &dyn std::fmt::Display,
    log_file_path: &str,
) {
    info!("\n{}", "=".repeat(60));
    info!("📊 抓取完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 收集 UP 主: {}/{}", collected, quota);
    info!("📄 浏览页数: {}", pages_walked);
    info!("⏹ 结束原因: {}", stop_reason);
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file_path);
}

/// 截断长文本用于日志显示
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("机械键盘轴体横评", 4), "机械键盘...");
        assert_eq!(truncate_text("短", 4), "短");
    }

    #[test]
    fn test_default_filter() {
        assert!(default_filter(true).starts_with("up_finder=debug,"));
        assert!(default_filter(false).contains("chromiumoxide=warn"));
    }

    #[test]
    fn test_init_log_file_writes_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("app.log");

        init_log_file(path.to_str().unwrap()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("UP 主搜索日志"));
    }
}
