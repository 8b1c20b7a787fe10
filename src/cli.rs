//! 命令行参数

use clap::Parser;

use crate::config::LlmProvider;

/// 在视频搜索结果中寻找与关键词相关的 UP 主
#[derive(Debug, Parser)]
#[command(name = "up-finder", version, about)]
pub struct Cli {
    /// 搜索关键词
    #[arg(short, long)]
    pub query: String,

    /// 最多收集的 UP 主数量
    #[arg(short, long)]
    pub num_up: Option<usize>,

    /// 详细模式
    #[arg(short, long)]
    pub verbose: bool,

    /// 每页最多处理的视频数
    #[arg(long)]
    pub video_go_through_per_page: Option<usize>,

    /// 每页显示的视频数
    #[arg(long)]
    pub default_videos_per_page: Option<usize>,

    /// UP 主最少投稿数
    #[arg(long)]
    pub min_acceptable_videos: Option<usize>,

    /// 配置文件路径（TOML）
    #[arg(short, long)]
    pub config: Option<String>,

    /// LLM 服务提供方
    #[arg(long, value_enum)]
    pub provider: Option<LlmProvider>,

    /// 启动无头浏览器，而不是连接已打开的浏览器
    #[arg(long)]
    pub headless: bool,

    /// 浏览器远程调试端口
    #[arg(long)]
    pub port: Option<u16>,
}
