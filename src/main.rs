use anyhow::Result;
use clap::Parser;

use up_finder::utils::logging;
use up_finder::{App, Cli, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // .env 不存在时忽略
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::load(&cli)?;

    // 初始化日志
    logging::init(&config)?;

    // 初始化并运行应用
    App::initialize(config).await?.run(&cli.query).await?;

    Ok(())
}
