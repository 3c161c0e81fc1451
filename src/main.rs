use anyhow::Result;
use quiz_image_builder::orchestrator::BuildCoordinator;
use quiz_image_builder::utils::logging;
use quiz_image_builder::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logging::init();

    // 加载配置（builder.toml 覆盖内置默认值）
    let config = Config::from_file("builder.toml")?;

    // 运行一次完整构建
    BuildCoordinator::with_graphicsmagick(config).run().await?;

    Ok(())
}
