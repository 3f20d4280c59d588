use anyhow::Result;
use coffee_label_fetch::utils::logging;
use coffee_label_fetch::{App, Config};
use tracing::error;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 加载配置；失败时按环境变量确定日志文件并记录错误
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            let log_path = logging::log_config_error(&Config::from_env(), &e)?;
            eprintln!("日志已保存至: {}", log_path.display());
            return Err(e.into());
        }
    };

    // 初始化日志
    let log = logging::init(&config)?;

    // 初始化并运行应用
    let result = match App::initialize(config).await {
        Ok(app) => app.run().await.map(|_| ()),
        Err(e) => Err(e),
    };

    if let Err(e) = &result {
        error!("❌ {}", e);
        error!("日志已保存至: {}", log.path().display());
    }

    result.map_err(Into::into)
}
