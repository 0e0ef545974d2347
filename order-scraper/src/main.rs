use order_scraper::{Config, init_logger, print_banner};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // 1. 加载 .env (不存在则忽略)
    let _ = dotenvy::dotenv();

    // 2. 加载配置
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            return Err(e.into());
        }
    };

    // 3. 日志
    init_logger(env!("CARGO_PKG_NAME"), &config.log_level, config.log_dir.as_deref());
    print_banner();
    tracing::debug!(?config, "Configuration loaded");

    // 4. 运行同步循环, Ctrl+C 退出
    tokio::select! {
        result = order_scraper::run(config) => match result {
            Ok(never) => match never {},
            Err(e) => {
                tracing::error!("Scraper stopped: {}", e);
                return Err(e.into());
            }
        },
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received, exiting");
        }
    }

    Ok(())
}
