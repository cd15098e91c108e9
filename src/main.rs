use marketplace::{
    build_router,
    core::upload::UploadStore,
    infrastructure::{config::AppConfig, logger::Logger},
    AppState,
};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (config, source) = AppConfig::load()?;
    config.validate()?;

    Logger::init(&config.logging.level);
    match source {
        Some(path) => info!("从配置文件加载: {}", path.display()),
        None => info!("未找到配置文件，使用默认配置"),
    }

    let uploads = UploadStore::from_config(&config.storage);
    uploads.ensure_dir().await?;
    info!("📁 上传目录: {}", uploads.dir().display());

    let app = build_router(&config, AppState::new(uploads))?;

    let addr = config.http.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;

    info!("🚀 服务器运行在 http://{}", addr);
    info!("📖 API 端点:");
    info!("   GET  /api/products - 获取全部商品");
    info!("   POST /api/products - 发布商品 (multipart, 可选图片字段 image)");
    info!("   POST /api/register - 注册账户");
    info!("   POST /api/login    - 登录");
    info!("   GET  /api/health   - 健康检查");
    info!("🌐 允许跨域来源: {}", config.http.allowed_origin);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("服务器已停止");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("监听退出信号失败: {}", e);
        std::future::pending::<()>().await;
    }
    info!("收到退出信号，正在关闭服务器...");
}
