//! Chirpy 认证服务主入口

use chirpy_auth::{
    config::AppConfig,
    db,
    middleware::AppState,
    repository::{PgRefreshTokenRepository, PgUserRepository},
    routes,
    services::{AuthService, UserService},
    telemetry,
};
use std::{future::IntoFuture, sync::Arc, time::Duration};
use tokio::{net::TcpListener, signal, sync::watch};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ===== CLI 参数处理 =====
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "--version" => {
                println!("chirpy-auth {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" => {
                print_help();
                return Ok(());
            }
            "--generate-api-key" => {
                println!("{}", chirpy_auth::auth::ApiKey::generate());
                return Ok(());
            }
            _ => {
                eprintln!("未知参数: {}", args[1]);
                print_help();
                std::process::exit(1);
            }
        }
    }

    // 加载 .env 文件（开发环境）
    // 生产环境应该直接设置环境变量，不依赖 .env 文件
    dotenv::from_filename(".env.local").ok();
    dotenv::dotenv().ok();

    // 1. 加载配置
    let config = AppConfig::from_env().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        anyhow::anyhow!("Failed to load configuration: {}", e)
    })?;

    // 2. 初始化日志
    telemetry::init_telemetry(&config.logging);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Chirpy auth starting...");

    // 3. 数据库连接池 + 迁移
    let db_pool = db::create_pool(&config.database).await?;
    db::run_migrations(&db_pool).await?;
    db::health_check(&db_pool).await?;

    tracing::info!("Database initialized");

    // 4. 构建认证与用户服务（签名密钥在此一次性注入）
    let users = Arc::new(PgUserRepository::new(db_pool.clone()));
    let auth_service = AuthService::from_config(
        &config.security,
        users.clone(),
        Arc::new(PgRefreshTokenRepository::new(db_pool.clone())),
    )
    .map_err(|e| anyhow::anyhow!("Failed to build auth service: {}", e))?;
    let user_service = UserService::from_config(&config.security, users)
        .map_err(|e| anyhow::anyhow!("Failed to build user service: {}", e))?;

    if config.security.webhook_api_key.is_none() {
        tracing::warn!("No webhook API key configured, webhook calls will be rejected");
    }

    let app_state = Arc::new(AppState {
        auth_service: Arc::new(auth_service),
        user_service: Arc::new(user_service),
    });

    // 5. 构建路由
    let app = routes::create_router(app_state);

    // 6. 启动服务器
    let addr = &config.server.addr;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(addr = %addr, "Server listening");

    // 7. 优雅关闭：收到信号后最多等待 graceful_shutdown_timeout_secs
    let shutdown_timeout = Duration::from_secs(config.server.graceful_shutdown_timeout_secs);
    let (signalled_tx, mut signalled_rx) = watch::channel(false);

    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        let _ = signalled_tx.send(true);
    });
    let mut handle = tokio::spawn(server.into_future());

    tokio::select! {
        result = &mut handle => result??,
        _ = signalled_rx.changed() => {
            match tokio::time::timeout(shutdown_timeout, &mut handle).await {
                Ok(result) => result??,
                Err(_) => {
                    tracing::warn!("Graceful shutdown timeout reached, forcing exit");
                    handle.abort();
                }
            }
        }
    }

    tracing::info!("Server shutdown complete");
    db_pool.close().await;
    Ok(())
}

/// 优雅关闭信号处理
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Ctrl+C received, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Terminate signal received, starting graceful shutdown");
        },
    }
}

/// 打印帮助信息
fn print_help() {
    println!("chirpy-auth {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("用法: chirpy-auth [选项]");
    println!();
    println!("选项:");
    println!("  --version            打印版本信息并退出");
    println!("  --help               打印此帮助信息并退出");
    println!("  --generate-api-key   生成新的 webhook API Key 并退出");
    println!();
    println!("环境变量:");
    println!("  所有配置通过 CHIRPY_ 前缀的环境变量完成，例如:");
    println!("  CHIRPY_DATABASE__URL, CHIRPY_SECURITY__JWT_SECRET, CHIRPY_SECURITY__WEBHOOK_API_KEY");
}
