// ==========================================
// KCCR 产品目录 - HTTP 服务启动
// ==========================================
// 流程: 加载状态 → 管理员种子 → 绑定端口 → 优雅停机
// ==========================================

use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

use crate::app::routes::build_router;
use crate::app::seed::ensure_admin_user;
use crate::app::state::AppState;
use crate::config::ServerConfig;

/// 启动服务并阻塞至收到停机信号
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let state = AppState::new(&config)?;

    // 种子失败不阻止启动
    match ensure_admin_user(&state.user_repo, &config.admin) {
        Ok(outcome) => info!(?outcome, "管理员检查完成"),
        Err(e) => error!(error = %e, "管理员种子失败，继续启动"),
    }

    match state.config_manager.get_config_snapshot() {
        Ok(snapshot) => info!(?snapshot, "运行期配置"),
        Err(e) => error!(error = %e, "运行期配置读取失败"),
    }

    let app = build_router(state);
    let address = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&address).await?;
    info!(%address, "服务已启动");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("服务已停止");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "无法监听 Ctrl+C");
            std::future::pending::<()>().await;
        }
        info!("收到 Ctrl+C，准备停机");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("收到 SIGTERM，准备停机");
            }
            Err(e) => {
                error!(error = %e, "无法监听 SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
