// ==========================================
// KCCR 产品目录 - 应用层
// ==========================================
// 职责: HTTP 集成（axum），连接前端与 API 层
// ==========================================

pub mod auth_middleware;
pub mod http_handlers;
pub mod routes;
pub mod seed;
pub mod server;
pub mod state;

// 重导出
pub use routes::{build_router, MAX_UPLOAD_BYTES};
pub use seed::{ensure_admin_user, SeedOutcome};
pub use server::serve;
pub use state::AppState;
