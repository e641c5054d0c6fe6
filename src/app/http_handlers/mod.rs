// ==========================================
// KCCR 产品目录 - HTTP 处理器
// ==========================================
// 职责: axum 提取器 → API 层 → JSON 响应
// 红线: 处理器不含业务规则
// ==========================================

mod common;

pub mod auth;
pub mod events;
pub mod import;
pub mod news;
pub mod products;
pub mod users;
