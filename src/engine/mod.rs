// ==========================================
// KCCR 产品目录 - 引擎层
// ==========================================
// 职责: 纯业务规则（检索条件构建等）
// 红线: Engine 不拼 SQL, 无 I/O
// ==========================================

pub mod product_search;

pub use product_search::build_filter;
