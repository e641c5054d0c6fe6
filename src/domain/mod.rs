// ==========================================
// KCCR 产品目录 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含 HTTP 逻辑
// ==========================================

pub mod event;
pub mod import;
pub mod news;
pub mod paging;
pub mod product;
pub mod product_filter;
pub mod user;

// 重导出核心类型
pub use event::{EndUpdate, Event, EventUpdate, NewEvent};
pub use import::ImportSummary;
pub use news::{NewNews, News, NewsDestination, NewsUpdate};
pub use paging::{Page, PageRequest, DEFAULT_PAGE_SIZE};
pub use product::{
    sanitize_product_payload, Product, ProductField, ProductPatch, ProductRecord,
    ATTRIBUTE_FIELDS, PRODUCT_FIELDS, TEXT_SEARCH_FIELDS,
};
pub use product_filter::FilterExpression;
pub use user::{NewUser, Role, User, UserSummary, UserUpdate, ADMIN_ROLE};
