// ==========================================
// KCCR 产品目录 - API 层
// ==========================================
// 职责: 业务 API 接口，供 HTTP 处理器调用（与传输层无关）
// ==========================================

pub mod auth_api;
pub mod error;
pub mod event_api;
pub mod import_api;
pub mod news_api;
pub mod product_api;
pub mod response;
pub mod user_api;
pub mod validator;

// 重导出核心类型
pub use auth_api::{AuthApi, LoginRequest, LoginResponse};
pub use error::{ApiError, ApiResult};
pub use event_api::{EventApi, EventRequest};
pub use import_api::{ImportApi, ImportApiResponse};
pub use news_api::{NewsApi, NewsRequest};
pub use product_api::{ProductApi, CSV_EXPORT_FILE_NAME, XLSX_EXPORT_FILE_NAME, XLSX_EXPORT_SHEET};
pub use response::{MessageResponse, OkResponse};
pub use user_api::{CreateUserRequest, CreateUserResponse, UpdateUserRequest, UserApi};
