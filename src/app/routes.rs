// ==========================================
// KCCR 产品目录 - 路由表
// ==========================================
// 公开: 健康检查、登录、产品/新闻/活动只读
// 管理: /api/admin/*、/api/events/admin*（需 admin 令牌）
// ==========================================

use axum::extract::DefaultBodyLimit;
use axum::http::{header, Method};
use axum::middleware;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::app::auth_middleware::require_admin;
use crate::app::http_handlers::{auth, events, import, news, products, users};
use crate::app::state::AppState;

/// 上传文件大小上限（20 MiB）
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// 构建完整路由
pub fn build_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/api/health", get(auth::health))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/productos", get(products::list_products))
        .route("/api/productos/export/excel", get(products::export_products_excel))
        .route("/api/productos/export/csv", get(products::export_products_csv))
        .route("/api/productos/paged", get(products::list_products_paged))
        .route("/api/productos/search", get(products::search_products))
        .route("/api/productos/{id}", get(products::get_product))
        .route("/api/noticias", get(news::list_news))
        .route("/api/noticias/{id}", get(news::get_news))
        .route("/api/events", get(events::list_events))
        .route("/api/events/{id}", get(events::get_event));

    let admin = Router::new()
        .route("/api/admin/usuarios", get(users::list_users).post(users::create_user))
        .route(
            "/api/admin/usuarios/{id}",
            put(users::update_user).delete(users::delete_user),
        )
        .route(
            "/api/admin/productos",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/api/admin/productos/{id}",
            put(products::update_product).delete(products::delete_product),
        )
        .route(
            "/api/admin/productos/import-excel",
            post(import::import_products).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/api/admin/noticias", post(news::create_news))
        .route(
            "/api/admin/noticias/{id}",
            put(news::update_news).delete(news::delete_news),
        )
        .route("/api/events/admin", post(events::create_event))
        .route(
            "/api/events/admin/{id}",
            put(events::update_event).delete(events::delete_event),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    public.merge(admin).layer(cors).with_state(state)
}
