// ==========================================
// HTTP 路由端到端测试
// ==========================================
// 测试目标: Router → 中间件 → 处理器 → API → 仓储 的完整请求链路
// 工具: tower::ServiceExt::oneshot（不绑定端口）
// ==========================================

mod test_helpers;

use std::sync::{Arc, Mutex};

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use kccr_catalog::app::{build_router, ensure_admin_user, AppState};
use kccr_catalog::db::{configure_sqlite_connection, init_schema};
use kccr_catalog::logging;
use rusqlite::Connection;
use serde_json::{json, Value};
use tower::ServiceExt;

const BOUNDARY: &str = "kccr-test-boundary";

fn test_router() -> Router {
    logging::init_test();
    let conn = Connection::open_in_memory().expect("Failed to open memory db");
    configure_sqlite_connection(&conn).expect("Failed to configure db");
    init_schema(&conn).expect("Failed to init schema");

    let config = test_helpers::test_server_config(":memory:");
    let state = AppState::from_connection(Arc::new(Mutex::new(conn)), &config);
    ensure_admin_user(&state.user_repo, &config.admin).expect("Failed to seed admin");
    build_router(state)
}

/// 发送请求，返回 (状态码, 响应头 content-type, 响应体)
async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Option<String>, Vec<u8>) {
    let response = router.clone().oneshot(request).await.expect("request failed");
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    (status, content_type, body.to_vec())
}

/// JSON 请求
async fn api(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("Failed to build request");

    let (status, _, bytes) = send(router, request).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response is not JSON")
    };
    (status, value)
}

async fn admin_token(router: &Router) -> String {
    let (status, body) = api(
        router,
        "POST",
        "/api/auth/login",
        Some(json!({ "email": "admin@kccr.com", "password": "Admin123!" })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().expect("token missing").to_string()
}

fn multipart_request(uri: &str, token: &str, file_name: &str, content: &str) -> Request<Body> {
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{f}\"\r\nContent-Type: text/csv\r\n\r\n{c}\r\n--{b}--\r\n",
        b = BOUNDARY,
        f = file_name,
        c = content
    );
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .expect("Failed to build multipart request")
}

#[tokio::test]
async fn test_health_and_register_closed() {
    let router = test_router();

    let (status, body) = api(&router, "GET", "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");

    let (status, body) = api(&router, "POST", "/api/auth/register", Some(json!({})), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_login_and_admin_guard() {
    let router = test_router();

    let (status, _) = api(
        &router,
        "POST",
        "/api/auth/login",
        Some(json!({ "email": "admin@kccr.com", "password": "incorrecta" })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = api(&router, "GET", "/api/admin/usuarios", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = api(&router, "GET", "/api/admin/usuarios", None, Some("no-es-un-jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = admin_token(&router).await;
    let (status, body) = api(&router, "GET", "/api/admin/usuarios", None, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["email"], "admin@kccr.com");
}

#[tokio::test]
async fn test_admin_cannot_delete_self() {
    let router = test_router();
    let token = admin_token(&router).await;
    let (_, users) = api(&router, "GET", "/api/admin/usuarios", None, Some(&token)).await;
    let own_id = users[0]["id"].as_i64().expect("id missing");

    let uri = format!("/api/admin/usuarios/{}", own_id);
    let (status, _) = api(&router, "DELETE", &uri, None, Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = api(
        &router,
        "POST",
        "/api/admin/usuarios",
        Some(json!({ "nombre": "Ana", "email": "ana@kccr.com", "password": "secreta" })),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let other_uri = format!("/api/admin/usuarios/{}", body["usuario"]["id"]);
    let (status, _) = api(&router, "DELETE", &other_uri, None, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_product_crud_and_search() {
    let router = test_router();
    let token = admin_token(&router).await;

    let (status, _) = api(
        &router,
        "POST",
        "/api/admin/productos",
        Some(json!({ "nombre": "Sin marca" })),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, created) = api(
        &router,
        "POST",
        "/api/admin/productos",
        Some(json!({ "fabricanteMarca": "Acme", "nombre": "Widget", "tienda": "Central", "gf": "x" })),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["fabricanteMarca"], "Acme");
    let id = created["id"].as_i64().expect("id missing");

    let (status, found) = api(&router, "GET", "/api/productos/search?q=acme", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found.as_array().map(Vec::len), Some(1));

    let (status, _) = api(&router, "GET", "/api/productos/abc", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let uri = format!("/api/admin/productos/{}", id);
    let (status, updated) = api(&router, "PUT", &uri, Some(json!({ "tienda": "Norte" })), Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["tienda"], "Norte");
    assert_eq!(updated["nombre"], "Widget");

    let (status, _) = api(&router, "DELETE", &uri, None, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = api(&router, "GET", &format!("/api/productos/{}", id), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let router = test_router();
    let token = admin_token(&router).await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/admin/productos")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ no es json"))
        .expect("Failed to build request");
    let (status, _, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body).expect("error body is JSON");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_import_upload_and_export_csv() {
    let router = test_router();
    let token = admin_token(&router).await;

    let request = multipart_request(
        "/api/admin/productos/import-excel",
        &token,
        "catalogo.csv",
        "Fabricante/Marca,Nombre\r\nAcme,Widget\r\n,Gadget\r\nBeta,\r\n",
    );
    let (status, _, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::OK);
    let summary: Value = serde_json::from_slice(&body).expect("summary is JSON");
    assert_eq!(summary["totalFilas"], 3);
    assert_eq!(summary["totalValidas"], 1);
    assert_eq!(summary["totalInsertados"], 1);

    let request = multipart_request(
        "/api/admin/productos/import-excel",
        &token,
        "vacio.csv",
        "Nombre\r\nSolo nombre\r\n",
    );
    let (status, _, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let err: Value = serde_json::from_slice(&body).expect("error is JSON");
    assert_eq!(err["headersDetectados"], json!(["Nombre"]));

    let request = Request::builder()
        .uri("/api/productos/export/csv")
        .body(Body::empty())
        .expect("Failed to build request");
    let (status, content_type, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.is_some_and(|ct| ct.starts_with("text/csv")));
    let text = String::from_utf8(body).expect("csv is UTF-8");
    assert!(text.lines().next().is_some_and(|h| h.starts_with("id,")));
    assert!(text.contains("Acme"));
}

#[tokio::test]
async fn test_news_publish_and_filter() {
    let router = test_router();
    let token = admin_token(&router).await;

    let (status, _) = api(
        &router,
        "POST",
        "/api/admin/noticias",
        Some(json!({ "titulo": "Nueva línea", "destino": "ANUNCIANTES" })),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    api(&router, "POST", "/api/admin/noticias", Some(json!({ "titulo": "Feria" })), Some(&token)).await;

    let (status, all) = api(&router, "GET", "/api/noticias", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().map(Vec::len), Some(2));

    let (_, filtered) = api(&router, "GET", "/api/noticias?destino=ANUNCIANTES", None, None).await;
    assert_eq!(filtered.as_array().map(Vec::len), Some(1));
    assert_eq!(filtered[0]["titulo"], "Nueva línea");

    let (status, _) = api(
        &router,
        "POST",
        "/api/admin/noticias",
        Some(json!({ "titulo": "X", "destino": "OTRO" })),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_event_lifecycle() {
    let router = test_router();
    let token = admin_token(&router).await;

    let (status, created) = api(
        &router,
        "POST",
        "/api/events/admin",
        Some(json!({ "titulo": "Expo", "inicio": "2026-05-01T10:00:00", "todoElDia": true })),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().expect("id missing");

    let (status, listed) = api(&router, "GET", "/api/events?from=2026-05-01&to=2026-06-01", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().map(Vec::len), Some(1));

    let (status, _) = api(&router, "GET", "/api/events?from=pronto", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let uri = format!("/api/events/admin/{}", id);
    let (status, body) = api(&router, "DELETE", &uri, None, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true }));

    let (status, _) = api(&router, "GET", &format!("/api/events/{}", id), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_export_excel_is_readable_workbook() {
    use calamine::{Data, Reader, Xlsx};
    use std::io::Cursor;

    let router = test_router();
    let token = admin_token(&router).await;
    api(
        &router,
        "POST",
        "/api/admin/productos",
        Some(json!({ "fabricanteMarca": "Acme", "nombre": "Widget" })),
        Some(&token),
    )
    .await;

    let request = Request::builder()
        .uri("/api/productos/export/excel")
        .body(Body::empty())
        .expect("Failed to build request");
    let (status, content_type, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        content_type.as_deref(),
        Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")
    );

    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(body)).expect("body is not xlsx");
    let range = workbook.worksheet_range("Productos").expect("sheet Productos missing");
    let rows: Vec<_> = range.rows().collect();
    assert_eq!(rows[0][0], Data::String("id".to_string()));
    assert_eq!(rows[1][3], Data::String("Acme".to_string()));
    assert_eq!(rows[1][4], Data::String("Widget".to_string()));
}
