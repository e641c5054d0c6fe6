// ==========================================
// KCCR 产品目录 - 活动日历 API
// ==========================================
// 职责: 活动列表（按 inicio 区间）、详情、管理端增删改
// ==========================================

use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::api::response::OkResponse;
use crate::api::validator::{is_truthy, parse_datetime, parse_positive_id, present_or_null, required_text};
use crate::domain::{EndUpdate, Event, EventUpdate, NewEvent};
use crate::i18n::{t, t_with_args};
use crate::repository::EventRepository;

/// 活动写入请求
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest {
    #[serde(default)]
    pub titulo: Option<String>,
    #[serde(default)]
    pub descripcion: Option<String>,
    #[serde(default)]
    pub ubicacion: Option<String>,
    #[serde(default)]
    pub inicio: Option<String>,
    /// 缺失 = 不变；null = 清空
    #[serde(default, deserialize_with = "present_or_null")]
    pub fin: Option<Option<String>>,
    /// 新建时按真值判定；更新时仅接受布尔
    #[serde(default)]
    pub todo_el_dia: Option<JsonValue>,
}

fn parse_date_param(raw: &str) -> ApiResult<NaiveDateTime> {
    parse_datetime(raw)
        .ok_or_else(|| ApiError::InvalidInput(t_with_args("event.invalid_date", &[("value", raw)])))
}

/// 可选日期参数：缺失或空串视为 None，非法值报错
fn parse_optional_date(raw: Option<&str>) -> ApiResult<Option<NaiveDateTime>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(value) => parse_date_param(value).map(Some),
        None => Ok(None),
    }
}

/// 活动 API
pub struct EventApi {
    event_repo: Arc<EventRepository>,
}

impl EventApi {
    pub fn new(event_repo: Arc<EventRepository>) -> Self {
        Self { event_repo }
    }

    /// 列表（inicio 升序）
    ///
    /// # 参数
    /// - from / to: inicio 的闭区间上下界（可选）
    pub fn list_events(&self, from: Option<&str>, to: Option<&str>) -> ApiResult<Vec<Event>> {
        let from = parse_optional_date(from)?;
        let to = parse_optional_date(to)?;
        Ok(self.event_repo.list(from, to)?)
    }

    pub fn get_event(&self, raw_id: &str) -> ApiResult<Event> {
        let not_found = || ApiError::NotFound(t("event.not_found"));
        let id = parse_positive_id(raw_id).ok_or_else(not_found)?;
        self.event_repo.find_by_id(id)?.ok_or_else(not_found)
    }

    /// 新建活动（titulo、inicio 必填）
    pub fn create_event(&self, request: &EventRequest, creator_id: i64) -> ApiResult<Event> {
        let (Some(titulo), Some(inicio_raw)) = (
            required_text(request.titulo.as_deref()),
            required_text(request.inicio.as_deref()),
        ) else {
            return Err(ApiError::InvalidInput(t("event.required_fields")));
        };
        let inicio = parse_date_param(&inicio_raw)?;
        let fin = parse_optional_date(request.fin.clone().flatten().as_deref())?;

        let event = self.event_repo.create(&NewEvent {
            titulo,
            descripcion: request.descripcion.clone(),
            ubicacion: request.ubicacion.clone(),
            inicio,
            fin,
            todo_el_dia: request.todo_el_dia.as_ref().is_some_and(is_truthy),
            creado_por_id: Some(creator_id),
        })?;
        info!(id = event.id, "活动已创建");
        Ok(event)
    }

    /// 更新活动
    ///
    /// descripcion / ubicacion 未提交即清空；fin 为 null 清空、缺失保持；
    /// todoElDia 仅在为布尔值时生效
    pub fn update_event(&self, raw_id: &str, request: &EventRequest) -> ApiResult<Event> {
        let id = parse_positive_id(raw_id).ok_or_else(|| ApiError::InvalidInput(t("common.invalid_id")))?;

        let fin = match &request.fin {
            None => EndUpdate::Keep,
            Some(None) => EndUpdate::Clear,
            Some(Some(raw)) => match parse_optional_date(Some(raw))? {
                Some(fin) => EndUpdate::Set(fin),
                None => EndUpdate::Keep,
            },
        };

        let update = EventUpdate {
            titulo: required_text(request.titulo.as_deref()),
            descripcion: request.descripcion.clone(),
            ubicacion: request.ubicacion.clone(),
            inicio: parse_optional_date(request.inicio.as_deref())?,
            fin,
            todo_el_dia: request.todo_el_dia.as_ref().and_then(JsonValue::as_bool),
        };

        let event = self
            .event_repo
            .update(id, &update)?
            .ok_or_else(|| ApiError::NotFound(t("event.not_found")))?;
        info!(id, "活动已更新");
        Ok(event)
    }

    pub fn delete_event(&self, raw_id: &str) -> ApiResult<OkResponse> {
        let id = parse_positive_id(raw_id).ok_or_else(|| ApiError::InvalidInput(t("common.invalid_id")))?;
        if !self.event_repo.delete(id)? {
            return Err(ApiError::NotFound(t("event.not_found")));
        }
        info!(id, "活动已删除");
        Ok(OkResponse::ok())
    }
}
