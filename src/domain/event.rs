// ==========================================
// KCCR 产品目录 - 活动领域模型
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// Event - 活动日历条目
// ==========================================
// 对齐: eventos 表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i64,
    pub titulo: String,
    pub descripcion: Option<String>,
    pub ubicacion: Option<String>,
    pub inicio: NaiveDateTime,
    pub fin: Option<NaiveDateTime>,
    pub todo_el_dia: bool,
    pub creado_por_id: Option<i64>,
}

/// 新建活动
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub titulo: String,
    pub descripcion: Option<String>,
    pub ubicacion: Option<String>,
    pub inicio: NaiveDateTime,
    pub fin: Option<NaiveDateTime>,
    pub todo_el_dia: bool,
    pub creado_por_id: Option<i64>,
}

/// 结束时间的三态更新
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum EndUpdate {
    #[default]
    Keep,
    Clear,
    Set(NaiveDateTime),
}

/// 活动更新
///
/// 描述/地点: None 表示清空（与旧前端约定一致：未提交即置空）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventUpdate {
    pub titulo: Option<String>,
    pub descripcion: Option<String>,
    pub ubicacion: Option<String>,
    pub inicio: Option<NaiveDateTime>,
    pub fin: EndUpdate,
    pub todo_el_dia: Option<bool>,
}
