// ==========================================
// KCCR 产品目录 - 新闻领域模型
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// NewsDestination - 新闻投放栏目
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NewsDestination {
    #[default]
    Novedades,   // 新品动态
    Anunciantes, // 广告商
}

impl fmt::Display for NewsDestination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NewsDestination::Novedades => write!(f, "NOVEDADES"),
            NewsDestination::Anunciantes => write!(f, "ANUNCIANTES"),
        }
    }
}

impl FromStr for NewsDestination {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "NOVEDADES" => Ok(NewsDestination::Novedades),
            "ANUNCIANTES" => Ok(NewsDestination::Anunciantes),
            other => Err(other.to_string()),
        }
    }
}

// ==========================================
// News - 新闻
// ==========================================
// 对齐: noticias 表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct News {
    pub id: i64,
    pub titulo: String,
    pub contenido: Option<String>,
    pub image_url: Option<String>,
    pub file_url: Option<String>,
    pub destino: NewsDestination,
    pub autor_id: Option<i64>,
    pub creado_en: NaiveDateTime,
    pub actualizado_en: NaiveDateTime,
}

/// 新建新闻
#[derive(Debug, Clone, PartialEq)]
pub struct NewNews {
    pub titulo: String,
    pub contenido: Option<String>,
    pub image_url: Option<String>,
    pub file_url: Option<String>,
    pub destino: NewsDestination,
    pub autor_id: Option<i64>,
}

/// 新闻更新（None = 保持不变）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewsUpdate {
    pub titulo: Option<String>,
    pub contenido: Option<String>,
    pub image_url: Option<String>,
    pub file_url: Option<String>,
    pub destino: Option<NewsDestination>,
}
