// ==========================================
// KCCR 产品目录 - 表头别名解析器
// ==========================================
// 职责: 在一行中按别名顺序查找字段值
// 规则: 先精确匹配表头，全部未命中再做大小写不敏感匹配
// ==========================================

use crate::importer::sheet::{CellValue, SheetRow};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// Presence - 命中判定严格度
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    /// 只有列缺失视为未命中（空单元格也算命中）
    #[default]
    Defined,
    /// 列缺失、空单元格、空字符串均视为未命中
    NonEmpty,
}

impl Presence {
    fn accepts(self, value: &CellValue) -> bool {
        match self {
            Presence::Defined => true,
            Presence::NonEmpty => !value.is_blank(),
        }
    }
}

impl fmt::Display for Presence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Presence::Defined => write!(f, "defined"),
            Presence::NonEmpty => write!(f, "non_empty"),
        }
    }
}

impl FromStr for Presence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "defined" => Ok(Presence::Defined),
            "non_empty" | "nonempty" => Ok(Presence::NonEmpty),
            other => Err(format!("未知的表头命中策略: {}", other)),
        }
    }
}

/// 按别名顺序解析字段原始值
///
/// # 参数
/// - row: 原始行
/// - aliases: 可接受的表头拼写（按优先级）
/// - presence: 命中判定严格度
///
/// # 返回
/// - Some(&CellValue): 第一个满足严格度的值
/// - None: 所有别名均未命中
///
/// # 说明
/// 大小写不敏感阶段，若多个表头小写后相同，以靠后的列为准。
pub fn resolve<'a>(row: &'a SheetRow, aliases: &[&str], presence: Presence) -> Option<&'a CellValue> {
    // 阶段 1: 精确匹配
    for alias in aliases {
        if let Some(value) = row.get(alias) {
            if presence.accepts(value) {
                return Some(value);
            }
        }
    }

    // 阶段 2: 小写匹配
    let lowered: Vec<(String, &CellValue)> = row
        .iter()
        .map(|(h, v)| (h.to_lowercase(), v))
        .collect();

    for alias in aliases {
        let key = alias.to_lowercase();
        let hit = lowered.iter().rev().find(|(h, _)| *h == key).map(|(_, v)| *v);
        if let Some(value) = hit {
            if presence.accepts(value) {
                return Some(value);
            }
        }
    }

    None
}
