// ==========================================
// KCCR 产品目录 - 分页模型
// ==========================================

use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: usize = 50;

/// 分页请求（已归一化：page ≥ 1，page_size ≥ 1）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub page_size: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// 由查询参数构造；缺失、非数字或 < 1 时取默认值
    pub fn from_params(page: Option<&str>, page_size: Option<&str>) -> Self {
        let parse = |raw: Option<&str>, default: usize| {
            raw.and_then(|s| s.trim().parse::<i64>().ok())
                .filter(|n| *n >= 1)
                .map(|n| n as usize)
                .unwrap_or(default)
        };
        Self {
            page: parse(page, 1),
            page_size: parse(page_size, DEFAULT_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

/// 分页结果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_params_clamps() {
        assert_eq!(PageRequest::from_params(None, None), PageRequest::default());
        assert_eq!(
            PageRequest::from_params(Some("0"), Some("-5")),
            PageRequest::default()
        );
        let req = PageRequest::from_params(Some("3"), Some("20"));
        assert_eq!((req.page, req.page_size, req.offset()), (3, 20, 40));
    }

    #[test]
    fn test_page_serializes_camel_case() {
        let page = Page::<i32> {
            items: vec![],
            total: 0,
            page: 1,
            page_size: 50,
        };
        let v = serde_json::to_value(&page).unwrap();
        assert_eq!(v["pageSize"], 50);
    }
}
