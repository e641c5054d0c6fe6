// ==========================================
// KCCR 产品目录 - 导入结果模型
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// ImportSummary - 批量导入汇总
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub total_rows: usize,     // 原始行数
    pub total_valid: usize,    // 有效行数（品牌+名称齐全）
    pub total_rejected: usize, // 被丢弃的无效行数
    pub total_inserted: usize, // 实际插入行数（去重跳过后）
    pub batches: usize,        // 插入批次数
    pub headers: Vec<String>,  // 检测到的表头
}
