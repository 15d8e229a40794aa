use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use crate::models::error_stats::ErrorAnalysis;
use crate::models::transaction::TransactionGroup;
use crate::models::user_type::UserTypeConcurrency;

/// 一份 jmeter 结果文件汇总后的全部数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedResult {
    /// 事务控制器行数
    pub total_transactions: usize,
    pub total_samples: usize,
    // 按第一次出现的顺序
    pub transactions: IndexMap<String, TransactionGroup>,
    pub start_time_ms: u64,
    pub end_time_ms: u64,
    pub test_duration_ms: u64,
    pub start_time: String,
    pub end_time: String,
    // {用户类型key: 并发}
    pub concurrency: IndexMap<String, UserTypeConcurrency>,
    pub successful_samples: usize,
    pub failed_samples: usize,
    pub pass_percentage: f64,
    pub environment: String,
    pub error_analysis: ErrorAnalysis,
}

impl AggregatedResult {
    /// 所有用户类型的并发数之和
    pub fn total_virtual_users(&self) -> usize {
        self.concurrency.values().map(|c| c.thread_count).sum()
    }
}
