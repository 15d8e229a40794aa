use serde::{Deserialize, Serialize};
use crate::models::sample::SampleRecord;
use crate::models::stats::Statistics;

/// 某个事务的一次执行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionExecution {
    pub index: usize,
    pub controller: SampleRecord,
    pub children: Vec<SampleRecord>,
    pub expected_count: usize,
}

impl TransactionExecution {
    pub fn new(index: usize, controller: SampleRecord) -> Self {
        let expected_count = controller.expected_count().unwrap_or(0);
        TransactionExecution {
            index,
            controller,
            children: Vec::new(),
            expected_count,
        }
    }
}

/// 同名事务的所有执行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionGroup {
    pub name: String,
    pub executions: Vec<TransactionExecution>,
    /// 所有执行捕获到的子请求，按出现顺序平铺
    pub child_pool: Vec<SampleRecord>,
    pub stats: Statistics,
    /// 百分比，保留两位小数
    pub error_rate: f64,
    pub unique_child_requests: Vec<SampleRecord>,
}

impl TransactionGroup {
    pub fn new(name: String) -> Self {
        TransactionGroup {
            name,
            executions: Vec::new(),
            child_pool: Vec::new(),
            stats: Statistics::default(),
            error_rate: 0.0,
            unique_child_requests: Vec::new(),
        }
    }

    pub fn failed_executions(&self) -> usize {
        self.executions.iter().filter(|e| !e.controller.success).count()
    }
}
