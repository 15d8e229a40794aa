use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use crate::models::sample::SampleRecord;

/// 失败的单个请求，事务控制器不算
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorRecord {
    pub label: String,
    pub response_code: String,
    pub response_message: String,
    pub failure_message: String,
}

impl From<&SampleRecord> for ErrorRecord {
    fn from(sample: &SampleRecord) -> Self {
        ErrorRecord {
            label: sample.label.clone(),
            response_code: sample.response_code.clone(),
            response_message: sample.response_message.clone(),
            failure_message: sample.failure_message.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorTypeSummary {
    pub code: String,
    pub count: usize,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplerErrorSummary {
    pub sampler: String,
    pub count: usize,
    pub error_type: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorAnalysis {
    pub has_errors: bool,
    pub total_errors: usize,
    // {响应码: 汇总}
    pub errors_by_type: IndexMap<String, ErrorTypeSummary>,
    pub top_errors_by_sampler: Vec<SamplerErrorSummary>,
}
