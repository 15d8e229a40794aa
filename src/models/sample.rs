use serde::{Deserialize, Serialize};

/// 事务控制器行的响应信息里一定带着这段文字
pub const CONTROLLER_MESSAGE_MARKER: &str = "Number of samples in transaction";

/// 一行记录属于哪一类，解析时只算一次
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SampleKind {
    /// 事务控制器汇总行，声明了它下面应该有多少个请求
    #[serde(rename_all = "camelCase")]
    Controller { expected_count: usize },
    /// 单个 http 请求
    IndividualRequest,
    Unclassified,
}

/// csv 里的一行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleRecord {
    pub label: String,
    pub elapsed_ms: u64,
    pub success: bool,
    pub response_code: String,
    pub response_message: String,
    pub data_type: String,
    pub thread_name: String,
    pub failure_message: String,
    pub latency_ms: u64,
    pub connect_ms: u64,
    pub bytes: u64,
    pub url: String,
    pub timestamp_ms: u64,
    pub kind: SampleKind,
}

impl SampleRecord {
    pub fn is_transaction_controller(&self) -> bool {
        matches!(self.kind, SampleKind::Controller { .. })
    }

    pub fn is_individual_request(&self) -> bool {
        matches!(self.kind, SampleKind::IndividualRequest)
    }

    /// 控制器声明的子请求数量，普通请求返回 None
    pub fn expected_count(&self) -> Option<usize> {
        match self.kind {
            SampleKind::Controller { expected_count } => Some(expected_count),
            _ => None,
        }
    }

    /// 样本结束时间
    pub fn end_timestamp_ms(&self) -> u64 {
        self.timestamp_ms.saturating_add(self.elapsed_ms)
    }
}
