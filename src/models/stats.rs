use serde::{Deserialize, Serialize};

/// 一组耗时的统计值，单位毫秒
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub count: usize,
    pub min: u64,
    pub max: u64,
    pub avg: u64,
    pub p90: u64,
    pub p95: u64,
    pub p99: u64,
}
