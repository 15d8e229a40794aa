use serde::{Deserialize, Serialize};

/// 一类虚拟用户，比如 "district_coordinator"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTypeConfig {
    pub key: String,
    pub display_name: String,
    /// 线程名里包含任意一个就算匹配
    #[serde(default)]
    pub thread_group_patterns: Vec<String>,
    /// 从 jmx 里拿到的线程组名，命中时优先使用
    #[serde(default)]
    pub jmx_thread_group_names: Vec<String>,
}

pub const DEFAULT_RAMP_UP_WINDOW_MS: u64 = 10_000;
pub const DEFAULT_EXECUTION_GAP_MS: u64 = 30_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConcurrencySettings {
    /// 启动时间分桶宽度
    pub ramp_up_window_ms: u64,
    /// 同名线程空闲超过这个值就当作新实例
    pub execution_gap_ms: u64,
}

impl Default for ConcurrencySettings {
    fn default() -> Self {
        ConcurrencySettings {
            ramp_up_window_ms: DEFAULT_RAMP_UP_WINDOW_MS,
            execution_gap_ms: DEFAULT_EXECUTION_GAP_MS,
        }
    }
}

/// 样本是通过什么方式筛出来的
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchSource {
    ExactGroups,
    Patterns,
}

/// 线程数是用哪种规则推出来的
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InferenceMethod {
    NoMatch,
    MultiGroup,
    MaxSuffix,
    DistinctNames,
    TimingClusters,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTypeConcurrency {
    pub key: String,
    pub display_name: String,
    pub thread_count: usize,
    pub matched_samples: usize,
    pub distinct_thread_names: usize,
    pub source: MatchSource,
    pub method: InferenceMethod,
}
