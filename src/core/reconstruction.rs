//! 从平铺的 jmeter 日志里还原 事务 -> 子请求 的层级关系。
//!
//! jmeter 写 csv 时事务控制器汇总行和它期间的 http 请求行挨在一起，
//! 但没有任何外键，只有控制器行里声明的子请求数量。这里单次顺序扫描，
//! 用 [`CaptureState`] 记录当前在给哪次执行收集子请求。

use indexmap::IndexMap;
use log::debug;
use crate::core::statistics::{calculate, round2};
use crate::models::error_stats::ErrorRecord;
use crate::models::sample::{SampleKind, SampleRecord};
use crate::models::transaction::{TransactionExecution, TransactionGroup};

/// 收集子请求的状态机
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CaptureState {
    #[default]
    Idle,
    Capturing {
        transaction: String,
        execution: usize,
        expected: usize,
        collected: usize,
    },
}

/// 每一行对事务分组的影响
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Ignore,
    StartExecution { transaction: String, index: usize },
    CaptureChild { transaction: String, index: usize },
}

impl CaptureState {
    /// 处理一行，返回新状态和要做的动作。
    /// `next_index` 是这一行如果是控制器时新执行的序号。
    pub fn step(&self, sample: &SampleRecord, next_index: usize) -> (CaptureState, Transition) {
        // 名额已满，先回到空闲再看这一行
        let current = match self {
            CaptureState::Capturing { expected, collected, .. } if collected >= expected => CaptureState::Idle,
            other => other.clone(),
        };

        match sample.kind {
            SampleKind::Controller { expected_count } => (
                CaptureState::Capturing {
                    transaction: sample.label.clone(),
                    execution: next_index,
                    expected: expected_count,
                    collected: 0,
                },
                Transition::StartExecution {
                    transaction: sample.label.clone(),
                    index: next_index,
                },
            ),
            SampleKind::IndividualRequest => match current {
                CaptureState::Capturing { transaction, execution, expected, collected } if collected < expected => {
                    let transition = Transition::CaptureChild {
                        transaction: transaction.clone(),
                        index: execution,
                    };
                    (
                        CaptureState::Capturing {
                            transaction,
                            execution,
                            expected,
                            collected: collected + 1,
                        },
                        transition,
                    )
                }
                state => (state, Transition::Ignore),
            },
            SampleKind::Unclassified => (current, Transition::Ignore),
        }
    }
}

/// 扫描结束后的全部数据
#[derive(Debug, Clone, PartialEq)]
pub struct Reconstruction {
    pub groups: IndexMap<String, TransactionGroup>,
    pub samples: Vec<SampleRecord>,
    pub errors: Vec<ErrorRecord>,
    pub controller_count: usize,
    pub successful: usize,
    pub failed: usize,
    pub min_timestamp_ms: Option<u64>,
    pub max_timestamp_ms: Option<u64>,
}

#[derive(Debug, Default)]
pub struct ReconstructionEngine {
    state: CaptureState,
    groups: IndexMap<String, TransactionGroup>,
    samples: Vec<SampleRecord>,
    errors: Vec<ErrorRecord>,
    controller_count: usize,
    successful: usize,
    failed: usize,
    min_timestamp_ms: Option<u64>,
    max_timestamp_ms: Option<u64>,
    captured_children: usize,
}

impl ReconstructionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按日志顺序喂入一行
    pub fn push(&mut self, sample: SampleRecord) {
        self.track_globals(&sample);

        let next_index = match sample.kind {
            SampleKind::Controller { .. } => self.groups.get(&sample.label).map_or(0, |g| g.executions.len()),
            _ => 0,
        };
        let (state, transition) = self.state.step(&sample, next_index);
        self.state = state;

        match transition {
            Transition::StartExecution { transaction, index } => {
                self.controller_count += 1;
                let group = self
                    .groups
                    .entry(transaction.clone())
                    .or_insert_with(|| TransactionGroup::new(transaction));
                group.executions.push(TransactionExecution::new(index, sample.clone()));
            }
            Transition::CaptureChild { transaction, index } => {
                if let Some(group) = self.groups.get_mut(&transaction) {
                    if let Some(execution) = group.executions.get_mut(index) {
                        execution.children.push(sample.clone());
                        group.child_pool.push(sample.clone());
                        self.captured_children += 1;
                    }
                }
            }
            Transition::Ignore => {}
        }

        self.samples.push(sample);
    }

    fn track_globals(&mut self, sample: &SampleRecord) {
        if sample.timestamp_ms > 0 {
            let start = sample.timestamp_ms;
            let end = sample.end_timestamp_ms();
            self.min_timestamp_ms = Some(self.min_timestamp_ms.map_or(start, |m| m.min(start)));
            self.max_timestamp_ms = Some(self.max_timestamp_ms.map_or(end, |m| m.max(end)));
        }

        // 成功数包括控制器行，失败数只算单个请求
        if sample.success {
            self.successful += 1;
        } else if sample.is_individual_request() && !sample.is_transaction_controller() {
            self.failed += 1;
        }

        if !sample.success && !sample.is_transaction_controller() {
            self.errors.push(ErrorRecord::from(sample));
        }
    }

    /// 全部扫描完后计算每个事务的统计值
    pub fn finish(self) -> Reconstruction {
        debug!(
            "扫描完成: {} 行, {} 个事务, {} 次执行, 捕获子请求 {}",
            self.samples.len(),
            self.groups.len(),
            self.controller_count,
            self.captured_children
        );
        let mut groups = self.groups;
        for group in groups.values_mut() {
            finalize_group(group);
        }
        Reconstruction {
            groups,
            samples: self.samples,
            errors: self.errors,
            controller_count: self.controller_count,
            successful: self.successful,
            failed: self.failed,
            min_timestamp_ms: self.min_timestamp_ms,
            max_timestamp_ms: self.max_timestamp_ms,
        }
    }
}

pub fn finalize_group(group: &mut TransactionGroup) {
    let elapsed: Vec<u64> = group.executions.iter().map(|e| e.controller.elapsed_ms).collect();
    group.stats = calculate(&elapsed);

    group.error_rate = if group.executions.is_empty() {
        0.0
    } else {
        round2(group.failed_executions() as f64 / group.executions.len() as f64 * 100.0)
    };

    let mut seen = std::collections::HashSet::new();
    group.unique_child_requests = group
        .child_pool
        .iter()
        .filter(|child| seen.insert(child.label.as_str()))
        .cloned()
        .collect();
}

/// 对一串已经按日志顺序排好的样本做完整扫描
pub fn reconstruct<I>(samples: I) -> Reconstruction
where
    I: IntoIterator<Item = SampleRecord>,
{
    let mut engine = ReconstructionEngine::new();
    for sample in samples {
        engine.push(sample);
    }
    engine.finish()
}
