//! 根据线程名和时间戳推算每类用户的并发线程数。
//!
//! jmeter 的线程名一般是 `<线程组名> <组号>-<线程号>`，线程号从 1 开始，
//! 所以同一组里最大的线程号就是配置的线程数。

use std::collections::{BTreeSet, HashMap};
use indexmap::{IndexMap, IndexSet};
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use crate::models::sample::SampleRecord;
use crate::models::user_type::{
    ConcurrencySettings, InferenceMethod, MatchSource, UserTypeConcurrency, UserTypeConfig,
};

lazy_static! {
    // "<组名> <组号>-<线程号>"
    static ref GROUPED_SUFFIX: Regex = Regex::new(r"^(.*?)\s+\d+-(\d+)$").unwrap();
    static ref DASH_SUFFIX: Regex = Regex::new(r"^(.*)-(\d+)$").unwrap();
    static ref SPACE_SUFFIX: Regex = Regex::new(r"^(.*?)\s+(\d+)$").unwrap();
}

/// 拆出线程名末尾的编号，返回 (组名, 编号)
pub fn split_thread_suffix(thread_name: &str) -> Option<(&str, u64)> {
    let caps = GROUPED_SUFFIX
        .captures(thread_name)
        .or_else(|| DASH_SUFFIX.captures(thread_name))
        .or_else(|| SPACE_SUFFIX.captures(thread_name))?;
    let prefix = caps.get(1)?.as_str().trim();
    let number = caps.get(2)?.as_str().parse().ok()?;
    Some((prefix, number))
}

fn matches_any(thread_name: &str, needles: &[String]) -> bool {
    needles
        .iter()
        .filter(|n| !n.is_empty())
        .any(|n| thread_name.contains(n.as_str()))
}

/// 先用精确线程组名筛，筛不到再用模式匹配
pub fn select_samples<'a>(
    samples: &'a [SampleRecord],
    user_type: &UserTypeConfig,
    exact_groups: Option<&[String]>,
) -> (Vec<&'a SampleRecord>, MatchSource) {
    let exact = exact_groups
        .filter(|names| !names.is_empty())
        .or_else(|| Some(user_type.jmx_thread_group_names.as_slice()).filter(|n| !n.is_empty()));

    if let Some(names) = exact {
        let matched: Vec<&SampleRecord> = samples
            .iter()
            .filter(|s| matches_any(&s.thread_name, names))
            .collect();
        if !matched.is_empty() {
            return (matched, MatchSource::ExactGroups);
        }
        debug!("{}: 精确线程组没有匹配到样本，改用模式匹配", user_type.key);
    }

    let matched = samples
        .iter()
        .filter(|s| matches_any(&s.thread_name, &user_type.thread_group_patterns))
        .collect();
    (matched, MatchSource::Patterns)
}

/// 同一个线程名反复出现时，按空闲间隔切分实例，再按启动窗口合并
pub fn count_timing_clusters(timestamps: &[u64], settings: &ConcurrencySettings) -> usize {
    if timestamps.is_empty() {
        return 0;
    }
    let mut sorted = timestamps.to_vec();
    sorted.sort_unstable();

    let mut starts = vec![sorted[0]];
    let mut last = sorted[0];
    for &ts in &sorted[1..] {
        if ts - last > settings.execution_gap_ms {
            starts.push(ts);
        }
        last = ts;
    }

    let window = settings.ramp_up_window_ms.max(1);
    starts.iter().map(|ts| ts / window).collect::<BTreeSet<u64>>().len()
}

/// 由一组不同的线程名推算线程数
pub fn count_threads(
    thread_names: &IndexSet<&str>,
    timestamps: &[u64],
    settings: &ConcurrencySettings,
) -> (usize, InferenceMethod) {
    if thread_names.is_empty() {
        return (0, InferenceMethod::NoMatch);
    }

    // {组名: 最大线程号}
    let mut groups: IndexMap<&str, u64> = IndexMap::new();
    let mut unnumbered = 0usize;
    for name in thread_names {
        match split_thread_suffix(name) {
            Some((prefix, number)) => {
                let max = groups.entry(prefix).or_insert(0);
                *max = (*max).max(number);
            }
            None => unnumbered += 1,
        }
    }

    if groups.len() > 1 {
        // 多个线程组各自从 1 开始编号，分别取最大再相加
        let total: u64 = groups.values().sum();
        return (total as usize + unnumbered, InferenceMethod::MultiGroup);
    }
    if let Some(&max) = groups.values().next() {
        return ((max as usize).max(1), InferenceMethod::MaxSuffix);
    }
    if thread_names.len() > 1 {
        return (thread_names.len(), InferenceMethod::DistinctNames);
    }

    let windows = count_timing_clusters(timestamps, settings);
    (windows.max(thread_names.len()).max(1), InferenceMethod::TimingClusters)
}

pub fn infer_user_type(
    samples: &[SampleRecord],
    user_type: &UserTypeConfig,
    exact_groups: Option<&[String]>,
    settings: &ConcurrencySettings,
) -> UserTypeConcurrency {
    let (matched, source) = select_samples(samples, user_type, exact_groups);
    let thread_names: IndexSet<&str> = matched.iter().map(|s| s.thread_name.as_str()).collect();
    let timestamps: Vec<u64> = matched.iter().map(|s| s.timestamp_ms).collect();
    let (thread_count, method) = count_threads(&thread_names, &timestamps, settings);

    debug!(
        "{}: {} 个样本, {} 个线程名, 推算并发 {} ({:?})",
        user_type.key,
        matched.len(),
        thread_names.len(),
        thread_count,
        method
    );

    UserTypeConcurrency {
        key: user_type.key.clone(),
        display_name: user_type.display_name.clone(),
        thread_count,
        matched_samples: matched.len(),
        distinct_thread_names: thread_names.len(),
        source,
        method,
    }
}

/// 按配置顺序计算每类用户
pub fn infer_all(
    samples: &[SampleRecord],
    user_types: &[UserTypeConfig],
    thread_groups: &HashMap<String, Vec<String>>,
    settings: &ConcurrencySettings,
) -> IndexMap<String, UserTypeConcurrency> {
    user_types
        .iter()
        .map(|user_type| {
            let exact = thread_groups.get(&user_type.key).map(|v| v.as_slice());
            (user_type.key.clone(), infer_user_type(samples, user_type, exact, settings))
        })
        .collect()
}
