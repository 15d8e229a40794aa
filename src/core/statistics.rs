use crate::models::stats::Statistics;

/// 最近秩百分位: 升序后取 ceil(p/100*N)-1
pub fn percentile(sorted: &[u64], pct: f64) -> u64 {
    if sorted.is_empty() {
        return 0;
    }
    let rank = (pct / 100.0 * sorted.len() as f64).ceil() as usize;
    let idx = rank.saturating_sub(1).min(sorted.len() - 1);
    sorted[idx]
}

/// 空输入返回全 0
pub fn calculate(values: &[u64]) -> Statistics {
    if values.is_empty() {
        return Statistics::default();
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let sum: u128 = sorted.iter().map(|&v| v as u128).sum();
    let avg = (sum as f64 / sorted.len() as f64).round() as u64;

    Statistics {
        count: sorted.len(),
        min: sorted[0],
        max: sorted[sorted.len() - 1],
        avg,
        p90: percentile(&sorted, 90.0),
        p95: percentile(&sorted, 95.0),
        p99: percentile(&sorted, 99.0),
    }
}

/// 保留两位小数
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
