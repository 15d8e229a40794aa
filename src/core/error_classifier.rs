use indexmap::IndexMap;
use crate::models::error_stats::{ErrorAnalysis, ErrorRecord, ErrorTypeSummary, SamplerErrorSummary};

const UNKNOWN_CODE: &str = "Unknown";
const TOP_SAMPLERS: usize = 5;

fn error_code(record: &ErrorRecord) -> String {
    let code = record.response_code.trim();
    if code.is_empty() {
        UNKNOWN_CODE.to_string()
    } else {
        code.to_string()
    }
}

fn error_message(record: &ErrorRecord) -> &str {
    if record.response_message.is_empty() {
        &record.failure_message
    } else {
        &record.response_message
    }
}

/// 按响应码和请求名分组，取出现次数最多的 5 个请求
pub fn classify(errors: &[ErrorRecord]) -> ErrorAnalysis {
    // {响应码: 汇总}
    let mut by_type: IndexMap<String, ErrorTypeSummary> = IndexMap::new();
    // {请求名: 汇总}
    let mut by_sampler: IndexMap<String, SamplerErrorSummary> = IndexMap::new();

    for record in errors {
        let code = error_code(record);
        let message = error_message(record);

        let summary = by_type.entry(code.clone()).or_insert_with(|| ErrorTypeSummary {
            code: code.clone(),
            count: 0,
            message: String::new(),
        });
        summary.count += 1;
        if summary.message.is_empty() {
            summary.message = message.to_string();
        }

        by_sampler
            .entry(record.label.clone())
            .or_insert_with(|| SamplerErrorSummary {
                sampler: record.label.clone(),
                count: 0,
                error_type: code,
                message: message.to_string(),
            })
            .count += 1;
    }

    // sort_by 是稳定排序，次数相同时保持首次出现的顺序
    let mut top: Vec<SamplerErrorSummary> = by_sampler.into_values().collect();
    top.sort_by(|a, b| b.count.cmp(&a.count));
    top.truncate(TOP_SAMPLERS);

    ErrorAnalysis {
        has_errors: !errors.is_empty(),
        total_errors: errors.len(),
        errors_by_type: by_type,
        top_errors_by_sampler: top,
    }
}
