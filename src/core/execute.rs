use std::collections::HashMap;
use std::fs;
use std::path::Path;
use anyhow::Context;
use log::{debug, error, info, warn};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use crate::core::concurrency::infer_all;
use crate::core::csv_tokenizer::{split_lines, tokenize_line, HeaderIndex};
use crate::core::environment::extract_environment;
use crate::core::error_classifier::classify;
use crate::core::jmx::{map_thread_groups, thread_group_names};
use crate::core::reconstruction::ReconstructionEngine;
use crate::core::sample_parser::SampleParser;
use crate::core::statistics::round2;
use crate::models::config::ReportConfig;
use crate::models::result::AggregatedResult;
use crate::models::user_type::UserTypeConfig;

/// 毫秒时间戳转 RFC 3339，0 或越界时返回空串
pub fn format_timestamp(ms: u64) -> String {
    if ms == 0 {
        return String::new();
    }
    OffsetDateTime::from_unix_timestamp_nanos(ms as i128 * 1_000_000)
        .ok()
        .and_then(|t| t.format(&Rfc3339).ok())
        .unwrap_or_default()
}

/// 解析整份 csv。
/// 缺少必需列、没有数据行时返回 None，不会报错。
/// `thread_groups` 是外部给出的精确线程组名，会覆盖配置里同 key 的项。
pub fn parse_csv_content(
    content: &str,
    config: &ReportConfig,
    thread_groups: Option<&HashMap<String, Vec<String>>>,
) -> Option<AggregatedResult> {
    let mut lines = split_lines(content);
    let header = match lines.next() {
        Some(line) => HeaderIndex::new(line),
        None => {
            warn!("csv内容为空");
            return None;
        }
    };
    let parser = match SampleParser::from_header(&header) {
        Some(parser) => parser,
        None => {
            warn!("csv缺少必需的列: label 或 elapsed");
            return None;
        }
    };

    let mut engine = ReconstructionEngine::new();
    let mut skipped = 0usize;
    for line in lines {
        match parser.parse(&tokenize_line(line)) {
            Some(sample) => engine.push(sample),
            None => skipped += 1,
        }
    }
    let rebuilt = engine.finish();
    if rebuilt.samples.is_empty() {
        warn!("csv没有可用的数据行");
        return None;
    }
    if skipped > 0 {
        debug!("跳过了 {} 行字段不足的数据", skipped);
    }

    let mut groups = config.thread_groups.clone();
    if let Some(external) = thread_groups {
        groups.extend(external.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    let concurrency = infer_all(&rebuilt.samples, &config.user_types, &groups, &config.concurrency);
    let environment = extract_environment(&rebuilt.samples, &config.environment_pattern);
    let error_analysis = classify(&rebuilt.errors);

    let start_time_ms = rebuilt.min_timestamp_ms.unwrap_or(0);
    let end_time_ms = rebuilt.max_timestamp_ms.unwrap_or(0);
    let tallied = rebuilt.successful + rebuilt.failed;
    let pass_percentage = if tallied == 0 {
        0.0
    } else {
        round2(rebuilt.successful as f64 / tallied as f64 * 100.0)
    };

    let result = AggregatedResult {
        total_transactions: rebuilt.controller_count,
        total_samples: rebuilt.samples.len(),
        transactions: rebuilt.groups,
        start_time_ms,
        end_time_ms,
        test_duration_ms: end_time_ms.saturating_sub(start_time_ms),
        start_time: format_timestamp(start_time_ms),
        end_time: format_timestamp(end_time_ms),
        concurrency,
        successful_samples: rebuilt.successful,
        failed_samples: rebuilt.failed,
        pass_percentage,
        environment,
        error_analysis,
    };
    info!(
        "解析完成: {} 行, {} 个事务, {} 次事务执行, 错误 {}",
        result.total_samples,
        result.transactions.len(),
        result.total_transactions,
        result.error_analysis.total_errors
    );
    Some(result)
}

/// 读文件失败也只返回 None，由调用方决定要不要继续出报告
pub fn parse_csv_file(
    path: &Path,
    config: &ReportConfig,
    thread_groups: Option<&HashMap<String, Vec<String>>>,
) -> Option<AggregatedResult> {
    match fs::read_to_string(path) {
        Ok(content) => parse_csv_content(&content, config, thread_groups),
        Err(e) => {
            error!("读取csv失败 {}: {}", path.display(), e);
            None
        }
    }
}

/// 从 jmx 里读线程组名并分配给各个用户类型
pub fn load_thread_groups(
    jmx_path: &Path,
    user_types: &[UserTypeConfig],
) -> anyhow::Result<HashMap<String, Vec<String>>> {
    let jmx = fs::read_to_string(jmx_path)
        .with_context(|| format!("读取jmx失败: {}", jmx_path.display()))?;
    let names = thread_group_names(&jmx);
    debug!("jmx线程组: {:?}", names);
    Ok(map_thread_groups(user_types, &names))
}
