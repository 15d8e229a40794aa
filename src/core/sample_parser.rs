use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use crate::core::csv_tokenizer::HeaderIndex;
use crate::models::sample::{SampleKind, SampleRecord, CONTROLLER_MESSAGE_MARKER};

lazy_static! {
    static ref EXPECTED_COUNT: Regex =
        Regex::new(r"Number of samples in transaction\s*:\s*(\d+)").unwrap();
}

/// 从控制器的响应信息里取声明的子请求数，取不到就是 0
pub fn parse_expected_count(response_message: &str) -> usize {
    EXPECTED_COUNT
        .captures(response_message)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

pub fn classify(data_type: &str, response_message: &str, url: &str) -> SampleKind {
    if data_type.is_empty() && response_message.contains(CONTROLLER_MESSAGE_MARKER) {
        return SampleKind::Controller {
            expected_count: parse_expected_count(response_message),
        };
    }
    if !data_type.is_empty() || (!url.is_empty() && url != "null") {
        return SampleKind::IndividualRequest;
    }
    SampleKind::Unclassified
}

/// 根据表头把一行字段转成 SampleRecord
#[derive(Debug, Clone)]
pub struct SampleParser {
    label: usize,
    elapsed: usize,
    success: Option<usize>,
    response_code: Option<usize>,
    response_message: Option<usize>,
    data_type: Option<usize>,
    latency: Option<usize>,
    connect: Option<usize>,
    bytes: Option<usize>,
    url: Option<usize>,
    thread_name: Option<usize>,
    failure_message: Option<usize>,
    timestamp: Option<usize>,
    min_fields: usize,
}

impl SampleParser {
    /// 缺少 label 或 elapsed 列时返回 None
    pub fn from_header(header: &HeaderIndex) -> Option<Self> {
        let label = header.position("label")?;
        let elapsed = header.position("elapsed")?;
        Some(SampleParser {
            label,
            elapsed,
            success: header.position("success"),
            response_code: header.position("responseCode"),
            response_message: header.position("responseMessage"),
            data_type: header.position("dataType"),
            latency: header.position("Latency"),
            connect: header.position("Connect"),
            bytes: header.position("bytes"),
            url: header.position("URL"),
            thread_name: header.position("threadName"),
            failure_message: header.position("failureMessage"),
            timestamp: header.position("timeStamp"),
            min_fields: label.max(elapsed) + 1,
        })
    }

    /// 字段数不够的行直接跳过
    pub fn parse(&self, fields: &[String]) -> Option<SampleRecord> {
        if fields.len() < self.min_fields {
            debug!("跳过字段不足的行: {} < {}", fields.len(), self.min_fields);
            return None;
        }
        let text = |idx: Option<usize>| -> String {
            idx.and_then(|i| fields.get(i)).cloned().unwrap_or_default()
        };
        let number = |idx: Option<usize>| -> u64 {
            idx.and_then(|i| fields.get(i))
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(0)
        };

        let data_type = text(self.data_type);
        let response_message = text(self.response_message);
        let url = text(self.url);
        let kind = classify(&data_type, &response_message, &url);

        Some(SampleRecord {
            label: fields[self.label].clone(),
            elapsed_ms: number(Some(self.elapsed)),
            success: text(self.success).trim().eq_ignore_ascii_case("true"),
            response_code: text(self.response_code),
            response_message,
            data_type,
            thread_name: text(self.thread_name),
            failure_message: text(self.failure_message),
            latency_ms: number(self.latency),
            connect_ms: number(self.connect),
            bytes: number(self.bytes),
            url,
            timestamp_ms: number(self.timestamp),
            kind,
        })
    }
}
