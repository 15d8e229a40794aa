use log::warn;
use regex::Regex;
use crate::models::sample::SampleRecord;

pub const UNKNOWN_ENVIRONMENT: &str = "Unknown";
const AZURE_HOST_MARKER: &str = "azurewebsites.net";

/// 从第一个 azurewebsites.net 的地址里取环境名，大写
pub fn extract_environment(samples: &[SampleRecord], pattern: &str) -> String {
    let regex = match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(e) => {
            warn!("无效的环境正则 {}: {}", pattern, e);
            return UNKNOWN_ENVIRONMENT.to_string();
        }
    };

    samples
        .iter()
        .find(|s| s.url.contains(AZURE_HOST_MARKER))
        .and_then(|s| regex.captures(&s.url))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_uppercase())
        .unwrap_or_else(|| UNKNOWN_ENVIRONMENT.to_string())
}
