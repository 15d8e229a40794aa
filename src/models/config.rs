use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use anyhow::{anyhow, Context};
use regex::Regex;
use serde::{Deserialize, Serialize};
use crate::models::user_type::{ConcurrencySettings, UserTypeConfig};

pub const DEFAULT_ENVIRONMENT_PATTERN: &str = r"https?://[^/.]*?-([A-Za-z0-9]+)\.azurewebsites\.net";

/// 解析报告需要的全部配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportConfig {
    pub user_types: Vec<UserTypeConfig>,
    pub concurrency: ConcurrencySettings,
    pub environment_pattern: String,
    /// {用户类型key: 线程组名}，通常来自 jmx
    pub thread_groups: HashMap<String, Vec<String>>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            user_types: Vec::new(),
            concurrency: ConcurrencySettings::default(),
            environment_pattern: DEFAULT_ENVIRONMENT_PATTERN.to_string(),
            thread_groups: HashMap::new(),
        }
    }
}

/// 配置文件里的内容，每个字段都可以不写
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigOverlay {
    pub user_types: Option<Vec<UserTypeConfig>>,
    pub concurrency: Option<ConcurrencyOverlay>,
    pub environment_pattern: Option<String>,
    pub thread_groups: Option<HashMap<String, Vec<String>>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConcurrencyOverlay {
    pub ramp_up_window_ms: Option<u64>,
    pub execution_gap_ms: Option<u64>,
}

impl ReportConfig {
    /// 读取 json 配置并叠加到默认值上
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("读取配置文件失败: {}", path.display()))?;
        let overlay: ConfigOverlay = serde_json::from_str(&text)
            .with_context(|| format!("解析配置文件失败: {}", path.display()))?;
        let mut config = ReportConfig::default();
        config.merge(overlay);
        config.validate()?;
        Ok(config)
    }

    /// 合并规则:
    /// user_types 整体替换；concurrency 按字段替换；
    /// environment_pattern 替换；thread_groups 按 key 合并，同 key 的列表替换
    pub fn merge(&mut self, overlay: ConfigOverlay) {
        if let Some(user_types) = overlay.user_types {
            self.user_types = user_types;
        }
        if let Some(concurrency) = overlay.concurrency {
            self.concurrency.merge(concurrency);
        }
        if let Some(pattern) = overlay.environment_pattern {
            self.environment_pattern = pattern;
        }
        if let Some(thread_groups) = overlay.thread_groups {
            self.thread_groups.extend(thread_groups);
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let mut keys = HashSet::new();
        for user_type in &self.user_types {
            if user_type.key.is_empty() {
                return Err(anyhow!("用户类型的key不能为空"));
            }
            if !keys.insert(user_type.key.as_str()) {
                return Err(anyhow!("重复的用户类型key: {}", user_type.key));
            }
        }
        if self.concurrency.ramp_up_window_ms == 0 {
            return Err(anyhow!("rampUpWindowMs必须大于0"));
        }
        if self.concurrency.execution_gap_ms == 0 {
            return Err(anyhow!("executionGapMs必须大于0"));
        }
        Regex::new(&self.environment_pattern)
            .with_context(|| format!("无效的环境正则: {}", self.environment_pattern))?;
        Ok(())
    }
}

impl ConcurrencySettings {
    pub fn merge(&mut self, overlay: ConcurrencyOverlay) {
        if let Some(ramp_up) = overlay.ramp_up_window_ms {
            self.ramp_up_window_ms = ramp_up;
        }
        if let Some(gap) = overlay.execution_gap_ms {
            self.execution_gap_ms = gap;
        }
    }
}
