use std::collections::HashMap;
use indexmap::IndexSet;
use lazy_static::lazy_static;
use regex::Regex;
use crate::models::user_type::UserTypeConfig;

lazy_static! {
    static ref THREAD_GROUP_TAG: Regex = Regex::new(
        r#"<(?:ThreadGroup|SetupThreadGroup|PostThreadGroup|kg\.apc\.[\w.]*ThreadGroup)\b([^>]*)>"#
    )
    .unwrap();
    static ref TESTNAME_ATTR: Regex = Regex::new(r#"\btestname="([^"]*)""#).unwrap();
    static ref DISABLED_ATTR: Regex = Regex::new(r#"\benabled="false""#).unwrap();
}

fn unescape_xml(value: &str) -> String {
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// 按文档顺序取出所有启用的线程组名，去重
pub fn thread_group_names(jmx: &str) -> Vec<String> {
    let mut names: IndexSet<String> = IndexSet::new();
    for tag in THREAD_GROUP_TAG.captures_iter(jmx) {
        let attrs = match tag.get(1) {
            Some(attrs) => attrs.as_str(),
            None => continue,
        };
        if DISABLED_ATTR.is_match(attrs) {
            continue;
        }
        if let Some(name) = TESTNAME_ATTR.captures(attrs).and_then(|c| c.get(1)) {
            let name = unescape_xml(name.as_str());
            if !name.is_empty() {
                names.insert(name);
            }
        }
    }
    names.into_iter().collect()
}

/// 线程组名等于配置的 jmx 名或者包含某个模式，就归到这个用户类型
pub fn map_thread_groups(user_types: &[UserTypeConfig], names: &[String]) -> HashMap<String, Vec<String>> {
    let mut mapping = HashMap::new();
    for user_type in user_types {
        let assigned: Vec<String> = names
            .iter()
            .filter(|name| {
                user_type.jmx_thread_group_names.iter().any(|n| n == *name)
                    || user_type
                        .thread_group_patterns
                        .iter()
                        .any(|p| !p.is_empty() && name.contains(p.as_str()))
            })
            .cloned()
            .collect();
        if !assigned.is_empty() {
            mapping.insert(user_type.key.clone(), assigned);
        }
    }
    mapping
}
