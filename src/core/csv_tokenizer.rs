use std::collections::HashMap;
use csv::{ReaderBuilder, StringRecord};

/// 按逗号切分一行，支持双引号字段和 "" 转义。
/// 引号没闭合时把剩下的字符都算进最后一个字段。
pub fn tokenize_line(line: &str) -> Vec<String> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());
    let mut record = StringRecord::new();
    match reader.read_record(&mut record) {
        Ok(true) => record.iter().map(str::to_string).collect(),
        _ => vec![String::new()],
    }
}

/// 按物理行切分，去掉行尾 \r，跳过空行
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty())
}

/// 表头名到列号
#[derive(Debug, Clone)]
pub struct HeaderIndex {
    columns: HashMap<String, usize>,
}

impl HeaderIndex {
    pub fn new(header_line: &str) -> Self {
        let mut columns = HashMap::new();
        // 列名重复时取第一个
        for (i, name) in tokenize_line(header_line).into_iter().enumerate() {
            columns
                .entry(name.trim_start_matches('\u{feff}').trim().to_string())
                .or_insert(i);
        }
        HeaderIndex { columns }
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.get(name).copied()
    }
}
