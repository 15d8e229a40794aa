use prettytable::{format, row, Cell, Row, Table};
use crate::models::result::AggregatedResult;

fn new_table() -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
    table
}

pub fn show_result_with_table(result: &AggregatedResult) {
    let mut table = new_table();
    table.add_row(row!["指标", "值"]);
    table.add_row(row!["环境", result.environment]);
    table.add_row(row!["开始时间", result.start_time]);
    table.add_row(row!["结束时间", result.end_time]);
    table.add_row(row!["持续时间", format!("{:.1}s", result.test_duration_ms as f64 / 1000.0)]);
    table.add_row(row!["总样本数", result.total_samples]);
    table.add_row(row!["事务执行次数", result.total_transactions]);
    table.add_row(row!["成功数", result.successful_samples]);
    table.add_row(row!["失败数", result.failed_samples]);
    table.add_row(row!["通过率", format!("{:.2}%", result.pass_percentage)]);
    table.add_row(row!["虚拟用户", result.total_virtual_users()]);
    println!("测试结果:");
    table.printstd();

    if !result.transactions.is_empty() {
        let mut tx_table = new_table();
        tx_table.add_row(row!["事务", "次数", "最小", "平均", "最大", "90%", "95%", "99%", "错误率"]);
        for group in result.transactions.values() {
            let stats = &group.stats;
            tx_table.add_row(Row::new(vec![
                Cell::new(&group.name),
                Cell::new(&stats.count.to_string()).style_spec("r"),
                Cell::new(&format!("{} ms", stats.min)).style_spec("r"),
                Cell::new(&format!("{} ms", stats.avg)).style_spec("r"),
                Cell::new(&format!("{} ms", stats.max)).style_spec("r"),
                Cell::new(&format!("{} ms", stats.p90)).style_spec("r"),
                Cell::new(&format!("{} ms", stats.p95)).style_spec("r"),
                Cell::new(&format!("{} ms", stats.p99)).style_spec("r"),
                Cell::new(&format!("{:.2}%", group.error_rate)).style_spec("r"),
            ]));
        }
        println!("事务:");
        tx_table.printstd();
    }

    if !result.concurrency.is_empty() {
        let mut users_table = new_table();
        users_table.add_row(row!["用户类型", "并发", "样本数", "推算方式"]);
        for c in result.concurrency.values() {
            users_table.add_row(Row::new(vec![
                Cell::new(&c.display_name),
                Cell::new(&c.thread_count.to_string()),
                Cell::new(&c.matched_samples.to_string()),
                Cell::new(&format!("{:?}", c.method)),
            ]));
        }
        println!("并发:");
        users_table.printstd();
    }

    if result.error_analysis.has_errors {
        let mut errors_table = new_table();
        errors_table.add_row(row!["请求", "错误代码", "次数", "错误信息"]);
        for e in &result.error_analysis.top_errors_by_sampler {
            errors_table.add_row(Row::new(vec![
                Cell::new(&e.sampler),
                Cell::new(&e.error_type),
                Cell::new(&e.count.to_string()),
                Cell::new(&e.message).style_spec("R"),
            ]));
        }
        println!("错误 (共 {}):", result.error_analysis.total_errors);
        errors_table.printstd();
    }
}
