use std::fs;
use anyhow::Context;
use clap::Parser;
use log::info;
use jmeter_report_engine::core::execute::{load_thread_groups, parse_csv_file};
use jmeter_report_engine::core::show_result_with_table::show_result_with_table;
use jmeter_report_engine::models::args::Args;
use jmeter_report_engine::models::config::{ConcurrencyOverlay, ReportConfig};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let mut config = match &args.config {
        Some(path) => ReportConfig::load(path)?,
        None => ReportConfig::default(),
    };
    // 命令行参数优先于配置文件
    config.concurrency.merge(ConcurrencyOverlay {
        ramp_up_window_ms: args.ramp_up_window_ms,
        execution_gap_ms: args.execution_gap_ms,
    });
    config.validate()?;

    let thread_groups = match &args.jmx {
        Some(path) => Some(load_thread_groups(path, &config.user_types)?),
        None => None,
    };

    let result = match parse_csv_file(&args.csv, &config, thread_groups.as_ref()) {
        Some(result) => result,
        None => {
            println!("没有可用的JMeter数据: {}", args.csv.display());
            return Ok(());
        }
    };
    show_result_with_table(&result);

    if let Some(output) = &args.output {
        let json = serde_json::to_string_pretty(&result).context("序列化结果失败")?;
        fs::write(output, json).with_context(|| format!("写入结果失败: {}", output.display()))?;
        info!("结果已写入 {}", output.display());
    }
    Ok(())
}
