use std::collections::HashMap;
use std::io::Write;
use jmeter_report_engine::core::csv_tokenizer::tokenize_line;
use jmeter_report_engine::models::user_type::{InferenceMethod, MatchSource, UserTypeConfig};
use jmeter_report_engine::{parse_csv_content, parse_csv_file, AggregatedResult, ReportConfig};
use rstest::rstest;

const HEADER: &str = "label,elapsed,success,responseCode,responseMessage,dataType,threadName,timeStamp";

fn config() -> ReportConfig {
    ReportConfig {
        user_types: vec![
            UserTypeConfig {
                key: "district_coordinator".into(),
                display_name: "District Coordinator".into(),
                thread_group_patterns: vec!["District Coordinator".into()],
                jmx_thread_group_names: Vec::new(),
            },
            UserTypeConfig {
                key: "teacher".into(),
                display_name: "Teacher".into(),
                thread_group_patterns: vec!["Teacher".into()],
                jmx_thread_group_names: Vec::new(),
            },
        ],
        ..ReportConfig::default()
    }
}

fn parse(body: &str) -> Option<AggregatedResult> {
    parse_csv_content(&format!("{}\n{}", HEADER, body), &config(), None)
}

/// 一个比较完整的日志: 两个事务，几次失败，两类用户
fn realistic_log() -> String {
    let rows = [
        r#"Login,500,true,200,"Number of samples in transaction : 2, number of failing samples : 0",,District Coordinator 1-1,1700000000000"#,
        "GET /login,200,true,200,OK,text,District Coordinator 1-1,1700000000000",
        "POST /login,280,true,200,OK,text,District Coordinator 1-1,1700000000200",
        r#"Login,650,false,500,"Number of samples in transaction : 2, number of failing samples : 1",,District Coordinator 1-2,1700000001000"#,
        "GET /login,250,true,200,OK,text,District Coordinator 1-2,1700000001000",
        "POST /login,390,false,500,Internal Server Error,text,District Coordinator 1-2,1700000001250",
        r#"Search,900,true,200,"Number of samples in transaction : 1, number of failing samples : 0",,Teacher 2-1,1700000002000"#,
        "GET /search?q=math,880,true,200,OK,text,Teacher 2-1,1700000002000",
        "GET /metrics,15,false,,Non HTTP response message: Connection reset,text,Teacher 2-1,1700000003000",
        r#"Login,420,true,200,"Number of samples in transaction : 2, number of failing samples : 0",,District Coordinator 1-3,1700000004000"#,
        "GET /login,190,true,200,OK,text,District Coordinator 1-3,1700000004000",
        "POST /login,230,true,200,OK,text,District Coordinator 1-3,1700000004190",
    ];
    format!("{}\n{}\n", HEADER, rows.join("\n"))
}

#[test]
fn login_scenario() {
    let result = parse(
        "Login,500,true,200,Number of samples in transaction : 1,,Login 1-1,1700000000000\n\
         POST /login,480,true,200,OK,text,Login 1-1,1700000000010",
    )
    .unwrap();

    assert_eq!(result.transactions.len(), 1);
    let login = &result.transactions["Login"];
    assert_eq!(login.executions.len(), 1);
    assert_eq!(login.executions[0].children.len(), 1);
    assert_eq!(login.executions[0].children[0].label, "POST /login");
    assert_eq!(login.stats.avg, 500);
    assert_eq!(result.total_transactions, 1);
}

#[test]
fn unmet_expectation_keeps_what_was_seen() {
    let result = parse(
        "Login,500,true,200,Number of samples in transaction : 2,,Login 1-1,1\n\
         POST /login,480,true,200,OK,text,Login 1-1,2",
    )
    .unwrap();
    let execution = &result.transactions["Login"].executions[0];
    assert_eq!(execution.expected_count, 2);
    assert_eq!(execution.children.len(), 1);
}

#[rstest]
#[case::header_only(format!("{}\n", HEADER))]
#[case::header_with_blank_lines(format!("{}\r\n\r\n\n", HEADER))]
#[case::empty(String::new())]
#[case::missing_elapsed("label,success\nLogin,true\n".to_string())]
#[case::missing_label("elapsed,success\n10,true\n".to_string())]
#[case::every_row_too_short("timeStamp,success,label,elapsed\n1,true\n2,false\n".to_string())]
fn unusable_content_is_none(#[case] content: String) {
    assert!(parse_csv_content(&content, &config(), None).is_none());
}

#[test]
fn short_rows_are_skipped() {
    let result = parse_csv_content(
        "timeStamp,success,label,elapsed\n1,true\n2,true,GET /,15\n",
        &config(),
        None,
    )
    .unwrap();
    assert_eq!(result.total_samples, 1);
}

#[test]
fn tokenizer_quote_scenario() {
    assert_eq!(tokenize_line(r#""a,""b"",c""#), vec![r#"a,"b",c"#.to_string()]);
}

#[test]
fn realistic_log_transactions() {
    let result = parse_csv_content(&realistic_log(), &config(), None).unwrap();

    assert_eq!(result.total_samples, 12);
    assert_eq!(result.total_transactions, 4);
    let keys: Vec<&String> = result.transactions.keys().collect();
    assert_eq!(keys, vec!["Login", "Search"]);

    let login = &result.transactions["Login"];
    assert_eq!(login.executions.len(), 3);
    assert!(login.executions.iter().all(|e| e.children.len() == 2));
    assert_eq!(login.child_pool.len(), 6);
    assert_eq!(login.unique_child_requests.len(), 2);
    assert_eq!(login.stats.min, 420);
    assert_eq!(login.stats.max, 650);
    assert_eq!(login.stats.avg, 523);
    assert_eq!(login.error_rate, 33.33);

    // 名额满了之后的 /metrics 不属于 Search
    let search = &result.transactions["Search"];
    assert_eq!(search.executions[0].children.len(), 1);
    assert_eq!(search.executions[0].children[0].label, "GET /search?q=math");
}

#[test]
fn realistic_log_totals_and_errors() {
    let result = parse_csv_content(&realistic_log(), &config(), None).unwrap();

    // 3 个成功的控制器 + 6 个成功的请求，失败的控制器不算失败
    assert_eq!(result.successful_samples, 9);
    assert_eq!(result.failed_samples, 2);
    assert_eq!(result.pass_percentage, 81.82);

    assert_eq!(result.start_time_ms, 1_700_000_000_000);
    assert_eq!(result.end_time_ms, 1_700_000_004_420);
    assert_eq!(result.test_duration_ms, 4_420);
    assert_eq!(result.start_time, "2023-11-14T22:13:20Z");

    let errors = &result.error_analysis;
    assert!(errors.has_errors);
    assert_eq!(errors.total_errors, 2);
    assert_eq!(errors.errors_by_type["500"].count, 1);
    assert_eq!(errors.errors_by_type["Unknown"].count, 1);
    assert_eq!(errors.top_errors_by_sampler[0].sampler, "POST /login");
    assert_eq!(errors.top_errors_by_sampler[1].sampler, "GET /metrics");
}

#[test]
fn realistic_log_concurrency() {
    let result = parse_csv_content(&realistic_log(), &config(), None).unwrap();

    let dc = &result.concurrency["district_coordinator"];
    assert_eq!(dc.thread_count, 3);
    assert_eq!(dc.method, InferenceMethod::MaxSuffix);
    let teacher = &result.concurrency["teacher"];
    assert_eq!(teacher.thread_count, 1);
    assert_eq!(result.total_virtual_users(), 4);
    assert_eq!(result.environment, "Unknown");
}

#[test]
fn external_thread_groups_override_patterns() {
    let mut groups = HashMap::new();
    groups.insert("teacher".to_string(), vec!["District Coordinator 1".to_string()]);
    let result = parse_csv_content(&realistic_log(), &config(), Some(&groups)).unwrap();
    let teacher = &result.concurrency["teacher"];
    assert_eq!(teacher.source, MatchSource::ExactGroups);
    assert_eq!(teacher.thread_count, 3);
}

#[test]
fn parsing_is_deterministic() {
    let log = realistic_log();
    let first = parse_csv_content(&log, &config(), None).unwrap();
    let second = parse_csv_content(&log, &config(), None).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn invariants_hold() {
    let result = parse_csv_content(&realistic_log(), &config(), None).unwrap();
    for group in result.transactions.values() {
        let s = &group.stats;
        assert!(s.min <= s.avg && s.avg <= s.max);
        assert!(s.p90 <= s.p95 && s.p95 <= s.p99 && s.p99 <= s.max);
        assert!((0.0..=100.0).contains(&group.error_rate));
        for execution in &group.executions {
            assert!(execution.children.len() <= execution.expected_count);
        }
    }
    for c in result.concurrency.values() {
        if c.matched_samples > 0 {
            assert!(c.thread_count >= 1);
        }
    }
}

#[test]
fn environment_from_azure_url() {
    let content = "label,elapsed,success,dataType,URL,threadName\n\
                   GET /health,5,true,text,https://example.com/health,Teacher 1-1\n\
                   GET /api,5,true,text,https://portal-api-staging.azurewebsites.net/api,Teacher 1-1\n";
    let result = parse_csv_content(content, &config(), None).unwrap();
    assert_eq!(result.environment, "STAGING");
}

#[test]
fn result_serializes_to_camel_case_json() {
    let result = parse_csv_content(&realistic_log(), &config(), None).unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["totalTransactions"], 4);
    assert_eq!(json["transactions"]["Login"]["stats"]["avg"], 523);
    assert_eq!(json["transactions"]["Login"]["errorRate"], 33.33);
    assert_eq!(json["concurrency"]["district_coordinator"]["threadCount"], 3);
    assert_eq!(json["errorAnalysis"]["errorsByType"]["500"]["code"], "500");
    assert_eq!(
        json["transactions"]["Login"]["executions"][0]["controller"]["kind"]["expectedCount"],
        2
    );
}

#[test]
fn parse_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(realistic_log().as_bytes()).unwrap();
    let result = parse_csv_file(file.path(), &config(), None).unwrap();
    assert_eq!(result.total_transactions, 4);
}
