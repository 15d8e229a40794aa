use std::path::PathBuf;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// jmeter 结果 csv
    pub csv: PathBuf,

    /// json 配置文件
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// jmx 脚本，用来读取线程组名
    #[arg(short, long)]
    pub jmx: Option<PathBuf>,

    /// 结果写成 json
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 启动时间分桶宽度（毫秒）
    #[arg(long)]
    pub ramp_up_window_ms: Option<u64>,

    /// 同名线程判定为新实例的空闲时间（毫秒）
    #[arg(long)]
    pub execution_gap_ms: Option<u64>,

    /// 打印详情
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}
