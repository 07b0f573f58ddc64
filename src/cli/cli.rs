use clap::Parser;
use std::path::PathBuf;

/// Process Monitor - 单进程 CPU / 内存采样服务
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// 监听端口
    #[arg(short, long, env = "PORT", default_value_t = 9999)]
    pub port: u16,

    /// 监听地址
    #[arg(short = 'a', long, env = "ADDRESS", default_value = "0.0.0.0")]
    pub address: String,

    /// 保存上次进程名和间隔的配置文件
    #[arg(short, long, env = "CONFIG_FILE", default_value = "process_monitor_config.json")]
    pub config_file: PathBuf,

    /// 停止时导出报告的目录
    #[arg(short, long, env = "REPORT_DIR", default_value = ".")]
    pub report_dir: PathBuf,

    /// 最多保留的采样条数
    #[arg(short, long, env = "MAX_SAMPLES", default_value_t = 1000)]
    pub max_samples: usize,

    /// 启动后立即监控的进程名
    #[arg(long, env = "PROCESS_NAME")]
    pub process: Option<String>,

    /// 采样间隔 (毫秒)，与 --process 一起使用，缺省取配置文件中的值
    #[arg(short, long, env = "INTERVAL_MS")]
    pub interval: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = CommandArgs::parse_from(["process-monitor"]);
        assert_eq!(args.port, 9999);
        assert_eq!(args.max_samples, 1000);
        assert_eq!(args.config_file, PathBuf::from("process_monitor_config.json"));
        assert!(args.process.is_none());
    }

    #[test]
    fn test_autostart_args() {
        let args = CommandArgs::parse_from([
            "process-monitor",
            "--process",
            "nginx",
            "-i",
            "250",
        ]);
        assert_eq!(args.process.as_deref(), Some("nginx"));
        assert_eq!(args.interval.as_deref(), Some("250"));
    }
}
