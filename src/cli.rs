use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// 软件仓库增量包生成与评估工具
#[derive(Parser)]
#[command(name = "ddt")]
#[command(about = "软件仓库增量包生成与评估工具", long_about = None)]
#[command(version)]
pub struct Cli {
    /// 配置文件 (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// 日志级别 (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 比较两个 Packages 索引，列出需要生成增量包的软件包
    Select {
        /// 基线索引 (旧快照)
        #[arg(short, long)]
        baseline: PathBuf,
        /// 目标索引 (新快照)
        #[arg(short, long)]
        target: PathBuf,
        /// 输出任务清单路径，省略时打印到标准输出
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// 按任务清单构建增量包
    Build {
        /// 任务清单路径
        #[arg(short, long)]
        plan: PathBuf,
        /// 仓库根目录
        #[arg(short, long)]
        repo: PathBuf,
        /// 外部增量构建工具
        #[arg(long)]
        tool: Option<PathBuf>,
        /// 并行任务数
        #[arg(short, long)]
        workers: Option<usize>,
        /// 结果日志输出路径
        #[arg(long)]
        results: Option<PathBuf>,
        /// 构建前校验软件包的 SHA256
        #[arg(long)]
        verify: bool,
    },
    /// 评估结果日志
    Eval {
        /// 结果日志路径
        results: PathBuf,
        /// 增量包大小阈值 (百分比)
        #[arg(long)]
        threshold: Option<u64>,
    },
}
