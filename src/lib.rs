//! # ddelta_tool
//!
//! 软件仓库增量包生成与评估工具库
//!
//! ## 功能
//!
//! - 比较两个仓库快照的 Packages 索引，找出版本变化的软件包
//! - 调用外部差分工具并行构建增量包，并记录大小结果
//! - 按大小阈值评估增量包是否值得分发，输出汇总统计和分布直方图
//!
//! ## 使用示例
//!
//! ```no_run
//! use ddelta_tool::config::MatchBy;
//! use ddelta_tool::delta::select;
//! use ddelta_tool::eval::{DeltaResult, Evaluator};
//! use ddelta_tool::index::IndexLoader;
//! use std::path::Path;
//!
//! let loader = IndexLoader::init(MatchBy::Name);
//! let baseline = loader.load(Path::new("dists/stable/main/binary-amd64/Packages.xz")).unwrap();
//! let target = loader.load(Path::new("dists/stable-updates/main/binary-amd64/Packages.xz")).unwrap();
//! let jobs = select(&baseline, &target, "δdeb").unwrap();
//!
//! let report = Evaluator::default()
//!     .evaluate(vec![DeltaResult::new("bash", 1000, 400)])
//!     .unwrap();
//! assert_eq!(report.accepted, 1);
//! # let _ = jobs;
//! ```

pub mod cli;
pub mod config;
pub mod delta;
pub mod error;
pub mod eval;
pub mod index;
pub mod utils;

// 重新导出常用类型
pub use delta::{DeltaArtifact, DeltaJob, Dispatcher, Plan, select};
pub use error::{BuildFailure, Error, Result};
pub use eval::{AggregateReport, DeltaResult, Evaluator};
pub use index::{IndexLoader, MetadataIndex, PackageRecord};
