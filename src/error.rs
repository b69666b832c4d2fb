use std::path::PathBuf;
use thiserror::Error;

use crate::config::MatchBy;
use crate::delta::DeltaJob;

#[derive(Error, Debug)]
pub enum Error {
    #[error("无法读取元数据索引 {path:?}: {reason}")]
    SourceUnavailable { path: PathBuf, reason: String },

    #[error(transparent)]
    Build(#[from] BuildFailure),

    #[error("第 {line} 行结果无效: {reason}")]
    MalformedResult { line: usize, reason: String },

    #[error("两个索引的匹配方式不一致: {baseline:?} / {target:?}")]
    IndexMismatch { baseline: MatchBy, target: MatchBy },

    #[error("配置错误: {0}")]
    Config(String),

    #[error("任务清单错误: {0}")]
    Plan(String),

    #[error("线程池创建失败: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),
}

/// 单个增量包构建失败，不影响同批次的其他任务
#[derive(Error, Debug, Clone)]
#[error("构建 {} 的增量包失败: {diagnostic}", .job.package_name)]
pub struct BuildFailure {
    pub job: DeltaJob,
    pub diagnostic: String,
}

impl BuildFailure {
    pub fn new(job: &DeltaJob, diagnostic: impl Into<String>) -> Self {
        Self {
            job: job.clone(),
            diagnostic: diagnostic.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
