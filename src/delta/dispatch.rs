use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};

use super::job::DeltaJob;
use crate::error::{BuildFailure, Result};
use crate::eval::DeltaResult;
use crate::utils::{compute_file_hash, file_size};

/// 成功构建的增量包
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeltaArtifact {
    pub job: DeltaJob,
    pub path: PathBuf,
    pub full_size: u64,
    pub delta_size: u64,
}

impl DeltaArtifact {
    pub fn to_result(&self) -> DeltaResult {
        DeltaResult::new(&self.job.package_name, self.full_size, self.delta_size)
    }
}

/// 一批任务的执行结果
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub artifacts: Vec<DeltaArtifact>,
    pub failures: Vec<BuildFailure>,
}

impl BatchOutcome {
    /// 以 `包名 完整大小 增量大小` 的格式写出结果日志
    pub fn write_result_log<W: Write>(&self, writer: &mut W) -> Result<()> {
        for artifact in &self.artifacts {
            writeln!(writer, "{}", artifact.to_result())?;
        }
        Ok(())
    }

    pub fn summary(&self) -> String {
        format!(
            "成功: {} 个增量包, 失败: {} 个",
            self.artifacts.len(),
            self.failures.len()
        )
    }
}

/// 调用外部工具 `<tool> <旧包> <新包> <输出>` 构建增量包
#[derive(Debug, Clone)]
pub struct Dispatcher {
    tool: PathBuf,
    repo_root: PathBuf,
    workers: usize,
    verify_checksums: bool,
}

impl Dispatcher {
    pub fn new(tool: impl Into<PathBuf>, repo_root: impl Into<PathBuf>) -> Self {
        Self {
            tool: tool.into(),
            repo_root: repo_root.into(),
            workers: default_workers(),
            verify_checksums: false,
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_checksum_verification(mut self, enabled: bool) -> Self {
        self.verify_checksums = enabled;
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// 构建单个增量包
    pub fn dispatch(&self, job: &DeltaJob) -> std::result::Result<DeltaArtifact, BuildFailure> {
        let baseline = self.repo_root.join(&job.baseline_path);
        let target = self.repo_root.join(&job.target_path);
        let output = self.repo_root.join(&job.output_path);

        if self.verify_checksums {
            verify_checksum(job, &baseline, job.baseline_sha256.as_deref())?;
            verify_checksum(job, &target, job.target_sha256.as_deref())?;
        }

        debug!(
            "{} {} {} {}",
            self.tool.display(),
            baseline.display(),
            target.display(),
            output.display()
        );

        let result = Command::new(&self.tool)
            .arg(&baseline)
            .arg(&target)
            .arg(&output)
            .output()
            .map_err(|e| BuildFailure::new(job, format!("无法启动 {:?}: {}", self.tool, e)))?;

        if !result.status.success() {
            // 失败的构建可能留下不完整的输出
            let _ = fs::remove_file(&output);

            let stderr = String::from_utf8_lossy(&result.stderr).trim().to_string();
            let diagnostic = if stderr.is_empty() {
                format!("外部工具异常退出: {}", result.status)
            } else {
                stderr
            };
            return Err(BuildFailure::new(job, diagnostic));
        }

        let delta_size = file_size(&output)
            .map_err(|e| BuildFailure::new(job, format!("增量包未生成 {:?}: {}", output, e)))?;
        let full_size = file_size(&target)
            .map_err(|e| BuildFailure::new(job, format!("无法读取 {:?}: {}", target, e)))?;

        Ok(DeltaArtifact {
            job: job.clone(),
            path: output,
            full_size,
            delta_size,
        })
    }

    /// 并行构建全部任务，单个任务失败不影响其他任务
    pub fn dispatch_all(&self, jobs: &[DeltaJob]) -> Result<BatchOutcome> {
        let pool = ThreadPoolBuilder::new().num_threads(self.workers).build()?;
        info!("正在构建 {} 个增量包 ({} 个线程)...", jobs.len(), self.workers);

        let results: Vec<_> = pool.install(|| jobs.par_iter().map(|job| self.dispatch(job)).collect());

        let mut outcome = BatchOutcome::default();
        for result in results {
            match result {
                Ok(artifact) => {
                    info!(
                        "  + {} ({} / {} 字节)",
                        artifact.job.package_name, artifact.delta_size, artifact.full_size
                    );
                    outcome.artifacts.push(artifact);
                }
                Err(failure) => {
                    warn!("  ! {}", failure);
                    outcome.failures.push(failure);
                }
            }
        }

        Ok(outcome)
    }
}

fn verify_checksum(
    job: &DeltaJob,
    path: &Path,
    expected: Option<&str>,
) -> std::result::Result<(), BuildFailure> {
    let Some(expected) = expected else {
        return Ok(());
    };

    let actual = compute_file_hash(path)
        .map_err(|e| BuildFailure::new(job, format!("无法计算 {:?} 的校验和: {}", path, e)))?;
    if !actual.eq_ignore_ascii_case(expected) {
        return Err(BuildFailure::new(
            job,
            format!("{:?} 的校验和不匹配: 期望 {}, 实际 {}", path, expected, actual),
        ));
    }
    Ok(())
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
