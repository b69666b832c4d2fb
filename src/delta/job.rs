use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::index::PackageRecord;

/// 一个待构建的增量包
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeltaJob {
    pub package_name: String,
    pub baseline_version: String,
    pub target_version: String,
    pub architecture: String,
    pub baseline_path: PathBuf,
    pub target_path: PathBuf,
    pub output_path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline_sha256: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_sha256: Option<String>,
}

impl DeltaJob {
    pub fn new(baseline: &PackageRecord, target: &PackageRecord, extension: &str) -> Self {
        let target_path = PathBuf::from(&target.file_path);
        let output_path = delta_output_path(
            &target.name,
            &baseline.version,
            &target.version,
            &target.architecture,
            target_path.parent().unwrap_or(Path::new("")),
            extension,
        );

        Self {
            package_name: target.name.clone(),
            baseline_version: baseline.version.clone(),
            target_version: target.version.clone(),
            architecture: target.architecture.clone(),
            baseline_path: PathBuf::from(&baseline.file_path),
            target_path,
            output_path,
            baseline_sha256: baseline.sha256.clone(),
            target_sha256: target.sha256.clone(),
        }
    }
}

/// 增量包输出路径：与目标包同目录，文件名为
/// `{包名}_{旧版本}_{新版本}_{架构}.{扩展名}`
pub fn delta_output_path(
    package_name: &str,
    baseline_version: &str,
    target_version: &str,
    architecture: &str,
    target_dir: &Path,
    extension: &str,
) -> PathBuf {
    target_dir.join(format!(
        "{}_{}_{}_{}.{}",
        package_name, baseline_version, target_version, architecture, extension
    ))
}
