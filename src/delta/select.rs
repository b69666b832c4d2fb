use tracing::{debug, info};

use super::job::DeltaJob;
use crate::error::{Error, Result};
use crate::index::MetadataIndex;

/// 比较两个索引，为版本发生变化的软件包生成增量任务
///
/// 只存在于目标索引中的软件包和版本相同的软件包都会被跳过。
/// 输出顺序与目标索引的键顺序一致。两个索引的匹配方式必须相同。
pub fn select(
    baseline: &MetadataIndex,
    target: &MetadataIndex,
    extension: &str,
) -> Result<Vec<DeltaJob>> {
    if baseline.match_by() != target.match_by() {
        return Err(Error::IndexMismatch {
            baseline: baseline.match_by(),
            target: target.match_by(),
        });
    }

    let mut jobs = Vec::new();
    let mut added = 0usize;

    for (key, target_record) in target.iter() {
        let Some(baseline_record) = baseline.get(key) else {
            added += 1;
            continue;
        };

        if baseline_record.version == target_record.version {
            continue;
        }

        debug!(
            "{}: {} -> {}",
            key, baseline_record.version, target_record.version
        );
        jobs.push(DeltaJob::new(baseline_record, target_record, extension));
    }

    info!(
        "共 {} 个软件包需要生成增量包 ({} 个新增包已跳过)",
        jobs.len(),
        added
    );
    Ok(jobs)
}
