use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::job::DeltaJob;
use crate::error::{Error, Result};

const PLAN_FORMAT_VERSION: &str = "1.0";

/// 任务清单元数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanMetadata {
    pub version: String,
    pub created_at: String,
    pub baseline: String,
    pub target: String,
}

impl PlanMetadata {
    pub fn new(baseline: &Path, target: &Path) -> Self {
        Self {
            version: PLAN_FORMAT_VERSION.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            baseline: baseline.display().to_string(),
            target: target.display().to_string(),
        }
    }
}

/// 由 `select` 生成、供 `build` 使用的任务清单
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub metadata: PlanMetadata,
    #[serde(default)]
    pub jobs: Vec<DeltaJob>,
}

impl Plan {
    pub fn new(metadata: PlanMetadata, jobs: Vec<DeltaJob>) -> Self {
        Self { metadata, jobs }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Plan(format!("无法序列化任务清单: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let plan: Plan = toml::from_str(&content)
            .map_err(|e| Error::Plan(format!("无法解析 {:?}: {}", path, e)))?;

        if plan.metadata.version != PLAN_FORMAT_VERSION {
            return Err(Error::Plan(format!(
                "不支持的任务清单版本: {}",
                plan.metadata.version
            )));
        }
        Ok(plan)
    }

    pub fn summary(&self) -> String {
        format!(
            "{} -> {}: {} 个增量任务",
            self.metadata.baseline,
            self.metadata.target,
            self.jobs.len()
        )
    }
}
