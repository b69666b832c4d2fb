use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::MatchBy;

/// 元数据索引中的一个软件包条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRecord {
    pub name: String,
    pub version: String,
    pub architecture: String,
    /// 相对于仓库根目录的软件包路径
    pub file_path: String,
    pub size: Option<u64>,
    pub sha256: Option<String>,
}

impl PackageRecord {
    pub fn key(&self, match_by: MatchBy) -> PackageKey {
        let architecture = match match_by {
            MatchBy::Name => None,
            MatchBy::NameArch => Some(self.architecture.clone()),
        };
        PackageKey {
            name: self.name.clone(),
            architecture,
        }
    }
}

/// 索引键：包名，按需附带架构
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PackageKey {
    pub name: String,
    pub architecture: Option<String>,
}

impl PackageKey {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            architecture: None,
        }
    }

    pub fn name_arch(name: impl Into<String>, architecture: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            architecture: Some(architecture.into()),
        }
    }
}

impl fmt::Display for PackageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.architecture {
            Some(arch) => write!(f, "{}:{}", self.name, arch),
            None => f.write_str(&self.name),
        }
    }
}
