use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// 默认的增量包扩展名
pub const DEFAULT_DELTA_EXTENSION: &str = "δdeb";
/// 默认的外部增量构建工具
pub const DEFAULT_DELTA_TOOL: &str = "ddelta_generate";

/// 工具配置，对应 TOML 配置文件
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub select: SelectConfig,
    pub build: BuildConfig,
    pub evaluate: EvaluateConfig,
}

impl Config {
    /// 读取配置文件；未指定路径时使用默认值
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("无法读取 {:?}: {}", path, e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("无法解析 {:?}: {}", path, e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.evaluate.bucket_width == 0 {
            return Err(Error::Config("bucket_width 必须大于 0".to_string()));
        }
        if self.build.workers == Some(0) {
            return Err(Error::Config("workers 必须大于 0".to_string()));
        }
        if self.select.delta_extension.is_empty() {
            return Err(Error::Config("delta_extension 不能为空".to_string()));
        }
        Ok(())
    }
}

/// 索引匹配方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchBy {
    /// 只按包名匹配
    #[default]
    Name,
    /// 按 (包名, 架构) 匹配，适用于多架构仓库
    NameArch,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectConfig {
    pub match_by: MatchBy,
    pub delta_extension: String,
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            match_by: MatchBy::Name,
            delta_extension: DEFAULT_DELTA_EXTENSION.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub tool: PathBuf,
    /// 并行任务数，缺省时使用 CPU 核数
    pub workers: Option<usize>,
    pub verify_checksums: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            tool: PathBuf::from(DEFAULT_DELTA_TOOL),
            workers: None,
            verify_checksums: false,
        }
    }
}

/// 无效结果记录的处理方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OnMalformed {
    #[default]
    Skip,
    Abort,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluateConfig {
    /// 增量包大小不超过完整包的该百分比时接受
    pub threshold_percent: u64,
    /// 直方图每个区间的宽度 (百分点)
    pub bucket_width: u64,
    pub on_malformed: OnMalformed,
}

impl Default for EvaluateConfig {
    fn default() -> Self {
        Self {
            threshold_percent: 50,
            bucket_width: 5,
            on_malformed: OnMalformed::Skip,
        }
    }
}
