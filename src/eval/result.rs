use std::fmt;
use std::io::BufRead;

use crate::error::{Error, Result};

/// 一次增量包构建的大小结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeltaResult {
    pub package_name: String,
    pub full_size: u64,
    pub delta_size: u64,
}

impl DeltaResult {
    pub fn new(package_name: impl Into<String>, full_size: u64, delta_size: u64) -> Self {
        Self {
            package_name: package_name.into(),
            full_size,
            delta_size,
        }
    }

    /// 解析结果日志中的一行: `包名 完整大小 增量大小`
    pub fn parse_line(line: &str, line_no: usize) -> Result<Self> {
        let malformed = |reason: String| Error::MalformedResult {
            line: line_no,
            reason,
        };

        let fields: Vec<&str> = line.split_whitespace().collect();
        let [name, full, delta] = fields.as_slice() else {
            return Err(malformed(format!(
                "需要 3 个字段, 实际 {} 个",
                fields.len()
            )));
        };

        let full_size: u64 = full
            .parse()
            .map_err(|_| malformed(format!("无效的完整包大小: {}", full)))?;
        let delta_size: u64 = delta
            .parse()
            .map_err(|_| malformed(format!("无效的增量包大小: {}", delta)))?;
        if full_size == 0 {
            return Err(malformed(format!("{} 的完整包大小为 0", name)));
        }

        Ok(Self::new(*name, full_size, delta_size))
    }
}

impl fmt::Display for DeltaResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.package_name, self.full_size, self.delta_size)
    }
}

/// 逐行读取结果日志，跳过空行
///
/// 读取失败会原样返回 IO 错误；格式错误或非 UTF-8 的行返回
/// `MalformedResult`，由调用方决定跳过还是中止。
pub fn read_result_log<R: BufRead>(reader: R) -> impl Iterator<Item = Result<DeltaResult>> {
    reader
        .split(b'\n')
        .enumerate()
        .filter_map(|(index, line)| {
            let line_no = index + 1;
            let bytes = match line {
                Ok(bytes) => bytes,
                Err(e) => return Some(Err(Error::Io(e))),
            };
            let line = match String::from_utf8(bytes) {
                Ok(line) => line,
                Err(_) => {
                    return Some(Err(Error::MalformedResult {
                        line: line_no,
                        reason: "不是有效的 UTF-8".to_string(),
                    }));
                }
            };
            if line.trim().is_empty() {
                return None;
            }
            Some(DeltaResult::parse_line(&line, line_no))
        })
}
