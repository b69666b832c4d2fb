use flate2::read::GzDecoder;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;
use xz2::read::XzDecoder;

use super::record::{PackageKey, PackageRecord};
use super::tagfile::{Paragraph, parse_paragraphs};
use crate::config::MatchBy;
use crate::error::{Error, Result};

/// 元数据索引加载器
///
/// 读取任何索引前都需要先通过 [`IndexLoader::init`] 得到该句柄，
/// 同一次比较的两个索引必须由同一个加载器产生。
#[derive(Debug, Clone, Copy)]
pub struct IndexLoader {
    match_by: MatchBy,
}

impl IndexLoader {
    pub fn init(match_by: MatchBy) -> Self {
        Self { match_by }
    }

    pub fn match_by(&self) -> MatchBy {
        self.match_by
    }

    /// 读取一个 Packages 文件 (支持 .gz / .xz 压缩)
    pub fn load(&self, path: &Path) -> Result<MetadataIndex> {
        let unavailable = |reason: String| Error::SourceUnavailable {
            path: path.to_path_buf(),
            reason,
        };

        let file = File::open(path).map_err(|e| unavailable(e.to_string()))?;
        let reader = open_decoder(path, file);
        let paragraphs = parse_paragraphs(reader).map_err(|e| unavailable(e.to_string()))?;

        let mut index = MetadataIndex::new(self.match_by);
        for (i, paragraph) in paragraphs.iter().enumerate() {
            let record = record_from_paragraph(paragraph)
                .map_err(|field| unavailable(format!("第 {} 个段落缺少字段 {}", i + 1, field)))?;
            index.insert(record);
        }

        debug!("已加载 {:?}: {} 个软件包", path, index.len());
        Ok(index)
    }

    /// 从内存中的记录构造索引
    pub fn from_records<I>(&self, records: I) -> MetadataIndex
    where
        I: IntoIterator<Item = PackageRecord>,
    {
        let mut index = MetadataIndex::new(self.match_by);
        for record in records {
            index.insert(record);
        }
        index
    }
}

fn open_decoder(path: &Path, file: File) -> Box<dyn BufRead> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("gz") => Box::new(BufReader::new(GzDecoder::new(file))),
        Some("xz") => Box::new(BufReader::new(XzDecoder::new(file))),
        _ => Box::new(BufReader::new(file)),
    }
}

fn record_from_paragraph(paragraph: &Paragraph) -> std::result::Result<PackageRecord, &'static str> {
    let field = |name: &'static str| paragraph.get(name).ok_or(name);

    Ok(PackageRecord {
        name: field("Package")?.to_string(),
        version: field("Version")?.to_string(),
        architecture: field("Architecture")?.to_string(),
        file_path: field("Filename")?.to_string(),
        size: paragraph.get("Size").and_then(|s| s.parse().ok()),
        sha256: paragraph.get("SHA256").map(str::to_string),
    })
}

/// 一个仓库快照的软件包列表，按键排序
#[derive(Debug, Clone)]
pub struct MetadataIndex {
    match_by: MatchBy,
    packages: BTreeMap<PackageKey, PackageRecord>,
}

impl MetadataIndex {
    pub fn new(match_by: MatchBy) -> Self {
        Self {
            match_by,
            packages: BTreeMap::new(),
        }
    }

    /// 插入记录，键重复时后者覆盖前者
    pub fn insert(&mut self, record: PackageRecord) -> Option<PackageRecord> {
        self.packages.insert(record.key(self.match_by), record)
    }

    pub fn get(&self, key: &PackageKey) -> Option<&PackageRecord> {
        self.packages.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PackageKey, &PackageRecord)> {
        self.packages.iter()
    }

    pub fn match_by(&self) -> MatchBy {
        self.match_by
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}
