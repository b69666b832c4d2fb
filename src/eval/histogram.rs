use std::collections::BTreeMap;

/// 直方图中的一个区间 `[low, high)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    pub low: u64,
    pub high: u64,
    pub count: u64,
}

/// 按固定宽度统计增量包/完整包大小比例的分布
///
/// 只保存出现过的区间；比例超过 100% 时区间向上无界扩展。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeHistogram {
    width: u64,
    buckets: BTreeMap<u64, u64>,
}

impl SizeHistogram {
    pub fn new(width: u64) -> Self {
        Self {
            width: width.max(1),
            buckets: BTreeMap::new(),
        }
    }

    pub fn record(&mut self, ratio_percent: u64) {
        *self.buckets.entry(ratio_percent / self.width).or_insert(0) += 1;
    }

    pub fn width(&self) -> u64 {
        self.width
    }

    /// 按区间升序返回
    pub fn buckets(&self) -> impl Iterator<Item = Bucket> + '_ {
        self.buckets.iter().map(|(&index, &count)| Bucket {
            low: index.saturating_mul(self.width),
            high: index.saturating_mul(self.width).saturating_add(self.width),
            count,
        })
    }

    pub fn count_for(&self, ratio_percent: u64) -> u64 {
        self.buckets
            .get(&(ratio_percent / self.width))
            .copied()
            .unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.buckets.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
