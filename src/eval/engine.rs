use std::io::BufRead;
use tracing::warn;

use super::histogram::SizeHistogram;
use super::result::{DeltaResult, read_result_log};
use crate::config::{EvaluateConfig, OnMalformed};
use crate::error::{Error, Result};

/// 增量包接受策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcceptancePolicy {
    pub threshold_percent: u64,
    pub bucket_width: u64,
    pub on_malformed: OnMalformed,
}

impl Default for AcceptancePolicy {
    fn default() -> Self {
        Self::from(&EvaluateConfig::default())
    }
}

impl From<&EvaluateConfig> for AcceptancePolicy {
    fn from(config: &EvaluateConfig) -> Self {
        Self {
            threshold_percent: config.threshold_percent,
            bucket_width: config.bucket_width,
            on_malformed: config.on_malformed,
        }
    }
}

impl AcceptancePolicy {
    /// `delta <= threshold% * full`，用整数运算避免浮点误差
    pub fn accepts(&self, full_size: u64, delta_size: u64) -> bool {
        u128::from(delta_size) * 100 <= u128::from(self.threshold_percent) * u128::from(full_size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Reject,
}

impl Verdict {
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Accept => "Accept",
            Verdict::Reject => "Reject",
        }
    }
}

/// 单条结果的评估
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub result: DeltaResult,
    pub verdict: Verdict,
    pub ratio: f64,
}

/// 一批结果的汇总统计
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateReport {
    pub accepted_delta_bytes: u128,
    pub accepted_full_bytes: u128,
    /// 被拒绝的增量包按完整包大小计入
    pub rejected_bytes: u128,
    pub accepted: u64,
    pub rejected: u64,
    pub histogram: SizeHistogram,
    pub evaluations: Vec<Evaluation>,
    pub malformed: Vec<String>,
}

impl AggregateReport {
    pub fn new(bucket_width: u64) -> Self {
        Self {
            accepted_delta_bytes: 0,
            accepted_full_bytes: 0,
            rejected_bytes: 0,
            accepted: 0,
            rejected: 0,
            histogram: SizeHistogram::new(bucket_width),
            evaluations: Vec::new(),
            malformed: Vec::new(),
        }
    }

    fn with_evaluation(mut self, evaluation: Evaluation, ratio_percent: u64) -> Self {
        let result = &evaluation.result;
        match evaluation.verdict {
            Verdict::Accept => {
                self.accepted_delta_bytes += u128::from(result.delta_size);
                self.accepted_full_bytes += u128::from(result.full_size);
                self.accepted += 1;
            }
            Verdict::Reject => {
                self.rejected_bytes += u128::from(result.full_size);
                self.rejected += 1;
            }
        }
        self.histogram.record(ratio_percent);
        self.evaluations.push(evaluation);
        self
    }

    fn with_malformed(mut self, reason: String) -> Self {
        self.malformed.push(reason);
        self
    }

    /// 使用增量包升级所需的总下载量
    pub fn upgrade_via_deltas(&self) -> u128 {
        self.accepted_delta_bytes + self.rejected_bytes
    }

    /// 全部下载完整包所需的总下载量
    pub fn upgrade_via_full(&self) -> u128 {
        self.accepted_full_bytes + self.rejected_bytes
    }

    /// 被接受的增量包的平均压缩比，没有被接受的增量包时为 `None`
    pub fn average_accepted_ratio(&self) -> Option<f64> {
        ratio(self.accepted_delta_bytes, self.accepted_full_bytes)
    }

    pub fn average_total_ratio(&self) -> Option<f64> {
        ratio(self.upgrade_via_deltas(), self.upgrade_via_full())
    }

    pub fn evaluated(&self) -> u64 {
        self.accepted + self.rejected
    }
}

fn ratio(numerator: u128, denominator: u128) -> Option<f64> {
    (denominator != 0).then(|| numerator as f64 / denominator as f64)
}

/// 按接受策略评估构建结果
#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator {
    policy: AcceptancePolicy,
}

impl Evaluator {
    pub fn new(policy: AcceptancePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &AcceptancePolicy {
        &self.policy
    }

    pub fn evaluate<I>(&self, results: I) -> Result<AggregateReport>
    where
        I: IntoIterator<Item = DeltaResult>,
    {
        self.fold(
            results
                .into_iter()
                .enumerate()
                .map(|(index, result)| check(result, index + 1)),
        )
    }

    /// 评估 `包名 完整大小 增量大小` 格式的结果日志
    pub fn evaluate_log<R: BufRead>(&self, reader: R) -> Result<AggregateReport> {
        self.fold(read_result_log(reader))
    }

    fn fold<I>(&self, mut records: I) -> Result<AggregateReport>
    where
        I: Iterator<Item = Result<DeltaResult>>,
    {
        let initial = AggregateReport::new(self.policy.bucket_width);

        records.try_fold(initial, |report, record| match record {
            Ok(result) => {
                let (evaluation, ratio_percent) = self.judge(result);
                Ok(report.with_evaluation(evaluation, ratio_percent))
            }
            Err(err @ Error::MalformedResult { .. }) => match self.policy.on_malformed {
                OnMalformed::Skip => {
                    warn!("跳过无效结果: {}", err);
                    Ok(report.with_malformed(err.to_string()))
                }
                OnMalformed::Abort => Err(err),
            },
            Err(err) => Err(err),
        })
    }

    fn judge(&self, result: DeltaResult) -> (Evaluation, u64) {
        let full = u128::from(result.full_size);
        let delta = u128::from(result.delta_size);
        let ratio_percent = u64::try_from(delta * 100 / full).unwrap_or(u64::MAX);

        let verdict = if self.policy.accepts(result.full_size, result.delta_size) {
            Verdict::Accept
        } else {
            Verdict::Reject
        };
        let ratio = 100.0 * result.delta_size as f64 / result.full_size as f64;

        (
            Evaluation {
                result,
                verdict,
                ratio,
            },
            ratio_percent,
        )
    }
}

fn check(result: DeltaResult, record_no: usize) -> Result<DeltaResult> {
    if result.full_size == 0 {
        return Err(Error::MalformedResult {
            line: record_no,
            reason: format!("{} 的完整包大小为 0", result.package_name),
        });
    }
    Ok(result)
}
