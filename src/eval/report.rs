use std::io::{self, Write};

use super::engine::AggregateReport;
use crate::utils::format_size;

/// 输出逐条结果、汇总信息和直方图
pub fn render_report<W: Write>(report: &AggregateReport, out: &mut W) -> io::Result<()> {
    for evaluation in &report.evaluations {
        let result = &evaluation.result;
        writeln!(
            out,
            "{} {} {} {} {:.2}",
            evaluation.verdict.label(),
            result.package_name,
            result.full_size,
            result.delta_size,
            evaluation.ratio
        )?;
    }

    writeln!(out)?;
    writeln!(out, "Delta size {}", format_size(report.accepted_delta_bytes))?;
    writeln!(out, "Deb size {}", format_size(report.accepted_full_bytes))?;
    writeln!(out, "Upgrade size delta {}", format_size(report.upgrade_via_deltas()))?;
    writeln!(out, "Upgrade size deb {}", format_size(report.upgrade_via_full()))?;
    writeln!(out, "Average deltas {}", percent(report.average_accepted_ratio()))?;
    writeln!(out, "Average total {}", percent(report.average_total_ratio()))?;
    writeln!(out, "Reject {}", report.rejected)?;
    writeln!(out, "Accepted {}", report.accepted)?;
    if !report.malformed.is_empty() {
        writeln!(out, "Skipped {}", report.malformed.len())?;
    }

    for bucket in report.histogram.buckets() {
        writeln!(out, "{} to {},{}", bucket.low, bucket.high, bucket.count)?;
    }

    Ok(())
}

fn percent(ratio: Option<f64>) -> String {
    match ratio {
        Some(ratio) => format!("{:.2}", ratio * 100.0),
        None => "n/a".to_string(),
    }
}
