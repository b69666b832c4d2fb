use anyhow::Result;
use ddelta_tool::Error;
use ddelta_tool::config::OnMalformed;
use ddelta_tool::eval::{
    AcceptancePolicy, Bucket, DeltaResult, Evaluator, SizeHistogram, Verdict, render_report,
};
use ddelta_tool::utils::format_size;

fn results(entries: &[(&str, u64, u64)]) -> Vec<DeltaResult> {
    entries
        .iter()
        .map(|&(name, full, delta)| DeltaResult::new(name, full, delta))
        .collect()
}

#[test]
fn evaluate_accepts_small_deltas_and_rejects_large_ones() -> Result<()> {
    let report =
        Evaluator::default().evaluate(results(&[("pkgA", 1000, 400), ("pkgB", 1000, 600)]))?;

    assert_eq!(report.evaluations[0].verdict, Verdict::Accept);
    assert_eq!(report.evaluations[1].verdict, Verdict::Reject);
    assert_eq!(report.accepted_delta_bytes, 400);
    assert_eq!(report.accepted_full_bytes, 1000);
    assert_eq!(report.rejected_bytes, 1000);
    assert_eq!(report.accepted, 1);
    assert_eq!(report.rejected, 1);
    assert_eq!(report.upgrade_via_deltas(), 1400);
    assert_eq!(report.upgrade_via_full(), 2000);
    assert_eq!(report.average_accepted_ratio(), Some(0.4));
    assert_eq!(report.average_total_ratio(), Some(0.7));

    let buckets: Vec<Bucket> = report.histogram.buckets().collect();
    assert_eq!(
        buckets,
        vec![
            Bucket { low: 40, high: 45, count: 1 },
            Bucket { low: 60, high: 65, count: 1 },
        ]
    );
    Ok(())
}

#[test]
fn threshold_is_inclusive_at_half_size() -> Result<()> {
    let report = Evaluator::default().evaluate(results(&[("edge", 1000, 500), ("over", 1000, 501)]))?;

    assert_eq!(report.evaluations[0].verdict, Verdict::Accept);
    assert_eq!(report.evaluations[1].verdict, Verdict::Reject);
    Ok(())
}

#[test]
fn threshold_handles_odd_full_sizes_exactly() {
    let policy = AcceptancePolicy::default();

    // 0.5 * 1001 = 500.5
    assert!(policy.accepts(1001, 500));
    assert!(!policy.accepts(1001, 501));
    assert!(policy.accepts(u64::MAX, u64::MAX / 2));
}

#[test]
fn histogram_buckets_follow_floor_of_ratio() {
    let mut histogram = SizeHistogram::new(5);
    for ratio in [0, 4, 49, 50, 54, 130] {
        histogram.record(ratio);
    }

    assert_eq!(histogram.count_for(0), 2);
    assert_eq!(histogram.count_for(45), 1);
    assert_eq!(histogram.count_for(50), 2);
    assert_eq!(histogram.count_for(130), 1);
    assert_eq!(histogram.count_for(20), 0);
    assert_eq!(histogram.total(), 6);

    let lows: Vec<u64> = histogram.buckets().map(|b| b.low).collect();
    assert_eq!(lows, vec![0, 45, 50, 130]);
}

#[test]
fn totals_respect_invariants() -> Result<()> {
    let report = Evaluator::default().evaluate(results(&[
        ("a", 100, 0),
        ("b", 100, 50),
        ("c", 100, 99),
        ("d", 100, 250),
        ("e", 7, 3),
    ]))?;

    assert!(report.accepted_delta_bytes <= report.accepted_full_bytes);
    assert!(report.upgrade_via_deltas() <= report.upgrade_via_full());
    assert_eq!(report.histogram.total(), report.evaluated());
    assert_eq!(report.evaluated(), 5);
    Ok(())
}

#[test]
fn zero_full_size_is_skipped_by_default() -> Result<()> {
    let report = Evaluator::default().evaluate(results(&[("empty", 0, 10), ("ok", 100, 10)]))?;

    assert_eq!(report.evaluated(), 1);
    assert_eq!(report.malformed.len(), 1);
    assert!(report.malformed[0].contains("empty"));
    assert_eq!(report.histogram.total(), 1);
    Ok(())
}

#[test]
fn zero_full_size_aborts_when_configured() {
    let policy = AcceptancePolicy {
        on_malformed: OnMalformed::Abort,
        ..AcceptancePolicy::default()
    };

    let result = Evaluator::new(policy).evaluate(results(&[("ok", 100, 10), ("empty", 0, 10)]));

    assert!(matches!(result, Err(Error::MalformedResult { line: 2, .. })));
}

#[test]
fn evaluate_log_parses_whitespace_separated_records() -> Result<()> {
    let log = "pkgA 1000 400\n\npkgB\t1000   600\nbroken 12\npkgC abc 1\npkgD 0 5\n";

    let report = Evaluator::default().evaluate_log(log.as_bytes())?;

    assert_eq!(report.accepted, 1);
    assert_eq!(report.rejected, 1);
    assert_eq!(report.malformed.len(), 3);
    assert!(report.malformed[0].contains("第 4 行"));
    Ok(())
}

#[test]
fn evaluate_log_skips_lines_that_are_not_utf8() -> Result<()> {
    let log: &[u8] = b"pkgA 1000 400\npkg\xff 1000 600\npkgC 1000 100\n";

    let report = Evaluator::default().evaluate_log(log)?;

    assert_eq!(report.accepted, 2);
    assert_eq!(report.rejected, 0);
    assert_eq!(report.malformed.len(), 1);
    assert!(report.malformed[0].contains("第 2 行"));
    Ok(())
}

#[test]
fn evaluate_log_aborts_on_non_utf8_line_when_configured() {
    let policy = AcceptancePolicy {
        on_malformed: OnMalformed::Abort,
        ..AcceptancePolicy::default()
    };
    let log: &[u8] = b"pkgA 1000 400\npkg\xff 1000 600\n";

    let result = Evaluator::new(policy).evaluate_log(log);

    assert!(matches!(result, Err(Error::MalformedResult { line: 2, .. })));
}

#[test]
fn huge_ratio_lands_in_top_bucket_without_overflow() -> Result<()> {
    let report = Evaluator::default().evaluate(results(&[("big", 1, u64::MAX)]))?;

    assert_eq!(report.rejected, 1);
    let buckets: Vec<Bucket> = report.histogram.buckets().collect();
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].high, u64::MAX);
    assert!(buckets[0].low <= buckets[0].high);

    let mut out = Vec::new();
    render_report(&report, &mut out)?;
    let text = String::from_utf8(out)?;
    assert!(text.lines().any(|line| line.starts_with("Reject big 1 ")));
    Ok(())
}

#[test]
fn totals_do_not_overflow_for_huge_packages() -> Result<()> {
    let report = Evaluator::default().evaluate(results(&[
        ("a", u64::MAX, 1),
        ("b", u64::MAX, 1),
        ("c", u64::MAX, u64::MAX),
    ]))?;

    let max = u128::from(u64::MAX);
    assert_eq!(report.accepted_full_bytes, 2 * max);
    assert_eq!(report.accepted_delta_bytes, 2);
    assert_eq!(report.rejected_bytes, max);
    assert_eq!(report.upgrade_via_full(), 3 * max);
    assert!(report.upgrade_via_deltas() <= report.upgrade_via_full());

    let mut out = Vec::new();
    render_report(&report, &mut out)?;
    Ok(())
}

#[test]
fn configurable_threshold_and_bucket_width() -> Result<()> {
    let policy = AcceptancePolicy {
        threshold_percent: 70,
        bucket_width: 10,
        ..AcceptancePolicy::default()
    };

    let report = Evaluator::new(policy).evaluate(results(&[("pkgB", 1000, 600)]))?;

    assert_eq!(report.accepted, 1);
    let buckets: Vec<Bucket> = report.histogram.buckets().collect();
    assert_eq!(buckets, vec![Bucket { low: 60, high: 70, count: 1 }]);
    Ok(())
}

#[test]
fn render_report_prints_records_summary_and_histogram() -> Result<()> {
    let report =
        Evaluator::default().evaluate(results(&[("pkgA", 1000, 400), ("pkgB", 1000, 600)]))?;

    let mut out = Vec::new();
    render_report(&report, &mut out)?;
    let text = String::from_utf8(out)?;
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "Accept pkgA 1000 400 40.00");
    assert_eq!(lines[1], "Reject pkgB 1000 600 60.00");
    assert_eq!(lines[2], "");
    assert!(lines.contains(&"Upgrade size delta 1400"));
    assert!(lines.contains(&"Upgrade size deb 2000"));
    assert!(lines.contains(&"Average deltas 40.00"));
    assert!(lines.contains(&"Average total 70.00"));
    assert!(lines.contains(&"Reject 1"));
    assert!(lines.contains(&"Accepted 1"));
    assert_eq!(&lines[lines.len() - 2..], &["40 to 45,1", "60 to 65,1"]);
    Ok(())
}

#[test]
fn averages_are_undefined_without_accepted_deltas() -> Result<()> {
    let report = Evaluator::default().evaluate(Vec::new())?;

    assert_eq!(report.average_accepted_ratio(), None);
    assert_eq!(report.average_total_ratio(), None);
    assert!(report.histogram.is_empty());
    Ok(())
}

#[test]
fn format_size_uses_decimal_units() {
    assert_eq!(format_size(0), "0");
    assert_eq!(format_size(9999), "9999");
    assert_eq!(format_size(10_000), "10.0 k");
    assert_eq!(format_size(1_490_000), "1490 k");
    assert_eq!(format_size(25_600_000), "25.6 M");
}
