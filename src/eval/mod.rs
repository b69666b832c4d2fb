mod engine;
mod histogram;
mod report;
mod result;

pub use engine::{AcceptancePolicy, AggregateReport, Evaluation, Evaluator, Verdict};
pub use histogram::{Bucket, SizeHistogram};
pub use report::render_report;
pub use result::{DeltaResult, read_result_log};
