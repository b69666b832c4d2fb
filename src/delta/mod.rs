mod dispatch;
mod job;
mod plan;
mod select;

pub use dispatch::{BatchOutcome, DeltaArtifact, Dispatcher};
pub use job::{DeltaJob, delta_output_path};
pub use plan::{Plan, PlanMetadata};
pub use select::select;
