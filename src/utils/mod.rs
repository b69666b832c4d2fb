mod fs;
mod hash;
mod size;

pub use fs::file_size;
pub use hash::compute_file_hash;
pub use size::format_size;
