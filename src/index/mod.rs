mod loader;
mod record;
mod tagfile;

pub use loader::{IndexLoader, MetadataIndex};
pub use record::{PackageKey, PackageRecord};
pub use tagfile::{Paragraph, parse_paragraphs};
