mod aggregation;
mod target_resolver;

pub use aggregation::{aggregate, median};
pub use target_resolver::TargetResolver;
