pub mod performance;
pub mod queue;

pub use performance::recompute;
pub use queue::{remove_request, Removed};
