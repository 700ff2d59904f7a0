pub mod executor;
pub mod reporter;
pub mod types;

pub use executor::{DEFAULT_DELAY, RequestExecutor};
pub use reporter::Reporter;
pub use types::{ExecutionResult, ExecutionSummary};
