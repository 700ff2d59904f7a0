pub mod error;
pub mod http;
pub mod logger;
pub mod parser;
pub mod runner;
pub mod utils;
pub mod variable;

// Re-export commonly used types
pub use error::{JhttpError, Result};
pub use parser::{ParsedFile, ParsedRequest, parse_content, parse_file};
pub use variable::{RequestMaterializer, ResolvedRequest, VariableResolver};
