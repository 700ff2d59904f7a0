pub mod config;
pub mod materializer;
pub mod resolver;
pub mod types;

pub use config::{ConfigLoader, EnvError, EnvFileLocation};
pub use materializer::RequestMaterializer;
pub use resolver::VariableResolver;
pub use types::{ResolvedRequest, VariableConfig, VariableContext};
