//! Dependency reference resolution and project configuration

pub mod config;
pub mod resolver;

pub use config::{ConfigError, LayoutConfig, ProjectConfig, ResolverConfig, StrataConfig};
pub use resolver::Resolver;
