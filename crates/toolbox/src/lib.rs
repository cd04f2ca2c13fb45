//! toolbox: strategy dispatch and per-tool sessions.
//!
//! [`Converter`] maps a tool id to its strategy and runs it; media tools
//! go through a lazily loaded video engine. [`ToolSession`] is the state
//! behind one tool page.

pub mod config;
pub mod convert;
pub mod output;
pub mod session;

pub use config::{AppConfig, ConfigError};
pub use convert::Converter;
pub use output::default_output_path;
pub use session::ToolSession;
