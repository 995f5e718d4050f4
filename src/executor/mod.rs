// Executor module - run external executables and capture their output

pub mod config;
pub mod error;
pub mod runner;
pub mod tee;
pub mod types;

pub use config::{ExecutorConfig, Profile};
pub use error::{ExecutorError, Result};
pub use runner::Executable;
pub use tee::Tee;
pub use types::{Options, Output, Stream, parse_env_entry};
