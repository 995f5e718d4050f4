// Error types for Executor module

use crate::executor::types::{Output, Stream};
use thiserror::Error;

/// Executor error types
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("exit status {code}")]
    ExitStatus { code: i32, output: Output },

    #[error("signal: {}", signal_name(.signal))]
    Signal { signal: i32, output: Output },

    #[error("Failed to capture {stream} of '{program}': {source}")]
    Capture {
        program: String,
        stream: Stream,
        source: std::io::Error,
        output: Output,
    },

    #[error("Failed to wait for '{program}': {source}")]
    Wait {
        program: String,
        source: std::io::Error,
        output: Output,
    },

    #[error("Invalid environment entry '{0}', expected KEY=VALUE")]
    InvalidEnvEntry(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl ExecutorError {
    /// Output captured before the failure, if the child got far enough to produce any
    pub fn output(&self) -> Option<&Output> {
        match self {
            Self::ExitStatus { output, .. }
            | Self::Signal { output, .. }
            | Self::Capture { output, .. }
            | Self::Wait { output, .. } => Some(output),
            _ => None,
        }
    }

    /// Exit code reported by the child, when it exited normally
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::ExitStatus { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Name of a terminating signal, falling back to its number
fn signal_name(signal: &i32) -> String {
    let name = match signal {
        1 => "hangup",
        2 => "interrupt",
        3 => "quit",
        4 => "illegal instruction",
        6 => "aborted",
        8 => "floating point exception",
        9 => "killed",
        11 => "segmentation fault",
        13 => "broken pipe",
        14 => "alarm clock",
        15 => "terminated",
        other => return other.to_string(),
    };
    name.to_string()
}

pub type Result<T> = std::result::Result<T, ExecutorError>;
