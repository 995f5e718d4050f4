// Data types for Executor module

use crate::executor::error::{ExecutorError, Result};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fmt;
use std::io::Write;
use std::path::PathBuf;

/// Captured output of one invocation
///
/// The byte fields hold exactly what the child wrote, the same bytes any
/// caller writer received. The `String` fields are lossy UTF-8 views of them:
/// invalid sequences become U+FFFD.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    /// Everything the child wrote to stdout, decoded lossily
    pub stdout: String,
    /// Everything the child wrote to stderr, decoded lossily
    pub stderr: String,
    /// Raw stdout bytes
    #[serde(skip)]
    pub stdout_bytes: Vec<u8>,
    /// Raw stderr bytes
    #[serde(skip)]
    pub stderr_bytes: Vec<u8>,
}

impl Output {
    pub(crate) fn from_bytes(stdout_bytes: Vec<u8>, stderr_bytes: Vec<u8>) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&stdout_bytes).into_owned(),
            stderr: String::from_utf8_lossy(&stderr_bytes).into_owned(),
            stdout_bytes,
            stderr_bytes,
        }
    }

    /// Raw bytes of one stream
    pub fn bytes(&self, stream: Stream) -> &[u8] {
        match stream {
            Stream::Stdout => &self.stdout_bytes,
            Stream::Stderr => &self.stderr_bytes,
        }
    }
}

/// One of the child's output streams
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stream::Stdout => f.write_str("stdout"),
            Stream::Stderr => f.write_str("stderr"),
        }
    }
}

/// Options for a single invocation
///
/// Every field left at its default inherits from the calling process:
/// no `dir` keeps the current directory, an empty `env` keeps the whole
/// environment. A non-empty `env` replaces the environment, it is never merged.
#[derive(Default)]
pub struct Options<'a> {
    /// Working directory for the child
    pub dir: Option<PathBuf>,
    /// Complete environment for the child
    pub env: Vec<(OsString, OsString)>,
    /// Also receives everything the child writes to stdout
    pub stdout: Option<&'a mut (dyn Write + Send)>,
    /// Also receives everything the child writes to stderr
    pub stderr: Option<&'a mut (dyn Write + Send)>,
}

impl<'a> Options<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    pub fn env(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn envs<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<OsString>,
        V: Into<OsString>,
    {
        self.env
            .extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn stdout(mut self, writer: &'a mut (dyn Write + Send)) -> Self {
        self.stdout = Some(writer);
        self
    }

    pub fn stderr(mut self, writer: &'a mut (dyn Write + Send)) -> Self {
        self.stderr = Some(writer);
        self
    }

    /// Working directory to apply, treating an empty path as unset
    pub(crate) fn working_dir(&self) -> Option<&std::path::Path> {
        self.dir
            .as_deref()
            .filter(|dir| !dir.as_os_str().is_empty())
    }
}

impl fmt::Debug for Options<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("dir", &self.dir)
            .field("env", &self.env)
            .field("stdout", &self.stdout.is_some())
            .field("stderr", &self.stderr.is_some())
            .finish()
    }
}

/// Parse a `KEY=VALUE` environment entry, splitting on the first `=`
pub fn parse_env_entry(entry: &str) -> Result<(String, String)> {
    match entry.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(ExecutorError::InvalidEnvEntry(entry.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_entry_splits_on_first_equals() {
        let (key, value) = parse_env_entry("OPTS=a=b").unwrap();
        assert_eq!(key, "OPTS");
        assert_eq!(value, "a=b");
    }

    #[test]
    fn env_entry_allows_empty_value() {
        let (key, value) = parse_env_entry("EMPTY=").unwrap();
        assert_eq!(key, "EMPTY");
        assert!(value.is_empty());
    }

    #[test]
    fn env_entry_rejects_missing_key_or_separator() {
        assert!(matches!(
            parse_env_entry("NOVALUE"),
            Err(ExecutorError::InvalidEnvEntry(_))
        ));
        assert!(matches!(
            parse_env_entry("=value"),
            Err(ExecutorError::InvalidEnvEntry(_))
        ));
    }

    #[test]
    fn empty_dir_is_treated_as_inherit() {
        let options = Options::new().dir("");
        assert!(options.working_dir().is_none());

        let options = Options::new().dir("/tmp");
        assert_eq!(options.working_dir(), Some(std::path::Path::new("/tmp")));
    }

    #[test]
    fn output_keeps_raw_bytes_beside_lossy_text() {
        let output = Output::from_bytes(b"a\xffb".to_vec(), b"ok".to_vec());

        assert_eq!(output.bytes(Stream::Stdout), b"a\xffb");
        assert_eq!(output.stdout, "a\u{fffd}b");
        assert_eq!(output.bytes(Stream::Stderr), b"ok");
        assert_eq!(output.stderr, "ok");
    }

    #[test]
    fn builder_accumulates_env() {
        let options = Options::new()
            .env("A", "1")
            .envs([("B", "2"), ("C", "3")]);
        let keys: Vec<_> = options.env.iter().map(|(k, _)| k.clone()).collect();
        assert_eq!(keys, ["A", "B", "C"]);
    }
}
