// Executor configuration

use crate::executor::error::Result;
use crate::executor::types::Options;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{Level, debug, warn};

/// Parse an environment variable, logging a warning if the value is present but invalid.
fn parse_env_var<T: std::str::FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(v) => match v.parse() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!(var = name, value = %v, "Invalid env var value, using default");
                default
            }
        },
        Err(_) => default,
    }
}

/// Executor configuration
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Maximum log level for the CLI subscriber
    pub log_level: Level,
    /// Forward child output to the terminal while it runs
    pub echo: bool,
    /// Profile applied when none is given on the command line
    pub profile_path: Option<PathBuf>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            log_level: Level::WARN,
            echo: true,
            profile_path: None,
        }
    }
}

impl ExecutorConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = ExecutorConfig::default();

        config.log_level = parse_env_var("TESTEXEC_LOG_LEVEL", config.log_level);
        config.echo = parse_env_var("TESTEXEC_ECHO", config.echo);
        config.profile_path = std::env::var_os("TESTEXEC_PROFILE")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        config
    }
}

/// Default invocation options stored in a TOML file
///
/// ```toml
/// dir = "fixtures/app"
///
/// [env]
/// HOME = "/tmp/home"
/// PATH = "/usr/bin:/bin"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Profile {
    /// Working directory for the child
    pub dir: Option<PathBuf>,
    /// Complete environment for the child, replacing the inherited one
    pub env: BTreeMap<String, String>,
}

impl Profile {
    /// Read a profile from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let profile = Self::parse(&content)?;
        debug!(
            path = %path.display(),
            dir = ?profile.dir,
            env_vars = profile.env.len(),
            "loaded profile"
        );
        Ok(profile)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Invocation options carrying this profile's dir and environment
    pub fn options<'a>(&self) -> Options<'a> {
        Options {
            dir: self.dir.clone(),
            env: self
                .env
                .iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            ..Options::default()
        }
    }
}
