//! Server configuration, loaded from TOML with serde defaults.
//!
//! Every field has a default so an empty file (or no file at all)
//! yields a runnable configuration:
//!
//! ```toml
//! listen_addr = "127.0.0.1:5177"
//! intermediate_dirs = ["obj"]
//!
//! [restore]
//! command = "dotnet"
//! args = ["restore"]
//!
//! [engine]
//! command = "feedback-host"
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "feedbackd.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address the RPC server listens on.
    pub listen_addr: String,
    /// Path segments that mark intermediate build output; diagnostics
    /// under them are filtered out of results.
    pub intermediate_dirs: Vec<String>,
    /// External dependency-restore command. The solution path is
    /// appended as the final argument.
    pub restore: CommandConfig,
    /// External compiler host. The solution path is appended as the
    /// final argument; the host prints the loaded-solution model as
    /// JSON on stdout.
    pub engine: CommandConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:5177".to_string(),
            intermediate_dirs: vec!["obj".to_string()],
            restore: CommandConfig {
                command: "dotnet".to_string(),
                args: vec!["restore".to_string()],
            },
            engine: CommandConfig {
                command: "feedback-host".to_string(),
                args: vec![],
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommandConfig {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl Config {
    /// Load from `path` when given; otherwise try the default path and
    /// fall back to built-in defaults if it does not exist. An explicit
    /// path that cannot be read is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::parse_file(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_PATH);
                if default.exists() {
                    Self::parse_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn parse_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }
}
