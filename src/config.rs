//! Server configuration.
//!
//! Configuration comes from two places: an optional YAML file named by the
//! `STATICD_CONFIG` environment variable, and the positional command line
//! `staticd [port] [root]`. Command-line values win over file values.

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 80;
pub const DEFAULT_ROOT: &str = ".";

/// Environment variable naming an optional YAML configuration file.
pub const CONFIG_ENV: &str = "STATICD_CONFIG";

pub const USAGE: &str = "Usage: staticd <port> <root>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Interface to bind, all interfaces by default
    pub host: String,
    pub port: u16,
    /// Document root with any trailing `/` removed
    pub root: String,
}

/// On-disk shape of the YAML file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    host: Option<String>,
    port: Option<u16>,
    root: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgsError {
    #[error("Invalid port: {0}")]
    InvalidPort(String),

    #[error("Port number out of range: {0}")]
    PortOutOfRange(i32),
}

/// What the command line asked for.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Help,
    Serve(CliArgs),
}

/// Values given on the command line. `None` means "not given".
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub port: Option<u16>,
    pub root: Option<String>,
}

/// Parses the arguments that follow the program name.
///
/// `--help` is only recognised in the first position. The root is only read
/// when a port precedes it.
pub fn parse_args<I, S>(args: I) -> Result<Command, ArgsError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut args = args.into_iter().map(Into::<String>::into);

    let Some(first) = args.next() else {
        return Ok(Command::Serve(CliArgs::default()));
    };

    if first == "--help" {
        return Ok(Command::Help);
    }

    let port = parse_port(&first)?;
    let root = args.next();

    Ok(Command::Serve(CliArgs {
        port: Some(port),
        root,
    }))
}

/// Anything that is not a 32-bit integer is an invalid port; a 32-bit integer
/// outside 0-65535 is out of range.
fn parse_port(arg: &str) -> Result<u16, ArgsError> {
    let value: i32 = arg
        .parse()
        .map_err(|_| ArgsError::InvalidPort(arg.to_string()))?;

    u16::try_from(value).map_err(|_| ArgsError::PortOutOfRange(value))
}

/// Strips one trailing `/` from a root. Request paths always start with `/`,
/// so `root + path` must not produce a double separator.
///
/// An empty root means the current directory; `/` becomes the empty string so
/// that `"" + "/index.html"` still names an absolute path.
pub fn normalize_root(root: &str) -> String {
    if root.is_empty() {
        return DEFAULT_ROOT.to_string();
    }

    root.strip_suffix('/').unwrap_or(root).to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_PORT, DEFAULT_ROOT)
    }
}

impl Config {
    pub fn new(host: impl Into<String>, port: u16, root: &str) -> Self {
        Self {
            host: host.into(),
            port,
            root: normalize_root(root),
        }
    }

    /// Builds a configuration from YAML text, filling absent keys with defaults.
    pub fn from_yaml_str(text: &str) -> anyhow::Result<Self> {
        let file: FileConfig =
            serde_yaml::from_str(text).context("Invalid configuration file")?;

        let defaults = Self::default();

        Ok(Self::new(
            file.host.unwrap_or(defaults.host),
            file.port.unwrap_or(defaults.port),
            file.root.as_deref().unwrap_or(&defaults.root),
        ))
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        Self::from_yaml_str(&text)
    }

    /// Overlays command-line values on top of this configuration.
    pub fn with_args(mut self, args: CliArgs) -> Self {
        if let Some(port) = args.port {
            self.port = port;
        }

        if let Some(root) = args.root {
            self.root = normalize_root(&root);
        }

        self
    }

    /// Loads the file named by `STATICD_CONFIG` (if set) and applies `args`.
    pub fn load(args: CliArgs) -> anyhow::Result<Self> {
        let base = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };

        Ok(base.with_args(args))
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
