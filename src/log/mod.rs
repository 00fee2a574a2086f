//! Logging setup
//!
//! Installs a global `tracing` subscriber from a [`LogConfig`]. Records from
//! the `log` crate are forwarded into the same subscriber.
//!
//! ```no_run
//! use stdl::log::{LogConfig, init};
//!
//! init(&LogConfig::with_level("debug")).unwrap();
//! tracing::info!(user = "ada", "logged in");
//! log::warn!("also captured");
//! ```

mod format;

pub use format::{DEFAULT_FORMAT, LogLine, TemplateFormat, render};

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{Level, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Console,
    /// Append to a file, creating it and its parent directories.
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// Level or filter directives (`"debug"`, `"stdl=trace,info"`).
    /// When unset, `RUST_LOG` decides and falls back to `info`.
    pub level: Option<String>,
    pub output: LogOutput,
    /// Line template, see [`DEFAULT_FORMAT`].
    pub format: String,
    pub colors: bool,
    /// Emit JSON objects instead of the template.
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: None,
            output: LogOutput::Console,
            format: DEFAULT_FORMAT.to_string(),
            colors: true,
            json: false,
        }
    }
}

impl LogConfig {
    pub fn with_level(level: &str) -> Self {
        Self {
            level: Some(level.to_string()),
            ..Default::default()
        }
    }

    /// Read a `.toml`, `.yaml` or `.yml` config file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "toml" => crate::fs::toml_load(path),
            "yaml" | "yml" => crate::fs::yaml_load(path),
            _ => Err(Error::Logging(format!(
                "unsupported config file '{}': expected .toml, .yaml or .yml",
                path.display()
            ))),
        }
    }

    fn filter(&self) -> Result<EnvFilter> {
        match &self.level {
            Some(level) => EnvFilter::try_new(level)
                .map_err(|e| Error::Logging(format!("invalid level '{}': {}", level, e))),
            None => Ok(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))),
        }
    }
}

/// Parse a single level name, case-insensitively.
pub fn parse_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" | "warning" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(Error::Logging(format!(
            "invalid log level '{}'. Valid levels: trace, debug, info, warn, error",
            level
        ))),
    }
}

/// Build a subscriber for `config` that writes to `writer`.
pub fn subscriber<W>(config: &LogConfig, writer: W) -> Result<Box<dyn Subscriber + Send + Sync>>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let filter = config.filter()?;
    let layer = if config.json {
        fmt::layer().json().with_writer(writer).boxed()
    } else {
        fmt::layer()
            .event_format(TemplateFormat::new(&config.format, config.colors))
            .with_writer(writer)
            .boxed()
    };
    Ok(Box::new(tracing_subscriber::registry().with(filter).with(layer)))
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init(config: &LogConfig) -> Result<()> {
    let writer = match &config.output {
        LogOutput::Console => BoxMakeWriter::new(std::io::stderr),
        LogOutput::File(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let file = std::fs::OpenOptions::new().create(true).append(true).open(path)?;
            BoxMakeWriter::new(Mutex::new(file))
        }
    };
    subscriber(config, writer)?
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Buffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn capture(config: &LogConfig, f: impl FnOnce()) -> String {
        let buffer = Buffer::default();
        let writer = buffer.clone();
        let sub = subscriber(config, move || writer.clone()).unwrap();
        tracing::subscriber::with_default(sub, f);
        buffer.contents()
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("trace").unwrap(), Level::TRACE);
        assert_eq!(parse_level("Debug").unwrap(), Level::DEBUG);
        assert_eq!(parse_level("INFO").unwrap(), Level::INFO);
        assert_eq!(parse_level("warning").unwrap(), Level::WARN);
        assert!(parse_level("loud").is_err());
    }

    #[test]
    fn test_template_output() {
        let config = LogConfig {
            level: Some("info".into()),
            colors: false,
            ..Default::default()
        };
        let out = capture(&config, || {
            tracing::info!(host = "db1", port = 5432, "connected");
            tracing::debug!("hidden");
        });
        let line = out.lines().next().unwrap();
        assert!(line.contains("[ INFO  ] stdl::log::tests:"));
        assert!(line.ends_with(" - connected host=db1, port=5432"));
        assert_eq!(out.lines().count(), 1);
    }

    #[test]
    fn test_json_output() {
        let config = LogConfig {
            level: Some("debug".into()),
            json: true,
            ..Default::default()
        };
        let out = capture(&config, || tracing::debug!(n = 3, "counted"));
        let value: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
        assert_eq!(value["level"], "DEBUG");
        assert_eq!(value["fields"]["message"], "counted");
        assert_eq!(value["fields"]["n"], 3);
    }

    #[test]
    fn test_invalid_level_rejected() {
        let config = LogConfig::with_level("stdl=notalevel");
        assert!(subscriber(&config, std::io::sink).is_err());
    }

    #[test]
    fn test_config_from_files() {
        let temp = tempdir().unwrap();

        let toml_path = temp.path().join("log.toml");
        std::fs::write(&toml_path, "level = \"debug\"\njson = true\n[output]\nfile = \"/tmp/app.log\"\n").unwrap();
        let config = LogConfig::from_path(&toml_path).unwrap();
        assert_eq!(config.level.as_deref(), Some("debug"));
        assert!(config.json);
        assert_eq!(config.output, LogOutput::File("/tmp/app.log".into()));
        assert_eq!(config.format, DEFAULT_FORMAT);

        let yaml_path = temp.path().join("log.yaml");
        std::fs::write(&yaml_path, "output: console\ncolors: false\n").unwrap();
        let config = LogConfig::from_path(&yaml_path).unwrap();
        assert_eq!(config.output, LogOutput::Console);
        assert!(!config.colors);
        assert_eq!(config.level, None);
    }

    #[test]
    fn test_config_rejects_unknown_keys() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("log.toml");
        std::fs::write(&path, "verbosity = 3\n").unwrap();
        assert!(LogConfig::from_path(&path).is_err());
        assert!(LogConfig::from_path(&temp.path().join("log.ini")).is_err());
    }
}
