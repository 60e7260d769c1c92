// ⚙️ Configuration - where the sheets live, page size, server bind, log filter
//
// Every section has defaults, so an empty file (or no file) is a valid config.

use crate::dataset::RecordKind;
use crate::query::PAGE_SIZE;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

const SPREADSHEET: &str = "https://docs.google.com/spreadsheets/d/1PBN_HQOi5ZpKDd63mouxttFvvCwtmY97Tb5if5_cdBA";

/// Published CSV export of one sheet
pub fn published_sheet_url(kind: RecordKind) -> String {
    format!("{}/gviz/tq?tqx=out:csv&sheet={}", SPREADSHEET, kind.sheet())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub query: QueryConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    pub fn load(path: &Path) -> Result<Config> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config =
            toml::from_str(&content).with_context(|| "Failed to parse config file")?;

        if config.query.page_size == 0 {
            anyhow::bail!("query.page_size must be > 0");
        }

        Ok(config)
    }

    /// Load the file when one is given, otherwise use defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Config> {
        match path {
            Some(path) => Config::load(path),
            None => Ok(Config::default()),
        }
    }

    /// Builder: read all three sheets from a local directory
    pub fn with_source_dir(mut self, dir: &Path) -> Self {
        self.sources = SourcesConfig::from_dir(dir);
        self
    }
}

// ============================================================================
// SECTIONS
// ============================================================================

/// One location per record kind: an http(s) URL or a file path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcesConfig {
    #[serde(default = "default_clients")]
    pub clients: String,
    #[serde(default = "default_accounts")]
    pub accounts: String,
    #[serde(default = "default_branches")]
    pub branches: String,
}

fn default_clients() -> String {
    published_sheet_url(RecordKind::Client)
}
fn default_accounts() -> String {
    published_sheet_url(RecordKind::Account)
}
fn default_branches() -> String {
    published_sheet_url(RecordKind::Branch)
}

impl Default for SourcesConfig {
    fn default() -> Self {
        SourcesConfig {
            clients: default_clients(),
            accounts: default_accounts(),
            branches: default_branches(),
        }
    }
}

impl SourcesConfig {
    /// `clientes.csv`, `contas.csv` and `agencias.csv` inside `dir`
    pub fn from_dir(dir: &Path) -> Self {
        let path = |kind: RecordKind| -> String {
            let file: PathBuf = dir.join(kind.file_name());
            file.display().to_string()
        };

        SourcesConfig {
            clients: path(RecordKind::Client),
            accounts: path(RecordKind::Account),
            branches: path(RecordKind::Branch),
        }
    }

    pub fn location(&self, kind: RecordKind) -> &str {
        match kind {
            RecordKind::Client => &self.clients,
            RecordKind::Account => &self.accounts,
            RecordKind::Branch => &self.branches,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page_size() -> usize {
    PAGE_SIZE
}

impl Default for QueryConfig {
    fn default() -> Self {
        QueryConfig {
            page_size: default_page_size(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "0.0.0.0:3000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind: default_bind(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// EnvFilter directives, used when RUST_LOG is unset
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_filter() -> String {
    "client_ledger=info,ledger_server=info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            filter: default_filter(),
        }
    }
}

impl LogConfig {
    /// Install the global subscriber on stderr. If one is already installed it
    /// stays, and the returned switch controls nothing.
    pub fn init(&self) -> LogSwitch {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.filter))
            .unwrap_or_else(|_| EnvFilter::new(default_filter()));

        let switch = LogSwitch::default();
        let muted = Arc::clone(&switch.muted);
        let writer = move || -> Box<dyn io::Write> {
            if muted.load(Ordering::Relaxed) {
                Box::new(io::sink())
            } else {
                Box::new(io::stderr())
            }
        };

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(writer))
            .try_init();

        switch
    }
}

/// Silences log output while a full-screen UI owns the terminal
#[derive(Debug, Clone, Default)]
pub struct LogSwitch {
    muted: Arc<AtomicBool>,
}

impl LogSwitch {
    pub fn mute(&self) {
        self.muted.store(true, Ordering::Relaxed);
    }

    pub fn unmute(&self) {
        self.muted.store(false, Ordering::Relaxed);
    }

    pub fn is_muted(&self) -> bool {
        self.muted.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_point_at_published_sheets() {
        let config = Config::default();

        assert!(config.sources.clients.ends_with("sheet=clientes"));
        assert!(config.sources.accounts.ends_with("sheet=contas"));
        assert!(config.sources.branches.starts_with("https://docs.google.com/"));
        assert_eq!(config.query.page_size, 10);
        assert_eq!(config.server.bind, "0.0.0.0:3000");
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[sources]\nclients = \"data/clientes.csv\"\n\n[query]\npage_size = 25"
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.sources.clients, "data/clientes.csv");
        assert_eq!(config.sources.accounts, published_sheet_url(RecordKind::Account));
        assert_eq!(config.query.page_size, 25);
        assert_eq!(config.log.filter, "client_ledger=info,ledger_server=info");
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[query]\npage_size = 0").unwrap();

        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(Config::load(Path::new("/definitely/not/here.toml")).is_err());
        assert_eq!(Config::load_or_default(None).unwrap(), Config::default());
    }

    #[test]
    fn test_source_dir() {
        let config = Config::default().with_source_dir(Path::new("/data"));

        assert_eq!(
            config.sources.location(RecordKind::Branch),
            Path::new("/data").join("agencias.csv").display().to_string()
        );
        assert!(config.sources.location(RecordKind::Client).ends_with("clientes.csv"));
    }

    #[test]
    fn test_log_switch() {
        let switch = LogSwitch::default();
        assert!(!switch.is_muted());

        switch.mute();
        assert!(switch.clone().is_muted());
        switch.unmute();
        assert!(!switch.is_muted());
    }
}
