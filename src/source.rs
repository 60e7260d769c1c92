// 📡 Data Source Adapter - fetch three sheets concurrently, parse, coerce
//
// "One source failing never takes the others down"
//
// - Each kind is fetched in its own slot; results are combined after all settle
// - A failed kind becomes an empty collection plus a warn! line
// - Only when every kind fails does the caller see an error
// - No retry, no timeout, no partial refresh

use crate::coerce::FieldWarning;
use crate::config::{Config, SourcesConfig};
use crate::dataset::{coerce_rows, Dataset, RecordKind};
use crate::entities::{Account, Branch, Client, FromFields};
use crate::error::{LoadError, SourceError, SourceFailure};
use crate::parser::DelimitedParser;
use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use url::Url;

const BOM: char = '\u{feff}';

// ============================================================================
// TEXT SOURCE
// ============================================================================

/// TextSource - given a record kind, obtain its raw delimited text
#[async_trait]
pub trait TextSource: Send + Sync {
    async fn fetch(&self, kind: RecordKind) -> Result<String, SourceError>;

    /// Where the text for `kind` comes from, for logs and reports
    fn describe(&self, kind: RecordKind) -> String;
}

/// Location - a remote URL or a local file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Remote(Url),
    File(PathBuf),
}

impl Location {
    /// `http://` and `https://` are remote; anything else is a path
    pub fn parse(raw: &str) -> Location {
        let raw = raw.trim();
        match Url::parse(raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Location::Remote(url),
            _ => Location::File(PathBuf::from(raw)),
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::Remote(url) => write!(f, "{}", url),
            Location::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// LocationSource - the configured URLs / paths, one per kind
pub struct LocationSource {
    http: reqwest::Client,
    clients: Location,
    accounts: Location,
    branches: Location,
}

impl LocationSource {
    pub fn new(sources: &SourcesConfig) -> Self {
        LocationSource {
            http: reqwest::Client::new(),
            clients: Location::parse(&sources.clients),
            accounts: Location::parse(&sources.accounts),
            branches: Location::parse(&sources.branches),
        }
    }

    pub fn location(&self, kind: RecordKind) -> &Location {
        match kind {
            RecordKind::Client => &self.clients,
            RecordKind::Account => &self.accounts,
            RecordKind::Branch => &self.branches,
        }
    }

    async fn fetch_remote(&self, url: &Url) -> Result<String, SourceError> {
        let transport = |source: reqwest::Error| SourceError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self.http.get(url.clone()).send().await.map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(transport)?;
        decode_text(body.to_vec(), &url.to_string())
    }

    async fn fetch_file(&self, path: &Path) -> Result<String, SourceError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        decode_text(bytes, &path.display().to_string())
    }
}

#[async_trait]
impl TextSource for LocationSource {
    async fn fetch(&self, kind: RecordKind) -> Result<String, SourceError> {
        match self.location(kind) {
            Location::Remote(url) => self.fetch_remote(url).await,
            Location::File(path) => self.fetch_file(path).await,
        }
    }

    fn describe(&self, kind: RecordKind) -> String {
        self.location(kind).to_string()
    }
}

/// Strict UTF-8, no NUL bytes, leading BOM removed
pub fn decode_text(bytes: Vec<u8>, origin: &str) -> Result<String, SourceError> {
    let text = String::from_utf8(bytes).map_err(|e| SourceError::NotText {
        origin: origin.to_string(),
        reason: e.to_string(),
    })?;

    if text.contains('\0') {
        return Err(SourceError::NotText {
            origin: origin.to_string(),
            reason: "binary content".to_string(),
        });
    }

    Ok(match text.strip_prefix(BOM) {
        Some(rest) => rest.to_string(),
        None => text,
    })
}

// ============================================================================
// LOAD REPORT
// ============================================================================

/// A coercion warning with the source line it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowWarning {
    pub line_number: usize,
    pub warning: FieldWarning,
}

/// What happened to one record kind during a load
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KindReport {
    pub kind: RecordKind,
    pub location: String,
    pub rows: usize,
    pub warnings: Vec<RowWarning>,
    pub failure: Option<String>,
}

impl KindReport {
    pub fn is_ok(&self) -> bool {
        self.failure.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub kinds: Vec<KindReport>,
}

impl LoadReport {
    pub fn get(&self, kind: RecordKind) -> Option<&KindReport> {
        self.kinds.iter().find(|k| k.kind == kind)
    }

    pub fn failures(&self) -> Vec<SourceFailure> {
        self.kinds
            .iter()
            .filter_map(|k| {
                k.failure.as_ref().map(|message| SourceFailure {
                    kind: k.kind,
                    message: message.clone(),
                })
            })
            .collect()
    }

    pub fn warning_count(&self) -> usize {
        self.kinds.iter().map(|k| k.warnings.len()).sum()
    }
}

/// Dataset plus how it was obtained
#[derive(Debug, Clone)]
pub struct Loaded {
    pub dataset: Dataset,
    pub report: LoadReport,
}

// ============================================================================
// LOADING
// ============================================================================

/// Fetch, parse and coerce one kind. A fetch failure yields an empty collection.
pub async fn load_collection<T: FromFields>(
    source: &dyn TextSource,
    parser: &DelimitedParser,
) -> (Vec<T>, KindReport) {
    let kind = T::KIND;
    let location = source.describe(kind);

    let text = match source.fetch(kind).await {
        Ok(text) => text,
        Err(e) => {
            warn!(kind = %kind, location = %location, error = %e, "fetch failed, using empty collection");
            let report = KindReport {
                kind,
                location,
                rows: 0,
                warnings: Vec::new(),
                failure: Some(e.to_string()),
            };
            return (Vec::new(), report);
        }
    };

    let rows = parser.parse(&text);
    let mut records = Vec::with_capacity(rows.len());
    let mut warnings = Vec::new();

    for (fields, coerced) in rows.iter().zip(coerce_rows::<T>(&rows)) {
        for warning in coerced.warnings {
            debug!(kind = %kind, line = fields.line_number, "{}", warning);
            warnings.push(RowWarning {
                line_number: fields.line_number,
                warning,
            });
        }
        records.push(coerced.value);
    }

    info!(
        kind = %kind,
        rows = records.len(),
        warnings = warnings.len(),
        "loaded {}",
        location
    );

    let report = KindReport {
        kind,
        location,
        rows: records.len(),
        warnings,
        failure: None,
    };
    (records, report)
}

/// Load all three kinds concurrently
///
/// Returns once every fetch has settled. Fails only if all three fetches failed.
pub async fn load_dataset(
    source: &dyn TextSource,
    parser: &DelimitedParser,
) -> Result<Loaded, LoadError> {
    let (
        (clients, client_report),
        (accounts, account_report),
        (branches, branch_report),
    ) = tokio::join!(
        load_collection::<Client>(source, parser),
        load_collection::<Account>(source, parser),
        load_collection::<Branch>(source, parser),
    );

    let report = LoadReport {
        kinds: vec![client_report, account_report, branch_report],
    };

    if report.kinds.iter().all(|k| !k.is_ok()) {
        return Err(LoadError::AllSourcesFailed {
            failures: report.failures(),
        });
    }

    Ok(Loaded {
        dataset: Dataset::new(clients, accounts, branches),
        report,
    })
}

/// Load from the configured locations with the default parser
pub async fn load_from_config(config: &Config) -> Result<Loaded, LoadError> {
    let source = LocationSource::new(&config.sources);
    load_dataset(&source, &DelimitedParser::new()).await
}

// ============================================================================
// TESTS
// ============================================================================
