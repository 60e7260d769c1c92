// Client Ledger - Core Library
// Exposes all modules for use in CLI, TUI, API server, and tests

pub mod parser;      // Delimited-text parser
pub mod coerce;      // Text → typed values, with warnings
pub mod entities;    // Client, Account, Branch, TaxId
pub mod dataset;     // The three collections + join lookups
pub mod query;       // Search, paginate, page navigation
pub mod source;      // Concurrent fetch of the three sheets
pub mod format;      // pt-BR display formatting
pub mod export;      // CSV export
pub mod config;
pub mod error;

// Re-export commonly used types
pub use parser::{DelimitedParser, FieldMap, QuoteMode};
pub use coerce::{Coerced, FieldWarning, WarningKind};
pub use entities::{
    Account, AccountKind,
    Branch,
    Client, MaritalStatus,
    TaxId, TaxIdKind,
    FromFields,
};
pub use dataset::{Dataset, ClientDetail, RecordKind, accounts_for_client, branch_for_code};
pub use query::{
    ClientQuery, Page, PageMarker, PageNav,
    search, paginate, page_navigation, PAGE_SIZE,
};
pub use source::{
    TextSource, LocationSource, Location,
    LoadReport, KindReport, Loaded,
    load_dataset, load_from_config,
};
pub use format::{format_currency, format_date, format_optional_currency};
pub use export::{write_clients, export_clients};
pub use config::Config;
pub use error::{LoadError, SourceError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
