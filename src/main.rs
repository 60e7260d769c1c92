// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_ledger::config::LogSwitch;
use client_ledger::{
    export_clients, format_currency, format_date, format_optional_currency, load_from_config,
    search, Client, ClientQuery, Config, LoadReport, Loaded, PageMarker, PageNav,
};
use std::path::PathBuf;
use tokio::runtime::Runtime;

/// Shown when no source could be loaded; details are in the log
const LOAD_FAILED: &str = "❌ Could not load client data. Check your connection and try again.";

#[derive(Parser)]
#[command(name = "client-ledger", version, about = "Browse and search client, account and branch sheets")]
struct Cli {
    /// TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Read clientes.csv, contas.csv and agencias.csv from this directory
    #[arg(long, global = true)]
    source_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive list and detail view (default)
    Browse,

    /// Search clients by name or CPF/CNPJ and print one page
    Search {
        #[arg(default_value = "")]
        term: String,

        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    /// Print one client with its accounts and branch
    Show { id: String },

    /// Write every client matching a search to CSV
    Export {
        #[arg(default_value = "")]
        term: String,

        #[arg(long, short)]
        output: PathBuf,
    },

    /// Load all sources and report rows, warnings and failures
    Check,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load_or_default(cli.config.as_deref())?;
    if let Some(dir) = &cli.source_dir {
        config = config.with_source_dir(dir);
    }
    let log = config.log.init();

    let rt = Runtime::new().context("Failed to start async runtime")?;

    match cli.command.unwrap_or(Command::Browse) {
        Command::Browse => run_ui_mode(&rt, &config, &log)?,
        Command::Search { term, page } => {
            let loaded = load_or_exit(&rt, &config);
            run_search(&loaded, &config, &term, page);
        }
        Command::Show { id } => {
            let loaded = load_or_exit(&rt, &config);
            run_show(&loaded, &id);
        }
        Command::Export { term, output } => {
            let loaded = load_or_exit(&rt, &config);
            run_export(&loaded, &term, output)?;
        }
        Command::Check => {
            let loaded = load_or_exit(&rt, &config);
            print_report(&loaded.report);
        }
    }

    Ok(())
}

fn load_or_exit(rt: &Runtime, config: &Config) -> Loaded {
    match rt.block_on(load_from_config(config)) {
        Ok(loaded) => loaded,
        Err(_) => {
            eprintln!("{}", LOAD_FAILED);
            std::process::exit(1);
        }
    }
}

fn run_search(loaded: &Loaded, config: &Config, term: &str, page: usize) {
    let clients = &loaded.dataset.clients;
    let mut query = ClientQuery::new().with_page_size(config.query.page_size);
    query.set_term(term);
    query.set_page(page, clients);

    let result = query.run(clients);

    if result.is_empty() {
        println!("🔍 No clients match \"{}\"", term.trim());
        return;
    }

    println!("🔍 {} clients found", result.total_items);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("{:<8} {:<32} {:<20} {:>16}", "ID", "Name", "CPF/CNPJ", "Net worth");
    for client in &result.items {
        println!(
            "{:<8} {:<32} {:<20} {:>16}",
            client.id,
            client.display_name(),
            client.tax_id.formatted(),
            format_currency(client.net_worth)
        );
    }

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    match query.navigation(clients) {
        Some(nav) => println!("📄 {}", nav_line(&nav)),
        None => println!("📄 Page 1 of 1"),
    }
}

fn nav_line(nav: &PageNav) -> String {
    let mut parts = vec![if nav.has_previous { "«" } else { " " }.to_string()];
    for marker in &nav.markers {
        parts.push(match marker {
            PageMarker::Page(n) if *n == nav.current => format!("[{}]", n),
            PageMarker::Page(n) => n.to_string(),
            PageMarker::Ellipsis => "…".to_string(),
        });
    }
    parts.push(if nav.has_next { "»" } else { " " }.to_string());
    parts.join(" ")
}

fn run_show(loaded: &Loaded, id: &str) {
    let Some(detail) = loaded.dataset.detail(id) else {
        eprintln!("❌ No client with id {}", id);
        std::process::exit(1);
    };
    let client: &Client = detail.client;

    println!("👤 {}", client.display_name());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("   Name:           {}", client.name);
    if let Some(social_name) = &client.social_name {
        println!("   Social name:    {}", social_name);
    }
    println!("   {:<16}{}", format!("{}:", client.tax_id.kind().label()), client.tax_id.formatted());
    if let Some(national_id) = &client.national_id {
        println!("   RG:             {}", national_id);
    }
    println!("   Born:           {}", format_date(client.birth_date));
    println!("   Email:          {}", client.email);
    println!("   Address:        {}", client.address);
    println!("   Marital status: {}", client.marital_status.as_str());

    println!("\n💰 Finances");
    println!("   Annual income:  {}", format_currency(client.annual_income));
    println!("   Net worth:      {}", format_currency(client.net_worth));

    println!("\n💳 Accounts");
    if detail.accounts.is_empty() {
        println!("   No accounts found for this client.");
    }
    for account in &detail.accounts {
        let flag = if account.is_overdrawn() { "  ⚠️  overdrawn" } else { "" };
        println!("   {} ({}){}", account.kind.title(), account.id, flag);
        println!("     Balance:          {}", format_currency(account.balance));
        println!("     Credit limit:     {}", format_currency(account.credit_limit));
        println!("     Available credit: {}", format_currency(account.available_credit));
        println!("     Credit used:      {}", format_optional_currency(account.credit_used()));
    }
    if detail.accounts.len() > 1 {
        println!("   Total balance:    {}", format_optional_currency(detail.total_balance()));
        println!("   Total available:  {}", format_optional_currency(detail.total_available_credit()));
    }

    println!("\n🏦 Branch");
    match detail.branch {
        Some(branch) => {
            println!("   {} - {}", branch.code, branch.name);
            println!("   {}", branch.address);
        }
        None => println!("   Branch information not found."),
    }
}

fn run_export(loaded: &Loaded, term: &str, output: PathBuf) -> Result<()> {
    let matches = search(&loaded.dataset.clients, term);

    println!("📤 Exporting {} clients...", matches.len());
    let written = export_clients(&output, &matches)?;
    println!("✓ Wrote {} rows to {}", written, output.display());

    Ok(())
}

fn print_report(report: &LoadReport) {
    println!("🔍 Source check");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    for kind in &report.kinds {
        match &kind.failure {
            Some(message) => {
                println!("❌ {:<9} {}", kind.kind.name(), kind.location);
                println!("   {}", message);
            }
            None => {
                println!("✓ {:<9} {} rows, {} warnings", kind.kind.name(), kind.rows, kind.warnings.len());
                println!("   {}", kind.location);
                for row in kind.warnings.iter().take(10) {
                    println!("   ⚠️  line {}: {}", row.line_number, row.warning);
                }
                if kind.warnings.len() > 10 {
                    println!("   … and {} more", kind.warnings.len() - 10);
                }
            }
        }
    }
}

#[cfg(feature = "tui")]
fn run_ui_mode(rt: &Runtime, config: &Config, log: &LogSwitch) -> Result<()> {
    println!("🖥️  Loading Client Ledger UI...\n");

    let page_size = config.query.page_size;
    let mut app = match rt.block_on(load_from_config(config)) {
        Ok(loaded) => {
            println!("✓ Loaded {} clients\n", loaded.dataset.clients.len());
            ui::App::from_loaded(loaded, page_size)
        }
        Err(_) => ui::App::failed(page_size),
    };

    log.mute();
    let result = ui::run_ui(&mut app, || rt.block_on(load_from_config(config)));
    log.unmute();
    result?;

    println!("\n✅ UI closed successfully");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_rt: &Runtime, _config: &Config, _log: &LogSwitch) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the CLI: client-ledger search <term>");
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use client_ledger::page_navigation;

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["client-ledger", "search", "ana", "--page", "2"]).unwrap();
        match cli.command {
            Some(Command::Search { term, page }) => {
                assert_eq!(term, "ana");
                assert_eq!(page, 2);
            }
            _ => panic!("expected search"),
        }

        let cli = Cli::try_parse_from(["client-ledger", "--source-dir", "data"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.source_dir, Some(PathBuf::from("data")));
    }

    #[test]
    fn test_nav_line() {
        let nav = page_navigation(5, 10).unwrap();
        assert_eq!(nav_line(&nav), "« 1 … 4 [5] 6 … 10 »");

        let first = page_navigation(1, 2).unwrap();
        assert_eq!(nav_line(&first), "  [1] 2 »");
    }
}
