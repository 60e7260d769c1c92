// Client Ledger - Web Server
// JSON API over the loaded sheets, with Axum

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use clap::Parser;
use client_ledger::{
    load_from_config, Branch, Client, ClientQuery, Config, Dataset, LoadReport, PageNav,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// The one message clients see when loading fails
const LOAD_FAILED: &str = "Could not load client data. Try reloading.";

#[derive(Parser)]
#[command(name = "ledger-server", about = "JSON API over the client, account and branch sheets")]
struct Args {
    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Read clientes.csv, contas.csv and agencias.csv from this directory
    #[arg(long)]
    source_dir: Option<PathBuf>,

    /// Overrides server.bind from the config
    #[arg(long)]
    bind: Option<String>,
}

/// Shared application state
///
/// Handlers clone the inner Arc and release the lock at once; a reload
/// swaps the whole dataset.
#[derive(Clone)]
struct AppState {
    dataset: Arc<RwLock<Arc<Dataset>>>,
    config: Arc<Config>,
}

impl AppState {
    fn new(dataset: Dataset, config: Config) -> Self {
        Self {
            dataset: Arc::new(RwLock::new(Arc::new(dataset))),
            config: Arc::new(config),
        }
    }

    async fn snapshot(&self) -> Arc<Dataset> {
        Arc::clone(&*self.dataset.read().await)
    }
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// GET /api/clients query string
#[derive(Debug, Deserialize)]
struct ClientsParams {
    #[serde(default)]
    search: String,
    #[serde(default = "first_page")]
    page: usize,
}

fn first_page() -> usize {
    1
}

/// Client row as shown in the list
#[derive(Serialize)]
struct ClientSummary {
    id: String,
    name: String,
    tax_id: String,
    email: String,
    net_worth: Decimal,
}

impl From<&Client> for ClientSummary {
    fn from(client: &Client) -> Self {
        Self {
            id: client.id.clone(),
            name: client.display_name().to_string(),
            tax_id: client.tax_id.formatted(),
            email: client.email.clone(),
            net_worth: client.net_worth,
        }
    }
}

#[derive(Serialize)]
struct ClientsPage {
    items: Vec<ClientSummary>,
    page: usize,
    page_size: usize,
    total_pages: usize,
    total_items: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    navigation: Option<PageNav>,
}

#[derive(Serialize)]
struct ReloadResponse {
    clients: usize,
    accounts: usize,
    branches: usize,
    report: LoadReport,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/clients?search=&page= - Search, then one page (clamped into range)
async fn list_clients(
    State(state): State<AppState>,
    Query(params): Query<ClientsParams>,
) -> impl IntoResponse {
    let data = state.snapshot().await;

    let mut query = ClientQuery::new().with_page_size(state.config.query.page_size);
    query.set_term(params.search);
    query.set_page(params.page, &data.clients);
    let page = query.run(&data.clients);

    let response = ClientsPage {
        navigation: query.navigation(&data.clients),
        page: page.page,
        page_size: page.page_size,
        total_pages: page.total_pages,
        total_items: page.total_items,
        items: page.items.into_iter().map(ClientSummary::from).collect(),
    };

    Json(ApiResponse::ok(response))
}

/// GET /api/clients/:id - Client with accounts and branch
async fn get_client(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let data = state.snapshot().await;

    match data.detail(&id) {
        Some(detail) => (StatusCode::OK, Json(ApiResponse::ok(detail))).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<()>::err(format!("No client with id {}", id))),
        )
            .into_response(),
    }
}

/// GET /api/branches - All branches
async fn list_branches(State(state): State<AppState>) -> impl IntoResponse {
    let data = state.snapshot().await;
    let branches: Vec<Branch> = data.branches.clone();

    Json(ApiResponse::ok(branches))
}

/// POST /api/reload - Fetch all three sheets again and swap the dataset
async fn reload(State(state): State<AppState>) -> Response {
    match load_from_config(&state.config).await {
        Ok(loaded) => {
            let response = ReloadResponse {
                clients: loaded.dataset.clients.len(),
                accounts: loaded.dataset.accounts.len(),
                branches: loaded.dataset.branches.len(),
                report: loaded.report,
            };
            *state.dataset.write().await = Arc::new(loaded.dataset);
            info!(clients = response.clients, "dataset reloaded");

            (StatusCode::OK, Json(ApiResponse::ok(response))).into_response()
        }
        Err(e) => {
            warn!(error = %e, "reload failed, keeping previous dataset");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse::<()>::err(LOAD_FAILED)),
            )
                .into_response()
        }
    }
}

fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/clients", get(list_clients))
        .route("/clients/:id", get(get_client))
        .route("/branches", get(list_branches))
        .route("/reload", post(reload))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = Config::load_or_default(args.config.as_deref())?;
    if let Some(dir) = &args.source_dir {
        config = config.with_source_dir(dir);
    }
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    config.log.init();

    println!("🌐 Client Ledger - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let dataset = match load_from_config(&config).await {
        Ok(loaded) => {
            println!(
                "✓ Loaded {} clients, {} accounts, {} branches",
                loaded.dataset.clients.len(),
                loaded.dataset.accounts.len(),
                loaded.dataset.branches.len()
            );
            loaded.dataset
        }
        Err(_) => {
            eprintln!("❌ {}", LOAD_FAILED);
            eprintln!("   Starting empty; POST /api/reload to retry.");
            Dataset::default()
        }
    };

    let addr = config.server.bind.clone();
    let app = router(AppState::new(dataset, config));

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    println!("\n🚀 Server running on http://{}", addr);
    println!("   API: http://{}/api/clients", addr);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use client_ledger::{MaritalStatus, TaxId};

    fn client(i: usize) -> Client {
        Client {
            id: format!("c{}", i),
            tax_id: TaxId::new(format!("{:011}", i)),
            national_id: None,
            birth_date: None,
            name: format!("Cliente {}", i),
            social_name: None,
            email: format!("c{}@example.com", i),
            address: String::new(),
            annual_income: Decimal::ZERO,
            net_worth: Decimal::new(i as i64, 0),
            marital_status: MaritalStatus::Single,
            branch_code: 1,
        }
    }

    fn state(n: usize) -> AppState {
        let dataset = Dataset::new((1..=n).map(client).collect(), Vec::new(), Vec::new());
        AppState::new(dataset, Config::default())
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_list_clients_pages() {
        let params = ClientsParams {
            search: String::new(),
            page: 3,
        };
        let response = list_clients(State(state(25)), Query(params)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["data"]["total_pages"], 3);
        assert_eq!(json["data"]["items"].as_array().unwrap().len(), 5);
        assert_eq!(json["data"]["navigation"]["has_next"], false);
    }

    #[tokio::test]
    async fn test_single_page_has_no_navigation() {
        let params = ClientsParams {
            search: "cliente 1".to_string(),
            page: 1,
        };
        let response = list_clients(State(state(5)), Query(params)).await.into_response();

        let json = body_json(response).await;
        assert_eq!(json["data"]["total_items"], 1);
        assert!(json["data"].get("navigation").is_none());
    }

    #[tokio::test]
    async fn test_out_of_range_page_is_clamped() {
        let params = ClientsParams {
            search: String::new(),
            page: 99,
        };
        let response = list_clients(State(state(25)), Query(params)).await.into_response();

        let json = body_json(response).await;
        assert_eq!(json["data"]["page"], 3);
        assert_eq!(json["data"]["navigation"]["current"], 3);
        assert_eq!(json["data"]["items"][0]["id"], "c21");
    }

    #[tokio::test]
    async fn test_unknown_client_is_404() {
        let response = get_client(State(state(2)), Path("nope".to_string())).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let json = body_json(response).await;
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn test_client_detail() {
        let response = get_client(State(state(2)), Path("c2".to_string())).await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["data"]["client"]["name"], "Cliente 2");
        assert_eq!(json["data"]["accounts"].as_array().unwrap().len(), 0);
        assert!(json["data"]["branch"].is_null());
    }

    const CLIENTS: &str = "id,cpfCnpj,rg,dataNascimento,nome,nomeSocial,email,endereco,rendaAnual,patrimonio,estadoCivil,codigoAgencia\n\
        n1,123.456.789-01,,1990-03-15,Ana Souza,,ana@example.com,Rua A,85000,120000,Solteiro,101\n";

    const ACCOUNTS: &str = "id,cpfCnpjCliente,tipo,saldo,limiteCredito,creditoDisponivel\n\
        a1,123.456.789-01,corrente,1500.50,5000,3000\n";

    const BRANCHES: &str = "id,codigo,nome,endereco\n\
        b1,101,Centro,\"Av. Central, 10\"\n";

    fn state_with_sources(n: usize, dir: &std::path::Path) -> AppState {
        let dataset = Dataset::new((1..=n).map(client).collect(), Vec::new(), Vec::new());
        AppState::new(dataset, Config::default().with_source_dir(dir))
    }

    #[tokio::test]
    async fn test_reload_replaces_dataset() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("clientes.csv"), CLIENTS).unwrap();
        std::fs::write(dir.path().join("contas.csv"), ACCOUNTS).unwrap();
        std::fs::write(dir.path().join("agencias.csv"), BRANCHES).unwrap();

        let state = state_with_sources(5, dir.path());
        let response = reload(State(state.clone())).await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["data"]["clients"], 1);
        assert_eq!(json["data"]["accounts"], 1);
        assert_eq!(json["data"]["branches"], 1);

        let data = state.snapshot().await;
        assert_eq!(data.clients.len(), 1);
        assert_eq!(data.clients[0].id, "n1");
        assert!(data.client_by_id("c1").is_none());
        assert_eq!(data.detail("n1").unwrap().accounts.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_previous_dataset() {
        let dir = tempfile::tempdir().unwrap();

        let state = state_with_sources(5, &dir.path().join("missing"));
        let response = reload(State(state.clone())).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], LOAD_FAILED);

        let data = state.snapshot().await;
        assert_eq!(data.clients.len(), 5);
        assert!(data.client_by_id("c5").is_some());
    }

    #[tokio::test]
    async fn test_list_branches() {
        let dataset = Dataset::new(
            Vec::new(),
            Vec::new(),
            vec![
                Branch {
                    id: "b1".to_string(),
                    code: 101,
                    name: "Centro".to_string(),
                    address: "Av. Central".to_string(),
                },
                Branch {
                    id: "b2".to_string(),
                    code: 102,
                    name: "Praia".to_string(),
                    address: "Rua do Mar".to_string(),
                },
            ],
        );
        let state = AppState::new(dataset, Config::default());

        let response = list_branches(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["data"].as_array().unwrap().len(), 2);
        assert_eq!(json["data"][1]["name"], "Praia");
        assert_eq!(json["data"][0]["code"], 101);
    }
}
