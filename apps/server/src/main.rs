use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use roster_backend_api::{build_router, invoke, ApiRequest, Operation};
use roster_backend_runtime::{telemetry, BackendServices};
use roster_config::load as load_config;
use roster_database::{ScanRequest, User, UserStore};
use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;
use tracing::info;

const SAMPLE_NAMES: [&str; 8] = [
    "Ada", "Grace", "Alan", "Barbara", "Edsger", "Frances", "Donald", "Margaret",
];

#[derive(Parser)]
#[command(name = "roster-server")]
#[command(about = "Roster user service (HTTP server by default)")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Run one handler on a request envelope and print the response envelope
    Invoke {
        /// Operation name, e.g. `createUser` or `paginateUsers`
        operation: Operation,
        /// JSON file holding the request envelope; stdin when omitted
        #[arg(long)]
        event: Option<PathBuf>,
    },
    /// Print every user record
    Dump,
    /// Insert sample users
    Seed {
        #[arg(long, default_value_t = 10)]
        count: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    telemetry::init_tracing().context("failed to initialise tracing")?;

    let config = load_config().context("failed to load configuration")?;
    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server(&services, &config).await,
        Commands::Invoke { operation, event } => run_invoke(&services, operation, event).await,
        Commands::Dump => dump_users(&services).await,
        Commands::Seed { count } => seed_users(&services, count).await,
    }
}

async fn run_server(
    services: &BackendServices,
    config: &roster_config::AppConfig,
) -> anyhow::Result<()> {
    info!(backend = config.store.backend.as_str(), "starting Roster");

    let app = build_router(services.app_state());

    let address = format!("{}:{}", config.http.address, config.http.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind http listener on {address}"))?;

    info!(%address, "http server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(roster_backend_runtime::shutdown_signal())
        .await
        .context("http server error")?;

    info!("server shut down");
    Ok(())
}

async fn run_invoke(
    services: &BackendServices,
    operation: Operation,
    event: Option<PathBuf>,
) -> anyhow::Result<()> {
    let raw = match event {
        Some(path) => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("failed to read event file {}", path.display()))?,
        None => {
            let mut raw = String::new();
            tokio::io::stdin()
                .read_to_string(&mut raw)
                .await
                .context("failed to read event from stdin")?;
            raw
        }
    };

    let request = parse_event(&raw)?;
    let response = invoke(&services.app_state(), operation, &request).await;

    println!(
        "{}",
        serde_json::to_string_pretty(&response).context("failed to encode response")?
    );
    Ok(())
}

/// An empty event is an envelope with no body and no parameters.
fn parse_event(raw: &str) -> anyhow::Result<ApiRequest> {
    if raw.trim().is_empty() {
        return Ok(ApiRequest::default());
    }
    serde_json::from_str(raw).context("event is not a request envelope")
}

async fn dump_users(services: &BackendServices) -> anyhow::Result<()> {
    let users = services
        .store
        .scan(ScanRequest::default())
        .await
        .context("failed to scan users")?
        .items;

    println!("=== USERS ===");
    if users.is_empty() {
        println!("No users found");
        return Ok(());
    }

    println!("Found {} users:", users.len());
    println!("{:<28} {:<20} {:<32} {:<8}", "ID", "Name", "Email", "Deleted");
    println!("{}", "-".repeat(90));
    for user in users {
        println!(
            "{:<28} {:<20} {:<32} {:<8}",
            user.id,
            user.name,
            user.email,
            user.is_deleted
                .map(|flag| flag.to_string())
                .unwrap_or_else(|| "-".to_string())
        );
    }
    Ok(())
}

async fn seed_users(services: &BackendServices, count: usize) -> anyhow::Result<()> {
    for user in sample_users(count) {
        services
            .store
            .put(&user)
            .await
            .with_context(|| format!("failed to insert user {}", user.id))?;
    }

    println!("Seeded {count} users");
    println!("Run 'dump' to see them");
    Ok(())
}

fn sample_users(count: usize) -> Vec<User> {
    SAMPLE_NAMES
        .iter()
        .cycle()
        .take(count)
        .map(|name| {
            let id = cuid2::create_id();
            let suffix: String = id.chars().take(6).collect();
            let email = format!("{}.{suffix}@example.com", name.to_lowercase());
            User::new(id, *name, email)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invoke_takes_an_operation_name() {
        let cli = Cli::try_parse_from(["roster-server", "invoke", "paginateUsers"]).unwrap();
        match cli.command {
            Some(Commands::Invoke { operation, event }) => {
                assert_eq!(operation, Operation::PaginateUsers);
                assert!(event.is_none());
            }
            _ => panic!("expected invoke"),
        }

        assert!(Cli::try_parse_from(["roster-server", "invoke", "dropUsers"]).is_err());
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["roster-server"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_events_with_missing_sections() {
        assert_eq!(parse_event("").unwrap(), ApiRequest::default());

        let request = parse_event(r#"{"pathParameters":{"id":"u1"}}"#).unwrap();
        assert_eq!(request.path_parameter("id"), Some("u1"));
        assert!(request.body.is_none());

        assert!(parse_event("42").is_err());
    }

    #[test]
    fn sample_users_have_unique_ids() {
        let users = sample_users(12);
        assert_eq!(users.len(), 12);
        assert_eq!(users[8].name, "Ada");

        let mut ids: Vec<_> = users.iter().map(|u| u.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 12);
    }
}
