use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use perch_api::AppStateInner;
use perch_db::Database;
use perch_db::accounts::AccountStore;
use perch_db::messages::MessageStore;
use perch_service::accounts::AccountService;
use perch_service::messages::MessageService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "perch=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let db_path = std::env::var("PERCH_DB_PATH").unwrap_or_else(|_| "perch.db".into());
    let host = std::env::var("PERCH_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("PERCH_PORT")
        .unwrap_or_else(|_| "8080".into())
        .parse()?;

    // Init database
    let db = Arc::new(Database::open(&PathBuf::from(&db_path))?);

    // Wire stores and services
    let accounts = AccountStore::new(db.clone());
    let messages = MessageStore::new(db);
    let state = Arc::new(AppStateInner {
        accounts: AccountService::new(accounts.clone()),
        messages: MessageService::new(messages, accounts),
    });

    let app = perch_api::router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("perch server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
