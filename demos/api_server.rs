// Run the API server with in-memory state
// Author: Gabriel Demetrios Lafis

use std::sync::Arc;

use csv_query_api::api::{AppState, Server, ServerConfig};
use csv_query_api::auth::TokenManager;
use csv_query_api::storage::{MemoryUploadStore, Registry};
use csv_query_api::utils::init_logging;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(err) = init_logging(log::LevelFilter::Info) {
        eprintln!("Error initializing logger: {}", err);
    }

    let state = AppState::new(
        Registry::in_memory(),
        Arc::new(MemoryUploadStore::new()),
        TokenManager::new(60),
    );

    let server = Server::new(state, ServerConfig::default());
    server.run().await
}
