// CSV Query API - Main executable
// Author: Gabriel Demetrios Lafis

use std::sync::Arc;

use clap::{App, Arg};
use log::{error, info};

use csv_query_api::{
    api::{AppState, Server, ServerConfig},
    auth::TokenManager,
    storage::{DiskUploadStore, MemoryUploadStore, Registry, UploadStore},
    utils::{init_logging, AppResult, Config},
};

#[actix_web::main]
async fn main() -> AppResult<()> {
    // Parse command line arguments
    let matches = App::new("CSV Query API")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A CSV file upload and query API")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Sets a custom config file")
                .takes_value(true),
        )
        .subcommand(
            App::new("server")
                .about("Run the API server")
                .arg(
                    Arg::new("host")
                        .long("host")
                        .value_name("HOST")
                        .help("Sets the server host")
                        .takes_value(true),
                )
                .arg(
                    Arg::new("port")
                        .short('p')
                        .long("port")
                        .value_name("PORT")
                        .help("Sets the server port")
                        .takes_value(true),
                ),
        )
        .get_matches();

    // Load configuration
    let config = if let Some(config_path) = matches.value_of("config") {
        match Config::from_file(config_path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("Error loading config file: {}", err);
                Config::default()
            }
        }
    } else {
        Config::default()
    };

    // Initialize logging
    if let Err(err) = init_logging(config.log_level_filter()) {
        eprintln!("Error initializing logger: {}", err);
    }

    // Open the account/file registry
    let registry = match &config.storage.registry_path {
        Some(path) => match Registry::open(path) {
            Ok(registry) => registry,
            Err(err) => {
                error!("Error opening registry at '{}': {}", path, err);
                Registry::in_memory()
            }
        },
        None => Registry::in_memory(),
    };

    // Create the upload store
    let uploads: Arc<dyn UploadStore + Send + Sync> =
        match DiskUploadStore::new(&config.storage.uploads_dir) {
            Ok(store) => Arc::new(store),
            Err(err) => {
                error!("Error creating upload directory: {}", err);
                Arc::new(MemoryUploadStore::new())
            }
        };

    let tokens = TokenManager::new(config.auth.token_ttl_minutes);
    let state = AppState::new(registry, uploads, tokens);

    // Handle subcommands
    if let Some(matches) = matches.subcommand_matches("server") {
        // Override config with command line arguments
        let host = matches.value_of("host").unwrap_or(&config.server.host);
        let port = matches
            .value_of("port")
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(config.server.port);

        // Create server config
        let server_config = ServerConfig {
            host: host.to_string(),
            port,
            workers: config.server.workers.unwrap_or_else(num_cpus::get),
            enable_cors: config.server.enable_cors,
        };

        // Create and run server
        info!("Starting server at {}:{}", host, port);
        let server = Server::new(state, server_config);
        server.run().await?;
    } else {
        println!("No subcommand specified. Use --help for usage information.");
    }

    Ok(())
}
